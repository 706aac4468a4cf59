// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity and group claims asserted by the upstream federation layer.
//!
//! These types are produced fresh for every authentication attempt from the
//! ambient request attributes; nothing here is persisted.

use serde::{Deserialize, Serialize};

/// Who the federation layer says the current user is.
///
/// Absent attributes resolve to empty strings, never to a missing field:
/// an empty login is a valid "unauthenticated" signal handled by the
/// authentication decision, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
	/// The login asserted by the federation layer.
	pub username: String,
	/// The email address asserted by the federation layer.
	pub email: String,
}

/// A site domain extracted from a group token.
///
/// `path` is always empty in the current scope; it exists so a group scheme
/// that encodes a path component can be adopted without changing the shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainClaim {
	/// The captured domain, e.g. `analytics.example.org`.
	pub domain: String,
	/// Optional path component under the domain.
	pub path: String,
}

impl DomainClaim {
	/// Creates a claim for a bare domain with an empty path.
	pub fn new(domain: impl Into<String>) -> Self {
		Self {
			domain: domain.into(),
			path: String::new(),
		}
	}

	/// The candidate URL string for this claim (`domain` + `path`).
	pub fn url(&self) -> String {
		format!("{}{}", self.domain, self.path)
	}
}

/// The classified group memberships of one login.
///
/// Domain order follows pattern-iteration order and duplicates are kept;
/// deduplication happens later, when domains are resolved to site-ID sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
	/// Domains the login may view.
	pub view_domains: Vec<DomainClaim>,
	/// Domains the login may administer.
	pub admin_domains: Vec<DomainClaim>,
	/// Whether the login belongs to a superuser group.
	pub superuser: bool,
}
