// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for site-level access control.
//!
//! This module defines:
//!
//! - [`SiteId`] - type-safe wrapper around the UUID of a tracked site,
//!   preventing accidental mixing with other UUID-backed identifiers
//! - [`AccessLevel`] - the two per-site entitlement levels (`view`/`admin`)
//! - [`ANONYMOUS_LOGIN`] - the sentinel login that must never authenticate
//!
//! [`SiteId`] implements transparent serde serialization (as a UUID string)
//! and conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The sentinel login used for unauthenticated visitors.
///
/// A federated login claim carrying this value is treated as "no user":
/// it never reconciles entitlements and never produces a success outcome.
pub const ANONYMOUS_LOGIN: &str = "anonymous";

// =============================================================================
// SiteId
// =============================================================================

/// Unique identifier for a tracked site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(Uuid);

impl SiteId {
	/// Create a new ID from a UUID.
	pub fn new(id: Uuid) -> Self {
		Self(id)
	}

	/// Generate a new random ID.
	pub fn generate() -> Self {
		Self(Uuid::new_v4())
	}

	/// Get the inner UUID value.
	pub fn into_inner(self) -> Uuid {
		self.0
	}

	/// Get a reference to the inner UUID.
	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl fmt::Display for SiteId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<Uuid> for SiteId {
	fn from(id: Uuid) -> Self {
		Self(id)
	}
}

impl From<SiteId> for Uuid {
	fn from(id: SiteId) -> Self {
		id.0
	}
}

// =============================================================================
// Access Levels
// =============================================================================

/// Per-site entitlement levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
	/// Read-only access to a site's reports.
	View,
	/// Full management access to a site.
	Admin,
}

impl AccessLevel {
	/// Returns all available access levels.
	pub fn all() -> &'static [AccessLevel] {
		&[AccessLevel::View, AccessLevel::Admin]
	}
}

impl fmt::Display for AccessLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AccessLevel::View => write!(f, "view"),
			AccessLevel::Admin => write!(f, "admin"),
		}
	}
}
