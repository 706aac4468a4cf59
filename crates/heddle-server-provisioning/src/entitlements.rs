// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolved entitlement sets and the add/remove diff between them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use heddle_server_auth::{AccessLevel, SiteId};

/// The site-ID sets a login is entitled to, per access level.
///
/// These are true sets: a domain claim that resolves to an already-present
/// site ID contributes nothing new.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntitlements {
	/// Sites the login may view.
	pub view: BTreeSet<SiteId>,
	/// Sites the login may administer.
	pub admin: BTreeSet<SiteId>,
}

impl ResolvedEntitlements {
	/// True when neither level resolved to any site.
	pub fn is_empty(&self) -> bool {
		self.view.is_empty() && self.admin.is_empty()
	}

	/// The set for one access level.
	pub fn level(&self, level: AccessLevel) -> &BTreeSet<SiteId> {
		match level {
			AccessLevel::View => &self.view,
			AccessLevel::Admin => &self.admin,
		}
	}
}

/// The minimal operations turning `current` into `resolved`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDiff {
	/// Sites in the resolved set that are not yet stored.
	pub to_add: BTreeSet<SiteId>,
	/// Stored sites that are no longer resolved.
	pub to_remove: BTreeSet<SiteId>,
}

impl AccessDiff {
	/// True when the stored set already equals the resolved set.
	pub fn is_noop(&self) -> bool {
		self.to_add.is_empty() && self.to_remove.is_empty()
	}
}

/// Diff a resolved entitlement set against the currently stored one.
pub fn access_diff(resolved: &BTreeSet<SiteId>, current: &BTreeSet<SiteId>) -> AccessDiff {
	AccessDiff {
		to_add: resolved.difference(current).copied().collect(),
		to_remove: current.difference(resolved).copied().collect(),
	}
}
