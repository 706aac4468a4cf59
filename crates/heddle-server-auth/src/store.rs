// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Async contracts over the persistent account store and site registry.
//!
//! The authentication and provisioning layers consume these traits only;
//! the storage engines behind them (SQL, caches, remote services) live in
//! the host server. Calls are treated as blocking collaborator operations:
//! timeout and retry policy belong to the implementations, not to callers.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::types::{AccessLevel, SiteId};
use crate::user::{NewUser, UserRecord};

/// Failure surfaced by a store or registry collaborator.
///
/// Propagated uncaught through provisioning: the caller decides whether to
/// retry the whole authentication attempt.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("backend error: {0}")]
	Backend(String),

	#[error("user not found: {0}")]
	UserNotFound(String),
}

/// The persistent account store.
///
/// Grant and revoke operate on whole ID sets so one reconciliation step is
/// one batch call per access level.
#[async_trait]
pub trait UserStore: Send + Sync {
	/// Whether an account exists for `login`.
	async fn user_exists(&self, login: &str) -> Result<bool, StoreError>;

	/// Create an account. Callers must check existence first: an account,
	/// once created, is never silently re-created.
	async fn create_user(&self, user: &NewUser) -> Result<(), StoreError>;

	/// Delete the account for `login`.
	async fn delete_user(&self, login: &str) -> Result<(), StoreError>;

	/// Set the superuser flag for `login`. Idempotent.
	async fn set_superuser_access(&self, login: &str, superuser: bool) -> Result<(), StoreError>;

	/// The site IDs `login` currently holds at `level`.
	async fn site_access(&self, login: &str, level: AccessLevel)
		-> Result<BTreeSet<SiteId>, StoreError>;

	/// Whether `login` holds any site access at any level.
	async fn has_any_site_access(&self, login: &str) -> Result<bool, StoreError>;

	/// Grant `login` the given sites at `level` in one batch.
	async fn grant_site_access(
		&self,
		login: &str,
		level: AccessLevel,
		sites: &BTreeSet<SiteId>,
	) -> Result<(), StoreError>;

	/// Revoke the given sites from `login` at `level` in one batch.
	async fn revoke_site_access(
		&self,
		login: &str,
		level: AccessLevel,
		sites: &BTreeSet<SiteId>,
	) -> Result<(), StoreError>;

	/// Look up the account owning `token`, if any.
	async fn find_user_by_token(&self, token: &str) -> Result<Option<UserRecord>, StoreError>;
}

/// The registry mapping site URLs to site IDs.
#[async_trait]
pub trait SiteRegistry: Send + Sync {
	/// All site IDs registered under any of the candidate URLs.
	///
	/// Candidates that match nothing contribute nothing; the result is the
	/// deduplicated union across all candidates.
	async fn sites_matching_urls(&self, candidates: &[String])
		-> Result<BTreeSet<SiteId>, StoreError>;
}
