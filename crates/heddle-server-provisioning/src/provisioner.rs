// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The reconciliation engine bringing stored entitlements in line with
//! freshly classified group claims.
//!
//! # Reconciliation steps
//!
//! ```text
//! claims → resolve domains to site IDs → deletion policy → create account
//!        → sync superuser flag → diff + grant/revoke per access level
//! ```
//!
//! The provisioner holds its collaborators by capability rather than
//! extending a generic account model: every store interaction is an explicit
//! call on [`UserStore`] or [`SiteRegistry`].

use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use heddle_server_auth::{
	credential_hash, generate_placeholder_credential, AccessClaims, AccessLevel, DomainClaim,
	NewUser, SiteId, SiteRegistry, UserStore,
};

use crate::entitlements::{access_diff, ResolvedEntitlements};
use crate::error::ProvisioningError;
use crate::urls::candidate_urls;

/// Policy knobs for reconciliation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvisioningPolicy {
	/// Delete accounts that lost every entitlement instead of keeping them
	/// around with zero access. Superusers are exempt.
	pub delete_old_users: bool,
}

/// Reconciles one login's stored entitlements against classified claims.
pub struct Provisioner {
	users: Arc<dyn UserStore>,
	sites: Arc<dyn SiteRegistry>,
	policy: ProvisioningPolicy,
}

impl Provisioner {
	/// Creates a provisioner over the given store and registry.
	pub fn new(
		users: Arc<dyn UserStore>,
		sites: Arc<dyn SiteRegistry>,
		policy: ProvisioningPolicy,
	) -> Self {
		Self {
			users,
			sites,
			policy,
		}
	}

	/// Bring the stored entitlements for `login` in line with `claims`.
	///
	/// Returns the resolved entitlement sets. Not transactional: a store or
	/// registry failure part-way through propagates and leaves the account
	/// partially synced.
	#[instrument(
		name = "provisioning.reconcile",
		skip_all,
		fields(login = %login, superuser = claims.superuser)
	)]
	pub async fn reconcile(
		&self,
		login: &str,
		email: &str,
		claims: &AccessClaims,
	) -> Result<ResolvedEntitlements, ProvisioningError> {
		let resolved = ResolvedEntitlements {
			view: self.resolve_domains(&claims.view_domains).await?,
			admin: self.resolve_domains(&claims.admin_domains).await?,
		};

		// A login that lost every entitlement, and was never independently
		// provisioned, should not linger. Superusers are exempt.
		if self.policy.delete_old_users && !claims.superuser {
			let has_any = self.users.has_any_site_access(login).await?;
			if !has_any || resolved.is_empty() {
				debug!("deleting login with no remaining entitlements");
				self.users.delete_user(login).await?;
				return Ok(resolved);
			}
		}

		// Accounts are only ever created here, and only when the claims
		// actually resolved to something; an existing account is never
		// re-created.
		if !self.users.user_exists(login).await? && !resolved.is_empty() {
			let user = NewUser {
				login: login.to_string(),
				credential_hash: credential_hash(&generate_placeholder_credential()),
				email: email.to_string(),
				created_at: Utc::now(),
			};
			self.users.create_user(&user).await?;
			debug!("provisioned new account");
		}

		self.users
			.set_superuser_access(login, claims.superuser)
			.await?;

		for level in AccessLevel::all().iter().copied() {
			let target = resolved.level(level);
			let current = self.users.site_access(login, level).await?;
			let diff = access_diff(target, &current);

			if target.is_empty() && !diff.to_remove.is_empty() {
				// Likely a misconfigured group pattern rather than a real
				// membership change; keep the observable behavior but leave
				// a trace of it.
				warn!(
					%level,
					removed = diff.to_remove.len(),
					"no entitlements resolved; revoking all remaining access"
				);
			}

			if !diff.to_add.is_empty() {
				self.users.grant_site_access(login, level, &diff.to_add).await?;
			}
			if !diff.to_remove.is_empty() {
				self.users
					.revoke_site_access(login, level, &diff.to_remove)
					.await?;
			}
		}

		Ok(resolved)
	}

	/// Union of the site IDs the registry returns for each claimed domain.
	async fn resolve_domains(
		&self,
		domains: &[DomainClaim],
	) -> Result<BTreeSet<SiteId>, ProvisioningError> {
		let mut out = BTreeSet::new();
		for claim in domains {
			let candidates = candidate_urls(&claim.url());
			out.extend(self.sites.sites_matching_urls(&candidates).await?);
		}
		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use heddle_server_auth::{StoreError, UserRecord};
	use std::collections::BTreeMap;
	use std::sync::Mutex;
	use uuid::Uuid;

	fn site(n: u128) -> SiteId {
		SiteId::new(Uuid::from_u128(n))
	}

	fn set(ids: &[u128]) -> BTreeSet<SiteId> {
		ids.iter().map(|n| site(*n)).collect()
	}

	#[derive(Debug, Clone, Default)]
	struct FakeAccount {
		email: String,
		superuser: bool,
		view: BTreeSet<SiteId>,
		admin: BTreeSet<SiteId>,
	}

	#[derive(Debug, Default)]
	struct FakeUserState {
		accounts: BTreeMap<String, FakeAccount>,
		created: Vec<NewUser>,
		deleted: Vec<String>,
		superuser_calls: Vec<(String, bool)>,
		grants: Vec<(String, AccessLevel, BTreeSet<SiteId>)>,
		revokes: Vec<(String, AccessLevel, BTreeSet<SiteId>)>,
	}

	#[derive(Default)]
	struct FakeUserStore {
		state: Arc<Mutex<FakeUserState>>,
	}

	impl FakeUserStore {
		fn with_account(self, login: &str, account: FakeAccount) -> Self {
			self.state
				.lock()
				.unwrap()
				.accounts
				.insert(login.to_string(), account);
			self
		}

		fn state(&self) -> FakeUserState {
			let state = self.state.lock().unwrap();
			FakeUserState {
				accounts: state.accounts.clone(),
				created: state.created.clone(),
				deleted: state.deleted.clone(),
				superuser_calls: state.superuser_calls.clone(),
				grants: state.grants.clone(),
				revokes: state.revokes.clone(),
			}
		}
	}

	#[async_trait]
	impl UserStore for FakeUserStore {
		async fn user_exists(&self, login: &str) -> Result<bool, StoreError> {
			Ok(self.state.lock().unwrap().accounts.contains_key(login))
		}

		async fn create_user(&self, user: &NewUser) -> Result<(), StoreError> {
			let mut state = self.state.lock().unwrap();
			state.created.push(user.clone());
			state.accounts.insert(
				user.login.clone(),
				FakeAccount {
					email: user.email.clone(),
					..FakeAccount::default()
				},
			);
			Ok(())
		}

		async fn delete_user(&self, login: &str) -> Result<(), StoreError> {
			let mut state = self.state.lock().unwrap();
			state.deleted.push(login.to_string());
			state.accounts.remove(login);
			Ok(())
		}

		async fn set_superuser_access(
			&self,
			login: &str,
			superuser: bool,
		) -> Result<(), StoreError> {
			let mut state = self.state.lock().unwrap();
			state.superuser_calls.push((login.to_string(), superuser));
			if let Some(account) = state.accounts.get_mut(login) {
				account.superuser = superuser;
			}
			Ok(())
		}

		async fn site_access(
			&self,
			login: &str,
			level: AccessLevel,
		) -> Result<BTreeSet<SiteId>, StoreError> {
			let state = self.state.lock().unwrap();
			Ok(state
				.accounts
				.get(login)
				.map(|account| match level {
					AccessLevel::View => account.view.clone(),
					AccessLevel::Admin => account.admin.clone(),
				})
				.unwrap_or_default())
		}

		async fn has_any_site_access(&self, login: &str) -> Result<bool, StoreError> {
			let state = self.state.lock().unwrap();
			Ok(state
				.accounts
				.get(login)
				.map(|account| !account.view.is_empty() || !account.admin.is_empty())
				.unwrap_or(false))
		}

		async fn grant_site_access(
			&self,
			login: &str,
			level: AccessLevel,
			sites: &BTreeSet<SiteId>,
		) -> Result<(), StoreError> {
			let mut state = self.state.lock().unwrap();
			state
				.grants
				.push((login.to_string(), level, sites.clone()));
			if let Some(account) = state.accounts.get_mut(login) {
				match level {
					AccessLevel::View => account.view.extend(sites.iter().copied()),
					AccessLevel::Admin => account.admin.extend(sites.iter().copied()),
				}
			}
			Ok(())
		}

		async fn revoke_site_access(
			&self,
			login: &str,
			level: AccessLevel,
			sites: &BTreeSet<SiteId>,
		) -> Result<(), StoreError> {
			let mut state = self.state.lock().unwrap();
			state
				.revokes
				.push((login.to_string(), level, sites.clone()));
			if let Some(account) = state.accounts.get_mut(login) {
				let target = match level {
					AccessLevel::View => &mut account.view,
					AccessLevel::Admin => &mut account.admin,
				};
				for id in sites {
					target.remove(id);
				}
			}
			Ok(())
		}

		async fn find_user_by_token(&self, _token: &str) -> Result<Option<UserRecord>, StoreError> {
			Ok(None)
		}
	}

	#[derive(Default)]
	struct FakeSiteRegistry {
		by_url: BTreeMap<String, BTreeSet<SiteId>>,
		fail: bool,
	}

	impl FakeSiteRegistry {
		fn with_site(mut self, url: &str, ids: &[u128]) -> Self {
			self.by_url.insert(url.to_string(), set(ids));
			self
		}

		fn failing() -> Self {
			Self {
				fail: true,
				..Self::default()
			}
		}
	}

	#[async_trait]
	impl SiteRegistry for FakeSiteRegistry {
		async fn sites_matching_urls(
			&self,
			candidates: &[String],
		) -> Result<BTreeSet<SiteId>, StoreError> {
			if self.fail {
				return Err(StoreError::Backend("registry unavailable".to_string()));
			}
			let mut out = BTreeSet::new();
			for candidate in candidates {
				if let Some(ids) = self.by_url.get(candidate) {
					out.extend(ids.iter().copied());
				}
			}
			Ok(out)
		}
	}

	fn view_claims(domains: &[&str]) -> AccessClaims {
		AccessClaims {
			view_domains: domains.iter().map(|d| DomainClaim::new(*d)).collect(),
			admin_domains: Vec::new(),
			superuser: false,
		}
	}

	fn provisioner(
		users: &FakeUserStore,
		sites: FakeSiteRegistry,
		delete_old_users: bool,
	) -> Provisioner {
		Provisioner::new(
			Arc::new(FakeUserStore {
				state: Arc::clone(&users.state),
			}),
			Arc::new(sites),
			ProvisioningPolicy { delete_old_users },
		)
	}

	mod creation {
		use super::*;

		#[tokio::test]
		async fn creates_missing_account_with_resolved_access() {
			let users = FakeUserStore::default();
			let sites = FakeSiteRegistry::default().with_site("http://alpha.example.org", &[1]);
			let provisioner = provisioner(&users, sites, false);

			let resolved = provisioner
				.reconcile("ada", "ada@example.org", &view_claims(&["alpha.example.org"]))
				.await
				.unwrap();

			assert_eq!(resolved.view, set(&[1]));
			let state = users.state();
			assert_eq!(state.created.len(), 1);
			assert_eq!(state.created[0].login, "ada");
			assert_eq!(state.created[0].email, "ada@example.org");
			// Placeholder credential is stored hashed, never in the clear.
			assert_eq!(state.created[0].credential_hash.len(), 64);
			assert_eq!(
				state.grants,
				vec![("ada".to_string(), AccessLevel::View, set(&[1]))]
			);
		}

		#[tokio::test]
		async fn does_not_create_account_without_entitlements() {
			let users = FakeUserStore::default();
			let provisioner = provisioner(&users, FakeSiteRegistry::default(), false);

			provisioner
				.reconcile("ada", "ada@example.org", &view_claims(&["unknown.example.org"]))
				.await
				.unwrap();

			let state = users.state();
			assert!(state.created.is_empty());
			assert!(state.grants.is_empty());
			// The superuser flag is still synced unconditionally.
			assert_eq!(state.superuser_calls, vec![("ada".to_string(), false)]);
		}

		#[tokio::test]
		async fn never_recreates_an_existing_account() {
			let users = FakeUserStore::default().with_account(
				"ada",
				FakeAccount {
					view: set(&[1]),
					..FakeAccount::default()
				},
			);
			let sites = FakeSiteRegistry::default().with_site("http://alpha.example.org", &[1]);
			let provisioner = provisioner(&users, sites, false);

			provisioner
				.reconcile("ada", "ada@example.org", &view_claims(&["alpha.example.org"]))
				.await
				.unwrap();

			assert!(users.state().created.is_empty());
		}
	}

	mod deletion_policy {
		use super::*;

		#[tokio::test]
		async fn deletes_account_when_nothing_resolves() {
			let users = FakeUserStore::default().with_account(
				"ada",
				FakeAccount {
					view: set(&[1]),
					..FakeAccount::default()
				},
			);
			let provisioner = provisioner(&users, FakeSiteRegistry::default(), true);

			provisioner
				.reconcile("ada", "ada@example.org", &view_claims(&[]))
				.await
				.unwrap();

			let state = users.state();
			assert_eq!(state.deleted, vec!["ada".to_string()]);
			assert!(state.created.is_empty());
			assert!(state.grants.is_empty());
			assert!(state.revokes.is_empty());
			assert!(state.superuser_calls.is_empty());
		}

		#[tokio::test]
		async fn deletes_login_that_was_never_provisioned() {
			// No stored access of any kind trips the policy even when the
			// claims resolved to sites.
			let users = FakeUserStore::default();
			let sites = FakeSiteRegistry::default().with_site("http://alpha.example.org", &[1]);
			let provisioner = provisioner(&users, sites, true);

			provisioner
				.reconcile("ada", "ada@example.org", &view_claims(&["alpha.example.org"]))
				.await
				.unwrap();

			let state = users.state();
			assert_eq!(state.deleted, vec!["ada".to_string()]);
			assert!(state.created.is_empty());
			assert!(state.grants.is_empty());
		}

		#[tokio::test]
		async fn superuser_is_exempt_from_deletion() {
			let users = FakeUserStore::default().with_account(
				"ada",
				FakeAccount {
					view: set(&[1]),
					..FakeAccount::default()
				},
			);
			let provisioner = provisioner(&users, FakeSiteRegistry::default(), true);

			let claims = AccessClaims {
				superuser: true,
				..AccessClaims::default()
			};
			provisioner
				.reconcile("ada", "ada@example.org", &claims)
				.await
				.unwrap();

			let state = users.state();
			assert!(state.deleted.is_empty());
			assert_eq!(state.superuser_calls, vec![("ada".to_string(), true)]);
			// Empty resolved sets still strip the remaining regular access.
			assert_eq!(
				state.revokes,
				vec![("ada".to_string(), AccessLevel::View, set(&[1]))]
			);
		}

		#[tokio::test]
		async fn disabled_policy_revokes_down_to_empty_but_keeps_account() {
			let users = FakeUserStore::default().with_account(
				"ada",
				FakeAccount {
					view: set(&[1, 2]),
					admin: set(&[3]),
					..FakeAccount::default()
				},
			);
			let provisioner = provisioner(&users, FakeSiteRegistry::default(), false);

			provisioner
				.reconcile("ada", "ada@example.org", &view_claims(&[]))
				.await
				.unwrap();

			let state = users.state();
			assert!(state.deleted.is_empty());
			assert!(state.grants.is_empty());
			assert_eq!(
				state.revokes,
				vec![
					("ada".to_string(), AccessLevel::View, set(&[1, 2])),
					("ada".to_string(), AccessLevel::Admin, set(&[3])),
				]
			);
			assert!(state.accounts.contains_key("ada"));
		}
	}

	mod diffing {
		use super::*;

		#[tokio::test]
		async fn grants_and_revokes_only_the_difference() {
			let users = FakeUserStore::default().with_account(
				"ada",
				FakeAccount {
					view: set(&[1, 2]),
					..FakeAccount::default()
				},
			);
			let sites = FakeSiteRegistry::default()
				.with_site("http://alpha.example.org", &[2, 3]);
			let provisioner = provisioner(&users, sites, false);

			provisioner
				.reconcile("ada", "ada@example.org", &view_claims(&["alpha.example.org"]))
				.await
				.unwrap();

			let state = users.state();
			assert_eq!(
				state.grants,
				vec![("ada".to_string(), AccessLevel::View, set(&[3]))]
			);
			assert_eq!(
				state.revokes,
				vec![("ada".to_string(), AccessLevel::View, set(&[1]))]
			);
		}

		#[tokio::test]
		async fn second_run_against_synced_store_is_a_noop() {
			let users = FakeUserStore::default();
			let sites = FakeSiteRegistry::default()
				.with_site("http://alpha.example.org", &[1, 2]);
			let provisioner = provisioner(&users, sites, false);
			let claims = view_claims(&["alpha.example.org"]);

			provisioner
				.reconcile("ada", "ada@example.org", &claims)
				.await
				.unwrap();
			let after_first = users.state();
			assert_eq!(after_first.grants.len(), 1);

			provisioner
				.reconcile("ada", "ada@example.org", &claims)
				.await
				.unwrap();
			let after_second = users.state();
			assert_eq!(after_second.grants.len(), 1, "no further grants");
			assert!(after_second.revokes.is_empty(), "no revokes at all");
			assert_eq!(after_second.created.len(), 1, "no further creates");
		}

		#[tokio::test]
		async fn duplicate_and_overlapping_claims_resolve_to_one_set() {
			let users = FakeUserStore::default();
			let sites = FakeSiteRegistry::default()
				.with_site("http://alpha.example.org", &[1, 2])
				.with_site("http://beta.example.org", &[2]);
			let provisioner = provisioner(&users, sites, false);

			let resolved = provisioner
				.reconcile(
					"ada",
					"ada@example.org",
					&view_claims(&[
						"alpha.example.org",
						"alpha.example.org",
						"beta.example.org",
					]),
				)
				.await
				.unwrap();

			assert_eq!(resolved.view, set(&[1, 2]));
			assert_eq!(
				users.state().grants,
				vec![("ada".to_string(), AccessLevel::View, set(&[1, 2]))]
			);
		}
	}

	mod failures {
		use super::*;

		#[tokio::test]
		async fn registry_failure_propagates() {
			let users = FakeUserStore::default();
			let provisioner = provisioner(&users, FakeSiteRegistry::failing(), false);

			let err = provisioner
				.reconcile("ada", "ada@example.org", &view_claims(&["alpha.example.org"]))
				.await
				.unwrap_err();

			assert!(matches!(err, ProvisioningError::Store(_)));
			// Nothing was attempted against the user store.
			let state = users.state();
			assert!(state.created.is_empty());
			assert!(state.superuser_calls.is_empty());
		}
	}
}
