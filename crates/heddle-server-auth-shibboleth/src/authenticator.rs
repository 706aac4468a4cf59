// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The authentication decision for Shibboleth-federated requests.
//!
//! # Authentication Flow
//!
//! ```text
//! ambient attributes
//!     │
//!     ├── login attribute present ──► session cache match? ──► Success (cached)
//!     │                                   │
//!     │                                   └── no match ──► reconcile entitlements
//!     │                                                    cache record ──► Success
//!     └── login attribute absent ──► token lookup ──► Success (no reconciliation)
//!
//! anything left over ──► Failure { attempted login, attempted token }
//! ```
//!
//! The session fast path exists so repeated requests within one session
//! never touch the account store or the site registry. Token-based callers
//! are assumed already provisioned and are never reconciled.

use std::sync::Arc;
use tracing::{debug, instrument};

use heddle_server_auth::{
	generate_token_auth, AttributeSource, AuthOutcome, CachedLogin, SessionCache, SiteRegistry,
	UserStore, ANONYMOUS_LOGIN,
};
use heddle_server_provisioning::{Provisioner, ProvisioningPolicy};

use crate::adapter::ShibbolethAdapter;
use crate::config::ShibbolethConfig;
use crate::error::{ShibbolethAuthError, ShibbolethConfigError};

/// Authenticates one request against the federated attributes, with a
/// token-lookup fallback for API callers.
///
/// The attempt state (`login`, `token_auth`) is readable after
/// [`authenticate`](Self::authenticate) returns: success mutates both to
/// the resolved values, per the host caller contract.
pub struct ShibbolethAuthenticator {
	adapter: ShibbolethAdapter,
	login_attribute: String,
	users: Arc<dyn UserStore>,
	provisioner: Provisioner,
	login: Option<String>,
	token_auth: Option<String>,
}

impl ShibbolethAuthenticator {
	/// Builds the authenticator, compiling the configured group patterns.
	pub fn new(
		config: &ShibbolethConfig,
		users: Arc<dyn UserStore>,
		sites: Arc<dyn SiteRegistry>,
	) -> Result<Self, ShibbolethConfigError> {
		let adapter = ShibbolethAdapter::new(config)?;
		let provisioner = Provisioner::new(
			Arc::clone(&users),
			sites,
			ProvisioningPolicy {
				delete_old_users: config.delete_old_users,
			},
		);

		Ok(Self {
			adapter,
			login_attribute: config.login_attribute.clone(),
			users,
			provisioner,
			login: None,
			token_auth: None,
		})
	}

	/// The login being (or last) authenticated.
	pub fn login(&self) -> Option<&str> {
		self.login.as_deref()
	}

	/// Sets the login to authenticate with.
	pub fn set_login(&mut self, login: Option<String>) {
		self.login = login;
	}

	/// The token being (or last) authenticated.
	pub fn token_auth(&self) -> Option<&str> {
		self.token_auth.as_deref()
	}

	/// Sets the opaque token to authenticate with (API callers).
	pub fn set_token_auth(&mut self, token_auth: Option<String>) {
		self.token_auth = token_auth;
	}

	/// Rejected: federated credentials are managed by the identity provider.
	pub fn set_password(&mut self, _password: &str) -> Result<(), ShibbolethAuthError> {
		Err(ShibbolethAuthError::PasswordManagementUnsupported)
	}

	/// Rejected: federated credentials are managed by the identity provider.
	pub fn set_password_hash(&mut self, _password_hash: &str) -> Result<(), ShibbolethAuthError> {
		Err(ShibbolethAuthError::PasswordManagementUnsupported)
	}

	/// Runs one authentication attempt to its terminal outcome.
	///
	/// An exhausted attempt returns [`AuthOutcome::Failure`]; `Err` is
	/// reserved for collaborator failures, which the caller may retry as a
	/// whole.
	#[instrument(name = "auth.shibboleth.authenticate", skip_all)]
	pub async fn authenticate(
		&mut self,
		attrs: &dyn AttributeSource,
		session: &mut dyn SessionCache,
	) -> Result<AuthOutcome, ShibbolethAuthError> {
		if let Some(claimed) = attrs.get(&self.login_attribute) {
			let claimed = claimed.to_string();
			self.login = Some(claimed.clone());

			if let Some(entry) = session.get() {
				if entry.login == claimed {
					debug!(login = %claimed, "session fast path");
					let entry = entry.clone();
					self.token_auth = Some(entry.token_auth.clone());
					return Ok(AuthOutcome::success(
						entry.login,
						entry.token_auth,
						entry.superuser,
					));
				}
			}

			if !claimed.is_empty() && claimed != ANONYMOUS_LOGIN {
				return self.authenticate_federated(&claimed, attrs, session).await;
			}
		} else if let Some(token_auth) = self.token_auth.clone() {
			debug!("no login claim; trying token fallback");
			if let Some(user) = self.users.find_user_by_token(&token_auth).await? {
				self.login = Some(user.login.clone());
				return Ok(AuthOutcome::success(
					user.login,
					user.token_auth,
					user.superuser_access,
				));
			}
		}

		Ok(AuthOutcome::Failure {
			attempted_login: self.login.clone(),
			attempted_token: self.token_auth.clone(),
		})
	}

	/// Reconcile entitlements for a federated login, cache the record, and
	/// issue a fresh token.
	async fn authenticate_federated(
		&mut self,
		login: &str,
		attrs: &dyn AttributeSource,
		session: &mut dyn SessionCache,
	) -> Result<AuthOutcome, ShibbolethAuthError> {
		let identity = self.adapter.identity(attrs);
		let claims = self.adapter.access_claims(attrs);

		self.provisioner
			.reconcile(login, &identity.email, &claims)
			.await?;

		let token_auth = generate_token_auth();
		session.set(CachedLogin {
			login: login.to_string(),
			token_auth: token_auth.clone(),
			superuser: claims.superuser,
		});
		self.token_auth = Some(token_auth.clone());

		debug!(login = %login, superuser = claims.superuser, "federated login reconciled");
		Ok(AuthOutcome::success(login, token_auth, claims.superuser))
	}

	/// Ends the session: drops the cached record and the attempt state.
	///
	/// The host then redirects to the handler's logout URL.
	pub fn logout(&mut self, session: &mut dyn SessionCache) {
		session.clear();
		self.login = None;
		self.token_auth = None;
	}
}
