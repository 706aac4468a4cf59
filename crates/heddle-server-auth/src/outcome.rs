// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The terminal result of one authentication attempt.

use serde::{Deserialize, Serialize};

/// Outcome of an authentication attempt.
///
/// Failure is a normal outcome, not an error: exhausting every
/// authentication path yields [`AuthOutcome::Failure`] with whatever login
/// and token were attempted, so the caller can log or surface them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AuthOutcome {
	/// The login authenticated with regular access.
	Success {
		/// The authenticated login.
		login: String,
		/// The token the caller may use for subsequent API requests.
		token_auth: String,
	},
	/// The login authenticated and holds superuser access.
	SuccessSuperuser {
		/// The authenticated login.
		login: String,
		/// The token the caller may use for subsequent API requests.
		token_auth: String,
	},
	/// No authentication path matched.
	Failure {
		/// The login that was attempted, if any.
		attempted_login: Option<String>,
		/// The token that was attempted, if any.
		attempted_token: Option<String>,
	},
}

impl AuthOutcome {
	/// Builds the success variant matching the superuser flag.
	pub fn success(login: impl Into<String>, token_auth: impl Into<String>, superuser: bool) -> Self {
		if superuser {
			AuthOutcome::SuccessSuperuser {
				login: login.into(),
				token_auth: token_auth.into(),
			}
		} else {
			AuthOutcome::Success {
				login: login.into(),
				token_auth: token_auth.into(),
			}
		}
	}

	/// Returns true for either success variant.
	pub fn is_success(&self) -> bool {
		matches!(
			self,
			AuthOutcome::Success { .. } | AuthOutcome::SuccessSuperuser { .. }
		)
	}

	/// Returns true if the outcome grants superuser access.
	pub fn is_superuser(&self) -> bool {
		matches!(self, AuthOutcome::SuccessSuperuser { .. })
	}

	/// The authenticated login, for success outcomes.
	pub fn login(&self) -> Option<&str> {
		match self {
			AuthOutcome::Success { login, .. } | AuthOutcome::SuccessSuperuser { login, .. } => {
				Some(login)
			}
			AuthOutcome::Failure { .. } => None,
		}
	}

	/// The issued token, for success outcomes.
	pub fn token_auth(&self) -> Option<&str> {
		match self {
			AuthOutcome::Success { token_auth, .. }
			| AuthOutcome::SuccessSuperuser { token_auth, .. } => Some(token_auth),
			AuthOutcome::Failure { .. } => None,
		}
	}
}
