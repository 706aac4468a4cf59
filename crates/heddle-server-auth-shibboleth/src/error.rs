// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use heddle_server_auth::StoreError;
use heddle_server_provisioning::ProvisioningError;

/// Fatal configuration problems, surfaced at load time and never retried.
#[derive(Debug, thiserror::Error)]
pub enum ShibbolethConfigError {
	#[error("invalid group pattern {pattern:?}: {source}")]
	InvalidGroupPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("missing required option: {0}")]
	MissingOption(&'static str),
}

/// Errors that can occur while authenticating a request.
///
/// An exhausted authentication attempt is not an error - it is the normal
/// [`AuthOutcome::Failure`](heddle_server_auth::AuthOutcome) outcome.
#[derive(Debug, thiserror::Error)]
pub enum ShibbolethAuthError {
	#[error("store error: {0}")]
	Store(#[from] StoreError),

	#[error("provisioning error: {0}")]
	Provisioning(#[from] ProvisioningError),

	#[error("passwords for federated accounts are managed by the identity provider")]
	PasswordManagementUnsupported,
}
