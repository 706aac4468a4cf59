// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account-store row shapes consumed by the authentication flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The stored account record for a login.
///
/// This is the read shape returned by [`crate::UserStore::find_user_by_token`];
/// it never carries a plaintext credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
	/// The unique login of the account.
	pub login: String,
	/// The account's email address.
	pub email: String,
	/// The opaque token used for token-based API authentication.
	pub token_auth: String,
	/// Whether the account has superuser access.
	pub superuser_access: bool,
}

/// Payload for creating an account during provisioning.
///
/// Federated accounts have no locally managed password; `credential_hash`
/// holds the hash of a random placeholder secret that is never surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
	/// The unique login of the account.
	pub login: String,
	/// Hash of the placeholder credential.
	pub credential_hash: String,
	/// The account's email address.
	pub email: String,
	/// When the account was provisioned.
	pub created_at: DateTime<Utc>,
}
