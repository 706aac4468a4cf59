// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token and placeholder-credential generation.
//!
//! Federated accounts never hold a locally managed password. Provisioning
//! stores the hash of a short random placeholder secret, and every
//! successful federated login issues a fresh opaque `token_auth` for
//! subsequent API calls.

use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

/// Length of a generated `token_auth` value in hex characters.
pub const TOKEN_AUTH_LEN: usize = 32;

/// Length of a generated placeholder credential.
const PLACEHOLDER_CREDENTIAL_LEN: usize = 8;

/// Generate an opaque token for API authentication (32 hex characters).
pub fn generate_token_auth() -> String {
	let mut bytes = [0u8; TOKEN_AUTH_LEN / 2];
	rand::thread_rng().fill(&mut bytes);
	hex::encode(bytes)
}

/// Generate the random placeholder secret stored for a federated account.
///
/// The value is hashed before storage and never surfaced to anyone.
pub fn generate_placeholder_credential() -> String {
	rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(PLACEHOLDER_CREDENTIAL_LEN)
		.map(char::from)
		.collect()
}

/// SHA-256 hex digest of a credential.
pub fn credential_hash(secret: &str) -> String {
	hex::encode(Sha256::digest(secret.as_bytes()))
}
