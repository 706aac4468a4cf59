// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use heddle_server_auth::StoreError;

/// Errors that can occur during entitlement provisioning.
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
	#[error("store error: {0}")]
	Store(#[from] StoreError),
}
