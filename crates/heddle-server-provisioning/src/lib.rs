// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Entitlement reconciliation for federated logins.
//!
//! Every federated login carries a freshly classified set of group claims.
//! The [`Provisioner`] brings the persistent account store in line with
//! those claims: it resolves claimed domains to site IDs through the
//! [`SiteRegistry`](heddle_server_auth::SiteRegistry), diffs the result
//! against stored entitlements, and applies minimal create/delete/grant/
//! revoke operations.
//!
//! Reconciliation is not transactional. A collaborator failure part-way
//! through leaves the account partially synced; the error propagates so the
//! caller can retry the whole authentication attempt.

pub mod entitlements;
pub mod error;
pub mod provisioner;
pub mod urls;

pub use entitlements::{access_diff, AccessDiff, ResolvedEntitlements};
pub use error::ProvisioningError;
pub use provisioner::{Provisioner, ProvisioningPolicy};
pub use urls::candidate_urls;
