// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shibboleth federated authentication for Heddle.
//!
//! An upstream Shibboleth service provider authenticates the user and
//! injects identity attributes (login, email, group memberships) into the
//! request environment. This crate turns those attributes into a login
//! outcome:
//!
//! - [`ShibbolethConfig`] - the option section with documented defaults and
//!   one-time group-pattern compilation
//! - [`ShibbolethAdapter`] - extracts identity claims and classifies groups
//!   into view/admin/superuser access claims
//! - [`ShibbolethAuthenticator`] - the authentication decision: session
//!   fast path, entitlement reconciliation, token fallback
//!
//! Password management is deliberately unsupported: federated credentials
//! live in the identity provider, and every attempt to set one here fails
//! with [`ShibbolethAuthError::PasswordManagementUnsupported`].

pub mod adapter;
pub mod authenticator;
pub mod config;
pub mod error;
pub mod groups;

pub use adapter::ShibbolethAdapter;
pub use authenticator::ShibbolethAuthenticator;
pub use config::{CompiledGroupRules, GroupRule, ShibbolethConfig};
pub use error::{ShibbolethAuthError, ShibbolethConfigError};
