// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Extraction of identity and group claims from the ambient attributes.

use heddle_server_auth::{AccessClaims, AttributeSource, IdentityClaims};

use crate::config::{CompiledGroupRules, ShibbolethConfig};
use crate::error::ShibbolethConfigError;
use crate::groups::{is_member, match_domains, split_groups};

/// Reads Shibboleth-injected attributes and classifies group claims.
///
/// Built once per configuration load; the compiled rules are reused for
/// every request.
#[derive(Debug, Clone)]
pub struct ShibbolethAdapter {
	login_attribute: String,
	email_attribute: String,
	group_attribute: String,
	group_separator: String,
	rules: CompiledGroupRules,
}

impl ShibbolethAdapter {
	/// Builds the adapter, compiling the configured group patterns.
	pub fn new(config: &ShibbolethConfig) -> Result<Self, ShibbolethConfigError> {
		Ok(Self {
			login_attribute: config.login_attribute.clone(),
			email_attribute: config.email_attribute.clone(),
			group_attribute: config.group_attribute.clone(),
			group_separator: config.group_separator.clone(),
			rules: config.compile()?,
		})
	}

	/// The identity the federation layer asserted for this request.
	///
	/// Absent attributes resolve to empty strings; absence is handled by the
	/// authentication decision, not here.
	pub fn identity(&self, attrs: &dyn AttributeSource) -> IdentityClaims {
		IdentityClaims {
			username: attrs.value_or_empty(&self.login_attribute).to_string(),
			email: attrs.value_or_empty(&self.email_attribute).to_string(),
		}
	}

	/// Classifies the raw group attribute into view/admin/superuser claims.
	pub fn access_claims(&self, attrs: &dyn AttributeSource) -> AccessClaims {
		let raw = attrs.value_or_empty(&self.group_attribute);
		let groups = split_groups(raw, &self.group_separator);

		AccessClaims {
			view_domains: match_domains(&groups, &self.rules.view),
			admin_domains: match_domains(&groups, &self.rules.admin),
			superuser: is_member(&groups, &self.rules.superuser_groups),
		}
	}
}
