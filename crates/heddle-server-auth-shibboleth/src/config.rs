// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shibboleth provider configuration.
//!
//! The host owns configuration storage (an INI-style `[Shibboleth]` section)
//! and hands the raw key/value pairs to [`ShibbolethConfig::from_options`];
//! every option has a documented default. Group patterns are compiled once
//! per configuration load via [`ShibbolethConfig::compile`] and the compiled
//! rules are reused for every request - compiling inside the match loop is
//! exactly the hot spot this layout avoids.

use regex::Regex;
use std::collections::BTreeMap;

use crate::error::ShibbolethConfigError;
use crate::groups::split_groups;

/// Option: delete accounts that lost every entitlement (`0`).
pub const OPT_DELETE_OLD_USER: &str = "delete_old_user";
/// Option: attribute carrying the group membership string (`memberOf`).
pub const OPT_GROUP_ATTRIBUTE: &str = "shibboleth_group";
/// Option: separator between group tokens and between patterns (`;`).
pub const OPT_GROUP_SEPARATOR: &str = "shibboleth_group_separator";
/// Option: admin group patterns (`CN=(.*),OU=Groups,DC=organization`).
pub const OPT_ADMIN_GROUPS: &str = "shibboleth_groups_admin";
/// Option: superuser group names (`CN=admin,OU=Groups,DC=organization`).
pub const OPT_SUPERUSER_GROUPS: &str = "shibboleth_groups_superuser";
/// Option: view group patterns (`CN=(.*),OU=Groups,DC=organization`).
pub const OPT_VIEW_GROUPS: &str = "shibboleth_groups_view";
/// Option: the Shibboleth handler path (`/Shibboleth.sso`).
pub const OPT_HANDLER_PATH: &str = "shibboleth_handler_path";
/// Option: attribute carrying the email address (`mail`).
pub const OPT_EMAIL_ATTRIBUTE: &str = "shibboleth_user_email";
/// Option: attribute carrying the login (`uid`).
pub const OPT_LOGIN_ATTRIBUTE: &str = "shibboleth_user_login";

/// Typed view of the `[Shibboleth]` option section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShibbolethConfig {
	/// Delete accounts that lost every entitlement. Superusers are exempt.
	pub delete_old_users: bool,
	/// Attribute key carrying the raw group membership string.
	pub group_attribute: String,
	/// Separator between group tokens, and between configured patterns.
	pub group_separator: String,
	/// Separator-delimited regex patterns classifying admin groups.
	pub admin_group_patterns: String,
	/// Separator-delimited exact group names granting superuser access.
	pub superuser_groups: String,
	/// Separator-delimited regex patterns classifying view groups.
	pub view_group_patterns: String,
	/// Path (or absolute URL) of the Shibboleth handler.
	pub handler_path: String,
	/// Attribute key carrying the email address.
	pub email_attribute: String,
	/// Attribute key carrying the login.
	pub login_attribute: String,
}

impl Default for ShibbolethConfig {
	fn default() -> Self {
		Self {
			delete_old_users: false,
			group_attribute: "memberOf".to_string(),
			group_separator: ";".to_string(),
			admin_group_patterns: "CN=(.*),OU=Groups,DC=organization".to_string(),
			superuser_groups: "CN=admin,OU=Groups,DC=organization".to_string(),
			view_group_patterns: "CN=(.*),OU=Groups,DC=organization".to_string(),
			handler_path: "/Shibboleth.sso".to_string(),
			email_attribute: "mail".to_string(),
			login_attribute: "uid".to_string(),
		}
	}
}

impl ShibbolethConfig {
	/// Builds the configuration from raw option values, applying the
	/// documented default for every missing key.
	pub fn from_options(options: &BTreeMap<String, String>) -> Self {
		let defaults = Self::default();
		let value = |key: &str, default: String| -> String {
			options.get(key).cloned().unwrap_or(default)
		};

		Self {
			delete_old_users: options
				.get(OPT_DELETE_OLD_USER)
				.map(|raw| parse_flag(raw))
				.unwrap_or(defaults.delete_old_users),
			group_attribute: value(OPT_GROUP_ATTRIBUTE, defaults.group_attribute),
			group_separator: value(OPT_GROUP_SEPARATOR, defaults.group_separator),
			admin_group_patterns: value(OPT_ADMIN_GROUPS, defaults.admin_group_patterns),
			superuser_groups: value(OPT_SUPERUSER_GROUPS, defaults.superuser_groups),
			view_group_patterns: value(OPT_VIEW_GROUPS, defaults.view_group_patterns),
			handler_path: value(OPT_HANDLER_PATH, defaults.handler_path),
			email_attribute: value(OPT_EMAIL_ATTRIBUTE, defaults.email_attribute),
			login_attribute: value(OPT_LOGIN_ATTRIBUTE, defaults.login_attribute),
		}
	}

	/// Compiles the group patterns into reusable matching rules.
	///
	/// An invalid pattern is fatal: it surfaces immediately as
	/// [`ShibbolethConfigError::InvalidGroupPattern`] and is never swallowed.
	pub fn compile(&self) -> Result<CompiledGroupRules, ShibbolethConfigError> {
		if self.group_separator.is_empty() {
			return Err(ShibbolethConfigError::MissingOption(OPT_GROUP_SEPARATOR));
		}

		Ok(CompiledGroupRules {
			view: compile_patterns(&self.view_group_patterns, &self.group_separator)?,
			admin: compile_patterns(&self.admin_group_patterns, &self.group_separator)?,
			superuser_groups: split_groups(&self.superuser_groups, &self.group_separator)
				.into_iter()
				.map(str::to_string)
				.collect(),
		})
	}

	/// The handler URL: an absolute handler path passes through, a relative
	/// one is joined onto `base`.
	pub fn handler_url(&self, base: &str) -> String {
		let path = self.handler_path.trim_matches('/');
		if path.starts_with("http://") || path.starts_with("https://") {
			path.to_string()
		} else {
			format!("{}/{}", base.trim_end_matches('/'), path)
		}
	}

	/// Where the host redirects to start a Shibboleth login.
	pub fn login_url(&self, base: &str) -> String {
		format!("{}/Login", self.handler_url(base))
	}

	/// Where the host redirects to end the Shibboleth session.
	pub fn logout_url(&self, base: &str) -> String {
		format!("{}/Logout", self.handler_url(base))
	}
}

/// One compiled group-classification rule.
#[derive(Debug, Clone)]
pub struct GroupRule {
	/// The configured pattern, kept for diagnostics.
	pub pattern: String,
	/// The compiled matcher, reused across requests.
	pub regex: Regex,
}

/// The compiled classification rules for one configuration load.
#[derive(Debug, Clone)]
pub struct CompiledGroupRules {
	/// Rules extracting view domains.
	pub view: Vec<GroupRule>,
	/// Rules extracting admin domains.
	pub admin: Vec<GroupRule>,
	/// Exact group names granting superuser access (no regex semantics).
	pub superuser_groups: Vec<String>,
}

fn compile_patterns(
	raw: &str,
	separator: &str,
) -> Result<Vec<GroupRule>, ShibbolethConfigError> {
	split_groups(raw, separator)
		.into_iter()
		.map(|pattern| {
			Regex::new(pattern)
				.map(|regex| GroupRule {
					pattern: pattern.to_string(),
					regex,
				})
				.map_err(|source| ShibbolethConfigError::InvalidGroupPattern {
					pattern: pattern.to_string(),
					source,
				})
		})
		.collect()
}

fn parse_flag(raw: &str) -> bool {
	let raw = raw.trim();
	raw == "1" || raw.eq_ignore_ascii_case("true")
}
