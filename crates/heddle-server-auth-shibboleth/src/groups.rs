// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group-membership parsing and classification.
//!
//! The federation layer hands us one delimited string of group tokens
//! (typically LDAP DNs). Classification runs every configured rule against
//! every token: an unanchored regex match whose first capture group
//! participated emits that capture as a domain claim. Superuser membership
//! is a plain exact comparison - superuser group names carry no regex
//! semantics.

use heddle_server_auth::DomainClaim;

use crate::config::GroupRule;

/// Splits a raw group-membership string into tokens.
///
/// Splitting the empty string yields one empty token; it matches no rule in
/// practice and needs no special case.
pub fn split_groups<'a>(raw: &'a str, separator: &str) -> Vec<&'a str> {
	raw.split(separator).collect()
}

/// Extracts domain claims from group tokens.
///
/// Rules are applied in configuration order, and within each rule tokens
/// are scanned in membership order; the output preserves that order and
/// keeps duplicates. A match without a first capture contributes nothing.
pub fn match_domains(user_groups: &[&str], rules: &[GroupRule]) -> Vec<DomainClaim> {
	let mut claims = Vec::new();
	for rule in rules {
		for group in user_groups {
			if let Some(captures) = rule.regex.captures(group) {
				if let Some(domain) = captures.get(1) {
					claims.push(DomainClaim::new(domain.as_str()));
				}
			}
		}
	}
	claims
}

/// Whether any group token is an exact member of the superuser list.
pub fn is_member(user_groups: &[&str], superuser_groups: &[String]) -> bool {
	user_groups
		.iter()
		.any(|group| superuser_groups.iter().any(|name| name == group))
}
