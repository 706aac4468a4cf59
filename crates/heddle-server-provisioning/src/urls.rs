// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Candidate URL forms for resolving a claimed domain against the registry.

/// The URL forms queried for one claimed domain.
///
/// Returns the literal claim first, then the four scheme/`www.` variants of
/// its host. Sites may be registered under any of these forms; the registry
/// lookup unions matches across all of them.
pub fn candidate_urls(url: &str) -> Vec<String> {
	let mut host = url;
	for scheme in ["http://", "https://"] {
		if let Some(stripped) = host.strip_prefix(scheme) {
			host = stripped;
		}
	}
	let host = host.strip_prefix("www.").unwrap_or(host);

	vec![
		url.to_string(),
		format!("http://{host}"),
		format!("http://www.{host}"),
		format!("https://{host}"),
		format!("https://www.{host}"),
	]
}
