// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The ambient attribute view injected by the federation layer.
//!
//! An upstream identity layer (typically a web-server module) injects
//! identity and group claims into the request environment before the
//! application runs. This trait is the explicit seam over that environment:
//! no implicit global lookup, the host passes its source into every call.

use std::collections::{BTreeMap, HashMap};

/// A flat key/value view of the ambient request attributes.
pub trait AttributeSource {
	/// The raw attribute value, or `None` when the key was never injected.
	///
	/// Presence matters to the authentication decision: an injected-but-empty
	/// login attribute and a missing one take different paths.
	fn get(&self, key: &str) -> Option<&str>;

	/// The attribute value with absence collapsed to the empty string.
	///
	/// This is the adapter-facing contract: absence is not an error, it is a
	/// valid "unauthenticated" signal handled upstream.
	fn value_or_empty(&self, key: &str) -> &str {
		self.get(key).unwrap_or("")
	}
}

impl AttributeSource for HashMap<String, String> {
	fn get(&self, key: &str) -> Option<&str> {
		HashMap::get(self, key).map(String::as_str)
	}
}

impl AttributeSource for BTreeMap<String, String> {
	fn get(&self, key: &str) -> Option<&str> {
		BTreeMap::get(self, key).map(String::as_str)
	}
}
