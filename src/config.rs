//! Runtime settings for the editor and the search API client.
//!
//! Endpoint URLs are injected by the hosting page as meta tags, e.g.
//! `<meta name="qgc:search-url" content="https://example.org/query">`.
//! Missing or empty tags fall back to the defaults below.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::editor::DEFAULT_HISTORY_LIMIT;

/// Results shown per page of the result listing.
pub const DEFAULT_PAGE_SIZE: usize = 30;

const META_PREFIX: &str = "qgc:";

/// Behaviour of one [`GraphEditor`](crate::editor::GraphEditor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSettings {
	/// Reject edge labels missing from the predicate vocabulary.
	/// When false, any non-empty relation text is accepted.
	pub validate_predicates: bool,

	/// Undo steps kept before the oldest is dropped.
	pub history_limit: usize,
}

impl Default for EditorSettings {
	fn default() -> Self {
		Self {
			validate_predicates: true,
			history_limit: DEFAULT_HISTORY_LIMIT,
		}
	}
}

/// Backend endpoints consumed by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
	/// Origin relative endpoint paths are resolved against.
	pub base_url: String,
	/// Search endpoint.
	pub search_url: String,
	/// Autocomplete endpoint.
	pub autocomplete_url: String,
	/// Evidence sentence endpoint.
	pub provenance_url: String,
	/// Analytics endpoint.
	pub feedback_url: String,
	/// Entries requested per result page.
	pub page_size: usize,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: "http://localhost:8080".into(),
			search_url: "/query".into(),
			autocomplete_url: "/autocompletion".into(),
			provenance_url: "/provenance".into(),
			feedback_url: "/log".into(),
			page_size: DEFAULT_PAGE_SIZE,
		}
	}
}

impl ApiConfig {
	const KEYS: &'static [&'static str] = &[
		"base-url",
		"search-url",
		"autocomplete-url",
		"provenance-url",
		"feedback-url",
		"page-size",
	];

	/// Applies one `key = value` override. Unknown keys and unusable values
	/// are ignored.
	pub fn set(&mut self, key: &str, value: &str) {
		let value = value.trim();
		if value.is_empty() {
			return;
		}
		match key {
			"base-url" => self.base_url = value.to_string(),
			"search-url" => self.search_url = value.to_string(),
			"autocomplete-url" => self.autocomplete_url = value.to_string(),
			"provenance-url" => self.provenance_url = value.to_string(),
			"feedback-url" => self.feedback_url = value.to_string(),
			"page-size" => match value.parse::<usize>() {
				Ok(size) if size > 0 => self.page_size = size,
				_ => warn!("ignoring page size {:?}", value),
			},
			other => debug!("unknown config key {}", other),
		}
	}

	/// Defaults overridden by `qgc:*` meta tags of the current document.
	pub fn from_document() -> Self {
		let mut config = Self::default();
		let Some(window) = web_sys::window() else {
			return config;
		};
		if let Ok(origin) = window.location().origin() {
			config.set("base-url", &origin);
		}
		let Some(document) = window.document() else {
			return config;
		};
		for key in Self::KEYS {
			let selector = format!("meta[name=\"{}{}\"]", META_PREFIX, key);
			if let Ok(Some(meta)) = document.query_selector(&selector) {
				if let Some(content) = meta.get_attribute("content") {
					config.set(key, &content);
				}
			}
		}
		debug!("api config: {:?}", config);
		config
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn overrides_replace_defaults() {
		let mut config = ApiConfig::default();
		config.set("search-url", " https://example.org/query ");
		config.set("page-size", "50");
		assert_eq!(config.search_url, "https://example.org/query");
		assert_eq!(config.page_size, 50);
	}

	#[test]
	fn bad_values_keep_defaults() {
		let mut config = ApiConfig::default();
		config.set("page-size", "0");
		config.set("page-size", "many");
		config.set("search-url", "");
		config.set("colour", "red");
		assert_eq!(config, ApiConfig::default());
	}

	#[test]
	fn editor_settings_deserialize_from_json() {
		let settings: EditorSettings =
			serde_json::from_str(r#"{"validate_predicates":false,"history_limit":10}"#).unwrap();
		assert!(!settings.validate_predicates);
		assert_eq!(settings.history_limit, 10);
	}
}
