//! Taginfo client.

use super::TagRegistry;
use crate::config::TagRegistryConfig;
use serde::Deserialize;
use std::time::Duration;

/// Client for the taginfo API.
///
/// Queries `/api/4/key/values` for all known values of a key and checks the
/// candidate value against them. Comparison is case-insensitive; taginfo data
/// is lowercase but LLM output casing is unreliable.
pub struct TaginfoClient {
    /// Base URL of the taginfo instance.
    base_url: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl TaginfoClient {
    /// Default taginfo instance.
    pub const DEFAULT_BASE_URL: &'static str = "https://taginfo.openstreetmap.org";

    /// Values fetched per key. Taginfo sorts by usage count, so the common
    /// vocabulary is at the front; values past this page are too rare to
    /// qualify a geocoding query anyway.
    const PAGE_SIZE: u32 = 200;

    /// Creates a client against the default instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            client: build_client(10_000),
        }
    }

    /// Creates a client from configuration.
    #[must_use]
    pub fn from_config(config: &TagRegistryConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            client: build_client(config.timeout_ms),
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches known values for a key.
    fn fetch_values(&self, key: &str) -> reqwest::Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/api/4/key/values", self.base_url))
            .query(&[
                ("key", key.to_string()),
                ("page", "1".to_string()),
                ("rp", Self::PAGE_SIZE.to_string()),
                ("sortname", "count".to_string()),
                ("sortorder", "desc".to_string()),
            ])
            .send()?
            .error_for_status()?;

        let body: KeyValuesResponse = response.json()?;
        Ok(body.data.into_iter().map(|entry| entry.value).collect())
    }
}

impl Default for TaginfoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TagRegistry for TaginfoClient {
    fn name(&self) -> &'static str {
        "taginfo"
    }

    fn validate(&self, key: &str, value: &str) -> bool {
        match self.fetch_values(key) {
            Ok(values) => {
                let known = values
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(value));
                if !known {
                    tracing::debug!(key, value, "Tag value not in registry vocabulary");
                }
                known
            }
            Err(e) => {
                tracing::warn!(
                    registry = "taginfo",
                    key,
                    value,
                    error = %e,
                    "Tag registry lookup failed; treating tag as unvalidated"
                );
                false
            }
        }
    }
}

fn build_client(timeout_ms: u64) -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .user_agent(concat!("wayfind/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!("Failed to build taginfo HTTP client: {err}");
            reqwest::blocking::Client::new()
        })
}

/// Response from `/api/4/key/values`.
#[derive(Debug, Deserialize)]
struct KeyValuesResponse {
    data: Vec<KeyValueEntry>,
}

/// One known value entry for a key.
#[derive(Debug, Deserialize)]
struct KeyValueEntry {
    value: String,
}
