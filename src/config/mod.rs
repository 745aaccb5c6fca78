//! Configuration management.
//!
//! Layered: built-in defaults, then an optional TOML config file, then
//! `WAYFIND_*` environment overrides. Clients are constructed once from the
//! resolved config; nothing reads configuration after construction.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration for wayfind.
#[derive(Debug, Clone, Default)]
pub struct WayfindConfig {
    /// LLM provider configuration.
    pub llm: LlmConfig,
    /// Geocoding provider configuration.
    pub geocoder: GeocoderConfig,
    /// Tag registry configuration.
    pub tags: TagRegistryConfig,
    /// Pipeline paging configuration.
    pub search: SearchConfig,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    /// Model name (provider default when unset).
    pub model: Option<String>,
    /// API key; falls back to `OPENAI_API_KEY` at client construction.
    pub api_key: Option<String>,
    /// Endpoint for OpenAI-compatible gateways (provider default when unset).
    pub endpoint: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,
}

/// Geocoding provider configuration.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Base URL of the Nominatim instance.
    pub base_url: String,
    /// User-Agent override (Nominatim policy requires an identifying agent).
    pub user_agent: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: None,
            timeout_ms: 10_000,
        }
    }
}

/// Tag registry configuration.
#[derive(Debug, Clone)]
pub struct TagRegistryConfig {
    /// Base URL of the taginfo instance.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for TagRegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://taginfo.openstreetmap.org".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Pipeline paging configuration.
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Default result page size.
    pub page_size: usize,
    /// Page size once the caller asks for more.
    pub expanded_page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: crate::models::DEFAULT_PAGE_SIZE,
            expanded_page_size: crate::models::EXPANDED_PAGE_SIZE,
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// LLM section.
    pub llm: Option<ConfigFileLlm>,
    /// Geocoder section.
    pub geocoder: Option<ConfigFileGeocoder>,
    /// Tag registry section.
    pub tags: Option<ConfigFileTags>,
    /// Search section.
    pub search: Option<ConfigFileSearch>,
}

/// LLM section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLlm {
    /// Model name.
    pub model: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Endpoint.
    pub endpoint: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,
}

/// Geocoder section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileGeocoder {
    /// Base URL.
    pub base_url: Option<String>,
    /// User-Agent.
    pub user_agent: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Tag registry section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileTags {
    /// Base URL.
    pub base_url: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Search section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileSearch {
    /// Default page size.
    pub page_size: Option<usize>,
    /// Expanded page size.
    pub expanded_page_size: Option<usize>,
}

impl WayfindConfig {
    /// Loads configuration: defaults, then the config file (explicit path or
    /// the default location), then environment overrides.
    ///
    /// A missing file is fine; a present-but-malformed file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let file_path = path.map_or_else(Self::default_path, |p| Some(p.to_path_buf()));
        if let Some(file_path) = file_path {
            if file_path.exists() {
                let contents =
                    std::fs::read_to_string(&file_path).map_err(|e| Error::OperationFailed {
                        operation: "read_config".to_string(),
                        cause: format!("{}: {e}", file_path.display()),
                    })?;
                let file: ConfigFile =
                    toml::from_str(&contents).map_err(|e| Error::InvalidInput(format!(
                        "malformed config {}: {e}",
                        file_path.display()
                    )))?;
                config.apply_file(file);
            }
        }

        Ok(config.with_env_overrides())
    }

    /// Default config file location (`~/.config/wayfind/wayfind.toml` on
    /// Linux).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "zircote", "wayfind")
            .map(|dirs| dirs.config_dir().join("wayfind.toml"))
    }

    /// Merges parsed file sections over the current values.
    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(llm) = file.llm {
            self.llm.model = llm.model.or(self.llm.model.take());
            self.llm.api_key = llm.api_key.or(self.llm.api_key.take());
            self.llm.endpoint = llm.endpoint.or(self.llm.endpoint.take());
            self.llm.timeout_ms = llm.timeout_ms.or(self.llm.timeout_ms);
            self.llm.connect_timeout_ms = llm.connect_timeout_ms.or(self.llm.connect_timeout_ms);
        }
        if let Some(geocoder) = file.geocoder {
            if let Some(base_url) = geocoder.base_url {
                self.geocoder.base_url = base_url;
            }
            self.geocoder.user_agent = geocoder.user_agent.or(self.geocoder.user_agent.take());
            if let Some(timeout_ms) = geocoder.timeout_ms {
                self.geocoder.timeout_ms = timeout_ms;
            }
        }
        if let Some(tags) = file.tags {
            if let Some(base_url) = tags.base_url {
                self.tags.base_url = base_url;
            }
            if let Some(timeout_ms) = tags.timeout_ms {
                self.tags.timeout_ms = timeout_ms;
            }
        }
        if let Some(search) = file.search {
            if let Some(page_size) = search.page_size {
                self.search.page_size = page_size;
            }
            if let Some(expanded_page_size) = search.expanded_page_size {
                self.search.expanded_page_size = expanded_page_size;
            }
        }
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("WAYFIND_LLM_MODEL") {
            self.llm.model = Some(v);
        }
        if let Ok(v) = std::env::var("WAYFIND_LLM_ENDPOINT") {
            self.llm.endpoint = Some(v);
        }
        if let Ok(v) = std::env::var("WAYFIND_GEOCODER_URL") {
            self.geocoder.base_url = v;
        }
        if let Ok(v) = std::env::var("WAYFIND_TAGINFO_URL") {
            self.tags.base_url = v;
        }
        if let Ok(v) = std::env::var("WAYFIND_PAGE_SIZE") {
            if let Ok(page_size) = v.parse::<usize>() {
                self.search.page_size = page_size;
            }
        }
        self
    }
}
