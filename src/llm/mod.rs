//! LLM client abstraction.
//!
//! Provides a unified interface for the language-model calls the pipeline
//! makes: query interpretation and bare-term tag mapping. The model is an
//! untrusted oracle; every reply is extracted, strict-parsed, and
//! schema-validated here before anything downstream sees it.

mod openai;
pub mod system_prompt;

pub use openai::OpenAiClient;
pub use system_prompt::{INTERPRET_QUERY_PROMPT, TAG_MAPPING_PROMPT, build_interpret_user_message};

use crate::models::{OsmTag, QueryIntent, UserPosition};
use crate::{Error, Result};
use std::time::Duration;

/// Trait for LLM providers.
pub trait LlmProvider: Send + Sync {
    /// The provider name.
    fn name(&self) -> &'static str;

    /// Generates a completion for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails.
    fn complete(&self, prompt: &str) -> Result<String>;

    /// Generates a completion with a system prompt.
    ///
    /// Default implementation concatenates system and user prompts.
    /// Providers should override this to use native system prompt support.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails.
    fn complete_with_system(&self, system: &str, user: &str) -> Result<String> {
        let combined = format!("{system}\n\n---\n\nUser message:\n{user}");
        self.complete(&combined)
    }

    /// Interprets a free-text query into a structured, schema-validated
    /// intent.
    ///
    /// The returned intent has passed structural validation only; tag
    /// vocabulary verification happens at the resolver, which owns the
    /// registry client.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails, the reply is not JSON, or
    /// the parsed intent fails schema validation. Callers recover by
    /// constructing the fallback intent.
    fn interpret_query(
        &self,
        text: &str,
        position: Option<UserPosition>,
    ) -> Result<QueryIntent> {
        let user = build_interpret_user_message(text, position);
        let response = self.complete_with_system(INTERPRET_QUERY_PROMPT, &user)?;
        parse_query_intent(&response)
    }

    /// Maps a bare search term to a single OSM `{key, value}` tag.
    ///
    /// Used only on the fallback path; the caller must still run the tag
    /// through registry validation before trusting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails or the reply does not parse
    /// to a tag pair.
    fn map_term_to_tag(&self, term: &str) -> Result<OsmTag> {
        let user = format!("Map this search term to one OSM tag:\n\n{term}");
        let response = self.complete_with_system(TAG_MAPPING_PROMPT, &user)?;
        parse_tag_mapping(&response)
    }
}

/// HTTP client configuration for LLM providers.
#[derive(Debug, Clone, Copy)]
pub struct LlmHttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for LlmHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl LlmHttpConfig {
    /// Loads HTTP configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Loads HTTP configuration from config file settings.
    #[must_use]
    pub fn from_config(config: &crate::config::LlmConfig) -> Self {
        let mut settings = Self::default();
        if let Some(timeout_ms) = config.timeout_ms {
            settings.timeout_ms = timeout_ms;
        }
        if let Some(connect_timeout_ms) = config.connect_timeout_ms {
            settings.connect_timeout_ms = connect_timeout_ms;
        }
        settings
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("WAYFIND_LLM_TIMEOUT_MS") {
            if let Ok(timeout_ms) = v.parse::<u64>() {
                self.timeout_ms = timeout_ms;
            }
        }
        if let Ok(v) = std::env::var("WAYFIND_LLM_CONNECT_TIMEOUT_MS") {
            if let Ok(connect_timeout_ms) = v.parse::<u64>() {
                self.connect_timeout_ms = connect_timeout_ms;
            }
        }
        self
    }
}

/// Builds a blocking HTTP client for LLM requests with configured timeouts.
#[must_use]
pub fn build_http_client(config: LlmHttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build LLM HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}

/// Parses a query-intent reply from LLM output.
///
/// Handles markdown code fences, strict-parses the JSON, and runs schema
/// validation before returning.
pub fn parse_query_intent(response: &str) -> Result<QueryIntent> {
    let json_str = extract_json_from_response(response);
    let intent: QueryIntent =
        serde_json::from_str(json_str).map_err(|e| Error::InvalidInput(format!(
            "intent reply is not valid JSON: {e}"
        )))?;
    intent.validate()?;
    Ok(intent)
}

/// Parses a single-tag mapping reply from LLM output.
pub fn parse_tag_mapping(response: &str) -> Result<OsmTag> {
    let json_str = extract_json_from_response(response);
    let tag: OsmTag = serde_json::from_str(json_str).map_err(|e| Error::InvalidInput(format!(
        "tag mapping reply is not valid JSON: {e}"
    )))?;
    if tag.key.trim().is_empty() || tag.value.trim().is_empty() {
        return Err(Error::InvalidInput(
            "tag mapping must have non-empty key and value".into(),
        ));
    }
    Ok(tag)
}

/// Extracts JSON from LLM response, handling markdown code blocks.
fn extract_json_from_response(response: &str) -> &str {
    let trimmed = response.trim();

    // Handle ```json ... ``` blocks
    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    // Handle ``` ... ``` blocks (without json marker)
    if let Some(start) = trimmed.find("```") {
        let content_start = start + 3;
        // Skip language identifier if present (e.g., "json\n")
        let after_marker = &trimmed[content_start..];
        let json_start = after_marker
            .find('{')
            .map_or(content_start, |pos| content_start + pos);
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    // Handle raw JSON (find first { to last })
    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_raw() {
        let response = r#"{"searchTerm": "coffee"}"#;
        assert_eq!(extract_json_from_response(response), response);
    }

    #[test]
    fn test_extract_json_markdown() {
        let response = "```json\n{\"searchTerm\": \"coffee\"}\n```";
        let json = extract_json_from_response(response);
        assert!(json.contains("searchTerm"));
        assert!(!json.contains("```"));
    }

    #[test]
    fn test_extract_json_with_prose_prefix() {
        let response = "Here is the result: {\"searchTerm\": \"coffee\"} hope this helps";
        assert_eq!(
            extract_json_from_response(response),
            r#"{"searchTerm": "coffee"}"#
        );
    }

    #[test]
    fn test_parse_query_intent_success() {
        let response = r#"{
            "searchTerm": "Italian restaurants",
            "location": {"type": "current"},
            "osmTags": [{"key": "cuisine", "value": "italian"}]
        }"#;
        let intent = parse_query_intent(response).unwrap();
        assert_eq!(intent.search_term, "Italian restaurants");
        assert_eq!(intent.osm_tags.len(), 1);
    }

    #[test]
    fn test_parse_query_intent_rejects_prose() {
        assert!(parse_query_intent("I could not interpret that query.").is_err());
    }

    #[test]
    fn test_parse_query_intent_rejects_schema_violation() {
        // Parses as JSON but fails validation (empty term).
        assert!(parse_query_intent(r#"{"searchTerm": ""}"#).is_err());
    }

    #[test]
    fn test_parse_tag_mapping_success() {
        let tag = parse_tag_mapping(r#"{"key": "amenity", "value": "cafe"}"#).unwrap();
        assert_eq!(tag.key, "amenity");
        assert_eq!(tag.value, "cafe");
    }

    #[test]
    fn test_parse_tag_mapping_rejects_blank_fields() {
        assert!(parse_tag_mapping(r#"{"key": "", "value": "cafe"}"#).is_err());
    }

    #[test]
    fn test_http_config_defaults() {
        let config = LlmHttpConfig::default();
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.connect_timeout_ms, 3_000);
    }
}
