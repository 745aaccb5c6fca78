//! Intent resolution service.
//!
//! Turns raw text (plus an optional caller position) into a validated
//! [`QueryIntent`]. Total by contract: every failure mode of the model call,
//! the parse, or tag validation degrades to a usable intent rather than an
//! error.

use crate::llm::LlmProvider;
use crate::models::{QueryIntent, UserPosition, DEFAULT_RADIUS_KM};
use crate::tags::TagRegistry;
use std::sync::Arc;

/// Resolves free-text queries into structured intents.
pub struct IntentResolver {
    llm: Arc<dyn LlmProvider>,
    registry: Arc<dyn TagRegistry>,
}

impl IntentResolver {
    /// Creates a resolver over the given clients.
    pub fn new(llm: Arc<dyn LlmProvider>, registry: Arc<dyn TagRegistry>) -> Self {
        Self { llm, registry }
    }

    /// Resolves `text` into an intent. Never fails.
    ///
    /// Primary path: LLM interpretation, schema-validated, with the caller
    /// position injected when the model asked for "current location" and tag
    /// suggestions filtered through the registry.
    ///
    /// Fallback path (model error, malformed reply, schema violation): a
    /// minimal intent built from the raw text and position, plus a
    /// best-effort single-tag mapping that is kept only if the registry
    /// confirms it.
    pub fn resolve(&self, text: &str, position: Option<UserPosition>) -> QueryIntent {
        match self.llm.interpret_query(text, position) {
            Ok(intent) => self.finish_interpreted(intent, position),
            Err(e) => {
                tracing::warn!(
                    provider = self.llm.name(),
                    error = %e,
                    "Query interpretation failed; using fallback intent"
                );
                self.build_fallback(text, position)
            }
        }
    }

    /// Applies position injection and tag filtering to a parsed intent.
    fn finish_interpreted(
        &self,
        mut intent: QueryIntent,
        position: Option<UserPosition>,
    ) -> QueryIntent {
        if let (Some(location), Some(position)) = (intent.location.as_mut(), position) {
            if location.wants_current_position() {
                location.coordinates = Some(position);
                if location.radius.is_none() {
                    location.radius = Some(DEFAULT_RADIUS_KM);
                }
            }
        }

        intent.osm_tags.retain(|tag| {
            let valid = self.registry.validate(&tag.key, &tag.value);
            if !valid {
                tracing::warn!(
                    key = %tag.key,
                    value = %tag.value,
                    "Dropping tag that failed vocabulary validation"
                );
            }
            valid
        });

        intent
    }

    /// Builds the minimal fallback intent, with a best-effort tag mapping.
    fn build_fallback(&self, text: &str, position: Option<UserPosition>) -> QueryIntent {
        let mut intent = QueryIntent::fallback(text, position);

        match self.llm.map_term_to_tag(text) {
            Ok(tag) if self.registry.validate(&tag.key, &tag.value) => {
                tracing::debug!(key = %tag.key, value = %tag.value, "Fallback tag mapping accepted");
                intent.osm_tags.push(tag);
            }
            Ok(tag) => {
                tracing::debug!(
                    key = %tag.key,
                    value = %tag.value,
                    "Fallback tag mapping rejected by registry"
                );
            }
            Err(e) => {
                tracing::debug!(error = %e, "Fallback tag mapping unavailable");
            }
        }

        intent
    }
}
