//! The search pipeline service.
//!
//! Sole entry point of the crate: intent resolution, query synthesis, the
//! three-tier geocode fallback ladder, and distance ranking, run strictly
//! sequentially per invocation. Stateless between calls; concurrent callers
//! need no locking, and superseding stale in-flight results is the
//! presentation layer's job.

use super::IntentResolver;
use crate::config::SearchConfig;
use crate::geocode::{rank, synthesize, GeocodeQuery, Geocoder, FULL_LIMIT, LAST_RESORT_LIMIT};
use crate::llm::LlmProvider;
use crate::models::{ResultSet, SearchResult, UserPosition};
use crate::tags::TagRegistry;
use std::sync::Arc;

/// One search invocation.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// The user's literal input.
    pub query: String,
    /// Caller position, when geolocation succeeded upstream.
    pub position: Option<UserPosition>,
    /// Whether the caller asked for the expanded page size.
    pub expanded: bool,
}

impl SearchRequest {
    /// Creates a request with default paging.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            position: None,
            expanded: false,
        }
    }

    /// Sets the caller position.
    #[must_use]
    pub const fn with_position(mut self, position: UserPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Requests the expanded page size.
    #[must_use]
    pub const fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }
}

/// Service running the full query-interpretation-and-resolution pipeline.
pub struct SearchService {
    intents: IntentResolver,
    geocoder: Arc<dyn Geocoder>,
    config: SearchConfig,
}

impl SearchService {
    /// Creates the service over injected clients.
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        registry: Arc<dyn TagRegistry>,
        geocoder: Arc<dyn Geocoder>,
        config: SearchConfig,
    ) -> Self {
        Self {
            intents: IntentResolver::new(llm, registry),
            geocoder,
            config,
        }
    }

    /// Runs one search. Never fails; an exhausted fallback ladder yields an
    /// empty result set, which the presentation layer reports as "no
    /// locations found".
    #[must_use]
    pub fn search(&self, request: &SearchRequest) -> ResultSet {
        let intent = self.intents.resolve(&request.query, request.position);
        tracing::info!(
            search_term = %intent.search_term,
            tags = intent.osm_tags.len(),
            bounded = intent.coordinates().is_some(),
            "Resolved search intent"
        );

        let query = synthesize(&intent);
        let places = self.resolve_places(&query, &request.query);

        let page_size = if request.expanded {
            self.config.expanded_page_size
        } else {
            self.config.page_size
        };
        ResultSet::new(rank(places, request.position, page_size), page_size)
    }

    /// The three-tier geocode fallback ladder.
    ///
    /// Tier 1 is the full synthesized query. Tier 2 (after a tier-1 error or
    /// empty result) is the plain raw text without tags or viewbox. Tier 3
    /// (plain text, reduced limit) runs only when tier 1 raised an error.
    fn resolve_places(&self, query: &GeocodeQuery, raw_text: &str) -> Vec<SearchResult> {
        let tier1 = self.geocoder.search(query);
        let tier1_errored = tier1.is_err();
        match tier1 {
            Ok(results) if !results.is_empty() => return results,
            Ok(_) => {
                tracing::info!(q = %query.q(), "Full query returned no results; trying plain term");
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.geocoder.name(),
                    error = %e,
                    "Full query failed; trying plain term"
                );
            }
        }

        let plain = GeocodeQuery::plain(raw_text, FULL_LIMIT);
        match self.geocoder.search(&plain) {
            Ok(results) if !results.is_empty() => return results,
            Ok(_) => {
                tracing::info!(q = %plain.q(), "Plain query returned no results");
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.geocoder.name(),
                    error = %e,
                    "Plain query failed"
                );
            }
        }

        if tier1_errored {
            let last_resort = GeocodeQuery::plain(raw_text, LAST_RESORT_LIMIT);
            match self.geocoder.search(&last_resort) {
                Ok(results) => return results,
                Err(e) => {
                    tracing::error!(
                        provider = self.geocoder.name(),
                        error = %e,
                        "Last-resort query failed; returning empty result set"
                    );
                }
            }
        }

        Vec::new()
    }
}
