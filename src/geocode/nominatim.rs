//! Nominatim search client.

use super::{GeocodeQuery, Geocoder};
use crate::config::GeocoderConfig;
use crate::models::SearchResult;
use crate::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// Client for the Nominatim search API.
///
/// Nominatim's usage policy requires an identifying User-Agent; the client
/// always sends one.
pub struct NominatimClient {
    /// Base URL of the Nominatim instance.
    base_url: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    /// Default public instance.
    pub const DEFAULT_BASE_URL: &'static str = "https://nominatim.openstreetmap.org";

    /// Creates a client against the default public instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            client: build_client(10_000, None),
        }
    }

    /// Creates a client from configuration.
    #[must_use]
    pub fn from_config(config: &GeocoderConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            client: build_client(config.timeout_ms, config.user_agent.as_deref()),
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for NominatimClient {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    fn search(&self, query: &GeocodeQuery) -> Result<Vec<SearchResult>> {
        let mut params = vec![
            ("q".to_string(), query.q()),
            ("format".to_string(), "json".to_string()),
            ("limit".to_string(), query.limit.to_string()),
        ];
        if let Some(viewbox) = &query.viewbox {
            params.push(("viewbox".to_string(), viewbox.as_param()));
            if query.bounded {
                params.push(("bounded".to_string(), "1".to_string()));
            }
        }

        tracing::debug!(
            provider = "nominatim",
            q = %query.q(),
            limit = query.limit,
            bounded = query.bounded,
            "Executing geocoding query"
        );

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&params)
            .send()
            .map_err(|e| {
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else {
                    "request"
                };
                tracing::error!(
                    provider = "nominatim",
                    error = %e,
                    error_kind = error_kind,
                    "Geocoding request failed"
                );
                Error::OperationFailed {
                    operation: "nominatim_search".to_string(),
                    cause: format!("{error_kind} error: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(
                provider = "nominatim",
                status = %status,
                "Geocoding API returned error status"
            );
            return Err(Error::OperationFailed {
                operation: "nominatim_search".to_string(),
                cause: format!("API returned status: {status}"),
            });
        }

        let places: Vec<NominatimPlace> =
            response.json().map_err(|e| Error::OperationFailed {
                operation: "nominatim_response".to_string(),
                cause: e.to_string(),
            })?;

        Ok(places
            .into_iter()
            .filter_map(NominatimPlace::into_search_result)
            .collect())
    }
}

fn build_client(timeout_ms: u64, user_agent: Option<&str>) -> reqwest::blocking::Client {
    let default_agent = concat!("wayfind/", env!("CARGO_PKG_VERSION"));
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .user_agent(user_agent.unwrap_or(default_agent))
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!("Failed to build geocoder HTTP client: {err}");
            reqwest::blocking::Client::new()
        })
}

/// One place object from the Nominatim search response.
///
/// Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    osm_id: Option<i64>,
    #[serde(default)]
    osm_type: Option<String>,
    place_id: i64,
}

impl NominatimPlace {
    /// Converts a provider place into a search result, dropping entries with
    /// unparseable coordinates.
    fn into_search_result(self) -> Option<SearchResult> {
        let latitude = self.lat.parse::<f64>().ok();
        let longitude = self.lon.parse::<f64>().ok();
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            tracing::warn!(
                provider = "nominatim",
                place_id = self.place_id,
                "Dropping place with unparseable coordinates"
            );
            return None;
        };
        Some(SearchResult {
            latitude,
            longitude,
            display_name: self.display_name,
            source_id: self
                .osm_id
                .map_or_else(|| self.place_id.to_string(), |id| id.to_string()),
            source_type: self.osm_type.unwrap_or_else(|| "place".to_string()),
            distance_km: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = NominatimClient::new();
        assert_eq!(client.name(), "nominatim");
        assert_eq!(client.base_url, NominatimClient::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_place_conversion() {
        let body = r#"[{
            "place_id": 12345,
            "lat": "40.7484",
            "lon": "-73.9857",
            "display_name": "Empire State Building, New York",
            "osm_id": 34633854,
            "osm_type": "way"
        }]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(body).unwrap();
        let results: Vec<SearchResult> = places
            .into_iter()
            .filter_map(NominatimPlace::into_search_result)
            .collect();
        assert_eq!(results.len(), 1);
        assert!((results[0].latitude - 40.7484).abs() < 1e-9);
        assert_eq!(results[0].source_id, "34633854");
        assert_eq!(results[0].source_type, "way");
    }

    #[test]
    fn test_place_without_osm_id_uses_place_id() {
        let body = r#"[{
            "place_id": 99,
            "lat": "1.0",
            "lon": "2.0",
            "display_name": "Somewhere"
        }]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(body).unwrap();
        let result = places
            .into_iter()
            .filter_map(NominatimPlace::into_search_result)
            .next()
            .unwrap();
        assert_eq!(result.source_id, "99");
        assert_eq!(result.source_type, "place");
    }

    #[test]
    fn test_unparseable_coordinates_dropped() {
        let body = r#"[{
            "place_id": 1,
            "lat": "not-a-number",
            "lon": "2.0",
            "display_name": "Broken"
        }]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(body).unwrap();
        assert!(places
            .into_iter()
            .filter_map(NominatimPlace::into_search_result)
            .next()
            .is_none());
    }
}
