// Copyright (c) 2025 - Cowboy AI, Inc.

//! Geocode Resolver
//!
//! Resolves street addresses to coordinates (and back) through an external
//! provider. The shipped implementation talks to the Google Geocoding JSON
//! API:
//!
//! ```text
//! GET {base_url}/maps/api/geocode/json?address=..&key=..[&region=..][&language=..]
//! GET {base_url}/maps/api/geocode/json?latlng={lat},{lng}&key=..
//! ```
//!
//! "No result" and "provider failure" are distinct outcomes: the former is
//! `Ok(None)`, the latter a [`GeocodeError`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

/// Configuration for the geocoding provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Provider base URL
    pub base_url: String,

    /// Provider API key
    pub api_key: String,

    /// Default region bias (e.g. "vn")
    pub region: Option<String>,

    /// Default result language (e.g. "vi")
    pub language: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    10
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com".to_string(),
            api_key: String::new(),
            region: None,
            language: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Geocoding errors
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Transport or decoding failure
    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-OK status
    #[error("Geocoding failed: {status} - {message}")]
    Provider { status: String, message: String },

    /// Client could not be built
    #[error("Geocoding client configuration error: {0}")]
    Configuration(String),
}

/// Forward geocoding request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeocodeRequest {
    pub address: String,
    pub region: Option<String>,
    pub language: Option<String>,
}

impl GeocodeRequest {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }
}

/// A resolved location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub place_id: Option<String>,
    pub types: Vec<String>,
}

/// Address ↔ coordinate resolver
#[async_trait]
pub trait GeocodeResolver: Send + Sync {
    /// Resolve an address to its best match
    async fn resolve(&self, request: &GeocodeRequest) -> Result<Option<GeocodeResult>, GeocodeError>;

    /// Resolve coordinates to their best address match
    async fn reverse(&self, latitude: f64, longitude: f64)
        -> Result<Option<GeocodeResult>, GeocodeError>;
}

/// Google Geocoding API client
pub struct GoogleGeocoder {
    config: GeocodingConfig,
    client: Client,
}

impl GoogleGeocoder {
    /// Create a new client; the configured timeout bounds every request
    pub fn new(config: GeocodingConfig) -> Result<Self, GeocodeError> {
        if config.api_key.is_empty() {
            return Err(GeocodeError::Configuration(
                "Missing GOOGLE_MAPS_API_KEY".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                GeocodeError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Fill in the configured region/language where the request has none
    pub fn with_defaults(&self, request: &GeocodeRequest) -> GeocodeRequest {
        GeocodeRequest {
            address: request.address.clone(),
            region: request.region.clone().or_else(|| self.config.region.clone()),
            language: request
                .language
                .clone()
                .or_else(|| self.config.language.clone()),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/maps/api/geocode/json",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn fetch(&self, params: Vec<(&str, String)>) -> Result<Option<GeocodeResult>, GeocodeError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        let body: GoogleGeocodeResponse = response.json().await?;
        body.into_first_result()
    }
}

#[async_trait]
impl GeocodeResolver for GoogleGeocoder {
    async fn resolve(&self, request: &GeocodeRequest) -> Result<Option<GeocodeResult>, GeocodeError> {
        let request = self.with_defaults(request);
        let mut params = vec![
            ("address", request.address.clone()),
            ("key", self.config.api_key.clone()),
        ];
        if let Some(region) = request.region {
            params.push(("region", region));
        }
        if let Some(language) = request.language {
            params.push(("language", language));
        }

        debug!(address = %request.address, "Geocoding address");
        self.fetch(params).await.inspect_err(|e| {
            error!(address = %request.address, error = %e, "Geocoding failed");
        })
    }

    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<GeocodeResult>, GeocodeError> {
        let params = vec![
            ("latlng", format!("{},{}", latitude, longitude)),
            ("key", self.config.api_key.clone()),
        ];

        debug!(latitude, longitude, "Reverse geocoding");
        self.fetch(params).await.inspect_err(|e| {
            error!(latitude, longitude, error = %e, "Reverse geocoding failed");
        })
    }
}

/// Google Geocoding response envelope
#[derive(Debug, Deserialize)]
struct GoogleGeocodeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GoogleResult>,
}

impl GoogleGeocodeResponse {
    fn into_first_result(self) -> Result<Option<GeocodeResult>, GeocodeError> {
        match self.status.as_str() {
            "OK" => Ok(self.results.into_iter().next().map(GeocodeResult::from)),
            "ZERO_RESULTS" => Ok(None),
            _ => Err(GeocodeError::Provider {
                message: self.error_message.unwrap_or_default(),
                status: self.status,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleResult {
    formatted_address: String,
    geometry: GoogleGeometry,
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleGeometry {
    location: GoogleLatLng,
}

#[derive(Debug, Deserialize)]
struct GoogleLatLng {
    lat: f64,
    lng: f64,
}

impl From<GoogleResult> for GeocodeResult {
    fn from(result: GoogleResult) -> Self {
        Self {
            formatted_address: result.formatted_address,
            latitude: result.geometry.location.lat,
            longitude: result.geometry.location.lng,
            place_id: result.place_id,
            types: result.types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> GeocodingConfig {
        GeocodingConfig {
            base_url,
            api_key: "test-key".to_string(),
            region: Some("vn".to_string()),
            language: None,
            timeout_secs: 5,
        }
    }

    const OK_BODY: &str = r#"{
        "status": "OK",
        "results": [
            {
                "formatted_address": "1 Main St, Hanoi, Vietnam",
                "geometry": {"location": {"lat": 21.0285, "lng": 105.8542}},
                "place_id": "abc123",
                "types": ["street_address"]
            },
            {
                "formatted_address": "Second match",
                "geometry": {"location": {"lat": 0.0, "lng": 0.0}}
            }
        ]
    }"#;

    #[test]
    fn test_config_default() {
        let config = GeocodingConfig::default();
        assert_eq!(config.base_url, "https://maps.googleapis.com");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let result = GoogleGeocoder::new(GeocodingConfig::default());
        assert!(matches!(result, Err(GeocodeError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_resolve_returns_first_result() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/maps/api/geocode/json"))
            .and(query_param("address", "1 Main St"))
            .and(query_param("key", "test-key"))
            .and(query_param("region", "vn"))
            .respond_with(ResponseTemplate::new(200).set_body_string(OK_BODY))
            .expect(1)
            .mount(&mock_server)
            .await;

        let geocoder = GoogleGeocoder::new(test_config(mock_server.uri())).unwrap();
        let result = geocoder
            .resolve(&GeocodeRequest::new("1 Main St"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.formatted_address, "1 Main St, Hanoi, Vietnam");
        assert_eq!(result.latitude, 21.0285);
        assert_eq!(result.longitude, 105.8542);
        assert_eq!(result.place_id.as_deref(), Some("abc123"));
        assert_eq!(result.types, vec!["street_address"]);
    }

    #[tokio::test]
    async fn test_zero_results_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/maps/api/geocode/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"status": "ZERO_RESULTS", "results": []}"#),
            )
            .mount(&mock_server)
            .await;

        let geocoder = GoogleGeocoder::new(test_config(mock_server.uri())).unwrap();
        let result = geocoder
            .resolve(&GeocodeRequest::new("nowhere"))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_provider_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/maps/api/geocode/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#,
            ))
            .mount(&mock_server)
            .await;

        let geocoder = GoogleGeocoder::new(test_config(mock_server.uri())).unwrap();
        let err = geocoder
            .resolve(&GeocodeRequest::new("1 Main St"))
            .await
            .unwrap_err();

        match err {
            GeocodeError::Provider { status, message } => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message, "The provided API key is invalid.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_http_error_is_request_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let geocoder = GoogleGeocoder::new(test_config(mock_server.uri())).unwrap();
        let err = geocoder
            .resolve(&GeocodeRequest::new("1 Main St"))
            .await
            .unwrap_err();

        assert!(matches!(err, GeocodeError::Request(_)));
    }

    #[tokio::test]
    async fn test_reverse_geocode() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/maps/api/geocode/json"))
            .and(query_param("latlng", "21.0285,105.8542"))
            .respond_with(ResponseTemplate::new(200).set_body_string(OK_BODY))
            .expect(1)
            .mount(&mock_server)
            .await;

        let geocoder = GoogleGeocoder::new(test_config(mock_server.uri())).unwrap();
        let result = geocoder.reverse(21.0285, 105.8542).await.unwrap().unwrap();

        assert_eq!(result.formatted_address, "1 Main St, Hanoi, Vietnam");
    }

    #[test]
    fn test_request_overrides_configured_defaults() {
        let geocoder = GoogleGeocoder::new(test_config("http://localhost".to_string())).unwrap();
        let request = GeocodeRequest {
            address: "x".to_string(),
            region: Some("us".to_string()),
            language: Some("en".to_string()),
        };

        let merged = geocoder.with_defaults(&request);
        assert_eq!(merged.region.as_deref(), Some("us"));
        assert_eq!(merged.language.as_deref(), Some("en"));

        let merged = geocoder.with_defaults(&GeocodeRequest::new("x"));
        assert_eq!(merged.region.as_deref(), Some("vn"));
        assert_eq!(merged.language, None);
    }
}
