//! BigDataCloud reverse geocoding backend
//!
//! Uses the free client-side endpoint, which needs no API key:
//! `GET <base_url>?latitude=..&longitude=..` answering with a JSON object
//! carrying `city`, `locality`, `countryName` and `countryCode`.

use crate::config::defaults::DEFAULT_TIMEOUT_SECS;
use crate::config::GeocodingConfig;
use crate::constants::api::{BIGDATACLOUD_REVERSE_URL, USER_AGENT};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::flag::is_country_code;
use crate::geo::{GeocodeBackend, GeocodeResult};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// BigDataCloud reverse geocoding backend
#[derive(Debug, Clone)]
pub struct BigDataCloudBackend {
    client: reqwest::Client,
    base_url: String,
}

impl BigDataCloudBackend {
    /// Create a backend pointing at the public endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(BIGDATACLOUD_REVERSE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a backend for a specific endpoint URL and request timeout
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Create a backend from the `[geocoding]` config section
    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        Self::with_base_url(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Endpoint this backend queries
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Normalize a response body
    ///
    /// A body that is not JSON is a transport problem; JSON without a usable
    /// country code means the point is not in any country.
    fn parse_response(body: &str) -> Result<GeocodeResult> {
        let data: Value = serde_json::from_str(body).map_err(|e| {
            Error::LookupTransport(format!("Failed to parse reverse geocoding response: {}", e))
        })?;

        let country_code = non_empty(&data, "countryCode")
            .filter(|code| is_country_code(code))
            .ok_or(Error::NotACity)?;

        let city_name = non_empty(&data, "city")
            .or_else(|| non_empty(&data, "locality"))
            .unwrap_or_default();

        Ok(GeocodeResult {
            city_name: city_name.to_string(),
            country_name: non_empty(&data, "countryName").unwrap_or_default().to_string(),
            country_code: country_code.to_string(),
        })
    }
}

/// String field of a JSON object, if present and not empty
fn non_empty<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

impl GeocodeBackend for BigDataCloudBackend {
    async fn reverse_geocode(&self, coords: Coordinates) -> Result<GeocodeResult> {
        debug!(lat = coords.lat, lng = coords.lng, url = %self.base_url, "reverse geocoding");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("latitude", coords.lat), ("longitude", coords.lng)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "reverse geocoding request failed");
                Error::LookupTransport(format!("Reverse geocoding request failed: {}", e))
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "reverse geocoding returned an error status");
            return Err(Error::LookupTransport(format!(
                "Reverse geocoding returned status: {}",
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            warn!(error = %e, "failed to read reverse geocoding response");
            Error::LookupTransport(format!("Failed to read reverse geocoding response: {}", e))
        })?;
        debug!(body = %body, "reverse geocoding response");

        let result = Self::parse_response(&body);
        if let Err(Error::NotACity) = &result {
            debug!(lat = coords.lat, lng = coords.lng, "point is not inside a country");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::{header, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

    const PARIS: &str = r#"{
        "latitude": 48.85,
        "longitude": 2.35,
        "city": "Paris",
        "locality": "Paris 4e Arrondissement",
        "countryName": "France",
        "countryCode": "FR",
        "continent": "Europe"
    }"#;

    /// Serve `body` with `status` on a local port, recording query parameters
    async fn spawn_endpoint(status: StatusCode, body: &'static str) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();

        let app = Router::new().route(
            "/data/reverse-geocode-client",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let recorder = recorder.clone();
                async move {
                    recorder.lock().unwrap().push(params);
                    (status, [(header::CONTENT_TYPE, "application/json")], body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/data/reverse-geocode-client", addr), seen)
    }

    fn backend(url: &str) -> BigDataCloudBackend {
        BigDataCloudBackend::with_base_url(url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_city() {
        let result = BigDataCloudBackend::parse_response(PARIS).unwrap();
        assert_eq!(result.city_name, "Paris");
        assert_eq!(result.country_name, "France");
        assert_eq!(result.country_code, "FR");
    }

    #[test]
    fn test_parse_locality_fallback() {
        let body = r#"{"city": "", "locality": "Ilha Grande", "countryName": "Brazil", "countryCode": "BR"}"#;
        let result = BigDataCloudBackend::parse_response(body).unwrap();
        assert_eq!(result.city_name, "Ilha Grande");
    }

    #[test]
    fn test_parse_no_city_or_locality() {
        let body = r#"{"countryName": "Greenland", "countryCode": "GL"}"#;
        let result = BigDataCloudBackend::parse_response(body).unwrap();
        assert_eq!(result.city_name, "");
        assert_eq!(result.country_name, "Greenland");
    }

    #[test]
    fn test_parse_missing_country_code() {
        let body = r#"{"city": "", "locality": "Atlantic Ocean", "countryName": "", "countryCode": ""}"#;
        let err = BigDataCloudBackend::parse_response(body).unwrap_err();
        assert!(matches!(err, Error::NotACity));
        assert_eq!(err.to_string(), "Isso não parece ser uma cidade.");
    }

    #[test]
    fn test_parse_unusable_shapes() {
        for body in [r#"[]"#, r#""FR""#, r#"{"countryCode": 33}"#, r#"{"countryCode": "FRA"}"#] {
            assert!(
                matches!(BigDataCloudBackend::parse_response(body), Err(Error::NotACity)),
                "{}",
                body
            );
        }
    }

    #[test]
    fn test_parse_not_json() {
        let err = BigDataCloudBackend::parse_response("<html>502</html>").unwrap_err();
        assert!(matches!(err, Error::LookupTransport(_)));
    }

    #[test]
    fn test_default_endpoint() {
        let backend = BigDataCloudBackend::new().unwrap();
        assert_eq!(backend.base_url(), BIGDATACLOUD_REVERSE_URL);
    }

    #[tokio::test]
    async fn test_reverse_geocode_sends_coordinates() {
        let (url, seen) = spawn_endpoint(StatusCode::OK, PARIS).await;

        let result = backend(&url)
            .reverse_geocode(Coordinates::new(48.85, 2.35))
            .await
            .unwrap();

        assert_eq!(result.city_name, "Paris");
        assert_eq!(result.country_code, "FR");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].get("latitude").map(String::as_str), Some("48.85"));
        assert_eq!(seen[0].get("longitude").map(String::as_str), Some("2.35"));
    }

    #[tokio::test]
    async fn test_reverse_geocode_open_ocean() {
        let (url, _) = spawn_endpoint(
            StatusCode::OK,
            r#"{"latitude": 0, "longitude": -30, "locality": "", "countryCode": ""}"#,
        )
        .await;

        let err = backend(&url)
            .reverse_geocode(Coordinates::new(0.0, -30.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotACity));
    }

    #[tokio::test]
    async fn test_reverse_geocode_error_status() {
        let (url, _) = spawn_endpoint(StatusCode::INTERNAL_SERVER_ERROR, "{}").await;

        let err = backend(&url)
            .reverse_geocode(Coordinates::new(1.0, 1.0))
            .await
            .unwrap_err();
        match err {
            Error::LookupTransport(msg) => assert!(msg.contains("500")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reverse_geocode_bad_body() {
        let (url, _) = spawn_endpoint(StatusCode::OK, "not json").await;

        let err = backend(&url)
            .reverse_geocode(Coordinates::new(1.0, 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LookupTransport(_)));
    }

    #[tokio::test]
    async fn test_reverse_geocode_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = backend(&format!("http://{}/reverse", addr))
            .reverse_geocode(Coordinates::new(1.0, 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LookupTransport(_)));
    }
}
