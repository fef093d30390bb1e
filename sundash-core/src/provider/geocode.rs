use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    LookupError,
    model::{Coordinates, Place},
};

use super::{GeocodeClient, get_body};

/// Forward geocoding against geocode.maps.co (or a compatible endpoint).
#[derive(Debug, Clone)]
pub struct MapsCoGeocoder {
    http: Client,
    url: String,
    api_key: Option<String>,
}

impl MapsCoGeocoder {
    pub fn new(http: Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self { http, url: url.into(), api_key }
    }

    async fn search(&self, query: &str) -> Result<Option<Place>> {
        let mut params = vec![("q", query)];
        if let Some(key) = self.api_key.as_deref() {
            params.push(("api_key", key));
        }

        let body = get_body(&self.http, &self.url, &params, "geocoding service").await?;
        first_match(&body)
    }
}

/// The service sends coordinates as strings; accept plain numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn value(&self) -> Result<f64> {
        match self {
            Degrees::Number(n) => Ok(*n),
            Degrees::Text(s) => s
                .trim()
                .parse()
                .with_context(|| format!("Invalid coordinate value '{s}'")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    lat: Degrees,
    lon: Degrees,
    display_name: Option<String>,
}

fn first_match(body: &str) -> Result<Option<Place>> {
    let candidates: Vec<Candidate> =
        serde_json::from_str(body).context("Failed to parse geocoding JSON")?;

    let Some(first) = candidates.into_iter().next() else {
        return Ok(None);
    };

    let coordinates = Coordinates::new(first.lat.value()?, first.lon.value()?)
        .map_err(|e| anyhow!("Geocoding match has invalid coordinates: {e}"))?;

    Ok(Some(Place::new(coordinates, first.display_name)))
}

#[async_trait]
impl GeocodeClient for MapsCoGeocoder {
    async fn geocode(&self, query: &str) -> Result<Place, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::InvalidInput);
        }

        let found = self
            .search(query)
            .await
            .map_err(|e| LookupError::GeocodeUnavailable(LookupError::cause(&e)))?;

        let place = found.ok_or_else(|| LookupError::NoMatchFound(query.to_string()))?;
        debug!(query, coordinates = %place.coordinates, "geocoded");
        Ok(place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::test_server::{UNREACHABLE, serve_once};

    #[test]
    fn takes_first_candidate_with_string_coordinates() {
        let body = r#"[
            {"place_id": 1, "lat": "48.8588897", "lon": "2.3200410", "display_name": "Paris, France"},
            {"place_id": 2, "lat": "33.6617962", "lon": "-95.5555130", "display_name": "Paris, Texas"}
        ]"#;

        let place = first_match(body).unwrap().expect("one match");
        assert_eq!(place.coordinates.latitude, 48.8588897);
        assert_eq!(place.coordinates.longitude, 2.3200410);
        assert_eq!(place.label.as_deref(), Some("Paris, France"));
    }

    #[test]
    fn accepts_numeric_coordinates() {
        let body = r#"[{"lat": 51.5, "lon": -0.12}]"#;

        let place = first_match(body).unwrap().expect("one match");
        assert_eq!(place.coordinates.longitude, -0.12);
        assert!(place.label.is_none());
    }

    #[test]
    fn empty_array_is_no_match() {
        assert!(first_match("[]").unwrap().is_none());
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(first_match(r#"{"error": "rate limited"}"#).is_err());
        assert!(first_match(r#"[{"lat": "north", "lon": "1"}]"#).is_err());
    }

    #[tokio::test]
    async fn blank_query_is_rejected_before_any_request() {
        // Unroutable endpoint: a request would surface as GeocodeUnavailable.
        let geocoder = MapsCoGeocoder::new(Client::new(), UNREACHABLE, None);

        let err = geocoder.geocode("   ").await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidInput));
    }

    #[tokio::test]
    async fn unreachable_service_is_geocode_unavailable() {
        let geocoder = MapsCoGeocoder::new(Client::new(), UNREACHABLE, None);

        let err = geocoder.geocode("Paris").await.unwrap_err();
        assert!(
            matches!(err, LookupError::GeocodeUnavailable(ref c) if c.contains("geocoding service")),
            "{err}"
        );
    }

    #[tokio::test]
    async fn error_status_is_geocode_unavailable() {
        let url = serve_once("429 Too Many Requests", r#"{"error":"slow down"}"#).await;
        let geocoder = MapsCoGeocoder::new(Client::new(), url, Some("KEY".into()));

        let err = geocoder.geocode("Paris").await.unwrap_err();
        assert!(matches!(err, LookupError::GeocodeUnavailable(ref c) if c.contains("429")), "{err}");
    }

    #[tokio::test]
    async fn empty_result_is_no_match() {
        let url = serve_once("200 OK", "[]").await;
        let geocoder = MapsCoGeocoder::new(Client::new(), url, None);

        let err = geocoder.geocode(" Atlantis ").await.unwrap_err();
        assert!(matches!(err, LookupError::NoMatchFound(ref q) if q == "Atlantis"));
    }

    #[tokio::test]
    async fn first_match_is_returned_from_service() {
        let url = serve_once("200 OK", r#"[{"lat":"48.85","lon":"2.35","display_name":"Paris"}]"#).await;
        let geocoder = MapsCoGeocoder::new(Client::new(), url, None);

        let place = geocoder.geocode("Paris").await.unwrap();
        assert_eq!(place.label.as_deref(), Some("Paris"));
    }
}
