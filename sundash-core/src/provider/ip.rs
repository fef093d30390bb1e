use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    LookupError,
    model::{Coordinates, Place},
};

use super::{GeolocationProvider, get_body};

/// Approximates the device position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpLocator {
    http: Client,
    url: String,
}

impl IpLocator {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    async fn fetch(&self) -> Result<Place> {
        let body = get_body(&self.http, &self.url, &[], "IP geolocation service").await?;
        parse_ip_location(&body)
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    country: Option<String>,
}

fn parse_ip_location(body: &str) -> Result<Place> {
    let parsed: IpApiResponse =
        serde_json::from_str(body).context("Failed to parse IP geolocation JSON")?;

    if parsed.status != "success" {
        return Err(anyhow!(
            "IP geolocation lookup failed: {}",
            parsed.message.as_deref().unwrap_or(parsed.status.as_str())
        ));
    }

    let (lat, lon) = parsed
        .lat
        .zip(parsed.lon)
        .ok_or_else(|| anyhow!("IP geolocation response has no coordinates"))?;
    let coordinates = Coordinates::new(lat, lon)?;

    let label = match (parsed.city, parsed.country) {
        (Some(city), Some(country)) => Some(format!("{city}, {country}")),
        (city, country) => city.or(country),
    };

    Ok(Place::new(coordinates, label))
}

#[async_trait]
impl GeolocationProvider for IpLocator {
    async fn locate(&self) -> Result<Place, LookupError> {
        let place = self
            .fetch()
            .await
            .map_err(|e| LookupError::LocationUnavailable(LookupError::cause(&e)))?;

        debug!(coordinates = %place.coordinates, label = ?place.label, "located via IP");
        Ok(place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::test_server::{UNREACHABLE, serve_once};

    #[test]
    fn parses_successful_lookup() {
        let body = r#"{"status":"success","country":"France","city":"Paris","lat":48.8566,"lon":2.3522}"#;
        let place = parse_ip_location(body).unwrap();

        assert_eq!(place.coordinates, Coordinates { latitude: 48.8566, longitude: 2.3522 });
        assert_eq!(place.label.as_deref(), Some("Paris, France"));
    }

    #[test]
    fn failed_status_carries_message() {
        let body = r#"{"status":"fail","message":"private range"}"#;
        let err = parse_ip_location(body).unwrap_err();

        assert!(err.to_string().contains("private range"));
    }

    #[test]
    fn missing_coordinates_is_an_error() {
        let body = r#"{"status":"success","city":"Nowhere"}"#;
        assert!(parse_ip_location(body).is_err());
    }

    #[tokio::test]
    async fn unreachable_service_is_location_unavailable() {
        let locator = IpLocator::new(Client::new(), UNREACHABLE);

        let err = locator.locate().await.unwrap_err();
        assert!(matches!(err, LookupError::LocationUnavailable(_)), "{err}");
        assert_eq!(err.user_message(), "Error getting current location.");
    }

    #[tokio::test]
    async fn failed_lookup_is_location_unavailable() {
        let url = serve_once("200 OK", r#"{"status":"fail","message":"reserved range"}"#).await;
        let locator = IpLocator::new(Client::new(), url);

        let err = locator.locate().await.unwrap_err();
        assert!(matches!(err, LookupError::LocationUnavailable(ref c) if c.contains("reserved range")));
    }
}
