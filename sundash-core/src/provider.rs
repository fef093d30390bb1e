use crate::{
    Config, LookupError,
    model::{Coordinates, DaySunData, Place},
    provider::{home::HomeLocator, ip::IpLocator},
};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug};

pub mod geocode;
pub mod home;
pub mod ip;
pub mod sunrise_sunset;

/// Resolves the user's current position.
#[async_trait]
pub trait GeolocationProvider: Send + Sync + Debug {
    async fn locate(&self) -> Result<Place, LookupError>;
}

/// Turns a free-text query into a place.
#[async_trait]
pub trait GeocodeClient: Send + Sync + Debug {
    async fn geocode(&self, query: &str) -> Result<Place, LookupError>;
}

/// Fetches sunrise/sunset data for one date.
#[async_trait]
pub trait SunDataClient: Send + Sync + Debug {
    async fn sun_data(
        &self,
        at: Coordinates,
        date: NaiveDate,
    ) -> Result<DaySunData, LookupError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorId {
    Ip,
    Home,
}

impl LocatorId {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocatorId::Ip => "ip",
            LocatorId::Home => "home",
        }
    }

    pub const fn all() -> &'static [LocatorId] {
        &[LocatorId::Ip, LocatorId::Home]
    }
}

impl std::fmt::Display for LocatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LocatorId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "ip" => Ok(LocatorId::Ip),
            "home" => Ok(LocatorId::Home),
            _ => Err(anyhow!("Unknown locator '{value}'. Supported locators: ip, home.")),
        }
    }
}

/// HTTP client shared by all providers, honouring the configured timeout.
pub fn build_http_client(config: &Config) -> anyhow::Result<Client> {
    let mut builder = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }

    builder.build().context("Failed to build HTTP client")
}

/// Construct a locator from config and explicit LocatorId.
pub fn locator_from_config(
    id: LocatorId,
    config: &Config,
    http: Client,
) -> anyhow::Result<Box<dyn GeolocationProvider>> {
    let boxed: Box<dyn GeolocationProvider> = match id {
        LocatorId::Ip => Box::new(IpLocator::new(http, config.ip_location_url())),
        LocatorId::Home => Box::new(HomeLocator::new(config.home.clone())),
    };

    Ok(boxed)
}

/// Construct the default locator from config, using the `default_locator` field.
pub fn default_locator_from_config(
    config: &Config,
    http: Client,
) -> anyhow::Result<Box<dyn GeolocationProvider>> {
    let id = config.default_locator_id()?;
    locator_from_config(id, config, http)
}

/// GET `url` and return the body, failing on transport errors and non-2xx statuses.
pub(crate) async fn get_body(
    http: &Client,
    url: &str,
    query: &[(&str, &str)],
    service: &str,
) -> anyhow::Result<String> {
    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .with_context(|| format!("Failed to send request to {service}"))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {service} response body"))?;

    if !status.is_success() {
        return Err(anyhow!(
            "{service} request failed with status {}: {}",
            status,
            truncate_body(&body),
        ));
    }

    Ok(body)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, HomeConfig};

    #[test]
    fn locator_id_as_str_roundtrip() {
        for id in LocatorId::all() {
            let s = id.as_str();
            let parsed = LocatorId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn locator_id_is_case_insensitive() {
        assert_eq!(LocatorId::try_from("HOME").unwrap(), LocatorId::Home);
    }

    #[test]
    fn unknown_locator_error() {
        let err = LocatorId::try_from("gps").unwrap_err();
        assert!(err.to_string().contains("Unknown locator"));
    }

    #[tokio::test]
    async fn invalid_home_surfaces_when_locating() {
        let cfg = Config {
            home: Some(HomeConfig { latitude: 0.0, longitude: 500.0, label: None }),
            ..Default::default()
        };

        let locator = locator_from_config(LocatorId::Home, &cfg, Client::new()).unwrap();
        let err = locator.locate().await.unwrap_err();
        assert!(err.to_string().contains("Invalid home location"));
    }

    #[tokio::test]
    async fn get_body_rejects_non_success_status() {
        let url = test_server::serve_once("503 Service Unavailable", "upstream overloaded").await;

        let err = get_body(&Client::new(), &url, &[], "test service").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("test service request failed with status 503"), "{msg}");
        assert!(msg.contains("upstream overloaded"), "{msg}");
    }

    #[tokio::test]
    async fn get_body_returns_success_body() {
        let url = test_server::serve_once("200 OK", "[]").await;

        let body = get_body(&Client::new(), &url, &[("q", "x")], "test service").await.unwrap();
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn get_body_reports_connection_failure() {
        let err = get_body(&Client::new(), test_server::UNREACHABLE, &[], "test service")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to send request to test service"));
    }

    #[test]
    fn default_locator_from_config_works_without_config() {
        let cfg = Config::default();
        assert!(default_locator_from_config(&cfg, Client::new()).is_ok());
    }

    #[test]
    fn build_http_client_applies_timeout() {
        let cfg = Config { timeout_secs: Some(3), ..Default::default() };
        assert!(build_http_client(&cfg).is_ok());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);

        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
