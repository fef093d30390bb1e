use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    LookupError,
    model::{Coordinates, DaySunData},
};

use super::{SunDataClient, get_body};

/// Client for the sunrisesunset.io JSON API.
#[derive(Debug, Clone)]
pub struct SunriseSunsetIo {
    http: Client,
    url: String,
}

impl SunriseSunsetIo {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    async fn fetch(&self, at: Coordinates, date: NaiveDate) -> Result<DaySunData> {
        let lat = at.latitude.to_string();
        let lng = at.longitude.to_string();
        let date = date.format("%Y-%m-%d").to_string();

        let body = get_body(
            &self.http,
            &self.url,
            &[
                ("lat", lat.as_str()),
                ("lng", lng.as_str()),
                ("date", date.as_str()),
                ("formatted", "0"),
            ],
            "sun data service",
        )
        .await?;

        parse_sun_data(&body)
    }
}

#[derive(Debug, Deserialize)]
struct SunEnvelope {
    results: Option<DaySunData>,
    status: Option<String>,
}

fn parse_sun_data(body: &str) -> Result<DaySunData> {
    let parsed: SunEnvelope =
        serde_json::from_str(body).context("Failed to parse sun data JSON")?;

    if let Some(status) = parsed.status.as_deref().filter(|s| *s != "OK") {
        return Err(anyhow!("Sun data service returned status {status}"));
    }

    parsed
        .results
        .ok_or_else(|| anyhow!("Sun data response contained no results"))
}

#[async_trait]
impl SunDataClient for SunriseSunsetIo {
    async fn sun_data(
        &self,
        at: Coordinates,
        date: NaiveDate,
    ) -> Result<DaySunData, LookupError> {
        let data = self
            .fetch(at, date)
            .await
            .map_err(|e| LookupError::SunDataUnavailable(LookupError::cause(&e)))?;

        debug!(%date, coordinates = %at, timezone = %data.timezone, "fetched sun data");
        Ok(data)
    }
}
