//! Sequencing of a single dashboard run:
//! resolve a place, fetch today and tomorrow concurrently, hand back a report.

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::{
    Config, LookupError,
    model::{Place, SunReport},
    provider::{
        GeocodeClient, GeolocationProvider, LocatorId, SunDataClient, build_http_client,
        default_locator_from_config, geocode::MapsCoGeocoder, locator_from_config,
        sunrise_sunset::SunriseSunsetIo,
    },
};

#[derive(Debug)]
pub struct SunDashboard {
    locator: Box<dyn GeolocationProvider>,
    geocoder: Box<dyn GeocodeClient>,
    sun: Box<dyn SunDataClient>,
}

impl SunDashboard {
    pub fn new(
        locator: Box<dyn GeolocationProvider>,
        geocoder: Box<dyn GeocodeClient>,
        sun: Box<dyn SunDataClient>,
    ) -> Self {
        Self { locator, geocoder, sun }
    }

    /// Wire the real services from config. `locator` overrides the configured default.
    pub fn from_config(config: &Config, locator: Option<LocatorId>) -> Result<Self> {
        let http = build_http_client(config)?;
        let locator = match locator {
            Some(id) => locator_from_config(id, config, http.clone())?,
            None => default_locator_from_config(config, http.clone())?,
        };

        Ok(Self::new(
            locator,
            Box::new(MapsCoGeocoder::new(
                http.clone(),
                config.geocode_url(),
                config.geocode.api_key.clone(),
            )),
            Box::new(SunriseSunsetIo::new(http, config.sun_data_url())),
        ))
    }

    /// "Use current location" run.
    pub async fn run_current_location(
        &self,
        today: NaiveDate,
    ) -> Result<SunReport, LookupError> {
        debug!("resolving current location");
        let place = self.locator.locate().await?;
        self.fetch_days(place, today).await
    }

    /// Free-text search run. Blank input fails without touching the network.
    pub async fn run_search(
        &self,
        query: &str,
        today: NaiveDate,
    ) -> Result<SunReport, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::InvalidInput);
        }

        debug!(query, "resolving location by search");
        let place = self.geocoder.geocode(query).await?;
        self.fetch_days(place, today).await
    }

    /// Fetch `today` and the following calendar day concurrently.
    ///
    /// Today's data is required; a failed tomorrow request is logged and the
    /// report carries `tomorrow: None`.
    pub async fn fetch_days(
        &self,
        place: Place,
        today: NaiveDate,
    ) -> Result<SunReport, LookupError> {
        let tomorrow = today.succ_opt().ok_or_else(|| {
            LookupError::SunDataUnavailable(format!("no calendar day after {today}"))
        })?;

        debug!(coordinates = %place.coordinates, %today, %tomorrow, "fetching sun data");
        let at = place.coordinates;
        let (today_res, tomorrow_res) =
            tokio::join!(self.sun.sun_data(at, today), self.sun.sun_data(at, tomorrow));

        let today_data = today_res?;
        let tomorrow_data = match tomorrow_res {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(error = %e, %tomorrow, "tomorrow's sun data unavailable; showing today only");
                None
            }
        };

        info!(
            coordinates = %place.coordinates,
            has_tomorrow = tomorrow_data.is_some(),
            "sun report ready"
        );

        Ok(SunReport { place, date: today, today: today_data, tomorrow: tomorrow_data })
    }
}
