use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A point on Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build coordinates, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> anyhow::Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            anyhow::bail!("Latitude {latitude} is outside the range -90..=90");
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            anyhow::bail!("Longitude {longitude} is outside the range -180..=180");
        }

        Ok(Self { latitude, longitude })
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Resolved location for a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub coordinates: Coordinates,
    /// Human-readable name shown next to the timezone, if one is known.
    pub label: Option<String>,
}

impl Place {
    pub fn new(coordinates: Coordinates, label: Option<String>) -> Self {
        Self { coordinates, label }
    }
}

/// Solar events for one location and one date, as returned by the service.
///
/// Times are kept as the literal strings the service sent; they are displayed
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySunData {
    pub sunrise: String,
    pub sunset: String,
    pub dawn: String,
    pub dusk: String,
    pub day_length: String,
    pub solar_noon: String,
    pub timezone: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_light: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_light: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub golden_hour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<i64>,
}

/// Everything a single run produced: today's data and, when the service
/// delivered it, tomorrow's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunReport {
    pub place: Place,
    pub date: NaiveDate,
    pub today: DaySunData,
    pub tomorrow: Option<DaySunData>,
}

impl SunReport {
    pub fn tomorrow_date(&self) -> NaiveDate {
        self.date.succ_opt().unwrap_or(self.date)
    }
}
