use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    model::{Coordinates, Place},
    provider::LocatorId,
};

pub const DEFAULT_GEOCODE_URL: &str = "https://geocode.maps.co/search";
pub const DEFAULT_SUN_DATA_URL: &str = "https://api.sunrisesunset.io/json";
pub const DEFAULT_IP_LOCATION_URL: &str = "http://ip-api.com/json/";

/// Geocoding service settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeocodeConfig {
    pub api_key: Option<String>,
}

/// A fixed location used by the `home` locator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub label: Option<String>,
}

impl HomeConfig {
    pub fn to_place(&self) -> Result<Place> {
        let coordinates = Coordinates::new(self.latitude, self.longitude)
            .context("Invalid home location in config")?;
        Ok(Place::new(coordinates, self.label.clone()))
    }
}

/// Endpoint overrides; unset fields use the public services.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Endpoints {
    pub geocode_url: Option<String>,
    pub sun_data_url: Option<String>,
    pub ip_location_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default locator id, "ip" or "home".
    pub default_locator: Option<String>,

    /// Request timeout in seconds; reqwest's default applies when absent.
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub geocode: GeocodeConfig,

    /// Example TOML:
    /// [home]
    /// latitude = 48.85
    /// longitude = 2.35
    /// label = "Paris"
    pub home: Option<HomeConfig>,

    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Config {
    /// Return the default locator as a strongly-typed LocatorId, falling back to `ip`.
    pub fn default_locator_id(&self) -> Result<LocatorId> {
        match self.default_locator.as_deref() {
            Some(s) => LocatorId::try_from(s),
            None => Ok(LocatorId::Ip),
        }
    }

    pub fn set_default_locator(&mut self, id: LocatorId) {
        self.default_locator = Some(id.as_str().to_string());
    }

    /// Replace the home location.
    pub fn set_home(&mut self, place: &Place) {
        self.home = Some(HomeConfig {
            latitude: place.coordinates.latitude,
            longitude: place.coordinates.longitude,
            label: place.label.clone(),
        });
    }

    pub fn set_geocode_api_key(&mut self, api_key: Option<String>) {
        self.geocode.api_key = api_key.filter(|k| !k.trim().is_empty());
    }

    pub fn geocode_url(&self) -> &str {
        self.endpoints.geocode_url.as_deref().unwrap_or(DEFAULT_GEOCODE_URL)
    }

    pub fn sun_data_url(&self) -> &str {
        self.endpoints.sun_data_url.as_deref().unwrap_or(DEFAULT_SUN_DATA_URL)
    }

    pub fn ip_location_url(&self) -> &str {
        self.endpoints.ip_location_url.as_deref().unwrap_or(DEFAULT_IP_LOCATION_URL)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.default_locator_id()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "sundash", "sundash-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
