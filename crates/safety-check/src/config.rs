//! Configuration loading from JSON files
//!
//! Every field has a default, so a partial file (or no file at all) is a
//! valid configuration. Zones are validated up front: a danger zone that
//! cannot be evaluated is a configuration error, never skipped.

use crate::location::LocationFix;
use alert_dispatch::Contact;
use geofence::{Coordinate, DangerZone, GeoError, GeofenceRegistry};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_ALERT_ENDPOINT: &str =
    "https://womensafetyapp-4e313-default-rtdb.firebaseio.com/alerts.json";
pub const DEFAULT_LOCATION_URL: &str = "http://ip-api.com/json/";
pub const DEFAULT_TIMEOUT_SEC: u64 = 5;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid danger zone {name:?}: {source}")]
    InvalidZone { name: String, source: GeoError },
    #[error("Invalid {what} location: {source}")]
    InvalidLocation { what: &'static str, source: GeoError },
    #[error("Timeout for {0} must be at least 1 second")]
    ZeroTimeout(&'static str),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// A danger zone as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
}

/// A position with its display label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixConfig {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

impl FixConfig {
    fn to_fix(&self, what: &'static str) -> Result<LocationFix> {
        let coordinate = Coordinate::new(self.lat, self.lon)
            .map_err(|source| ConfigError::InvalidLocation { what, source })?;
        Ok(LocationFix::new(coordinate, self.label.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// IP geolocation endpoint
    pub provider_url: String,
    pub timeout_sec: u64,
    /// Used whenever the provider fails or times out
    pub fallback: FixConfig,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            provider_url: DEFAULT_LOCATION_URL.to_string(),
            timeout_sec: DEFAULT_TIMEOUT_SEC,
            fallback: FixConfig {
                lat: 17.6868,
                lon: 83.2185,
                label: "Visakhapatnam (Offline Mode)".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub alert_endpoint: String,
    pub submit_timeout_sec: u64,
    pub location: LocationConfig,
    /// Skips the network lookup and always reports this position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_location: Option<FixConfig>,
    /// Evaluated in this order; the first containing zone wins
    pub danger_zones: Vec<ZoneConfig>,
    /// Notified in this order
    pub contacts: Vec<Contact>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            alert_endpoint: DEFAULT_ALERT_ENDPOINT.to_string(),
            submit_timeout_sec: DEFAULT_TIMEOUT_SEC,
            location: LocationConfig::default(),
            fixed_location: None,
            danger_zones: vec![ZoneConfig {
                name: "Dark Alleyway 1".to_string(),
                address: "Beach Road Area, Visakhapatnam".to_string(),
                lat: 17.6868,
                lon: 83.2185,
                radius_km: 1.0,
            }],
            contacts: vec![
                Contact::new("Mom", "+91-XXXXX-XXXXX"),
                Contact::new("Local Police Station", "100 / 112"),
            ],
        }
    }
}

impl AppConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {:?}", path);

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: AppConfig = serde_json::from_reader(reader)?;
        config.validate()?;

        info!(
            "Loaded {} danger zones and {} contacts",
            config.danger_zones.len(),
            config.contacts.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.submit_timeout_sec == 0 {
            return Err(ConfigError::ZeroTimeout("alert submission"));
        }
        if self.location.timeout_sec == 0 {
            return Err(ConfigError::ZeroTimeout("location lookup"));
        }
        self.registry()?;
        self.fallback_fix()?;
        self.fixed_fix()?;
        Ok(())
    }

    /// Build the zone registry, preserving file order
    pub fn registry(&self) -> Result<GeofenceRegistry> {
        let zones = self
            .danger_zones
            .iter()
            .map(|z| {
                Coordinate::new(z.lat, z.lon)
                    .and_then(|center| {
                        DangerZone::new(z.name.clone(), z.address.clone(), center, z.radius_km)
                    })
                    .map_err(|source| ConfigError::InvalidZone {
                        name: z.name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(GeofenceRegistry::new(zones))
    }

    pub fn fallback_fix(&self) -> Result<LocationFix> {
        self.location.fallback.to_fix("fallback")
    }

    pub fn fixed_fix(&self) -> Result<Option<LocationFix>> {
        self.fixed_location
            .as_ref()
            .map(|f| f.to_fix("fixed"))
            .transpose()
    }
}
