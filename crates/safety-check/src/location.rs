//! Position lookup
//!
//! Uses ip-api.com (free, no API key) for a coarse position. Any failure
//! falls back to a configured last-known position so the session always
//! continues.

use geofence::{Coordinate, GeoError};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// A position plus the label shown to the user and sent with alerts
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub label: String,
}

impl LocationFix {
    pub fn new(coordinate: Coordinate, label: impl Into<String>) -> Self {
        Self {
            coordinate,
            label: label.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Lookup timed out after {0:?}")]
    TimedOut(Duration),
    #[error("Provider returned status: {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Lookup failed: {0}")]
    LookupFailed(String),
    #[error("Provider returned invalid coordinates: {0}")]
    InvalidCoordinates(#[from] GeoError),
}

/// Source of the user's current position
pub trait LocationProvider {
    fn locate(&self) -> Result<LocationFix, LocationError>;
}

/// Always reports the same position
#[derive(Debug, Clone)]
pub struct FixedLocation {
    fix: LocationFix,
}

impl FixedLocation {
    pub fn new(fix: LocationFix) -> Self {
        Self { fix }
    }
}

impl LocationProvider for FixedLocation {
    fn locate(&self) -> Result<LocationFix, LocationError> {
        Ok(self.fix.clone())
    }
}

/// ip-api.com JSON response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region_name: Option<String>,
}

/// IP geolocation over blocking HTTP with a bounded timeout
pub struct IpApiLocator {
    client: reqwest::blocking::Client,
    url: String,
    timeout: Duration,
}

impl IpApiLocator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LocationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LocationError::RequestFailed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }
}

impl LocationProvider for IpApiLocator {
    fn locate(&self) -> Result<LocationFix, LocationError> {
        debug!("Requesting location from {}", self.url);

        let response = self.client.get(&self.url).send().map_err(|e| {
            if e.is_timeout() {
                LocationError::TimedOut(self.timeout)
            } else {
                LocationError::RequestFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(LocationError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| LocationError::ParseError(e.to_string()))?;

        parse_ip_api(&body)
    }
}

/// Parse an ip-api.com body into a fix labelled `"<city>, <region>"`
pub fn parse_ip_api(body: &str) -> Result<LocationFix, LocationError> {
    let data: IpApiResponse =
        serde_json::from_str(body).map_err(|e| LocationError::ParseError(e.to_string()))?;

    if data.status != "success" {
        return Err(LocationError::LookupFailed(
            data.message.unwrap_or(data.status),
        ));
    }

    let (lat, lon) = match (data.lat, data.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(LocationError::ParseError("missing lat/lon".to_string())),
    };
    let coordinate = Coordinate::new(lat, lon)?;

    let label = [data.city, data.region_name]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let label = if label.is_empty() {
        coordinate.to_string()
    } else {
        label
    };

    Ok(LocationFix::new(coordinate, label))
}

/// Ask the provider, substituting `fallback` on any failure
pub fn locate_or_fallback(provider: &dyn LocationProvider, fallback: &LocationFix) -> LocationFix {
    match provider.locate() {
        Ok(fix) => fix,
        Err(e) => {
            warn!("Location unavailable ({}), using {}", e, fallback.label);
            fallback.clone()
        }
    }
}
