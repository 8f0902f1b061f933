//! Geofence Library
//!
//! Great-circle distance between geographic points, membership checks
//! against a fixed list of circular danger zones, and the policy that turns
//! a geofence result plus the user's own choice into an alert decision.
//!
//! # Distance Model
//!
//! ```text
//! h = sin²(Δφ/2) + cos φ₁ · cos φ₂ · sin²(Δλ/2)
//! d = 2 · R · atan2(√h, √(1 − h))
//! ```
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | φ      | latitude (radians) |
//! | λ      | longitude (radians) |
//! | R      | 6371 km (mean Earth radius) |

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod policy;
pub mod registry;

pub use policy::{decide, Decision, ReasonCode};
pub use registry::{DangerZone, GeofenceRegistry, GeofenceResult};

/// Mean Earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("Latitude out of range [-90, 90]: {0}")]
    InvalidLatitude(f64),
    #[error("Longitude out of range [-180, 180]: {0}")]
    InvalidLongitude(f64),
    #[error("Invalid radius for zone {zone}: {radius_km} km")]
    InvalidRadius { zone: String, radius_km: f64 },
}

pub type Result<T> = std::result::Result<T, GeoError>;

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in km
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance(self, other)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Haversine distance between two points in km.
///
/// `h` is clamped to [0, 1] so rounding near the poles or the antimeridian
/// can never push the square roots out of their domain.
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_same_point_is_zero() {
        let vizag = coord(17.6868, 83.2185);
        assert_eq!(distance(&vizag, &vizag), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // NYC to London: ~5,570 km
        let dist = distance(&coord(40.7128, -74.006), &coord(51.5074, -0.1278));
        assert!((dist - 5570.0).abs() < 50.0);
    }

    #[test]
    fn test_antipodal_points() {
        let dist = distance(&coord(0.0, 0.0), &coord(0.0, 180.0));
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((dist - half_circumference).abs() < 1e-6);

        let poles = distance(&coord(90.0, 0.0), &coord(-90.0, 0.0));
        assert!((poles - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn test_antimeridian_is_short() {
        // Two points either side of the dateline, ~22 km apart
        let dist = distance(&coord(0.0, 179.9), &coord(0.0, -179.9));
        assert!(dist < 25.0, "got {dist}");
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(GeoError::InvalidLatitude(90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.01),
            Err(GeoError::InvalidLongitude(-180.01))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_accepts_bounds() {
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
    }

    #[test]
    fn test_display_matches_wire_format() {
        assert_eq!(coord(17.6868, 83.2185).to_string(), "17.6868, 83.2185");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Coordinate =
            serde_json::from_str(r#"{"latitude": 17.6868, "longitude": 83.2185}"#).unwrap();
        assert_eq!(ok.latitude(), 17.6868);

        let bad = serde_json::from_str::<Coordinate>(r#"{"latitude": 95.0, "longitude": 0.0}"#);
        assert!(bad.is_err());
    }

    fn coordinate_strategy() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| coord(lat, lon))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2000))]

        #[test]
        fn prop_distance_is_symmetric(a in coordinate_strategy(), b in coordinate_strategy()) {
            let ab = distance(&a, &b);
            let ba = distance(&b, &a);
            prop_assert!((ab - ba).abs() < 1e-9, "ab={} ba={}", ab, ba);
        }

        #[test]
        fn prop_distance_to_self_is_zero(a in coordinate_strategy()) {
            prop_assert_eq!(distance(&a, &a), 0.0);
        }

        #[test]
        fn prop_distance_is_bounded(a in coordinate_strategy(), b in coordinate_strategy()) {
            let d = distance(&a, &b);
            prop_assert!(d.is_finite());
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }
    }
}
