//! Danger zone registry and membership evaluation

use crate::{distance, Coordinate, GeoError, Result};
use serde::Serialize;
use tracing::debug;

/// A circular high-risk area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DangerZone {
    pub name: String,
    /// Human-readable address reported in place of the provider label on breach
    pub address: String,
    pub center: Coordinate,
    pub radius_km: f64,
}

impl DangerZone {
    /// Build a zone, rejecting negative or non-finite radii.
    ///
    /// A zero radius is allowed and matches only its exact center.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Self> {
        let name = name.into();
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(GeoError::InvalidRadius {
                zone: name,
                radius_km,
            });
        }
        Ok(Self {
            name,
            address: address.into(),
            center,
            radius_km,
        })
    }

    /// Inclusive boundary: a point exactly `radius_km` away is inside.
    pub fn contains(&self, point: &Coordinate) -> bool {
        distance(point, &self.center) <= self.radius_km
    }
}

/// Outcome of checking one position against every zone.
#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceResult<'a> {
    pub breached: bool,
    pub matched_zone: Option<&'a DangerZone>,
    /// Zone address on breach, otherwise the caller's fallback label
    pub effective_label: String,
}

impl<'a> GeofenceResult<'a> {
    pub fn clear(fallback_label: impl Into<String>) -> Self {
        Self {
            breached: false,
            matched_zone: None,
            effective_label: fallback_label.into(),
        }
    }

    pub fn breach(zone: &'a DangerZone) -> Self {
        Self {
            breached: true,
            matched_zone: Some(zone),
            effective_label: zone.address.clone(),
        }
    }
}

/// Read-only list of danger zones, kept in configuration order.
#[derive(Debug, Clone, Default)]
pub struct GeofenceRegistry {
    zones: Vec<DangerZone>,
}

impl GeofenceRegistry {
    pub fn new(zones: Vec<DangerZone>) -> Self {
        Self { zones }
    }

    pub fn zones(&self) -> &[DangerZone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// First zone in configuration order containing `point` wins.
    /// Overlapping zones are not ranked by distance.
    pub fn evaluate(&self, point: &Coordinate, fallback_label: &str) -> GeofenceResult<'_> {
        for zone in &self.zones {
            let dist = distance(point, &zone.center);
            debug!(
                "Zone {}: {:.3} km from center (radius {:.3} km)",
                zone.name, dist, zone.radius_km
            );
            if dist <= zone.radius_km {
                return GeofenceResult::breach(zone);
            }
        }
        GeofenceResult::clear(fallback_label)
    }
}
