//! Alert trigger policy
//!
//! Combines the user's explicit SOS choice with the geofence result.
//! Manual intent always wins the reported reason, even when the user is
//! also inside a danger zone: the reason decides which message responders
//! and trusted contacts receive.

use crate::GeofenceResult;
use serde::{Deserialize, Serialize};

/// Why an alert was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonCode {
    #[serde(rename = "Manual Trigger")]
    Manual,
    #[serde(rename = "Geofence Breach")]
    GeofenceBreach,
}

impl ReasonCode {
    /// Wire label sent as `alert_type`
    pub fn label(&self) -> &'static str {
        match self {
            Self::Manual => "Manual Trigger",
            Self::GeofenceBreach => "Geofence Breach",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Alert(ReasonCode),
    NoAlert,
}

impl Decision {
    pub fn should_alert(&self) -> bool {
        matches!(self, Self::Alert(_))
    }

    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            Self::Alert(reason) => Some(*reason),
            Self::NoAlert => None,
        }
    }
}

/// Alert when the user asked for it or the geofence was breached.
pub fn decide(manual_trigger: bool, geofence: &GeofenceResult<'_>) -> Decision {
    if manual_trigger {
        Decision::Alert(ReasonCode::Manual)
    } else if geofence.breached {
        Decision::Alert(ReasonCode::GeofenceBreach)
    } else {
        Decision::NoAlert
    }
}
