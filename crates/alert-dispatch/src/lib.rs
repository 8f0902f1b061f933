//! Alert Dispatch Library
//!
//! Builds an emergency alert record, submits it to a remote store and, once
//! the store has accepted it, notifies every trusted contact in order.
//!
//! # Wire Format
//!
//! | Field              | Example                           |
//! |--------------------|-----------------------------------|
//! | `user`             | `"Asha"`                          |
//! | `location_address` | `"Beach Road Area, Visakhapatnam"`|
//! | `coordinates`      | `"17.6868, 83.2185"`              |
//! | `timestamp`        | `"Sat Oct 17 23:05:00 2026"`      |
//! | `alert_type`       | `"Manual Trigger"` / `"Geofence Breach"` |
//! | `status`           | `"URGENT"`                        |

use geofence::{Coordinate, ReasonCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub mod dispatcher;
pub mod notify;
pub mod sink;

pub use dispatcher::{AlertDispatcher, ContactDelivery, DispatchOutcome};
pub use notify::{ContactNotifier, LogNotifier};
pub use sink::{AlertSink, HttpAlertSink};

/// Every alert is sent with this status
pub const STATUS_URGENT: &str = "URGENT";

/// `ctime`-style timestamp, e.g. `Sat Oct 17 23:05:00 2026`
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmissionError {
    #[error("Alert store rejected data (Code: {status})")]
    Rejected { status: u16 },
    #[error("Connection failed: timed out after {0:?}")]
    TimedOut(Duration),
    #[error("Connection failed: {0}")]
    Transport(String),
}

impl SubmissionError {
    /// Status code for rejections, if the store answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    #[error("Delivery to {contact} failed: {reason}")]
    DeliveryFailed { contact: String, reason: String },
}

/// A trusted contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

/// One alert, alive only for the duration of a dispatch call.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRecord {
    pub user_id: String,
    pub coordinates: Coordinate,
    pub location_label: String,
    pub reason: ReasonCode,
    pub timestamp: String,
}

impl AlertRecord {
    /// Stamp a new record with the current local time
    pub fn new(
        user_id: impl Into<String>,
        coordinates: Coordinate,
        reason: ReasonCode,
        location_label: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            coordinates,
            location_label: location_label.into(),
            reason,
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn status(&self) -> &'static str {
        STATUS_URGENT
    }

    pub fn payload(&self) -> AlertPayload<'_> {
        AlertPayload {
            user: &self.user_id,
            location_address: &self.location_label,
            coordinates: self.coordinates.to_string(),
            timestamp: &self.timestamp,
            alert_type: self.reason.label(),
            status: STATUS_URGENT,
        }
    }

    /// Text sent to each trusted contact
    pub fn contact_message(&self) -> String {
        format!(
            "Emergency! {} is at {}.",
            self.user_id, self.location_label
        )
    }
}

/// Serialized body of an alert submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertPayload<'a> {
    pub user: &'a str,
    pub location_address: &'a str,
    pub coordinates: String,
    pub timestamp: &'a str,
    pub alert_type: &'static str,
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(reason: ReasonCode) -> AlertRecord {
        AlertRecord::new(
            "Asha",
            Coordinate::new(17.6868, 83.2185).unwrap(),
            reason,
            "Beach Road Area, Visakhapatnam",
        )
    }

    #[test]
    fn test_payload_fields() {
        let rec = record(ReasonCode::GeofenceBreach);
        let json = serde_json::to_value(rec.payload()).unwrap();

        assert_eq!(json["user"], "Asha");
        assert_eq!(json["location_address"], "Beach Road Area, Visakhapatnam");
        assert_eq!(json["coordinates"], "17.6868, 83.2185");
        assert_eq!(json["alert_type"], "Geofence Breach");
        assert_eq!(json["status"], "URGENT");
        assert_eq!(json["timestamp"], rec.timestamp.as_str());
        assert_eq!(json.as_object().unwrap().len(), 6);
    }

    #[test]
    fn test_manual_alert_type() {
        let json = serde_json::to_value(record(ReasonCode::Manual).payload()).unwrap();
        assert_eq!(json["alert_type"], "Manual Trigger");
    }

    #[test]
    fn test_timestamp_is_ctime_style() {
        let rec = record(ReasonCode::Manual);
        // e.g. "Sat Oct 17 23:05:00 2026"
        let parts: Vec<&str> = rec.timestamp.split_whitespace().collect();
        assert_eq!(parts.len(), 5, "unexpected timestamp {:?}", rec.timestamp);
        assert_eq!(parts[3].matches(':').count(), 2);
        assert_eq!(parts[4].len(), 4);
    }

    #[test]
    fn test_contact_message() {
        assert_eq!(
            record(ReasonCode::Manual).contact_message(),
            "Emergency! Asha is at Beach Road Area, Visakhapatnam."
        );
    }

    #[test]
    fn test_submission_error_display() {
        let err = SubmissionError::Rejected { status: 401 };
        assert_eq!(err.to_string(), "Alert store rejected data (Code: 401)");
        assert_eq!(err.status(), Some(401));
        assert_eq!(SubmissionError::Transport("refused".into()).status(), None);
    }
}
