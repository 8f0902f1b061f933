//! Alert submission to the remote store

use crate::{AlertRecord, SubmissionError};
use std::time::Duration;
use tracing::debug;

/// Default bound on a single submission
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Capability to persist an alert remotely.
///
/// `Ok(())` means the store confirmed it recorded the alert.
pub trait AlertSink: Send + Sync {
    fn submit(&self, record: &AlertRecord) -> Result<(), SubmissionError>;
}

/// POSTs the alert payload as JSON to a fixed endpoint.
#[derive(Clone)]
pub struct HttpAlertSink {
    client: reqwest::blocking::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpAlertSink {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SubmissionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                SubmissionError::Transport(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl AlertSink for HttpAlertSink {
    fn submit(&self, record: &AlertRecord) -> Result<(), SubmissionError> {
        debug!("Submitting alert for {} to {}", record.user_id, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&record.payload())
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    SubmissionError::TimedOut(self.timeout)
                } else {
                    SubmissionError::Transport(e.to_string())
                }
            })?;

        check_status(response.status().as_u16())
    }
}

/// Any 2xx is an acceptance; everything else is a rejection.
pub fn check_status(status: u16) -> Result<(), SubmissionError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(SubmissionError::Rejected { status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geofence::{Coordinate, ReasonCode};

    fn record() -> AlertRecord {
        AlertRecord::new(
            "Asha",
            Coordinate::new(17.6868, 83.2185).unwrap(),
            ReasonCode::Manual,
            "Visakhapatnam",
        )
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(200).is_ok());
        assert!(check_status(201).is_ok());
        assert!(check_status(204).is_ok());
        assert_eq!(
            check_status(301),
            Err(SubmissionError::Rejected { status: 301 })
        );
        assert_eq!(
            check_status(401),
            Err(SubmissionError::Rejected { status: 401 })
        );
        assert_eq!(
            check_status(503),
            Err(SubmissionError::Rejected { status: 503 })
        );
    }

    #[test]
    fn test_unreachable_endpoint_is_an_error_not_a_panic() {
        // Port 1 on loopback has nothing listening
        let sink = HttpAlertSink::new("http://127.0.0.1:1/alerts.json", Duration::from_secs(2))
            .unwrap();
        let result = sink.submit(&record());
        assert!(matches!(
            result,
            Err(SubmissionError::Transport(_)) | Err(SubmissionError::TimedOut(_))
        ));
    }

    #[test]
    fn test_malformed_endpoint_is_transport_error() {
        let sink = HttpAlertSink::new("not a url", DEFAULT_SUBMIT_TIMEOUT).unwrap();
        assert!(matches!(
            sink.submit(&record()),
            Err(SubmissionError::Transport(_))
        ));
        assert_eq!(sink.endpoint(), "not a url");
    }
}
