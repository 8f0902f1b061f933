//! Console rendering of session progress and results

use crate::location::LocationFix;
use crate::pipeline::SessionReport;
use alert_dispatch::DispatchOutcome;
use geofence::DangerZone;
use std::io::{self, Write};

pub fn render_banner(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "--- Women Safety App ---")
}

pub fn render_locating(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\n📡 Connecting to Geolocation API...")
}

pub fn render_location(out: &mut impl Write, fix: &LocationFix) -> io::Result<()> {
    writeln!(
        out,
        "📍 Current Location: {} ({})",
        fix.label, fix.coordinate
    )
}

pub fn render_zone_warning(out: &mut impl Write, zone: &DangerZone) -> io::Result<()> {
    writeln!(out, "⚠️ WARNING: You have entered {}!", zone.name)
}

pub fn render_report(out: &mut impl Write, report: &SessionReport) -> io::Result<()> {
    match &report.outcome {
        None => writeln!(out, "\n✅ Status: You are in a safe area."),
        Some(DispatchOutcome::Delivered { notifications }) => {
            writeln!(out, "\n✅ SUCCESS: SOS sent for {}", report.user)?;
            writeln!(out, "📍 Location identified: {}", report.effective_label)?;
            writeln!(out, "\n🚨 ALERTING TRUSTED CONTACTS...")?;
            for delivery in notifications {
                match &delivery.result {
                    Ok(()) => writeln!(
                        out,
                        "📩 SMS Sent to {}: '{}'",
                        delivery.contact.name, delivery.message
                    )?,
                    Err(e) => writeln!(
                        out,
                        "❌ Could not notify {}: {}",
                        delivery.contact.name, e
                    )?,
                }
            }
            Ok(())
        }
        // Error display already reads "Alert store rejected data (Code: ..)" or "Connection failed: .."
        Some(DispatchOutcome::Failed { error }) => writeln!(out, "\n❌ ERROR: {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_dispatch::{Contact, ContactDelivery, NotifyError, SubmissionError};
    use geofence::{Coordinate, Decision, ReasonCode};

    fn vizag() -> LocationFix {
        LocationFix::new(
            Coordinate::new(17.6868, 83.2185).unwrap(),
            "Visakhapatnam, Andhra Pradesh",
        )
    }

    fn report(outcome: Option<DispatchOutcome>) -> SessionReport {
        SessionReport {
            user: "Asha".to_string(),
            fix: vizag(),
            breached_zone: None,
            effective_label: "Beach Road Area, Visakhapatnam".to_string(),
            decision: if outcome.is_some() {
                Decision::Alert(ReasonCode::Manual)
            } else {
                Decision::NoAlert
            },
            outcome,
        }
    }

    fn render(report: &SessionReport) -> String {
        let mut out = Vec::new();
        render_report(&mut out, report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_location_line() {
        let mut out = Vec::new();
        render_location(&mut out, &vizag()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "📍 Current Location: Visakhapatnam, Andhra Pradesh (17.6868, 83.2185)\n"
        );
    }

    #[test]
    fn test_safe_area() {
        assert!(render(&report(None)).contains("You are in a safe area."));
    }

    #[test]
    fn test_success_lists_contacts() {
        let message = "Emergency! Asha is at Beach Road Area, Visakhapatnam.".to_string();
        let outcome = DispatchOutcome::Delivered {
            notifications: vec![
                ContactDelivery {
                    contact: Contact::new("Mom", "+91-XXXXX-XXXXX"),
                    message: message.clone(),
                    result: Ok(()),
                },
                ContactDelivery {
                    contact: Contact::new("Local Police Station", "100 / 112"),
                    message,
                    result: Err(NotifyError::DeliveryFailed {
                        contact: "Local Police Station".into(),
                        reason: "line busy".into(),
                    }),
                },
            ],
        };

        let text = render(&report(Some(outcome)));
        assert!(text.contains("✅ SUCCESS: SOS sent for Asha"));
        assert!(text.contains("📍 Location identified: Beach Road Area, Visakhapatnam"));
        assert!(text.contains(
            "📩 SMS Sent to Mom: 'Emergency! Asha is at Beach Road Area, Visakhapatnam.'"
        ));
        assert!(text.contains("❌ Could not notify Local Police Station"));
    }

    #[test]
    fn test_rejection_shows_code() {
        let outcome = DispatchOutcome::Failed {
            error: SubmissionError::Rejected { status: 401 },
        };
        let text = render(&report(Some(outcome)));
        assert!(text.contains("❌ ERROR: Alert store rejected data (Code: 401)"));
        assert!(!text.contains("SMS Sent"));
    }

    #[test]
    fn test_transport_failure_is_reported() {
        let outcome = DispatchOutcome::Failed {
            error: SubmissionError::Transport("dns error".into()),
        };
        assert!(render(&report(Some(outcome))).contains("❌ ERROR: Connection failed: dns error"));
    }
}
