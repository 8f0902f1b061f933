//! Personal Safety Check
//!
//! Locates the user, checks the position against configured danger zones
//! and raises an SOS alert when the user asks for one or has walked into a
//! zone. Alerts go to a remote store first; trusted contacts are only
//! notified once the store has accepted the alert.
//!
//! # Session Flow
//!
//! ```text
//! name ──► locate (fallback on failure) ──► geofence ──► status choice
//!                                                            │
//!                    report ◄── dispatch ◄── trigger policy ◄┘
//! ```
//!
//! No step is fatal: a failed lookup uses the fallback position and a
//! failed submission is reported to the user.

use alert_dispatch::{AlertSink, ContactNotifier};
use std::io::{self, BufRead, Write};

pub mod config;
pub mod location;
pub mod pipeline;
pub mod report;
pub mod session;

pub use config::{AppConfig, ConfigError};
pub use location::{
    locate_or_fallback, FixedLocation, IpApiLocator, LocationError, LocationFix, LocationProvider,
};
pub use pipeline::{SafetyCheck, SessionReport};
pub use session::{Console, StatusChoice};

/// Run one interactive session on `console`
pub fn run_session<S, N, R, W>(
    check: &SafetyCheck<S, N>,
    provider: &dyn LocationProvider,
    fallback: &LocationFix,
    console: &mut Console<R, W>,
) -> io::Result<SessionReport>
where
    S: AlertSink,
    N: ContactNotifier,
    R: BufRead,
    W: Write,
{
    report::render_banner(console.output())?;
    let user = console.ask_name()?;

    report::render_locating(console.output())?;
    let fix = locate_or_fallback(provider, fallback);
    report::render_location(console.output(), &fix)?;

    let geofence = check.evaluate(&fix);
    if let Some(zone) = geofence.matched_zone {
        report::render_zone_warning(console.output(), zone)?;
    }

    let choice = console.ask_status()?;
    let session = check.respond(&user, choice, &fix, &geofence);
    report::render_report(console.output(), &session)?;
    console.output().flush()?;

    Ok(session)
}
