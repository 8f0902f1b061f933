//! One safety check: geofence, trigger policy, dispatch

use crate::location::LocationFix;
use crate::session::StatusChoice;
use alert_dispatch::{AlertDispatcher, AlertSink, ContactNotifier, DispatchOutcome};
use geofence::{decide, DangerZone, Decision, GeofenceRegistry, GeofenceResult};
use tracing::{info, warn};

/// Everything the console needs to tell the user what happened
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub user: String,
    pub fix: LocationFix,
    pub breached_zone: Option<DangerZone>,
    /// Zone address on breach, otherwise the fix label
    pub effective_label: String,
    pub decision: Decision,
    /// Present only when an alert was dispatched
    pub outcome: Option<DispatchOutcome>,
}

pub struct SafetyCheck<S, N> {
    registry: GeofenceRegistry,
    dispatcher: AlertDispatcher<S, N>,
}

impl<S: AlertSink, N: ContactNotifier> SafetyCheck<S, N> {
    pub fn new(registry: GeofenceRegistry, dispatcher: AlertDispatcher<S, N>) -> Self {
        Self {
            registry,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &AlertDispatcher<S, N> {
        &self.dispatcher
    }

    pub fn registry(&self) -> &GeofenceRegistry {
        &self.registry
    }

    /// Test the fix against every danger zone
    pub fn evaluate(&self, fix: &LocationFix) -> GeofenceResult<'_> {
        let result = self.registry.evaluate(&fix.coordinate, &fix.label);
        if let Some(zone) = result.matched_zone {
            warn!("{} is inside danger zone {}", fix.coordinate, zone.name);
        }
        result
    }

    /// Decide and, if needed, dispatch for an already evaluated fix
    pub fn respond(
        &self,
        user: &str,
        choice: StatusChoice,
        fix: &LocationFix,
        geofence: &GeofenceResult<'_>,
    ) -> SessionReport {
        let decision = decide(choice.is_sos(), geofence);

        let outcome = match decision {
            Decision::Alert(reason) => Some(self.dispatcher.dispatch(
                user,
                fix.coordinate,
                reason,
                &geofence.effective_label,
            )),
            Decision::NoAlert => {
                info!("No alert needed for {}", user);
                None
            }
        };

        SessionReport {
            user: user.to_string(),
            fix: fix.clone(),
            breached_zone: geofence.matched_zone.cloned(),
            effective_label: geofence.effective_label.clone(),
            decision,
            outcome,
        }
    }

    /// Evaluate and respond in one step
    pub fn run(&self, user: &str, choice: StatusChoice, fix: &LocationFix) -> SessionReport {
        let geofence = self.evaluate(fix);
        self.respond(user, choice, fix, &geofence)
    }
}
