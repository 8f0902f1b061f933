//! Alert dispatch: submit once, then fan out to contacts

use crate::{AlertRecord, AlertSink, Contact, ContactNotifier, NotifyError, SubmissionError};
use geofence::{Coordinate, ReasonCode};
use tracing::{info, warn};

/// Result of notifying one contact
#[derive(Debug, Clone, PartialEq)]
pub struct ContactDelivery {
    pub contact: Contact,
    pub message: String,
    pub result: Result<(), NotifyError>,
}

impl ContactDelivery {
    pub fn is_delivered(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Store accepted the alert; one entry per contact in configuration order
    Delivered { notifications: Vec<ContactDelivery> },
    /// Store never confirmed the alert; no contact was notified
    Failed { error: SubmissionError },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    pub fn error(&self) -> Option<&SubmissionError> {
        match self {
            Self::Failed { error } => Some(error),
            Self::Delivered { .. } => None,
        }
    }

    pub fn notifications(&self) -> &[ContactDelivery] {
        match self {
            Self::Delivered { notifications } => notifications.as_slice(),
            Self::Failed { .. } => &[],
        }
    }
}

/// Owns the contact list and the two external capabilities.
pub struct AlertDispatcher<S, N> {
    sink: S,
    notifier: N,
    contacts: Vec<Contact>,
}

impl<S: AlertSink, N: ContactNotifier> AlertDispatcher<S, N> {
    pub fn new(sink: S, notifier: N, contacts: Vec<Contact>) -> Self {
        Self {
            sink,
            notifier,
            contacts,
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Build and submit one alert. Contacts are only notified after the
    /// store accepts it; a failed submission is returned, never raised.
    pub fn dispatch(
        &self,
        user_id: &str,
        point: Coordinate,
        reason: ReasonCode,
        location_label: &str,
    ) -> DispatchOutcome {
        let record = AlertRecord::new(user_id, point, reason, location_label);
        info!(
            "Dispatching {} alert for {} at {} ({})",
            reason, user_id, location_label, point
        );

        if let Err(error) = self.sink.submit(&record) {
            warn!("Alert for {} not confirmed: {}", user_id, error);
            return DispatchOutcome::Failed { error };
        }
        info!("Alert for {} accepted by store", user_id);

        let message = record.contact_message();
        let notifications = self
            .contacts
            .iter()
            .map(|contact| {
                let result = self.notifier.notify(contact, &message);
                if let Err(ref e) = result {
                    warn!("Could not notify {}: {}", contact.name, e);
                }
                ContactDelivery {
                    contact: contact.clone(),
                    message: message.clone(),
                    result,
                }
            })
            .collect();

        DispatchOutcome::Delivered { notifications }
    }
}
