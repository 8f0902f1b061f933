//! Trusted-contact notification

use crate::{Contact, NotifyError};
use tracing::info;

/// Capability to deliver one message to one contact, best-effort.
pub trait ContactNotifier: Send + Sync {
    fn notify(&self, contact: &Contact, message: &str) -> Result<(), NotifyError>;
}

/// Records each outbound message in the log and always succeeds.
///
/// Stands in for an SMS gateway until one is wired up.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl ContactNotifier for LogNotifier {
    fn notify(&self, contact: &Contact, message: &str) -> Result<(), NotifyError> {
        info!(contact = %contact.name, phone = %contact.phone, "SMS sent: {}", message);
        Ok(())
    }
}
