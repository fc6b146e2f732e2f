use tracing::{info, warn};

use super::{ContactNotifier, Navigator, Siren};
use crate::kernel::escalation::Screen;
use crate::kernel::scheduler::EmergencyPayload;

#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate_to(&mut self, screen: Screen) {
        info!(?screen, "navigate");
    }

    fn show_banner(&mut self, message: &str) {
        warn!(%message, "banner");
    }
}

/// Writes the alert to the log, one line per contact.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl ContactNotifier for LogNotifier {
    fn notify_contacts(&mut self, payload: &EmergencyPayload) -> anyhow::Result<()> {
        let body = serde_json::to_string(payload)?;
        let location = match &payload.location {
            Some(fix) => format!("{:.5}, {:.5}", fix.lat, fix.long),
            None => "location unknown".to_string(),
        };

        if payload.contacts.is_empty() {
            warn!("emergency raised but the contact list is empty");
        }
        for contact in &payload.contacts {
            warn!(
                contact = %contact.name,
                phone = %contact.phone,
                emergency_line = contact.is_emergency,
                %location,
                "alerting contact"
            );
        }
        info!(payload = %body, "emergency payload");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LogSiren {
    active: bool,
}

impl Siren for LogSiren {
    fn set_active(&mut self, active: bool) {
        if self.active != active {
            info!(active, "siren");
            self.active = active;
        }
    }
}
