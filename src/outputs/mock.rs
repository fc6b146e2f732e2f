//! Recording collaborators for tests and dry runs. Clones share their log.

use std::sync::{Arc, Mutex};

use super::{ContactNotifier, Navigator, Siren};
use crate::kernel::escalation::Screen;
use crate::kernel::scheduler::EmergencyPayload;

#[derive(Debug, Clone, Default)]
pub struct MockNavigator {
    screens: Arc<Mutex<Vec<Screen>>>,
    banners: Arc<Mutex<Vec<String>>>,
}

impl MockNavigator {
    pub fn screens(&self) -> Vec<Screen> {
        self.screens.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn banners(&self) -> Vec<String> {
        self.banners.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

impl Navigator for MockNavigator {
    fn navigate_to(&mut self, screen: Screen) {
        if let Ok(mut screens) = self.screens.lock() {
            screens.push(screen);
        }
    }

    fn show_banner(&mut self, message: &str) {
        if let Ok(mut banners) = self.banners.lock() {
            banners.push(message.to_string());
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<EmergencyPayload>>>,
}

impl MockNotifier {
    pub fn sent(&self) -> Vec<EmergencyPayload> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl ContactNotifier for MockNotifier {
    fn notify_contacts(&mut self, payload: &EmergencyPayload) -> anyhow::Result<()> {
        self.sent
            .lock()
            .map_err(|_| anyhow::anyhow!("notifier log poisoned"))?
            .push(payload.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockSiren {
    history: Arc<Mutex<Vec<bool>>>,
}

impl MockSiren {
    pub fn history(&self) -> Vec<bool> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.history().last().copied().unwrap_or(false)
    }
}

impl Siren for MockSiren {
    fn set_active(&mut self, active: bool) {
        if let Ok(mut history) = self.history.lock() {
            history.push(active);
        }
    }
}
