//! Collaborators the driver hands side effects to. The kernel never calls
//! these directly.

pub mod console;
pub mod mock;

use crate::kernel::escalation::Screen;
use crate::kernel::scheduler::EmergencyPayload;

/// Fire-and-forget navigation intent consumer.
pub trait Navigator: Send {
    fn navigate_to(&mut self, screen: Screen);

    /// Non-blocking notice, e.g. "sensor permission denied".
    fn show_banner(&mut self, _message: &str) {}
}

pub trait ContactNotifier: Send {
    fn notify_contacts(&mut self, payload: &EmergencyPayload) -> anyhow::Result<()>;
}

/// The audible alarm. Driven by which screen is showing, not by the kernel.
pub trait Siren: Send {
    fn set_active(&mut self, active: bool);
}

pub use console::{LogNavigator, LogNotifier, LogSiren};
pub use mock::{MockNavigator, MockNotifier, MockSiren};
