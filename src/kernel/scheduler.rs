use serde::{Deserialize, Serialize};

use super::escalation::{EscalationCause, Intent, Screen};
use super::time::{CountdownId, Millis};
use crate::directory::types::{Contact, DirectorySnapshot, UserProfile};
use crate::sensors::types::{GeoSample, ImpactEvent};

pub struct Scheduler;

/// Commands for the driver. Produced only by the reactor step.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    Navigate(Screen),
    NotifyContacts(EmergencyPayload),
    StartCountdown(CountdownId),
    CancelCountdown(CountdownId),
    AttachSensors,
    DetachSensors,
    /// User-visible notice that monitoring is degraded.
    Banner(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyPayload {
    /// Last cached fix; `None` when no fix has arrived yet.
    pub location: Option<GeoSample>,
    pub profile: UserProfile,
    pub contacts: Vec<Contact>,
    pub impact: Option<ImpactEvent>,
    pub cause: EscalationCause,
    pub triggered_at_ms: Millis,
}

/// What the scheduler may read when filling in an alert.
pub struct AlertContext<'a> {
    pub location: Option<&'a GeoSample>,
    pub directory: &'a DirectorySnapshot,
    pub impact: Option<ImpactEvent>,
    pub cause: Option<EscalationCause>,
    pub now_ms: Millis,
}

impl Scheduler {
    /// Pure projection: machine intent + context -> driver side effect.
    pub fn schedule(&self, intent: Intent, ctx: &AlertContext<'_>) -> SideEffect {
        match intent {
            Intent::Navigate(screen) => SideEffect::Navigate(screen),
            Intent::StartCountdown(id) => SideEffect::StartCountdown(id),
            Intent::CancelCountdown(id) => SideEffect::CancelCountdown(id),
            Intent::AttachSensors => SideEffect::AttachSensors,
            Intent::DetachSensors => SideEffect::DetachSensors,
            Intent::NotifyContacts => SideEffect::NotifyContacts(EmergencyPayload {
                location: ctx.location.copied(),
                profile: ctx.directory.profile.clone(),
                contacts: ctx.directory.contacts.clone(),
                impact: ctx.impact,
                cause: ctx.cause.unwrap_or(EscalationCause::CountdownExpired),
                triggered_at_ms: ctx.now_ms,
            }),
        }
    }
}
