use serde::{Deserialize, Serialize};

use crate::kernel::escalation::{EscalationCause, TriggerKind};
use crate::kernel::state::StateKind;
use crate::kernel::time::Millis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JournalEvent {
    Transition {
        from: StateKind,
        to: StateKind,
        trigger: TriggerKind,
        escalation: Option<EscalationCause>,
        at_ms: Millis,
    },

    Rejected {
        state: StateKind,
        trigger: TriggerKind,
        stale_tick: bool,
        at_ms: Millis,
    },

    ImpactDetected {
        magnitude: f64,
        at_ms: Millis,
    },

    SensorsUnavailable {
        at_ms: Millis,
    },
}
