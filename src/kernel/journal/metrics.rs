use std::collections::VecDeque;

use super::event::JournalEvent;
use crate::kernel::escalation::{EscalationCause, TriggerKind};
use crate::kernel::state::StateKind;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalSnapshot {
    pub impacts_detected: u64,
    pub peak_magnitude: f64,
    /// Countdowns ended by "I am safe".
    pub false_alarms: u64,
    pub automatic_escalations: u64,
    pub forced_escalations: u64,
    pub aborts: u64,
    pub rejected: u64,
    pub stale_ticks: u64,
    pub sensor_outages: u64,
}

pub fn compute_snapshot(events: &VecDeque<JournalEvent>) -> JournalSnapshot {
    let mut snap = JournalSnapshot::default();

    for event in events {
        match event {
            JournalEvent::ImpactDetected { magnitude, .. } => {
                snap.impacts_detected += 1;
                if *magnitude > snap.peak_magnitude {
                    snap.peak_magnitude = *magnitude;
                }
            }
            JournalEvent::Transition { from, trigger, escalation, .. } => {
                match escalation {
                    Some(EscalationCause::CountdownExpired) => snap.automatic_escalations += 1,
                    Some(EscalationCause::UserForced) => snap.forced_escalations += 1,
                    None => {}
                }
                match (from, trigger) {
                    (StateKind::ConfirmationPending, TriggerKind::UserConfirmedSafe) => {
                        snap.false_alarms += 1
                    }
                    (StateKind::Emergency, TriggerKind::UserAborted) => snap.aborts += 1,
                    _ => {}
                }
            }
            JournalEvent::Rejected { stale_tick, .. } => {
                snap.rejected += 1;
                if *stale_tick {
                    snap.stale_ticks += 1;
                }
            }
            JournalEvent::SensorsUnavailable { .. } => snap.sensor_outages += 1,
        }
    }

    snap
}
