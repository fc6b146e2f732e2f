use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{CountdownClock, MonitoringState, StateKind};
use super::time::{CountdownId, Millis};
use crate::sensors::types::ImpactEvent;

pub const DEFAULT_COUNTDOWN_SECS: u32 = 60;

/// Everything that can ask the machine to move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    StartMonitoring,
    StopMonitoring,
    Impact(ImpactEvent),
    UserConfirmedSafe,
    CountdownTick(CountdownId),
    UserForcedEmergency,
    UserAborted,
    ToggleMonitoringOff,
    ToggleMonitoringOn,
    /// Permission denied or a sensor API is missing.
    SensorsUnavailable,
    /// Explicit user reset back to `Idle`.
    Reset,
}

impl Trigger {
    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::StartMonitoring => TriggerKind::StartMonitoring,
            Trigger::StopMonitoring => TriggerKind::StopMonitoring,
            Trigger::Impact(_) => TriggerKind::Impact,
            Trigger::UserConfirmedSafe => TriggerKind::UserConfirmedSafe,
            Trigger::CountdownTick(_) => TriggerKind::CountdownTick,
            Trigger::UserForcedEmergency => TriggerKind::UserForcedEmergency,
            Trigger::UserAborted => TriggerKind::UserAborted,
            Trigger::ToggleMonitoringOff => TriggerKind::ToggleMonitoringOff,
            Trigger::ToggleMonitoringOn => TriggerKind::ToggleMonitoringOn,
            Trigger::SensorsUnavailable => TriggerKind::SensorsUnavailable,
            Trigger::Reset => TriggerKind::Reset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    StartMonitoring,
    StopMonitoring,
    Impact,
    UserConfirmedSafe,
    CountdownTick,
    UserForcedEmergency,
    UserAborted,
    ToggleMonitoringOff,
    ToggleMonitoringOn,
    SensorsUnavailable,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Dashboard,
    Confirmation,
    Emergency,
}

/// What a transition asks the outside world to do. The scheduler turns
/// these into driver side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Navigate(Screen),
    NotifyContacts,
    StartCountdown(CountdownId),
    CancelCountdown(CountdownId),
    AttachSensors,
    DetachSensors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscalationCause {
    CountdownExpired,
    UserForced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: StateKind,
    pub to: StateKind,
    pub trigger: TriggerKind,
    pub intents: Vec<Intent>,
    pub escalation: Option<EscalationCause>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{trigger:?} is not valid while {state:?}")]
    InvalidTransition {
        state: StateKind,
        trigger: TriggerKind,
    },
    #[error("tick from countdown {got:?} ignored (live countdown: {live:?})")]
    StaleCountdown {
        live: Option<CountdownId>,
        got: CountdownId,
    },
}

/// Owner of `MonitoringState`. `apply` is the only code path that writes it.
#[derive(Debug, Clone)]
pub struct EscalationMachine {
    state: MonitoringState,
    next_countdown: CountdownId,
    countdown_secs: u32,
}

impl Default for EscalationMachine {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}

impl EscalationMachine {
    pub fn new(countdown_secs: u32) -> Self {
        Self {
            state: MonitoringState::Idle,
            next_countdown: CountdownId::first(),
            countdown_secs,
        }
    }

    pub fn state(&self) -> &MonitoringState {
        &self.state
    }

    /// Total over every (state, trigger) pair: the result is either a
    /// transition or a rejection that leaves the state untouched.
    pub fn apply(&mut self, trigger: Trigger, now_ms: Millis) -> Result<Transition, Rejection> {
        use MonitoringState::*;

        let from = self.state;
        let kind = trigger.kind();
        let mut intents = Vec::new();
        let mut escalation = None;

        let to = match (from, trigger) {
            (Idle, Trigger::StartMonitoring) => {
                intents.push(Intent::AttachSensors);
                Monitoring
            }

            (Monitoring, Trigger::Impact(_)) => {
                let id = self.next_countdown;
                self.next_countdown = id.next();
                intents.push(Intent::StartCountdown(id));
                intents.push(Intent::Navigate(Screen::Confirmation));
                ConfirmationPending(CountdownClock::start(id, now_ms, self.countdown_secs))
            }
            (Monitoring, Trigger::StopMonitoring) | (Monitoring, Trigger::SensorsUnavailable) => {
                intents.push(Intent::DetachSensors);
                Idle
            }

            (ConfirmationPending(clock), Trigger::UserConfirmedSafe) => {
                intents.push(Intent::CancelCountdown(clock.id));
                intents.push(Intent::Navigate(Screen::Dashboard));
                Monitoring
            }
            (ConfirmationPending(mut clock), Trigger::CountdownTick(id)) if clock.id == id => {
                if clock.tick() == 0 {
                    escalation = Some(EscalationCause::CountdownExpired);
                    escalate(&mut intents, clock.id);
                    Emergency
                } else {
                    ConfirmationPending(clock)
                }
            }
            (ConfirmationPending(clock), Trigger::UserForcedEmergency) => {
                escalation = Some(EscalationCause::UserForced);
                escalate(&mut intents, clock.id);
                Emergency
            }

            (Emergency, Trigger::UserAborted) => {
                intents.push(Intent::Navigate(Screen::Dashboard));
                Monitoring
            }

            (Suppressed, Trigger::ToggleMonitoringOn) => {
                intents.push(Intent::AttachSensors);
                Monitoring
            }
            (Suppressed, Trigger::ToggleMonitoringOff) => {
                return Err(self.reject(kind));
            }
            (current, Trigger::ToggleMonitoringOff) => {
                wind_down(&mut intents, &current);
                Suppressed
            }

            (Idle, Trigger::Reset) => return Err(self.reject(kind)),
            (current, Trigger::Reset) => {
                wind_down(&mut intents, &current);
                Idle
            }

            (current, Trigger::CountdownTick(got)) => {
                return Err(Rejection::StaleCountdown {
                    live: current.countdown().map(|c| c.id),
                    got,
                });
            }

            _ => return Err(self.reject(kind)),
        };

        self.state = to;

        Ok(Transition {
            from: from.kind(),
            to: to.kind(),
            trigger: kind,
            intents,
            escalation,
        })
    }

    fn reject(&self, trigger: TriggerKind) -> Rejection {
        Rejection::InvalidTransition {
            state: self.state.kind(),
            trigger,
        }
    }
}

fn escalate(intents: &mut Vec<Intent>, countdown: CountdownId) {
    intents.push(Intent::CancelCountdown(countdown));
    intents.push(Intent::Navigate(Screen::Emergency));
    intents.push(Intent::NotifyContacts);
}

/// Intents for leaving `current` toward a sensor-less state.
fn wind_down(intents: &mut Vec<Intent>, current: &MonitoringState) {
    if let Some(clock) = current.countdown() {
        intents.push(Intent::CancelCountdown(clock.id));
    }
    if current.kind().sensors_attached() {
        intents.push(Intent::DetachSensors);
    }
    if matches!(
        current.kind(),
        StateKind::ConfirmationPending | StateKind::Emergency
    ) {
        intents.push(Intent::Navigate(Screen::Dashboard));
    }
}
