use serde::{Deserialize, Serialize};

use super::time::{CountdownId, Millis};

/// The confirmation countdown. Lives inside `MonitoringState::ConfirmationPending`
/// and nowhere else, so leaving that state drops the clock with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownClock {
    pub id: CountdownId,
    pub started_at_ms: Millis,
    pub duration_ms: Millis,
    pub ticks_elapsed: u32,
    pub total_seconds: u32,
}

impl CountdownClock {
    pub fn start(id: CountdownId, now_ms: Millis, total_seconds: u32) -> Self {
        Self {
            id,
            started_at_ms: now_ms,
            duration_ms: Millis::from(total_seconds) * 1_000,
            ticks_elapsed: 0,
            total_seconds,
        }
    }

    pub fn deadline_ms(&self) -> Millis {
        self.started_at_ms + self.duration_ms
    }

    /// Seconds left on the dial. Never negative.
    pub fn remaining_seconds(&self) -> u32 {
        self.total_seconds.saturating_sub(self.ticks_elapsed)
    }

    /// Applies one tick and returns the seconds left.
    pub fn tick(&mut self) -> u32 {
        self.ticks_elapsed = self.ticks_elapsed.saturating_add(1);
        self.remaining_seconds()
    }

    pub fn expired(&self) -> bool {
        self.remaining_seconds() == 0
    }
}

/// The authoritative monitoring state. Exactly one lives in the reactor and
/// only the escalation transition function writes to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum MonitoringState {
    /// Nothing subscribed, classifier inert.
    #[default]
    Idle,
    /// Sensors attached, classifier live.
    Monitoring,
    /// An impact was accepted; waiting for the user before escalating.
    ConfirmationPending(CountdownClock),
    /// Contacts have been notified.
    Emergency,
    /// User turned monitoring off from the toggle.
    Suppressed,
}

impl MonitoringState {
    pub fn kind(&self) -> StateKind {
        match self {
            MonitoringState::Idle => StateKind::Idle,
            MonitoringState::Monitoring => StateKind::Monitoring,
            MonitoringState::ConfirmationPending(_) => StateKind::ConfirmationPending,
            MonitoringState::Emergency => StateKind::Emergency,
            MonitoringState::Suppressed => StateKind::Suppressed,
        }
    }

    pub fn is_monitoring(&self) -> bool {
        matches!(self, MonitoringState::Monitoring)
    }

    pub fn countdown(&self) -> Option<&CountdownClock> {
        match self {
            MonitoringState::ConfirmationPending(clock) => Some(clock),
            _ => None,
        }
    }

    pub fn remaining_seconds(&self) -> Option<u32> {
        self.countdown().map(CountdownClock::remaining_seconds)
    }
}

/// Payload-free discriminant of `MonitoringState`, for logs and the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Idle,
    Monitoring,
    ConfirmationPending,
    Emergency,
    Suppressed,
}

impl StateKind {
    /// States in which the platform sensors are subscribed.
    pub fn sensors_attached(&self) -> bool {
        matches!(
            self,
            StateKind::Monitoring | StateKind::ConfirmationPending | StateKind::Emergency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_counts_down_to_zero_and_saturates() {
        let mut clock = CountdownClock::start(CountdownId::first(), 1_000, 3);
        assert_eq!(clock.deadline_ms(), 4_000);
        assert_eq!(clock.tick(), 2);
        assert_eq!(clock.tick(), 1);
        assert_eq!(clock.tick(), 0);
        assert!(clock.expired());
        assert_eq!(clock.tick(), 0);
    }

    #[test]
    fn default_state_is_idle() {
        assert_eq!(MonitoringState::default().kind(), StateKind::Idle);
        assert!(MonitoringState::default().countdown().is_none());
    }
}
