use serde::{Deserialize, Serialize};

use super::types::{ImpactEvent, MotionSample};
use crate::kernel::state::MonitoringState;
use crate::kernel::time::Millis;

pub const DEFAULT_IMPACT_THRESHOLD: f64 = 25.0;
pub const DEFAULT_COOLDOWN_MS: Millis = 2_000;

/// Minimum spacing between two accepted impacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceGuard {
    /// `None` until the first impact is accepted.
    pub last_trigger_ms: Option<Millis>,
    pub cooldown_ms: Millis,
}

impl DebounceGuard {
    pub fn new(cooldown_ms: Millis) -> Self {
        Self {
            last_trigger_ms: None,
            cooldown_ms,
        }
    }

    pub fn cooled_down(&self, now_ms: Millis) -> bool {
        match self.last_trigger_ms {
            // The clock moved behind the last trigger; re-arm instead of
            // waiting for it to catch up.
            Some(last) if now_ms < last => true,
            Some(last) => now_ms - last > self.cooldown_ms,
            None => true,
        }
    }

    pub fn clear(&mut self) {
        self.last_trigger_ms = None;
    }
}

impl Default for DebounceGuard {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_MS)
    }
}

/// Threshold classifier. Stateless apart from its threshold; the debounce
/// state is passed in so the caller owns it alongside the monitoring state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactClassifier {
    pub threshold: f64,
}

impl Default for ImpactClassifier {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_IMPACT_THRESHOLD,
        }
    }
}

impl ImpactClassifier {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Decides whether `sample` is a new impact.
    ///
    /// Accepts only when the magnitude is strictly above the threshold, the
    /// state is exactly `Monitoring`, and the guard has cooled down. An
    /// accepted impact stamps the guard in the same call; rejected samples
    /// never touch it.
    pub fn classify(
        &self,
        sample: &MotionSample,
        now_ms: Millis,
        guard: &mut DebounceGuard,
        state: &MonitoringState,
    ) -> Option<ImpactEvent> {
        let magnitude = sample.magnitude();

        if magnitude <= self.threshold || !state.is_monitoring() || !guard.cooled_down(now_ms) {
            return None;
        }

        guard.last_trigger_ms = Some(now_ms);
        Some(ImpactEvent {
            magnitude,
            timestamp_ms: now_ms,
        })
    }
}
