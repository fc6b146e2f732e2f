use std::sync::Arc;

use tracing::{debug, info, warn};

use super::config::GuardConfig;
use super::escalation::{EscalationMachine, Intent, Rejection, Transition, Trigger, TriggerKind};
use super::event::{Event, UserCommand};
use super::journal::{JournalEvent, TransitionJournal};
use super::scheduler::{AlertContext, Scheduler, SideEffect};
use super::state::MonitoringState;
use super::time::Clock;
use crate::directory::types::DirectorySnapshot;
use crate::sensors::cache::TelemetryCache;
use crate::sensors::classifier::{DebounceGuard, ImpactClassifier};
use crate::sensors::hub::SensorError;
use crate::sensors::normalize::{normalize_geo, normalize_motion, normalize_orientation};
use crate::sensors::raw::SensorReading;
use crate::sensors::types::ImpactEvent;

/// The kernel. Every event is run to completion before the next one is
/// looked at; nothing in here awaits.
pub struct Reactor {
    machine: EscalationMachine,
    classifier: ImpactClassifier,
    guard: DebounceGuard,
    scheduler: Scheduler,
    clock: Arc<dyn Clock>,
    directory: DirectorySnapshot,
    /// The impact that opened the current (or most recent) countdown.
    last_impact: Option<ImpactEvent>,
    pub cache: TelemetryCache,
    pub journal: TransitionJournal,
}

impl Reactor {
    pub fn new(config: &GuardConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            machine: EscalationMachine::new(config.countdown_secs),
            classifier: ImpactClassifier::new(config.impact_threshold),
            guard: DebounceGuard::new(config.cooldown_ms),
            scheduler: Scheduler,
            clock,
            directory: DirectorySnapshot::default(),
            last_impact: None,
            cache: TelemetryCache::new(),
            journal: TransitionJournal::new(),
        }
    }

    pub fn with_directory(mut self, directory: DirectorySnapshot) -> Self {
        self.directory = directory;
        self
    }

    pub fn state(&self) -> &MonitoringState {
        self.machine.state()
    }

    pub fn guard(&self) -> &DebounceGuard {
        &self.guard
    }

    pub fn directory(&self) -> &DirectorySnapshot {
        &self.directory
    }

    /// Processes a batch strictly in arrival order.
    pub fn step(&mut self, events: Vec<Event>) -> Vec<SideEffect> {
        let mut effects = Vec::new();
        for event in events {
            effects.extend(self.handle(event));
        }
        effects
    }

    pub fn handle(&mut self, event: Event) -> Vec<SideEffect> {
        match event {
            Event::Sensor(reading) => self.on_reading(reading),
            Event::Command(cmd) => self.submit(command_trigger(cmd)).unwrap_or_default(),
            Event::CountdownTick(id) => self.submit(Trigger::CountdownTick(id)).unwrap_or_default(),
            Event::SensorUnavailable(err) => self.on_sensor_unavailable(err),
            Event::DirectoryChanged(snapshot) => {
                debug!(contacts = snapshot.contacts.len(), "directory updated");
                self.directory = snapshot;
                Vec::new()
            }
        }
    }

    /// Feeds one trigger to the machine. Rejections are logged and journaled
    /// here and handed back to the caller; they never change state.
    pub fn submit(&mut self, trigger: Trigger) -> Result<Vec<SideEffect>, Rejection> {
        let now_ms = self.clock.now_ms();

        match self.machine.apply(trigger, now_ms) {
            Ok(transition) => {
                if transition.from != transition.to {
                    info!(
                        from = ?transition.from,
                        to = ?transition.to,
                        trigger = ?transition.trigger,
                        "transition"
                    );
                }
                self.journal.record(JournalEvent::Transition {
                    from: transition.from,
                    to: transition.to,
                    trigger: transition.trigger,
                    escalation: transition.escalation,
                    at_ms: now_ms,
                });
                Ok(self.project(transition, now_ms))
            }
            Err(rejection) => {
                debug!(%rejection, "transition rejected");
                self.journal.record(JournalEvent::Rejected {
                    state: self.machine.state().kind(),
                    trigger: trigger.kind(),
                    stale_tick: matches!(rejection, Rejection::StaleCountdown { .. }),
                    at_ms: now_ms,
                });
                Err(rejection)
            }
        }
    }

    fn project(&mut self, transition: Transition, now_ms: i64) -> Vec<SideEffect> {
        if transition.trigger == TriggerKind::Reset {
            self.guard.clear();
        }

        let ctx = AlertContext {
            location: self.cache.geo(),
            directory: &self.directory,
            impact: self.last_impact,
            cause: transition.escalation,
            now_ms,
        };
        let effects: Vec<SideEffect> = transition
            .intents
            .iter()
            .map(|intent| self.scheduler.schedule(*intent, &ctx))
            .collect();

        // The location watch goes away with the sensors, and so does its fix.
        if transition.intents.contains(&Intent::DetachSensors) {
            self.cache.clear_geo();
        }

        effects
    }

    fn on_reading(&mut self, reading: SensorReading) -> Vec<SideEffect> {
        // Readings queued before a detach must not refill the cache.
        if !self.machine.state().kind().sensors_attached() {
            debug!(?reading, "reading arrived with sensors detached, dropped");
            return Vec::new();
        }

        match reading {
            SensorReading::Motion(raw) => {
                let Some(sample) = normalize_motion(&raw) else {
                    debug!("motion callback without acceleration data skipped");
                    return Vec::new();
                };
                self.cache.update_motion(sample);

                let now_ms = self.clock.now_ms();
                let impact = self
                    .classifier
                    .classify(&sample, now_ms, &mut self.guard, self.machine.state());

                match impact {
                    Some(impact) => {
                        warn!(magnitude = impact.magnitude, "impact detected");
                        self.journal.record(JournalEvent::ImpactDetected {
                            magnitude: impact.magnitude,
                            at_ms: impact.timestamp_ms,
                        });
                        self.last_impact = Some(impact);
                        self.submit(Trigger::Impact(impact)).unwrap_or_default()
                    }
                    None => Vec::new(),
                }
            }
            SensorReading::Orientation(raw) => {
                self.cache.update_orientation(normalize_orientation(&raw));
                Vec::new()
            }
            SensorReading::Geo(raw) => {
                let fix = normalize_geo(&raw, self.cache.geo());
                self.cache.update_geo(fix);
                Vec::new()
            }
        }
    }

    fn on_sensor_unavailable(&mut self, err: SensorError) -> Vec<SideEffect> {
        warn!(error = %err, "sensors unavailable");
        self.journal.record(JournalEvent::SensorsUnavailable {
            at_ms: self.clock.now_ms(),
        });

        let mut effects = vec![SideEffect::Banner(err.to_string())];
        if let Ok(more) = self.submit(Trigger::SensorsUnavailable) {
            effects.extend(more);
        }
        effects
    }
}

fn command_trigger(cmd: UserCommand) -> Trigger {
    match cmd {
        UserCommand::StartMonitoring => Trigger::StartMonitoring,
        UserCommand::StopMonitoring => Trigger::StopMonitoring,
        UserCommand::ConfirmSafe => Trigger::UserConfirmedSafe,
        UserCommand::ForceEmergency => Trigger::UserForcedEmergency,
        UserCommand::Abort => Trigger::UserAborted,
        UserCommand::ToggleOff => Trigger::ToggleMonitoringOff,
        UserCommand::ToggleOn => Trigger::ToggleMonitoringOn,
        UserCommand::Reset => Trigger::Reset,
    }
}
