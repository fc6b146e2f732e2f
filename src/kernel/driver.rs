use std::collections::VecDeque;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::GuardConfig;
use super::escalation::Screen;
use super::event::Event;
use super::reactor::Reactor;
use super::scheduler::SideEffect;
use super::time::CountdownId;
use crate::outputs::{ContactNotifier, Navigator, Siren};
use crate::sensors::hub::{SensorHub, SubscriptionSet};

pub struct Collaborators {
    pub navigator: Box<dyn Navigator>,
    pub notifier: Box<dyn ContactNotifier>,
    pub siren: Box<dyn Siren>,
    pub sensors: Box<dyn SensorHub>,
}

struct RunningCountdown {
    id: CountdownId,
    cancel: CancellationToken,
}

/// Single consumer of the event queue. Pulls one event, runs it through the
/// reactor, executes the resulting side effects, then pulls the next.
pub struct Driver {
    reactor: Reactor,
    receiver: mpsc::Receiver<Event>,
    sender: mpsc::Sender<Event>,
    collab: Collaborators,
    subscriptions: SubscriptionSet,
    countdown: Option<RunningCountdown>,
    tick_period: Duration,
    siren_enabled: bool,
    shutdown: CancellationToken,
    /// Follow-up events raised while executing effects (e.g. a failed
    /// attach). They run before anything else is pulled from the channel.
    follow_ups: VecDeque<Event>,
}

impl Driver {
    pub fn new(reactor: Reactor, collab: Collaborators, config: &GuardConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity);
        Self {
            reactor,
            receiver,
            sender,
            collab,
            subscriptions: SubscriptionSet::new(),
            countdown: None,
            tick_period: Duration::from_millis(config.countdown_tick_ms),
            siren_enabled: config.siren_enabled,
            shutdown: CancellationToken::new(),
            follow_ups: VecDeque::new(),
        }
    }

    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.sender.clone()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn reactor(&self) -> &Reactor {
        &self.reactor
    }

    pub fn subscriptions(&self) -> &SubscriptionSet {
        &self.subscriptions
    }

    pub fn countdown_running(&self) -> Option<CountdownId> {
        self.countdown.as_ref().map(|c| c.id)
    }

    pub async fn run(mut self) -> Reactor {
        info!("driver loop started");
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                next = self.receiver.recv() => match next {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
            }
        }
        self.stop_countdown();
        self.subscriptions.detach_all();
        self.collab.siren.set_active(false);
        info!("driver loop stopped");
        self.reactor
    }

    /// Waits for the next queued event and processes it fully.
    pub async fn pump(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Processes whatever is queued right now without waiting.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.dispatch(event);
            count += 1;
        }
        count
    }

    pub fn dispatch(&mut self, event: Event) {
        self.follow_ups.push_back(event);
        while let Some(next) = self.follow_ups.pop_front() {
            let effects = self.reactor.handle(next);
            self.execute(effects);
        }
    }

    fn execute(&mut self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::Navigate(screen) => {
                    self.collab.navigator.navigate_to(screen);
                    self.collab
                        .siren
                        .set_active(self.siren_enabled && screen == Screen::Confirmation);
                }
                SideEffect::NotifyContacts(payload) => {
                    if let Err(e) = self.collab.notifier.notify_contacts(&payload) {
                        warn!("contact notification failed: {:#}", e);
                    }
                }
                SideEffect::StartCountdown(id) => self.start_countdown(id),
                SideEffect::CancelCountdown(id) => {
                    if self.countdown_running() == Some(id) {
                        self.stop_countdown();
                    }
                }
                SideEffect::AttachSensors => {
                    if let Err(err) = self
                        .subscriptions
                        .attach_all(&mut *self.collab.sensors, &self.sender)
                    {
                        self.follow_ups.push_back(Event::SensorUnavailable(err));
                    }
                }
                SideEffect::DetachSensors => {
                    self.subscriptions.detach_all();
                }
                SideEffect::Banner(message) => self.collab.navigator.show_banner(&message),
            }
        }
    }

    fn start_countdown(&mut self, id: CountdownId) {
        self.stop_countdown();

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let tx = self.sender.clone();
        let period = self.tick_period;

        tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticks.tick() => {
                        if tx.send(Event::CountdownTick(id)).await.is_err() {
                            break;
                        }
                    }
                }
            }
            debug!(?id, "countdown timer stopped");
        });

        debug!(?id, "countdown timer started");
        self.countdown = Some(RunningCountdown { id, cancel });
    }

    fn stop_countdown(&mut self) {
        if let Some(running) = self.countdown.take() {
            running.cancel.cancel();
        }
    }
}
