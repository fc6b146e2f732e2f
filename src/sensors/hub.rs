use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::raw::SensorReading;
use super::types::SensorKind;
use crate::kernel::event::Event;

pub type EventSink = mpsc::Sender<Event>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("sensor permission denied")]
    PermissionDenied,
    #[error("{0:?} sensor is not available on this device")]
    Unavailable(SensorKind),
}

/// Platform sensor access. Implementations push readings into the sink they
/// were given until the returned handle is dropped or unsubscribed.
pub trait SensorHub: Send {
    fn request_permission(&mut self) -> PermissionStatus;
    fn subscribe(
        &mut self,
        kind: SensorKind,
        sink: EventSink,
    ) -> Result<SubscriptionHandle, SensorError>;
}

/// Unsubscribes on drop.
#[derive(Debug)]
pub struct SubscriptionHandle {
    kind: SensorKind,
    token: CancellationToken,
}

impl SubscriptionHandle {
    pub fn new(kind: SensorKind, token: CancellationToken) -> Self {
        Self { kind, token }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn unsubscribe(self) {
        self.token.cancel();
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// At most one live subscription per sensor kind.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    active: HashMap<SensorKind, SubscriptionHandle>,
    permission: Option<PermissionStatus>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes every kind that is not already live. On any failure all
    /// subscriptions are torn down so nothing is left half-attached.
    pub fn attach_all(
        &mut self,
        hub: &mut dyn SensorHub,
        sink: &EventSink,
    ) -> Result<usize, SensorError> {
        if self.permission != Some(PermissionStatus::Granted) {
            let status = hub.request_permission();
            self.permission = Some(status);
            if status == PermissionStatus::Denied {
                self.detach_all();
                return Err(SensorError::PermissionDenied);
            }
        }

        let mut attached = 0;
        for kind in SensorKind::ALL {
            if self.active.contains_key(&kind) {
                continue;
            }
            match hub.subscribe(kind, sink.clone()) {
                Ok(handle) => {
                    self.active.insert(kind, handle);
                    attached += 1;
                }
                Err(err) => {
                    self.detach_all();
                    return Err(err);
                }
            }
        }

        if attached > 0 {
            info!(attached, "sensor subscriptions attached");
        }
        Ok(attached)
    }

    pub fn detach_all(&mut self) -> usize {
        let count = self.active.len();
        for (_, handle) in self.active.drain() {
            handle.unsubscribe();
        }
        if count > 0 {
            info!(count, "sensor subscriptions detached");
        }
        count
    }

    pub fn is_active(&self, kind: SensorKind) -> bool {
        self.active.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[derive(Debug)]
struct Tap {
    kind: SensorKind,
    sink: EventSink,
    token: CancellationToken,
}

#[derive(Debug)]
struct LoopbackInner {
    taps: Vec<Tap>,
    permission: PermissionStatus,
    missing: HashSet<SensorKind>,
}

/// Hub whose readings are pushed in from outside (the console harness, or
/// a test). A reading reaches the kernel only through a live subscription.
#[derive(Debug, Clone)]
pub struct LoopbackHub {
    inner: Arc<Mutex<LoopbackInner>>,
}

impl Default for LoopbackHub {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackHub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(LoopbackInner {
                taps: Vec::new(),
                permission: PermissionStatus::Granted,
                missing: HashSet::new(),
            })),
        }
    }

    pub fn deny_permission(self) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.permission = PermissionStatus::Denied;
        }
        self
    }

    pub fn without(self, kind: SensorKind) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.missing.insert(kind);
        }
        self
    }

    /// Delivers a reading to the live subscription of its kind, if any.
    /// Returns whether it was delivered.
    pub fn feed(&self, reading: SensorReading) -> bool {
        let kind = match reading {
            SensorReading::Motion(_) => SensorKind::Motion,
            SensorReading::Orientation(_) => SensorKind::Orientation,
            SensorReading::Geo(_) => SensorKind::Geo,
        };

        let Ok(mut inner) = self.inner.lock() else {
            return false;
        };
        inner.taps.retain(|tap| !tap.token.is_cancelled());

        let mut delivered = false;
        for tap in inner.taps.iter().filter(|tap| tap.kind == kind) {
            match tap.sink.try_send(Event::Sensor(reading)) {
                Ok(()) => delivered = true,
                Err(err) => debug!(?kind, %err, "sensor reading dropped"),
            }
        }
        delivered
    }

    pub fn live_subscriptions(&self, kind: SensorKind) -> usize {
        self.inner
            .lock()
            .map(|inner| {
                inner
                    .taps
                    .iter()
                    .filter(|tap| tap.kind == kind && !tap.token.is_cancelled())
                    .count()
            })
            .unwrap_or(0)
    }
}

impl SensorHub for LoopbackHub {
    fn request_permission(&mut self) -> PermissionStatus {
        self.inner
            .lock()
            .map(|inner| inner.permission)
            .unwrap_or(PermissionStatus::Denied)
    }

    fn subscribe(
        &mut self,
        kind: SensorKind,
        sink: EventSink,
    ) -> Result<SubscriptionHandle, SensorError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| SensorError::Unavailable(kind))?;
        if inner.missing.contains(&kind) {
            return Err(SensorError::Unavailable(kind));
        }
        inner.taps.retain(|tap| !tap.token.is_cancelled());

        let token = CancellationToken::new();
        inner.taps.push(Tap {
            kind,
            sink,
            token: token.clone(),
        });
        Ok(SubscriptionHandle::new(kind, token))
    }
}
