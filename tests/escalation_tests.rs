use crashguard::kernel::escalation::{
    EscalationCause, EscalationMachine, Intent, Rejection, Screen, Trigger,
};
use crashguard::kernel::state::{MonitoringState, StateKind};
use crashguard::kernel::time::CountdownId;
use crashguard::sensors::types::ImpactEvent;

fn impact(at_ms: i64) -> Trigger {
    Trigger::Impact(ImpactEvent {
        magnitude: 30.0,
        timestamp_ms: at_ms,
    })
}

/// Drives a fresh machine into the requested state.
fn machine_in(kind: StateKind) -> EscalationMachine {
    let mut m = EscalationMachine::new(60);
    let path: Vec<Trigger> = match kind {
        StateKind::Idle => vec![],
        StateKind::Monitoring => vec![Trigger::StartMonitoring],
        StateKind::ConfirmationPending => vec![Trigger::StartMonitoring, impact(0)],
        StateKind::Emergency => vec![
            Trigger::StartMonitoring,
            impact(0),
            Trigger::UserForcedEmergency,
        ],
        StateKind::Suppressed => vec![Trigger::ToggleMonitoringOff],
    };
    for t in path {
        m.apply(t, 0).expect("setup transition");
    }
    assert_eq!(m.state().kind(), kind);
    m
}

fn live_countdown(m: &EscalationMachine) -> CountdownId {
    m.state().countdown().expect("countdown running").id
}

const ALL_STATES: [StateKind; 5] = [
    StateKind::Idle,
    StateKind::Monitoring,
    StateKind::ConfirmationPending,
    StateKind::Emergency,
    StateKind::Suppressed,
];

fn all_triggers() -> Vec<Trigger> {
    vec![
        Trigger::StartMonitoring,
        Trigger::StopMonitoring,
        impact(0),
        Trigger::UserConfirmedSafe,
        Trigger::CountdownTick(CountdownId::first()),
        Trigger::CountdownTick(CountdownId(99)),
        Trigger::UserForcedEmergency,
        Trigger::UserAborted,
        Trigger::ToggleMonitoringOff,
        Trigger::ToggleMonitoringOn,
        Trigger::SensorsUnavailable,
        Trigger::Reset,
    ]
}

#[test]
fn every_state_trigger_pair_is_defined() {
    for state in ALL_STATES {
        for trigger in all_triggers() {
            let mut m = machine_in(state);
            let before = *m.state();
            match m.apply(trigger, 1_000) {
                Ok(t) => {
                    assert_eq!(t.from, state);
                    assert_eq!(t.to, m.state().kind());
                }
                Err(_) => {
                    assert_eq!(
                        *m.state(),
                        before,
                        "rejection must leave state untouched ({:?}, {:?})",
                        state,
                        trigger
                    );
                }
            }
        }
    }
}

#[test]
fn table_transitions() {
    let cases: Vec<(StateKind, Trigger, StateKind)> = vec![
        (StateKind::Idle, Trigger::StartMonitoring, StateKind::Monitoring),
        (StateKind::Monitoring, impact(0), StateKind::ConfirmationPending),
        (StateKind::Monitoring, Trigger::StopMonitoring, StateKind::Idle),
        (StateKind::ConfirmationPending, Trigger::UserConfirmedSafe, StateKind::Monitoring),
        (StateKind::ConfirmationPending, Trigger::UserForcedEmergency, StateKind::Emergency),
        (StateKind::Emergency, Trigger::UserAborted, StateKind::Monitoring),
        (StateKind::Idle, Trigger::ToggleMonitoringOff, StateKind::Suppressed),
        (StateKind::Monitoring, Trigger::ToggleMonitoringOff, StateKind::Suppressed),
        (StateKind::ConfirmationPending, Trigger::ToggleMonitoringOff, StateKind::Suppressed),
        (StateKind::Emergency, Trigger::ToggleMonitoringOff, StateKind::Suppressed),
        (StateKind::Suppressed, Trigger::ToggleMonitoringOn, StateKind::Monitoring),
        (StateKind::Monitoring, Trigger::SensorsUnavailable, StateKind::Idle),
        (StateKind::Emergency, Trigger::Reset, StateKind::Idle),
    ];

    for (from, trigger, to) in cases {
        let mut m = machine_in(from);
        let t = m.apply(trigger, 0).unwrap_or_else(|e| panic!("{:?} + {:?}: {}", from, trigger, e));
        assert_eq!(t.to, to, "{:?} + {:?}", from, trigger);
    }
}

#[test]
fn invalid_pairs_are_rejected_not_fatal() {
    let mut m = machine_in(StateKind::Idle);
    assert_eq!(
        m.apply(Trigger::UserConfirmedSafe, 0),
        Err(Rejection::InvalidTransition {
            state: StateKind::Idle,
            trigger: crashguard::kernel::escalation::TriggerKind::UserConfirmedSafe,
        })
    );

    let mut m = machine_in(StateKind::Suppressed);
    assert!(m.apply(Trigger::ToggleMonitoringOff, 0).is_err());
    assert!(m.apply(impact(0), 0).is_err());
    assert_eq!(m.state().kind(), StateKind::Suppressed);

    let mut m = machine_in(StateKind::Emergency);
    assert!(m.apply(Trigger::UserConfirmedSafe, 0).is_err());
    assert!(m.apply(impact(0), 0).is_err());
}

#[test]
fn impact_opens_countdown_with_navigation() {
    let mut m = machine_in(StateKind::Monitoring);
    let t = m.apply(impact(500), 500).expect("impact accepted");

    let id = live_countdown(&m);
    assert_eq!(
        t.intents,
        vec![
            Intent::StartCountdown(id),
            Intent::Navigate(Screen::Confirmation)
        ]
    );
    let clock = m.state().countdown().expect("clock");
    assert_eq!(clock.remaining_seconds(), 60);
    assert_eq!(clock.deadline_ms(), 60_500);
}

#[test]
fn countdown_strictly_decreases_then_escalates_once() {
    let mut m = machine_in(StateKind::ConfirmationPending);
    let id = live_countdown(&m);

    let mut last = m.state().remaining_seconds().expect("pending");
    for _ in 0..59 {
        let t = m.apply(Trigger::CountdownTick(id), 0).expect("tick");
        assert!(t.intents.is_empty());
        let now = m.state().remaining_seconds().expect("still pending");
        assert_eq!(now, last - 1);
        last = now;
    }
    assert_eq!(last, 1);

    let t = m.apply(Trigger::CountdownTick(id), 0).expect("final tick");
    assert_eq!(t.to, StateKind::Emergency);
    assert_eq!(t.escalation, Some(EscalationCause::CountdownExpired));
    assert_eq!(
        t.intents,
        vec![
            Intent::CancelCountdown(id),
            Intent::Navigate(Screen::Emergency),
            Intent::NotifyContacts
        ]
    );

    // A late tick from the same countdown is a no-op.
    assert!(matches!(
        m.apply(Trigger::CountdownTick(id), 0),
        Err(Rejection::StaleCountdown { live: None, .. })
    ));
    assert_eq!(m.state().kind(), StateKind::Emergency);
}

#[test]
fn confirmation_racing_last_tick_wins_when_first() {
    let mut m = machine_in(StateKind::ConfirmationPending);
    let id = live_countdown(&m);
    for _ in 0..59 {
        m.apply(Trigger::CountdownTick(id), 0).expect("tick");
    }

    let t = m.apply(Trigger::UserConfirmedSafe, 0).expect("confirm");
    assert_eq!(t.to, StateKind::Monitoring);
    assert_eq!(
        t.intents,
        vec![
            Intent::CancelCountdown(id),
            Intent::Navigate(Screen::Dashboard)
        ]
    );

    assert!(m.apply(Trigger::CountdownTick(id), 0).is_err());
    assert_eq!(*m.state(), MonitoringState::Monitoring);
}

#[test]
fn last_tick_wins_when_first() {
    let mut m = machine_in(StateKind::ConfirmationPending);
    let id = live_countdown(&m);
    for _ in 0..60 {
        m.apply(Trigger::CountdownTick(id), 0).expect("tick");
    }
    assert_eq!(m.state().kind(), StateKind::Emergency);
    assert!(m.apply(Trigger::UserConfirmedSafe, 0).is_err());
    assert_eq!(m.state().kind(), StateKind::Emergency);
}

#[test]
fn ticks_from_an_old_countdown_are_stale() {
    let mut m = machine_in(StateKind::ConfirmationPending);
    let first = live_countdown(&m);
    m.apply(Trigger::UserConfirmedSafe, 0).expect("confirm");
    m.apply(impact(5_000), 5_000).expect("second impact");
    let second = live_countdown(&m);
    assert_ne!(first, second);

    assert_eq!(
        m.apply(Trigger::CountdownTick(first), 0),
        Err(Rejection::StaleCountdown {
            live: Some(second),
            got: first
        })
    );
    assert_eq!(m.state().remaining_seconds(), Some(60));
}

#[test]
fn suppressing_cancels_running_countdown() {
    let mut m = machine_in(StateKind::ConfirmationPending);
    let id = live_countdown(&m);
    let t = m.apply(Trigger::ToggleMonitoringOff, 0).expect("toggle off");
    assert_eq!(
        t.intents,
        vec![
            Intent::CancelCountdown(id),
            Intent::DetachSensors,
            Intent::Navigate(Screen::Dashboard)
        ]
    );
    assert!(m.state().countdown().is_none());

    let t = m.apply(Trigger::ToggleMonitoringOn, 0).expect("toggle on");
    assert_eq!(t.intents, vec![Intent::AttachSensors]);
}

#[test]
fn sensor_outage_only_degrades_plain_monitoring() {
    let mut m = machine_in(StateKind::Monitoring);
    let t = m.apply(Trigger::SensorsUnavailable, 0).expect("degrade");
    assert_eq!(t.to, StateKind::Idle);
    assert_eq!(t.intents, vec![Intent::DetachSensors]);

    let mut m = machine_in(StateKind::ConfirmationPending);
    assert!(m.apply(Trigger::SensorsUnavailable, 0).is_err());
    assert_eq!(m.state().kind(), StateKind::ConfirmationPending);
}
