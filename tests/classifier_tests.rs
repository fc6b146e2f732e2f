use crashguard::kernel::state::{CountdownClock, MonitoringState};
use crashguard::kernel::time::CountdownId;
use crashguard::sensors::classifier::{DebounceGuard, ImpactClassifier};
use crashguard::sensors::types::MotionSample;

fn every_state() -> Vec<MonitoringState> {
    vec![
        MonitoringState::Idle,
        MonitoringState::Monitoring,
        MonitoringState::ConfirmationPending(CountdownClock::start(CountdownId::first(), 0, 60)),
        MonitoringState::Emergency,
        MonitoringState::Suppressed,
    ]
}

#[test]
fn nothing_at_or_below_threshold_in_any_state() {
    let classifier = ImpactClassifier::default();
    let magnitudes = [0.0, 9.8, 15.0, 24.999, 25.0];

    for state in every_state() {
        for m in magnitudes {
            for sample in [
                MotionSample::new(m, 0.0, 0.0),
                MotionSample::new(0.0, -m, 0.0),
                MotionSample::new(0.0, 0.0, m),
            ] {
                let mut guard = DebounceGuard::default();
                assert!(classifier.classify(&sample, 10_000, &mut guard, &state).is_none());
            }
        }
    }
}

#[test]
fn exactly_one_event_above_threshold_when_cooled_down() {
    let classifier = ImpactClassifier::default();
    for m in [25.001, 30.0, 80.0, 250.0] {
        let mut guard = DebounceGuard::default();
        let event = classifier
            .classify(&MotionSample::new(0.0, m, 0.0), 0, &mut guard, &MonitoringState::Monitoring)
            .expect("impact above threshold");
        assert!((event.magnitude - m).abs() < 1e-9);
        assert_eq!(guard.last_trigger_ms, Some(0));
    }
}

#[test]
fn burst_within_cooldown_yields_one_event() {
    let classifier = ImpactClassifier::default();
    let mut guard = DebounceGuard::default();
    let hard = MotionSample::new(30.0, 0.0, 0.0);

    let accepted = (0..=2_000)
        .step_by(100)
        .filter_map(|t| classifier.classify(&hard, t, &mut guard, &MonitoringState::Monitoring))
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(guard.last_trigger_ms, Some(0));
}

#[test]
fn identical_timestamps_first_processed_wins() {
    let classifier = ImpactClassifier::default();
    let mut guard = DebounceGuard::default();
    let a = MotionSample::new(30.0, 0.0, 0.0);
    let b = MotionSample::new(0.0, 60.0, 0.0);

    let first = classifier.classify(&a, 7_000, &mut guard, &MonitoringState::Monitoring);
    let second = classifier.classify(&b, 7_000, &mut guard, &MonitoringState::Monitoring);
    assert_eq!(first.map(|e| e.magnitude), Some(30.0));
    assert!(second.is_none());
}

#[test]
fn custom_threshold_and_cooldown() {
    let classifier = ImpactClassifier::new(12.0);
    let mut guard = DebounceGuard::new(500);
    let sample = MotionSample::new(0.0, 0.0, 13.0);
    let state = MonitoringState::Monitoring;

    assert!(classifier.classify(&sample, 100, &mut guard, &state).is_some());
    assert!(classifier.classify(&sample, 600, &mut guard, &state).is_none());
    assert!(classifier.classify(&sample, 601, &mut guard, &state).is_some());
}
