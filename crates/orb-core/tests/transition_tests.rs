// Transition timing, cancellation and the manager's per-frame loop.

use orb_core::*;

fn setup() -> (OrbStateManager, Store) {
    let config = RuntimeConfig {
        particle_seed: Some(9),
        ..RuntimeConfig::default()
    };
    let store = Store::builder().debug_history(true).build();
    let manager = OrbStateManager::new(&config, store.orb().animation_state, Box::new(NoMemoryProbe));
    (manager, store)
}

#[test]
fn progress_is_monotonic_and_reaches_one() {
    let (mut m, mut store) = setup();
    m.request_state(&mut store, OrbAnimationState::Success);

    let mut last = store.orb().progress();
    assert_eq!(last, 0.0);
    for _ in 0..60 {
        m.tick(&mut store, 13.0);
        let p = store.orb().progress();
        assert!(p >= last, "progress went {last} -> {p}");
        last = p;
    }
    assert_eq!(last, 1.0);
    assert_eq!(store.orb().previous_state(), None);
}

#[test]
fn controller_ignores_backwards_clock() {
    let mut c = TransitionController::new(OrbAnimationState::Idle);
    assert!(c.begin(OrbAnimationState::Processing, 1000.0));
    assert_eq!(c.advance(1300.0), TransitionStep::Running(0.5));
    assert_eq!(c.advance(1100.0), TransitionStep::Running(0.5));
    assert_eq!(c.advance(1600.0), TransitionStep::Completed);
    assert_eq!(c.advance(1700.0), TransitionStep::Resting);
}

#[test]
fn begin_to_current_target_is_a_no_op() {
    let mut c = TransitionController::new(OrbAnimationState::Idle);
    assert!(!c.begin(OrbAnimationState::Idle, 0.0));
    assert!(!c.state().in_flight());
}

#[test]
fn retrigger_restarts_from_displayed_config() {
    let (mut m, mut store) = setup();
    m.request_state(&mut store, OrbAnimationState::Processing);
    m.tick(&mut store, 200.0);
    assert!(store.orb().progress() > 0.0);
    let on_screen = m.controller().current_config();

    m.request_state(&mut store, OrbAnimationState::Error);
    assert_eq!(store.orb().progress(), 0.0);
    assert_eq!(store.orb().previous_state(), Some(OrbAnimationState::Processing));
    assert_eq!(m.controller().current_config(), on_screen);

    // no jump: the first frame of the new transition starts where the old one was
    let processing = OrbVisualConfig::for_state(OrbAnimationState::Processing);
    assert!(on_screen.distance(&processing) > 1e-3);
}

#[test]
fn processing_transition_settles_within_its_duration() {
    let (mut m, mut store) = setup();
    store.set_animation_state(OrbAnimationState::Processing);
    // a zero-length frame observes the request without moving the clock
    m.tick(&mut store, 0.0);
    assert_eq!(store.orb().previous_state(), Some(OrbAnimationState::Idle));

    let target = OrbVisualConfig::for_state(OrbAnimationState::Processing);
    let mut last_distance = f32::MAX;
    let mut elapsed = 0.0;
    while elapsed < 600.0 {
        m.tick(&mut store, 20.0);
        elapsed += 20.0;
        let d = m.controller().current_config().distance(&target);
        assert!(d <= last_distance, "moved away from target at {elapsed}ms");
        last_distance = d;
    }
    assert_eq!(store.orb().progress(), 1.0);
    assert_eq!(store.orb().previous_state(), None);
    assert_eq!(m.controller().current_config().base_hex(), "#4a90e2");
}

#[test]
fn success_reverts_to_idle_after_two_seconds() {
    let (mut m, mut store) = setup();
    m.request_state(&mut store, OrbAnimationState::Success);
    for _ in 0..99 {
        m.tick(&mut store, 20.0);
    }
    assert_eq!(store.orb().animation_state, OrbAnimationState::Success);
    m.tick(&mut store, 20.0);
    assert_eq!(store.orb().animation_state, OrbAnimationState::Idle);
    assert!(!m.auto_revert_pending());
}

#[test]
fn new_trigger_cancels_pending_revert() {
    let (mut m, mut store) = setup();
    m.request_state(&mut store, OrbAnimationState::Success);
    for _ in 0..50 {
        m.tick(&mut store, 20.0);
    }
    m.request_state(&mut store, OrbAnimationState::Error);

    // past the success deadline, still inside the error one
    for _ in 0..60 {
        m.tick(&mut store, 20.0);
    }
    assert_eq!(store.orb().animation_state, OrbAnimationState::Error);

    for _ in 0..40 {
        m.tick(&mut store, 20.0);
    }
    assert_eq!(store.orb().animation_state, OrbAnimationState::Idle);
}

#[test]
fn store_request_just_before_deadline_beats_revert() {
    let (mut m, mut store) = setup();
    m.request_state(&mut store, OrbAnimationState::Success);
    for _ in 0..99 {
        m.tick(&mut store, 20.0);
    }
    store.set_animation_state(OrbAnimationState::Error);
    m.tick(&mut store, 20.0);
    assert_eq!(store.orb().animation_state, OrbAnimationState::Error);
    assert!(m.auto_revert_pending());

    // the error gets its own full revert window
    for _ in 0..98 {
        m.tick(&mut store, 20.0);
    }
    assert_eq!(store.orb().animation_state, OrbAnimationState::Error);
    for _ in 0..2 {
        m.tick(&mut store, 20.0);
    }
    assert_eq!(store.orb().animation_state, OrbAnimationState::Idle);
}

#[test]
fn non_reverting_trigger_clears_revert() {
    let (mut m, mut store) = setup();
    m.request_state(&mut store, OrbAnimationState::Error);
    m.tick(&mut store, 100.0);
    m.request_state(&mut store, OrbAnimationState::Processing);
    assert!(!m.auto_revert_pending());
    for _ in 0..200 {
        m.tick(&mut store, 20.0);
    }
    assert_eq!(store.orb().animation_state, OrbAnimationState::Processing);
}
