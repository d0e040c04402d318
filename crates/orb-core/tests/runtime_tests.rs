// The assembled runtime: operations, UI timers, announcements and idle sweep.

use orb_core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct Harness {
    runtime: Rc<RefCell<OrbRuntime>>,
    announcer: RecordingAnnouncer,
    clock: ManualClock,
}

fn harness() -> Harness {
    let config = RuntimeConfig {
        particle_seed: Some(11),
        debug_history: true,
        ..RuntimeConfig::default()
    };
    let clock = ManualClock::new(0.0);
    let store = config.store_builder().clock(Rc::new(clock.clone())).build();
    let announcer = RecordingAnnouncer::new();
    let runtime = OrbRuntime::new(
        config,
        store,
        Box::new(NoMemoryProbe),
        Box::new(announcer.clone()),
    );
    Harness {
        runtime: Rc::new(RefCell::new(runtime)),
        announcer,
        clock,
    }
}

impl Harness {
    fn run(&self, ms: f64) {
        let mut elapsed = 0.0;
        while elapsed < ms {
            self.clock.advance(20.0);
            self.runtime.borrow_mut().tick(20.0);
            elapsed += 20.0;
        }
    }

    fn state(&self) -> OrbAnimationState {
        self.runtime.borrow().store().orb().animation_state
    }
}

async fn flaky(fail: bool) -> Result<u32, OperationError> {
    if fail {
        Err(OperationError::Network("connection reset".into()))
    } else {
        Ok(7)
    }
}

#[test]
fn failing_operation_sets_error_state_and_announces() {
    let h = harness();
    let retries = Rc::new(Cell::new(0));
    let counter = retries.clone();
    let options = OperationOptions::default()
        .with_retry(RetryAction::new(move || counter.set(counter.get() + 1)));

    let result = pollster::block_on(execute(&h.runtime, options, flaky(true)));
    assert!(matches!(result, Some(Err(OperationError::Network(_)))));

    {
        let rt = h.runtime.borrow();
        let ui = rt.store().ui();
        assert!(!ui.is_loading());
        let error = ui.error().expect("error recorded");
        assert_eq!(error.kind, ErrorKind::Network);
        assert!(error.retry_action.is_some());
    }
    assert_eq!(h.state(), OrbAnimationState::Error);

    let announced = h.announcer.announcements();
    assert!(announced
        .iter()
        .any(|a| a.politeness == Politeness::Assertive && a.message.contains("connection reset")));
    assert!(announced.iter().any(|a| a.message == "Loading..."));

    let retry = h.runtime.borrow_mut().take_retry_action().expect("retry");
    retry.invoke();
    assert_eq!(retries.get(), 1);
    assert!(h.runtime.borrow().store().ui().error().is_none());
}

#[test]
fn successful_operation_dismisses_after_three_seconds() {
    let h = harness();
    let options = OperationOptions::default().with_success_message("Saved");
    let result = pollster::block_on(execute(&h.runtime, options, flaky(false)));
    assert_eq!(result, Some(Ok(7)));
    assert_eq!(h.state(), OrbAnimationState::Success);
    assert_eq!(h.runtime.borrow().store().ui().success(), Some("Saved"));
    assert!(h.announcer.messages().contains(&"Saved".to_string()));

    h.run(2000.0);
    assert_eq!(h.state(), OrbAnimationState::Idle);
    assert_eq!(h.runtime.borrow().store().ui().success(), Some("Saved"));

    h.run(1000.0);
    assert_eq!(h.runtime.borrow().store().ui().success(), None);
}

#[test]
fn announcements_clear_after_five_seconds() {
    let h = harness();
    h.runtime.borrow_mut().store_mut().set_loading(true);
    h.run(20.0);
    assert_eq!(h.announcer.messages(), vec!["Loading...".to_string()]);
    assert_eq!(h.announcer.clears(), 0);
    h.run(5000.0);
    assert_eq!(h.announcer.clears(), 1);
}

#[test]
fn concurrent_operation_is_rejected() {
    let h = harness();
    let options = OperationOptions::default();
    let ticket = h.runtime.borrow_mut().begin_operation(&options).expect("first");
    assert!(h.runtime.borrow().is_busy());
    assert!(h.runtime.borrow_mut().begin_operation(&options).is_none());

    let second = pollster::block_on(execute(&h.runtime, options.clone(), flaky(false)));
    assert!(second.is_none());

    h.runtime
        .borrow_mut()
        .complete_operation(ticket, &options, &Ok::<(), OperationError>(()));
    assert!(!h.runtime.borrow().is_busy());
}

#[test]
fn operation_kinds_fall_back_to_options_then_unknown() {
    let h = harness();
    let options = OperationOptions {
        show_success: false,
        ..OperationOptions::default()
    }
    .with_error_kind(ErrorKind::Server)
    .with_error_message("Could not reach the assistant");

    let other = async { Err::<(), _>(OperationError::Other("500".into())) };
    pollster::block_on(execute(&h.runtime, options, other));
    {
        let rt = h.runtime.borrow();
        let error = rt.store().ui().error().unwrap();
        assert_eq!(error.kind, ErrorKind::Server);
        assert_eq!(error.message, "Could not reach the assistant");
    }

    h.runtime.borrow_mut().dismiss_error();
    let plain = async { Err::<(), _>(OperationError::Other("?".into())) };
    pollster::block_on(execute(&h.runtime, OperationOptions::default(), plain));
    let rt = h.runtime.borrow();
    assert_eq!(rt.store().ui().error().unwrap().kind, ErrorKind::Unknown);
}

#[test]
fn submit_message_validates_then_reports_missing_backend() {
    let h = harness();
    let empty = pollster::block_on(execute(
        &h.runtime,
        OperationOptions::default(),
        submit_message("   ".into()),
    ));
    assert!(matches!(empty, Some(Err(OperationError::Validation(_)))));
    assert_eq!(
        h.runtime.borrow().store().ui().error().unwrap().kind,
        ErrorKind::Validation
    );

    let sent = pollster::block_on(submit_message("hello".into()));
    assert_eq!(sent, Err(OperationError::NotImplemented("message submission")));
    let voice = pollster::block_on(start_voice_input());
    assert_eq!(voice, Err(OperationError::NotImplemented("voice input")));
}

#[test]
fn idle_session_goes_passive() {
    let h = harness();
    h.runtime.borrow_mut().on_user_activity();
    assert_eq!(h.state(), OrbAnimationState::Active);
    h.runtime
        .borrow_mut()
        .store_mut()
        .set_context_value("draft", "hi");

    h.clock.advance(31.0 * 60_000.0);
    h.run(20.0);
    {
        let rt = h.runtime.borrow();
        let store = rt.store();
        assert!(!store.session().is_active);
        assert!(store.session().context.is_empty());
        assert_eq!(store.orb().interaction_mode, InteractionMode::Passive);
    }
    assert_eq!(h.state(), OrbAnimationState::Inactive);

    h.runtime.borrow_mut().on_user_activity();
    assert!(h.runtime.borrow().store().session().is_active);
    assert_eq!(h.state(), OrbAnimationState::Active);
}

#[test]
fn direct_store_write_survives_revert_deadline() {
    let h = harness();
    let mut rt = h.runtime.borrow_mut();
    rt.request_state(OrbAnimationState::Success);
    for _ in 0..99 {
        rt.tick(20.0);
    }
    rt.store_mut()
        .set_animation_state(OrbAnimationState::Processing);
    let frame = rt.tick(20.0);
    assert_eq!(frame.state, OrbAnimationState::Processing);
    assert_eq!(rt.store().orb().animation_state, OrbAnimationState::Processing);
    assert!(!rt.manager().auto_revert_pending());
}

#[test]
fn render_failure_is_unrecoverable_system_error() {
    let h = harness();
    h.runtime
        .borrow_mut()
        .report_render_failure(&"WebGL context lost");
    let rt = h.runtime.borrow();
    let error = rt.store().ui().error().unwrap();
    assert_eq!(error.kind, ErrorKind::System);
    assert!(!error.recoverable);
    drop(rt);
    assert!(h.runtime.borrow_mut().take_retry_action().is_none());
}

#[test]
fn frames_report_transition_progress() {
    let h = harness();
    h.runtime
        .borrow_mut()
        .request_state(OrbAnimationState::Processing);
    let frame = h.runtime.borrow_mut().tick(300.0);
    assert_eq!(frame.state, OrbAnimationState::Processing);
    assert_eq!(frame.previous_state, Some(OrbAnimationState::Idle));
    assert!(frame.progress > 0.0 && frame.progress < 1.0);

    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["state"], "processing");
    assert_eq!(json["quality"], "HIGH");
    assert!(json["uniforms"]["radius"].is_number());
}
