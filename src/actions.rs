use crate::constants::SPEED_STEP;
use crate::input::KeyCommand;
use crate::view::next_theme;
use orb_core::{
    execute, start_voice_input, submit_message, ErrorKind, OperationOptions, OrbRuntime,
    RetryAction,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

pub type SharedRuntime = Rc<RefCell<OrbRuntime>>;

/// Run `f` against the runtime unless something else already holds it.
pub fn with_runtime<R>(runtime: &SharedRuntime, f: impl FnOnce(&mut OrbRuntime) -> R) -> Option<R> {
    match runtime.try_borrow_mut() {
        Ok(mut rt) => Some(f(&mut rt)),
        Err(_) => {
            log::warn!("[actions] runtime busy, input dropped");
            None
        }
    }
}

pub fn submit(runtime: SharedRuntime, text: String) {
    let retry = {
        let runtime = runtime.clone();
        let text = text.clone();
        RetryAction::new(move || submit(runtime.clone(), text.clone()))
    };
    let options = OperationOptions::default()
        .with_error_kind(ErrorKind::Client)
        .with_success_message("Message sent")
        .with_retry(retry);
    spawn_local(async move {
        if execute(&runtime, options, submit_message(text)).await.is_none() {
            log::info!("[actions] submit ignored while another request runs");
        }
    });
}

pub fn voice_input(runtime: SharedRuntime) {
    let retry = {
        let runtime = runtime.clone();
        RetryAction::new(move || voice_input(runtime.clone()))
    };
    let options = OperationOptions {
        show_success: false,
        ..OperationOptions::default()
    }
    .with_error_kind(ErrorKind::Client)
    .with_retry(retry);
    spawn_local(async move {
        _ = execute(&runtime, options, start_voice_input()).await;
    });
}

/// Take the retry closure and invoke it after the runtime is released.
pub fn retry(runtime: &SharedRuntime) {
    let action = with_runtime(runtime, |rt| rt.take_retry_action()).flatten();
    if let Some(action) = action {
        action.invoke();
    }
}

pub fn apply_command(runtime: &SharedRuntime, command: KeyCommand) {
    match command {
        KeyCommand::Retry => retry(runtime),
        KeyCommand::VoiceInput => voice_input(runtime.clone()),
        _ => {
            with_runtime(runtime, |rt| apply_store_command(rt, command));
        }
    }
}

fn apply_store_command(rt: &mut OrbRuntime, command: KeyCommand) {
    match command {
        KeyCommand::DismissError => rt.dismiss_error(),
        KeyCommand::Undo => {
            rt.store_mut().undo();
        }
        KeyCommand::Redo => {
            rt.store_mut().redo();
        }
        KeyCommand::ToggleReduceMotion => {
            let on = rt.store().preferences().reduce_motion;
            rt.store_mut().set_reduce_motion(!on);
        }
        KeyCommand::ToggleHighContrast => {
            let on = rt.store().preferences().high_contrast;
            rt.store_mut().set_high_contrast(!on);
        }
        KeyCommand::CycleTheme => {
            let theme = next_theme(rt.store().preferences().theme);
            rt.store_mut().set_theme(theme);
        }
        KeyCommand::SpeedUp | KeyCommand::SlowDown => {
            let step = if command == KeyCommand::SpeedUp {
                SPEED_STEP
            } else {
                -SPEED_STEP
            };
            let speed = rt.store().orb().animation_speed + step;
            rt.store_mut().set_animation_speed(speed);
        }
        KeyCommand::Retry | KeyCommand::VoiceInput => {}
    }
}
