use crate::actions::{self, SharedRuntime};
use crate::constants::MESSAGE_INPUT_ID;
use crate::dom;
use crate::input::command_for_key;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_global_keydown(ev: &web::KeyboardEvent, runtime: &SharedRuntime, document: &web::Document) {
    actions::with_runtime(runtime, |rt| rt.on_user_activity());

    let key = ev.key();
    let typing = dom::is_typing(document);
    if typing && key == "Enter" {
        if let Some(text) = dom::take_input_value(document, MESSAGE_INPUT_ID) {
            actions::submit(runtime.clone(), text);
        }
        ev.prevent_default();
        return;
    }
    let ctrl = ev.ctrl_key() || ev.meta_key();
    if let Some(command) = command_for_key(&key, ctrl, ev.shift_key(), typing) {
        log::debug!("[keys] {key} -> {command:?}");
        actions::apply_command(runtime, command);
        ev.prevent_default();
    }
}

pub fn wire_global_keydown(runtime: SharedRuntime, document: web::Document) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &runtime, &document);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
