use crate::actions::{self, SharedRuntime};
use crate::constants::ACTIVITY_THROTTLE_MS;
use crate::input::ActivityThrottle;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Forward mouse movement and clicks as user activity, rate limited.
pub fn wire_activity(runtime: SharedRuntime) {
    let Some(window) = web::window() else {
        return;
    };
    let throttle = Rc::new(RefCell::new(ActivityThrottle::new(ACTIVITY_THROTTLE_MS)));
    for event in ["mousemove", "mousedown"] {
        let runtime = runtime.clone();
        let throttle = throttle.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::MouseEvent| {
            if throttle.borrow_mut().should_fire(js_sys::Date::now()) {
                actions::with_runtime(&runtime, |rt| rt.on_user_activity());
            }
        }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
