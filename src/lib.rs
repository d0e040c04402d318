#![cfg(target_arch = "wasm32")]
use instant::Instant;
use orb_core::{Clock, MemoryProbe, OrbFrame, OrbRuntime, RuntimeConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod actions;
mod announcer;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod storage;
mod toast;
mod view;

use actions::SharedRuntime;
use constants::{SUBMIT_BUTTON_ID, TOAST_DISMISS_ID, TOAST_RETRY_ID, VOICE_BUTTON_ID, MESSAGE_INPUT_ID};

thread_local! {
    static RUNTIME: RefCell<Option<SharedRuntime>> = const { RefCell::new(None) };
    static LATEST_FRAME: Rc<RefCell<Option<OrbFrame>>> = Rc::new(RefCell::new(None));
    static FRAME_HANDLE: RefCell<Option<frame::FrameHandle>> = const { RefCell::new(None) };
}

/// `performance.memory.usedJSHeapSize` where the browser exposes it.
struct JsHeapProbe;

impl MemoryProbe for JsHeapProbe {
    fn used_heap_mb(&self) -> Option<f64> {
        let performance = web::window()?.performance()?;
        let memory = js_sys::Reflect::get(&performance, &JsValue::from_str("memory")).ok()?;
        if memory.is_undefined() {
            return None;
        }
        let used = js_sys::Reflect::get(&memory, &JsValue::from_str("usedJSHeapSize")).ok()?;
        used.as_f64().map(|bytes| bytes / (1024.0 * 1024.0))
    }
}

/// `Date.now()`; `std::time::SystemTime` is unavailable on wasm32.
struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

fn build_runtime(document: &web::Document) -> anyhow::Result<OrbRuntime> {
    let config = RuntimeConfig::default();
    let mut builder = config.store_builder().clock(Rc::new(JsClock));
    match storage::WebStorage::local() {
        Some(local) => builder = builder.local_storage(local),
        None => log::warn!("localStorage unavailable; preferences will not persist"),
    }
    if let Some(session) = storage::WebStorage::session() {
        builder = builder.session_storage(session);
    }
    let announcer = announcer::LiveRegionAnnouncer::new(document)?;
    Ok(OrbRuntime::new(
        config,
        builder.build(),
        Box::new(JsHeapProbe),
        Box::new(announcer),
    ))
}

fn wire_buttons(document: &web::Document, runtime: &SharedRuntime) {
    let rt = runtime.clone();
    let doc = document.clone();
    dom::add_click_listener(document, SUBMIT_BUTTON_ID, move || {
        if let Some(text) = dom::take_input_value(&doc, MESSAGE_INPUT_ID) {
            actions::submit(rt.clone(), text);
        }
    });
    let rt = runtime.clone();
    dom::add_click_listener(document, VOICE_BUTTON_ID, move || {
        actions::voice_input(rt.clone());
    });
    let rt = runtime.clone();
    dom::add_click_listener(document, TOAST_RETRY_ID, move || actions::retry(&rt));
    let rt = runtime.clone();
    dom::add_click_listener(document, TOAST_DISMISS_ID, move || {
        actions::with_runtime(&rt, |r| r.dismiss_error());
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("orb-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let runtime: SharedRuntime = Rc::new(RefCell::new(build_runtime(&document)?));

    wire_buttons(&document, &runtime);
    events::wire_global_keydown(runtime.clone(), document.clone());
    events::wire_activity(runtime.clone());

    let latest = LATEST_FRAME.with(|f| f.clone());
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        runtime: runtime.clone(),
        document,
        latest,
        last_instant: Instant::now(),
        shown_ui: None,
        shown_prefs: None,
    }));
    let handle = frame::start_loop(frame_ctx);
    FRAME_HANDLE.with(|h| *h.borrow_mut() = Some(handle));
    RUNTIME.with(|r| *r.borrow_mut() = Some(runtime));
    Ok(())
}

fn runtime() -> Option<SharedRuntime> {
    RUNTIME.with(|r| r.borrow().clone())
}

/// The most recent frame as JSON (uniforms, state, quality, particle config)
/// for an external renderer.
#[wasm_bindgen]
pub fn orb_frame_json() -> Result<String, JsValue> {
    LATEST_FRAME.with(|f| match f.borrow().as_ref() {
        Some(frame) => serde_json::to_string(frame).map_err(|e| JsValue::from_str(&e.to_string())),
        None => Ok("null".to_string()),
    })
}

/// Particle attributes of the latest frame, packed as `ParticleVertex` floats.
#[wasm_bindgen]
pub fn orb_particles() -> js_sys::Float32Array {
    LATEST_FRAME.with(|f| match f.borrow().as_ref() {
        Some(frame) => {
            let floats: &[f32] = bytemuck::cast_slice(&frame.particles.particles);
            js_sys::Float32Array::from(floats)
        }
        None => js_sys::Float32Array::new_with_length(0),
    })
}

/// Request an animation state by name ("idle", "processing", ...).
#[wasm_bindgen]
pub fn orb_request_state(name: &str) {
    if let Some(rt) = runtime() {
        let state = orb_core::OrbAnimationState::parse_lossy(name);
        actions::with_runtime(&rt, |r| r.request_state(state));
    }
}

#[wasm_bindgen]
pub fn orb_submit(text: String) {
    if let Some(rt) = runtime() {
        actions::submit(rt, text);
    }
}

/// Report a renderer failure; shown as a non-recoverable system error.
#[wasm_bindgen]
pub fn orb_report_render_failure(message: &str) {
    if let Some(rt) = runtime() {
        actions::with_runtime(&rt, |r| r.report_render_failure(&message));
    }
}

/// Stop the frame loop (page teardown or hot reload).
#[wasm_bindgen]
pub fn orb_stop() {
    FRAME_HANDLE.with(|h| {
        if let Some(handle) = h.borrow_mut().take() {
            handle.cancel();
        }
    });
}
