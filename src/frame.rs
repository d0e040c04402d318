use crate::constants::FRAME_STALL_MS;
use crate::input::frame_delta;
use crate::view;
use crate::{dom, toast};
use instant::Instant;
use orb_core::{OrbFrame, OrbRuntime, PreferencesState, UiState};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Per-page state owned by the animation loop.
pub struct FrameContext {
    pub runtime: Rc<RefCell<OrbRuntime>>,
    pub document: web::Document,
    pub latest: Rc<RefCell<Option<OrbFrame>>>,
    pub last_instant: Instant,
    // identity of the slices last mirrored into the DOM
    pub shown_ui: Option<Rc<UiState>>,
    pub shown_prefs: Option<Rc<PreferencesState>>,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let raw_ms = (now - self.last_instant).as_secs_f64() * 1000.0;
        self.last_instant = now;

        let Ok(mut runtime) = self.runtime.try_borrow_mut() else {
            // an event handler holds the runtime; catch up next frame
            return;
        };
        let frame = runtime.tick(frame_delta(raw_ms, FRAME_STALL_MS));
        let state = runtime.store().state().clone();
        drop(runtime);

        *self.latest.borrow_mut() = Some(frame);
        self.sync_dom(&state.ui, &state.preferences);
    }

    fn sync_dom(&mut self, ui: &Rc<UiState>, prefs: &Rc<PreferencesState>) {
        if !same(&self.shown_ui, ui) {
            toast::render(&self.document, view::toast_view(ui).as_ref());
            self.shown_ui = Some(ui.clone());
        }
        if !same(&self.shown_prefs, prefs) {
            dom::apply_body_classes(&self.document, &view::body_classes(prefs), prefs.font_size);
            self.shown_prefs = Some(prefs.clone());
        }
    }
}

fn same<T>(shown: &Option<Rc<T>>, current: &Rc<T>) -> bool {
    shown.as_ref().is_some_and(|s| Rc::ptr_eq(s, current))
}

/// Stops the animation loop when cancelled.
#[derive(Clone)]
pub struct FrameHandle {
    cancelled: Rc<Cell<bool>>,
}

impl FrameHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(tick: &TickSlot) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> FrameHandle {
    let handle = FrameHandle {
        cancelled: Rc::new(Cell::new(false)),
    };
    let tick: TickSlot = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let cancelled = handle.cancelled.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if cancelled.get() {
            log::info!("[frame] loop stopped");
            return;
        }
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
    handle
}
