//! The assembled orb runtime: store, state manager, UI timers and
//! announcements behind a single `tick`.

use crate::announce::{announcements_for, Announcement, Announcer};
use crate::constants::{
    ANNOUNCEMENT_CLEAR_MS, AUTO_REVERT_MS, DEBUG_HISTORY_CAPACITY, ERROR_MAX_AGE_MS, FPS_WINDOW,
    IDLE_TIMEOUT_MS, SUCCESS_DISMISS_MS, UI_HISTORY_CAPACITY,
};
use crate::error::{ErrorKind, ErrorState, OperationError, RetryAction};
use crate::manager::{OrbFrame, OrbStateManager};
use crate::operation::OperationOptions;
use crate::performance::MemoryProbe;
use crate::store::{InteractionMode, Store, StoreBuilder};
use crate::timer::TimerQueue;
use crate::visual::OrbAnimationState;
use serde::Deserialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

const DEFAULT_SUCCESS_MESSAGE: &str = "Operation completed successfully";

/// Tunables for a runtime. Every field has a default, so a partial JSON
/// object is a valid config.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub auto_revert_ms: f64,
    pub idle_timeout_ms: f64,
    pub success_dismiss_ms: f64,
    pub announcement_clear_ms: f64,
    pub error_max_age_ms: f64,
    pub history_capacity: usize,
    pub fps_window: usize,
    pub particle_seed: Option<u64>,
    pub debug_history: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            auto_revert_ms: AUTO_REVERT_MS,
            idle_timeout_ms: IDLE_TIMEOUT_MS,
            success_dismiss_ms: SUCCESS_DISMISS_MS,
            announcement_clear_ms: ANNOUNCEMENT_CLEAR_MS,
            error_max_age_ms: ERROR_MAX_AGE_MS,
            history_capacity: UI_HISTORY_CAPACITY,
            fps_window: FPS_WINDOW,
            particle_seed: None,
            debug_history: false,
        }
    }
}

impl RuntimeConfig {
    /// Store builder carrying the store-side settings of this config.
    pub fn store_builder(&self) -> StoreBuilder {
        let builder = Store::builder()
            .ui_history_capacity(self.history_capacity.max(1))
            .error_max_age_ms(self.error_max_age_ms);
        if self.debug_history {
            builder.debug_history_capacity(DEBUG_HISTORY_CAPACITY)
        } else {
            builder
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UiTimer {
    DismissSuccess,
    ClearAnnouncements,
}

/// Proof that an operation was admitted by [`OrbRuntime::begin_operation`].
#[derive(Debug, PartialEq, Eq)]
pub struct OperationTicket(u64);

pub struct OrbRuntime {
    config: RuntimeConfig,
    store: Store,
    manager: OrbStateManager,
    announcer: Box<dyn Announcer>,
    pending: Rc<RefCell<Vec<Announcement>>>,
    timers: TimerQueue<UiTimer>,
    last_success: Option<String>,
    in_flight: Option<u64>,
    next_operation: u64,
}

impl OrbRuntime {
    pub fn new(
        config: RuntimeConfig,
        mut store: Store,
        memory: Box<dyn MemoryProbe>,
        announcer: Box<dyn Announcer>,
    ) -> Self {
        let pending = Rc::new(RefCell::new(Vec::new()));
        let queue = pending.clone();
        store.subscribe(move |next, prev| {
            if !Rc::ptr_eq(&next.ui, &prev.ui) {
                queue
                    .borrow_mut()
                    .extend(announcements_for(&prev.ui, &next.ui));
            }
        });
        let manager = OrbStateManager::new(&config, store.orb().animation_state, memory);
        log::info!(
            "[runtime] started in {} ({:?} quality)",
            store.orb().animation_state,
            store.orb().quality_level
        );
        let mut runtime = Self {
            config,
            store,
            manager,
            announcer,
            pending,
            timers: TimerQueue::new(),
            last_success: None,
            in_flight: None,
            next_operation: 0,
        };
        runtime.flush();
        runtime
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Direct store access; announcements and timers catch up on the next
    /// tick.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn manager(&self) -> &OrbStateManager {
        &self.manager
    }

    pub fn now_ms(&self) -> f64 {
        self.manager.now_ms()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn tick(&mut self, delta_ms: f64) -> OrbFrame {
        let now = self.manager.advance_clock(delta_ms);
        for timer in self.timers.drain_due(now) {
            match timer {
                UiTimer::DismissSuccess => self.store.clear_success(),
                UiTimer::ClearAnnouncements => self.announcer.clear(),
            }
        }
        if self.store.sweep_idle(self.config.idle_timeout_ms) {
            self.manager
                .set_interaction_mode(&mut self.store, InteractionMode::Passive);
        }
        let frame = self.manager.frame(&mut self.store, delta_ms);
        self.flush();
        frame
    }

    pub fn request_state(&mut self, state: OrbAnimationState) {
        self.manager.request_state(&mut self.store, state);
        self.flush();
    }

    pub fn set_interaction_mode(&mut self, mode: InteractionMode) {
        self.manager.set_interaction_mode(&mut self.store, mode);
        self.flush();
    }

    /// Pointer or keyboard activity: keeps the session alive and wakes the orb.
    pub fn on_user_activity(&mut self) {
        self.store.record_activity();
        if self.store.orb().interaction_mode != InteractionMode::Active {
            self.manager
                .set_interaction_mode(&mut self.store, InteractionMode::Active);
        }
        self.flush();
    }

    pub fn dismiss_error(&mut self) {
        self.store.clear_error();
        self.flush();
    }

    /// Clear the current error and return its retry closure for the caller
    /// to invoke once it has released the runtime.
    pub fn take_retry_action(&mut self) -> Option<RetryAction> {
        let action = self.store.take_retry_action();
        self.flush();
        action
    }

    /// Admit an operation. Returns `None` while another one is in flight.
    pub fn begin_operation(&mut self, options: &OperationOptions) -> Option<OperationTicket> {
        if self.in_flight.is_some() {
            log::warn!("[runtime] operation rejected: another one is in flight");
            return None;
        }
        let id = self.next_operation;
        self.next_operation += 1;
        self.in_flight = Some(id);

        if options.show_loading {
            self.store.set_loading(true);
        }
        self.manager
            .request_state(&mut self.store, OrbAnimationState::Processing);
        self.flush();
        Some(OperationTicket(id))
    }

    pub fn complete_operation<T>(
        &mut self,
        ticket: OperationTicket,
        options: &OperationOptions,
        result: &Result<T, OperationError>,
    ) {
        if self.in_flight != Some(ticket.0) {
            log::warn!("[runtime] stale operation ticket {}", ticket.0);
            return;
        }
        self.in_flight = None;

        if options.show_loading {
            self.store.set_loading(false);
        }
        match result {
            Ok(_) => {
                if options.show_success {
                    let message = options
                        .success_message
                        .clone()
                        .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
                    self.store.set_success(message);
                }
                self.manager
                    .request_state(&mut self.store, OrbAnimationState::Success);
            }
            Err(err) => {
                let kind = err
                    .kind()
                    .or(options.error_kind)
                    .unwrap_or(ErrorKind::Unknown);
                let message = options
                    .error_message
                    .clone()
                    .unwrap_or_else(|| err.to_string());
                log::error!("[runtime] operation failed ({kind:?}): {err}");
                let mut error = ErrorState::new(kind, message, self.store.now_ms())
                    .with_recoverable(options.recoverable)
                    .with_context("cause", err.to_string());
                if let Some(retry) = &options.retry {
                    error = error.with_retry(retry.clone());
                }
                self.store.set_error(error);
                self.manager
                    .request_state(&mut self.store, OrbAnimationState::Error);
            }
        }
        self.flush();
    }

    /// Last-resort capture for failures outside the store, such as a
    /// renderer that could not initialise.
    pub fn report_render_failure(&mut self, err: &dyn fmt::Display) {
        log::error!("[runtime] render failure: {err}");
        let error = ErrorState::new(ErrorKind::System, err.to_string(), self.store.now_ms())
            .with_recoverable(false)
            .with_context("source", "render");
        self.store.set_error(error);
        self.flush();
    }

    /// Deliver queued announcements and keep the UI timers in step with
    /// the UI slice.
    fn flush(&mut self) {
        let now = self.manager.now_ms();
        let pending: Vec<Announcement> = self.pending.borrow_mut().drain(..).collect();
        if !pending.is_empty() {
            for announcement in &pending {
                self.announcer.announce(announcement);
            }
            self.timers.schedule(
                UiTimer::ClearAnnouncements,
                now + self.config.announcement_clear_ms,
            );
        }

        let success = self.store.ui().success();
        match success {
            Some(message) if self.last_success.as_deref() != Some(message) => {
                self.timers
                    .schedule(UiTimer::DismissSuccess, now + self.config.success_dismiss_ms);
            }
            None => {
                self.timers.cancel(UiTimer::DismissSuccess);
            }
            Some(_) => {}
        }
        self.last_success = success.map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_config_keeps_defaults() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"autoRevertMs": 500, "particleSeed": 3}"#).unwrap();
        assert_eq!(config.auto_revert_ms, 500.0);
        assert_eq!(config.particle_seed, Some(3));
        assert_eq!(config.idle_timeout_ms, IDLE_TIMEOUT_MS);
        assert_eq!(config.fps_window, FPS_WINDOW);
    }

    #[test]
    fn store_builder_honours_debug_toggle() {
        let config = RuntimeConfig {
            debug_history: true,
            ..RuntimeConfig::default()
        };
        let mut store = config.store_builder().build();
        store.set_loading(true);
        assert_eq!(store.debug_history().map(|d| d.len()), Some(1));
        assert!(RuntimeConfig::default()
            .store_builder()
            .build()
            .debug_history()
            .is_none());
    }
}
