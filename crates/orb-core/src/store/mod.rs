//! Sliced application state.
//!
//! `RootState` holds four independently owned slices behind `Rc`. Every
//! mutation goes through [`Store::update`]: the closure edits a draft, only
//! the slices it touches get new allocations, and the commit runs the
//! middleware (debug history, persistence) before notifying subscribers.
//! An `Err` from the closure never escapes: the draft is dropped and the
//! failure lands in the UI slice as a `System` error.

mod middleware;
mod orb;
mod preferences;
mod session;
mod ui;

pub use middleware::{DebugEntry, DebugHistory};
pub use orb::{InteractionMode, OrbState};
pub use preferences::{PreferencesState, Theme};
pub use session::{SessionMetadata, SessionState};
pub use ui::{HistoryEntry, UiEvent, UiHistory, UiSnapshot, UiState};

use crate::clock::{Clock, SystemClock};
use crate::constants::{DEBUG_HISTORY_CAPACITY, ERROR_MAX_AGE_MS, UI_HISTORY_CAPACITY};
use crate::error::{ErrorKind, ErrorState, StoreError};
use crate::persist::{Persistence, StorageBackend};
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
pub struct RootState {
    pub ui: Rc<UiState>,
    pub orb: Rc<OrbState>,
    pub session: Rc<SessionState>,
    pub preferences: Rc<PreferencesState>,
}

/// Which slices differ by identity between two snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SliceChanges {
    pub ui: bool,
    pub orb: bool,
    pub session: bool,
    pub preferences: bool,
}

impl SliceChanges {
    pub fn any(&self) -> bool {
        self.ui || self.orb || self.session || self.preferences
    }
}

impl RootState {
    pub fn changes_since(&self, prev: &RootState) -> SliceChanges {
        SliceChanges {
            ui: !Rc::ptr_eq(&self.ui, &prev.ui),
            orb: !Rc::ptr_eq(&self.orb, &prev.orb),
            session: !Rc::ptr_eq(&self.session, &prev.session),
            preferences: !Rc::ptr_eq(&self.preferences, &prev.preferences),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&RootState, &RootState)>;

pub struct Store {
    state: RootState,
    clock: Rc<dyn Clock>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    debug: Option<DebugHistory>,
    persistence: Option<Persistence>,
}

impl Default for Store {
    fn default() -> Self {
        StoreBuilder::new().build()
    }
}

impl Store {
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub fn state(&self) -> &RootState {
        &self.state
    }

    pub fn ui(&self) -> &UiState {
        &self.state.ui
    }

    pub fn orb(&self) -> &OrbState {
        &self.state.orb
    }

    pub fn session(&self) -> &SessionState {
        &self.state.session
    }

    pub fn preferences(&self) -> &PreferencesState {
        &self.state.preferences
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn debug_history(&self) -> Option<&DebugHistory> {
        self.debug.as_ref()
    }

    pub fn clear_debug_history(&mut self) {
        if let Some(d) = &mut self.debug {
            d.clear();
        }
    }

    /// Register a listener called with `(next, prev)` after every commit.
    pub fn subscribe(&mut self, f: impl FnMut(&RootState, &RootState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    /// Apply a named mutation. Returns `false` when the closure failed and
    /// the failure was captured into the UI slice instead.
    pub fn update<F>(&mut self, action: &'static str, f: F) -> bool
    where
        F: FnOnce(&mut RootState, f64) -> Result<(), StoreError>,
    {
        let now = self.clock.now_ms();
        let prev = self.state.clone();
        let mut draft = prev.clone();
        match f(&mut draft, now) {
            Ok(()) => {
                self.commit(action, prev, draft);
                true
            }
            Err(err) => {
                log::error!("[store] {action} failed: {err}");
                let error = ErrorState::new(ErrorKind::System, err.to_string(), now)
                    .with_context("action", action);
                let mut next = prev.clone();
                Rc::make_mut(&mut next.ui).put_error(Some(error), now);
                self.commit("capture_error", prev, next);
                false
            }
        }
    }

    fn commit(&mut self, action: &'static str, prev: RootState, next: RootState) {
        let changes = next.changes_since(&prev);
        if !changes.any() {
            return;
        }
        self.state = next;
        let now = self.clock.now_ms();
        if let Some(debug) = &mut self.debug {
            debug.record(now, action, changes, &prev, &self.state);
        }
        if let Some(persistence) = &self.persistence {
            persistence.persist(changes, &prev, &self.state);
        }
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.state, &prev);
        }
    }
}

/// Explicit construction of a store; restores persisted slices on `build`.
pub struct StoreBuilder {
    clock: Rc<dyn Clock>,
    debug_history: Option<usize>,
    history_capacity: usize,
    error_max_age_ms: f64,
    local: Option<Box<dyn StorageBackend>>,
    session: Option<Box<dyn StorageBackend>>,
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            clock: Rc::new(SystemClock),
            debug_history: None,
            history_capacity: UI_HISTORY_CAPACITY,
            error_max_age_ms: ERROR_MAX_AGE_MS,
            local: None,
            session: None,
        }
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn debug_history(mut self, enabled: bool) -> Self {
        self.debug_history = enabled.then_some(DEBUG_HISTORY_CAPACITY);
        self
    }

    pub fn debug_history_capacity(mut self, capacity: usize) -> Self {
        self.debug_history = Some(capacity);
        self
    }

    pub fn ui_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn error_max_age_ms(mut self, max_age_ms: f64) -> Self {
        self.error_max_age_ms = max_age_ms;
        self
    }

    /// Long-lived storage: preferences and persistent errors.
    pub fn local_storage(mut self, backend: impl StorageBackend + 'static) -> Self {
        self.local = Some(Box::new(backend));
        self
    }

    /// Per-tab storage: the session snapshot.
    pub fn session_storage(mut self, backend: impl StorageBackend + 'static) -> Self {
        self.session = Some(Box::new(backend));
        self
    }

    pub fn build(self) -> Store {
        let now = self.clock.now_ms();
        let mut state = RootState {
            ui: Rc::new(UiState::with_capacity(self.history_capacity)),
            orb: Rc::default(),
            session: Rc::new(SessionState::new(now)),
            preferences: Rc::default(),
        };
        let persistence = if self.local.is_some() || self.session.is_some() {
            let p = Persistence::new(self.local, self.session, self.error_max_age_ms);
            p.restore(&mut state, now);
            Some(p)
        } else {
            None
        };
        Store {
            state,
            clock: self.clock,
            subscribers: Vec::new(),
            next_subscription: 0,
            debug: self.debug_history.map(DebugHistory::new),
            persistence,
        }
    }
}
