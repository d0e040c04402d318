//! UI slice: loading flag, current error, success message and a bounded
//! undo/redo history of those three.

use super::{RootState, Store};
use crate::error::{ErrorState, RetryAction};
use serde::Serialize;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiEvent {
    StartLoading,
    StopLoading,
    SetError,
    ClearError,
    SetSuccess,
    ClearSuccess,
    Reset,
}

impl UiEvent {
    /// Classify the change between two snapshots; first matching rule wins.
    pub fn between(prev: &UiSnapshot, next: &UiSnapshot) -> UiEvent {
        if !prev.is_loading && next.is_loading {
            UiEvent::StartLoading
        } else if prev.is_loading && !next.is_loading {
            UiEvent::StopLoading
        } else if prev.error.is_none() && next.error.is_some() {
            UiEvent::SetError
        } else if prev.error.is_some() && next.error.is_none() {
            UiEvent::ClearError
        } else if prev.success.is_none() && next.success.is_some() {
            UiEvent::SetSuccess
        } else if prev.success.is_some() && next.success.is_none() {
            UiEvent::ClearSuccess
        } else {
            UiEvent::Reset
        }
    }
}

/// The user-visible part of the UI slice.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiSnapshot {
    pub is_loading: bool,
    pub error: Option<ErrorState>,
    pub success: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub id: u64,
    pub event: UiEvent,
    pub timestamp_ms: f64,
    pub snapshot: UiSnapshot,
}

/// Ring buffer of UI snapshots with a cursor for undo/redo.
#[derive(Clone, Debug, PartialEq)]
pub struct UiHistory {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    capacity: usize,
    track: bool,
    next_id: u64,
}

impl UiHistory {
    fn new(capacity: usize) -> Self {
        let mut history = Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            cursor: 0,
            capacity: capacity.max(1),
            track: true,
            next_id: 0,
        };
        history.push(UiEvent::Reset, 0.0, UiSnapshot::default());
        history
    }

    fn push(&mut self, event: UiEvent, timestamp_ms: f64, snapshot: UiSnapshot) {
        // a new entry discards anything that could have been redone
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(HistoryEntry {
            id: self.next_id,
            event,
            timestamp_ms,
            snapshot,
        });
        self.next_id += 1;
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_tracking(&self) -> bool {
        self.track
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UiState {
    current: UiSnapshot,
    history: UiHistory,
    // retry counter carried into the next error after a retry was taken
    pending_retries: u32,
}

impl Default for UiState {
    fn default() -> Self {
        Self::with_capacity(crate::constants::UI_HISTORY_CAPACITY)
    }
}

impl UiState {
    pub fn with_capacity(history_capacity: usize) -> Self {
        Self {
            current: UiSnapshot::default(),
            history: UiHistory::new(history_capacity),
            pending_retries: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.current.is_loading
    }

    pub fn error(&self) -> Option<&ErrorState> {
        self.current.error.as_ref()
    }

    pub fn success(&self) -> Option<&str> {
        self.current.success.as_deref()
    }

    pub fn snapshot(&self) -> &UiSnapshot {
        &self.current
    }

    pub fn history(&self) -> &UiHistory {
        &self.history
    }

    fn replace(&mut self, mut next: UiSnapshot, now: f64) {
        if let Some(err) = &mut next.error {
            if self.current.error.as_ref() != Some(&*err) {
                err.retry_count = err.retry_count.max(self.pending_retries);
                self.pending_retries = 0;
            }
        } else if next.success.is_some() {
            self.pending_retries = 0;
        }
        let event = UiEvent::between(&self.current, &next);
        self.current = next;
        if self.history.track {
            self.history.push(event, now, self.current.clone());
        }
    }

    /// Set or clear the error; a new error always replaces success.
    pub(crate) fn put_error(&mut self, error: Option<ErrorState>, now: f64) {
        let mut next = self.current.clone();
        if error.is_some() {
            next.success = None;
        }
        next.error = error;
        if next != self.current {
            self.replace(next, now);
        }
    }
}

/// Edit the UI snapshot, touching the slice only when something changed.
fn edit_ui(state: &mut RootState, now: f64, f: impl FnOnce(&mut UiSnapshot)) {
    let mut next = state.ui.current.clone();
    f(&mut next);
    if next != state.ui.current {
        Rc::make_mut(&mut state.ui).replace(next, now);
    }
}

impl Store {
    pub fn set_loading(&mut self, is_loading: bool) {
        self.update("set_loading", |s, now| {
            edit_ui(s, now, |ui| ui.is_loading = is_loading);
            Ok(())
        });
    }

    pub fn set_error(&mut self, error: ErrorState) {
        self.update("set_error", |s, now| {
            if s.ui.current.error.as_ref() != Some(&error) {
                Rc::make_mut(&mut s.ui).put_error(Some(error), now);
            }
            Ok(())
        });
    }

    pub fn clear_error(&mut self) {
        self.update("clear_error", |s, now| {
            edit_ui(s, now, |ui| ui.error = None);
            Ok(())
        });
    }

    /// Set a success message; clears any error.
    pub fn set_success(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.update("set_success", |s, now| {
            edit_ui(s, now, |ui| {
                ui.success = Some(message);
                ui.error = None;
            });
            Ok(())
        });
    }

    pub fn clear_success(&mut self) {
        self.update("clear_success", |s, now| {
            edit_ui(s, now, |ui| ui.success = None);
            Ok(())
        });
    }

    /// Clear a recoverable error and hand back its retry closure.
    ///
    /// The caller invokes the closure once it no longer holds the store, so
    /// the retried operation can borrow it again.
    pub fn take_retry_action(&mut self) -> Option<RetryAction> {
        let error = self.ui().error()?;
        if !error.recoverable {
            return None;
        }
        let action = error.retry_action.clone()?;
        let retries = error.retry_count + 1;
        self.update("retry_last_action", |s, now| {
            let ui = Rc::make_mut(&mut s.ui);
            ui.pending_retries = retries;
            let mut next = ui.current.clone();
            next.error = None;
            ui.replace(next, now);
            Ok(())
        });
        Some(action)
    }

    pub fn reset_ui(&mut self) {
        self.update("reset_ui", |s, now| {
            edit_ui(s, now, |ui| *ui = UiSnapshot::default());
            Ok(())
        });
    }

    pub fn undo(&mut self) -> bool {
        if !self.ui().history.can_undo() {
            return false;
        }
        self.update("undo", |s, _| {
            let ui = Rc::make_mut(&mut s.ui);
            ui.history.cursor -= 1;
            ui.current = ui.history.entries[ui.history.cursor].snapshot.clone();
            Ok(())
        })
    }

    pub fn redo(&mut self) -> bool {
        if !self.ui().history.can_redo() {
            return false;
        }
        self.update("redo", |s, _| {
            let ui = Rc::make_mut(&mut s.ui);
            ui.history.cursor += 1;
            ui.current = ui.history.entries[ui.history.cursor].snapshot.clone();
            Ok(())
        })
    }

    /// Drop all history but the current snapshot.
    pub fn clear_history(&mut self) {
        self.update("clear_history", |s, now| {
            let ui = Rc::make_mut(&mut s.ui);
            let capacity = ui.history.capacity;
            let track = ui.history.track;
            ui.history = UiHistory::new(capacity);
            ui.history.track = track;
            ui.history.entries[0].snapshot = ui.current.clone();
            ui.history.entries[0].timestamp_ms = now;
            Ok(())
        });
    }

    pub fn set_track_history(&mut self, track: bool) {
        self.update("set_track_history", |s, _| {
            if s.ui.history.track != track {
                Rc::make_mut(&mut s.ui).history.track = track;
            }
            Ok(())
        });
    }
}
