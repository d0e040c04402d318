//! Versioned persistence of store slices.
//!
//! Each blob is a JSON envelope `{"version": N, "state": ...}` under a fixed
//! key. Reads never fail the caller: anything missing, malformed or from an
//! unsupported version falls back to defaults and is logged.

use crate::constants::{
    ERROR_KEY, ERROR_VERSION, PREFERENCES_KEY, PREFERENCES_VERSION, SESSION_KEY, SESSION_VERSION,
};
use crate::error::{ContextMap, ErrorState, StorageError};
use crate::store::{PreferencesState, RootState, SessionState, SliceChanges};
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Key/value string storage (browser local/session storage or in-memory).
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend; clones share the same map, which lets tests "reload"
/// by building a second store over the same storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<FnvHashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    state: T,
}

fn read_envelope(
    backend: &dyn StorageBackend,
    key: &str,
) -> Result<Option<Envelope<serde_json::Value>>, StorageError> {
    match backend.get_item(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

fn write_envelope<T: Serialize>(
    backend: &dyn StorageBackend,
    key: &str,
    version: u32,
    state: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(&Envelope { version, state })?;
    backend.set_item(key, &raw)
}

fn decode_preferences(envelope: Envelope<serde_json::Value>) -> Result<PreferencesState, StorageError> {
    if envelope.version != PREFERENCES_VERSION {
        return Err(StorageError::VersionMismatch {
            stored: envelope.version,
            supported: PREFERENCES_VERSION,
        });
    }
    let prefs: PreferencesState = serde_json::from_value(envelope.state)?;
    prefs
        .validate()
        .map_err(|e| StorageError::Invalid(e.to_string()))?;
    Ok(prefs)
}

/// Stored preferences, or defaults when absent or unusable.
pub fn load_preferences(backend: &dyn StorageBackend) -> PreferencesState {
    match read_envelope(backend, PREFERENCES_KEY).and_then(|e| e.map(decode_preferences).transpose()) {
        Ok(Some(prefs)) => prefs,
        Ok(None) => PreferencesState::default(),
        Err(e) => {
            log::warn!("[persist] preferences unusable ({e}), using defaults");
            PreferencesState::default()
        }
    }
}

pub fn save_preferences(
    backend: &dyn StorageBackend,
    prefs: &PreferencesState,
) -> Result<(), StorageError> {
    write_envelope(backend, PREFERENCES_KEY, PREFERENCES_VERSION, prefs)
}

/// Version 0 stored only `{ "context": {...} }`; metadata is re-created.
fn migrate_session_v0(state: serde_json::Value, now_ms: f64) -> Result<SessionState, StorageError> {
    #[derive(Deserialize)]
    struct V0 {
        #[serde(default)]
        context: ContextMap,
    }
    let old: V0 = serde_json::from_value(state)?;
    let mut session = SessionState::new(now_ms);
    session.context = old.context;
    Ok(session)
}

fn decode_session(
    envelope: Envelope<serde_json::Value>,
    now_ms: f64,
) -> Result<SessionState, StorageError> {
    let mut session = match envelope.version {
        0 => migrate_session_v0(envelope.state, now_ms)?,
        SESSION_VERSION => serde_json::from_value(envelope.state)?,
        stored => {
            return Err(StorageError::VersionMismatch {
                stored,
                supported: SESSION_VERSION,
            })
        }
    };
    // rehydrating counts as activity
    session.is_active = true;
    session.last_activity_ms = now_ms;
    session.metadata.version = SESSION_VERSION;
    session.metadata.updated_at_ms = now_ms;
    Ok(session)
}

pub fn load_session(backend: &dyn StorageBackend, now_ms: f64) -> Option<SessionState> {
    match read_envelope(backend, SESSION_KEY)
        .and_then(|e| e.map(|e| decode_session(e, now_ms)).transpose())
    {
        Ok(session) => session,
        Err(e) => {
            log::warn!("[persist] session snapshot unusable ({e}), starting fresh");
            None
        }
    }
}

pub fn save_session(backend: &dyn StorageBackend, session: &SessionState) -> Result<(), StorageError> {
    write_envelope(backend, SESSION_KEY, SESSION_VERSION, session)
}

/// A persisted error still within `max_age_ms`; expired or unreadable
/// entries are removed.
pub fn load_error(backend: &dyn StorageBackend, now_ms: f64, max_age_ms: f64) -> Option<ErrorState> {
    let decoded = read_envelope(backend, ERROR_KEY).and_then(|e| {
        e.map(|e| {
            if e.version != ERROR_VERSION {
                return Err(StorageError::VersionMismatch {
                    stored: e.version,
                    supported: ERROR_VERSION,
                });
            }
            Ok(serde_json::from_value::<ErrorState>(e.state)?)
        })
        .transpose()
    });
    match decoded {
        Ok(Some(error)) if error.kind.is_persistent() && error.is_fresh(now_ms, max_age_ms) => {
            Some(error)
        }
        Ok(None) => None,
        Ok(Some(_)) => {
            log::debug!("[persist] discarding expired error");
            _ = backend.remove_item(ERROR_KEY);
            None
        }
        Err(e) => {
            log::warn!("[persist] persisted error unusable ({e})");
            _ = backend.remove_item(ERROR_KEY);
            None
        }
    }
}

pub fn save_error(backend: &dyn StorageBackend, error: &ErrorState) -> Result<(), StorageError> {
    write_envelope(backend, ERROR_KEY, ERROR_VERSION, error)
}

/// Persistence middleware owned by the store.
pub struct Persistence {
    local: Option<Box<dyn StorageBackend>>,
    session: Option<Box<dyn StorageBackend>>,
    error_max_age_ms: f64,
}

impl Persistence {
    pub fn new(
        local: Option<Box<dyn StorageBackend>>,
        session: Option<Box<dyn StorageBackend>>,
        error_max_age_ms: f64,
    ) -> Self {
        Self {
            local,
            session,
            error_max_age_ms,
        }
    }

    pub(crate) fn restore(&self, state: &mut RootState, now_ms: f64) {
        if let Some(local) = &self.local {
            state.preferences = Rc::new(load_preferences(local.as_ref()));
            if let Some(error) = load_error(local.as_ref(), now_ms, self.error_max_age_ms) {
                log::info!("[persist] restored {:?} error from previous page", error.kind);
                Rc::make_mut(&mut state.ui).put_error(Some(error), now_ms);
            }
        }
        if let Some(session_store) = &self.session {
            if let Some(session) = load_session(session_store.as_ref(), now_ms) {
                state.session = Rc::new(session);
            }
        }
    }

    pub(crate) fn persist(&self, changes: SliceChanges, prev: &RootState, next: &RootState) {
        if let Some(local) = &self.local {
            if changes.preferences {
                if let Err(e) = save_preferences(local.as_ref(), &next.preferences) {
                    log::warn!("[persist] failed to save preferences: {e}");
                }
            }
            if changes.ui && prev.ui.error() != next.ui.error() {
                let result = match next.ui.error() {
                    Some(error) if error.kind.is_persistent() => save_error(local.as_ref(), error),
                    _ => local.remove_item(ERROR_KEY),
                };
                if let Err(e) = result {
                    log::warn!("[persist] failed to update persisted error: {e}");
                }
            }
        }
        if let Some(session_store) = &self.session {
            if changes.session {
                if let Err(e) = save_session(session_store.as_ref(), &next.session) {
                    log::warn!("[persist] failed to save session: {e}");
                }
            }
        }
    }
}
