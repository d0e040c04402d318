//! Session slice: activity tracking and a free-form context map.

use super::Store;
use crate::constants::SESSION_VERSION;
use crate::error::ContextMap;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub version: u32,
    pub created_at_ms: f64,
    pub updated_at_ms: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub context: ContextMap,
    pub is_active: bool,
    pub last_activity_ms: f64,
    pub metadata: SessionMetadata,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl SessionState {
    pub fn new(now_ms: f64) -> Self {
        Self {
            context: ContextMap::default(),
            is_active: true,
            last_activity_ms: now_ms,
            metadata: SessionMetadata {
                version: SESSION_VERSION,
                created_at_ms: now_ms,
                updated_at_ms: now_ms,
            },
        }
    }

    pub fn context_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.context.get(key)
    }

    pub fn is_idle(&self, now_ms: f64, timeout_ms: f64) -> bool {
        now_ms - self.last_activity_ms >= timeout_ms
    }

    fn touch(&mut self, now_ms: f64) {
        self.last_activity_ms = now_ms;
        self.metadata.updated_at_ms = now_ms;
    }
}

impl Store {
    /// Mouse, keyboard or click activity from the user.
    pub fn record_activity(&mut self) {
        self.update("record_activity", |s, now| {
            let session = Rc::make_mut(&mut s.session);
            session.is_active = true;
            session.touch(now);
            Ok(())
        });
    }

    pub fn set_session_active(&mut self, is_active: bool) {
        self.update("set_session_active", |s, now| {
            if s.session.is_active != is_active {
                let session = Rc::make_mut(&mut s.session);
                session.is_active = is_active;
                session.touch(now);
            }
            Ok(())
        });
    }

    /// Merge `values` into the context, overwriting existing keys.
    pub fn update_context(&mut self, values: ContextMap) {
        if values.is_empty() {
            return;
        }
        self.update("update_context", |s, now| {
            let session = Rc::make_mut(&mut s.session);
            session.context.extend(values);
            session.touch(now);
            Ok(())
        });
    }

    pub fn set_context_value(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        let mut values = ContextMap::default();
        values.insert(key.into(), value.into());
        self.update_context(values);
    }

    pub fn remove_context_value(&mut self, key: &str) -> bool {
        if !self.session().context.contains_key(key) {
            return false;
        }
        self.update("remove_context_value", |s, now| {
            let session = Rc::make_mut(&mut s.session);
            session.context.remove(key);
            session.touch(now);
            Ok(())
        })
    }

    pub fn clear_context(&mut self) {
        self.update("clear_context", |s, now| {
            if !s.session.context.is_empty() {
                let session = Rc::make_mut(&mut s.session);
                session.context.clear();
                session.metadata.updated_at_ms = now;
            }
            Ok(())
        });
    }

    /// Deactivate the session and drop its context once `timeout_ms` passed
    /// without activity. Returns whether the session went inactive now.
    pub fn sweep_idle(&mut self, timeout_ms: f64) -> bool {
        let now = self.now_ms();
        let session = self.session();
        if !session.is_active || !session.is_idle(now, timeout_ms) {
            return false;
        }
        log::info!("[session] idle for {:.0}s, deactivating", (now - session.last_activity_ms) / 1000.0);
        self.update("sweep_idle", |s, now| {
            let session = Rc::make_mut(&mut s.session);
            session.is_active = false;
            session.context.clear();
            session.metadata.updated_at_ms = now;
            Ok(())
        });
        true
    }
}
