//! Error vocabulary shared by the store, persistence and UI operations.

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Free-form context attached to errors and to the session.
pub type ContextMap = FnvHashMap<String, serde_json::Value>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Network,
    Validation,
    Authentication,
    Authorization,
    Server,
    Client,
    System,
    #[default]
    Unknown,
}

impl ErrorKind {
    /// User-facing fallback when an error carries no message of its own.
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::Network => "Network error occurred",
            ErrorKind::Validation => "Please check your input and try again",
            ErrorKind::Authentication => "Authentication error",
            ErrorKind::Authorization => "You are not authorized",
            ErrorKind::Server => "The server could not complete the request",
            ErrorKind::Client => "Something went wrong in the app",
            ErrorKind::System => "System error occurred",
            ErrorKind::Unknown => "An unexpected error occurred",
        }
    }

    /// Kinds that survive a reload (subject to the max age).
    pub fn is_persistent(self) -> bool {
        matches!(self, ErrorKind::Authentication | ErrorKind::System)
    }
}

/// Closure re-running a failed operation.
///
/// The store never calls it while borrowed; `Store::take_retry_action` hands
/// it back to the caller instead.
#[derive(Clone)]
pub struct RetryAction(Rc<dyn Fn()>);

impl RetryAction {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn invoke(&self) {
        (self.0)()
    }
}

impl fmt::Debug for RetryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RetryAction(..)")
    }
}

impl PartialEq for RetryAction {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Error shown to the user, stored in the UI slice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorState {
    pub kind: ErrorKind,
    pub message: String,
    pub timestamp_ms: f64,
    #[serde(default)]
    pub context: ContextMap,
    #[serde(default)]
    pub retry_count: u32,
    pub recoverable: bool,
    #[serde(skip)]
    pub retry_action: Option<RetryAction>,
}

impl ErrorState {
    pub fn new(kind: ErrorKind, message: impl Into<String>, timestamp_ms: f64) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp_ms,
            context: ContextMap::default(),
            retry_count: 0,
            recoverable: true,
            retry_action: None,
        }
    }

    pub fn with_context(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn with_recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = recoverable;
        self
    }

    pub fn with_retry(mut self, action: RetryAction) -> Self {
        self.retry_action = Some(action);
        self
    }

    pub fn display_message(&self) -> &str {
        if self.message.is_empty() {
            self.kind.default_message()
        } else {
            &self.message
        }
    }

    /// Whether a persisted copy is still young enough to restore.
    pub fn is_fresh(&self, now_ms: f64, max_age_ms: f64) -> bool {
        now_ms - self.timestamp_ms < max_age_ms
    }
}

/// Failure inside a store update closure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("{0}")]
    Failed(String),
}

impl StoreError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure talking to a storage backend or decoding what it returned.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("version mismatch: stored {stored}, supported {supported}")]
    VersionMismatch { stored: u32, supported: u32 },

    #[error("invalid payload: {0}")]
    Invalid(String),
}

/// Failure of an async UI operation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OperationError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} is not yet implemented")]
    NotImplemented(&'static str),

    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}

impl OperationError {
    /// Classification when the operation itself knows better than the caller.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            OperationError::Validation(_) => Some(ErrorKind::Validation),
            OperationError::Network(_) => Some(ErrorKind::Network),
            OperationError::NotImplemented(_) | OperationError::Other(_) => None,
        }
    }
}
