//! Async user operations wrapped in loading, success and error handling.

use crate::error::{ErrorKind, OperationError, RetryAction};
use crate::runtime::OrbRuntime;
use std::cell::RefCell;
use std::future::Future;

#[derive(Clone, Debug)]
pub struct OperationOptions {
    /// Used when the error itself carries no classification.
    pub error_kind: Option<ErrorKind>,
    /// Replaces the error's own message in the UI.
    pub error_message: Option<String>,
    pub recoverable: bool,
    pub show_loading: bool,
    pub show_success: bool,
    pub success_message: Option<String>,
    pub retry: Option<RetryAction>,
}

impl Default for OperationOptions {
    fn default() -> Self {
        Self {
            error_kind: None,
            error_message: None,
            recoverable: true,
            show_loading: true,
            show_success: true,
            success_message: None,
            retry: None,
        }
    }
}

impl OperationOptions {
    pub fn with_error_kind(mut self, kind: ErrorKind) -> Self {
        self.error_kind = Some(kind);
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryAction) -> Self {
        self.retry = Some(retry);
        self
    }
}

/// Run `operation` between `begin_operation` and `complete_operation`.
///
/// The runtime is only borrowed around the two bookkeeping calls, never
/// across the `.await`, so frames keep ticking while the operation runs.
/// Returns `None` when another operation was already in flight.
pub async fn execute<T, F>(
    runtime: &RefCell<OrbRuntime>,
    options: OperationOptions,
    operation: F,
) -> Option<Result<T, OperationError>>
where
    F: Future<Output = Result<T, OperationError>>,
{
    let ticket = runtime.borrow_mut().begin_operation(&options)?;
    let result = operation.await;
    runtime
        .borrow_mut()
        .complete_operation(ticket, &options, &result);
    Some(result)
}

/// Send a chat message. Only validation exists so far; there is no backend
/// to deliver to.
pub async fn submit_message(text: String) -> Result<(), OperationError> {
    if text.trim().is_empty() {
        return Err(OperationError::Validation(
            "Message cannot be empty".to_string(),
        ));
    }
    log::debug!("[operation] submit_message ({} chars)", text.len());
    Err(OperationError::NotImplemented("message submission"))
}

/// Start capturing voice input. No capture backend exists.
pub async fn start_voice_input() -> Result<(), OperationError> {
    Err(OperationError::NotImplemented("voice input"))
}
