//! Panic containment for units of concurrent work.
//!
//! Every target task and every file task runs inside [`isolated`], so a panic
//! surfaces as an ordinary [`HarvestError::TaskPanicked`] for that unit and
//! never reaches its siblings, its parent or the process.

use crate::{Result, error::HarvestError};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinError;

/// Drives `future` to completion, converting a panic into an error.
///
/// # Errors
///
/// Returns the future's own error, or [`HarvestError::TaskPanicked`] naming
/// `unit` if the future panicked.
pub async fn isolated<F, T>(unit: &str, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(HarvestError::task_panicked(
            unit,
            panic_message(payload.as_ref()),
        )),
    }
}

/// Extracts a readable message from a panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Describes why a spawned task failed to join.
#[must_use]
pub fn join_error_message(error: JoinError) -> String {
    if error.is_panic() {
        panic_message(error.into_panic().as_ref())
    } else {
        error.to_string()
    }
}
