//! Runner errors and the error callback
//!
//! Every failure the runner observes is wrapped in [`RunnerError`] and
//! handed to the injected [`ErrorHandler`] before the loop moves on.

use sluice_client::ClientError;
use sluice_core::domain::task::Task;
use std::error::Error as StdError;
use thiserror::Error;

use crate::worker::WorkerError;

/// Errors produced by the task runner
#[derive(Debug, Error)]
pub enum RunnerError {
    /// `start_polling` was called on a runner that is already polling
    #[error("Runner for task type '{task_type}' is already running")]
    AlreadyRunning { task_type: String },

    /// Two workers were registered for the same task type
    #[error("A worker for task type '{0}' is already registered")]
    DuplicateWorker(String),

    /// Polling the queue failed
    #[error("Failed to poll for task: {0}")]
    Poll(#[source] ClientError),

    /// The worker failed while executing a task
    #[error("Worker failed: {0}")]
    Execute(#[source] WorkerError),

    /// Reporting a task result failed
    #[error("Failed to update task: {0}")]
    Update(#[source] ClientError),
}

/// Diagnostic fields extracted from a failure
///
/// Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub message: String,
    pub trace: String,
}

impl RunnerError {
    /// Extracts a message and trace from whatever the failure carries
    pub fn diagnostics(&self) -> Diagnostics {
        match self {
            Self::Execute(err) => Diagnostics {
                message: err.message.clone().unwrap_or_default(),
                trace: err.trace.clone().unwrap_or_default(),
            },
            Self::Poll(err) | Self::Update(err) => Diagnostics {
                message: err.to_string(),
                trace: source_chain(err),
            },
            other => Diagnostics {
                message: other.to_string(),
                trace: String::new(),
            },
        }
    }
}

/// Joins the `source()` chain below `err`, outermost first
fn source_chain(err: &dyn StdError) -> String {
    let mut causes = Vec::new();
    let mut current = err.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes.join(": ")
}

/// Observer notified of every failure the runner handles
///
/// Called once per failure at each site: poll (no task), execute and every
/// failed update attempt (with the task).
pub trait ErrorHandler: Send + Sync {
    fn on_error(&self, error: &RunnerError, task: Option<&Task>);
}

impl<F> ErrorHandler for F
where
    F: Fn(&RunnerError, Option<&Task>) + Send + Sync,
{
    fn on_error(&self, error: &RunnerError, task: Option<&Task>) {
        self(error, task)
    }
}

/// Error handler that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopErrorHandler;

impl ErrorHandler for NoopErrorHandler {
    fn on_error(&self, _error: &RunnerError, _task: Option<&Task>) {}
}
