//! Worker capability
//!
//! A worker is the user-supplied logic behind one task type. The runner
//! polls for that task type and hands every leased task to the worker.

use async_trait::async_trait;
use sluice_core::domain::task::{Payload, Task, TaskResultStatus};
use thiserror::Error;
use tokio::task::JoinError;

/// Capability that executes tasks of a single type
#[async_trait]
pub trait Worker: Send + Sync {
    /// The task definition name this worker polls for
    fn task_def_name(&self) -> &str;

    /// Executes one task
    ///
    /// May suspend on I/O for as long as it needs; no timeout is applied.
    /// An `Err` is reported to the queue as a failed task.
    async fn execute(&self, task: &Task) -> Result<WorkerOutput, WorkerError>;
}

/// What a worker returns for a task it handled
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerOutput {
    pub status: TaskResultStatus,
    pub output_data: Payload,
}

impl WorkerOutput {
    /// A completed outcome with the given output
    pub fn completed(output_data: Payload) -> Self {
        Self {
            status: TaskResultStatus::Completed,
            output_data,
        }
    }

    /// An outcome with an explicit status
    pub fn with_status(status: TaskResultStatus, output_data: Payload) -> Self {
        Self {
            status,
            output_data,
        }
    }
}

/// Failure raised by a worker
///
/// Either field may be missing: a worker can fail with a bare error value
/// that carries no message or trace at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or("worker failed without a message"))]
pub struct WorkerError {
    pub message: Option<String>,
    pub trace: Option<String>,
}

impl WorkerError {
    /// A failure with a message and no trace
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            trace: None,
        }
    }

    /// A failure carrying neither message nor trace
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attaches a trace
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// The message, if the failure carried a non-empty one
    pub fn reason(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }

    /// Converts a worker task that panicked or was cancelled
    pub(crate) fn from_join_error(err: JoinError) -> Self {
        if err.is_cancelled() {
            return Self::new("worker execution was cancelled");
        }

        let panic = err.into_panic();
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned());

        Self {
            message: message.map(|m| format!("worker panicked: {m}")),
            trace: None,
        }
    }
}

impl From<anyhow::Error> for WorkerError {
    fn from(err: anyhow::Error) -> Self {
        let message = err.to_string();
        Self {
            message: (!message.is_empty()).then_some(message),
            trace: Some(format!("{err:?}")),
        }
    }
}

impl From<String> for WorkerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for WorkerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_worker_error_display() {
        assert_eq!(WorkerError::new("boom").to_string(), "boom");
        assert_eq!(
            WorkerError::empty().to_string(),
            "worker failed without a message"
        );
    }

    #[test]
    fn test_blank_message_has_no_reason() {
        assert_eq!(WorkerError::new("  ").reason(), None);
        assert_eq!(WorkerError::empty().reason(), None);
        assert_eq!(WorkerError::new("boom").reason(), Some("boom"));
    }

    #[test]
    fn test_from_anyhow_keeps_context_chain() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("disk full")).context("write failed");
        let worker_err = WorkerError::from(err.unwrap_err());

        assert_eq!(worker_err.reason(), Some("write failed"));
        let trace = worker_err.trace.unwrap();
        assert!(trace.contains("disk full"));
    }

    #[tokio::test]
    async fn test_from_join_error_panic_message() {
        let handle = tokio::spawn(async {
            if true {
                panic!("exploded");
            }
        });
        let err = handle.await.unwrap_err();

        let worker_err = WorkerError::from_join_error(err);
        assert_eq!(worker_err.reason(), Some("worker panicked: exploded"));
    }
}
