//! Result reporting
//!
//! Delivers a task result to the queue with bounded linear backoff. A
//! result that still cannot be delivered is dropped; the queue re-offers
//! the task once its lease expires.

use sluice_core::domain::task::{Task, TaskResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::{ErrorHandler, RunnerError};
use crate::repository::TaskRepository;

/// Delivery attempts per result
pub const MAX_UPDATE_ATTEMPTS: u32 = 3;

/// Sleep after the n-th failed attempt is `n * UPDATE_BACKOFF_UNIT`
pub const UPDATE_BACKOFF_UNIT: Duration = Duration::from_millis(10);

/// Sends task results to the queue service
pub struct ResultReporter {
    repository: Arc<dyn TaskRepository>,
    error_handler: Arc<dyn ErrorHandler>,
}

impl ResultReporter {
    pub fn new(repository: Arc<dyn TaskRepository>, error_handler: Arc<dyn ErrorHandler>) -> Self {
        Self {
            repository,
            error_handler,
        }
    }

    /// Delivers `result`, retrying failed attempts
    ///
    /// Never fails. Returns whether the queue acknowledged the result.
    pub async fn update_with_retry(&self, task: &Task, result: &TaskResult) -> bool {
        let mut attempt = 0;

        while attempt < MAX_UPDATE_ATTEMPTS {
            match self.repository.update_task(result).await {
                Ok(()) => {
                    debug!(
                        task_id = %result.task_id,
                        status = %result.status,
                        "Task result delivered"
                    );
                    return true;
                }
                Err(e) => {
                    let err = RunnerError::Update(e);
                    self.error_handler.on_error(&err, Some(task));
                    error!(
                        task_id = %result.task_id,
                        "Failed to update task (attempt {}/{}): {}",
                        attempt + 1,
                        MAX_UPDATE_ATTEMPTS,
                        err
                    );

                    attempt += 1;
                    tokio::time::sleep(UPDATE_BACKOFF_UNIT * attempt).await;
                }
            }
        }

        error!(
            task_id = %result.task_id,
            workflow_instance_id = %result.workflow_instance_id,
            "Unable to update task after {} attempts, dropping result",
            attempt
        );
        false
    }
}
