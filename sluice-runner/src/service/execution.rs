//! Execution service
//!
//! Runs one leased task through the worker and turns the outcome into a
//! [`TaskResult`]. Exactly one result is reported per task, whether the
//! worker succeeded, failed or panicked.

use sluice_core::domain::task::{Task, TaskResult};
use std::sync::Arc;
use tracing::{error, info};

use crate::error::{ErrorHandler, RunnerError};
use crate::repository::TaskRepository;
use crate::service::reporter::ResultReporter;
use crate::worker::{Worker, WorkerError, WorkerOutput};

/// Reason reported when a worker fails without a message
pub const DEFAULT_FAILURE_REASON: &str = "Error executing task";

/// Executes tasks with one worker and reports the results
pub struct TaskExecutor {
    worker: Arc<dyn Worker>,
    reporter: ResultReporter,
    error_handler: Arc<dyn ErrorHandler>,
    worker_id: String,
}

impl TaskExecutor {
    pub fn new(
        worker: Arc<dyn Worker>,
        repository: Arc<dyn TaskRepository>,
        error_handler: Arc<dyn ErrorHandler>,
        worker_id: impl Into<String>,
    ) -> Self {
        Self {
            worker,
            reporter: ResultReporter::new(repository, Arc::clone(&error_handler)),
            error_handler,
            worker_id: worker_id.into(),
        }
    }

    /// Executes `task` and reports its result
    ///
    /// Returns once the result was delivered or dropped.
    pub async fn execute(&self, task: &Task) {
        info!(
            task_id = %task.task_id,
            workflow_instance_id = %task.workflow_instance_id,
            "Executing task"
        );

        let result = match self.invoke_worker(task).await {
            Ok(output) => TaskResult::new(task, output.status, output.output_data),
            Err(e) => {
                let reason = e.reason().unwrap_or(DEFAULT_FAILURE_REASON).to_string();
                let err = RunnerError::Execute(e);
                self.error_handler.on_error(&err, Some(task));
                error!(
                    task_id = %task.task_id,
                    task_type = %task.task_def_name,
                    "Error executing task: {}",
                    err
                );
                TaskResult::failed(task, reason)
            }
        }
        .with_worker_id(self.worker_id.as_str());

        if self.reporter.update_with_retry(task, &result).await {
            info!(task_id = %task.task_id, status = %result.status, "Task finished");
        }
    }

    /// Runs the worker on its own tokio task so a panic surfaces as a failure
    async fn invoke_worker(&self, task: &Task) -> Result<WorkerOutput, WorkerError> {
        let worker = Arc::clone(&self.worker);
        let task = task.clone();

        match tokio::spawn(async move { worker.execute(&task).await }).await {
            Ok(outcome) => outcome,
            Err(join_err) => Err(WorkerError::from_join_error(join_err)),
        }
    }
}
