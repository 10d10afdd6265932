//! Tasks repository
//!
//! Handles communication with the queue service for task operations:
//! - Polling for a task of a given type
//! - Reporting task results

use async_trait::async_trait;
use sluice_client::{QueueClient, Result};
use sluice_core::domain::task::{Task, TaskResult};

/// Repository trait for task operations against the queue service
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Leases one task of `task_type` for `worker_id`
    ///
    /// Returns `None` when the queue has nothing to hand out.
    async fn poll(
        &self,
        task_type: &str,
        worker_id: &str,
        domain: Option<&str>,
    ) -> Result<Option<Task>>;

    /// Delivers the result of a task
    async fn update_task(&self, result: &TaskResult) -> Result<()>;
}

#[async_trait]
impl TaskRepository for QueueClient {
    async fn poll(
        &self,
        task_type: &str,
        worker_id: &str,
        domain: Option<&str>,
    ) -> Result<Option<Task>> {
        self.poll_task(task_type, worker_id, domain).await
    }

    async fn update_task(&self, result: &TaskResult) -> Result<()> {
        QueueClient::update_task(self, result).await
    }
}
