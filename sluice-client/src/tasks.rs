//! Task-related API endpoints

use crate::QueueClient;
use crate::error::{ClientError, Result};
use reqwest::Url;
use sluice_core::domain::task::{Task, TaskResult};
use tracing::debug;

impl QueueClient {
    // =============================================================================
    // Task Lifecycle (Runner-specific)
    // =============================================================================

    /// Poll the queue for one task of the given type
    ///
    /// # Arguments
    /// * `task_type` - The task definition name to poll for
    /// * `worker_id` - Identifier of the polling worker, recorded by the service
    /// * `domain` - Optional routing domain
    ///
    /// # Returns
    /// The leased task, or `None` when the queue has nothing for this type
    pub async fn poll_task(
        &self,
        task_type: &str,
        worker_id: &str,
        domain: Option<&str>,
    ) -> Result<Option<Task>> {
        if task_type.is_empty() {
            return Err(ClientError::InvalidRequest(
                "task type cannot be empty".to_string(),
            ));
        }

        let mut url = Url::parse(&format!("{}/api/tasks/poll", self.base_url))
            .map_err(|e| ClientError::InvalidRequest(format!("invalid queue URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidRequest("queue URL cannot take a path".to_string()))?
            .push(task_type);

        let mut query = vec![("workerid", worker_id)];
        if let Some(domain) = domain {
            query.push(("domain", domain));
        }

        debug!(task_type, worker_id, ?domain, "Polling queue");
        let response = self.client.get(url).query(&query).send().await?;

        self.handle_optional_response(response).await
    }

    /// Report the result of a task
    ///
    /// # Arguments
    /// * `result` - The task result (status, output, failure reason)
    pub async fn update_task(&self, result: &TaskResult) -> Result<()> {
        let url = format!("{}/api/tasks", self.base_url);
        let response = self.client.post(&url).json(result).send().await?;

        self.handle_empty_response(response).await
    }
}
