//! Built-in workers
//!
//! Workers shipped with the binary, selected by name through `TASK_TYPES`.
//! They are meant for smoke-testing a queue deployment.

use anyhow::Result;
use async_trait::async_trait;
use sluice_runner::{Task, Worker, WorkerError, WorkerOutput};
use std::sync::Arc;

/// Completes every task with its own input as output
pub struct EchoWorker {
    task_def_name: String,
}

impl EchoWorker {
    pub fn new(task_def_name: impl Into<String>) -> Self {
        Self {
            task_def_name: task_def_name.into(),
        }
    }
}

#[async_trait]
impl Worker for EchoWorker {
    fn task_def_name(&self) -> &str {
        &self.task_def_name
    }

    async fn execute(&self, task: &Task) -> Result<WorkerOutput, WorkerError> {
        Ok(WorkerOutput::completed(task.input_data.clone()))
    }
}

/// Resolves configured task type names to workers
pub fn resolve(task_types: &[String]) -> Result<Vec<Arc<dyn Worker>>> {
    task_types
        .iter()
        .map(|name| match name.as_str() {
            "echo" => Ok(Arc::new(EchoWorker::new(name.as_str())) as Arc<dyn Worker>),
            other => anyhow::bail!("No built-in worker for task type '{}'", other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sluice_runner::TaskResultStatus;

    #[tokio::test]
    async fn test_echo_returns_input() {
        let mut input = sluice_runner::Payload::new();
        input.insert("greeting".to_string(), json!("hello"));
        let task = Task::new("t1", "w1", "echo").with_input(input.clone());

        let output = EchoWorker::new("echo").execute(&task).await.unwrap();

        assert_eq!(output.status, TaskResultStatus::Completed);
        assert_eq!(output.output_data, input);
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        let workers = resolve(&["echo".to_string()]).unwrap();
        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].task_def_name(), "echo");

        assert!(resolve(&["transcode".to_string()]).is_err());
    }
}
