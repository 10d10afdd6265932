//! Task domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// JSON object used for task input and output payloads
pub type Payload = Map<String, Value>;

/// Unit of work issued by the queue service
///
/// Read-only for the runner. Fields the runner does not interpret are kept
/// in `extra` so nothing the service sends is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub workflow_instance_id: String,
    #[serde(default)]
    pub task_def_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default)]
    pub input_data: Payload,
    #[serde(flatten)]
    pub extra: Payload,
}

impl Task {
    /// Creates a task with the given identifiers and an empty payload
    pub fn new(
        task_id: impl Into<String>,
        workflow_instance_id: impl Into<String>,
        task_def_name: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            workflow_instance_id: workflow_instance_id.into(),
            task_def_name: task_def_name.into(),
            domain: None,
            input_data: Payload::new(),
            extra: Payload::new(),
        }
    }

    /// Sets the input payload
    pub fn with_input(mut self, input_data: Payload) -> Self {
        self.input_data = input_data;
        self
    }

    /// Whether the service handed out an actual task
    ///
    /// Some queue deployments answer an empty poll with a placeholder
    /// object instead of no content; those carry no task id.
    pub fn has_id(&self) -> bool {
        !self.task_id.trim().is_empty()
    }
}

/// Status reported for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskResultStatus {
    InProgress,
    Completed,
    Failed,
    FailedWithTerminalError,
}

impl fmt::Display for TaskResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::FailedWithTerminalError => "FAILED_WITH_TERMINAL_ERROR",
        };
        f.write_str(s)
    }
}

/// Outcome of attempting a task, as delivered to the queue service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    pub workflow_instance_id: String,
    pub task_id: String,
    pub status: TaskResultStatus,
    #[serde(default)]
    pub output_data: Payload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_incompletion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
}

impl TaskResult {
    /// Builds a result for `task` with the given status and output
    pub fn new(task: &Task, status: TaskResultStatus, output_data: Payload) -> Self {
        Self {
            workflow_instance_id: task.workflow_instance_id.clone(),
            task_id: task.task_id.clone(),
            status,
            output_data,
            reason_for_incompletion: None,
            worker_id: None,
        }
    }

    /// Builds a completed result for `task`
    pub fn completed(task: &Task, output_data: Payload) -> Self {
        Self::new(task, TaskResultStatus::Completed, output_data)
    }

    /// Builds a failed result for `task` with an empty output
    pub fn failed(task: &Task, reason: impl Into<String>) -> Self {
        Self {
            reason_for_incompletion: Some(reason.into()),
            ..Self::new(task, TaskResultStatus::Failed, Payload::new())
        }
    }

    /// Tags the result with the reporting worker
    pub fn with_worker_id(mut self, worker_id: impl Into<String>) -> Self {
        self.worker_id = Some(worker_id.into());
        self
    }
}
