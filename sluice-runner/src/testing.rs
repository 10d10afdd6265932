//! In-memory fakes shared by the unit tests

use async_trait::async_trait;
use sluice_client::{ClientError, Result};
use sluice_core::domain::task::{Payload, Task, TaskResult};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use crate::error::{ErrorHandler, RunnerError};
use crate::repository::TaskRepository;
use crate::worker::{Worker, WorkerError, WorkerOutput};

/// Queue that hands out scripted poll responses and records updates
#[derive(Default)]
pub(crate) struct FakeQueue {
    polls: Mutex<VecDeque<Result<Option<Task>>>>,
    poll_count: AtomicUsize,
    poll_args: Mutex<Vec<(String, String, Option<String>)>>,
    update_failures: AtomicUsize,
    update_attempts: AtomicUsize,
    update_times: Mutex<Vec<Instant>>,
    updates: Mutex<Vec<TaskResult>>,
}

impl FakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the response for the next poll; an empty script answers `None`
    pub fn push_poll(&self, response: Result<Option<Task>>) {
        self.polls.lock().unwrap().push_back(response);
    }

    /// Makes the next `count` update attempts fail
    pub fn fail_updates(&self, count: usize) {
        self.update_failures.store(count, Ordering::SeqCst);
    }

    pub fn poll_count(&self) -> usize {
        self.poll_count.load(Ordering::SeqCst)
    }

    /// (task type, worker id, domain) of every poll, in order
    pub fn poll_args(&self) -> Vec<(String, String, Option<String>)> {
        self.poll_args.lock().unwrap().clone()
    }

    /// When each update attempt arrived
    pub fn update_times(&self) -> Vec<Instant> {
        self.update_times.lock().unwrap().clone()
    }

    pub fn update_attempts(&self) -> usize {
        self.update_attempts.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> Vec<TaskResult> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskRepository for FakeQueue {
    async fn poll(
        &self,
        task_type: &str,
        worker_id: &str,
        domain: Option<&str>,
    ) -> Result<Option<Task>> {
        self.poll_count.fetch_add(1, Ordering::SeqCst);
        self.poll_args.lock().unwrap().push((
            task_type.to_string(),
            worker_id.to_string(),
            domain.map(str::to_string),
        ));
        self.polls.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    async fn update_task(&self, result: &TaskResult) -> Result<()> {
        self.update_attempts.fetch_add(1, Ordering::SeqCst);
        self.update_times.lock().unwrap().push(Instant::now());

        let failing = self
            .update_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ClientError::api_error(503, "queue unavailable"));
        }

        self.updates.lock().unwrap().push(result.clone());
        Ok(())
    }
}

/// Scripted worker behaviour
pub(crate) enum Behavior {
    Complete(Payload),
    Respond(WorkerOutput),
    Fail(WorkerError),
    Panic,
    /// Sleeps, then completes with an empty output
    Slow(Duration),
}

/// Worker that behaves the same way for every task
pub(crate) struct FakeWorker {
    task_def_name: String,
    behavior: Behavior,
    executed: Mutex<Vec<String>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl FakeWorker {
    pub fn new(task_def_name: &str, behavior: Behavior) -> Self {
        Self {
            task_def_name: task_def_name.to_string(),
            behavior,
            executed: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    /// Highest number of executions seen running at once
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// Ids of the tasks executed so far, in order
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Worker for FakeWorker {
    fn task_def_name(&self) -> &str {
        &self.task_def_name
    }

    async fn execute(&self, task: &Task) -> std::result::Result<WorkerOutput, WorkerError> {
        self.executed.lock().unwrap().push(task.task_id.clone());
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        let outcome = match &self.behavior {
            Behavior::Complete(output) => Ok(WorkerOutput::completed(output.clone())),
            Behavior::Respond(output) => Ok(output.clone()),
            Behavior::Fail(err) => Err(err.clone()),
            Behavior::Panic => panic!("worker blew up"),
            Behavior::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(WorkerOutput::completed(Payload::new()))
            }
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

/// Where a recorded failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Site {
    Poll,
    Execute,
    Update,
    Other,
}

/// Error handler that records every call
#[derive(Default)]
pub(crate) struct RecordingErrorHandler {
    events: Mutex<Vec<(Site, String, Option<String>)>>,
}

impl RecordingErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// (site, error message, task id) for every call, in order
    pub fn events(&self) -> Vec<(Site, String, Option<String>)> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, site: Site) -> usize {
        self.events().iter().filter(|(s, _, _)| *s == site).count()
    }
}

impl ErrorHandler for RecordingErrorHandler {
    fn on_error(&self, error: &RunnerError, task: Option<&Task>) {
        let site = match error {
            RunnerError::Poll(_) => Site::Poll,
            RunnerError::Execute(_) => Site::Execute,
            RunnerError::Update(_) => Site::Update,
            _ => Site::Other,
        };
        self.events.lock().unwrap().push((
            site,
            error.to_string(),
            task.map(|t| t.task_id.clone()),
        ));
    }
}
