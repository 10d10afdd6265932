//! Task poller
//!
//! One [`TaskRunner`] polls the queue for a single task type and executes
//! what it gets with its worker. Each cycle (poll, execute, update) runs to
//! completion before the runner sleeps and polls again, so a runner never
//! has more than one task in flight.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::RunnerOptions;
use crate::error::{ErrorHandler, NoopErrorHandler, RunnerError};
use crate::repository::TaskRepository;
use crate::service::{ErrorFunnel, TaskExecutor};
use crate::worker::Worker;

/// Polling state of a runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Stopped,
    Polling,
}

/// State plus the number of the loop allowed to run
///
/// Every start bumps `epoch`; a loop exits once its epoch is no longer
/// current, so a stale loop never keeps polling after a restart.
#[derive(Debug)]
struct StateCell {
    state: RunnerState,
    epoch: u64,
}

/// Polls for one task type and executes tasks with one worker
pub struct TaskRunner {
    worker: Arc<dyn Worker>,
    repository: Arc<dyn TaskRepository>,
    options: RunnerOptions,
    error_handler: Arc<dyn ErrorHandler>,
    executor: TaskExecutor,
    funnel: ErrorFunnel,
    state: Mutex<StateCell>,
    /// Held for the whole of a poll cycle
    cycle: tokio::sync::Mutex<()>,
}

impl TaskRunner {
    /// Creates a stopped runner that ignores errors
    pub fn new(
        worker: Arc<dyn Worker>,
        repository: Arc<dyn TaskRepository>,
        options: RunnerOptions,
    ) -> Self {
        let error_handler: Arc<dyn ErrorHandler> = Arc::new(NoopErrorHandler);
        Self {
            executor: TaskExecutor::new(
                Arc::clone(&worker),
                Arc::clone(&repository),
                Arc::clone(&error_handler),
                options.worker_id.clone(),
            ),
            funnel: ErrorFunnel::new(worker.task_def_name()),
            worker,
            repository,
            options,
            error_handler,
            state: Mutex::new(StateCell {
                state: RunnerState::Stopped,
                epoch: 0,
            }),
            cycle: tokio::sync::Mutex::new(()),
        }
    }

    /// Sets the callback notified of every poll, execute and update failure
    pub fn with_error_handler(mut self, error_handler: Arc<dyn ErrorHandler>) -> Self {
        self.executor = TaskExecutor::new(
            Arc::clone(&self.worker),
            Arc::clone(&self.repository),
            Arc::clone(&error_handler),
            self.options.worker_id.clone(),
        );
        self.error_handler = error_handler;
        self
    }

    /// The task type this runner polls for
    pub fn task_type(&self) -> &str {
        self.funnel.task_type()
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    pub fn state(&self) -> RunnerState {
        self.lock_state().state
    }

    pub fn is_polling(&self) -> bool {
        self.state() == RunnerState::Polling
    }

    /// Starts the poll loop on a new tokio task
    ///
    /// Fails with [`RunnerError::AlreadyRunning`] if the runner is polling.
    pub fn start_polling(self: &Arc<Self>) -> Result<JoinHandle<()>, RunnerError> {
        let epoch = self.begin()?;
        let runner = Arc::clone(self);
        Ok(tokio::spawn(async move { runner.poll_loop(epoch).await }))
    }

    /// Runs the poll loop on the current task until the runner is stopped
    ///
    /// Fails with [`RunnerError::AlreadyRunning`] if the runner is polling.
    pub async fn run(&self) -> Result<(), RunnerError> {
        let epoch = self.begin()?;
        self.poll_loop(epoch).await;
        Ok(())
    }

    /// Asks the poll loop to stop
    ///
    /// A cycle already underway finishes first; the loop exits the next
    /// time it checks the state.
    pub fn stop_polling(&self) {
        let mut cell = self.lock_state();
        if cell.state == RunnerState::Polling {
            info!(task_type = %self.task_type(), "Stopping task poller");
        }
        cell.state = RunnerState::Stopped;
    }

    /// Performs a single poll cycle
    ///
    /// Polls once and, if a task comes back, executes it and reports the
    /// result. Failures are logged and passed to the error handler.
    pub async fn poll_once(&self) {
        let _cycle = self.cycle.lock().await;

        let polled = self
            .repository
            .poll(
                self.task_type(),
                &self.options.worker_id,
                self.options.domain.as_deref(),
            )
            .await;

        match polled {
            Ok(Some(task)) if task.has_id() => self.executor.execute(&task).await,
            Ok(_) => debug!("No tasks for {}", self.task_type()),
            Err(e) => {
                let err = RunnerError::Poll(e);
                self.funnel.report(&err);
                self.error_handler.on_error(&err, None);
            }
        }
    }

    fn begin(&self) -> Result<u64, RunnerError> {
        let mut cell = self.lock_state();
        if cell.state == RunnerState::Polling {
            return Err(RunnerError::AlreadyRunning {
                task_type: self.task_type().to_string(),
            });
        }
        cell.state = RunnerState::Polling;
        cell.epoch += 1;
        Ok(cell.epoch)
    }

    fn is_current(&self, epoch: u64) -> bool {
        let cell = self.lock_state();
        cell.state == RunnerState::Polling && cell.epoch == epoch
    }

    async fn poll_loop(&self, epoch: u64) {
        info!(
            task_type = %self.task_type(),
            worker_id = %self.options.worker_id,
            "Starting task poller (interval: {:?})",
            self.options.poll_interval
        );

        while self.is_current(epoch) {
            self.poll_once().await;
            tokio::time::sleep(self.options.poll_interval).await;
        }

        info!(task_type = %self.task_type(), "Task poller stopped");
    }

    fn lock_state(&self) -> MutexGuard<'_, StateCell> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
