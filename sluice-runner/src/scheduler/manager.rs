//! Task manager
//!
//! Runs one [`TaskRunner`] per registered worker. Runners share the queue
//! repository, options and error handler but nothing mutable, so a slow
//! worker only stalls its own runner.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::RunnerOptions;
use crate::error::{ErrorHandler, RunnerError};
use crate::repository::TaskRepository;
use crate::scheduler::poller::TaskRunner;
use crate::worker::Worker;

/// Starts and stops a group of runners together
pub struct TaskManager {
    runners: Vec<Arc<TaskRunner>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskManager {
    /// Creates a runner for each worker
    ///
    /// Fails with [`RunnerError::DuplicateWorker`] if two workers poll for
    /// the same task type.
    pub fn new(
        repository: Arc<dyn TaskRepository>,
        workers: Vec<Arc<dyn Worker>>,
        options: RunnerOptions,
        error_handler: Arc<dyn ErrorHandler>,
    ) -> Result<Self, RunnerError> {
        let mut seen = HashSet::new();
        let mut runners = Vec::with_capacity(workers.len());

        for worker in workers {
            let task_type = worker.task_def_name().to_string();
            if !seen.insert(task_type.clone()) {
                return Err(RunnerError::DuplicateWorker(task_type));
            }

            let runner = TaskRunner::new(worker, Arc::clone(&repository), options.clone())
                .with_error_handler(Arc::clone(&error_handler));
            runners.push(Arc::new(runner));
        }

        Ok(Self {
            runners,
            handles: Mutex::new(Vec::new()),
        })
    }

    pub fn runners(&self) -> &[Arc<TaskRunner>] {
        &self.runners
    }

    /// Whether any runner is polling
    pub fn is_polling(&self) -> bool {
        self.runners.iter().any(|runner| runner.is_polling())
    }

    /// Starts every runner
    ///
    /// Fails with [`RunnerError::AlreadyRunning`] if any runner is already
    /// polling. Runners this call started before hitting it are stopped
    /// again, so the manager is left as it was found.
    pub fn start_polling(&self) -> Result<(), RunnerError> {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);

        for (started, runner) in self.runners.iter().enumerate() {
            match runner.start_polling() {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    for earlier in &self.runners[..started] {
                        earlier.stop_polling();
                    }
                    warn!(
                        "Runner for '{}' already polling, stopped {} runner(s) started with it",
                        runner.task_type(),
                        started
                    );
                    return Err(e);
                }
            }
        }

        info!("Started {} task runner(s)", self.runners.len());
        Ok(())
    }

    /// Asks every runner to stop after its current cycle
    pub fn stop_polling(&self) {
        for runner in &self.runners {
            runner.stop_polling();
        }
    }

    /// Waits for every started poll loop to exit
    pub async fn join(&self) {
        let handles: Vec<_> = self
            .handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Task runner panicked: {}", e);
            }
        }
    }
}
