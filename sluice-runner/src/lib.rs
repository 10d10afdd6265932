//! Sluice Runner
//!
//! A polling agent that leases tasks from the queue service, hands them to
//! a pluggable [`Worker`], and reports the outcome back.
//!
//! Architecture:
//! - Repository: the queue service seam (poll, update)
//! - Services: task execution, result reporting with retry, error funnel
//! - Scheduler: one poll loop per worker, plus a manager for several workers
//!
//! A runner never has more than one task in flight: each poll cycle awaits
//! fetch, execute and update before sleeping and polling again.

pub mod config;
pub mod error;
pub mod repository;
pub mod scheduler;
pub mod service;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{RunnerConfig, RunnerOptions};
pub use error::{ErrorHandler, NoopErrorHandler, RunnerError};
pub use repository::TaskRepository;
pub use scheduler::{RunnerState, TaskManager, TaskRunner};
pub use sluice_core::domain::task::{Payload, Task, TaskResult, TaskResultStatus};
pub use worker::{Worker, WorkerError, WorkerOutput};
