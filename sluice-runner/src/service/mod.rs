//! Service layer
//!
//! Services hold the per-task logic of the runner: invoking the worker,
//! delivering results with retry, and funnelling unexpected failures into
//! the logs.

mod execution;
mod funnel;
mod reporter;

pub use execution::{DEFAULT_FAILURE_REASON, TaskExecutor};
pub use funnel::ErrorFunnel;
pub use reporter::{MAX_UPDATE_ATTEMPTS, ResultReporter, UPDATE_BACKOFF_UNIT};
