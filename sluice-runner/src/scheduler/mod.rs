//! Scheduler layer for the runner
//!
//! This layer owns the poll loops: when to ask the queue for work, and
//! when to stop. Each worker gets its own loop.

pub mod manager;
pub mod poller;

pub use manager::TaskManager;
pub use poller::{RunnerState, TaskRunner};
