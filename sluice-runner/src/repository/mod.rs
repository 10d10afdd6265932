//! Repository layer
//!
//! The queue service seam. The runner only talks to the queue through
//! [`TaskRepository`], so tests can substitute an in-memory queue.

mod tasks;

pub use tasks::TaskRepository;
