//! Core domain types
//!
//! These types mirror the wire shapes exchanged with the queue service.
//! They are shared between the HTTP client (for transfer) and the runner
//! (for execution and reporting).

pub mod task;
