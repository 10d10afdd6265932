//! Sluice Core
//!
//! Core types shared by the Sluice queue client and task runner.
//!
//! This crate contains:
//! - Domain types: tasks handed out by the queue service and the results
//!   reported back for them

pub mod domain;
