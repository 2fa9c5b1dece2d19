//! Cooperative task scheduler
//!
//! Single-threaded, run-to-completion scheduling of periodic tasks that share
//! one piece of state. Tasks borrow the state only for the duration of a
//! synchronous `run` call, so no task can observe another task's
//! half-finished update.

pub mod executor;

pub use executor::{Scheduler, SchedulerError, Task, Yield};
