//! Deferred values with deterministic scheduling.
//!
//! This crate provides a future primitive that settles exactly once and runs
//! every reaction from a FIFO job queue, never inside the call that caused it:
//! - [`JobQueue`] - FIFO of jobs, drained from a task armed with the [`Host`]
//! - [`EventLoop`] - Single-threaded host with a virtual clock for timers
//! - [`Future`] - The pending/fulfilled/rejected state machine
//! - [`Species`] - The kind of a future, plus `resolve`, `reject`, `race`,
//!   `all` and `all_settled`
//! - [`Adapter`] - Factories for conformance suites
//!
//! Thenables (any value with a callable `then`) are unwrapped one job per
//! hop, and futures are thenables themselves.
//!
//! # Examples
//!
//! ```
//! use future_runtime::{EventLoop, FutureState, JobQueue, Species};
//! use core_types::{Function, Value};
//! use std::rc::Rc;
//!
//! let event_loop = Rc::new(EventLoop::new());
//! let species = Species::new("Future", JobQueue::new(event_loop.clone()));
//!
//! let handled = species
//!     .reject(Value::from("boom"))
//!     .catch(Some(Function::unary(|_| Ok(Value::from("handled")))));
//! assert_eq!(handled.state(), FutureState::Pending);
//!
//! event_loop.run_until_done().unwrap();
//! assert_eq!(handled.result(), Some(Value::from("handled")));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
mod combinators;
pub mod event_loop;
pub mod future;
pub mod reaction;
mod resolution;
pub mod species;
pub mod task_queue;

// Re-export main types at crate root
pub use adapter::Adapter;
pub use event_loop::{EventLoop, TimerId};
pub use future::{Future, FutureState, RejectFn, ResolveFn};
pub use reaction::{Capability, Handler, Reaction};
pub use species::Species;
pub use task_queue::{Host, Job, JobQueue, Task, TaskQueue};
