//! Future kinds.
//!
//! A [`Species`] is the kind a future belongs to: a name plus the job queue
//! its reactions run on. Futures derived through `then` and the combinators
//! inherit the species of the future they come from, and
//! [`Species::resolve`] only passes a future through unchanged when it is of
//! the very same species.

use crate::future::{Future, RejectFn, ResolveFn};
use crate::reaction::Capability;
use crate::task_queue::JobQueue;
use core_types::{JsError, Value};
use std::fmt;
use std::rc::Rc;

struct SpeciesInner {
    name: String,
    queue: Rc<JobQueue>,
}

/// A handle identifying a kind of future.
///
/// Clones are the same species; two species created separately are distinct
/// even if they share a name and a queue.
#[derive(Clone)]
pub struct Species {
    inner: Rc<SpeciesInner>,
}

impl Species {
    /// Creates a new species whose jobs run on `queue`.
    pub fn new(name: impl Into<String>, queue: Rc<JobQueue>) -> Self {
        Self {
            inner: Rc::new(SpeciesInner {
                name: name.into(),
                queue,
            }),
        }
    }

    /// Creates a distinct species sharing this one's job queue, so that
    /// ordering between the two kinds is preserved.
    pub fn derive(&self, name: impl Into<String>) -> Self {
        Self::new(name, Rc::clone(&self.inner.queue))
    }

    /// Returns the species name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the queue reactions of this species are scheduled on.
    pub fn queue(&self) -> &Rc<JobQueue> {
        &self.inner.queue
    }

    /// Returns true if both handles are the same species.
    pub fn ptr_eq(&self, other: &Species) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Creates a future of this species. See [`Future::new`].
    pub fn create<F>(&self, setup: F) -> Future
    where
        F: FnOnce(ResolveFn, RejectFn) -> Result<(), Value>,
    {
        Future::new(self, setup)
    }

    /// Creates a future of this species from a setup value. See
    /// [`Future::construct`].
    pub fn construct(&self, setup: &Value) -> Result<Future, JsError> {
        Future::construct(self, setup)
    }

    /// Creates a pending future of this species with its resolving functions.
    pub fn capability(&self) -> Capability {
        Capability::new(self)
    }
}

impl fmt::Debug for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Species")
            .field("name", &self.inner.name)
            .finish()
    }
}
