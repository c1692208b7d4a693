//! The reaction engine: `then`, `catch`, `finally`.
//!
//! Every call to `then` creates a derived future through a fresh
//! [`Capability`] of the source's species, and a [`Reaction`] that settles it
//! once the source settles.

use crate::future::{resolving_functions, Future, RejectFn, ResolveFn};
use crate::species::Species;
use crate::task_queue::Job;
use core_types::{Function, Value};
use tracing::trace;

/// A future bundled with the functions that settle it.
#[derive(Debug, Clone)]
pub struct Capability {
    /// The future being settled
    pub future: Future,
    /// Resolves `future`
    pub resolve: ResolveFn,
    /// Rejects `future`
    pub reject: RejectFn,
}

impl Capability {
    /// Creates a pending future of `species` together with its resolving
    /// functions.
    pub fn new(species: &Species) -> Self {
        let future = Future::pending(species);
        let (resolve, reject) = resolving_functions(&future);
        Self {
            future,
            resolve,
            reject,
        }
    }
}

/// One side of a reaction.
#[derive(Debug, Clone)]
pub enum Handler {
    /// Passes the value through to the derived future.
    Identity,
    /// Passes the reason through as a rejection.
    Thrower,
    /// User code.
    Callback(Function),
}

/// Which side of a reaction a settlement triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReactionKind {
    Fulfill,
    Reject,
}

/// A registered `(capability, on_fulfilled, on_rejected)` triple.
#[derive(Debug)]
pub struct Reaction {
    capability: Capability,
    on_fulfilled: Handler,
    on_rejected: Handler,
}

impl Reaction {
    /// Builds a reaction, replacing missing handlers with pass-throughs.
    pub fn new(
        capability: Capability,
        on_fulfilled: Option<Function>,
        on_rejected: Option<Function>,
    ) -> Self {
        Self {
            capability,
            on_fulfilled: on_fulfilled.map_or(Handler::Identity, Handler::Callback),
            on_rejected: on_rejected.map_or(Handler::Thrower, Handler::Callback),
        }
    }

    pub(crate) fn into_job(self, kind: ReactionKind, argument: Value) -> Job {
        let handler = match kind {
            ReactionKind::Fulfill => self.on_fulfilled,
            ReactionKind::Reject => self.on_rejected,
        };
        let capability = self.capability;
        Job::new(move || reaction_job(&capability, handler, argument))
    }

    /// Drops the handlers and resolving functions, keeping only the derived
    /// future.
    pub(crate) fn into_future(self) -> Future {
        self.capability.future
    }
}

fn reaction_job(capability: &Capability, handler: Handler, argument: Value) {
    match handler {
        Handler::Identity => capability.resolve.call(argument),
        Handler::Thrower => capability.reject.call(argument),
        Handler::Callback(callback) => match callback.call(&Value::Undefined, &[argument]) {
            Ok(value) => capability.resolve.call(value),
            Err(thrown) => {
                trace!("reaction handler threw");
                capability.reject.call(thrown);
            }
        },
    }
}

impl Future {
    /// Registers handlers for settlement and returns the derived future.
    ///
    /// `None` handlers pass the outcome through unchanged. Handlers always run
    /// from the job queue, never inside this call. A handler's return value
    /// resolves the derived future (thenables are unwrapped); a thrown value
    /// rejects it.
    ///
    /// # Examples
    ///
    /// ```
    /// use future_runtime::{EventLoop, JobQueue, Species};
    /// use core_types::{Function, Value};
    /// use std::rc::Rc;
    ///
    /// let event_loop = Rc::new(EventLoop::new());
    /// let species = Species::new("Future", JobQueue::new(event_loop.clone()));
    ///
    /// let chained = species
    ///     .resolve(Value::Smi(41))
    ///     .then(Some(Function::unary(|v| match v {
    ///         Value::Smi(n) => Ok(Value::Smi(n + 1)),
    ///         other => Err(other),
    ///     })), None);
    /// assert!(chained.is_pending());
    ///
    /// event_loop.run_until_done().unwrap();
    /// assert_eq!(chained.result(), Some(Value::Smi(42)));
    /// ```
    pub fn then(&self, on_fulfilled: Option<Function>, on_rejected: Option<Function>) -> Future {
        let capability = Capability::new(self.species());
        let derived = capability.future.clone();
        self.register(Reaction::new(capability, on_fulfilled, on_rejected));
        derived
    }

    /// Registers a rejection handler only. Same as `then(None, on_rejected)`.
    pub fn catch(&self, on_rejected: Option<Function>) -> Future {
        self.then(None, on_rejected)
    }

    /// Runs `on_settle` after this future settles, then passes the original
    /// outcome through.
    ///
    /// The value returned by `on_settle` is awaited but discarded; if it throws
    /// or rejects, that failure replaces the outcome.
    pub fn finally(&self, on_settle: Option<Function>) -> Future {
        let Some(on_settle) = on_settle else {
            return self.then(None, None);
        };
        let then_finally = {
            let species = self.species().clone();
            let on_settle = on_settle.clone();
            Function::unary(move |value| {
                let settled = species.resolve(on_settle.call(&Value::Undefined, &[])?);
                let pass = Function::nullary(move || Ok(value.clone()));
                Ok(settled.then(Some(pass), None).into())
            })
        };
        let catch_finally = {
            let species = self.species().clone();
            Function::unary(move |reason| {
                let settled = species.resolve(on_settle.call(&Value::Undefined, &[])?);
                let rethrow = Function::nullary(move || Err(reason.clone()));
                Ok(settled.then(Some(rethrow), None).into())
            })
        };
        self.then(Some(then_finally), Some(catch_finally))
    }
}
