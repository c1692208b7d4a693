//! The future state machine.
//!
//! A [`Future`] starts pending and settles at most once. Settlement detaches
//! the pending reactions and schedules one job for each of them; nothing that
//! a reaction does can run inside the settling call.

use crate::reaction::{Reaction, ReactionKind};
use crate::resolution::resolve_into;
use crate::species::Species;
use core_types::{Completion, Function, JsError, NativeObject, Value};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// The observable state of a future.
///
/// Futures only ever move from `Pending` to one of the two settled states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FutureState {
    /// Not settled yet.
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with a reason.
    Rejected,
}

enum State {
    Pending(Vec<Reaction>),
    Fulfilled(Value),
    Rejected(Value),
}

pub(crate) struct FutureCell {
    species: Species,
    state: RefCell<State>,
}

impl State {
    fn take_reactions(&mut self) -> Vec<Reaction> {
        match self {
            State::Pending(reactions) => std::mem::take(reactions),
            _ => Vec::new(),
        }
    }
}

/// Unlinks a pending chain one derived future at a time, so dropping a long
/// chain of unsettled futures uses constant stack.
impl Drop for FutureCell {
    fn drop(&mut self) {
        let mut detached = self.state.get_mut().take_reactions();
        while let Some(reaction) = detached.pop() {
            let mut derived = reaction.into_future();
            if let Some(cell) = Rc::get_mut(&mut derived.cell) {
                detached.extend(cell.state.get_mut().take_reactions());
            }
        }
    }
}

/// A deferred value.
///
/// `Future` is a cheap shared handle: clones observe and settle the same
/// underlying state.
///
/// # Examples
///
/// ```
/// use future_runtime::{EventLoop, FutureState, JobQueue, Species};
/// use core_types::Value;
/// use std::rc::Rc;
///
/// let event_loop = Rc::new(EventLoop::new());
/// let species = Species::new("Future", JobQueue::new(event_loop.clone()));
///
/// let future = species.create(|resolve, _reject| {
///     resolve.call(Value::Smi(42));
///     Ok(())
/// });
/// assert_eq!(future.state(), FutureState::Fulfilled);
/// assert_eq!(future.result(), Some(Value::Smi(42)));
/// ```
#[derive(Clone)]
pub struct Future {
    cell: Rc<FutureCell>,
}

impl Future {
    /// Creates a future and runs `setup` synchronously with its resolving
    /// functions.
    ///
    /// An `Err` returned by `setup` rejects the future, unless one of the
    /// resolving functions was already used.
    pub fn new<F>(species: &Species, setup: F) -> Future
    where
        F: FnOnce(ResolveFn, RejectFn) -> Result<(), Value>,
    {
        let future = Future::pending(species);
        let (resolve, reject) = resolving_functions(&future);
        if let Err(thrown) = setup(resolve, reject.clone()) {
            reject.call(thrown);
        }
        future
    }

    /// Creates a future from a setup routine given as a value.
    ///
    /// # Errors
    ///
    /// Returns a `TypeError` if `setup` is not callable; nothing is created.
    pub fn construct(species: &Species, setup: &Value) -> Result<Future, JsError> {
        let Some(setup) = setup.as_function() else {
            return Err(JsError::type_error(format!(
                "{} resolver {} is not a function",
                species.name(),
                setup
            )));
        };
        Ok(Future::new(species, |resolve, reject| {
            setup
                .call(&Value::Undefined, &[resolve.into(), reject.into()])
                .map(drop)
        }))
    }

    pub(crate) fn pending(species: &Species) -> Future {
        Future {
            cell: Rc::new(FutureCell {
                species: species.clone(),
                state: RefCell::new(State::Pending(Vec::new())),
            }),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> FutureState {
        match &*self.cell.state.borrow() {
            State::Pending(_) => FutureState::Pending,
            State::Fulfilled(_) => FutureState::Fulfilled,
            State::Rejected(_) => FutureState::Rejected,
        }
    }

    /// Returns the value or reason once settled.
    pub fn result(&self) -> Option<Value> {
        match &*self.cell.state.borrow() {
            State::Pending(_) => None,
            State::Fulfilled(value) | State::Rejected(value) => Some(value.clone()),
        }
    }

    /// Returns true while the future is unsettled.
    pub fn is_pending(&self) -> bool {
        self.state() == FutureState::Pending
    }

    /// Returns the number of reactions waiting for settlement.
    pub fn reaction_count(&self) -> usize {
        match &*self.cell.state.borrow() {
            State::Pending(reactions) => reactions.len(),
            _ => 0,
        }
    }

    /// Returns the kind this future was created with.
    pub fn species(&self) -> &Species {
        &self.cell.species
    }

    /// Returns true if both handles refer to the same future.
    pub fn ptr_eq(&self, other: &Future) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// Recovers a future from a value produced by `Value::from(future)`.
    pub fn from_value(value: &Value) -> Option<Future> {
        match value {
            Value::NativeObject(obj) => Rc::clone(obj)
                .into_any()
                .downcast::<FutureCell>()
                .ok()
                .map(|cell| Future { cell }),
            _ => None,
        }
    }

    pub(crate) fn fulfill(&self, value: Value) {
        self.settle(State::Fulfilled(value));
    }

    pub(crate) fn reject_raw(&self, reason: Value) {
        self.settle(State::Rejected(reason));
    }

    fn settle(&self, settled: State) {
        let (kind, argument) = match &settled {
            State::Fulfilled(value) => (ReactionKind::Fulfill, value.clone()),
            State::Rejected(reason) => (ReactionKind::Reject, reason.clone()),
            State::Pending(_) => return,
        };
        let reactions = {
            let mut state = self.cell.state.borrow_mut();
            let State::Pending(reactions) = &mut *state else {
                return;
            };
            let reactions = std::mem::take(reactions);
            *state = settled;
            reactions
        };
        trace!(
            species = self.species().name(),
            outcome = ?kind,
            reactions = reactions.len(),
            "future settled"
        );
        let queue = self.species().queue();
        for reaction in reactions {
            queue.schedule(reaction.into_job(kind, argument.clone()));
        }
    }

    /// Attaches `reaction`, or schedules it right away if already settled.
    pub(crate) fn register(&self, reaction: Reaction) {
        let settled = {
            let mut state = self.cell.state.borrow_mut();
            match &mut *state {
                State::Pending(reactions) => {
                    reactions.push(reaction);
                    return;
                }
                State::Fulfilled(value) => (ReactionKind::Fulfill, value.clone()),
                State::Rejected(reason) => (ReactionKind::Reject, reason.clone()),
            }
        };
        let (kind, argument) = settled;
        self.species()
            .queue()
            .schedule(reaction.into_job(kind, argument));
    }
}

impl From<Future> for Value {
    fn from(future: Future) -> Self {
        Value::NativeObject(future.cell)
    }
}

impl fmt::Debug for Future {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Future")
            .field("species", &self.species().name())
            .field("state", &self.state())
            .field("result", &self.result())
            .finish()
    }
}

/// Futures are thenables: reading `then` yields a function bound to the
/// future that forwards to [`Future::then`].
impl NativeObject for FutureCell {
    fn get(self: Rc<Self>, key: &str) -> Completion {
        if key != "then" {
            return Ok(Value::Undefined);
        }
        let future = Future { cell: self };
        Ok(Value::Function(Function::new(move |_this, args| {
            let handler = |index: usize| args.get(index).and_then(Value::as_function).cloned();
            Ok(future.then(handler(0), handler(1)).into())
        })))
    }

    fn describe(&self) -> String {
        match &*self.state.borrow() {
            State::Pending(_) => format!("{} {{ <pending> }}", self.species.name()),
            State::Fulfilled(value) => format!("{} {{ {} }}", self.species.name(), value),
            State::Rejected(reason) => {
                format!("{} {{ <rejected> {} }}", self.species.name(), reason)
            }
        }
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

struct ResolvingState {
    future: Future,
    already_resolved: Cell<bool>,
}

/// The resolve half of a future's resolving functions.
///
/// Shares a single "already resolved" flag with its [`RejectFn`]: only the
/// first call among the pair has any effect.
#[derive(Clone)]
pub struct ResolveFn(Rc<ResolvingState>);

/// The reject half of a future's resolving functions.
#[derive(Clone)]
pub struct RejectFn(Rc<ResolvingState>);

pub(crate) fn resolving_functions(future: &Future) -> (ResolveFn, RejectFn) {
    let state = Rc::new(ResolvingState {
        future: future.clone(),
        already_resolved: Cell::new(false),
    });
    (ResolveFn(Rc::clone(&state)), RejectFn(state))
}

impl ResolveFn {
    /// Resolves the future with `resolution`, unwrapping thenables.
    pub fn call(&self, resolution: Value) {
        if self.0.already_resolved.replace(true) {
            return;
        }
        resolve_into(&self.0.future, resolution);
    }

    /// Wraps this resolving function as a callable value.
    pub fn to_function(&self) -> Function {
        let this = self.clone();
        Function::unary(move |value| {
            this.call(value);
            Ok(Value::Undefined)
        })
    }
}

impl RejectFn {
    /// Rejects the future with `reason`.
    pub fn call(&self, reason: Value) {
        if self.0.already_resolved.replace(true) {
            return;
        }
        self.0.future.reject_raw(reason);
    }

    /// Wraps this resolving function as a callable value.
    pub fn to_function(&self) -> Function {
        let this = self.clone();
        Function::unary(move |reason| {
            this.call(reason);
            Ok(Value::Undefined)
        })
    }
}

impl From<ResolveFn> for Value {
    fn from(resolve: ResolveFn) -> Self {
        Value::Function(resolve.to_function())
    }
}

impl From<RejectFn> for Value {
    fn from(reject: RejectFn) -> Self {
        Value::Function(reject.to_function())
    }
}

impl fmt::Debug for ResolveFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResolveFn {{ ... }}")
    }
}

impl fmt::Debug for RejectFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RejectFn {{ ... }}")
    }
}
