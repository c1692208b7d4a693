//! Static constructors and combinators: `resolve`, `reject`, `race`, `all`,
//! `all_settled`.
//!
//! Combinators accept an array value. Anything else yields a future rejected
//! with a `TypeError`, returned synchronously.

use crate::future::{Future, ResolveFn};
use crate::species::Species;
use core_types::{Function, JsError, PlainObject, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn sequence(futures: &Value) -> Result<Vec<Value>, JsError> {
    match futures {
        Value::Array(items) => Ok(items.borrow().clone()),
        other => Err(JsError::type_error(format!("{} is not iterable", other))),
    }
}

/// State shared by all slots of one `all`/`all_settled` call.
struct Aggregate {
    values: RefCell<Vec<Value>>,
    remaining: Cell<usize>,
    resolve: ResolveFn,
}

impl Aggregate {
    fn new(len: usize, resolve: ResolveFn) -> Rc<Self> {
        Rc::new(Self {
            values: RefCell::new(vec![Value::Undefined; len]),
            remaining: Cell::new(len),
            resolve,
        })
    }

    fn record(&self, index: usize, value: Value) {
        self.values.borrow_mut()[index] = value;
        let remaining = self.remaining.get() - 1;
        self.remaining.set(remaining);
        if remaining == 0 {
            let values = self.values.borrow().clone();
            self.resolve.call(Value::array(values));
        }
    }
}

/// Per-input context handed to the reactions of one slot.
#[derive(Clone)]
struct Slot {
    index: usize,
    aggregate: Rc<Aggregate>,
}

impl Slot {
    /// A handler recording `wrap(outcome)` at this slot's position.
    fn recorder(self, wrap: fn(Value) -> Value) -> Function {
        Function::unary(move |outcome| {
            self.aggregate.record(self.index, wrap(outcome));
            Ok(Value::Undefined)
        })
    }
}

fn fulfilled_record(value: Value) -> Value {
    Value::object(
        PlainObject::new()
            .with("status", Value::from("fulfilled"))
            .with("value", value),
    )
}

fn rejected_record(reason: Value) -> Value {
    Value::object(
        PlainObject::new()
            .with("status", Value::from("rejected"))
            .with("reason", reason),
    )
}

impl Species {
    /// Returns `value` itself if it is a future of this species; otherwise a
    /// new future of this species resolved with `value`.
    pub fn resolve(&self, value: Value) -> Future {
        if let Some(future) = Future::from_value(&value) {
            if future.species().ptr_eq(self) {
                return future;
            }
        }
        let capability = self.capability();
        capability.resolve.call(value);
        capability.future
    }

    /// Returns a new future of this species rejected with `reason`.
    pub fn reject(&self, reason: Value) -> Future {
        let capability = self.capability();
        capability.reject.call(reason);
        capability.future
    }

    /// Settles like whichever input settles first.
    ///
    /// An empty array never settles.
    pub fn race(&self, futures: &Value) -> Future {
        let items = match sequence(futures) {
            Ok(items) => items,
            Err(error) => return self.reject(error.into()),
        };
        self.create(|resolve, reject| {
            let (resolve, reject) = (resolve.to_function(), reject.to_function());
            for item in items {
                self.resolve(item)
                    .then(Some(resolve.clone()), Some(reject.clone()));
            }
            Ok(())
        })
    }

    /// Fulfills with every input's value, in input order, or rejects with the
    /// first rejection to happen. An empty array fulfills at once with that
    /// same array.
    ///
    /// # Examples
    ///
    /// ```
    /// use future_runtime::{EventLoop, JobQueue, Species};
    /// use core_types::Value;
    /// use std::rc::Rc;
    ///
    /// let event_loop = Rc::new(EventLoop::new());
    /// let species = Species::new("Future", JobQueue::new(event_loop.clone()));
    ///
    /// let pending = species.capability();
    /// let all = species.all(&Value::array(vec![
    ///     species.resolve(Value::Smi(42)).into(),
    ///     pending.future.clone().into(),
    /// ]));
    /// pending.resolve.call(Value::Smi(21));
    ///
    /// event_loop.run_until_done().unwrap();
    /// assert_eq!(all.result(), Some(Value::array(vec![Value::Smi(42), Value::Smi(21)])));
    /// ```
    pub fn all(&self, futures: &Value) -> Future {
        let items = match sequence(futures) {
            Ok(items) => items,
            Err(error) => return self.reject(error.into()),
        };
        if items.is_empty() {
            return self.resolve(futures.clone());
        }
        self.create(|resolve, reject| {
            let aggregate = Aggregate::new(items.len(), resolve);
            let reject = reject.to_function();
            for (index, item) in items.into_iter().enumerate() {
                let slot = Slot {
                    index,
                    aggregate: Rc::clone(&aggregate),
                };
                self.resolve(item)
                    .then(Some(slot.recorder(|value| value)), Some(reject.clone()));
            }
            Ok(())
        })
    }

    /// Fulfills, once every input has settled, with one
    /// `{ status, value | reason }` record per input, in input order. Never
    /// rejects. An empty array fulfills at once with that same array.
    pub fn all_settled(&self, futures: &Value) -> Future {
        let items = match sequence(futures) {
            Ok(items) => items,
            Err(error) => return self.reject(error.into()),
        };
        if items.is_empty() {
            return self.resolve(futures.clone());
        }
        self.create(|resolve, _reject| {
            let aggregate = Aggregate::new(items.len(), resolve);
            for (index, item) in items.into_iter().enumerate() {
                let slot = Slot {
                    index,
                    aggregate: Rc::clone(&aggregate),
                };
                self.resolve(item).then(
                    Some(slot.clone().recorder(fulfilled_record)),
                    Some(slot.recorder(rejected_record)),
                );
            }
            Ok(())
        })
    }
}
