//! The resolution procedure.
//!
//! Resolving a future with a value either settles it on the spot or, when the
//! value is a thenable, schedules a job that hands the thenable a fresh pair
//! of resolving functions. Each thenable hop costs exactly one job, so chains
//! of any depth unwrap without recursion.

use crate::future::{resolving_functions, Future};
use crate::task_queue::Job;
use core_types::{Function, JsError, Value};
use std::rc::Rc;
use tracing::debug;

pub(crate) fn resolve_into(target: &Future, resolution: Value) {
    if Future::from_value(&resolution).is_some_and(|future| future.ptr_eq(target)) {
        debug!(
            species = target.species().name(),
            "future resolved with itself"
        );
        target.reject_raw(Value::from(JsError::type_error(format!(
            "Chaining cycle detected for {}",
            target.species().name()
        ))));
        return;
    }
    if !resolution.is_object() {
        target.fulfill(resolution);
        return;
    }
    let then = match resolution.get("then") {
        Ok(then) => then,
        Err(thrown) => {
            debug!(species = target.species().name(), "reading then threw");
            target.reject_raw(thrown);
            return;
        }
    };
    let Value::Function(then) = then else {
        target.fulfill(resolution);
        return;
    };
    let queue = Rc::clone(target.species().queue());
    let target = target.clone();
    queue.schedule(Job::new(move || {
        resolve_thenable_job(&target, &resolution, &then)
    }));
}

fn resolve_thenable_job(target: &Future, thenable: &Value, then: &Function) {
    let (resolve, reject) = resolving_functions(target);
    if let Err(thrown) = then.call(thenable, &[resolve.into(), reject.clone().into()]) {
        reject.call(thrown);
    }
}
