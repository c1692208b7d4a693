//! Promises/A+-style conformance cases driven through the adapter

use core_types::{ErrorKind, Function, PlainObject, Value};
use future_runtime::{Adapter, EventLoop, Future, FutureState, JobQueue, Species};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn adapter() -> (Rc<EventLoop>, Adapter) {
    let event_loop = Rc::new(EventLoop::new());
    let species = Species::new("Future", JobQueue::new(event_loop.clone()));
    (event_loop, Adapter::new(species))
}

fn counter() -> (Rc<Cell<u32>>, Function) {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    let f = Function::unary(move |value| {
        c.set(c.get() + 1);
        Ok(value)
    });
    (count, f)
}

/// Calls `then` the way foreign code would: through the value's property.
fn then_via_value(future: &Future, on_fulfilled: Value, on_rejected: Value) -> Future {
    let value = Value::from(future.clone());
    let then = value.get("then").unwrap();
    let derived = then
        .as_function()
        .unwrap()
        .call(&value, &[on_fulfilled, on_rejected])
        .unwrap();
    Future::from_value(&derived).unwrap()
}

mod states {
    use super::*;

    #[test]
    fn fulfilled_cannot_transition() {
        let (el, adapter) = adapter();
        let d = adapter.deferred();
        let (fulfilled, on_fulfilled) = counter();
        let (rejected, on_rejected) = counter();
        d.future.then(Some(on_fulfilled), Some(on_rejected));
        d.resolve.call(Value::Undefined);
        d.reject.call(Value::Undefined);
        el.run_until_done().unwrap();
        assert_eq!((fulfilled.get(), rejected.get()), (1, 0));
    }

    #[test]
    fn rejected_cannot_transition() {
        let (el, adapter) = adapter();
        let d = adapter.deferred();
        let (fulfilled, on_fulfilled) = counter();
        let (rejected, on_rejected) = counter();
        d.future.then(Some(on_fulfilled), Some(on_rejected));
        d.reject.call(Value::Undefined);
        d.resolve.call(Value::Undefined);
        el.run_until_done().unwrap();
        assert_eq!((fulfilled.get(), rejected.get()), (0, 1));
    }
}

mod then_method {
    use super::*;

    #[test]
    fn non_function_handlers_are_ignored() {
        let (el, adapter) = adapter();
        for junk in [Value::Undefined, Value::Null, Value::Smi(5), Value::from("x")] {
            let (fulfilled, rejected) = (
                adapter.resolved(Value::Smi(1)),
                adapter.rejected(Value::Smi(2)),
            );
            let passed = then_via_value(&fulfilled, junk.clone(), junk.clone());
            let failed = then_via_value(&rejected, junk.clone(), junk);
            el.run_until_done().unwrap();
            assert_eq!(passed.result(), Some(Value::Smi(1)));
            assert_eq!(failed.state(), FutureState::Rejected);
            assert_eq!(failed.result(), Some(Value::Smi(2)));
        }
    }

    #[test]
    fn on_fulfilled_not_called_before_fulfillment() {
        let (el, adapter) = adapter();
        let d = adapter.deferred();
        let (count, on_fulfilled) = counter();
        d.future.then(Some(on_fulfilled), None);
        el.run_until_done().unwrap();
        assert_eq!(count.get(), 0);
        d.resolve.call(Value::Smi(1));
        assert_eq!(count.get(), 0);
        el.run_until_done().unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn handlers_called_once_even_with_repeated_settlement() {
        let (el, adapter) = adapter();
        let d = adapter.deferred();
        let (count, on_rejected) = counter();
        d.future.then(None, Some(on_rejected));
        d.reject.call(Value::Smi(1));
        d.reject.call(Value::Smi(2));
        el.run_until_done().unwrap();
        d.reject.call(Value::Smi(3));
        el.run_until_done().unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn handlers_called_without_receiver() {
        let (el, adapter) = adapter();
        let seen = Rc::new(RefCell::new(None));
        let s = seen.clone();
        adapter.resolved(Value::Smi(1)).then(
            Some(Function::new(move |this, _| {
                *s.borrow_mut() = Some(this.clone());
                Ok(Value::Undefined)
            })),
            None,
        );
        el.run_until_done().unwrap();
        assert_eq!(*seen.borrow(), Some(Value::Undefined));
    }

    #[test]
    fn multiple_rejection_handlers_run_in_order() {
        let (el, adapter) = adapter();
        let order = Rc::new(RefCell::new(vec![]));
        let future = adapter.rejected(Value::from("r"));
        for n in 0..3 {
            let o = order.clone();
            future.catch(Some(Function::unary(move |_| {
                o.borrow_mut().push(n);
                Ok(Value::Undefined)
            })));
        }
        el.run_until_done().unwrap();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn thrown_value_rejects_derived_future() {
        let (el, adapter) = adapter();
        let derived = adapter
            .resolved(Value::Undefined)
            .then(Some(Function::unary(|_| Err(Value::Null))), None);
        el.run_until_done().unwrap();
        assert_eq!(derived.state(), FutureState::Rejected);
        assert_eq!(derived.result(), Some(Value::Null));
    }

    #[test]
    fn rejection_handler_return_fulfills_derived_future() {
        let (el, adapter) = adapter();
        let derived = adapter
            .rejected(Value::Undefined)
            .then(None, Some(Function::unary(|_| Ok(Value::Boolean(false)))));
        el.run_until_done().unwrap();
        assert_eq!(derived.state(), FutureState::Fulfilled);
        assert_eq!(derived.result(), Some(Value::Boolean(false)));
    }
}

mod resolution_procedure {
    use super::*;

    #[test]
    fn same_object_is_type_error() {
        let (el, adapter) = adapter();
        let d = adapter.deferred();
        d.resolve.call(d.future.clone().into());
        el.run_until_done().unwrap();
        assert!(matches!(
            d.future.result(),
            Some(Value::Error(e)) if e.kind == ErrorKind::TypeError
        ));
    }

    #[test]
    fn adopts_state_of_pending_future() {
        let (el, adapter) = adapter();
        let inner = adapter.deferred();
        let outer = adapter.resolved(Value::Undefined).then(
            Some(Function::unary({
                let inner = inner.future.clone();
                move |_| Ok(inner.clone().into())
            })),
            None,
        );
        el.run_until_done().unwrap();
        assert!(outer.is_pending());
        inner.reject.call(Value::from("late"));
        el.run_until_done().unwrap();
        assert_eq!(outer.state(), FutureState::Rejected);
        assert_eq!(outer.result(), Some(Value::from("late")));
    }

    #[test]
    fn resolved_adapter_unwraps_thenables() {
        let (el, adapter) = adapter();
        let thenable = Value::object(PlainObject::new().with(
            "then",
            Value::from(Function::new(|_this, args| {
                args[1].as_function().unwrap().call(&Value::Undefined, &[Value::Smi(13)])
            })),
        ));
        let future = adapter.resolved(thenable);
        el.run_until_done().unwrap();
        assert_eq!(future.state(), FutureState::Rejected);
        assert_eq!(future.result(), Some(Value::Smi(13)));
    }

    #[test]
    fn function_without_then_fulfills_with_itself() {
        let (el, adapter) = adapter();
        let func = Value::from(Function::unary(Ok));
        let future = adapter.resolved(func.clone());
        el.run_until_done().unwrap();
        assert_eq!(future.result(), Some(func));
    }

    #[test]
    fn function_with_then_is_a_thenable() {
        let (el, adapter) = adapter();
        let then = Function::new(|this, args| {
            assert!(matches!(this, Value::Function(_)));
            let resolve = args[0].as_function().unwrap();
            resolve.call(&Value::Undefined, &[Value::Smi(7)])
        });
        let func = Function::unary(Ok).with_property("then", then.into());
        let future = adapter.resolved(func.into());
        el.run_until_done().unwrap();
        assert_eq!(future.state(), FutureState::Fulfilled);
        assert_eq!(future.result(), Some(Value::Smi(7)));
    }

    #[test]
    fn function_then_getter_that_throws_rejects() {
        let (el, adapter) = adapter();
        let func = Function::unary(Ok);
        func.define_getter("then", Function::nullary(|| Err(Value::from("getter"))));
        let future = adapter.resolved(func.into());
        el.run_until_done().unwrap();
        assert_eq!(future.state(), FutureState::Rejected);
        assert_eq!(future.result(), Some(Value::from("getter")));
    }

    #[test]
    fn rejected_adapter_keeps_thenable_reason() {
        let (el, adapter) = adapter();
        let inner = adapter.resolved(Value::Smi(1));
        let future = adapter.rejected(inner.clone().into());
        el.run_until_done().unwrap();
        assert_eq!(future.result(), Some(Value::from(inner)));
    }
}
