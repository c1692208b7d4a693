//! Callable values.
//!
//! A [`Function`] is a shared, reference-counted closure taking a receiver and
//! an argument list. Calling it produces a [`Completion`]: `Ok` with the
//! returned value or `Err` with whatever value was thrown. Functions are
//! objects too and carry their own property slots, so a function can be a
//! thenable.

use crate::object::{PlainObject, Property};
use crate::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The outcome of running user code: a returned value or a thrown value.
pub type Completion = Result<Value, Value>;

type Callback = dyn Fn(&Value, &[Value]) -> Completion;

/// A callable value.
///
/// Clones share the same underlying closure and properties, so identity
/// survives cloning.
///
/// # Examples
///
/// ```
/// use core_types::{Function, Value};
///
/// let double = Function::unary(|v| match v {
///     Value::Smi(n) => Ok(Value::Smi(n * 2)),
///     other => Err(other),
/// });
/// assert_eq!(double.call(&Value::Undefined, &[Value::Smi(21)]), Ok(Value::Smi(42)));
/// ```
#[derive(Clone)]
pub struct Function {
    callback: Rc<Callback>,
    properties: Rc<RefCell<PlainObject>>,
}

impl Function {
    /// Creates a function from a closure over `(this, args)`.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Completion + 'static,
    {
        Self {
            callback: Rc::new(f),
            properties: Rc::default(),
        }
    }

    /// Creates a function that only looks at its first argument.
    ///
    /// A missing argument is passed as `Undefined`.
    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(Value) -> Completion + 'static,
    {
        Self::new(move |_this, args| f(args.first().cloned().unwrap_or(Value::Undefined)))
    }

    /// Creates a function that ignores its receiver and arguments.
    pub fn nullary<F>(f: F) -> Self
    where
        F: Fn() -> Completion + 'static,
    {
        Self::new(move |_this, _args| f())
    }

    /// Calls the function with the given receiver and arguments.
    pub fn call(&self, this: &Value, args: &[Value]) -> Completion {
        (self.callback)(this, args)
    }

    /// Builder form of [`Function::set_property`].
    pub fn with_property(self, key: impl Into<String>, value: Value) -> Self {
        self.set_property(key, value);
        self
    }

    /// Sets a data property on the function object.
    pub fn set_property(&self, key: impl Into<String>, value: Value) {
        self.properties.borrow_mut().set(key, value);
    }

    /// Installs a getter on the function object.
    pub fn define_getter(&self, key: impl Into<String>, getter: Function) {
        self.properties.borrow_mut().define_getter(key, getter);
    }

    /// Returns a copy of the slot for `key`.
    pub fn property(&self, key: &str) -> Option<Property> {
        self.properties.borrow().property(key).cloned()
    }

    /// Returns true if both handles refer to the same closure.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.callback), Rc::as_ptr(&other.callback))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function {{ ... }}")
    }
}
