//! Dynamic value representation.
//!
//! This module provides the core `Value` enum: every result a future can be
//! fulfilled with, every reason it can be rejected with, and every value that
//! user code can throw.

use crate::object::{NativeObject, PlainObject, Property};
use crate::{Completion, Function, JsError};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Represents any runtime value.
///
/// Primitives are stored inline; arrays and objects are shared handles so that
/// a value can be observed and updated from several places at once.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// let undefined = Value::Undefined;
/// let number = Value::Smi(42);
///
/// assert!(!undefined.is_truthy());
/// assert!(number.is_truthy());
/// assert_eq!(number.type_of(), "number");
/// assert!(!number.is_object());
/// ```
#[derive(Clone)]
pub enum Value {
    /// The undefined value
    Undefined,
    /// The null value
    Null,
    /// Boolean (true or false)
    Boolean(bool),
    /// Small integer
    Smi(i32),
    /// IEEE 754 double-precision floating point
    Double(f64),
    /// String value
    String(std::string::String),
    /// An error object
    Error(JsError),
    /// Ordered, shared sequence of values
    Array(Rc<RefCell<Vec<Value>>>),
    /// Shared plain object
    Object(Rc<RefCell<PlainObject>>),
    /// Callable value
    Function(Function),
    /// Host object (futures are exposed this way)
    NativeObject(Rc<dyn NativeObject>),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Smi(n) => f.debug_tuple("Smi").field(n).finish(),
            Value::Double(n) => f.debug_tuple("Double").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Error(e) => f.debug_tuple("Error").field(e).finish(),
            Value::Array(items) => f.debug_tuple("Array").field(&items.borrow()).finish(),
            Value::Object(obj) => f.debug_tuple("Object").field(&obj.borrow()).finish(),
            Value::Function(_) => write!(f, "Function(...)"),
            Value::NativeObject(obj) => write!(f, "NativeObject({})", obj.describe()),
        }
    }
}

/// Arrays and objects compare by contents; functions and host objects by
/// identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Smi(a), Value::Smi(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Object(a), Value::Object(b)) => {
                Rc::ptr_eq(a, b) || objects_equal(&a.borrow(), &b.borrow())
            }
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::NativeObject(a), Value::NativeObject(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }
}

fn objects_equal(a: &PlainObject, b: &PlainObject) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.properties().all(|(key, left)| match (left, b.property(key)) {
        (Property::Data(l), Some(Property::Data(r))) => l == r,
        (Property::Accessor(l), Some(Property::Accessor(r))) => l.ptr_eq(r),
        _ => false,
    })
}

impl Value {
    /// Wraps a list of values in a new shared array.
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// Wraps a plain object in a new shared handle.
    pub fn object(object: PlainObject) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    /// Returns whether this value is truthy.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// assert!(!Value::Undefined.is_truthy());
    /// assert!(!Value::Smi(0).is_truthy());
    /// assert!(!Value::Double(f64::NAN).is_truthy());
    /// assert!(Value::array(vec![]).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Smi(n) => *n != 0,
            Value::Double(n) => !n.is_nan() && *n != 0.0,
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Returns the `typeof` result for this value.
    pub fn type_of(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "object".to_string(),
            Value::Boolean(_) => "boolean".to_string(),
            Value::Smi(_) | Value::Double(_) => "number".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Function(_) => "function".to_string(),
            Value::Error(_) | Value::Array(_) | Value::Object(_) | Value::NativeObject(_) => {
                "object".to_string()
            }
        }
    }

    /// Returns true for values that can carry properties (and so may be
    /// thenables).
    pub fn is_object(&self) -> bool {
        matches!(
            self,
            Value::Error(_)
                | Value::Array(_)
                | Value::Object(_)
                | Value::Function(_)
                | Value::NativeObject(_)
        )
    }

    /// Returns the function if this value is callable.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Reads a property.
    ///
    /// Plain objects and functions read their own property slots. Accessor
    /// properties run their getter with this value as receiver, so a read may
    /// throw. Reading from `undefined` or `null` throws a `TypeError`.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::{PlainObject, Value};
    ///
    /// let obj = Value::object(PlainObject::new().with("answer", Value::Smi(42)));
    /// assert_eq!(obj.get("answer"), Ok(Value::Smi(42)));
    /// assert_eq!(obj.get("missing"), Ok(Value::Undefined));
    /// assert!(Value::Null.get("then").is_err());
    /// ```
    pub fn get(&self, key: &str) -> Completion {
        match self {
            Value::Undefined | Value::Null => Err(Value::from(JsError::type_error(format!(
                "Cannot read properties of {} (reading '{}')",
                self, key
            )))),
            // Clone the slot out so the getter may touch the object.
            Value::Object(obj) => {
                let property = obj.borrow().property(key).cloned();
                self.read_slot(property)
            }
            Value::Function(func) => self.read_slot(func.property(key)),
            Value::Array(items) if key == "length" => Ok(Value::Smi(items.borrow().len() as i32)),
            Value::Error(e) => match key {
                "message" => Ok(Value::String(e.message.clone())),
                "name" => Ok(Value::String(e.kind.to_string())),
                _ => Ok(Value::Undefined),
            },
            Value::NativeObject(obj) => Rc::clone(obj).get(key),
            _ => Ok(Value::Undefined),
        }
    }

    fn read_slot(&self, property: Option<Property>) -> Completion {
        match property {
            Some(Property::Data(value)) => Ok(value),
            Some(Property::Accessor(getter)) => getter.call(self, &[]),
            None => Ok(Value::Undefined),
        }
    }

    fn inspect(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "'{}'", s),
            Value::Error(e) => write!(f, "[{}]", e),
            other => write!(f, "{}", other),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Smi(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<JsError> for Value {
    fn from(e: JsError) -> Self {
        Value::Error(e)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

/// String conversion in the style of `console.log`.
///
/// Top-level strings print bare; strings nested in arrays and objects are
/// quoted.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// assert_eq!(Value::Undefined.to_string(), "undefined");
/// assert_eq!(Value::from("hi").to_string(), "hi");
/// assert_eq!(Value::array(vec![Value::Smi(42), Value::from("x")]).to_string(), "[ 42, 'x' ]");
/// assert_eq!(Value::array(vec![]).to_string(), "[]");
/// ```
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Smi(n) => write!(f, "{}", n),
            Value::Double(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    if n.is_sign_positive() {
                        write!(f, "Infinity")
                    } else {
                        write!(f, "-Infinity")
                    }
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    // Integer-valued doubles display without decimal point
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Error(e) => write!(f, "{}", e),
            Value::Array(items) => {
                let items = items.borrow();
                if items.is_empty() {
                    return write!(f, "[]");
                }
                write!(f, "[ ")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.inspect(f)?;
                }
                write!(f, " ]")
            }
            Value::Object(obj) => {
                let obj = obj.borrow();
                if obj.is_empty() {
                    return write!(f, "{{}}");
                }
                write!(f, "{{ ")?;
                for (i, (key, property)) in obj.properties().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match property {
                        Property::Data(value) => {
                            write!(f, "{}: ", key)?;
                            value.inspect(f)?;
                        }
                        Property::Accessor(_) => write!(f, "{}: [Getter]", key)?,
                    }
                }
                write!(f, " }}")
            }
            Value::Function(_) => write!(f, "[Function]"),
            Value::NativeObject(obj) => write!(f, "{}", obj.describe()),
        }
    }
}
