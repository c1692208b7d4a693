//! Core value types and error handling for the deferred-value runtime.
//!
//! This crate provides the foundational types that futures carry around:
//! the dynamic value representation, callables, objects and errors.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of runtime values
//! - [`Function`] - Shared callable values and the [`Completion`] they produce
//! - [`PlainObject`] - Ordered property bags with data and accessor slots
//! - [`NativeObject`] - Host objects with custom property reads
//! - [`JsError`] - Engine-synthesized errors
//! - [`ErrorKind`] - Types of errors
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, Function, JsError, Value};
//!
//! let num = Value::Smi(42);
//! assert!(num.is_truthy());
//! assert_eq!(num.type_of(), "number");
//!
//! let error = JsError::type_error("undefined is not a function");
//! assert_eq!(error.kind, ErrorKind::TypeError);
//!
//! let thrower = Function::nullary(move || Err(Value::from(JsError::error("nope"))));
//! assert!(thrower.call(&Value::Undefined, &[]).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod function;
mod object;
mod value;

pub use error::{ErrorKind, JsError};
pub use function::{Completion, Function};
pub use object::{NativeObject, PlainObject, Property};
pub use value::Value;
