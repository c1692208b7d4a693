//! Object values: plain property bags and host-provided objects.

use crate::{Completion, Function};
use std::any::Any;
use std::rc::Rc;

/// A property slot on a [`PlainObject`].
#[derive(Debug, Clone)]
pub enum Property {
    /// A stored value
    Data(crate::Value),
    /// A getter invoked on every read; it may throw
    Accessor(Function),
}

/// An ordered bag of named properties.
///
/// Properties keep their insertion order, which is also the order used when
/// the object is displayed.
///
/// # Examples
///
/// ```
/// use core_types::{PlainObject, Value};
///
/// let record = PlainObject::new()
///     .with("status", Value::from("fulfilled"))
///     .with("value", Value::Smi(15));
/// assert_eq!(Value::object(record).to_string(), "{ status: 'fulfilled', value: 15 }");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlainObject {
    properties: Vec<(String, Property)>,
}

impl PlainObject {
    /// Creates an object with no properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`PlainObject::set`].
    pub fn with(mut self, key: impl Into<String>, value: crate::Value) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a data property, replacing any existing slot with the same key.
    pub fn set(&mut self, key: impl Into<String>, value: crate::Value) {
        self.define(key.into(), Property::Data(value));
    }

    /// Installs a getter for `key`.
    pub fn define_getter(&mut self, key: impl Into<String>, getter: Function) {
        self.define(key.into(), Property::Accessor(getter));
    }

    /// Looks up the slot for `key`.
    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, property)| property)
    }

    /// Iterates over the properties in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties
            .iter()
            .map(|(name, property)| (name.as_str(), property))
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if the object has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn define(&mut self, key: String, property: Property) {
        match self.properties.iter_mut().find(|(name, _)| *name == key) {
            Some((_, slot)) => *slot = property,
            None => self.properties.push((key, property)),
        }
    }
}

/// An object implemented by the host rather than stored as properties.
///
/// Property reads go through [`NativeObject::get`], which receives the shared
/// handle so that it can hand out functions bound to the object.
pub trait NativeObject: Any {
    /// Reads a property. Unknown keys read as `Undefined`.
    fn get(self: Rc<Self>, key: &str) -> Completion;

    /// Short description used by `Display`.
    fn describe(&self) -> String;

    /// Upcasts the handle so that callers can downcast to the concrete type.
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}
