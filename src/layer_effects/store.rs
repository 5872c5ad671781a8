//! Named-property configuration store.
//!
//! Styles are persisted elsewhere as flat, versioned property names such as
//! `drop_shadow/opacity` or `drop_shadow/contour_lookup_table/value_17`.
//! The engine reads them exactly once, when a style is built; rendering
//! never touches the store.

use std::collections::HashMap;

use crate::raster::Color;

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Text(String),
    Color(Color),
}

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Int(_) => "int",
            PropertyValue::Text(_) => "text",
            PropertyValue::Color(_) => "color",
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

impl From<Color> for PropertyValue {
    fn from(v: Color) -> Self {
        PropertyValue::Color(v)
    }
}

/// Read access to a property store.
pub trait ConfigStore {
    fn get(&self, name: &str) -> Option<PropertyValue>;
}

/// In-memory property store.
#[derive(Debug, Clone, Default)]
pub struct PropertyBag {
    values: HashMap<String, PropertyValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        PropertyBag::default()
    }

    pub fn set<V: Into<PropertyValue>>(&mut self, name: &str, value: V) -> &mut Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigStore for PropertyBag {
    fn get(&self, name: &str) -> Option<PropertyValue> {
        self.values.get(name).cloned()
    }
}
