//! Building JSON trees member by member.
//!
//! Objects keep insertion order. Anything `Serialize` can be inserted, so
//! typed values, ad-hoc `json!` fragments, and nested builders mix freely.

use crate::error::SchemaError;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default)]
pub struct ObjectBuilder {
    members: Map<String, Value>,
}

impl ObjectBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing object's members.
    #[must_use]
    pub const fn from_map(members: Map<String, Value>) -> Self {
        Self { members }
    }

    /// Serializes `value` and sets it as member `key`. Re-inserting a key
    /// replaces its value in place.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Json` if `value` cannot be represented as JSON.
    pub fn insert(self, key: impl Into<String>, value: impl Serialize) -> Result<Self, SchemaError> {
        let value: Value = serde_json::to_value(value).map_err(SchemaError::Json)?;
        Ok(self.insert_value(key, value))
    }

    #[must_use]
    pub fn insert_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.members.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.members.get(key)
    }

    #[must_use]
    pub fn build(self) -> Value {
        Value::Object(self.members)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArrayBuilder {
    elements: Vec<Value>,
}

impl ArrayBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes `value` and appends it.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Json` if `value` cannot be represented as JSON.
    pub fn push(self, value: impl Serialize) -> Result<Self, SchemaError> {
        let value: Value = serde_json::to_value(value).map_err(SchemaError::Json)?;
        Ok(self.push_value(value))
    }

    #[must_use]
    pub fn push_value(mut self, value: Value) -> Self {
        self.elements.push(value);
        self
    }

    /// Serializes and appends every item of `values`, in order.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Json` on the first item that cannot be
    /// represented as JSON.
    pub fn extend_from<T: Serialize>(
        mut self,
        values: impl IntoIterator<Item = T>,
    ) -> Result<Self, SchemaError> {
        for value in values {
            self.elements
                .push(serde_json::to_value(value).map_err(SchemaError::Json)?);
        }
        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn build(self) -> Value {
        Value::Array(self.elements)
    }
}
