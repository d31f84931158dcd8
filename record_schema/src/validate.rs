//! Checking JSON documents against a `SchemaNode`, and deserializing them
//! only once they pass.
//!
//! Schemas are open: object members the schema does not declare are ignored,
//! and only `type`, `properties`, `items`, `required`, and (when asserted)
//! `format` constrain a document.

use crate::error::{SchemaError, ValidationError, ValidationErrorKind};
use crate::format;
use crate::json_pointer;
use crate::lint;
use crate::record::{self, Record, RecordType};
use crate::schema::{Format, SchemaNode};
use crate::settings::ValidatorSettings;
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use tracing::{debug, trace};

/// Validates documents, generates record schemas, and performs validated
/// deserialization under one set of `ValidatorSettings`.
///
/// Holds no state besides its settings; every operation is a pure function of
/// its inputs, so one validator can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    settings: ValidatorSettings,
}

impl SchemaValidator {
    #[must_use]
    pub const fn new(settings: ValidatorSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &ValidatorSettings {
        &self.settings
    }

    /// Returns true if `document` satisfies `schema` at every depth.
    #[must_use]
    pub fn validate(&self, document: &Value, schema: &SchemaNode) -> bool {
        self.check(document, schema).is_ok()
    }

    /// Like [`validate`](Self::validate), but reports the first failing
    /// constraint in depth-first order: the node's type, then its `required`
    /// names in order, then its members in document order (or elements in
    /// index order).
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` encountered.
    pub fn check(&self, document: &Value, schema: &SchemaNode) -> Result<(), ValidationError> {
        let result = check_node(document, schema, self.settings.assert_formats);
        if let Err(err) = &result {
            debug!(path = %err.path, %err, "document does not match schema");
        }
        result
    }

    /// Builds the object schema describing `record`. See [`record::generate`].
    #[must_use]
    pub fn generate(&self, record: &RecordType) -> SchemaNode {
        record::generate(record)
    }

    /// Parses `text`, checks it against `schema`, and only then deserializes
    /// it into `T`.
    ///
    /// # Errors
    ///
    /// - `SchemaError::Parse` if `text` is not well-formed JSON.
    /// - `SchemaError::Validation` if the document fails the schema.
    /// - `SchemaError::Deserialize` if the valid document still does not fit
    ///   `T` (e.g. a number out of range for the field's type).
    pub fn validate_and_deserialize<T: DeserializeOwned>(
        &self,
        text: &str,
        schema: &SchemaNode,
    ) -> Result<T, SchemaError> {
        let document: Value = serde_json::from_str(text).map_err(SchemaError::Parse)?;
        self.check(&document, schema)?;
        serde_path_to_error::deserialize(document).map_err(|err| SchemaError::Deserialize {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        })
    }

    /// [`validate_and_deserialize`](Self::validate_and_deserialize) against
    /// the schema generated from `T`'s record type.
    ///
    /// # Errors
    ///
    /// Same as `validate_and_deserialize`.
    pub fn validate_record<T: Record>(&self, text: &str) -> Result<T, SchemaError> {
        let schema: SchemaNode = self.generate(&T::record_type());
        self.validate_and_deserialize(text, &schema)
    }

    /// Reads a schema document from text.
    ///
    /// # Errors
    ///
    /// `SchemaError::Parse` for malformed JSON, `SchemaError::Lint` when
    /// strict checking is enabled and finds issues, and
    /// `SchemaError::InvalidSchema` when the document cannot be interpreted.
    pub fn parse_schema(&self, text: &str) -> Result<SchemaNode, SchemaError> {
        let value: Value = serde_json::from_str(text).map_err(SchemaError::Parse)?;
        self.schema_from_value(&value)
    }

    /// Reads a schema document that is already parsed.
    ///
    /// # Errors
    ///
    /// Same as [`parse_schema`](Self::parse_schema), minus `Parse`.
    pub fn schema_from_value(&self, value: &Value) -> Result<SchemaNode, SchemaError> {
        if self.settings.deny_invalid_unknown_json_schema {
            lint::lint_schema(value)?;
        }
        let schema: SchemaNode = SchemaNode::from_value(value)?;
        trace!(schema_type = ?schema.schema_type(), "schema decoded");
        Ok(schema)
    }
}

fn check_node(
    value: &Value,
    schema: &SchemaNode,
    assert_formats: bool,
) -> Result<(), ValidationError> {
    match (schema, value) {
        (SchemaNode::Any, _)
        | (SchemaNode::Null, Value::Null)
        | (SchemaNode::Boolean, Value::Bool(_))
        | (SchemaNode::Number, Value::Number(_)) => Ok(()),
        (SchemaNode::Integer, Value::Number(n)) if is_integral(n) => Ok(()),
        (SchemaNode::String { format }, Value::String(s)) => match format {
            Some(format) if assert_formats => check_format(format, s),
            _ => Ok(()),
        },
        (SchemaNode::Array { items }, Value::Array(elements)) => {
            for (index, element) in elements.iter().enumerate() {
                check_node(element, items, assert_formats).map_err(|mut err| {
                    err.path = json_pointer::child_index("", index) + &err.path;
                    err
                })?;
            }
            Ok(())
        }
        (
            SchemaNode::Object {
                properties,
                required,
                ..
            },
            Value::Object(members),
        ) => {
            if let Some(missing) = required
                .iter()
                .find(|name| !members.contains_key(name.as_str()))
            {
                return Err(ValidationError {
                    path: String::new(),
                    kind: ValidationErrorKind::MissingRequired {
                        property: missing.clone(),
                    },
                });
            }
            for (name, member) in members {
                let Some(property_schema) = properties.get(name) else {
                    continue;
                };
                check_node(member, property_schema, assert_formats).map_err(|mut err| {
                    err.path = json_pointer::child("", name) + &err.path;
                    err
                })?;
            }
            Ok(())
        }
        _ => match schema.schema_type() {
            Some(expected) => Err(ValidationError {
                path: String::new(),
                kind: ValidationErrorKind::TypeMismatch {
                    expected,
                    found: json_kind(value),
                },
            }),
            None => Ok(()),
        },
    }
}

fn check_format(format: &Format, value: &str) -> Result<(), ValidationError> {
    if format::matches(format, value) {
        Ok(())
    } else {
        Err(ValidationError {
            path: String::new(),
            kind: ValidationErrorKind::FormatMismatch {
                format: format.as_str().to_string(),
            },
        })
    }
}

fn is_integral(n: &Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
