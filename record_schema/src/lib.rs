//! Validate JSON against a JSON Schema subset, generate schemas from typed
//! records, and deserialize JSON only after it validates.
//!
//! The supported keywords are `type`, `properties`, `items`, `required`, and
//! `format`. Schemas are open: members a schema does not declare are ignored.

mod builder;
mod error;
mod format;
mod json_pointer;
mod lint;
mod record;
mod schema;
mod settings;
mod validate;

pub use builder::{ArrayBuilder, ObjectBuilder};
pub use error::{
    SchemaError, SchemaLintError, SchemaLintIssue, SchemaLintIssueKind, ValidationError,
    ValidationErrorKind,
};
pub use lint::lint_schema;
pub use record::{FieldDescriptor, FieldKind, Record, RecordType, generate};
pub use schema::{Format, SchemaNode, SchemaType};
pub use settings::ValidatorSettings;
pub use validate::SchemaValidator;

#[cfg(feature = "derive")]
pub use record_schema_macro::Record;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Returns true if `document` satisfies `schema`, with default settings.
#[must_use]
pub fn validate(document: &Value, schema: &SchemaNode) -> bool {
    SchemaValidator::default().validate(document, schema)
}

/// Reports the first constraint `document` violates, with default settings.
///
/// # Errors
///
/// Returns the first `ValidationError` found depth-first.
pub fn check(document: &Value, schema: &SchemaNode) -> Result<(), ValidationError> {
    SchemaValidator::default().check(document, schema)
}

/// Parses `text`, validates it against `schema`, then deserializes it into `T`,
/// with default settings.
///
/// # Errors
///
/// Returns `SchemaError::Parse` for malformed JSON, `SchemaError::Validation`
/// when the document fails the schema, and `SchemaError::Deserialize` when the
/// valid document does not fit `T`.
pub fn validate_and_deserialize<T: DeserializeOwned>(
    text: &str,
    schema: &SchemaNode,
) -> Result<T, SchemaError> {
    SchemaValidator::default().validate_and_deserialize(text, schema)
}

/// Reads a schema document leniently.
///
/// # Errors
///
/// Returns `SchemaError::Parse` for malformed JSON and
/// `SchemaError::InvalidSchema` when the document cannot be interpreted.
pub fn parse_schema(text: &str) -> Result<SchemaNode, SchemaError> {
    SchemaValidator::default().parse_schema(text)
}
