use std::error;
use std::fmt;

use crate::schema::SchemaType;

/// Error type for schema parsing, validation, and validated deserialization.
#[derive(Debug)]
pub enum SchemaError {
    /// The input text is not well-formed JSON.
    Parse(serde_json::Error),

    /// The document parsed but does not satisfy the schema.
    Validation(ValidationError),

    /// The document satisfied the schema but could not be turned into the target type.
    Deserialize { path: String, message: String },

    /// The schema document could not be interpreted (e.g. non-object node, array-valued `type`).
    InvalidSchema(String),

    /// Strict schema checking found one or more issues.
    Lint(SchemaLintError),

    /// A value could not be converted to or from JSON.
    Json(serde_json::Error),

    /// I/O error (e.g., reading a schema file).
    Io(std::io::Error),
}

impl error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Parse(e) | Self::Json(e) => Some(e),
            Self::Validation(e) => Some(e),
            Self::Lint(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Deserialize { .. } | Self::InvalidSchema(_) => None,
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(json_error) => write!(f, "malformed JSON: {json_error}"),
            Self::Validation(validation_error) => fmt::Display::fmt(validation_error, f),
            Self::Deserialize { path, message } => {
                write!(f, "cannot deserialize value at {path}: {message}")
            }
            Self::InvalidSchema(message) => write!(f, "invalid schema: {message}"),
            Self::Lint(lint_error) => fmt::Display::fmt(lint_error, f),
            Self::Json(json_error) => fmt::Display::fmt(json_error, f),
            Self::Io(io_error) => fmt::Display::fmt(io_error, f),
        }
    }
}

impl From<ValidationError> for SchemaError {
    fn from(validation_error: ValidationError) -> Self {
        Self::Validation(validation_error)
    }
}

impl From<SchemaLintError> for SchemaError {
    fn from(lint_error: SchemaLintError) -> Self {
        Self::Lint(lint_error)
    }
}

impl From<std::io::Error> for SchemaError {
    fn from(io_error: std::io::Error) -> Self {
        Self::Io(io_error)
    }
}

/// The first constraint a document violated, found depth-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// JSON Pointer (RFC 6901) to the offending value; empty for the document root.
    pub path: String,
    pub kind: ValidationErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The value's JSON kind differs from the schema's `type`.
    TypeMismatch {
        expected: SchemaType,
        found: &'static str,
    },
    /// An object lacks a property listed in `required`.
    MissingRequired { property: String },
    /// A string does not match its asserted `format`.
    FormatMismatch { format: String },
}

impl error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location: &str = if self.path.is_empty() { "/" } else { &self.path };
        match &self.kind {
            ValidationErrorKind::TypeMismatch { expected, found } => {
                write!(f, "{location}: expected {expected}, found {found}")
            }
            ValidationErrorKind::MissingRequired { property } => {
                write!(f, "{location}: missing required property \"{property}\"")
            }
            ValidationErrorKind::FormatMismatch { format } => {
                write!(f, "{location}: string is not a valid \"{format}\"")
            }
        }
    }
}

/// All issues found while checking a schema document against the supported subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaLintError {
    pub issues: Vec<SchemaLintIssue>,
}

impl error::Error for SchemaLintError {}

impl fmt::Display for SchemaLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema has {} issue(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  {issue}")?;
        }
        Ok(())
    }
}

/// A single schema issue, located by JSON Pointer into the schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaLintIssue {
    pub path: String,
    pub kind: SchemaLintIssueKind,
}

impl fmt::Display for SchemaLintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location: &str = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{location}: {}", self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLintIssueKind {
    NodeNotObject,
    InvalidTypeValue,
    UnsupportedType(String),
    TypeArrayNotSupported,
    ArrayMissingItems,
    ItemsOnNonArray,
    InvalidItemsFormat,
    PropertiesOnNonObject,
    InvalidPropertiesFormat,
    RequiredOnNonObject,
    InvalidRequiredFormat,
    RequiredPropertyNotInProperties(String),
    InvalidFormatValue,
    FormatOnNonString,
    UnsupportedKeyword(String),
    UnknownKeyword(String),
}

impl fmt::Display for SchemaLintIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotObject => write!(f, "schema node must be an object"),
            Self::InvalidTypeValue => write!(f, "\"type\" must be a string"),
            Self::UnsupportedType(ty) => write!(f, "unsupported type \"{ty}\""),
            Self::TypeArrayNotSupported => write!(f, "array-valued \"type\" is not supported"),
            Self::ArrayMissingItems => write!(f, "array schema has no \"items\""),
            Self::ItemsOnNonArray => write!(f, "\"items\" on a non-array schema has no effect"),
            Self::InvalidItemsFormat => write!(f, "\"items\" must be a schema object"),
            Self::PropertiesOnNonObject => {
                write!(f, "\"properties\" on a non-object schema has no effect")
            }
            Self::InvalidPropertiesFormat => write!(f, "\"properties\" must be an object"),
            Self::RequiredOnNonObject => {
                write!(f, "\"required\" on a non-object schema has no effect")
            }
            Self::InvalidRequiredFormat => write!(f, "\"required\" must be an array of strings"),
            Self::RequiredPropertyNotInProperties(name) => {
                write!(f, "required property \"{name}\" is not declared in \"properties\"")
            }
            Self::InvalidFormatValue => write!(f, "\"format\" must be a string"),
            Self::FormatOnNonString => write!(f, "\"format\" on a non-string schema has no effect"),
            Self::UnsupportedKeyword(key) => write!(f, "unsupported keyword \"{key}\""),
            Self::UnknownKeyword(key) => write!(f, "unknown keyword \"{key}\""),
        }
    }
}
