//! Strict checking of schema documents for `deny_invalid_unknown_json_schema`
//! mode.
//!
//! Walks the raw schema (as `serde_json::Value`) and collects every keyword
//! that is malformed, unsupported, unknown, or has no effect on the node it
//! appears in, without stopping at the first one.

use crate::error::{SchemaLintError, SchemaLintIssue, SchemaLintIssueKind};
use crate::json_pointer;
use crate::schema::SchemaType;
use serde_json::{Map, Value};

/// Keywords that are accepted but carry no constraint.
const ANNOTATION_KEYWORDS: &[&str] = &[
    "title",
    "description",
    "$schema",
    "$comment",
    "default",
    "examples",
];

/// Real JSON Schema keywords outside the supported subset.
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "$id",
    "$ref",
    "$defs",
    "$anchor",
    "definitions",
    "enum",
    "const",
    "minLength",
    "maxLength",
    "pattern",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
    "oneOf",
    "anyOf",
    "allOf",
    "not",
    "if",
    "then",
    "else",
    "additionalProperties",
    "patternProperties",
    "propertyNames",
    "minProperties",
    "maxProperties",
    "dependentRequired",
    "dependentSchemas",
    "unevaluatedProperties",
    "minItems",
    "maxItems",
    "uniqueItems",
    "contains",
    "prefixItems",
    "additionalItems",
    "unevaluatedItems",
    "readOnly",
    "writeOnly",
    "deprecated",
];

/// Checks `value` against the supported schema subset. Returns `Ok(())` if no
/// issues were found, or every issue found in document order.
///
/// # Errors
///
/// Returns `SchemaLintError` listing all issues.
pub fn lint_schema(value: &Value) -> Result<(), SchemaLintError> {
    let mut issues: Vec<SchemaLintIssue> = Vec::new();
    lint_node(value, "", &mut issues);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(SchemaLintError { issues })
    }
}

fn push_issue(issues: &mut Vec<SchemaLintIssue>, path: &str, kind: SchemaLintIssueKind) {
    issues.push(SchemaLintIssue {
        path: path.to_string(),
        kind,
    });
}

fn lint_node(value: &Value, path: &str, issues: &mut Vec<SchemaLintIssue>) {
    let Some(obj) = value.as_object() else {
        push_issue(issues, path, SchemaLintIssueKind::NodeNotObject);
        return;
    };

    let schema_type: Option<SchemaType> = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(SchemaType::from_keyword);

    if schema_type == Some(SchemaType::Array) && !obj.contains_key("items") {
        push_issue(issues, path, SchemaLintIssueKind::ArrayMissingItems);
    }

    for (key, val) in obj {
        let key_path: String = json_pointer::child(path, key);
        match key.as_str() {
            "type" => lint_type(val, &key_path, issues),
            "items" => {
                if !val.is_object() {
                    push_issue(issues, &key_path, SchemaLintIssueKind::InvalidItemsFormat);
                    continue;
                }
                if schema_type != Some(SchemaType::Array) {
                    push_issue(issues, &key_path, SchemaLintIssueKind::ItemsOnNonArray);
                }
                lint_node(val, &key_path, issues);
            }
            "properties" => {
                let Some(properties) = val.as_object() else {
                    push_issue(
                        issues,
                        &key_path,
                        SchemaLintIssueKind::InvalidPropertiesFormat,
                    );
                    continue;
                };
                if schema_type != Some(SchemaType::Object) {
                    push_issue(issues, &key_path, SchemaLintIssueKind::PropertiesOnNonObject);
                }
                for (name, property_schema) in properties {
                    lint_node(property_schema, &json_pointer::child(&key_path, name), issues);
                }
            }
            "required" => lint_required(val, obj, schema_type, &key_path, issues),
            "format" => {
                if !val.is_string() {
                    push_issue(issues, &key_path, SchemaLintIssueKind::InvalidFormatValue);
                } else if schema_type != Some(SchemaType::String) {
                    push_issue(issues, &key_path, SchemaLintIssueKind::FormatOnNonString);
                }
            }
            k if ANNOTATION_KEYWORDS.contains(&k) => {}
            k if UNSUPPORTED_KEYWORDS.contains(&k) => {
                push_issue(
                    issues,
                    &key_path,
                    SchemaLintIssueKind::UnsupportedKeyword(key.clone()),
                );
            }
            _ => push_issue(
                issues,
                &key_path,
                SchemaLintIssueKind::UnknownKeyword(key.clone()),
            ),
        }
    }
}

fn lint_type(value: &Value, path: &str, issues: &mut Vec<SchemaLintIssue>) {
    match value {
        Value::String(s) => {
            if SchemaType::from_keyword(s).is_none() {
                push_issue(
                    issues,
                    path,
                    SchemaLintIssueKind::UnsupportedType(s.clone()),
                );
            }
        }
        Value::Array(_) => {
            push_issue(issues, path, SchemaLintIssueKind::TypeArrayNotSupported);
        }
        _ => push_issue(issues, path, SchemaLintIssueKind::InvalidTypeValue),
    }
}

fn lint_required(
    value: &Value,
    parent: &Map<String, Value>,
    schema_type: Option<SchemaType>,
    path: &str,
    issues: &mut Vec<SchemaLintIssue>,
) {
    let names: Option<Vec<&str>> = value
        .as_array()
        .and_then(|arr| arr.iter().map(Value::as_str).collect());
    let Some(names) = names else {
        push_issue(issues, path, SchemaLintIssueKind::InvalidRequiredFormat);
        return;
    };
    if schema_type != Some(SchemaType::Object) {
        push_issue(issues, path, SchemaLintIssueKind::RequiredOnNonObject);
        return;
    }
    let properties: Option<&Map<String, Value>> =
        parent.get("properties").and_then(Value::as_object);
    for name in names {
        if !properties.is_some_and(|p| p.contains_key(name)) {
            push_issue(
                issues,
                path,
                SchemaLintIssueKind::RequiredPropertyNotInProperties(name.to_string()),
            );
        }
    }
}
