//! Typed record descriptions and the schemas generated from them.

use crate::schema::{Format, SchemaNode};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A named structural type: ordered fields, each with an expected JSON kind
/// and optional `required`/`format` annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    pub name: String,

    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl RecordType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field, keeping declaration order.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,

    pub kind: FieldKind,

    #[serde(default)]
    pub required: bool,

    /// Applies to string fields and to the string items of array fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            format: None,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }
}

/// The JSON kind a field holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    Any,
    Array(Box<FieldKind>),
    Record(RecordType),
}

impl FieldKind {
    #[must_use]
    pub fn array(items: Self) -> Self {
        Self::Array(Box::new(items))
    }
}

/// A Rust type that knows its own `RecordType`.
///
/// Usually implemented with `#[derive(Record)]`; the serde impls must agree
/// with the record type's field names.
pub trait Record: Serialize + DeserializeOwned {
    fn record_type() -> RecordType;
}

/// Builds the object schema for `record`.
///
/// The result is titled with the record name and has one property per field
/// in declaration order; required fields are listed in declaration order. A
/// field declared twice keeps its first position and its last kind.
#[must_use]
pub fn generate(record: &RecordType) -> SchemaNode {
    let mut properties: IndexMap<String, SchemaNode> = IndexMap::with_capacity(record.fields.len());
    let mut required: Vec<String> = Vec::new();
    for field in &record.fields {
        properties.insert(
            field.name.clone(),
            kind_node(&field.kind, field.format.as_ref()),
        );
        if field.required && !required.contains(&field.name) {
            required.push(field.name.clone());
        }
    }
    trace!(
        record = %record.name,
        properties = properties.len(),
        required = required.len(),
        "generated record schema"
    );
    SchemaNode::Object {
        title: Some(record.name.clone()),
        properties,
        required,
    }
}

fn kind_node(kind: &FieldKind, format: Option<&Format>) -> SchemaNode {
    match kind {
        FieldKind::String => SchemaNode::String {
            format: format.cloned(),
        },
        FieldKind::Integer => SchemaNode::Integer,
        FieldKind::Number => SchemaNode::Number,
        FieldKind::Boolean => SchemaNode::Boolean,
        FieldKind::Any => SchemaNode::Any,
        FieldKind::Array(items) => SchemaNode::array(kind_node(items, format)),
        FieldKind::Record(record) => generate(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account() -> RecordType {
        RecordType::new("Account")
            .field(
                FieldDescriptor::new("Email", FieldKind::String)
                    .required()
                    .format(Format::Email),
            )
            .field(FieldDescriptor::new("Active", FieldKind::Boolean))
            .field(FieldDescriptor::new("CreatedDate", FieldKind::String).format(Format::DateTime))
            .field(FieldDescriptor::new("Roles", FieldKind::array(FieldKind::String)).required())
    }

    #[test]
    fn generates_object_schema_in_declaration_order() {
        let schema: SchemaNode = generate(&account());
        assert_eq!(
            schema.to_value(),
            json!({
                "title": "Account",
                "type": "object",
                "properties": {
                    "Email": { "type": "string", "format": "email" },
                    "Active": { "type": "boolean" },
                    "CreatedDate": { "type": "string", "format": "date-time" },
                    "Roles": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["Email", "Roles"]
            })
        );
        let SchemaNode::Object { properties, .. } = schema else {
            panic!("expected object schema");
        };
        let names: Vec<&str> = properties.keys().map(String::as_str).collect();
        assert_eq!(names, ["Email", "Active", "CreatedDate", "Roles"]);
    }

    #[test]
    fn generation_is_deterministic() {
        let first: String = generate(&account()).to_string();
        let second: String = generate(&account()).to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn format_reaches_string_array_items() {
        let record = RecordType::new("Mailing").field(
            FieldDescriptor::new("Recipients", FieldKind::array(FieldKind::String))
                .format(Format::Email),
        );
        assert_eq!(
            generate(&record).to_value()["properties"]["Recipients"],
            json!({ "type": "array", "items": { "type": "string", "format": "email" } })
        );
    }

    #[test]
    fn format_on_non_string_is_ignored() {
        let record = RecordType::new("Counter")
            .field(FieldDescriptor::new("Count", FieldKind::Integer).format(Format::Uuid));
        assert_eq!(
            generate(&record).to_value()["properties"]["Count"],
            json!({ "type": "integer" })
        );
    }

    #[test]
    fn nested_records_become_nested_objects() {
        let item = RecordType::new("CartItem")
            .field(FieldDescriptor::new("SKU", FieldKind::String).format(Format::Uuid).required())
            .field(FieldDescriptor::new("Price", FieldKind::Number));
        let customer = RecordType::new("Customer")
            .field(FieldDescriptor::new("Name", FieldKind::String).required())
            .field(FieldDescriptor::new(
                "EShopCartList",
                FieldKind::array(FieldKind::Record(item)),
            ));
        let value = generate(&customer).to_value();
        assert_eq!(
            value["properties"]["EShopCartList"]["items"],
            json!({
                "title": "CartItem",
                "type": "object",
                "properties": {
                    "SKU": { "type": "string", "format": "uuid" },
                    "Price": { "type": "number" }
                },
                "required": ["SKU"]
            })
        );
    }

    #[test]
    fn duplicate_field_is_listed_once() {
        let record = RecordType::new("Dup")
            .field(FieldDescriptor::new("a", FieldKind::String).required())
            .field(FieldDescriptor::new("b", FieldKind::Boolean))
            .field(FieldDescriptor::new("a", FieldKind::Integer).required());
        assert_eq!(
            generate(&record).to_value(),
            json!({
                "title": "Dup",
                "type": "object",
                "properties": { "a": { "type": "integer" }, "b": { "type": "boolean" } },
                "required": ["a"]
            })
        );
    }

    #[test]
    fn record_type_reads_from_json_descriptor() {
        let record: RecordType = serde_json::from_value(json!({
            "name": "Movie",
            "fields": [
                { "name": "Name", "kind": "string", "required": true },
                { "name": "ReleaseDate", "kind": "string", "format": "date-time" },
                { "name": "Genres", "kind": { "array": "string" } },
                { "name": "Rating", "kind": "number" }
            ]
        }))
        .expect("valid descriptor");
        assert_eq!(
            record,
            RecordType::new("Movie")
                .field(FieldDescriptor::new("Name", FieldKind::String).required())
                .field(
                    FieldDescriptor::new("ReleaseDate", FieldKind::String)
                        .format(Format::DateTime)
                )
                .field(FieldDescriptor::new(
                    "Genres",
                    FieldKind::array(FieldKind::String)
                ))
                .field(FieldDescriptor::new("Rating", FieldKind::Number))
        );
    }
}
