use crate::error::SchemaError;
use crate::json_pointer;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The `type` keyword values this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl SchemaType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }

    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let ty = match keyword {
            "object" => Self::Object,
            "array" => Self::Array,
            "string" => Self::String,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "null" => Self::Null,
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic tag carried by the `format` keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Format {
    Email,
    Uuid,
    DateTime,
    /// Any other format name; kept verbatim and never asserted.
    Other(String),
}

impl Format {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Email => "email",
            Self::Uuid => "uuid",
            Self::DateTime => "date-time",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Format {
    fn from(name: &str) -> Self {
        match name {
            "email" => Self::Email,
            "uuid" => Self::Uuid,
            "date-time" => Self::DateTime,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Format {
    fn from(name: String) -> Self {
        match name.as_str() {
            "email" | "uuid" | "date-time" => Self::from(name.as_str()),
            _ => Self::Other(name),
        }
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        match format {
            Format::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One layer of schema constraints.
///
/// The variant is the node's `type`; only the keywords meaningful for that
/// type exist on it, so an object node can never carry `items` and an array
/// node always has one. `Any` is a node without a `type` keyword.
///
/// Note that `PartialEq` compares `properties` as a map; compare encoded
/// output when declaration order matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    Any,
    Null,
    Boolean,
    Number,
    Integer,
    String {
        format: Option<Format>,
    },
    Array {
        items: Box<SchemaNode>,
    },
    Object {
        title: Option<String>,
        properties: IndexMap<String, SchemaNode>,
        required: Vec<String>,
    },
}

impl SchemaNode {
    #[must_use]
    pub const fn string() -> Self {
        Self::String { format: None }
    }

    #[must_use]
    pub const fn string_with_format(format: Format) -> Self {
        Self::String {
            format: Some(format),
        }
    }

    #[must_use]
    pub fn array(items: Self) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }

    /// Object node with properties in iteration order and the given `required` names.
    #[must_use]
    pub fn object<K, R>(
        properties: impl IntoIterator<Item = (K, Self)>,
        required: impl IntoIterator<Item = R>,
    ) -> Self
    where
        K: Into<String>,
        R: Into<String>,
    {
        Self::Object {
            title: None,
            properties: properties
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    /// The node's `type`, or `None` for `Any`.
    #[must_use]
    pub const fn schema_type(&self) -> Option<SchemaType> {
        match self {
            Self::Any => None,
            Self::Null => Some(SchemaType::Null),
            Self::Boolean => Some(SchemaType::Boolean),
            Self::Number => Some(SchemaType::Number),
            Self::Integer => Some(SchemaType::Integer),
            Self::String { .. } => Some(SchemaType::String),
            Self::Array { .. } => Some(SchemaType::Array),
            Self::Object { .. } => Some(SchemaType::Object),
        }
    }

    /// Decodes a schema document leniently.
    ///
    /// Unknown keywords are ignored, keywords that do not apply to the node's
    /// `type` are dropped without being looked at, and an array without
    /// `items` accepts any element.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidSchema` if a node is not an object, a
    /// keyword that applies to the node has the wrong shape, or `type` names
    /// an unknown or array-valued type.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        decode_node(value, "")
    }

    /// Encodes the node as a JSON Schema document.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map: Map<String, Value> = Map::new();
        match self {
            Self::Any => {}
            Self::String { format } => {
                map.insert("type".to_string(), Value::from("string"));
                if let Some(format) = format {
                    map.insert("format".to_string(), Value::from(format.as_str()));
                }
            }
            Self::Array { items } => {
                map.insert("type".to_string(), Value::from("array"));
                map.insert("items".to_string(), items.to_value());
            }
            Self::Object {
                title,
                properties,
                required,
            } => {
                if let Some(title) = title {
                    map.insert("title".to_string(), Value::from(title.as_str()));
                }
                map.insert("type".to_string(), Value::from("object"));
                if !properties.is_empty() {
                    let encoded: Map<String, Value> = properties
                        .iter()
                        .map(|(name, node)| (name.clone(), node.to_value()))
                        .collect();
                    map.insert("properties".to_string(), Value::Object(encoded));
                }
                if !required.is_empty() {
                    map.insert(
                        "required".to_string(),
                        Value::Array(required.iter().map(|r| Value::from(r.as_str())).collect()),
                    );
                }
            }
            Self::Null | Self::Boolean | Self::Number | Self::Integer => {
                if let Some(ty) = self.schema_type() {
                    map.insert("type".to_string(), Value::from(ty.as_str()));
                }
            }
        }
        Value::Object(map)
    }
}

impl Serialize for SchemaNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

/// Pretty-printed JSON Schema document.
impl fmt::Display for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: String = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for SchemaNode {
    type Err = SchemaError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(text).map_err(SchemaError::Parse)?;
        Self::from_value(&value)
    }
}

/// Schema document as written, before it is narrowed to a `SchemaNode`.
///
/// Only the keywords this crate interprets are modeled; serde ignores the
/// rest. Keyword values stay raw until the node's `type` says they apply.
#[derive(Debug, Deserialize)]
struct RawSchema {
    #[serde(default)]
    title: Option<Value>,

    #[serde(default)]
    r#type: Option<Value>,

    #[serde(default)]
    properties: Option<Value>,

    #[serde(default)]
    items: Option<Value>,

    #[serde(default)]
    required: Option<Value>,

    #[serde(default)]
    format: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawType {
    Single(String),
    Union(#[expect(dead_code, reason = "deserialized to detect union types; contents unused")] Vec<String>),
}

fn decode_node(value: &Value, path: &str) -> Result<SchemaNode, SchemaError> {
    let raw: RawSchema = decode(value, path)?;
    raw.to_node(path)
}

fn decode<T: DeserializeOwned>(value: &Value, path: &str) -> Result<T, SchemaError> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let inner: String = err.path().to_string();
        if inner == "." {
            SchemaError::InvalidSchema(format!("at {}: {}", at(path), err.inner()))
        } else {
            SchemaError::InvalidSchema(format!("at {} ({inner}): {}", at(path), err.inner()))
        }
    })
}

fn decode_keyword<T: DeserializeOwned>(
    value: Option<&Value>,
    path: &str,
    keyword: &str,
) -> Result<Option<T>, SchemaError> {
    value
        .map(|value| decode(value, &json_pointer::child(path, keyword)))
        .transpose()
}

impl RawSchema {
    fn to_node(&self, path: &str) -> Result<SchemaNode, SchemaError> {
        let schema_type: Option<SchemaType> =
            match decode_keyword::<RawType>(self.r#type.as_ref(), path, "type")? {
                None => None,
                Some(RawType::Single(name)) => {
                    Some(SchemaType::from_keyword(&name).ok_or_else(|| {
                        SchemaError::InvalidSchema(format!(
                            "at {}: unknown type \"{name}\"",
                            at(path)
                        ))
                    })?)
                }
                Some(RawType::Union(_)) => {
                    return Err(SchemaError::InvalidSchema(format!(
                        "at {}: array-valued \"type\" is not supported",
                        at(path)
                    )));
                }
            };

        let node = match schema_type {
            None => SchemaNode::Any,
            Some(SchemaType::Null) => SchemaNode::Null,
            Some(SchemaType::Boolean) => SchemaNode::Boolean,
            Some(SchemaType::Number) => SchemaNode::Number,
            Some(SchemaType::Integer) => SchemaNode::Integer,
            Some(SchemaType::String) => SchemaNode::String {
                format: decode_keyword::<String>(self.format.as_ref(), path, "format")?
                    .map(Format::from),
            },
            Some(SchemaType::Array) => {
                let items: SchemaNode = match &self.items {
                    Some(items) => decode_node(items, &json_pointer::child(path, "items"))?,
                    None => SchemaNode::Any,
                };
                SchemaNode::array(items)
            }
            Some(SchemaType::Object) => {
                let properties_path: String = json_pointer::child(path, "properties");
                let raw_properties: IndexMap<String, Value> =
                    decode_keyword(self.properties.as_ref(), path, "properties")?
                        .unwrap_or_default();
                let mut properties: IndexMap<String, SchemaNode> =
                    IndexMap::with_capacity(raw_properties.len());
                for (name, raw) in raw_properties {
                    let node: SchemaNode =
                        decode_node(&raw, &json_pointer::child(&properties_path, &name))?;
                    properties.insert(name, node);
                }
                SchemaNode::Object {
                    title: decode_keyword(self.title.as_ref(), path, "title")?,
                    properties,
                    required: decode_keyword(self.required.as_ref(), path, "required")?
                        .unwrap_or_default(),
                }
            }
        };
        Ok(node)
    }
}

fn at(path: &str) -> &str {
    if path.is_empty() { "/" } else { path }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_nested_object_schema() {
        let schema: SchemaNode = json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "email": { "type": "string", "format": "email" },
                "roles": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["name"]
        })
        .to_string()
        .parse()
        .expect("valid schema");

        let expected = SchemaNode::object(
            [
                ("name", SchemaNode::string()),
                ("email", SchemaNode::string_with_format(Format::Email)),
                ("roles", SchemaNode::array(SchemaNode::string())),
            ],
            ["name"],
        );
        assert_eq!(schema, expected);
    }

    #[test]
    fn array_without_items_accepts_anything() {
        let schema = SchemaNode::from_value(&json!({ "type": "array" })).expect("valid schema");
        assert_eq!(schema, SchemaNode::array(SchemaNode::Any));
    }

    #[test]
    fn misspelled_item_keyword_is_ignored() {
        let schema = SchemaNode::from_value(&json!({
            "type": "array",
            "item": { "type": "string" }
        }))
        .expect("valid schema");
        assert_eq!(schema, SchemaNode::array(SchemaNode::Any));
    }

    #[test]
    fn items_on_object_is_dropped() {
        let schema = SchemaNode::from_value(&json!({
            "type": "object",
            "items": { "type": "string" }
        }))
        .expect("valid schema");
        let empty = SchemaNode::object(Vec::<(String, SchemaNode)>::new(), Vec::<String>::new());
        assert_eq!(schema, empty);
    }

    #[test]
    fn malformed_keywords_that_do_not_apply_are_dropped() {
        let schema = SchemaNode::from_value(&json!({
            "type": "number",
            "properties": { "x": "bad" },
            "items": 7,
            "required": "x",
            "format": false
        }))
        .expect("valid schema");
        assert_eq!(schema, SchemaNode::Number);
    }

    #[test]
    fn malformed_required_on_object_is_rejected_with_path() {
        let err = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": { "tags": { "type": "array", "items": { "type": "object", "required": "x" } } }
        }))
        .unwrap_err();
        let message: String = err.to_string();
        assert!(matches!(err, SchemaError::InvalidSchema(_)));
        assert!(message.contains("/properties/tags/items/required"), "{message}");
    }

    #[test]
    fn missing_type_is_any() {
        let schema = SchemaNode::from_value(&json!({ "description": "anything" })).expect("valid");
        assert_eq!(schema, SchemaNode::Any);
        assert_eq!(schema.schema_type(), None);
    }

    #[test]
    fn unknown_type_is_rejected_with_path() {
        let err = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": { "when": { "type": "datetime" } }
        }))
        .unwrap_err();
        let message: String = err.to_string();
        assert!(message.contains("/properties/when"), "{message}");
        assert!(message.contains("datetime"), "{message}");
    }

    #[test]
    fn union_type_is_rejected() {
        let err = SchemaNode::from_value(&json!({ "type": ["string", "null"] })).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema(_)));
    }

    #[test]
    fn non_object_node_is_rejected() {
        let err = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": { "name": "string" }
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema(_)));
    }

    #[test]
    fn malformed_schema_text_is_parse_error() {
        let err = "{\"type\": ".parse::<SchemaNode>().unwrap_err();
        assert!(matches!(err, SchemaError::Parse(_)));
    }

    #[test]
    fn encodes_keywords_in_canonical_order() {
        let schema = SchemaNode::Object {
            title: Some("Account".to_string()),
            properties: [
                ("Email".to_string(), SchemaNode::string_with_format(Format::Email)),
                ("Active".to_string(), SchemaNode::Boolean),
            ]
            .into_iter()
            .collect(),
            required: vec!["Email".to_string()],
        };
        let encoded: String = serde_json::to_string(&schema).expect("serializable");
        assert_eq!(
            encoded,
            r#"{"title":"Account","type":"object","properties":{"Email":{"type":"string","format":"email"},"Active":{"type":"boolean"}},"required":["Email"]}"#
        );
    }

    #[test]
    fn encodes_any_as_empty_object() {
        assert_eq!(SchemaNode::Any.to_value(), json!({}));
        assert_eq!(
            SchemaNode::array(SchemaNode::Any).to_value(),
            json!({ "type": "array", "items": {} })
        );
    }

    #[test]
    fn empty_object_omits_properties_and_required() {
        let schema =
            SchemaNode::object(Vec::<(String, SchemaNode)>::new(), Vec::<String>::new());
        assert_eq!(schema.to_value(), json!({ "type": "object" }));
    }

    #[test]
    fn encoded_schema_decodes_to_same_node() {
        let schema = SchemaNode::object(
            [
                ("id", SchemaNode::string_with_format(Format::Uuid)),
                ("count", SchemaNode::Integer),
                ("price", SchemaNode::Number),
                ("note", SchemaNode::Null),
            ],
            ["id", "count"],
        );
        let decoded: SchemaNode = schema.to_string().parse().expect("round trip");
        assert_eq!(decoded, schema);
    }

    #[test]
    fn format_names_map_to_known_variants() {
        assert_eq!(Format::from("email"), Format::Email);
        assert_eq!(Format::from("uuid".to_string()), Format::Uuid);
        assert_eq!(Format::from("date-time"), Format::DateTime);
        assert_eq!(Format::from("ipv4"), Format::Other("ipv4".to_string()));
        assert_eq!(String::from(Format::DateTime), "date-time");
    }
}
