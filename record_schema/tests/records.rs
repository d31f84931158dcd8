use record_schema::{
    FieldDescriptor, FieldKind, Format, Record, RecordType, SchemaError, SchemaNode,
    SchemaValidator, ValidationErrorKind, ValidatorSettings, generate,
    validate_and_deserialize,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "PascalCase")]
struct Account {
    #[record(required, format = "email")]
    email: String,
    active: bool,
    #[record(format = "date-time")]
    created_date: String,
    #[record(required)]
    roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "PascalCase")]
struct Product {
    #[record(required)]
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiry: Option<String>,
    price: f64,
    sizes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
struct CartItem {
    #[serde(rename = "SKU")]
    #[record(required)]
    sku: Uuid,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Price")]
    price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "PascalCase")]
struct Customer {
    #[record(required)]
    id: Uuid,
    #[record(required)]
    name: String,
    #[serde(rename = "EShopCartList")]
    cart: Vec<CartItem>,
    #[serde(skip)]
    session_notes: Vec<String>,
}

fn account() -> Account {
    Account {
        email: "james@example.com".to_string(),
        active: true,
        created_date: "2013-01-20T00:00:00Z".to_string(),
        roles: vec!["User".to_string(), "Admin".to_string()],
    }
}

#[test]
fn derived_record_type_follows_serde_names() {
    assert_eq!(
        Account::record_type(),
        RecordType::new("Account")
            .field(
                FieldDescriptor::new("Email", FieldKind::String)
                    .required()
                    .format(Format::Email)
            )
            .field(FieldDescriptor::new("Active", FieldKind::Boolean))
            .field(FieldDescriptor::new("CreatedDate", FieldKind::String).format(Format::DateTime))
            .field(FieldDescriptor::new("Roles", FieldKind::array(FieldKind::String)).required())
    );
}

#[test]
fn derived_nested_records_and_uuid_fields() {
    let schema: SchemaNode = generate(&Customer::record_type());
    assert_eq!(
        schema.to_value(),
        json!({
            "title": "Customer",
            "type": "object",
            "properties": {
                "Id": { "type": "string", "format": "uuid" },
                "Name": { "type": "string" },
                "EShopCartList": {
                    "type": "array",
                    "items": {
                        "title": "CartItem",
                        "type": "object",
                        "properties": {
                            "SKU": { "type": "string", "format": "uuid" },
                            "Description": { "type": "string" },
                            "Price": { "type": "number" }
                        },
                        "required": ["SKU"]
                    }
                }
            },
            "required": ["Id", "Name"]
        })
    );
}

#[test]
fn round_trip_through_generated_schema() {
    let original: Account = account();
    let text: String = serde_json::to_string(&original).expect("serializable");
    let schema: SchemaNode = generate(&Account::record_type());
    let restored: Account = validate_and_deserialize(&text, &schema).expect("valid account");
    assert_eq!(restored, original);
}

#[test]
fn round_trip_with_nested_records() {
    let customer = Customer {
        id: Uuid::new_v4(),
        name: "Vasilis".to_string(),
        cart: vec![
            CartItem {
                sku: Uuid::new_v4(),
                description: "Mixer".to_string(),
                price: 67.89,
            },
            CartItem {
                sku: Uuid::new_v4(),
                description: "Cooker".to_string(),
                price: 450.78,
            },
        ],
        session_notes: Vec::new(),
    };
    let text: String = serde_json::to_string(&customer).expect("serializable");
    let strict = SchemaValidator::new(ValidatorSettings {
        assert_formats: true,
        ..ValidatorSettings::default()
    });
    let restored: Customer = strict.validate_record(&text).expect("valid customer");
    assert_eq!(restored, customer);
}

#[test]
fn absent_optional_member_round_trips() {
    let product = Product {
        name: "Apple".to_string(),
        expiry: None,
        price: 3.99,
        sizes: vec!["Small".to_string()],
    };
    let text: String = serde_json::to_string(&product).expect("serializable");
    assert!(!text.contains("Expiry"), "{text}");
    let restored: Product = SchemaValidator::default()
        .validate_record(&text)
        .expect("valid product");
    assert_eq!(restored, product);

    let dated = Product {
        expiry: Some("2026-01-01".to_string()),
        ..product
    };
    let text: String = serde_json::to_string(&dated).expect("serializable");
    let restored: Product = SchemaValidator::default()
        .validate_record(&text)
        .expect("valid product");
    assert_eq!(restored, dated);
}

#[test]
fn optional_member_written_as_null_is_rejected() {
    let err = SchemaValidator::default()
        .validate_record::<Product>(r#"{"Name":"Apple","Expiry":null,"Price":3.99,"Sizes":[]}"#)
        .unwrap_err();
    assert_eq!(err.to_string(), "/Expiry: expected string, found null");
}

#[test]
fn missing_required_field_is_rejected() {
    let err = SchemaValidator::default()
        .validate_record::<Account>(r#"{"Active":true,"CreatedDate":"x","Roles":[]}"#)
        .unwrap_err();
    let SchemaError::Validation(validation) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(
        validation.kind,
        ValidationErrorKind::MissingRequired {
            property: "Email".to_string()
        }
    );
}

#[test]
fn email_format_is_asserted_only_when_enabled() {
    let text = r#"{"Email":"james","Active":true,"CreatedDate":"2013-01-20T00:00:00Z","Roles":["User"]}"#;
    assert!(SchemaValidator::default().validate_record::<Account>(text).is_ok());

    let strict = SchemaValidator::new(ValidatorSettings {
        assert_formats: true,
        ..ValidatorSettings::default()
    });
    let err = strict.validate_record::<Account>(text).unwrap_err();
    assert_eq!(err.to_string(), "/Email: string is not a valid \"email\"");
}

#[test]
fn generated_schema_survives_encoding() {
    let schema: SchemaNode = generate(&Customer::record_type());
    let decoded: SchemaNode = schema.to_string().parse().expect("schema text");
    assert_eq!(decoded.to_string(), schema.to_string());
}
