//! Console walkthrough: build a customer and cart dynamically, rebuild a list
//! of key/value cases, then generate a schema for the cart and read the
//! customer back through validated deserialization.

use chrono::{DateTime, Utc};
use record_schema::{
    ArrayBuilder, ObjectBuilder, Record, SchemaError, SchemaNode, SchemaValidator,
    ValidatorSettings, generate,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Record)]
#[serde(rename_all = "PascalCase")]
struct CartItem {
    #[serde(rename = "SKU")]
    #[record(required)]
    sku: Uuid,
    #[record(required)]
    description: String,
    price: f64,
}

#[derive(Debug, Serialize, Deserialize, Record)]
#[serde(rename_all = "PascalCase")]
struct Customer {
    #[record(required)]
    id: Uuid,
    #[record(required)]
    name: String,
    #[serde(rename = "EShopVisitDate")]
    #[record(format = "date-time")]
    visit_date: String,
    #[serde(rename = "EShopCartList")]
    cart: Vec<CartItem>,
}

fn cart_item(description: &str, price: f64) -> CartItem {
    CartItem {
        sku: Uuid::new_v4(),
        description: description.to_string(),
        price,
    }
}

fn customer_cart_items() -> Result<Value, SchemaError> {
    let mixer: Value = ObjectBuilder::new()
        .insert("SKU", Uuid::new_v4())?
        .insert("Description", "Mixer")?
        .insert("Price", 67.89)?
        .build();
    let cooker: Value = ObjectBuilder::new()
        .insert("SKU", Uuid::new_v4())?
        .insert("Description", "Cooker")?
        .insert("Price", 450.78)?
        .build();

    Ok(ArrayBuilder::new()
        .push_value(mixer)
        .extend_from([
            cart_item("Washing Machine", 350.50),
            cart_item("Toaster", 45.60),
        ])?
        .push_value(cooker)
        .build())
}

fn customer() -> Result<Value, SchemaError> {
    let visit: DateTime<Utc> = Utc::now();
    Ok(ObjectBuilder::new()
        .insert("Id", Uuid::new_v4())?
        .insert("Name", "Vasilis")?
        .insert("EShopVisitDate", visit.to_rfc3339())?
        .insert_value("EShopCartList", customer_cart_items()?)
        .build())
}

fn key_value_cases() -> Result<Value, SchemaError> {
    let documents: [&str; 3] = [
        r#"{ "Key": "Id", "KeyType": "string", "Value": "1234" }"#,
        r#"{ "Key": "Description", "KeyType": "string", "Value": "Washing Machine" }"#,
        r#"{ "Key": "Price", "KeyType": "decimal", "Value": 250 }"#,
    ];
    let mut cases = ArrayBuilder::new();
    for document in documents {
        let members: Map<String, Value> =
            serde_json::from_str(document).map_err(SchemaError::Parse)?;
        let case = ObjectBuilder::from_map(members);
        let key: Value = case.get("Key").cloned().unwrap_or(Value::Null);
        cases = cases.push_value(case.insert_value("MyKey", key).build());
    }
    Ok(cases.build())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let customer: Value = customer()?;
    println!("{customer}");
    println!();
    println!("{}", key_value_cases()?);
    println!();

    let schema: SchemaNode = generate(&Customer::record_type());
    println!("{schema}");
    println!();

    let validator = SchemaValidator::new(ValidatorSettings {
        assert_formats: true,
        ..ValidatorSettings::default()
    });
    println!("valid: {}", validator.validate(&customer, &schema));

    let typed: Customer = validator.validate_record(&customer.to_string())?;
    println!(
        "{} has {} item(s) in the cart, total {:.2}",
        typed.name,
        typed.cart.len(),
        typed.cart.iter().map(|item| item.price).sum::<f64>()
    );
    Ok(())
}
