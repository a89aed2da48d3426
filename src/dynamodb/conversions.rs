// ABOUTME: Canonical JSON rendering of DynamoDB items
// ABOUTME: Produces order-independent text used for checksums and logging

use aws_sdk_dynamodb::types::AttributeValue;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Map, Value};

use super::Item;

/// Render an attribute value as DynamoDB JSON (`{"S": "..."}`, `{"N": "..."}`, ...).
///
/// Set members are sorted since DynamoDB sets carry no order; binary values
/// are base64 encoded.
pub fn attribute_value_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => json!({ "S": s }),
        AttributeValue::N(n) => json!({ "N": n }),
        AttributeValue::B(b) => json!({ "B": STANDARD.encode(b.as_ref()) }),
        AttributeValue::Bool(b) => json!({ "BOOL": b }),
        AttributeValue::Null(n) => json!({ "NULL": n }),
        AttributeValue::Ss(values) => json!({ "SS": sorted(values.iter().cloned()) }),
        AttributeValue::Ns(values) => json!({ "NS": sorted(values.iter().cloned()) }),
        AttributeValue::Bs(values) => {
            json!({ "BS": sorted(values.iter().map(|b| STANDARD.encode(b.as_ref()))) })
        }
        AttributeValue::L(values) => {
            json!({ "L": values.iter().map(attribute_value_to_json).collect::<Vec<_>>() })
        }
        AttributeValue::M(map) => json!({ "M": item_to_json(map) }),
        _ => json!({ "UNKNOWN": format!("{:?}", value) }),
    }
}

/// Render a whole item; attribute names come out sorted.
pub fn item_to_json(item: &Item) -> Value {
    let mut object = Map::new();
    for (name, value) in item {
        object.insert(name.clone(), attribute_value_to_json(value));
    }
    Value::Object(object)
}

/// Stable single-line text form of an item.
pub fn canonical_item(item: &Item) -> String {
    item_to_json(item).to_string()
}

fn sorted(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut values: Vec<String> = values.collect();
    values.sort();
    values
}
