//! Key Naming Module
//!
//! Canonical cache keys built from semantic inputs. Call sites that describe
//! the same logical data get the same key, whatever order they built their
//! criteria in.

use std::fmt::Display;

use serde_json::Value;

/// `entity:{name}:all`
pub fn entity_key(entity: &str) -> String {
    format!("entity:{entity}:all")
}

/// `entity:{name}:filtered:{criteria}` with criteria keys sorted.
pub fn entity_filtered_key(entity: &str, criteria: &Value) -> String {
    format!("entity:{entity}:filtered:{}", canonical_criteria(criteria))
}

/// `entity:{name}:id:{id}`
pub fn entity_by_id_key(entity: &str, id: impl Display) -> String {
    format!("entity:{entity}:id:{id}")
}

/// `entity:{name}:field:{field}:{value}`
pub fn entity_by_field_key(entity: &str, field: &str, value: impl Display) -> String {
    format!("entity:{entity}:field:{field}:{value}")
}

/// `relationship:{parent}:{child}:{parent_id}`
pub fn relationship_key(parent: &str, child: &str, parent_id: impl Display) -> String {
    format!("relationship:{parent}:{child}:{parent_id}")
}

/// `aggregation:{name}:{kind}:{criteria}` with criteria keys sorted.
pub fn aggregation_key(entity: &str, aggregation: &str, criteria: &Value) -> String {
    format!(
        "aggregation:{entity}:{aggregation}:{}",
        canonical_criteria(criteria)
    )
}

// == Canonical Serialization ==
/// Compact JSON with object keys sorted at every depth. Array order is kept.
pub fn canonical_criteria(criteria: &Value) -> String {
    let mut out = String::new();
    write_canonical(criteria, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut fields: Vec<(&String, &Value)> = map.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, field)) in fields.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Display on a JSON string value yields the quoted, escaped form
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(field, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => {
            out.push_str(&scalar.to_string());
        }
    }
}
