//! Conversions between JSON documents and record field mappings.

use cocoql_core::{Fields, JsonValue, Value};
use serde_json::{Map, Number};

/// Converts a JSON value to a record value.
///
/// Arrays become lists; objects are kept whole as opaque JSON payloads.
pub fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::List(items.into_iter().map(from_json).collect()),
        object @ serde_json::Value::Object(_) => Value::Json(JsonValue::new(object.to_string())),
    }
}

/// Converts a record value to JSON. Non-finite floats become null.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f).map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::List(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Json(payload) => {
            serde_json::from_str(payload.as_str()).unwrap_or(serde_json::Value::Null)
        }
    }
}

pub fn fields_from_object(object: Map<String, serde_json::Value>) -> Fields {
    object.into_iter().map(|(k, v)| (k, from_json(v))).collect()
}

pub fn fields_to_object(fields: &Fields) -> Map<String, serde_json::Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), to_json(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(from_json(json!(3)), Value::Int(3));
        assert_eq!(from_json(json!(2.5)), Value::Float(2.5));
        assert_eq!(from_json(json!("a")), Value::String("a".into()));
        assert_eq!(from_json(json!(null)), Value::Null);
        assert_eq!(to_json(&Value::Float(f64::NAN)), json!(null));
    }

    #[test]
    fn test_polygons_become_lists() {
        let value = from_json(json!([[1.0, 2.0, 3.0, 4.0]]));
        let outer = value.as_list().unwrap();
        assert_eq!(outer.len(), 1);
        assert_eq!(outer[0].as_list().unwrap().len(), 4);
        assert_eq!(to_json(&value), json!([[1.0, 2.0, 3.0, 4.0]]));
    }

    #[test]
    fn test_objects_stay_opaque() {
        let rle = json!({"counts": [1, 2, 3], "size": [10, 20]});
        let value = from_json(rle.clone());
        assert!(value.as_json().is_some());
        assert_eq!(to_json(&value), rle);
    }

    #[test]
    fn test_object_fields() {
        let object = json!({"id": 1, "name": "person"});
        let fields = fields_from_object(object.as_object().unwrap().clone());
        assert_eq!(fields.get("name"), Some(&Value::from("person")));
        assert_eq!(serde_json::Value::Object(fields_to_object(&fields)), object);
    }
}
