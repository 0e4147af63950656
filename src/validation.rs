//! Schema validation for provider payloads.
//!
//! Each accepted payload shape is a serde struct in the provider's `schemas`
//! module: the field list, provider keys, types and required/optional status
//! live there and nowhere else. Unknown keys are dropped, `Option` fields that
//! are missing become `None`, and a batch either validates completely or not
//! at all.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub fn validate<T: DeserializeOwned>(data: &Value) -> Result<T, ValidationError> {
    T::deserialize(data).map_err(|e| ValidationError(e.to_string()))
}

/// Validates every record or none of them.
pub fn validate_batch<T: DeserializeOwned>(data: &[Value]) -> Result<Vec<T>, ValidationError> {
    data.iter()
        .enumerate()
        .map(|(index, record)| {
            T::deserialize(record).map_err(|e| ValidationError(format!("record {}: {}", index, e)))
        })
        .collect()
}

/// Flattens a validated request into string parameters. Nested objects and
/// arrays are JSON-encoded, `null` values are skipped.
pub fn to_query_params<T: Serialize>(value: &T) -> Result<Vec<(String, String)>, ValidationError> {
    let value = serde_json::to_value(value).map_err(|e| ValidationError(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(ValidationError("request parameters must be an object".to_string()));
    };

    let mut params = Vec::with_capacity(map.len());
    for (key, value) in map {
        let encoded = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
        };
        params.push((key, encoded));
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Record {
        id: String,
        created_time: String,
        #[serde(default)]
        note: Option<String>,
    }

    #[test]
    fn batch_with_one_invalid_record_returns_nothing() {
        let data = vec![
            json!({"id": "1", "created_time": "t"}),
            json!({"id": "2", "created_time": "t"}),
            json!({"id": "3"}),
            json!({"id": "4", "created_time": "t"}),
            json!({"id": "5", "created_time": "t"}),
        ];

        let err = validate_batch::<Record>(&data).unwrap_err();
        assert!(err.0.starts_with("record 2"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let record: Record = validate(&json!({
            "id": "1",
            "created_time": "t",
            "surprise": {"nested": true}
        }))
        .unwrap();

        assert_eq!(record.note, None);
        assert_eq!(record.id, "1");
    }

    #[test]
    fn wrong_type_fails() {
        assert!(validate::<Record>(&json!({"id": 1, "created_time": "t"})).is_err());
    }

    #[test]
    fn query_params_encode_nested_values_as_json() {
        let params = to_query_params(&json!({
            "name": "spring",
            "budget": 10,
            "targeting": {"geo": ["US"]},
            "skipped": null
        }))
        .unwrap();

        assert!(params.contains(&("name".to_string(), "spring".to_string())));
        assert!(params.contains(&("budget".to_string(), "10".to_string())));
        assert!(params.contains(&("targeting".to_string(), r#"{"geo":["US"]}"#.to_string())));
        assert_eq!(params.len(), 3);
    }
}
