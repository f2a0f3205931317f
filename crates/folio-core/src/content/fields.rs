//! Typed reads from a payload, shared by the adapters.
//!
//! Each reader returns `Ok(None)` when the key is absent so `apply` can
//! leave that field untouched.

use serde_json::Value;

use crate::errors::ContentError;
use crate::model::Payload;

use super::adapter::FieldType;

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn checked<'a>(
    payload: &'a Payload,
    name: &str,
    field_type: FieldType,
) -> Result<Option<&'a Value>, ContentError> {
    match payload.get(name) {
        None => Ok(None),
        Some(value) => {
            field_type.check(name, value)?;
            Ok(Some(value))
        }
    }
}

pub(crate) fn read_text(payload: &Payload, name: &str) -> Result<Option<String>, ContentError> {
    Ok(checked(payload, name, FieldType::Text)?
        .and_then(Value::as_str)
        .map(str::to_string))
}

pub(crate) fn read_optional_text(
    payload: &Payload,
    name: &str,
) -> Result<Option<Option<String>>, ContentError> {
    Ok(checked(payload, name, FieldType::OptionalText)?.map(|v| v.as_str().map(str::to_string)))
}

pub(crate) fn read_text_list(
    payload: &Payload,
    name: &str,
) -> Result<Option<Vec<String>>, ContentError> {
    Ok(checked(payload, name, FieldType::TextList)?.map(|v| {
        v.as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }))
}

pub(crate) fn read_flag(payload: &Payload, name: &str) -> Result<Option<bool>, ContentError> {
    Ok(checked(payload, name, FieldType::Flag)?.and_then(Value::as_bool))
}

pub(crate) fn read_integer(payload: &Payload, name: &str) -> Result<Option<i64>, ContentError> {
    Ok(checked(payload, name, FieldType::Integer)?.and_then(Value::as_i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_key_reads_as_none() {
        let payload = Payload::new();
        assert_eq!(read_text(&payload, "title").unwrap(), None);
        assert_eq!(read_optional_text(&payload, "excerpt").unwrap(), None);
    }

    #[test]
    fn test_null_optional_text_reads_as_some_none() {
        let mut payload = Payload::new();
        payload.insert("excerpt".to_string(), Value::Null);
        assert_eq!(read_optional_text(&payload, "excerpt").unwrap(), Some(None));
    }

    #[test]
    fn test_mismatch_names_the_found_type() {
        let mut payload = Payload::new();
        payload.insert("tags".to_string(), json!({"a": 1}));
        let err = read_text_list(&payload, "tags").unwrap_err();
        assert_eq!(
            err,
            ContentError::FieldTypeMismatch {
                field: "tags".to_string(),
                expected: "array of strings",
                found: "object".to_string(),
            }
        );
    }
}
