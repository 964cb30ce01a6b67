//! Field checks shared by the resource definitions.
//!
//! Every check reads from a [`Payload`] and either yields a typed value or a
//! [`ValidationError`] naming the field. Nothing here touches a store.

use serde_json::Value;

use super::error::ValidationError;
use super::payload::Payload;

/// A string field that must be present and non-empty.
///
/// Whitespace-only strings count as empty.
pub fn required_string(payload: &Payload, field: &'static str) -> Result<String, ValidationError> {
    match payload.get(field) {
        None | Some(Value::Null) => Err(ValidationError::Missing(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ValidationError::Missing(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::InvalidType {
            field,
            expected: "string",
        }),
    }
}

/// An optional string field. Empty strings are treated as absent.
pub fn optional_string(
    payload: &Payload,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::InvalidType {
            field,
            expected: "string",
        }),
    }
}

/// An optional boolean field.
pub fn optional_bool(payload: &Payload, field: &'static str) -> Result<Option<bool>, ValidationError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ValidationError::InvalidType {
            field,
            expected: "boolean",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_string() {
        let payload = Payload::new().with("content", "hello").with("blank", "  ");
        assert_eq!(required_string(&payload, "content").unwrap(), "hello");
        assert_eq!(
            required_string(&payload, "blank"),
            Err(ValidationError::Missing("blank"))
        );
        assert_eq!(
            required_string(&payload, "absent"),
            Err(ValidationError::Missing("absent"))
        );
    }

    #[test]
    fn test_required_string_wrong_type() {
        let payload = Payload::new().with("content", 42);
        assert_eq!(
            required_string(&payload, "content"),
            Err(ValidationError::InvalidType {
                field: "content",
                expected: "string"
            })
        );
    }

    #[test]
    fn test_optional_fields() {
        let payload = Payload::new()
            .with("important", true)
            .with("number", "")
            .with("bad", "yes");
        assert_eq!(optional_bool(&payload, "important"), Ok(Some(true)));
        assert_eq!(optional_bool(&payload, "missing"), Ok(None));
        assert!(optional_bool(&payload, "bad").is_err());
        assert_eq!(optional_string(&payload, "number"), Ok(None));
    }
}
