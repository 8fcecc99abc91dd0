//! Helpers for loosely typed JSON members.

use serde_json::Value;

/// JSON truthiness: `false`, `null`, `0`, `""`, `[]` and `{}` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Renders a scalar member as text. Containers and `null` yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Truthiness of `object.member.field`, treating a non-object `member` as empty.
pub fn nested_truthy(object: &Value, member: &str, field: &str) -> bool {
    object
        .get(member)
        .filter(|v| v.is_object())
        .and_then(|v| v.get(field))
        .is_some_and(is_truthy)
}
