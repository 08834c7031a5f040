//! Helpers for common field configurations.

use std::sync::Arc;

use crate::metadata::DeserializerFn;
use crate::value::Value;

/// Deserializer that projects an array of objects onto one key.
/// Elements without the key become null, and so does a non-array input.
pub fn pick(key: impl Into<String>) -> DeserializerFn {
    let key = key.into();
    Arc::new(move |value, _| match value {
        Value::Arr(items) => Value::Arr(
            items
                .iter()
                .map(|item| item.get(&key).cloned().unwrap_or(Value::Null))
                .collect(),
        ),
        _ => Value::Null,
    })
}

/// Collapses the falsy scalars (false, 0, NaN, "") to null and leaves
/// everything else untouched.
pub fn falsy_to_null(value: Value) -> Value {
    match value {
        Value::Bool(false) => Value::Null,
        Value::Num(n) if n == 0.0 || n.is_nan() => Value::Null,
        Value::Str(s) if s.is_empty() => Value::Null,
        other => other,
    }
}
