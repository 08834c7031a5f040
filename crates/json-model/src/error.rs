//! Structured decode errors.

use thiserror::Error;

/// What went wrong for a single field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorReason {
    #[error("not optional but value is missing")]
    RequiredFieldMissing,
    #[error("default value cannot be \"null\"")]
    NullDefault,
    #[error("default value has incorrect type, got \"{actual}\" and expected \"{expected}\"")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("default value is not an instance of \"{expected}\"")]
    InstanceMismatch { expected: &'static str },
    #[error("default value ({value}) does not match any value of provided enum")]
    EnumMismatch { value: String },
    #[error("default value is not allowed on reference fields")]
    DefaultOnReference,
    #[error("expected array but got \"{actual}\"")]
    ExpectedArray { actual: &'static str },
    #[error("referenced model \"{model}\" is not registered")]
    ModelNotFound { model: String },
}

/// Error raised while decoding a record into a model instance.
///
/// Always names the model and the declared field the failure belongs to.
/// For array fields the position stays on the outer field no matter how
/// deep the nesting goes; for reference fields a nested failure keeps the
/// nested model's own position.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{model}::{field} -> {reason}")]
pub struct SchemaError {
    pub model: String,
    pub field: String,
    pub reason: ErrorReason,
}

impl SchemaError {
    pub fn new(model: impl Into<String>, field: impl Into<String>, reason: ErrorReason) -> Self {
        Self {
            model: model.into(),
            field: field.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_position_and_reason() {
        let err = SchemaError::new("User", "id", ErrorReason::RequiredFieldMissing);
        assert_eq!(err.to_string(), "User::id -> not optional but value is missing");
    }

    #[test]
    fn formats_type_mismatch_detail() {
        let err = SchemaError::new(
            "User",
            "age",
            ErrorReason::TypeMismatch {
                expected: "number",
                actual: "string",
            },
        );
        assert_eq!(
            err.to_string(),
            "User::age -> default value has incorrect type, got \"string\" and expected \"number\""
        );
    }

    #[test]
    fn formats_enum_mismatch_with_rendered_value() {
        let err = SchemaError::new(
            "Task",
            "state",
            ErrorReason::EnumMismatch {
                value: "\"unknown\"".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Task::state -> default value (\"unknown\") does not match any value of provided enum"
        );
    }

    #[test]
    fn errors_are_comparable() {
        let a = SchemaError::new("M", "f", ErrorReason::DefaultOnReference);
        let b = SchemaError::new("M", "f", ErrorReason::DefaultOnReference);
        assert_eq!(a, b);
    }
}
