//! Decode-time engine.
//!
//! Each schema-backed field compiles into one step closure. The branch on
//! rename, missing-value policy and transform shape happens here, once per
//! compile, so running a step is a lookup plus the already chosen path.

use crate::error::{ErrorReason, SchemaError};
use crate::metadata::{DefaultValue, DeserializerFn};
use crate::model::{ModelInstance, ModelRegistry};
use crate::schema::{InstanceCheck, Primitive, SchemaKind, SchemaType};
use crate::value::Value;

use super::compiler::CompiledField;

pub(crate) type FieldStep =
    Box<dyn Fn(&ModelRegistry, &Value, &mut ModelInstance) -> Result<(), SchemaError> + Send + Sync>;

/// How a missing field resolves. Defaults win over the optional flag.
enum MissingPolicy {
    Default(DefaultValue, DefaultCheck),
    Optional,
    Required,
}

/// Sanity check applied to a resolved default, picked from the field's
/// shape at compile time. Array defaults carry no check of their own;
/// the array transform validates them like any other value.
enum DefaultCheck {
    Primitive(Primitive),
    Instance(InstanceCheck),
    Enum(Vec<Value>),
    None,
}

/// What happens to a present or defaulted value before assignment. A
/// custom deserializer replaces the shape-derived transform entirely.
enum Transform {
    Deserialize(DeserializerFn),
    Array(SchemaType),
    Reference(String),
    Pass,
}

pub(crate) fn field_step(model: &str, field: &CompiledField) -> FieldStep {
    let model = model.to_string();
    let key = field.key.clone();

    // A default on a reference field is structurally disallowed. The step
    // fails unconditionally, whether or not the input carries the field.
    if field.default_value.is_some() && matches!(field.schema.kind, SchemaKind::Reference(_)) {
        return Box::new(move |_, _, _| {
            Err(SchemaError::new(
                model.as_str(),
                key.as_str(),
                ErrorReason::DefaultOnReference,
            ))
        });
    }

    let lookup = field.lookup_key().to_string();
    let missing = match &field.default_value {
        Some(default) => MissingPolicy::Default(default.clone(), default_check(&field.schema)),
        None if field.schema.optional => MissingPolicy::Optional,
        None => MissingPolicy::Required,
    };
    let transform = match &field.deserializer {
        Some(deserializer) => Transform::Deserialize(deserializer.clone()),
        None => match &field.schema.kind {
            SchemaKind::Array(element) => Transform::Array((**element).clone()),
            SchemaKind::Reference(target) => Transform::Reference(target.clone()),
            _ => Transform::Pass,
        },
    };

    Box::new(move |registry, raw, out| {
        let mut value = match raw.get(&lookup) {
            Some(v) => v.clone(),
            None => Value::Null,
        };
        if value.is_null() {
            match &missing {
                MissingPolicy::Default(default, check) => {
                    value = default.resolve();
                    check_default(&model, &key, &value, check)?;
                }
                MissingPolicy::Optional => {
                    out.set(key.clone(), Value::Null);
                    return Ok(());
                }
                MissingPolicy::Required => {
                    return Err(SchemaError::new(
                        model.as_str(),
                        key.as_str(),
                        ErrorReason::RequiredFieldMissing,
                    ));
                }
            }
        }
        let value = match &transform {
            Transform::Deserialize(deserializer) => deserializer(&value, out),
            Transform::Array(element) => decode_array(registry, &model, &key, &value, element)?,
            Transform::Reference(target) => {
                decode_reference(registry, &model, &key, target, &value)?
            }
            Transform::Pass => value,
        };
        out.set(key.clone(), value);
        Ok(())
    })
}

fn default_check(schema: &SchemaType) -> DefaultCheck {
    match &schema.kind {
        SchemaKind::Primitive(p) => DefaultCheck::Primitive(*p),
        SchemaKind::Instance(Some(check)) => DefaultCheck::Instance(*check),
        SchemaKind::Instance(None) => DefaultCheck::None,
        SchemaKind::Enum(members) => DefaultCheck::Enum(members.clone()),
        SchemaKind::Array(_) => DefaultCheck::None,
        // reference fields with defaults never reach the default path
        SchemaKind::Reference(_) => DefaultCheck::None,
    }
}

fn check_default(
    model: &str,
    field: &str,
    value: &Value,
    check: &DefaultCheck,
) -> Result<(), SchemaError> {
    if value.is_null() {
        return Err(SchemaError::new(model, field, ErrorReason::NullDefault));
    }
    match check {
        DefaultCheck::Primitive(p) if !p.matches(value) => Err(SchemaError::new(
            model,
            field,
            ErrorReason::TypeMismatch {
                expected: p.as_str(),
                actual: value.kind(),
            },
        )),
        DefaultCheck::Instance(instance_check) if !instance_check.admits(value) => {
            Err(SchemaError::new(
                model,
                field,
                ErrorReason::InstanceMismatch {
                    expected: instance_check.type_name(),
                },
            ))
        }
        DefaultCheck::Enum(members) if !members.contains(value) => Err(SchemaError::new(
            model,
            field,
            ErrorReason::EnumMismatch {
                value: value.to_string(),
            },
        )),
        _ => Ok(()),
    }
}

/// Recursive array walk. Failures at any depth keep the position of the
/// outer field that declared the array.
fn decode_array(
    registry: &ModelRegistry,
    model: &str,
    field: &str,
    value: &Value,
    element: &SchemaType,
) -> Result<Value, SchemaError> {
    let Value::Arr(items) = value else {
        return Err(SchemaError::new(
            model,
            field,
            ErrorReason::ExpectedArray {
                actual: value.kind(),
            },
        ));
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if item.is_null() && element.optional {
            out.push(Value::Null);
            continue;
        }
        match &element.kind {
            SchemaKind::Array(inner) => {
                out.push(decode_array(registry, model, field, item, inner)?)
            }
            SchemaKind::Reference(target) => {
                out.push(decode_reference(registry, model, field, target, item)?)
            }
            _ => out.push(item.clone()),
        }
    }
    Ok(Value::Arr(out))
}

/// Nested decode through the registry. The referenced plan compiles
/// lazily on first use; its own failures propagate untouched, carrying
/// the nested model's position.
fn decode_reference(
    registry: &ModelRegistry,
    model: &str,
    field: &str,
    target: &str,
    value: &Value,
) -> Result<Value, SchemaError> {
    let plan = registry.plan(target).ok_or_else(|| {
        SchemaError::new(
            model,
            field,
            ErrorReason::ModelNotFound {
                model: target.to_string(),
            },
        )
    })?;
    let instance = (plan.decode)(registry, value)?;
    Ok(Value::Model(Box::new(instance)))
}
