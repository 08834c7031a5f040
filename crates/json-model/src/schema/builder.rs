use std::any::Any;

use crate::value::Value;

use super::schema::{InstanceCheck, Primitive, SchemaKind, SchemaType};

/// Schema node factory. Use the global [`S`] instance:
///
/// ```
/// use json_model::{S, SchemaKind};
///
/// let tags = S.opt(S.arr(S.str()));
/// assert!(tags.is_optional());
/// assert!(matches!(tags.kind, SchemaKind::Array(_)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaBuilder;

/// Global schema builder.
pub static S: SchemaBuilder = SchemaBuilder;

impl SchemaBuilder {
    pub fn new() -> Self {
        SchemaBuilder
    }

    pub fn bool(&self) -> SchemaType {
        SchemaType::new(SchemaKind::Primitive(Primitive::Boolean))
    }

    pub fn num(&self) -> SchemaType {
        SchemaType::new(SchemaKind::Primitive(Primitive::Number))
    }

    pub fn str(&self) -> SchemaType {
        SchemaType::new(SchemaKind::Primitive(Primitive::String))
    }

    /// Closed set of admissible values. Named with a trailing underscore
    /// to dodge the keyword.
    pub fn enum_<I>(&self, values: I) -> SchemaType
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        SchemaType::new(SchemaKind::Enum(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    /// Native instance field checked against `T` when a default fills it.
    pub fn instance<T: Any>(&self) -> SchemaType {
        SchemaType::new(SchemaKind::Instance(Some(InstanceCheck::of::<T>())))
    }

    /// Native instance field with no runtime type test.
    pub fn instance_any(&self) -> SchemaType {
        SchemaType::new(SchemaKind::Instance(None))
    }

    /// Reference to another registered model, by name.
    pub fn ref_(&self, model: impl Into<String>) -> SchemaType {
        SchemaType::new(SchemaKind::Reference(model.into()))
    }

    pub fn arr(&self, element: SchemaType) -> SchemaType {
        SchemaType::new(SchemaKind::Array(Box::new(element)))
    }

    /// Marks any node optional. Equivalent to [`SchemaType::optional`].
    pub fn opt(&self, schema: SchemaType) -> SchemaType {
        schema.optional()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_constructors() {
        assert_eq!(S.bool().kind_name(), "boolean");
        assert_eq!(S.num().kind_name(), "number");
        assert_eq!(S.str().kind_name(), "string");
        assert!(!S.str().is_optional());
    }

    #[test]
    fn new_matches_the_static_builder() {
        let b = SchemaBuilder::new();
        assert_eq!(b.num().kind, S.num().kind);
        assert!(b.opt(b.bool()).is_optional());
    }

    #[test]
    fn enum_keeps_member_set() {
        let node = S.enum_(["todo", "done"]);
        match node.kind {
            SchemaKind::Enum(members) => {
                assert_eq!(members, vec![Value::from("todo"), Value::from("done")]);
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn reference_keeps_target_name() {
        let node = S.ref_("User");
        assert_eq!(node.kind, SchemaKind::Reference("User".into()));
    }

    #[test]
    fn arrays_nest() {
        let node = S.arr(S.arr(S.num()));
        let SchemaKind::Array(inner) = node.kind else {
            panic!("expected array");
        };
        let SchemaKind::Array(leaf) = inner.kind else {
            panic!("expected nested array");
        };
        assert_eq!(leaf.kind_name(), "number");
    }

    #[test]
    fn opt_marks_only_the_given_node() {
        let node = S.arr(S.opt(S.str()));
        assert!(!node.is_optional());
        let SchemaKind::Array(element) = node.kind else {
            panic!("expected array");
        };
        assert!(element.is_optional());
    }

    #[test]
    fn instance_check_presence() {
        assert!(matches!(
            S.instance::<String>().kind,
            SchemaKind::Instance(Some(_))
        ));
        assert!(matches!(S.instance_any().kind, SchemaKind::Instance(None)));
    }
}
