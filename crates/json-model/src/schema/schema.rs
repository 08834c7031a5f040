use std::any::{Any, TypeId};

use crate::value::Value;

/// Wire-level primitive kinds a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Boolean,
    Number,
    String,
}

impl Primitive {
    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Number => "number",
            Primitive::String => "string",
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        match self {
            Primitive::Boolean => matches!(value, Value::Bool(_)),
            Primitive::Number => matches!(value, Value::Num(_)),
            Primitive::String => matches!(value, Value::Str(_)),
        }
    }
}

/// Runtime type test applied to native instance defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceCheck {
    type_id: TypeId,
    type_name: &'static str,
}

impl InstanceCheck {
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn admits(&self, value: &Value) -> bool {
        match value.as_instance() {
            Some(instance) => instance.type_id() == self.type_id,
            None => false,
        }
    }
}

/// The shape a schema node declares. Exactly one per node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Primitive(Primitive),
    Enum(Vec<Value>),
    /// `None` skips the runtime type test, like declaring "any instance".
    Instance(Option<InstanceCheck>),
    Reference(String),
    Array(Box<SchemaType>),
}

/// One field's declared shape plus the orthogonal optional flag.
///
/// Optionality is not a shape of its own: any node can be marked optional
/// and keeps its kind.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaType {
    pub kind: SchemaKind,
    pub optional: bool,
}

impl SchemaType {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    /// Marks the node optional and returns it, so declarations chain.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            SchemaKind::Primitive(p) => p.as_str(),
            SchemaKind::Enum(_) => "enum",
            SchemaKind::Instance(_) => "instance",
            SchemaKind::Reference(_) => "reference",
            SchemaKind::Array(_) => "array",
        }
    }
}
