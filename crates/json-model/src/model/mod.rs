//! Model declarations and the registry that owns them.
//!
//! A model is declared as an ordered list of named fields. Each field
//! starts out either as a [`SchemaType`] placeholder to be decoded from
//! input, or as a plain [`Value`] carried into every instance unchanged:
//!
//! ```
//! use json_model::{FieldConfig, ModelRegistry, ModelSchema, S};
//! use serde_json::json;
//!
//! let registry = ModelRegistry::new();
//! registry.define(
//!     ModelSchema::new("User")
//!         .field("id", S.num())
//!         .field_with("name", S.str(), FieldConfig::new().rename("login"))
//!         .plain("kind", "user"),
//! );
//!
//! let user = registry
//!     .decode_json("User", &json!({"id": 1, "login": "ada"}))
//!     .unwrap();
//! assert_eq!(user.get("name").unwrap().as_str(), Some("ada"));
//! assert_eq!(user.get("kind").unwrap().as_str(), Some("user"));
//! ```

pub mod instance;
pub mod registry;

pub use instance::ModelInstance;
pub use registry::ModelRegistry;

use std::fmt;

use crate::metadata::{DefaultValue, DeserializerFn};
use crate::schema::SchemaType;
use crate::value::Value;

/// How a declared field starts out.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInit {
    /// Placeholder resolved from input by the decode plan.
    Schema(SchemaType),
    /// Plain value copied into every instance as-is.
    Plain(Value),
}

/// One declared field of a model.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub key: String,
    pub init: FieldInit,
    pub config: FieldConfig,
}

/// Declaration-time field configuration. Folded into the registry's
/// [`MetadataStore`](crate::metadata::MetadataStore) by
/// [`ModelRegistry::define`].
#[derive(Clone, Default)]
pub struct FieldConfig {
    pub rename: Option<String>,
    pub default_value: Option<DefaultValue>,
    pub deserializer: Option<DeserializerFn>,
    pub optional: bool,
}

impl FieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the given input key instead of the declared one. The
    /// declared key is then never consulted on the input side.
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(DefaultValue::literal(value));
        self
    }

    /// Default produced by a supplier, invoked once per decode that
    /// actually needs it.
    pub fn default_with(mut self, f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default_value = Some(DefaultValue::supplier(f));
        self
    }

    pub fn deserialize_with(
        mut self,
        f: impl Fn(&Value, &ModelInstance) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.deserializer = Some(std::sync::Arc::new(f));
        self
    }

    /// Same as [`FieldConfig::deserialize_with`] but for an already
    /// shared deserializer, like the ones [`util`](crate::util) builds.
    pub fn deserializer(mut self, f: DeserializerFn) -> Self {
        self.deserializer = Some(f);
        self
    }

    /// Shorthand for marking the field's schema node optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("rename", &self.rename)
            .field("default_value", &self.default_value)
            .field("deserializer", &self.deserializer.is_some())
            .field("optional", &self.optional)
            .finish()
    }
}

/// An ordered, named field list describing one model.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    name: String,
    fields: Vec<FieldDecl>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(self, key: impl Into<String>, schema: SchemaType) -> Self {
        self.field_with(key, schema, FieldConfig::new())
    }

    pub fn field_with(
        mut self,
        key: impl Into<String>,
        schema: SchemaType,
        config: FieldConfig,
    ) -> Self {
        let schema = if config.optional {
            schema.optional()
        } else {
            schema
        };
        self.fields.push(FieldDecl {
            key: key.into(),
            init: FieldInit::Schema(schema),
            config,
        });
        self
    }

    pub fn plain(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push(FieldDecl {
            key: key.into(),
            init: FieldInit::Plain(value.into()),
            config: FieldConfig::new(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Schema-backed fields only, in declaration order.
    pub fn schema_fields(&self) -> impl Iterator<Item = (&str, &SchemaType)> {
        self.fields.iter().filter_map(|decl| match &decl.init {
            FieldInit::Schema(schema) => Some((decl.key.as_str(), schema)),
            FieldInit::Plain(_) => None,
        })
    }
}
