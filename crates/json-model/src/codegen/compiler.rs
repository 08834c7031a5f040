//! Compile-once planning.
//!
//! A model declaration plus its field metadata flattens into a
//! [`CompiledModel`]: the merged field list and a reusable decode closure.
//! Compilation happens once per model per registry; every decode after
//! that replays the prebuilt steps.

use std::fmt;
use std::sync::Arc;

use crate::error::SchemaError;
use crate::metadata::{DefaultValue, DeserializerFn, MetadataStore};
use crate::model::{FieldInit, ModelInstance, ModelRegistry, ModelSchema};
use crate::schema::SchemaType;
use crate::value::Value;

use super::decoder::field_step;

/// One schema-backed field with its metadata merged in.
#[derive(Clone)]
pub struct CompiledField {
    pub key: String,
    pub schema: SchemaType,
    pub rename: Option<String>,
    pub default_value: Option<DefaultValue>,
    pub deserializer: Option<DeserializerFn>,
}

impl CompiledField {
    /// Input key the decoder reads: the rename when configured, the
    /// declared key otherwise.
    pub fn lookup_key(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.key)
    }
}

impl fmt::Debug for CompiledField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledField")
            .field("key", &self.key)
            .field("schema", &self.schema)
            .field("rename", &self.rename)
            .field("default_value", &self.default_value)
            .field("deserializer", &self.deserializer.is_some())
            .finish()
    }
}

/// Reusable decode closure produced by the compiler.
pub type DecodeFn =
    Arc<dyn Fn(&ModelRegistry, &Value) -> Result<ModelInstance, SchemaError> + Send + Sync>;

/// A model's decode plan: merged fields plus the closure that runs them.
pub struct CompiledModel {
    pub name: String,
    pub fields: Vec<CompiledField>,
    pub decode: DecodeFn,
}

impl fmt::Debug for CompiledModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledModel")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

pub struct ModelCompiler;

impl ModelCompiler {
    /// Flattens a declaration and its metadata into a decode plan.
    ///
    /// Compilation itself never fails. Structural problems, like a
    /// default on a reference field, surface from
    /// [`validate_model`](crate::schema::validate_model) ahead of time or
    /// as decode-time errors.
    pub fn compile(schema: &ModelSchema, metadata: &MetadataStore) -> CompiledModel {
        let name = schema.name().to_string();
        let mut fields = Vec::new();
        let mut template: Vec<(String, Value)> = Vec::with_capacity(schema.fields().len());
        for decl in schema.fields() {
            match &decl.init {
                FieldInit::Plain(value) => template.push((decl.key.clone(), value.clone())),
                FieldInit::Schema(node) => {
                    template.push((decl.key.clone(), Value::Null));
                    let (rename, default_value, deserializer) =
                        match metadata.get(&name, &decl.key) {
                            Some(meta) => (meta.rename, meta.default_value, meta.deserializer),
                            None => (None, None, None),
                        };
                    fields.push(CompiledField {
                        key: decl.key.clone(),
                        schema: node.clone(),
                        rename,
                        default_value,
                        deserializer,
                    });
                }
            }
        }
        let steps: Vec<_> = fields.iter().map(|field| field_step(&name, field)).collect();
        let decode: DecodeFn = {
            let name = name.clone();
            Arc::new(move |registry, raw| {
                let mut instance = ModelInstance::with_fields(name.clone(), template.clone());
                for step in &steps {
                    step(registry, raw, &mut instance)?;
                }
                Ok(instance)
            })
        };
        CompiledModel {
            name,
            fields,
            decode,
        }
    }
}
