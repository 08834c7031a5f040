//! Per-field configuration kept beside the schema declaration.
//!
//! Renames, default values and custom deserializers are not part of a
//! field's [`SchemaType`](crate::schema::SchemaType); they live in a
//! [`MetadataStore`] keyed by model name and declared field key, and get
//! merged into the compiled plan once per model.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::model::ModelInstance;
use crate::value::Value;

/// Produces a fresh default value on every call.
pub type DefaultSupplier = Arc<dyn Fn() -> Value + Send + Sync>;

/// Custom per-field transform. Receives the raw field value and the
/// partially decoded instance built so far.
pub type DeserializerFn = Arc<dyn Fn(&Value, &ModelInstance) -> Value + Send + Sync>;

/// Fallback for a missing field: a fixed literal or a supplier invoked
/// once per triggering decode.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Supplier(DefaultSupplier),
}

impl DefaultValue {
    pub fn literal(value: impl Into<Value>) -> Self {
        DefaultValue::Literal(value.into())
    }

    pub fn supplier(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        DefaultValue::Supplier(Arc::new(f))
    }

    pub fn resolve(&self) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Supplier(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultValue::Supplier(_) => f.write_str("Supplier(..)"),
        }
    }
}

/// Everything configured for one declared field.
#[derive(Clone)]
pub struct FieldMetadata {
    /// Declared field key this record belongs to.
    pub key: String,
    /// Input key to read instead of `key`.
    pub rename: Option<String>,
    pub default_value: Option<DefaultValue>,
    pub deserializer: Option<DeserializerFn>,
}

impl FieldMetadata {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            rename: None,
            default_value: None,
            deserializer: None,
        }
    }
}

impl fmt::Debug for FieldMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMetadata")
            .field("key", &self.key)
            .field("rename", &self.rename)
            .field("default_value", &self.default_value)
            .field("deserializer", &self.deserializer.is_some())
            .finish()
    }
}

/// Field configuration records grouped by model name.
///
/// Mutations create the per-field record on first touch, so rename and
/// default set separately for the same field land in one record.
#[derive(Debug, Default)]
pub struct MetadataStore {
    records: RwLock<HashMap<String, Vec<FieldMetadata>>>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rename(&self, model: &str, field: &str, name: impl Into<String>) {
        let name = name.into();
        self.mutate(model, field, move |meta| meta.rename = Some(name));
    }

    pub fn set_default(&self, model: &str, field: &str, value: DefaultValue) {
        self.mutate(model, field, move |meta| meta.default_value = Some(value));
    }

    pub fn set_deserializer(&self, model: &str, field: &str, deserializer: DeserializerFn) {
        self.mutate(model, field, move |meta| {
            meta.deserializer = Some(deserializer)
        });
    }

    pub fn get(&self, model: &str, field: &str) -> Option<FieldMetadata> {
        let records = self.records.read().unwrap();
        records
            .get(model)
            .and_then(|fields| fields.iter().find(|meta| meta.key == field))
            .cloned()
    }

    pub fn get_all(&self, model: &str) -> Vec<FieldMetadata> {
        let records = self.records.read().unwrap();
        records.get(model).cloned().unwrap_or_default()
    }

    fn mutate(&self, model: &str, field: &str, mutation: impl FnOnce(&mut FieldMetadata)) {
        let mut records = self.records.write().unwrap();
        let fields = records.entry(model.to_string()).or_default();
        let idx = match fields.iter().position(|meta| meta.key == field) {
            Some(idx) => idx,
            None => {
                fields.push(FieldMetadata::new(field));
                fields.len() - 1
            }
        };
        mutation(&mut fields[idx]);
    }
}
