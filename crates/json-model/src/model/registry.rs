use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::codegen::{CompiledModel, ModelCompiler};
use crate::error::{ErrorReason, SchemaError};
use crate::metadata::MetadataStore;
use crate::value::Value;

use super::instance::ModelInstance;
use super::ModelSchema;

/// Owns model declarations, their field metadata and the lazily compiled
/// decode plans.
///
/// Reference fields resolve through the registry they are decoded with,
/// so a model graph lives inside one registry. All maps sit behind locks;
/// the registry is shared by reference across threads.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: RwLock<HashMap<String, Arc<ModelSchema>>>,
    metadata: MetadataStore,
    plans: RwLock<HashMap<String, Arc<CompiledModel>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model. Field configuration carried by the declaration
    /// is folded into the metadata store here. Redefining a name replaces
    /// the declaration and drops its cached plan.
    pub fn define(&self, schema: ModelSchema) {
        for decl in schema.fields() {
            if let Some(name) = &decl.config.rename {
                self.metadata.set_rename(schema.name(), &decl.key, name.clone());
            }
            if let Some(default) = &decl.config.default_value {
                self.metadata.set_default(schema.name(), &decl.key, default.clone());
            }
            if let Some(deserializer) = &decl.config.deserializer {
                self.metadata
                    .set_deserializer(schema.name(), &decl.key, deserializer.clone());
            }
        }
        let name = schema.name().to_string();
        self.plans.write().unwrap().remove(&name);
        self.models.write().unwrap().insert(name, Arc::new(schema));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.read().unwrap().contains_key(name)
    }

    pub fn schema(&self, name: &str) -> Option<Arc<ModelSchema>> {
        self.models.read().unwrap().get(name).cloned()
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    /// Returns the decode plan, compiling and caching it on first use.
    /// Concurrent first uses may compile twice; they collapse onto
    /// whichever plan lands in the cache first.
    pub fn plan(&self, name: &str) -> Option<Arc<CompiledModel>> {
        {
            let plans = self.plans.read().unwrap();
            if let Some(plan) = plans.get(name) {
                return Some(plan.clone());
            }
        }
        let schema = self.schema(name)?;
        let compiled = Arc::new(ModelCompiler::compile(&schema, &self.metadata));
        let mut plans = self.plans.write().unwrap();
        Some(plans.entry(name.to_string()).or_insert(compiled).clone())
    }

    /// Decodes `raw` into an instance of the named model.
    ///
    /// `raw` is usually [`Value::Obj`]; any other shape simply makes every
    /// field lookup miss, so optional and defaulted fields still resolve.
    /// An unregistered name fails with [`ErrorReason::ModelNotFound`]
    /// carrying an empty field position.
    pub fn decode(&self, name: &str, raw: &Value) -> Result<ModelInstance, SchemaError> {
        let plan = self.plan(name).ok_or_else(|| {
            SchemaError::new(
                name,
                "",
                ErrorReason::ModelNotFound {
                    model: name.to_string(),
                },
            )
        })?;
        (plan.decode)(self, raw)
    }

    pub fn decode_json(
        &self,
        name: &str,
        raw: &serde_json::Value,
    ) -> Result<ModelInstance, SchemaError> {
        self.decode(name, &Value::from(raw))
    }
}
