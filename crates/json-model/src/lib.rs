//! Declarative model schemas with compiled decode plans.
//!
//! Models are declared as ordered field lists over a small schema algebra:
//! primitives, enums, native instances, references to other models and
//! arrays, each optionally marked optional. A [`ModelRegistry`] compiles
//! every declaration once into a plan of per-field steps and replays that
//! plan for each decode, filling missing values from defaults and
//! optionality and reporting failures as field-positioned [`SchemaError`]s.

pub mod codegen;
pub mod error;
pub mod metadata;
pub mod model;
pub mod random;
pub mod schema;
pub mod util;
pub mod value;

pub use codegen::{CompiledField, CompiledModel, DecodeFn, ModelCompiler};
pub use error::{ErrorReason, SchemaError};
pub use metadata::{DefaultSupplier, DefaultValue, DeserializerFn, FieldMetadata, MetadataStore};
pub use model::{FieldConfig, FieldDecl, FieldInit, ModelInstance, ModelRegistry, ModelSchema};
pub use random::Random;
pub use schema::{
    validate_model, InstanceCheck, Primitive, SchemaBuilder, SchemaKind, SchemaType, S,
};
pub use util::{falsy_to_null, pick};
pub use value::{Instance, Value};
