//! Schema nodes, their builder, and the structural checker.

pub mod builder;
pub mod schema;
pub mod validate;

pub use builder::{SchemaBuilder, S};
pub use schema::{InstanceCheck, Primitive, SchemaKind, SchemaType};
pub use validate::validate_model;
