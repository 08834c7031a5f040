//! Compile-once, decode-many machinery.

pub mod compiler;
pub mod decoder;

pub use compiler::{CompiledField, CompiledModel, DecodeFn, ModelCompiler};
