//! Dynamic values flowing in and out of the decode engine.

pub mod instance;
pub mod value;

pub use instance::Instance;
pub use value::Value;
