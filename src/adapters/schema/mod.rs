//! Schema provider adapters.

pub mod static_registry;

pub use static_registry::StaticSchemaRegistry;
