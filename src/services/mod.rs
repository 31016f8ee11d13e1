//! Service layer: gateway orchestration, key derivation, schema validation.

pub mod key_deriver;
pub mod prediction_gateway;
pub mod schema_validator;

pub use key_deriver::derive_key;
pub use prediction_gateway::PredictionGateway;
pub use schema_validator::SchemaValidator;
