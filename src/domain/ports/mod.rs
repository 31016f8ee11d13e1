//! Port traits: the seams between the domain and its collaborators.

pub mod cache_store;
pub mod prediction_backend;
pub mod schema_provider;

pub use cache_store::CacheStore;
pub use prediction_backend::{BackendFailure, BackendScore, PredictionBackend};
pub use schema_provider::SchemaProvider;
