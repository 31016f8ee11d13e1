//! Riskgate - Prediction-Serving Resilience Layer
//!
//! Riskgate sits between dashboard/API callers and a clinical risk prediction
//! backend (sepsis, ICU mortality). It deduplicates, caches, retries, and
//! invalidates inference requests so that the backend is called at most once
//! per cache window for identical inputs.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Feature sets, predictions, schemas, ports
//! - **Service Layer** (`services`): Gateway orchestration, key derivation, validation
//! - **Infrastructure Layer** (`infrastructure`): HTTP backend client, retry, config
//! - **Adapters** (`adapters`): In-memory cache store, schema registry
//!
//! # Example
//!
//! ```ignore
//! use riskgate::services::PredictionGateway;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Wire up cache store, backend client, and schema registry,
//!     // then serve predict() calls from the API layer.
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{FieldViolation, PredictionError, PredictionResult};
pub use domain::models::{
    CacheConfig, CacheEntry, CacheKey, Config, FeatureSchema, FeatureSet, FeatureValue,
    FieldSpec, LoggingConfig, Prediction, PredictionOutcome, RetryConfig, RiskLevel,
};
pub use domain::ports::{CacheStore, PredictionBackend, SchemaProvider};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{derive_key, PredictionGateway, SchemaValidator};
