//! Domain models for prediction serving.

pub mod cache;
pub mod config;
pub mod features;
pub mod prediction;
pub mod schema;

pub use cache::{CacheEntry, CacheKey};
pub use config::{BackendConfig, CacheConfig, Config, LoggingConfig, RetryConfig};
pub use features::{FeatureSet, FeatureValue};
pub use prediction::{
    recommendation_for, FeatureContribution, Prediction, PredictionOutcome, RiskLevel,
};
pub use schema::{FeatureSchema, FieldSchema, FieldSpec};
