//! Port trait for the feature schema collaborator.

use async_trait::async_trait;

use crate::domain::models::FeatureSchema;

/// Port trait for the external schema collaborator.
///
/// Given a model name, supplies the declared field constraints the gateway
/// validates against before any backend call. Returning `None` means the
/// model is unknown and the request is rejected without touching cache or
/// backend.
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    async fn schema_for(&self, model_name: &str) -> Option<FeatureSchema>;
}
