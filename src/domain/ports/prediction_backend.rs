//! Port trait for the prediction scoring backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::{FeatureContribution, FeatureSet};

/// Raw scoring output from the backend, before the gateway attaches risk
/// categorization and call metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendScore {
    /// Probability in [0, 1].
    pub risk_score: f64,
    /// Top contributing features (explanation payload).
    pub top_features: Vec<FeatureContribution>,
    /// Model version that produced the score.
    pub model_version: String,
}

/// Terminal failure of a backend call as seen by the gateway.
///
/// Transient faults are absorbed inside the adapter's retry loop; by the time
/// an error crosses this port it is final for the current request.
#[derive(Debug, Error)]
pub enum BackendFailure {
    /// The backend rejected the request outright (malformed request,
    /// unknown model). Never retried.
    #[error("Backend rejected request: {0}")]
    Rejected(String),

    /// The backend could not be reached or kept failing transiently until
    /// retries were exhausted. Carries the last failure cause.
    #[error("Backend unavailable after {attempts} attempts: {cause}")]
    Unavailable { attempts: u32, cause: String },
}

/// Port trait for the remote prediction endpoint.
///
/// Implementations own transport, authentication, and retry policy. The
/// gateway depends only on this trait, so tests inject counting or failing
/// stand-ins without any network.
///
/// Implementations must be `Send + Sync`; methods take `&self` so one client
/// serves concurrent callers.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    /// Score a validated feature set against the named model.
    ///
    /// Each underlying attempt is independently observable via logs, but a
    /// single call resolves to exactly one terminal result.
    async fn score(
        &self,
        model_name: &str,
        features: &FeatureSet,
    ) -> Result<BackendScore, BackendFailure>;

    /// Check whether the backend is reachable and serving.
    ///
    /// Returns `Ok(false)` for permanent rejections (bad credentials, wrong
    /// endpoint) and `Err` for transient unreachability.
    async fn health_check(&self) -> anyhow::Result<bool>;
}
