//! HTTP client for the prediction scoring service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::debug;

use super::errors::BackendApiError;
use super::retry::RetryPolicy;
use super::types::{HealthResponse, ScoreRequest, ScoreResponse};
use crate::domain::models::{BackendConfig, FeatureSet, RetryConfig};
use crate::domain::ports::{BackendFailure, BackendScore, PredictionBackend};

/// Configuration for the scoring HTTP client
#[derive(Debug, Clone)]
pub struct ScoringClientConfig {
    /// Base URL of the scoring service
    pub base_url: String,
    /// Optional bearer token
    pub api_key: Option<String>,
    /// Per-attempt request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum retry attempts after the initial call
    pub max_retries: u32,
    /// Initial backoff delay in milliseconds
    pub initial_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds
    pub max_backoff_ms: u64,
}

impl ScoringClientConfig {
    pub fn from_config(backend: &BackendConfig, retry: &RetryConfig) -> Self {
        Self {
            base_url: backend.base_url.clone(),
            api_key: backend.api_key.clone(),
            timeout_secs: backend.timeout_secs,
            max_retries: retry.max_retries,
            initial_backoff_ms: retry.initial_backoff_ms,
            max_backoff_ms: retry.max_backoff_ms,
        }
    }
}

/// HTTP client for the prediction scoring service.
///
/// Features:
/// - Connection pooling and reuse (via `reqwest::Client`)
/// - Exponential backoff retry for transient errors
/// - Error classification (transient vs permanent)
/// - Per-attempt timeout bounding total call time
pub struct HttpPredictionBackend {
    /// Reusable HTTP client with connection pooling
    http_client: ReqwestClient,
    base_url: String,
    api_key: Option<String>,
    retry_policy: RetryPolicy,
}

impl HttpPredictionBackend {
    /// Create a client with custom configuration.
    pub fn new(config: ScoringClientConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url,
            api_key: config.api_key,
            retry_policy: RetryPolicy::new(
                config.max_retries,
                config.initial_backoff_ms,
                config.max_backoff_ms,
            ),
        })
    }

    /// Send one scoring attempt and classify the response.
    async fn send_score_request(
        &self,
        request: &ScoreRequest,
    ) -> Result<ScoreResponse, BackendApiError> {
        let mut builder = self
            .http_client
            .post(format!("{}/v1/predictions/score", self.base_url))
            .header("content-type", "application/json");
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.json(request).send().await.map_err(|err| {
            if err.is_timeout() {
                BackendApiError::Timeout
            } else {
                BackendApiError::NetworkError(err)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(BackendApiError::from_status(status, body));
        }

        let score: ScoreResponse = response
            .json()
            .await
            .map_err(BackendApiError::NetworkError)?;

        debug!(
            model = request.model,
            risk_score = score.risk_score,
            "scoring response received"
        );
        Ok(score)
    }
}

#[async_trait]
impl PredictionBackend for HttpPredictionBackend {
    async fn score(
        &self,
        model_name: &str,
        features: &FeatureSet,
    ) -> Result<BackendScore, BackendFailure> {
        let request = ScoreRequest {
            model: model_name.to_string(),
            features: features.clone(),
        };

        let result = self
            .retry_policy
            .execute(|| self.send_score_request(&request))
            .await;

        match result {
            Ok(response) => Ok(BackendScore {
                risk_score: response.risk_score.clamp(0.0, 1.0),
                top_features: response.top_features,
                model_version: response.model_version,
            }),
            // Transient failure surviving the retry loop means retries are exhausted.
            Err(err) if err.is_transient() => Err(BackendFailure::Unavailable {
                attempts: self.retry_policy.max_attempts(),
                cause: err.to_string(),
            }),
            Err(err) => Err(BackendFailure::Rejected(err.to_string())),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        let mut builder = self.http_client.get(format!("{}/health", self.base_url));
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to reach scoring service health endpoint")?;

        let status = response.status();
        if status.is_success() {
            let health: HealthResponse = response
                .json()
                .await
                .context("Failed to parse health response")?;
            return Ok(health.status == "ok" || health.status == "healthy");
        }

        // Permanent rejections mean misconfiguration, not transient outage.
        let err = BackendApiError::from_status(status, String::new());
        if err.is_permanent() {
            Ok(false)
        } else {
            Err(anyhow::anyhow!(err))
        }
    }
}
