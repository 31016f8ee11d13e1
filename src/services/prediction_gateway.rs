//! Prediction gateway: validate, deduplicate, cache, and serve predictions.
//!
//! The gateway is the single entry point UI/API layers call. One `predict`
//! resolves to exactly one outcome: a cache hit, a fresh backend score, or an
//! error. Transient backend faults never reach callers; they are absorbed by
//! the backend adapter's retry loop.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::errors::{PredictionError, PredictionResult};
use crate::domain::models::{
    recommendation_for, CacheKey, FeatureSet, Prediction, PredictionOutcome, RiskLevel,
};
use crate::domain::ports::{BackendFailure, CacheStore, PredictionBackend, SchemaProvider};
use crate::services::key_deriver::derive_key;
use crate::services::schema_validator::SchemaValidator;

/// Orchestrates schema validation, key derivation, cache lookup, backend
/// scoring, and cache write-back.
///
/// Collaborators are injected so tests run against fresh in-memory instances;
/// there is no module-level state.
pub struct PredictionGateway {
    cache: Arc<dyn CacheStore>,
    backend: Arc<dyn PredictionBackend>,
    schemas: Arc<dyn SchemaProvider>,
    ttl: Duration,
    /// Per-key guards collapsing concurrent identical requests into one
    /// backend call. Guards are pruned once no request holds them.
    in_flight: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
}

impl PredictionGateway {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        backend: Arc<dyn PredictionBackend>,
        schemas: Arc<dyn SchemaProvider>,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            backend,
            schemas,
            ttl,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Serve one prediction request.
    ///
    /// Steps:
    /// 1. Validate `features` against the model's schema. Violations return
    ///    `Validation` without touching cache or backend.
    /// 2. Derive the cache key.
    /// 3. Cache lookup; a live entry is returned with `cached = true` and no
    ///    backend call.
    /// 4. On a miss, score via the backend. Failure surfaces as `Upstream`
    ///    and never writes the cache.
    /// 5. On success, write the entry with the configured TTL and return with
    ///    `cached = false`.
    ///
    /// Cache store failures are logged and treated as misses; the request
    /// still resolves via the backend.
    pub async fn predict(
        &self,
        model_name: &str,
        features: &FeatureSet,
    ) -> PredictionResult<PredictionOutcome> {
        let started = Instant::now();
        let request_id = Uuid::new_v4();

        let schema = self
            .schemas
            .schema_for(model_name)
            .await
            .ok_or_else(|| PredictionError::UnknownModel(model_name.to_string()))?;
        SchemaValidator::validate(&schema, features)?;

        let key = derive_key(model_name, features);

        if let Some(prediction) = self.cache_lookup(&key).await {
            debug!(model = model_name, %request_id, key = %key, "cache hit");
            return Ok(self.outcome(model_name, prediction, true, started, request_id));
        }

        // Single-flight: serialize misses for the same key so concurrent
        // identical requests collapse into one backend call. The cache's own
        // lock is never held here; only this per-key guard spans the call.
        let guard = self.flight_guard(key).await;
        let _held = guard.lock().await;

        // A concurrent caller may have filled the cache while we waited.
        if let Some(prediction) = self.cache_lookup(&key).await {
            debug!(model = model_name, %request_id, key = %key, "cache hit after wait");
            drop(_held);
            self.release_flight_guard(&key, &guard).await;
            return Ok(self.outcome(model_name, prediction, true, started, request_id));
        }

        let scored = self.backend.score(model_name, features).await;
        let score = match scored {
            Ok(score) => score,
            Err(failure) => {
                drop(_held);
                self.release_flight_guard(&key, &guard).await;
                warn!(model = model_name, %request_id, error = %failure, "backend call failed");
                // A failed call must never poison the cache; nothing was written.
                return Err(match failure {
                    BackendFailure::Rejected(cause) => PredictionError::upstream(model_name, cause),
                    unavailable @ BackendFailure::Unavailable { .. } => {
                        PredictionError::upstream(model_name, unavailable)
                    }
                });
            }
        };

        let risk_level = RiskLevel::from_score(score.risk_score);
        let prediction = Prediction {
            risk_score: score.risk_score,
            risk_level,
            recommendation: recommendation_for(model_name, risk_level).to_string(),
            top_features: score.top_features,
            model_version: score.model_version,
        };

        if let Err(err) = self
            .cache
            .set(key, model_name, prediction.clone(), self.ttl)
            .await
        {
            // Degraded mode: serving the fresh result matters more than caching it.
            warn!(model = model_name, %request_id, error = %err, "cache write failed");
        }

        drop(_held);
        self.release_flight_guard(&key, &guard).await;

        info!(
            model = model_name,
            %request_id,
            risk_level = risk_level.as_str(),
            "prediction served from backend"
        );
        Ok(self.outcome(model_name, prediction, false, started, request_id))
    }

    /// Logically drop every cached entry for `model_name`. Called by the
    /// model lifecycle notifier on redeploy or retrain.
    pub async fn invalidate_model(&self, model_name: &str) -> PredictionResult<u64> {
        let epoch = self.cache.invalidate_model(model_name).await?;
        info!(model = model_name, epoch, "model cache invalidated");
        Ok(epoch)
    }

    /// Cache lookup with store failures degraded to misses.
    async fn cache_lookup(&self, key: &CacheKey) -> Option<Prediction> {
        match self.cache.get(key).await {
            Ok(entry) => entry.map(|e| e.payload),
            Err(err) => {
                warn!(key = %key, error = %err, "cache read failed, treating as miss");
                None
            }
        }
    }

    async fn flight_guard(&self, key: CacheKey) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().await;
        Arc::clone(in_flight.entry(key).or_default())
    }

    /// Drop the guard map entry once no other request holds it.
    async fn release_flight_guard(&self, key: &CacheKey, guard: &Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight.lock().await;
        // Two strong refs remain while we are the last holder: the map's and ours.
        if Arc::strong_count(guard) <= 2 {
            in_flight.remove(key);
        }
    }

    fn outcome(
        &self,
        model_name: &str,
        prediction: Prediction,
        cached: bool,
        started: Instant,
        request_id: Uuid,
    ) -> PredictionOutcome {
        PredictionOutcome {
            model_name: model_name.to_string(),
            prediction,
            cached,
            latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            request_id,
            timestamp: Utc::now(),
        }
    }
}
