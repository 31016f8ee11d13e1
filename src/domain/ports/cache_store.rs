//! Port trait for the prediction cache.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::errors::PredictionResult;
use crate::domain::models::{CacheEntry, CacheKey, Prediction};

/// Port trait for the shared prediction cache.
///
/// The cache is the only shared mutable resource in the serving path. All
/// mutation goes through `set` and `invalidate_model`; implementations must be
/// safe under concurrent access and must never hold an internal lock across
/// anything that blocks.
///
/// Failures surface as `PredictionError::CacheUnavailable`; the gateway
/// degrades them to cache misses rather than failing the request.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a live entry.
    ///
    /// Returns `None` for absent entries, expired entries (even if still
    /// physically stored), and entries written under an older invalidation
    /// epoch for their model. An expired entry is never returned as a hit.
    async fn get(&self, key: &CacheKey) -> PredictionResult<Option<CacheEntry>>;

    /// Write an entry, overwriting any existing one unconditionally and
    /// resetting its expiry to `now + ttl`. The entry is stamped with the
    /// model's current invalidation epoch.
    async fn set(
        &self,
        key: CacheKey,
        model_name: &str,
        payload: Prediction,
        ttl: Duration,
    ) -> PredictionResult<()>;

    /// Logically remove every entry derived from `model_name` by bumping the
    /// model's invalidation epoch. Correct even when racing concurrent `set`
    /// calls for the same model: writes that sampled the old epoch become
    /// invisible. Returns the new epoch.
    async fn invalidate_model(&self, model_name: &str) -> PredictionResult<u64>;
}
