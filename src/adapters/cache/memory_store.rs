//! In-memory epoch-tagged TTL cache for prediction results.
//!
//! Invalidation bumps a per-model epoch counter instead of scanning for
//! matching keys; entries written under an older epoch become logical misses
//! immediately, so invalidation cannot race a concurrent write into serving
//! stale results.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::errors::PredictionResult;
use crate::domain::models::{CacheEntry, CacheKey, Prediction};
use crate::domain::ports::CacheStore;

/// Default maximum number of cached predictions.
const DEFAULT_MAX_ENTRIES: usize = 1000;

#[derive(Default)]
struct StoreState {
    entries: HashMap<CacheKey, CacheEntry>,
    /// Current invalidation epoch per model name. Missing means epoch 0.
    epochs: HashMap<String, u64>,
}

impl StoreState {
    fn current_epoch(&self, model_name: &str) -> u64 {
        self.epochs.get(model_name).copied().unwrap_or(0)
    }

    /// Drop entries that can never be served again (expired or epoch-stale).
    fn sweep(&mut self) {
        let now = Utc::now();
        let epochs = &self.epochs;
        self.entries.retain(|_, entry| {
            let epoch = epochs.get(&entry.model_name).copied().unwrap_or(0);
            entry.is_live(now, epoch)
        });
    }
}

/// In-memory `CacheStore` with per-entry TTL and per-model epoch invalidation.
///
/// Constructed at process start and injected into the gateway; tests get
/// isolation by constructing fresh instances. Reads take the lock only for
/// the lookup itself, never across anything that blocks.
pub struct MemoryCacheStore {
    state: RwLock<StoreState>,
    max_entries: usize,
}

impl MemoryCacheStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            max_entries,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }

    /// Number of physically stored entries, live or not. Test visibility.
    pub async fn physical_len(&self) -> usize {
        self.state.read().await.entries.len()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &CacheKey) -> PredictionResult<Option<CacheEntry>> {
        let state = self.state.read().await;
        let Some(entry) = state.entries.get(key) else {
            return Ok(None);
        };

        // Expired or epoch-stale entries are logical misses even while still
        // physically stored; the next write sweeps them out.
        if entry.is_live(Utc::now(), state.current_epoch(&entry.model_name)) {
            Ok(Some(entry.clone()))
        } else {
            Ok(None)
        }
    }

    async fn set(
        &self,
        key: CacheKey,
        model_name: &str,
        payload: Prediction,
        ttl: Duration,
    ) -> PredictionResult<()> {
        let now = Utc::now();
        // Out-of-range std durations clamp to an effectively-unbounded expiry.
        let ttl = ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::days(36_500));

        let mut state = self.state.write().await;
        state.sweep();

        // Full and still no room after the sweep: drop the entry closest to
        // expiry. Last-write-wins keeps the bound without an LRU list.
        if state.entries.len() >= self.max_entries && !state.entries.contains_key(&key) {
            if let Some(evict) = state
                .entries
                .iter()
                .min_by_key(|(_, e)| e.expires_at)
                .map(|(k, _)| *k)
            {
                state.entries.remove(&evict);
            }
        }

        let epoch = state.current_epoch(model_name);
        state.entries.insert(
            key,
            CacheEntry {
                key,
                model_name: model_name.to_string(),
                payload,
                created_at: now,
                expires_at: now + ttl,
                epoch,
            },
        );
        Ok(())
    }

    async fn invalidate_model(&self, model_name: &str) -> PredictionResult<u64> {
        let mut state = self.state.write().await;
        let epoch = state
            .epochs
            .entry(model_name.to_string())
            .and_modify(|e| *e += 1)
            .or_insert(1);
        let epoch = *epoch;
        debug!(model = model_name, epoch, "invalidation epoch bumped");
        Ok(epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RiskLevel;

    fn key(n: u8) -> CacheKey {
        CacheKey::from_bytes([n; 32])
    }

    fn prediction(score: f64) -> Prediction {
        Prediction {
            risk_score: score,
            risk_level: RiskLevel::from_score(score),
            recommendation: "Continue standard monitoring".to_string(),
            top_features: vec![],
            model_version: "v1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_returns_live_entry() {
        let store = MemoryCacheStore::with_defaults();
        store
            .set(key(1), "sepsis_v1", prediction(0.78), Duration::from_secs(60))
            .await
            .unwrap();

        let entry = store.get(&key(1)).await.unwrap().unwrap();
        assert_eq!(entry.payload.risk_score, 0.78);
        assert_eq!(entry.model_name, "sepsis_v1");
        assert_eq!(entry.epoch, 0);
    }

    #[tokio::test]
    async fn test_absent_key_is_miss() {
        let store = MemoryCacheStore::with_defaults();
        assert!(store.get(&key(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_entry_is_immediately_expired() {
        let store = MemoryCacheStore::with_defaults();
        store
            .set(key(1), "sepsis_v1", prediction(0.5), Duration::ZERO)
            .await
            .unwrap();

        assert!(store.get(&key(1)).await.unwrap().is_none());
        // Physically present until the next write sweeps it.
        assert_eq!(store.physical_len().await, 1);
    }

    #[tokio::test]
    async fn test_set_overwrites_unconditionally() {
        let store = MemoryCacheStore::with_defaults();
        store
            .set(key(1), "sepsis_v1", prediction(0.3), Duration::from_secs(60))
            .await
            .unwrap();
        store
            .set(key(1), "sepsis_v1", prediction(0.9), Duration::from_secs(60))
            .await
            .unwrap();

        let entry = store.get(&key(1)).await.unwrap().unwrap();
        assert_eq!(entry.payload.risk_score, 0.9);
        assert_eq!(store.physical_len().await, 1);
    }

    #[tokio::test]
    async fn test_invalidation_hides_prior_entries() {
        let store = MemoryCacheStore::with_defaults();
        store
            .set(key(1), "sepsis_v1", prediction(0.78), Duration::from_secs(3600))
            .await
            .unwrap();
        store
            .set(key(2), "mortality_v1", prediction(0.25), Duration::from_secs(3600))
            .await
            .unwrap();

        let epoch = store.invalidate_model("sepsis_v1").await.unwrap();
        assert_eq!(epoch, 1);

        // Unexpired sepsis entry is now a logical miss; other models unaffected.
        assert!(store.get(&key(1)).await.unwrap().is_none());
        assert!(store.get(&key(2)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_write_after_invalidation_is_served() {
        let store = MemoryCacheStore::with_defaults();
        store.invalidate_model("sepsis_v1").await.unwrap();

        store
            .set(key(1), "sepsis_v1", prediction(0.6), Duration::from_secs(60))
            .await
            .unwrap();

        let entry = store.get(&key(1)).await.unwrap().unwrap();
        assert_eq!(entry.epoch, 1);
    }

    #[tokio::test]
    async fn test_repeated_invalidation_increments_epoch() {
        let store = MemoryCacheStore::with_defaults();
        assert_eq!(store.invalidate_model("m").await.unwrap(), 1);
        assert_eq!(store.invalidate_model("m").await.unwrap(), 2);
        assert_eq!(store.invalidate_model("other").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sweep_prunes_dead_entries_on_write() {
        let store = MemoryCacheStore::with_defaults();
        store
            .set(key(1), "sepsis_v1", prediction(0.5), Duration::ZERO)
            .await
            .unwrap();
        store.invalidate_model("sepsis_v1").await.unwrap();

        store
            .set(key(2), "mortality_v1", prediction(0.2), Duration::from_secs(60))
            .await
            .unwrap();

        // The expired/stale entry was physically removed by the write.
        assert_eq!(store.physical_len().await, 1);
    }

    #[tokio::test]
    async fn test_capacity_bound_evicts_soonest_to_expire() {
        let store = MemoryCacheStore::new(2);
        store
            .set(key(1), "m", prediction(0.1), Duration::from_secs(10))
            .await
            .unwrap();
        store
            .set(key(2), "m", prediction(0.2), Duration::from_secs(1000))
            .await
            .unwrap();
        store
            .set(key(3), "m", prediction(0.3), Duration::from_secs(1000))
            .await
            .unwrap();

        assert_eq!(store.physical_len().await, 2);
        assert!(store.get(&key(1)).await.unwrap().is_none(), "evicted");
        assert!(store.get(&key(2)).await.unwrap().is_some());
        assert!(store.get(&key(3)).await.unwrap().is_some());
    }
}
