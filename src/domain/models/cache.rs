//! Cache keys and entries for prediction results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::prediction::Prediction;

/// Deterministic fingerprint of (model name, canonicalized feature set).
///
/// A 256-bit digest; equal feature sets yield equal keys regardless of the
/// order fields were assembled in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Shortened digest keeps log lines readable
        write!(f, "CacheKey({}..)", &hex::encode(self.0)[..12])
    }
}

/// One cached prediction with its expiry and invalidation bookkeeping.
///
/// Entries are written wholesale on refresh and never mutated in place. An
/// entry is visible to readers only while `now < expires_at` and its epoch
/// matches the model's current invalidation epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Key the entry was stored under.
    pub key: CacheKey,
    /// Model the key was derived from; scopes epoch invalidation.
    pub model_name: String,
    /// Cached prediction payload.
    pub payload: Prediction,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
    /// Logical expiry; the entry is a miss at or after this instant.
    pub expires_at: DateTime<Utc>,
    /// Model invalidation epoch active when the entry was written.
    pub epoch: u64,
}

impl CacheEntry {
    /// True when the entry is still visible at `now`.
    pub fn is_live(&self, now: DateTime<Utc>, current_epoch: u64) -> bool {
        now < self.expires_at && self.epoch >= current_epoch
    }
}
