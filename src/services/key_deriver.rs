//! Cache key derivation: deterministic fingerprint of (model, feature set).

use sha2::{Digest, Sha256};

use crate::domain::models::{CacheKey, FeatureSet};

/// Derive the cache key for a (model, feature set) pair.
///
/// The feature set serializes through its `BTreeMap` backing, so the canonical
/// JSON is lexicographically field-ordered no matter how the caller assembled
/// the set. The key is the SHA-256 digest of the model name and that canonical
/// serialization, separated by a byte that cannot appear in either.
///
/// Pure and deterministic across processes and restarts; no I/O.
pub fn derive_key(model_name: &str, features: &FeatureSet) -> CacheKey {
    // Serializing a string-keyed map of scalars cannot fail.
    let canonical =
        serde_json::to_string(features).expect("feature set serializes to JSON");

    let mut hasher = Sha256::new();
    hasher.update(model_name.as_bytes());
    hasher.update([0u8]);
    hasher.update(canonical.as_bytes());

    CacheKey::from_bytes(hasher.finalize().into())
}
