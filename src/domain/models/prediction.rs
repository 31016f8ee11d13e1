//! Prediction results: risk scores, categories, and explanation payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Risk level categories for a prediction score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Categorize a probability into a risk level.
    ///
    /// Thresholds: <0.2 low, <0.5 medium, <0.8 high, otherwise critical.
    pub fn from_score(score: f64) -> Self {
        if score < 0.2 {
            Self::Low
        } else if score < 0.5 {
            Self::Medium
        } else if score < 0.8 {
            Self::High
        } else {
            Self::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// Clinical recommendation for a risk level, keyed by model family.
///
/// Model names are prefixed by family (`sepsis_v1`, `mortality_v2`); anything
/// unrecognized gets the generic monitoring guidance.
pub fn recommendation_for(model_name: &str, level: RiskLevel) -> &'static str {
    if model_name.starts_with("sepsis") {
        match level {
            RiskLevel::Low => "Continue standard monitoring",
            RiskLevel::Medium => "Increase monitoring frequency, consider early intervention",
            RiskLevel::High => "Consider sepsis protocol, prepare for rapid response",
            RiskLevel::Critical => "URGENT: Initiate sepsis protocol immediately",
        }
    } else if model_name.starts_with("mortality") {
        match level {
            RiskLevel::Low => "Standard ICU care",
            RiskLevel::Medium => "Enhanced monitoring and support",
            RiskLevel::High => "Intensive care, consider escalation of therapy",
            RiskLevel::Critical => "Critical condition - maximum support required",
        }
    } else {
        match level {
            RiskLevel::Low | RiskLevel::Medium => "Continue standard monitoring",
            RiskLevel::High | RiskLevel::Critical => "Escalate per unit protocol",
        }
    }
}

/// One feature's contribution to a prediction (explanation payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    /// Feature name.
    pub feature: String,
    /// Submitted value.
    pub value: f64,
    /// Contribution to the risk score (importance weight).
    pub importance: f64,
}

/// The cacheable payload of one prediction: everything that is a pure
/// function of (model, feature set) at scoring time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Probability in [0, 1].
    pub risk_score: f64,
    /// Categorized risk level.
    pub risk_level: RiskLevel,
    /// Clinical recommendation for the risk level.
    pub recommendation: String,
    /// Top contributing features, at most 10.
    pub top_features: Vec<FeatureContribution>,
    /// Version reported by the serving backend.
    pub model_version: String,
}

/// A prediction as returned to callers, with per-call metadata the cache
/// does not store (latency, hit flag, request correlation id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionOutcome {
    /// Model that produced the prediction.
    pub model_name: String,
    /// The prediction payload (identical for cache hits and misses).
    pub prediction: Prediction,
    /// True when served from cache without a backend call.
    pub cached: bool,
    /// Wall-clock latency of this gateway call in milliseconds.
    pub latency_ms: u64,
    /// Correlation id for logs and audit.
    pub request_id: Uuid,
    /// When the gateway produced this outcome.
    pub timestamp: DateTime<Utc>,
}
