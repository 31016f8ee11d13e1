//! Domain errors for the riskgate prediction-serving system.

use thiserror::Error;

/// A single schema violation: which field failed and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field name as submitted (or expected, for missing fields).
    pub field: String,
    /// Human-readable reason suitable for display.
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Format a violation list as a single human-readable string.
fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors surfaced to callers of the prediction gateway.
///
/// Transient backend failures are absorbed by the retry layer and only ever
/// reach callers as the terminal `Upstream` variant.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// The submitted feature set violates the model's schema. Never retried,
    /// never cached, and no backend call is attempted.
    #[error("Feature validation failed: {}", format_violations(.0))]
    Validation(Vec<FieldViolation>),

    /// No schema is registered for the requested model.
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// The backend call ultimately failed (retries exhausted, or a
    /// non-transient rejection). Carries the last failure cause.
    #[error("Upstream prediction failed for model {model}: {cause}")]
    Upstream { model: String, cause: String },

    /// The cache store itself failed. The gateway treats this as a miss and
    /// falls through to the backend; it is surfaced only by the store port.
    #[error("Cache store unavailable: {0}")]
    CacheUnavailable(String),
}

impl PredictionError {
    /// Convenience constructor for upstream failures.
    pub fn upstream(model: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Upstream {
            model: model.into(),
            cause: cause.to_string(),
        }
    }

    /// True when the caller's input was at fault (display as 4xx-equivalent).
    pub fn is_caller_fault(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnknownModel(_))
    }
}

pub type PredictionResult<T> = Result<T, PredictionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message_lists_fields() {
        let err = PredictionError::Validation(vec![
            FieldViolation::new("age", "value 200 above maximum 120"),
            FieldViolation::new("lactate", "missing required field"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("age: value 200 above maximum 120"));
        assert!(msg.contains("lactate: missing required field"));
    }

    #[test]
    fn test_caller_fault_classification() {
        assert!(PredictionError::Validation(vec![]).is_caller_fault());
        assert!(PredictionError::UnknownModel("m".into()).is_caller_fault());
        assert!(!PredictionError::upstream("m", "boom").is_caller_fault());
        assert!(!PredictionError::CacheUnavailable("down".into()).is_caller_fault());
    }
}
