//! Feature set validation against per-model schemas.
//!
//! Runs before key derivation: an invalid feature set must never reach the
//! cache or the backend.

use crate::domain::errors::{FieldViolation, PredictionError, PredictionResult};
use crate::domain::models::{FeatureSchema, FeatureSet, FeatureValue, FieldSpec};

/// Validates feature sets against declared schemas, collecting every
/// violation rather than stopping at the first.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validate `features` against `schema`.
    ///
    /// Checks, in order per field: presence of required fields, absence of
    /// undeclared fields, value type, and value constraints (numeric range,
    /// categorical membership).
    ///
    /// # Errors
    /// `PredictionError::Validation` with one `FieldViolation` per problem.
    pub fn validate(schema: &FeatureSchema, features: &FeatureSet) -> PredictionResult<()> {
        let mut violations = Vec::new();

        for (name, field) in schema.fields() {
            match features.get(name) {
                None if field.required => {
                    violations.push(FieldViolation::new(name, "missing required field"));
                }
                None => {}
                Some(value) => {
                    check_value(name, &field.spec, value, &mut violations);
                }
            }
        }

        // Undeclared fields are rejected: a typo'd field name silently
        // dropped by the backend would score the wrong feature vector.
        for name in features.field_names() {
            if schema.field(name).is_none() {
                violations.push(FieldViolation::new(name, "unknown field not in schema"));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(PredictionError::Validation(violations))
        }
    }
}

fn check_value(
    name: &str,
    spec: &FieldSpec,
    value: &FeatureValue,
    violations: &mut Vec<FieldViolation>,
) {
    match (spec, value) {
        (FieldSpec::Numeric { min, max }, FeatureValue::Number(n)) => {
            if !n.is_finite() {
                violations.push(FieldViolation::new(name, "value must be a finite number"));
            } else if n < min {
                violations.push(FieldViolation::new(
                    name,
                    format!("value {n} below minimum {min}"),
                ));
            } else if n > max {
                violations.push(FieldViolation::new(
                    name,
                    format!("value {n} above maximum {max}"),
                ));
            }
        }
        (FieldSpec::Categorical { allowed }, FeatureValue::Text(s)) => {
            if !allowed.iter().any(|a| a == s) {
                violations.push(FieldViolation::new(
                    name,
                    format!("value '{s}' not one of: {}", allowed.join(", ")),
                ));
            }
        }
        (FieldSpec::Flag, FeatureValue::Flag(_)) => {}
        (expected, actual) => {
            let expected = match expected {
                FieldSpec::Numeric { .. } => "number",
                FieldSpec::Categorical { .. } => "text",
                FieldSpec::Flag => "flag",
            };
            violations.push(FieldViolation::new(
                name,
                format!("expected {expected}, got {}", actual.kind()),
            ));
        }
    }
}
