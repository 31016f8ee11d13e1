//! Per-model feature schemas: which fields a model requires and the
//! constraints each must satisfy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Constraint on a single feature field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldSpec {
    /// Numeric value within an inclusive range.
    Numeric { min: f64, max: f64 },
    /// Categorical value drawn from an allowed set.
    Categorical { allowed: Vec<String> },
    /// Boolean flag.
    Flag,
}

/// One field's schema entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Value constraint.
    pub spec: FieldSpec,
    /// Optional fields may be omitted from a feature set.
    #[serde(default)]
    pub required: bool,
}

/// The declared feature schema for one model.
///
/// Supplied by the schema collaborator per model name; the gateway validates
/// every feature set against it before any backend call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureSchema {
    fields: BTreeMap<String, FieldSchema>,
}

impl FeatureSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field.
    #[must_use]
    pub fn require(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(
            name.into(),
            FieldSchema {
                spec,
                required: true,
            },
        );
        self
    }

    /// Add an optional field.
    #[must_use]
    pub fn allow(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(
            name.into(),
            FieldSchema {
                spec,
                required: false,
            },
        );
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &FieldSchema)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
