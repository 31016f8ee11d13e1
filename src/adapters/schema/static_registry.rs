//! Static in-memory schema registry.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::models::{FeatureSchema, FieldSpec};
use crate::domain::ports::SchemaProvider;

/// In-memory `SchemaProvider` seeded with the built-in clinical schemas.
///
/// Ships with the `sepsis_v1` schema (demographics, vitals, and the key lab
/// values of the 42-feature sepsis table). Deployments register or replace
/// schemas at startup; the model lifecycle notifier re-registers on redeploy.
pub struct StaticSchemaRegistry {
    schemas: RwLock<HashMap<String, FeatureSchema>>,
}

impl StaticSchemaRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Registry pre-loaded with the built-in schemas.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        {
            let mut schemas = registry
                .schemas
                .try_write()
                .expect("no concurrent access during construction");
            schemas.insert("sepsis_v1".to_string(), sepsis_v1_schema());
        }
        registry
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with_schema(self, model_name: impl Into<String>, schema: FeatureSchema) -> Self {
        {
            let mut schemas = self
                .schemas
                .try_write()
                .expect("no concurrent access during construction");
            schemas.insert(model_name.into(), schema);
        }
        self
    }

    /// Register or replace a schema at runtime.
    pub async fn register(&self, model_name: impl Into<String>, schema: FeatureSchema) {
        self.schemas.write().await.insert(model_name.into(), schema);
    }
}

impl Default for StaticSchemaRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[async_trait]
impl SchemaProvider for StaticSchemaRegistry {
    async fn schema_for(&self, model_name: &str) -> Option<FeatureSchema> {
        self.schemas.read().await.get(model_name).cloned()
    }
}

fn numeric(min: f64, max: f64) -> FieldSpec {
    FieldSpec::Numeric { min, max }
}

/// Built-in schema for the sepsis model: demographics, vitals, and the lab
/// values with the highest feature importance. Ranges mirror the serving
/// backend's feature table.
fn sepsis_v1_schema() -> FeatureSchema {
    FeatureSchema::new()
        // Demographics
        .require("age", numeric(18.0, 120.0))
        .require("gender", FieldSpec::Categorical {
            allowed: vec!["M".to_string(), "F".to_string()],
        })
        .require("bmi", numeric(10.0, 60.0))
        // Vitals
        .require("heart_rate", numeric(0.0, 300.0))
        .require("sbp", numeric(40.0, 250.0))
        .require("dbp", numeric(20.0, 150.0))
        .require("temperature", numeric(32.0, 42.0))
        .require("respiratory_rate", numeric(0.0, 60.0))
        // Labs
        .require("wbc", numeric(0.0, 100.0))
        .require("lactate", numeric(0.0, 30.0))
        .require("creatinine", numeric(0.0, 20.0))
        .require("platelets", numeric(0.0, 1000.0))
        .allow("pao2", numeric(0.0, 800.0))
        .allow("paco2", numeric(0.0, 150.0))
        .allow("ph", numeric(6.5, 8.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builtin_sepsis_schema_present() {
        let registry = StaticSchemaRegistry::with_builtins();
        let schema = registry.schema_for("sepsis_v1").await.unwrap();
        assert!(schema.field("lactate").unwrap().required);
        assert!(!schema.field("ph").unwrap().required);
        assert!(registry.schema_for("unknown").await.is_none());
    }

    #[tokio::test]
    async fn test_register_replaces_schema() {
        let registry = StaticSchemaRegistry::new();
        assert!(registry.schema_for("m").await.is_none());

        registry
            .register("m", FeatureSchema::new().require("x", numeric(0.0, 1.0)))
            .await;
        assert_eq!(registry.schema_for("m").await.unwrap().len(), 1);

        registry.register("m", FeatureSchema::new()).await;
        assert!(registry.schema_for("m").await.unwrap().is_empty());
    }
}
