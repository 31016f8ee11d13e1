//! Wire types for the prediction scoring API.

use serde::{Deserialize, Serialize};

use crate::domain::models::{FeatureContribution, FeatureSet};

/// Request body for `POST /v1/predictions/score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    /// Model to score against, e.g. "sepsis_v1".
    pub model: String,
    /// Validated feature set, serialized as a flat JSON object.
    pub features: FeatureSet,
}

/// Response body from the scoring endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    /// Probability in [0, 1].
    pub risk_score: f64,
    /// Top contributing features, at most 10.
    #[serde(default)]
    pub top_features: Vec<FeatureContribution>,
    /// Version of the model that served the request.
    pub model_version: String,
}

/// Response body from the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_request_wire_shape() {
        let request = ScoreRequest {
            model: "sepsis_v1".to_string(),
            features: FeatureSet::new().with("age", 65).with("lactate", 3.5),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "sepsis_v1");
        assert_eq!(json["features"]["age"], 65.0);
        assert_eq!(json["features"]["lactate"], 3.5);
    }

    #[test]
    fn test_score_response_tolerates_missing_features() {
        let response: ScoreResponse =
            serde_json::from_str(r#"{"risk_score": 0.78, "model_version": "v1"}"#).unwrap();
        assert!(response.top_features.is_empty());
        assert_eq!(response.model_version, "v1");
    }
}
