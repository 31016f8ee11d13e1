//! Scoring backend integration: HTTP client, retry policy, error
//! classification, and wire types.

pub mod client;
pub mod errors;
pub mod retry;
pub mod types;

pub use client::{HttpPredictionBackend, ScoringClientConfig};
pub use errors::BackendApiError;
pub use retry::RetryPolicy;
pub use types::{ScoreRequest, ScoreResponse};
