//! Infrastructure layer: external integrations and process-level concerns.

pub mod backend;
pub mod config;
pub mod logging;
