//! Domain layer: models, ports, and errors for prediction serving.

pub mod errors;
pub mod models;
pub mod ports;
