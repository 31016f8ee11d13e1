//! Adapters: concrete implementations of domain ports.

pub mod cache;
pub mod schema;
