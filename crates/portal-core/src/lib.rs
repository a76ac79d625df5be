//! HTTP plumbing shared by portal services: error body, health probes,
//! request-id and CORS layers, tracing setup and serde helpers.

pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
