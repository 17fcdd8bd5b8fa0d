//! # Token Console Client Library
//!
//! Client for the stream console's API token endpoints: list, create,
//! delete, copy-as-curl and status toggle. Each operation forwards the
//! caller's payload to a fixed endpoint and returns the transport's result.
//!
//! Modules:
//! - `api` — `TokenApiClient` and typed payload builders
//! - `transport` — transport capability and the reqwest implementation
//! - `config` — YAML configuration, endpoint registry, validation
//! - `resilience` — retry policy for connection failures
//! - `observability` — prometheus request metrics

pub mod api;
pub mod config;
pub mod observability;
pub mod resilience;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod tests;


pub use crate::api::TokenApiClient;
pub use crate::config::endpoints::EndpointRegistry;
pub use crate::config::settings::ClientConfig;
pub use crate::transport::{HttpTransport, QueryPayload, Transport, TransportError, TransportResult};
