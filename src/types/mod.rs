//! Core types for the Errata MCP server.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed identifiers (AdvisoryId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for the Errata client, transport, and logging

mod config;
mod errors;
mod ids;

pub use config::{
    discover_ca_bundle, Config, ErrataConfig, ObservabilityConfig, ServerConfig, Transport,
    DEFAULT_CA_BUNDLE_PATHS, PRODUCTION_URL, STAGING_URL,
};
pub use errors::{Error, Result};
pub use ids::AdvisoryId;
