//! Errata Tool access: the HTTP client, its records, and build signing summaries.
//!
//! [`ErrataApi`] is the seam between the MCP tools and the network: the
//! production implementation is [`ErrataClient`]; tests substitute mocks.

mod client;
pub mod models;
pub mod queries;
pub mod signing;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{AdvisoryId, Result};

pub use client::{Credentials, ErrataClient};
pub use models::{AdvisoryInfo, BuildsList, Product, ADVISORY_STATES, COMMON_PRODUCTS};
pub use signing::{summarize, SigningDocument, SigningSummary};

/// Read-only queries against the Errata Tool.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ErrataApi: Send + Sync {
    /// Load one product by short name (`GET /products/{name}.json`).
    async fn product(&self, name: &str) -> Result<Product>;

    /// Load advisory metadata (`GET /api/v1/erratum/{id}`).
    async fn advisory(&self, id: AdvisoryId) -> Result<AdvisoryInfo>;

    /// Load the raw signing-status document
    /// (`GET /api/v1/erratum/{id}/builds_list?with_sig_key=1`).
    async fn builds_list(&self, id: AdvisoryId) -> Result<Value>;
}
