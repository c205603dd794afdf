//! # Errata MCP - Errata Tool queries over the Model Context Protocol
//!
//! Exposes read-only Errata Tool lookups as MCP tools:
//! - Product discovery against a fixed list of common products
//! - The fixed set of advisory workflow states
//! - Advisory metadata by numeric id
//! - Build lists with an aggregated signing summary
//!
//! ## Architecture
//!
//! ```text
//!   stdio / SSE / streamable HTTP
//!                │
//!          ┌─────▼─────┐     ┌──────────────┐     ┌──────────────┐
//!          │ McpRouter │ ──▶ │ ErrataTools  │ ──▶ │  ErrataApi   │ ──▶ Errata Tool
//!          └───────────┘     │ (envelopes)  │     │ (reqwest)    │
//!                            └──────────────┘     └──────────────┘
//! ```
//!
//! Tool failures are reported inside the result envelope; only unknown tools
//! and malformed requests surface as JSON-RPC errors.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod errata;
pub mod mcp;
pub mod tools;
pub mod types;
pub mod validation;

// Internal utilities
pub mod observability;

pub use types::{Config, Error, Result};
