//! Tool layer: catalog, argument decoding, and status envelopes.
//!
//! Query functions in [`crate::errata::queries`] return data or errors; this
//! layer is where every outcome becomes a `{status, data, message}` envelope.

pub mod catalog;
pub mod envelope;
pub mod handlers;

pub use catalog::{ToolCatalog, ToolEntry};
pub use envelope::{ToolEnvelope, ToolStatus};
pub use handlers::ErrataTools;
