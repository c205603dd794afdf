//! Tool handlers: decode arguments, run the query, wrap the outcome.
//!
//! Every tool outcome, including remote and input failures, comes back as a
//! [`ToolEnvelope`]. Only an unknown tool name or a non-object argument
//! payload is reported as an `Err`.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

use super::catalog::{
    value_type_name, AdvisoryArgs, ListAdvisoriesArgs, NoArgs, ToolCatalog, GET_ADVISORY_INFO,
    GET_BUILDS_LIST, LIST_ADVISORIES, LIST_PRODUCTS, LIST_STATES,
};
use super::envelope::ToolEnvelope;
use crate::errata::{queries, ErrataApi};
use crate::types::{Error, Result};

const NO_PRODUCTS_MESSAGE: &str = "No products found. This may be due to network connectivity \
issues or authentication problems with the Errata Tool.";

/// The Errata tool set bound to one API implementation.
pub struct ErrataTools {
    api: Arc<dyn ErrataApi>,
    catalog: ToolCatalog,
}

impl std::fmt::Debug for ErrataTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrataTools")
            .field("tools", &self.catalog.list_names())
            .finish()
    }
}

impl ErrataTools {
    pub fn new(api: Arc<dyn ErrataApi>) -> Self {
        Self {
            api,
            catalog: ToolCatalog::errata(),
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Dispatch a `tools/call` by name.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<ToolEnvelope> {
        let arguments = match arguments {
            Value::Null => Value::Object(serde_json::Map::new()),
            Value::Object(map) => Value::Object(map),
            other => {
                return Err(Error::validation(format!(
                    "Tool arguments must be an object, got {}",
                    value_type_name(&other)
                )))
            }
        };

        let envelope = match name {
            LIST_PRODUCTS => {
                decode::<NoArgs>(&arguments)?;
                self.list_products().await
            }
            LIST_STATES => {
                decode::<NoArgs>(&arguments)?;
                self.list_states()
            }
            LIST_ADVISORIES => match decode::<ListAdvisoriesArgs>(&arguments) {
                Ok(args) => self.list_advisories(&args),
                Err(e) => ToolEnvelope::error(format!("Invalid input: {}", e)),
            },
            GET_ADVISORY_INFO => match decode::<AdvisoryArgs>(&arguments) {
                Ok(args) => self.advisory_info(&args.advisory_id).await,
                Err(e) => invalid_advisory_args(&arguments, e),
            },
            GET_BUILDS_LIST => match decode::<AdvisoryArgs>(&arguments) {
                Ok(args) => self.builds_list(&args.advisory_id).await,
                Err(e) => invalid_advisory_args(&arguments, e),
            },
            _ => return Err(Error::not_found(format!("Unknown tool: {}", name))),
        };

        tracing::debug!(tool = name, success = envelope.is_success(), "tool finished");
        Ok(envelope)
    }

    pub async fn list_products(&self) -> ToolEnvelope {
        match queries::accessible_products(self.api.as_ref()).await {
            Ok(products) if products.is_empty() => ToolEnvelope::error(NO_PRODUCTS_MESSAGE),
            Ok(products) => {
                let message = format!("Retrieved {} products", products.len());
                ToolEnvelope::success(&products, message)
            }
            Err(e) => ToolEnvelope::error(format!("Failed to retrieve products: {}", e)),
        }
    }

    pub fn list_states(&self) -> ToolEnvelope {
        let states = queries::advisory_states();
        let message = format!("Retrieved {} advisory states", states.len());
        ToolEnvelope::success(&states, message)
    }

    pub fn list_advisories(&self, args: &ListAdvisoriesArgs) -> ToolEnvelope {
        let filter = json!({
            "product": args.product,
            "state": args.state,
            "limit": args.limit,
        });
        match queries::list_advisories(args.product.as_deref(), args.state.as_deref(), args.limit) {
            Ok(advisories) => {
                let message = format!("Retrieved {} advisories", advisories.len());
                ToolEnvelope::success(&advisories, message).with_filter(filter)
            }
            Err(e) => ToolEnvelope::error(format!("Feature limitation: {}", e)),
        }
    }

    pub async fn advisory_info(&self, advisory_id: &str) -> ToolEnvelope {
        let envelope = match queries::advisory_info(self.api.as_ref(), advisory_id).await {
            Ok(info) => ToolEnvelope::success(
                &info,
                format!("Retrieved information for advisory {}", advisory_id),
            ),
            Err(e) => advisory_failure(advisory_id, &e),
        };
        envelope.with_advisory_id(advisory_id)
    }

    pub async fn builds_list(&self, advisory_id: &str) -> ToolEnvelope {
        let envelope = match queries::builds_with_summary(self.api.as_ref(), advisory_id).await {
            Ok(builds) => {
                let message = format!(
                    "Retrieved {} builds for advisory {}",
                    builds.signing_summary.total_builds, advisory_id
                );
                ToolEnvelope::success(&builds, message)
            }
            Err(e) => advisory_failure(advisory_id, &e),
        };
        envelope.with_advisory_id(advisory_id)
    }
}

fn decode<T: DeserializeOwned>(arguments: &Value) -> Result<T> {
    serde_json::from_value(arguments.clone()).map_err(|e| Error::validation(e.to_string()))
}

fn advisory_failure(advisory_id: &str, err: &Error) -> ToolEnvelope {
    if err.is_invalid_input() {
        tracing::debug!(advisory = advisory_id, error = %err, "rejected advisory id");
        ToolEnvelope::error(format!("Invalid input: {}", err))
    } else {
        tracing::warn!(advisory = advisory_id, error = %err, "advisory lookup failed");
        ToolEnvelope::error(format!(
            "Failed to retrieve advisory {}: {}",
            advisory_id, err
        ))
    }
}

fn invalid_advisory_args(arguments: &Value, err: Error) -> ToolEnvelope {
    let raw_id = match arguments.get("advisory_id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    ToolEnvelope::error(format!("Invalid input: {}", err)).with_advisory_id(raw_id)
}
