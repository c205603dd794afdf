//! Uniform status envelope returned by every tool.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
}

/// `{status, data?, advisory_id?, filter?, message}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEnvelope {
    pub status: ToolStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    pub message: String,
}

impl ToolEnvelope {
    /// Success envelope. A payload that fails to serialize becomes an error envelope.
    pub fn success<T: Serialize>(data: &T, message: impl Into<String>) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                status: ToolStatus::Success,
                data: Some(data),
                advisory_id: None,
                filter: None,
                message: message.into(),
            },
            Err(e) => Self::error(format!("Failed to encode result: {}", Error::from(e))),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Error,
            data: None,
            advisory_id: None,
            filter: None,
            message: message.into(),
        }
    }

    pub fn with_advisory_id(mut self, advisory_id: impl Into<String>) -> Self {
        self.advisory_id = Some(advisory_id.into());
        self
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }
}
