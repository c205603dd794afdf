//! Tool catalog: names, descriptions, and JSON-Schema input definitions.
//!
//! Input schemas are generated from the typed argument structs, so the
//! schema advertised in `tools/list` is the shape the dispatcher decodes.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::types::Error;

// =============================================================================
// Tool names
// =============================================================================

pub const LIST_PRODUCTS: &str = "list_errata_products";
pub const LIST_STATES: &str = "list_errata_states";
pub const LIST_ADVISORIES: &str = "list_errata_advisories";
pub const GET_ADVISORY_INFO: &str = "get_errata_advisory_info";
pub const GET_BUILDS_LIST: &str = "get_errata_builds_list";

// =============================================================================
// Argument types
// =============================================================================

/// Arguments of tools that take none.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoArgs {}

fn default_limit() -> u32 {
    50
}

/// Arguments of `list_errata_advisories`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListAdvisoriesArgs {
    /// Product name to filter by (e.g., RHEL, RHIVOS, RHCEPH)
    #[serde(default)]
    pub product: Option<String>,
    /// Advisory state to filter by (e.g., QE, SHIPPED_LIVE, NEW_FILES)
    #[serde(default)]
    pub state: Option<String>,
    /// Maximum number of advisories to return
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for ListAdvisoriesArgs {
    fn default() -> Self {
        Self {
            product: None,
            state: None,
            limit: default_limit(),
        }
    }
}

/// Arguments of the per-advisory tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AdvisoryArgs {
    /// Advisory ID (numeric ID like '12345')
    #[serde(deserialize_with = "string_or_integer")]
    #[schemars(with = "String")]
    pub advisory_id: String,
}

/// Accept `"12345"` as well as `12345`; clients differ on which they send.
fn string_or_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) if n.is_u64() => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "advisory_id must be a string or non-negative integer, got {}",
            value_type_name(&other)
        ))),
    }
}

pub(crate) fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Tool entry
// =============================================================================

/// Tool metadata as advertised over MCP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolEntry {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolEntry {
    /// Entry whose input schema is derived from `T`.
    pub fn for_args<T: JsonSchema>(name: &str, description: &str) -> Self {
        let mut input_schema =
            serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| empty_schema());
        if let Some(map) = input_schema.as_object_mut() {
            map.remove("$schema");
            map.remove("title");
            map.entry("properties")
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
        }
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }

    /// Names of the required arguments.
    pub fn required_params(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

fn empty_schema() -> Value {
    serde_json::json!({"type": "object", "properties": {}})
}

// =============================================================================
// Tool catalog
// =============================================================================

/// In-memory tool catalog. Owns metadata, not implementations.
#[derive(Debug, Default)]
pub struct ToolCatalog {
    entries: HashMap<String, ToolEntry>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Catalog of every Errata tool.
    pub fn errata() -> Self {
        let mut catalog = Self::new();
        let entries = [
            ToolEntry::for_args::<NoArgs>(
                LIST_PRODUCTS,
                "List available products in the Errata Tool.",
            ),
            ToolEntry::for_args::<NoArgs>(
                LIST_STATES,
                "List all possible advisory states in the Errata Tool.",
            ),
            ToolEntry::for_args::<ListAdvisoriesArgs>(
                LIST_ADVISORIES,
                "List advisories with optional filtering by product and state. \
                 Not supported by the Errata Tool API; use get_errata_advisory_info with a numeric ID.",
            ),
            ToolEntry::for_args::<AdvisoryArgs>(
                GET_ADVISORY_INFO,
                "Get detailed information about a specific advisory.",
            ),
            ToolEntry::for_args::<AdvisoryArgs>(
                GET_BUILDS_LIST,
                "Get the builds attached to an advisory with a summary of their signing status.",
            ),
        ];
        for entry in entries {
            // Names above are non-empty constants.
            let _ = catalog.register(entry);
        }
        catalog
    }

    /// Register a tool entry.
    pub fn register(&mut self, entry: ToolEntry) -> crate::types::Result<()> {
        if entry.name.is_empty() {
            return Err(Error::validation("Tool name cannot be empty"));
        }
        self.entries.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// Get a tool entry by name.
    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.entries.get(name)
    }

    /// Check if a tool exists.
    pub fn has_tool(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// List all tool names.
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// List all tool entries, sorted by name.
    pub fn list_entries(&self) -> Vec<&ToolEntry> {
        let mut entries: Vec<&ToolEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
