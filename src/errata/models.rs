//! Errata Tool records and their wire shapes.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::AdvisoryId;

/// Standard advisory workflow states, in workflow order.
pub const ADVISORY_STATES: [&str; 6] = [
    "NEW_FILES",
    "QE",
    "REL_PREP",
    "PUSH_READY",
    "IN_PUSH",
    "SHIPPED_LIVE",
];

/// Products probed by `list_errata_products`.
pub const COMMON_PRODUCTS: [&str; 7] = [
    "RHEL", "RHIVOS", "RHCEPH", "RHOSE", "RHSCL", "RHGS", "RHSAT",
];

/// A product known to the Errata Tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `GET /products/{name}.json` body. Older deployments return the record
/// bare, newer ones wrap it under `product`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProductResponse {
    Wrapped { product: ProductRecord },
    Bare(ProductRecord),
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProductRecord {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl ProductResponse {
    /// Resolve into a [`Product`], falling back to the requested name.
    pub(crate) fn into_product(self, requested: &str) -> Product {
        let record = match self {
            ProductResponse::Wrapped { product } => product,
            ProductResponse::Bare(record) => record,
        };
        Product {
            name: record
                .short_name
                .or(record.name)
                .unwrap_or_else(|| requested.to_string()),
            id: record.id,
            description: record.description,
        }
    }
}

/// Advisory metadata returned by `get_errata_advisory_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryInfo {
    /// Full advisory name, e.g. `RHBA-2024:1234-01`.
    pub id: String,
    pub numeric_id: u64,
    pub synopsis: String,
    pub description: String,
    #[serde(rename = "type")]
    pub advisory_type: String,
    pub state: String,
    pub product: String,
    pub release: String,
    pub created_date: String,
    pub updated_date: String,
    pub url: String,
    pub embargoed: bool,
    pub text_only: bool,
    pub content_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_impact: Option<String>,
}

/// `GET /api/v1/erratum/{id}` body.
///
/// The advisory itself sits under `errata.<rhba|rhsa|rhea>`; the key names
/// the advisory type.
#[derive(Debug, Deserialize)]
pub(crate) struct ErratumResponse {
    #[serde(default)]
    errata: BTreeMap<String, ErratumRecord>,
    #[serde(default)]
    content: Option<ContentWrapper>,
    #[serde(default)]
    product: Option<NamedRef>,
    #[serde(default)]
    release: Option<NamedRef>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErratumRecord {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    fulladvisory: Option<String>,
    #[serde(default)]
    synopsis: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    product_id: Option<u64>,
    #[serde(default)]
    group_id: Option<u64>,
    #[serde(default)]
    issue_date: Option<String>,
    #[serde(default)]
    update_date: Option<String>,
    #[serde(default)]
    embargo_date: Option<String>,
    #[serde(default)]
    text_only: Option<bool>,
    #[serde(default)]
    content_types: Option<Vec<String>>,
    #[serde(default)]
    security_impact: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ContentWrapper {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NamedRef {
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl NamedRef {
    fn label(&self) -> Option<String> {
        self.short_name.clone().or_else(|| self.name.clone())
    }
}

impl ErratumResponse {
    /// Flatten the wire record. `None` when the body holds no advisory.
    pub(crate) fn into_info(
        self,
        requested: AdvisoryId,
        url: String,
        now: DateTime<Utc>,
    ) -> Option<AdvisoryInfo> {
        let (type_key, record) = self.errata.into_iter().next()?;

        let product = self
            .product
            .as_ref()
            .and_then(NamedRef::label)
            .or_else(|| record.product_id.map(|id| id.to_string()))
            .unwrap_or_default();
        let release = self
            .release
            .as_ref()
            .and_then(NamedRef::label)
            .or_else(|| record.group_id.map(|id| id.to_string()))
            .unwrap_or_default();
        let description = self
            .content
            .and_then(|c| c.content)
            .and_then(|c| c.description)
            .unwrap_or_default();
        let embargoed = record
            .embargo_date
            .as_deref()
            .map(|date| is_embargoed(date, now))
            .unwrap_or(false);
        let security_impact = record
            .security_impact
            .filter(|impact| !impact.is_empty());

        Some(AdvisoryInfo {
            id: record.fulladvisory.unwrap_or_else(|| requested.to_string()),
            numeric_id: record.id.unwrap_or_else(|| requested.get()),
            synopsis: record.synopsis.unwrap_or_default(),
            description,
            advisory_type: type_key.to_ascii_uppercase(),
            state: record.status.unwrap_or_default(),
            product,
            release,
            created_date: record.issue_date.unwrap_or_default(),
            updated_date: record.update_date.unwrap_or_default(),
            url,
            embargoed,
            text_only: record.text_only.unwrap_or(false),
            content_types: record.content_types.unwrap_or_default(),
            security_impact,
        })
    }
}

/// An embargo date in the future keeps the advisory embargoed. Dates the
/// Errata Tool formats in a way we cannot read are treated as embargoed.
fn is_embargoed(date: &str, now: DateTime<Utc>) -> bool {
    match parse_timestamp(date) {
        Some(until) => until > now,
        None => true,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%SZ") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Payload of `get_errata_builds_list`: the raw document plus its summary.
#[derive(Debug, Clone, Serialize)]
pub struct BuildsList {
    pub builds_list: Value,
    pub signing_summary: super::signing::SigningSummary,
}
