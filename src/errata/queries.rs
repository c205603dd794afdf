//! Query functions behind the MCP tools. Each returns plain data or an error;
//! the tool layer turns both into envelopes.

use super::models::{AdvisoryInfo, BuildsList, ADVISORY_STATES, COMMON_PRODUCTS};
use super::signing::summarize_value;
use super::ErrataApi;
use crate::types::{AdvisoryId, Error, Result};

/// Explanation returned by [`list_advisories`].
pub const LIST_ADVISORIES_UNSUPPORTED: &str = "Listing advisories by product and state is not \
supported by the Errata Tool API. The API works with specific advisory IDs. Use \
get_errata_advisory_info with a specific numeric advisory ID instead. Example: \
get_errata_advisory_info('148894')";

/// Probe the common products and return the accessible ones, sorted.
///
/// A product that fails to load is logged and skipped, so an empty list
/// usually means connectivity or authentication trouble.
pub async fn accessible_products(api: &dyn ErrataApi) -> Result<Vec<String>> {
    let mut accessible = Vec::with_capacity(COMMON_PRODUCTS.len());

    for name in COMMON_PRODUCTS {
        match api.product(name).await {
            Ok(product) => {
                tracing::debug!(product = %product.name, "found product");
                accessible.push(product.name);
            }
            Err(e) => {
                tracing::warn!(product = name, error = %e, "product not accessible");
            }
        }
    }

    accessible.sort();
    tracing::info!("Found {} accessible products", accessible.len());
    Ok(accessible)
}

/// The fixed advisory workflow states.
pub fn advisory_states() -> Vec<String> {
    ADVISORY_STATES.iter().map(|s| s.to_string()).collect()
}

/// Browsing advisories by filter is not offered by the Errata Tool API.
pub fn list_advisories(
    product: Option<&str>,
    state: Option<&str>,
    limit: u32,
) -> Result<Vec<AdvisoryInfo>> {
    tracing::debug!(?product, ?state, limit, "advisory listing requested");
    Err(Error::unsupported(LIST_ADVISORIES_UNSUPPORTED))
}

/// Fetch advisory metadata for a caller-supplied identifier.
pub async fn advisory_info(api: &dyn ErrataApi, advisory_id: &str) -> Result<AdvisoryInfo> {
    let id = AdvisoryId::parse(advisory_id)?;
    let info = api.advisory(id).await?;
    tracing::info!(advisory = %id, name = %info.id, "advisory info retrieved");
    Ok(info)
}

/// Fetch the signing-status document and summarize it.
pub async fn builds_with_summary(api: &dyn ErrataApi, advisory_id: &str) -> Result<BuildsList> {
    let id = AdvisoryId::parse(advisory_id)?;
    let document = api.builds_list(id).await?;
    let signing_summary = summarize_value(&document);
    tracing::info!(
        advisory = %id,
        builds = signing_summary.total_builds,
        unsigned_builds = signing_summary.unsigned_builds.len(),
        unsigned_files = signing_summary.unsigned_files,
        "builds list retrieved"
    );
    Ok(BuildsList {
        builds_list: document,
        signing_summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errata::{MockErrataApi, Product};
    use mockall::predicate::eq;
    use serde_json::json;

    fn product(name: &str) -> Product {
        Product {
            name: name.to_string(),
            id: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn accessible_products_skips_failures_and_sorts() {
        let mut api = MockErrataApi::new();
        api.expect_product().times(7).returning(|name| match name {
            "RHSAT" | "RHEL" | "RHGS" => Ok(product(name)),
            _ => Err(Error::authentication("HTTP 401")),
        });

        let products = accessible_products(&api).await.unwrap();
        assert_eq!(products, vec!["RHEL", "RHGS", "RHSAT"]);
    }

    #[test]
    fn states_are_fixed() {
        assert_eq!(
            advisory_states(),
            vec!["NEW_FILES", "QE", "REL_PREP", "PUSH_READY", "IN_PUSH", "SHIPPED_LIVE"]
        );
    }

    #[test]
    fn list_advisories_is_unsupported() {
        let err = list_advisories(Some("RHEL"), Some("QE"), 10).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
        assert!(err.to_string().contains("get_errata_advisory_info"));
    }

    #[tokio::test]
    async fn advisory_info_rejects_non_numeric_without_calling() {
        let mut api = MockErrataApi::new();
        api.expect_advisory().never();

        let err = advisory_info(&api, "RHSA-2024:1234").await.unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn builds_with_summary_attaches_summary() {
        let mut api = MockErrataApi::new();
        api.expect_builds_list()
            .with(eq(AdvisoryId::new(99)))
            .times(1)
            .returning(|_| {
                Ok(json!({"RHEL-9": {"builds": [{"a-1-1": {"is_signed": false}}]}}))
            });

        let builds = builds_with_summary(&api, "99").await.unwrap();
        assert_eq!(builds.signing_summary.total_builds, 1);
        assert_eq!(builds.signing_summary.unsigned_builds, vec!["a-1-1"]);
        assert_eq!(builds.builds_list["RHEL-9"]["builds"][0]["a-1-1"]["is_signed"], false);
    }
}
