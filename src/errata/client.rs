//! reqwest-backed Errata Tool client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use super::models::{AdvisoryInfo, ErratumResponse, Product, ProductResponse};
use super::ErrataApi;
use crate::types::{AdvisoryId, Error, ErrataConfig, Result};

/// Credentials sent with every request.
///
/// SPNEGO negotiation happens outside this process; the server only forwards
/// a header value that was negotiated beforehand.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    Anonymous,
    /// Full `Authorization` header value, e.g. `Negotiate YIIC...`.
    Authorization(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Anonymous => f.write_str("Anonymous"),
            Credentials::Authorization(_) => f.write_str("Authorization(<redacted>)"),
        }
    }
}

impl Credentials {
    pub fn from_config(config: &ErrataConfig) -> Self {
        match config.authorization.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Credentials::Authorization(value.to_string()),
            _ => Credentials::Anonymous,
        }
    }
}

/// HTTP client for the Errata Tool REST API.
#[derive(Debug, Clone)]
pub struct ErrataClient {
    http: reqwest::Client,
    base_url: String,
}

impl ErrataClient {
    /// Create a client against `base_url` using system trust roots.
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        Self::build(base_url.into(), credentials, timeout, None)
    }

    /// Create a client from startup configuration, loading the CA bundle if
    /// one is configured or discovered.
    pub fn from_config(config: &ErrataConfig) -> Result<Self> {
        let ca_bundle = config.resolved_ca_bundle();
        match &ca_bundle {
            Some(path) => tracing::info!("Using CA bundle {}", path.display()),
            None => tracing::warn!("No internal CA bundle found in standard locations; using system roots"),
        }
        Self::build(
            config.resolved_base_url(),
            Credentials::from_config(config),
            config.request_timeout,
            ca_bundle.as_deref(),
        )
    }

    fn build(
        base_url: String,
        credentials: Credentials,
        timeout: Duration,
        ca_bundle: Option<&Path>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Credentials::Authorization(value) = &credentials {
            let mut value = HeaderValue::from_str(value)
                .map_err(|e| Error::config(format!("invalid authorization header: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!("errata-mcp/", env!("CARGO_PKG_VERSION")));

        if let Some(path) = ca_bundle {
            let pem = std::fs::read(path).map_err(|e| {
                Error::config(format!("failed to read CA bundle {}: {}", path.display(), e))
            })?;
            let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
                Error::config(format!("invalid CA bundle {}: {}", path.display(), e))
            })?;
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }

        let http = builder
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Web UI link for an advisory.
    pub fn advisory_url(&self, id: AdvisoryId) -> String {
        format!("{}/advisory/{}", self.base_url, id)
    }

    /// GET `path` and decode the JSON body. `what` names the resource in errors.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "GET");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(e, what))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(Error::authentication(format!(
                    "Errata Tool rejected credentials for {} (HTTP {}); check the Kerberos ticket",
                    what,
                    status.as_u16()
                )));
            }
            StatusCode::NOT_FOUND => {
                return Err(Error::not_found(what.to_string()));
            }
            s if !s.is_success() => {
                return Err(Error::remote(format!(
                    "Errata Tool returned HTTP {} for {}",
                    s.as_u16(),
                    what
                )));
            }
            _ => {}
        }

        // The client timeout also covers the body, so a stall here is a timeout too.
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, what))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn transport_error(err: reqwest::Error, what: &str) -> Error {
    if err.is_timeout() {
        Error::timeout(format!("{} request timed out", what))
    } else {
        Error::Http(err)
    }
}

#[async_trait]
impl ErrataApi for ErrataClient {
    async fn product(&self, name: &str) -> Result<Product> {
        let body: ProductResponse = self
            .get_json(&format!("/products/{}.json", name), &format!("product {}", name))
            .await?;
        Ok(body.into_product(name))
    }

    async fn advisory(&self, id: AdvisoryId) -> Result<AdvisoryInfo> {
        let what = format!("advisory {}", id);
        let body: ErratumResponse = self
            .get_json(&format!("/api/v1/erratum/{}", id), &what)
            .await?;
        body.into_info(id, self.advisory_url(id), chrono::Utc::now())
            .ok_or_else(|| Error::remote(format!("{} response has no errata record", what)))
    }

    async fn builds_list(&self, id: AdvisoryId) -> Result<Value> {
        self.get_json(
            &format!("/api/v1/erratum/{}/builds_list?with_sig_key=1", id),
            &format!("builds list for advisory {}", id),
        )
        .await
    }
}
