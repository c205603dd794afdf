//! Configuration structures.
//!
//! Configuration is assembled once at startup from CLI flags and environment
//! variables; nothing reads it after the server is running.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::types::Error;

/// Production Errata Tool.
pub const PRODUCTION_URL: &str = "https://errata.devel.redhat.com";

/// Staging Errata Tool.
pub const STAGING_URL: &str = "https://errata.stage.engineering.redhat.com";

/// Locations probed for the internal CA bundle when none is configured.
pub const DEFAULT_CA_BUNDLE_PATHS: &[&str] = &[
    "/etc/pki/tls/certs/2015-RH-IT-Root-CA.pem",
    "/etc/pki/tls/certs/ca-bundle.crt",
    "/etc/pki/ca-trust/source/anchors/RH-IT-Root-CA.crt",
];

/// Global server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Errata Tool connection settings.
    #[serde(default)]
    pub errata: ErrataConfig,

    /// MCP transport settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Errata Tool connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrataConfig {
    /// Explicit base URL; wins over `staging`.
    pub base_url: Option<String>,

    /// Use the staging instance instead of production.
    pub staging: bool,

    /// PEM bundle with extra trust roots.
    pub ca_bundle: Option<PathBuf>,

    /// Pre-negotiated `Authorization` header value (e.g. `Negotiate <token>`).
    pub authorization: Option<String>,

    /// Kerberos credential cache reference. Logged only.
    pub credential_cache: Option<String>,

    /// Per-request network timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ErrataConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            staging: false,
            ca_bundle: None,
            authorization: None,
            credential_cache: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ErrataConfig {
    /// Base URL the client talks to, without a trailing slash.
    pub fn resolved_base_url(&self) -> String {
        let url = match &self.base_url {
            Some(url) if !url.trim().is_empty() => url.trim(),
            _ if self.staging => STAGING_URL,
            _ => PRODUCTION_URL,
        };
        url.trim_end_matches('/').to_string()
    }

    /// The configured CA bundle, or the first default location that exists.
    pub fn resolved_ca_bundle(&self) -> Option<PathBuf> {
        if let Some(path) = &self.ca_bundle {
            return Some(path.clone());
        }
        discover_ca_bundle(DEFAULT_CA_BUNDLE_PATHS.iter().map(Path::new))
    }
}

/// Return the first candidate path that exists on disk.
pub fn discover_ca_bundle<'a>(candidates: impl IntoIterator<Item = &'a Path>) -> Option<PathBuf> {
    candidates
        .into_iter()
        .find(|path| path.exists())
        .map(Path::to_path_buf)
}

/// MCP transport selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout.
    Stdio,
    /// Legacy HTTP+SSE transport (`GET /sse`, `POST /messages/`).
    #[default]
    Sse,
    /// Streamable HTTP transport (`POST /mcp`).
    StreamableHttp,
}

impl FromStr for Transport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "sse" => Ok(Transport::Sse),
            "streamable-http" | "http" => Ok(Transport::StreamableHttp),
            other => Err(Error::config(format!(
                "unknown transport '{}', expected one of: stdio, sse, streamable-http",
                other
            ))),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transport::Stdio => "stdio",
            Transport::Sse => "sse",
            Transport::StreamableHttp => "streamable-http",
        };
        f.write_str(name)
    }
}

/// MCP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Transport used to talk to the MCP client.
    pub transport: Transport,

    /// Bind host for HTTP transports.
    pub host: String,

    /// Bind port for HTTP transports.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// `host:port` bind address for HTTP transports.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_defaults_to_production() {
        let config = ErrataConfig::default();
        assert_eq!(config.resolved_base_url(), PRODUCTION_URL);
    }

    #[test]
    fn staging_selects_staging_url() {
        let config = ErrataConfig {
            staging: true,
            ..Default::default()
        };
        assert_eq!(config.resolved_base_url(), STAGING_URL);
    }

    #[test]
    fn explicit_url_wins_and_is_trimmed() {
        let config = ErrataConfig {
            base_url: Some("http://localhost:3000/".to_string()),
            staging: true,
            ..Default::default()
        };
        assert_eq!(config.resolved_base_url(), "http://localhost:3000");
    }

    #[test]
    fn blank_url_falls_back() {
        let config = ErrataConfig {
            base_url: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_base_url(), PRODUCTION_URL);
    }

    #[test]
    fn transport_parsing() {
        assert_eq!("stdio".parse::<Transport>().unwrap(), Transport::Stdio);
        assert_eq!("SSE".parse::<Transport>().unwrap(), Transport::Sse);
        assert_eq!(
            "streamable-http".parse::<Transport>().unwrap(),
            Transport::StreamableHttp
        );
        assert_eq!("http".parse::<Transport>().unwrap(), Transport::StreamableHttp);
        assert!("websocket".parse::<Transport>().is_err());
        assert_eq!(Transport::StreamableHttp.to_string(), "streamable-http");
    }

    #[test]
    fn discover_ca_bundle_picks_first_existing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pem");
        let second = dir.path().join("second.pem");
        let third = dir.path().join("third.pem");
        std::fs::write(&second, "pem").unwrap();
        std::fs::write(&third, "pem").unwrap();

        let found = discover_ca_bundle([missing.as_path(), second.as_path(), third.as_path()]);
        assert_eq!(found, Some(second));
    }

    #[test]
    fn discover_ca_bundle_none_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pem");
        assert_eq!(discover_ca_bundle([missing.as_path()]), None);
    }

    #[test]
    fn configured_ca_bundle_is_not_probed() {
        let config = ErrataConfig {
            ca_bundle: Some(PathBuf::from("/nonexistent/ca.pem")),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_ca_bundle(),
            Some(PathBuf::from("/nonexistent/ca.pem"))
        );
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"errata": {"base_url": null, "staging": true, "ca_bundle": null,
                "authorization": null, "credential_cache": null, "request_timeout": "5s"}}"#,
        )
        .unwrap();
        assert!(config.errata.staging);
        assert_eq!(config.errata.request_timeout, Duration::from_secs(5));
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.transport, Transport::Sse);
    }
}
