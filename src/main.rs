//! Errata MCP server - main entry point.
//!
//! Serves the Errata Tool query tools over one MCP transport:
//! - stdio: newline-delimited JSON-RPC for local clients
//! - sse: `GET /sse` + `POST /messages/` (default)
//! - streamable-http: `POST /mcp`

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use errata_mcp::errata::ErrataClient;
use errata_mcp::mcp::{McpRouter, McpServer};
use errata_mcp::tools::ErrataTools;
use errata_mcp::types::{Config, ErrataConfig, ObservabilityConfig, ServerConfig, Transport};

#[derive(Debug, Parser)]
#[command(name = "errata-mcp-server")]
#[command(about = "MCP server for read-only Errata Tool queries", version)]
struct Cli {
    /// Errata Tool base URL (overrides --staging)
    #[arg(long, env = "ERRATA_URL")]
    errata_url: Option<String>,

    /// Use the staging Errata Tool instance
    #[arg(long, env = "ERRATA_STAGING", value_parser = clap::builder::BoolishValueParser::new())]
    staging: bool,

    /// MCP transport: stdio, sse or streamable-http
    #[arg(long, env = "MCP_TRANSPORT", default_value = "sse")]
    transport: Transport,

    /// Bind host for HTTP transports
    #[arg(long, env = "MCP_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Bind port for HTTP transports
    #[arg(long, env = "MCP_PORT", default_value = "8000")]
    port: u16,

    /// PEM bundle with the Errata Tool's CA
    #[arg(long, env = "REQUESTS_CA_BUNDLE")]
    ca_bundle: Option<PathBuf>,

    /// Kerberos credential cache (reported at startup)
    #[arg(long, env = "KRB5CCNAME")]
    credential_cache: Option<String>,

    /// Pre-negotiated Authorization header value, e.g. "Negotiate <token>"
    #[arg(long, env = "ERRATA_AUTHORIZATION", hide_env_values = true)]
    authorization: Option<String>,

    /// Per-request timeout, e.g. "30s" or "1m"
    #[arg(long, env = "ERRATA_TIMEOUT", default_value = "30s", value_parser = parse_duration)]
    timeout: Duration,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "ERRATA_MCP_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format: text or json
    #[arg(long, env = "ERRATA_MCP_LOG_FORMAT", default_value = "text")]
    log_format: String,
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime_serde::re::humantime::parse_duration(s).map_err(|e| e.to_string())
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            errata: ErrataConfig {
                base_url: self.errata_url,
                staging: self.staging,
                ca_bundle: self.ca_bundle,
                authorization: self.authorization,
                credential_cache: self.credential_cache,
                request_timeout: self.timeout,
            },
            server: ServerConfig {
                transport: self.transport,
                host: self.host,
                port: self.port,
            },
            observability: ObservabilityConfig {
                log_level: self.log_level,
                json_logs: self.log_format.eq_ignore_ascii_case("json"),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config();

    errata_mcp::observability::init_tracing(&config.observability);

    tracing::info!("Errata MCP server starting");
    tracing::info!("  Errata Tool: {}", config.errata.resolved_base_url());
    tracing::info!("  Transport: {}", config.server.transport);
    tracing::info!("  Request timeout: {:?}", config.errata.request_timeout);
    match &config.errata.credential_cache {
        Some(cache) => tracing::info!("  Credential cache: {}", cache),
        None => tracing::info!("  Credential cache: default"),
    }
    if config.errata.authorization.is_none() {
        tracing::warn!("No ERRATA_AUTHORIZATION set; requests are sent unauthenticated");
    }

    let client = ErrataClient::from_config(&config.errata)?;
    let tools = ErrataTools::new(Arc::new(client));
    let server = Arc::new(McpServer::new(McpRouter::new(tools), config.server));

    let signal_server = server.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received");
            signal_server.shutdown();
        }
    });

    server.serve().await?;
    Ok(())
}
