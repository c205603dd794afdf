//! MCP server: picks a transport from config and runs it until cancelled.

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use super::http;
use super::router::McpRouter;
use super::stdio;
use crate::types::{Result, ServerConfig, Transport};

/// MCP server wrapping the router.
#[derive(Debug)]
pub struct McpServer {
    router: Arc<McpRouter>,
    config: ServerConfig,
    cancel: CancellationToken,
}

impl McpServer {
    pub fn new(router: McpRouter, config: ServerConfig) -> Self {
        Self {
            router: Arc::new(router),
            config,
            cancel: CancellationToken::new(),
        }
    }

    pub fn transport(&self) -> Transport {
        self.config.transport
    }

    /// Run the configured transport until cancelled, EOF (stdio), or a fatal error.
    ///
    /// Bind and socket failures surface as [`crate::Error::Io`].
    pub async fn serve(&self) -> Result<()> {
        match self.config.transport {
            Transport::Stdio => {
                stdio::serve_stdio(self.router.clone(), self.cancel.clone()).await?;
                Ok(())
            }
            Transport::Sse | Transport::StreamableHttp => {
                let listener = TcpListener::bind(self.config.bind_addr()).await?;
                self.serve_with_listener(listener).await
            }
        }
    }

    /// Serve the HTTP transports on an already-bound listener.
    pub async fn serve_with_listener(&self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr()?;
        match self.config.transport {
            Transport::StreamableHttp => {
                tracing::info!("MCP server listening on http://{}/mcp", addr)
            }
            _ => tracing::info!("MCP server listening on http://{}/sse", addr),
        }

        let cancel = self.cancel.clone();
        axum::serve(listener, http::app(self.router.clone()))
            .with_graceful_shutdown(async move {
                cancel.cancelled().await;
                tracing::info!("MCP server shutting down");
            })
            .await?;
        Ok(())
    }

    /// Request graceful shutdown.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
