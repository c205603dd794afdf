//! stdio transport: newline-delimited JSON-RPC on stdin/stdout.

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use super::router::McpRouter;

/// Serve the process's stdin/stdout until EOF or cancellation.
pub async fn serve_stdio(router: Arc<McpRouter>, cancel: CancellationToken) -> std::io::Result<()> {
    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve_lines(router, reader, writer, cancel).await
}

/// Line loop over any reader/writer pair.
pub async fn serve_lines<R, W>(
    router: Arc<McpRouter>,
    mut reader: R,
    mut writer: W,
    cancel: CancellationToken,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tracing::info!("MCP server listening on stdio");
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("stdio transport shutting down");
                break;
            }
            read = reader.read_line(&mut line) => read?,
        };

        if bytes_read == 0 {
            tracing::info!("EOF received, shutting down");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        tracing::debug!("Received: {}", trimmed);

        let Some(response) = router.handle_line(trimmed).await else {
            continue;
        };

        let response_str = serde_json::to_string(&response)? + "\n";
        tracing::debug!("Sending: {}", response_str.trim());
        writer.write_all(response_str.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errata::MockErrataApi;
    use crate::tools::ErrataTools;
    use serde_json::Value;

    #[tokio::test]
    async fn answers_requests_and_skips_notifications() {
        let router = Arc::new(McpRouter::new(ErrataTools::new(Arc::new(
            MockErrataApi::new(),
        ))));
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            "\n",
        );
        let mut output = Vec::new();

        serve_lines(
            router,
            input.as_bytes(),
            &mut output,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["id"], 2);
        assert_eq!(lines[1]["result"], serde_json::json!({}));
    }
}
