//! HTTP transports: legacy SSE (`GET /sse` + `POST /messages/`) and
//! streamable HTTP (`POST /mcp`).

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::{stream, Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::protocol::{JsonRpcResponse, PARSE_ERROR};
use super::router::McpRouter;

/// Outbound queue depth per SSE session.
const SESSION_CHANNEL_CAPACITY: usize = 32;

type Sessions = Arc<Mutex<HashMap<Uuid, mpsc::Sender<JsonRpcResponse>>>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    router: Arc<McpRouter>,
    sessions: Sessions,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &session_count(&self.sessions))
            .finish()
    }
}

fn session_count(sessions: &Sessions) -> usize {
    sessions.lock().map(|s| s.len()).unwrap_or(0)
}

/// Build the axum application serving every HTTP transport.
pub fn app(router: Arc<McpRouter>) -> Router {
    let state = AppState {
        router,
        sessions: Arc::new(Mutex::new(HashMap::new())),
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/sse", get(open_sse))
        .route("/messages", post(post_message))
        .route("/messages/", post(post_message))
        .route("/mcp", post(post_mcp))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Removes the session entry when the event stream is dropped.
struct SessionGuard {
    id: Uuid,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(&self.id);
        }
        tracing::debug!(session = %self.id, "SSE session closed");
    }
}

/// Open an SSE session. The first event tells the client where to POST.
async fn open_sse(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let id = Uuid::new_v4();
    let (tx, rx) = mpsc::channel::<JsonRpcResponse>(SESSION_CHANNEL_CAPACITY);
    if let Ok(mut sessions) = state.sessions.lock() {
        sessions.insert(id, tx);
    }
    tracing::info!(session = %id, "SSE session opened");

    let guard = SessionGuard {
        id,
        sessions: state.sessions.clone(),
    };
    let endpoint = format!("/messages/?session_id={}", id.simple());

    let first = stream::once(async move {
        Ok::<_, Infallible>(Event::default().event("endpoint").data(endpoint))
    });
    let messages = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let response = rx.recv().await?;
        let data = serde_json::to_string(&response).unwrap_or_default();
        Some((
            Ok::<_, Infallible>(Event::default().event("message").data(data)),
            (rx, guard),
        ))
    });

    Sse::new(first.chain(messages)).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session_id: String,
}

/// Accept a client message for an SSE session; the reply goes out on the stream.
async fn post_message(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    body: String,
) -> Response {
    let Ok(session_id) = Uuid::parse_str(&query.session_id) else {
        return (StatusCode::BAD_REQUEST, "Invalid session ID").into_response();
    };

    let sender = state
        .sessions
        .lock()
        .ok()
        .and_then(|sessions| sessions.get(&session_id).cloned());
    let Some(sender) = sender else {
        return (StatusCode::NOT_FOUND, "Could not find session").into_response();
    };

    let message: Value = match serde_json::from_str(&body) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(session = %session_id, "Unparseable message: {}", e);
            return (StatusCode::BAD_REQUEST, "Could not parse message").into_response();
        }
    };

    let router = state.router.clone();
    tokio::spawn(async move {
        if let Some(response) = router.handle_message(message).await {
            if sender.send(response).await.is_err() {
                tracing::debug!(session = %session_id, "SSE session gone before reply");
            }
        }
    });

    (StatusCode::ACCEPTED, "Accepted").into_response()
}

/// Streamable HTTP: one JSON-RPC message in, one JSON response out.
async fn post_mcp(State(state): State<AppState>, body: String) -> Response {
    let message: Value = match serde_json::from_str(&body) {
        Ok(message) => message,
        Err(e) => {
            let error =
                JsonRpcResponse::error(None, PARSE_ERROR, &format!("Parse error: {}", e));
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    match state.router.handle_message(message).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
