//! MCP protocol surface: JSON-RPC types, the method router, and transports.
//!
//! Every transport feeds decoded messages into the same [`McpRouter`], so
//! stdio, SSE and streamable HTTP behave identically apart from framing.

pub mod http;
pub mod protocol;
pub mod router;
pub mod server;
pub mod stdio;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_VERSION, SERVER_NAME};
pub use router::McpRouter;
pub use server::McpServer;
