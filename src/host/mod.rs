//! Host integration server.
//!
//! Line-delimited JSON-RPC 2.0 over stdio. The host sends buffer text, cursor
//! positions and refresh commands; the server answers with annotations,
//! status text, hover payloads and completion items.

/// Method handlers.
pub mod handlers;

/// Stdio server loop and dispatch.
pub mod server;

/// JSON-RPC 2.0 message types.
pub mod transport;

pub use handlers::{MethodError, METHODS};
pub use server::HostServer;
pub use transport::{ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
