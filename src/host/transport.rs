//! JSON-RPC 2.0 framing for the editor host.
//!
//! One message per line over stdio. `decode_request` turns a raw line into a
//! request or the error response the host should get back; `encode_response`
//! produces the outgoing line.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The only protocol version the server speaks.
pub const JSONRPC_VERSION: &str = "2.0";

/// A request or notification from the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    /// Absent (null) for notifications.
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Builds a request; handy for hosts embedding the server in-process.
    pub fn new(id: Value, method: &str, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.to_string(),
            params,
        }
    }

    /// Notifications carry no id and get no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_null()
    }

    /// Rejects anything but a `"2.0"` envelope.
    pub fn check_version(&self) -> Result<(), JsonRpcError> {
        if self.jsonrpc == JSONRPC_VERSION {
            Ok(())
        } else {
            Err(JsonRpcError::new(
                ErrorCode::InvalidRequest,
                format!("unsupported jsonrpc version '{}'", self.jsonrpc),
            ))
        }
    }
}

/// A response to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: ErrorCode, message: String) -> Self {
        Self::failure(id, JsonRpcError::new(code, message))
    }

    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code: code.as_i32(),
            message,
            data: None,
        }
    }
}

/// Error codes used by the host server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    /// Valid JSON that is not a 2.0 request.
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    /// Also used for failed refreshes; the previous snapshot stays live.
    InternalError,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }
}

/// Decodes one line from the host.
///
/// Malformed JSON yields a `ParseError` response with a null id. JSON that is
/// not a request object yields `InvalidRequest`, echoing the id when one can
/// be recovered. The version is checked later, at dispatch.
pub fn decode_request(line: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        JsonRpcResponse::error(
            Value::Null,
            ErrorCode::ParseError,
            format!("failed to parse JSON-RPC message: {}", e),
        )
    })?;

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| {
        JsonRpcResponse::error(
            id,
            ErrorCode::InvalidRequest,
            format!("not a JSON-RPC request: {}", e),
        )
    })
}

/// Serializes a response as one newline-terminated line.
pub fn encode_response(response: &JsonRpcResponse) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(response)?;
    line.push('\n');
    Ok(line)
}
