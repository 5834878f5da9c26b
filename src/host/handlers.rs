//! Method handlers for the host server.
//!
//! Each method maps to a `ResLens` operation. Params are deserialized into
//! typed structs; a params mismatch becomes an `InvalidParams` error.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::transport::ErrorCode;
use crate::reslens::ResLens;
use crate::resolution::join_path;
use crate::types::{Position, ResourceId};

/// Methods answered by the host server, advertised from `initialize`.
pub const METHODS: &[&str] = &[
    "initialize",
    "ping",
    "refresh",
    "status",
    "document/scan",
    "document/hover",
    "document/completion",
    "resource/path",
    "resource/tree",
];

/// A failed method call, ready to become a JSON-RPC error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodError {
    pub code: ErrorCode,
    pub message: String,
}

impl MethodError {
    fn invalid_params(message: String) -> Self {
        Self {
            code: ErrorCode::InvalidParams,
            message,
        }
    }
}

pub type MethodResult = std::result::Result<Value, MethodError>;

#[derive(Debug, Deserialize)]
struct ScanParams {
    text: String,
    #[serde(default)]
    cursor: Option<Position>,
}

#[derive(Debug, Deserialize)]
struct HoverParams {
    text: String,
    position: Position,
}

#[derive(Debug, Deserialize)]
struct CompletionParams {
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    position: Option<Position>,
}

#[derive(Debug, Deserialize)]
struct PathParams {
    id: ResourceId,
}

fn parse_params<T: DeserializeOwned>(method: &str, params: Option<&Value>) -> Result<T, MethodError> {
    let value = params.cloned().unwrap_or_else(|| json!({}));
    serde_json::from_value(value)
        .map_err(|e| MethodError::invalid_params(format!("invalid params for {}: {}", method, e)))
}

fn to_value<T: serde::Serialize>(value: &T) -> MethodResult {
    serde_json::to_value(value).map_err(|e| MethodError {
        code: ErrorCode::InternalError,
        message: format!("failed to serialize result: {}", e),
    })
}

/// `refresh`: fetch and publish a new snapshot.
pub async fn handle_refresh(lens: &ResLens) -> MethodResult {
    match lens.refresh().await {
        Ok(outcome) => to_value(&outcome),
        Err(e) => Err(MethodError {
            code: ErrorCode::InternalError,
            message: format!("refresh failed: {}", e),
        }),
    }
}

/// `document/scan`: `{text, cursor?}` to a `ScanResult`.
pub fn handle_scan(lens: &ResLens, params: Option<&Value>) -> MethodResult {
    let p: ScanParams = parse_params("document/scan", params)?;
    to_value(&lens.scan(&p.text, p.cursor))
}

/// `document/hover`: `{text, position}` to a `HoverPayload` or null.
pub fn handle_hover(lens: &ResLens, params: Option<&Value>) -> MethodResult {
    let p: HoverParams = parse_params("document/hover", params)?;
    to_value(&lens.hover(&p.text, p.position))
}

/// `document/completion`: `{prefix}` or `{text, position}` to completion items.
pub fn handle_completion(lens: &ResLens, params: Option<&Value>) -> MethodResult {
    let p: CompletionParams = parse_params("document/completion", params)?;
    let items = match (p.prefix, p.text, p.position) {
        (Some(prefix), _, _) => lens.completions(&prefix),
        (None, Some(text), Some(position)) => lens.completions_at(&text, position),
        _ => {
            return Err(MethodError::invalid_params(
                "document/completion needs 'prefix' or 'text' and 'position'".to_string(),
            ))
        }
    };
    to_value(&items)
}

/// `resource/path`: `{id}` to `{path, segments}` or null.
pub fn handle_path(lens: &ResLens, params: Option<&Value>) -> MethodResult {
    let p: PathParams = parse_params("resource/path", params)?;
    let key = p.id.key();
    match lens.resolve(&key) {
        Some(segments) => Ok(json!({
            "id": p.id,
            "path": join_path(&segments, &lens.config().path_delimiter),
            "segments": segments,
        })),
        None => Ok(Value::Null),
    }
}

/// `resource/tree`: the forest for the live snapshot.
pub fn handle_tree(lens: &ResLens) -> MethodResult {
    to_value(&lens.forest())
}
