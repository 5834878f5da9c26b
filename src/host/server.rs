//! Host server that reads JSON-RPC 2.0 messages from stdin and writes
//! responses to stdout.
//!
//! An editor extension spawns the server, forwards document and selection
//! events as `document/*` requests and renders what comes back. `refresh`
//! runs as a background task so document requests keep being answered from
//! the current snapshot while a fetch is in flight. All responses go through
//! a single writer task.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::errors::Result;
use crate::reslens::ResLens;

use super::handlers::{self, METHODS};
use super::transport::{decode_request, encode_response, ErrorCode, JsonRpcRequest, JsonRpcResponse};

/// Runtime counters for the host server.
pub struct ServerStats {
    started_at: Instant,
    total_requests: AtomicU64,
    errors: AtomicU64,
}

impl ServerStats {
    fn new() -> Self {
        Self {
            started_at: Instant::now(),
            total_requests: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
}

/// The host server wrapping a `ResLens` session.
pub struct HostServer {
    lens: ResLens,
    stats: ServerStats,
    method_counts: Mutex<HashMap<String, u64>>,
}

impl HostServer {
    pub fn new(lens: ResLens) -> Self {
        Self {
            lens,
            stats: ServerStats::new(),
            method_counts: Mutex::new(HashMap::new()),
        }
    }

    /// Serves requests from stdin until it closes.
    pub async fn run(self: Arc<Self>) -> Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serves line-delimited requests from `reader`, writing responses to
    /// `writer`, until `reader` reaches end of input.
    ///
    /// Refreshes still running at that point are cancelled; the store never
    /// publishes a partial fetch.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer_task = tokio::spawn(write_responses(writer, rx));
        let mut background = JoinSet::new();
        let mut lines = reader.lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "failed to read request; stopping");
                    break;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let request = match decode_request(line) {
                Ok(request) => request,
                Err(response) => {
                    if tx.send(response).is_err() {
                        break;
                    }
                    continue;
                }
            };

            if request.method == "refresh" {
                let server = Arc::clone(&self);
                let tx = tx.clone();
                background.spawn(async move {
                    if let Some(response) = server.handle_request(&request).await {
                        // The writer is gone only when the server is stopping.
                        let _ = tx.send(response);
                    }
                });
            } else if let Some(response) = self.handle_request(&request).await {
                if tx.send(response).is_err() {
                    warn!("response writer stopped; stopping");
                    break;
                }
            }

            while background.try_join_next().is_some() {}
        }

        background.shutdown().await;
        drop(tx);
        if let Err(e) = writer_task.await {
            error!(error = %e, "response writer failed");
        }
        debug!("input closed; host server exiting");
        Ok(())
    }

    /// Dispatches one request. Returns `None` for notifications.
    pub async fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut counts) = self.method_counts.lock() {
            *counts.entry(request.method.clone()).or_insert(0) += 1;
        }
        debug!(method = %request.method, "host request");

        if let Err(e) = request.check_version() {
            if request.is_notification() {
                return None;
            }
            self.stats.errors.fetch_add(1, Ordering::Relaxed);
            return Some(JsonRpcResponse::failure(request.id.clone(), e));
        }

        let params = request.params.as_ref();
        let result = match request.method.as_str() {
            "initialized" | "notifications/initialized" => Ok(json!({})),
            "initialize" => Ok(self.initialize_result()),
            "ping" => Ok(json!({})),
            "refresh" => handlers::handle_refresh(&self.lens).await,
            "status" => Ok(self.status_json()),
            "document/scan" => handlers::handle_scan(&self.lens, params),
            "document/hover" => handlers::handle_hover(&self.lens, params),
            "document/completion" => handlers::handle_completion(&self.lens, params),
            "resource/path" => handlers::handle_path(&self.lens, params),
            "resource/tree" => handlers::handle_tree(&self.lens),
            other => Err(handlers::MethodError {
                code: ErrorCode::MethodNotFound,
                message: format!("method not found: {}", other),
            }),
        };

        if request.is_notification() {
            return None;
        }

        let id = request.id.clone();
        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                JsonRpcResponse::error(id, e.code, e.message)
            }
        })
    }

    fn initialize_result(&self) -> Value {
        json!({
            "serverInfo": {
                "name": "reslens",
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "methods": METHODS,
                "tokenIdent": self.lens.config().token_ident,
                "pathDelimiter": self.lens.config().path_delimiter,
            }
        })
    }

    /// Server counters plus a summary of the live snapshot.
    pub fn status_json(&self) -> Value {
        let snapshot = self.lens.snapshot();
        let method_counts: Value = self
            .method_counts
            .lock()
            .map(|counts| json!(*counts))
            .unwrap_or(json!({}));

        json!({
            "uptime_secs": self.stats.started_at.elapsed().as_secs(),
            "total_requests": self.stats.total_requests.load(Ordering::Relaxed),
            "errors": self.stats.errors.load(Ordering::Relaxed),
            "method_counts": method_counts,
            "source": self.lens.source_description(),
            "snapshot": {
                "generation": snapshot.generation(),
                "records": snapshot.len(),
                "fingerprint": snapshot.fingerprint(),
            }
        })
    }
}

/// Drains `rx`, writing one response per line, until every sender is gone
/// or the output closes.
async fn write_responses<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let line = match encode_response(&response) {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                continue;
            }
        };
        if let Err(e) = writer.write_all(line.as_bytes()).await {
            warn!(error = %e, "failed to write response; stopping");
            break;
        }
        if let Err(e) = writer.flush().await {
            warn!(error = %e, "failed to flush output; stopping");
            break;
        }
    }
}
