//! MCP server over newline-delimited JSON-RPC on stdio
//!
//! Each input line is handled on its own task so slow remote calls do not
//! block later requests. Responses are funnelled through a single writer task
//! and may be emitted out of order; callers correlate them by `id`.

use crate::dispatcher::Dispatcher;
use crate::error::{ServerError, ServerResult};
use crate::protocol::{
    InitializeResult, InvocationRequest, JsonRpcRequest, JsonRpcResponse, ServerCapabilities,
    ServerInfo, ToolsCapability, ToolsListResult, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};
use crate::rpc_span;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn, Instrument};

/// JSON-RPC front end for a [`Dispatcher`]
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self::with_name(dispatcher, env!("CARGO_PKG_NAME"))
    }

    pub fn with_name(dispatcher: Arc<Dispatcher>, name: impl Into<String>) -> Self {
        Self {
            dispatcher,
            info: ServerInfo {
                name: name.into(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Handle one raw JSON-RPC message
    ///
    /// Returns the serialized response line, or `None` for notifications.
    pub async fn handle_message(&self, message: &str) -> Option<String> {
        self.dispatcher.metrics().request_received();

        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Unparseable JSON-RPC message");
                self.dispatcher.metrics().parse_error();
                return encode(JsonRpcResponse::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        if !value.is_object() {
            return encode(JsonRpcResponse::error(id, INVALID_REQUEST, "Invalid Request"));
        }

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return encode(JsonRpcResponse::error(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid Request: {e}"),
                ));
            }
        };

        let span = rpc_span!(method = %request.method);
        self.handle_request(request).instrument(span).await
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Option<String> {
        if request.is_notification() || request.method.starts_with("notifications/") {
            debug!("Notification received");
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        if request.jsonrpc != "2.0" {
            return encode(JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                "Invalid Request: jsonrpc must be \"2.0\"",
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => respond(id, &self.initialize_result()),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => respond(
                id,
                &ToolsListResult {
                    tools: self.dispatcher.list_tools(),
                },
            ),
            "tools/call" => match serde_json::from_value::<InvocationRequest>(request.params) {
                Ok(invocation) => {
                    let result = self.dispatcher.invoke_request(invocation).await;
                    respond(id, &result)
                }
                Err(e) => JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {e}")),
            },
            method => {
                debug!(method, "Unknown method");
                JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {method}"))
            }
        };

        encode(response)
    }

    fn initialize_result(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: self.info.clone(),
        }
    }

    /// Serve requests from `reader`, writing responses to `writer`, until EOF
    ///
    /// In-flight invocations are allowed to finish before returning.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, writer: W) -> ServerResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        let writer_task = tokio::spawn(write_responses(
            writer,
            rx,
            self.dispatcher.metrics().clone(),
        ));

        let mut lines = BufReader::new(reader).lines();
        let mut in_flight = JoinSet::new();
        let mut read_error = None;

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        let server = self.clone();
                        let tx = tx.clone();
                        in_flight.spawn(async move {
                            if let Some(response) = server.handle_message(&line).await {
                                // Receiver only closes if the writer failed; that error surfaces below
                                let _ = tx.send(response);
                            }
                        });
                    }
                    Ok(None) => {
                        debug!("Input closed");
                        break;
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to read from input");
                        read_error = Some(e);
                        break;
                    }
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    log_task_outcome(joined);
                }
            }
        }

        if !in_flight.is_empty() {
            info!(pending = in_flight.len(), "Waiting for in-flight requests");
        }
        while let Some(joined) = in_flight.join_next().await {
            log_task_outcome(joined);
        }

        drop(tx);
        writer_task
            .await
            .map_err(|e| ServerError::internal_error(format!("writer task failed: {e}")))??;

        match read_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Serve on the process's stdin and stdout
    pub async fn run_stdio(self: Arc<Self>) -> ServerResult<()> {
        info!(server = %self.info.name, "Serving MCP over stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }
}

async fn write_responses<W>(
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<String>,
    metrics: Arc<crate::observability::MetricsCollector>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        metrics.response_written();
    }
    Ok(())
}

fn log_task_outcome(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            error!(error = %e, "Request handler panicked");
        } else {
            warn!(error = %e, "Request handler cancelled");
        }
    }
}

fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Internal error: {e}")),
    }
}

fn encode(response: JsonRpcResponse) -> Option<String> {
    match serde_json::to_string(&response) {
        Ok(line) => Some(line),
        Err(e) => {
            error!(error = %e, "Failed to serialize response");
            None
        }
    }
}
