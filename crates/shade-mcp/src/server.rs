//! MCP Server implementation
//!
//! Dispatches JSON-RPC requests against a shared [`ToolRegistry`]. Each line
//! read from the transport is handled in its own task, so slow tool calls do
//! not hold up the rest of the session; a single writer serializes responses.

use std::sync::Arc;

use serde_json::{Value, json};
use shade_registry::ToolRegistry;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::protocol::{
    InitializeParams, InitializeResult, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION,
    ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability, codes,
};
use crate::tools::ToolResult;
use crate::{Error, Result};

/// MCP server exposing a tool registry
///
/// Cloning is cheap; clones share the registry.
///
/// # Example
///
/// ```no_run
/// use shade_mcp::ShadeMcpServer;
/// use shade_registry::ToolRegistry;
///
/// # async fn run() -> shade_mcp::Result<()> {
/// let server = ShadeMcpServer::new(ToolRegistry::new(), "shade-mcp");
/// server.serve_stdio().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ShadeMcpServer {
    registry: Arc<ToolRegistry>,
    name: String,
}

impl ShadeMcpServer {
    pub fn new(registry: ToolRegistry, name: impl Into<String>) -> Self {
        Self::from_shared(Arc::new(registry), name)
    }

    pub fn from_shared(registry: Arc<ToolRegistry>, name: impl Into<String>) -> Self {
        Self {
            registry,
            name: name.into(),
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serve over the process's stdin and stdout until stdin closes
    pub async fn serve_stdio(&self) -> Result<()> {
        tracing::info!(
            server = %self.name,
            tools = self.registry.len(),
            "MCP server ready, listening on stdio"
        );
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Serve line-delimited JSON-RPC from `reader`, answering on `writer`.
    ///
    /// Returns the writer once the reader hits EOF and every in-flight
    /// request has been answered.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<W>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let read = async move {
            let mut reader = reader;
            let mut buf = Vec::new();
            let mut tasks = JoinSet::new();

            let outcome = loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf).await {
                    Ok(0) => break Ok(()),
                    Ok(_) => {}
                    Err(e) => break Err(Error::from(e)),
                }

                let line = match std::str::from_utf8(&buf) {
                    Ok(line) => line.trim().to_string(),
                    Err(e) => {
                        tracing::debug!(error = %e, "Message is not valid UTF-8");
                        if let Some(response) = parse_error(format!("Parse error: {}", e)) {
                            let _ = tx.send(response);
                        }
                        continue;
                    }
                };
                if line.is_empty() {
                    continue;
                }
                tracing::debug!(request = %line, "Received message");

                let server = self.clone();
                let tx = tx.clone();
                tasks.spawn(async move {
                    if let Some(response) = server.respond(&line).await {
                        // The writer only goes away on a broken transport
                        let _ = tx.send(response);
                    }
                });

                while let Some(joined) = tasks.try_join_next() {
                    log_join(joined);
                }
            };

            // In-flight calls are answered even when the reader failed
            while let Some(joined) = tasks.join_next().await {
                log_join(joined);
            }
            outcome
        };

        let write = async move {
            while let Some(response) = rx.recv().await {
                writer.write_all(response.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<W, Error>(writer)
        };

        let (read, write) = tokio::join!(read, write);
        read?;
        write
    }

    async fn respond(&self, message: &str) -> Option<String> {
        match self.handle_message(message).await {
            Ok(response) if response.is_empty() => None,
            Ok(response) => Some(response),
            Err(e) => {
                tracing::error!(error = %e, "Failed to handle message");
                let response = JsonRpcResponse::error(
                    None,
                    codes::INTERNAL_ERROR,
                    format!("Internal error: {}", e),
                );
                serde_json::to_string(&response).ok()
            }
        }
    }

    /// Handle a single MCP message
    ///
    /// Returns the serialized response, or an empty string when the
    /// message was a notification.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let raw: Value = match serde_json::from_str(message) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(error = %e, "Unparseable message");
                let response =
                    JsonRpcResponse::error(None, codes::PARSE_ERROR, format!("Parse error: {}", e));
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(raw.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = raw.get("id").cloned().filter(|id| !id.is_null());
                let response = JsonRpcResponse::error(
                    id,
                    codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                );
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
            return Ok(String::new());
        };
        let id = Some(id);

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params)?,
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id)?,
            "tools/call" => self.handle_tools_call(id, request.params).await?,
            _ => JsonRpcResponse::error(
                id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "initialized" | "notifications/initialized" => {
                tracing::info!("Client initialized");
            }
            method => tracing::debug!(method, "Ignoring notification"),
        }
    }

    fn handle_initialize(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        match serde_json::from_value::<InitializeParams>(params) {
            Ok(params) => tracing::info!(
                client = %params.client_info.name,
                client_version = %params.client_info.version,
                protocol = %params.protocol_version,
                "Initialize"
            ),
            Err(e) => tracing::debug!(error = %e, "Initialize without client info"),
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: self.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_tools_list(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        let tools = self.registry.list();
        tracing::debug!(count = tools.len(), "Listing tools");
        Ok(JsonRpcResponse::success(id, json!({ "tools": tools })))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                ));
            }
        };

        let outcome = self.registry.invoke(&params.name, params.arguments).await;
        if let Err(err) = &outcome {
            tracing::info!(
                tool = %params.name,
                kind = err.kind(),
                error = %err,
                "Tool call failed"
            );
        }

        let result = ToolResult::from_outcome(outcome);
        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }
}

fn parse_error(message: String) -> Option<String> {
    serde_json::to_string(&JsonRpcResponse::error(None, codes::PARSE_ERROR, message)).ok()
}

fn log_join(joined: std::result::Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!(error = %e, "Request task failed");
    }
}
