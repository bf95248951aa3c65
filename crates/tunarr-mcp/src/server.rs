//! MCP server over newline-delimited JSON-RPC 2.0.
//!
//! stdin carries one request or notification per line; stdout carries one
//! response or notification per line. Log notifications directed at the host
//! are fire-and-forget: a failed write never fails the request that
//! produced it.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};
use tunarr_client::TunarrClient;
use tunarr_core::{parse, Error, SearchRequest, ValidationError};

use crate::tools::{self, ChannelPageArgs};

/// MCP protocol revision this server speaks.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Logger name carried on every `notifications/message`.
const LOGGER: &str = "tunarr";

// =============================================================================
// JSON-RPC Error Codes
// =============================================================================

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

/// Parse one request line. The parser's recursion limit is disabled so
/// deeply nested filter trees survive the stdio boundary; the tree parser
/// downstream is iterative and imposes no depth cap of its own.
fn parse_line(line: &str) -> serde_json::Result<Value> {
    let mut de = serde_json::Deserializer::from_str(line);
    de.disable_recursion_limit();
    let value = Value::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

fn result_response(id: Value, result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "result": result})
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}})
}

/// Successful tool result: pretty-printed text plus the structured payload.
fn tool_result(structured: &Value) -> serde_json::Result<Value> {
    let text = serde_json::to_string_pretty(structured)?;
    Ok(json!({
        "content": [{"type": "text", "text": text}],
        "structuredContent": structured
    }))
}

/// Failed tool result, surfaced as content with `isError` rather than a
/// protocol-level error.
fn error_content(message: &str) -> Value {
    json!({
        "content": [{"type": "text", "text": message}],
        "isError": true
    })
}

// =============================================================================
// Outbound Frames
// =============================================================================

/// Write half of the transport.
struct Outbound<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> Outbound<W> {
    async fn send(&mut self, frame: &Value) -> std::io::Result<()> {
        let mut line = serde_json::to_vec(frame)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.writer.flush().await
    }

    /// Mirror an event to the host as `notifications/message`.
    /// Fire-and-forget.
    async fn log(&mut self, level: &str, message: &str, fields: Value) {
        let mut data = Map::new();
        data.insert("message".to_string(), Value::String(message.to_string()));
        if let Value::Object(extra) = fields {
            data.extend(extra);
        }
        let frame = json!({
            "jsonrpc": "2.0",
            "method": "notifications/message",
            "params": {
                "level": level,
                "logger": LOGGER,
                "data": data
            }
        });
        let _ = self.send(&frame).await;
    }
}

// =============================================================================
// Tool Dispatch Outcome
// =============================================================================

enum ToolError {
    /// No tool by that name; a protocol-level invalid-params error.
    Unknown,
    /// Arguments did not decode; a protocol-level invalid-params error.
    InvalidArguments(ValidationError),
    /// The tool ran and failed; an `isError` content result.
    Failed(String),
}

fn to_structured<T: serde::Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::Failed(e.to_string()))
}

// =============================================================================
// Server
// =============================================================================

/// The MCP stdio server: a Tunarr client plus the rendered tool list.
pub struct McpServer {
    client: TunarrClient,
    host: String,
    tools: Value,
}

impl McpServer {
    /// Build the server; the tool list is rendered once up front.
    pub fn new(client: TunarrClient, host: String) -> tunarr_core::Result<McpServer> {
        let tools = tools::definitions()?;
        Ok(McpServer {
            client,
            host,
            tools,
        })
    }

    /// Serve until the reader reaches end of input.
    pub async fn run<R, W>(&self, reader: R, writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut out = Outbound { writer };
        info!(host = %self.host, "Tunarr MCP server started");
        out.log(
            "info",
            "Tunarr MCP server started",
            json!({"host": self.host}),
        )
        .await;

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let message = match parse_line(&line) {
                Ok(value) => value,
                Err(e) => {
                    warn!(error = %e, "Discarding unparseable request line");
                    out.send(&error_response(Value::Null, PARSE_ERROR, "Parse error"))
                        .await?;
                    continue;
                }
            };
            if let Some(response) = self.handle(message, &mut out).await {
                out.send(&response).await?;
            }
        }
        info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle one decoded frame. `None` means nothing is written back;
    /// notifications, known or not, are never answered.
    async fn handle<W: AsyncWrite + Unpin>(
        &self,
        message: Value,
        out: &mut Outbound<W>,
    ) -> Option<Value> {
        let Value::Object(frame) = message else {
            return Some(error_response(Value::Null, INVALID_REQUEST, "Invalid Request"));
        };
        let id = frame.get("id").cloned();
        let Some(method) = frame.get("method").and_then(Value::as_str) else {
            return Some(error_response(
                id.unwrap_or(Value::Null),
                INVALID_REQUEST,
                "Invalid Request",
            ));
        };

        if method.starts_with("notifications/") {
            debug!(method = %method, "Ignoring notification");
            return None;
        }
        let Some(id) = id else {
            debug!(method = %method, "Ignoring request without an id");
            return None;
        };

        let response = match method {
            "initialize" => result_response(id, self.initialize_result()),
            "ping" => result_response(id, json!({})),
            "tools/list" => result_response(id, json!({"tools": self.tools.clone()})),
            "tools/call" => self.handle_tool_call(id, frame.get("params"), out).await,
            _ => {
                warn!(method = %method, "Method not found");
                error_response(id, METHOD_NOT_FOUND, &format!("Method not found: {}", method))
            }
        };
        Some(response)
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "logging": {},
                "tools": {"listChanged": false}
            },
            "serverInfo": {
                "name": "tunarr",
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    async fn handle_tool_call<W: AsyncWrite + Unpin>(
        &self,
        id: Value,
        params: Option<&Value>,
        out: &mut Outbound<W>,
    ) -> Value {
        let Some(name) = params.and_then(|p| p.get("name")).and_then(Value::as_str) else {
            return error_response(id, INVALID_PARAMS, "Missing tool name");
        };
        let no_args = json!({});
        let arguments = params
            .and_then(|p| p.get("arguments"))
            .unwrap_or(&no_args);

        match self.dispatch(name, arguments, out).await {
            Ok(structured) => match tool_result(&structured) {
                Ok(result) => result_response(id, result),
                Err(e) => {
                    error_response(id, INTERNAL_ERROR, &format!("Internal error: {}", e))
                }
            },
            Err(ToolError::Unknown) => {
                warn!(tool = %name, "Unknown tool");
                error_response(id, INVALID_PARAMS, &format!("Unknown tool: {}", name))
            }
            Err(ToolError::InvalidArguments(e)) => {
                warn!(tool = %name, error = %e, "Invalid tool arguments");
                error_response(
                    id,
                    INVALID_PARAMS,
                    &format!("Invalid arguments for tool {}: {}", name, e),
                )
            }
            Err(ToolError::Failed(message)) => result_response(id, error_content(&message)),
        }
    }

    /// Run one tool. Logs the invocation before the call and the failure
    /// after, mirroring both to the host.
    async fn dispatch<W: AsyncWrite + Unpin>(
        &self,
        name: &str,
        arguments: &Value,
        out: &mut Outbound<W>,
    ) -> Result<Value, ToolError> {
        match name {
            "list_channels" => {
                debug!(tool = "list_channels", host = %self.host, "list_channels called");
                out.log("debug", "list_channels called", json!({"host": self.host}))
                    .await;
                match self.client.list_channels().await {
                    Ok(list) => to_structured(&list),
                    Err(e) => Err(self.fail(out, "list_channels", e, json!({})).await),
                }
            }
            "list_movies_in_channel" => {
                let args: ChannelPageArgs =
                    parse(arguments).map_err(ToolError::InvalidArguments)?;
                debug!(
                    tool = "list_movies_in_channel",
                    channel_id = %args.id,
                    limit = args.limit,
                    offset = args.offset,
                    "list_movies_in_channel called"
                );
                out.log(
                    "debug",
                    "list_movies_in_channel called",
                    json!({"id": args.id, "limit": args.limit, "offset": args.offset}),
                )
                .await;
                match self
                    .client
                    .list_movies_in_channel(&args.id, args.offset, args.limit)
                    .await
                {
                    Ok(page) => to_structured(&page),
                    Err(e) => Err(self
                        .fail(out, "list_movies_in_channel", e, json!({"id": args.id}))
                        .await),
                }
            }
            "list_shows_in_channel" => {
                let args: ChannelPageArgs =
                    parse(arguments).map_err(ToolError::InvalidArguments)?;
                debug!(
                    tool = "list_shows_in_channel",
                    channel_id = %args.id,
                    limit = args.limit,
                    offset = args.offset,
                    "list_shows_in_channel called"
                );
                out.log(
                    "debug",
                    "list_shows_in_channel called",
                    json!({"id": args.id, "limit": args.limit, "offset": args.offset}),
                )
                .await;
                match self
                    .client
                    .list_shows_in_channel(&args.id, args.offset, args.limit)
                    .await
                {
                    Ok(page) => to_structured(&page),
                    Err(e) => Err(self
                        .fail(out, "list_shows_in_channel", e, json!({"id": args.id}))
                        .await),
                }
            }
            "list_media_sources" => {
                debug!(tool = "list_media_sources", host = %self.host, "list_media_sources called");
                out.log(
                    "debug",
                    "list_media_sources called",
                    json!({"host": self.host}),
                )
                .await;
                match self.client.list_media_sources().await {
                    Ok(list) => to_structured(&list),
                    Err(e) => Err(self.fail(out, "list_media_sources", e, json!({})).await),
                }
            }
            "search_programs" => {
                let request: SearchRequest =
                    parse(arguments).map_err(ToolError::InvalidArguments)?;
                debug!(
                    tool = "search_programs",
                    page = request.page,
                    limit = request.limit,
                    "search_programs called"
                );
                let mut called = Map::new();
                called.insert("query".to_string(), json!(request.query));
                if let Some(id) = &request.media_source_id {
                    called.insert("mediaSourceId".to_string(), json!(id));
                }
                if let Some(id) = &request.library_id {
                    called.insert("libraryId".to_string(), json!(id));
                }
                called.insert("page".to_string(), json!(request.page));
                called.insert("limit".to_string(), json!(request.limit));
                out.log("debug", "search_programs called", Value::Object(called))
                    .await;
                match self.client.search_programs(&request).await {
                    Ok(results) => to_structured(&results),
                    Err(e) => Err(self.fail(out, "search_programs", e, json!({})).await),
                }
            }
            _ => Err(ToolError::Unknown),
        }
    }

    async fn fail<W: AsyncWrite + Unpin>(
        &self,
        out: &mut Outbound<W>,
        tool: &str,
        err: Error,
        extra: Value,
    ) -> ToolError {
        let message = err.to_string();
        error!(tool = %tool, error = %message, "Tool call failed");
        let mut fields = Map::new();
        fields.insert("error".to_string(), Value::String(message.clone()));
        if let Value::Object(extra) = extra {
            fields.extend(extra);
        }
        out.log("error", &format!("{} failed", tool), Value::Object(fields))
            .await;
        ToolError::Failed(message)
    }
}
