/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads newline-delimited JSON-RPC requests from stdin
/// 2. Routes tool calls to the habit and journal tools
/// 3. Writes JSON-RPC responses to stdout

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{JournalServer, ServerError};

/// MCP server that handles communication with the client
pub struct McpServer {
    journal: JournalServer,
    /// Whether the client has completed the initialize handshake
    initialized: bool,
}

impl McpServer {
    pub fn new(journal: JournalServer) -> Self {
        Self {
            journal,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request)
    }

    fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            self.handle_notification(&request.method);
            return None;
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
                None,
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        };

        Some(response)
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "notifications/initialized" | "initialized" => {
                self.initialized = true;
                info!("MCP client finished initialization");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    fn handle_initialize(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        match params.map(serde_json::from_value::<InitializeParams>) {
            Some(Ok(init)) => {
                let client = init
                    .client_info
                    .map(|c| format!("{} {}", c.name, c.version.unwrap_or_default()))
                    .unwrap_or_else(|| "unknown client".to_string());
                info!("MCP client connected: {} (protocol {})", client.trim(), init.protocol_version);
            }
            Some(Err(e)) => warn!("Unrecognized initialize parameters: {}", e),
            None => info!("MCP client connected"),
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Habit Journal MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, &result)
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let tools = vec![
            definition::<tools::CreateHabitParams>("habit_create", "Create a new habit to track"),
            definition::<tools::ListHabitsParams>(
                "habit_list",
                "List active habits with streaks, today's state and completion rates",
            ),
            definition::<tools::UpdateHabitParams>("habit_update", "Change a habit's title, category, schedule or look"),
            definition::<tools::DeleteHabitParams>(
                "habit_delete",
                "Delete a habit together with its completion history",
            ),
            definition::<tools::ToggleHabitParams>(
                "habit_toggle",
                "Mark a habit done (or not done) for today or a specific date",
            ),
            definition::<tools::StatusParams>(
                "habit_status",
                "Check current and longest streaks and the last week of one or all habits",
            ),
            definition::<tools::LogMoodParams>(
                "mood_log",
                "Write the journal entry for a day (mood, energy, notes, tags); replaces that day's earlier entry",
            ),
            definition::<tools::ListMoodsParams>("mood_list", "List journal entries, most recent first"),
            definition::<tools::UpdateMoodParams>("mood_update", "Change an existing journal entry"),
            definition::<tools::DeleteMoodParams>("mood_delete", "Delete a journal entry"),
            definition::<tools::MoodStatsParams>(
                "mood_stats",
                "Average mood, average energy and mood counts over a recent window",
            ),
            definition::<tools::DashboardParams>(
                "dashboard",
                "Today's overview: habits done, weekly completion, streaks and recent moods",
            ),
        ];

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let call: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(call)) => call,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        debug!("Calling tool '{}'", call.name);

        match self.call_tool(&call.name, call.arguments) {
            Some(Ok(message)) => respond(id, &ToolCallResult::success(message)),
            Some(Err(e)) => {
                warn!("Tool '{}' failed: {}", call.name, e);
                JsonRpcResponse::error(id, tool_error_to_json_rpc_code(&e), e.to_string(), None)
            }
            None => respond(id, &ToolCallResult::error(format!("Unknown tool: {}", call.name))),
        }
    }

    /// Run a tool by name; `None` when no such tool exists
    fn call_tool(&self, name: &str, arguments: Value) -> Option<Result<String, ToolError>> {
        let store = self.journal.store();
        let user = self.journal.user_id();

        let result = match name {
            "habit_create" => invoke(arguments, |p| tools::create_habit(store, user, p).map(|r| r.message)),
            "habit_list" => invoke(arguments, |p| tools::list_habits(store, user, p).map(|r| r.message)),
            "habit_update" => invoke(arguments, |p| tools::update_habit(store, user, p).map(|r| r.message)),
            "habit_delete" => invoke(arguments, |p| tools::delete_habit(store, user, p).map(|r| r.message)),
            "habit_toggle" => invoke(arguments, |p| tools::toggle_habit(store, user, p).map(|r| r.message)),
            "habit_status" => invoke(arguments, |p| tools::get_habit_status(store, user, p).map(|r| r.message)),
            "mood_log" => invoke(arguments, |p| tools::log_mood(store, user, p).map(|r| r.message)),
            "mood_list" => invoke(arguments, |p| tools::list_moods(store, user, p).map(|r| r.message)),
            "mood_update" => invoke(arguments, |p| tools::update_mood(store, user, p).map(|r| r.message)),
            "mood_delete" => invoke(arguments, |p| tools::delete_mood(store, user, p).map(|r| r.message)),
            "mood_stats" => invoke(arguments, |p| tools::mood_stats(store, user, p).map(|r| r.message)),
            "dashboard" => invoke(arguments, |p| tools::dashboard(store, user, p).map(|r| r.message)),
            _ => return None,
        };

        Some(result)
    }
}

/// Deserialize tool arguments and run the tool with them
fn invoke<P, F>(arguments: Value, tool: F) -> Result<String, ToolError>
where
    P: DeserializeOwned,
    F: FnOnce(P) -> Result<String, ToolError>,
{
    let params = serde_json::from_value(arguments).map_err(|e| ToolError::InvalidParams(e.to_string()))?;
    tool(params)
}

fn definition<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let schema = schemars::schema_for!(P);
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schema).unwrap_or_else(|_| json!({ "type": "object" })),
    }
}

fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to encode result: {}", e),
            None,
        ),
    }
}
