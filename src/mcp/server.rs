/// Tool server that handles JSON-RPC communication
///
/// This module implements the request loop that:
/// 1. Reads one JSON-RPC request per line from stdin
/// 2. Dispatches tool calls to the repository-backed tools
/// 3. Writes one JSON-RPC response per line to stdout

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::storage::{RepositoryError, SqliteRepository};
use crate::tools;
use crate::{HabitJournalServer, ServerError};

pub struct McpServer {
    journal: HabitJournalServer,
    /// Whether the client has confirmed initialization
    initialized: bool,
}

impl McpServer {
    pub fn new(journal: HabitJournalServer) -> Self {
        Self {
            journal,
            initialized: false,
        }
    }

    /// Run the server until stdin is closed
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting tool server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("Tool server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
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
    async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
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

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
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

        Some(self.handle_request(id, request).await)
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("Client confirmed initialization");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    async fn handle_request(&mut self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, Value::Null)
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("Client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Habit Journal".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        to_response(id, &result)
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let tools = vec![
            ToolDefinition::for_params::<tools::ListHabitsParams>(
                "habit_list",
                "List all habits in creation order",
            ),
            ToolDefinition::for_params::<tools::HabitIdParams>("habit_get", "Get one habit by ID"),
            ToolDefinition::for_params::<tools::CreateHabitParams>(
                "habit_create",
                "Create a new habit to track",
            ),
            ToolDefinition::for_params::<tools::UpdateHabitParams>(
                "habit_update",
                "Change the title and description of a habit",
            ),
            ToolDefinition::for_params::<tools::HabitIdParams>(
                "habit_delete",
                "Delete a habit together with all of its achievements and details",
            ),
            ToolDefinition::for_params::<tools::ListAchievementsParams>(
                "achievement_list",
                "List the daily achievement records of a habit",
            ),
            ToolDefinition::for_params::<tools::UpsertAchievementParams>(
                "achievement_upsert",
                "Mark a day as achieved or not achieved for a habit",
            ),
            ToolDefinition::for_params::<tools::CreateDetailParams>(
                "detail_create",
                "Record notes, duration and a photo for a habit on a given day",
            ),
            ToolDefinition::for_params::<tools::ListDetailsParams>(
                "detail_list",
                "List the daily detail records of a habit",
            ),
            ToolDefinition::for_params::<tools::DetailKeyParams>(
                "detail_delete",
                "Delete the detail record (and its photo) for a habit on a given day",
            ),
            ToolDefinition::for_params::<tools::ListTodosParams>("todo_list", "List all todos"),
            ToolDefinition::for_params::<tools::TodoIdParams>("todo_get", "Get one todo by ID"),
            ToolDefinition::for_params::<tools::CreateTodoParams>("todo_create", "Create a todo"),
            ToolDefinition::for_params::<tools::UpdateTodoParams>("todo_update", "Replace a todo"),
            ToolDefinition::for_params::<tools::TodoIdParams>("todo_delete", "Delete a todo"),
            ToolDefinition::for_params::<tools::TodoIdParams>(
                "todo_toggle",
                "Flip a todo between done and not done",
            ),
        ];

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
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

        if !self.initialized {
            debug!("Tool call before initialization: {}", tool_params.name);
        }

        let args = tool_params.arguments;
        let result = match tool_params.name.as_str() {
            "habit_list" => self.call(args, tools::list_habits),
            "habit_get" => self.call(args, tools::get_habit),
            "habit_create" => self.call(args, tools::create_habit),
            "habit_update" => self.call(args, tools::update_habit),
            "habit_delete" => self.call(args, tools::delete_habit),
            "achievement_list" => self.call(args, tools::list_achievements),
            "achievement_upsert" => self.call(args, tools::upsert_achievement),
            "detail_create" => self.call(args, tools::create_detail),
            "detail_list" => self.call(args, tools::list_details),
            "detail_delete" => self.call(args, tools::delete_detail),
            "todo_list" => self.call(args, tools::list_todos),
            "todo_get" => self.call(args, tools::get_todo),
            "todo_create" => self.call(args, tools::create_todo),
            "todo_update" => self.call(args, tools::update_todo),
            "todo_delete" => self.call(args, tools::delete_todo),
            "todo_toggle" => self.call(args, tools::toggle_todo),
            _ => ToolCallResult::error(
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown tool: {}", tool_params.name),
            ),
        };

        to_response(id, &result)
    }

    /// Deserialize the arguments, run the tool and render its response as JSON text
    fn call<P, R, F>(&self, args: Value, tool: F) -> ToolCallResult
    where
        P: DeserializeOwned,
        R: Serialize,
        F: FnOnce(&SqliteRepository, P) -> Result<R, RepositoryError>,
    {
        // A call without arguments is a call with no fields set
        let args = if args.is_null() { json!({}) } else { args };

        let params: P = match serde_json::from_value(args) {
            Ok(p) => p,
            Err(e) => {
                return ToolCallResult::error(
                    error_codes::INVALID_PARAMS,
                    format!("Invalid arguments: {}", e),
                )
            }
        };

        match tool(self.journal.repository(), params) {
            Ok(response) => match serde_json::to_string_pretty(&response) {
                Ok(text) => ToolCallResult::success(text),
                Err(e) => ToolCallResult::error(error_codes::INTERNAL_ERROR, e.to_string()),
            },
            Err(e) => {
                warn!("Tool call failed ({}): {}", e.kind(), e);
                ToolCallResult::from_repository_error(&e)
            }
        }
    }
}

fn to_response<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
    }
}
