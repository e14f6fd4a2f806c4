/// JSON-RPC message structures for the tool server
///
/// Requests and responses follow JSON-RPC 2.0 with the Model Context
/// Protocol's `initialize` / `tools/list` / `tools/call` methods on top.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::storage::{ErrorKind, RepositoryError};

/// MCP protocol version we support
pub const MCP_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 request message
///
/// A request without an `id` is a notification and gets no response.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    #[allow(dead_code)]
    pub jsonrpc: String,
    /// Request identifier, absent for notifications
    #[serde(default)]
    pub id: Option<Value>,
    /// The method to call (e.g., "tools/call")
    pub method: String,
    /// Parameters for the method call
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response message
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID that we're responding to
    pub id: Value,
    /// Successful result (if no error occurred)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error information (if something went wrong)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error information
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Parameters of a `tools/call` request
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call (e.g., "habit_create")
    pub name: String,
    /// Arguments to pass to the tool
    #[serde(default)]
    pub arguments: Value,
}

/// Result of a tool call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    /// Whether this is an error result
    pub is_error: bool,
    /// Application error code for failed calls, see [`error_codes`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
}

/// Content returned by a tool
#[derive(Debug, Serialize)]
pub struct ToolContent {
    /// Type of content (always "text")
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// Description of one tool for `tools/list`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema for the tool's arguments
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Describe a tool whose arguments deserialize into `P`
    pub fn for_params<P: JsonSchema>(name: &str, description: &str) -> Self {
        let schema = schemars::schema_for!(P);
        let input_schema =
            serde_json::to_value(schema).unwrap_or_else(|_| json!({"type": "object"}));

        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    pub list_changed: bool,
}

/// Response to `initialize`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

// JSON-RPC error codes
pub mod error_codes {
    /// Parse error - Invalid JSON was received by the server
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid Request - The JSON sent is not a valid Request object
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found - The requested method doesn't exist
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid parameters - Method exists but parameters are wrong
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error - Internal JSON-RPC error
    pub const INTERNAL_ERROR: i32 = -32603;

    // Application codes, in the -32000 to -32099 range reserved for servers
    /// Malformed identifier, date or field value
    pub const INVALID_ARGUMENT: i32 = -32001;
    /// Well-formed identifier with no matching record
    pub const NOT_FOUND: i32 = -32002;
    /// A record already exists for this habit and date
    pub const CONSTRAINT_VIOLATION: i32 = -32003;
    /// The database failed or was unavailable
    pub const PERSISTENCE_FAILURE: i32 = -32004;
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data,
            }),
        }
    }
}

impl ToolCallResult {
    /// Create a successful tool result with text content
    pub fn success(text: String) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text,
            }],
            is_error: false,
            error_code: None,
        }
    }

    /// Create an error tool result
    pub fn error(code: i32, error_message: String) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text: format!("Error: {}", error_message),
            }],
            is_error: true,
            error_code: Some(code),
        }
    }

    pub fn from_repository_error(error: &RepositoryError) -> Self {
        Self::error(repository_error_code(error), error.to_string())
    }
}

/// Map repository errors to application JSON-RPC codes
pub fn repository_error_code(error: &RepositoryError) -> i32 {
    match error.kind() {
        ErrorKind::InvalidArgument => error_codes::INVALID_ARGUMENT,
        ErrorKind::NotFound => error_codes::NOT_FOUND,
        ErrorKind::ConstraintViolation => error_codes::CONSTRAINT_VIOLATION,
        ErrorKind::PersistenceFailure => error_codes::PERSISTENCE_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::CreateHabitParams;

    #[test]
    fn test_notification_has_no_id() {
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(request.id.is_none());
    }

    #[test]
    fn test_tool_definition_schema_lists_fields() {
        let definition = ToolDefinition::for_params::<CreateHabitParams>("habit_create", "Create a habit");
        let properties = &definition.input_schema["properties"];

        assert!(properties.get("title").is_some());
        assert!(properties.get("description").is_some());
        assert_eq!(definition.input_schema["required"], json!(["title"]));
    }

    #[test]
    fn test_error_result_carries_code() {
        let err = RepositoryError::NotFound { entity: "Habit", id: "x".to_string() };
        let result = ToolCallResult::from_repository_error(&err);

        assert!(result.is_error);
        assert_eq!(result.error_code, Some(error_codes::NOT_FOUND));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isError"], true);
    }
}
