/// Tools exposed to JSON-RPC clients
///
/// Each tool takes a params struct deserialized from the call arguments,
/// runs against a repository, and returns a serializable response.

pub mod habits;
pub mod achievements;
pub mod details;
pub mod todos;

pub use habits::*;
pub use achievements::*;
pub use details::*;
pub use todos::*;

use serde::Serialize;

/// Outcome of an update or delete, where "nothing matched" is not an error
#[derive(Debug, Serialize, PartialEq)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
}

impl MutationResponse {
    pub(crate) fn from_outcome(success: bool, done: String, missing: String) -> Self {
        Self {
            success,
            message: if success { done } else { missing },
        }
    }
}
