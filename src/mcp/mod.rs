/// JSON-RPC tool server
///
/// `protocol` holds the wire types, `server` the stdin/stdout loop that
/// routes `tools/call` requests to the journal's tools.

pub mod protocol;
pub mod server;

pub use server::McpServer;
