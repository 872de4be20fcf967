/// MCP protocol implementation
///
/// JSON-RPC message types and the stdin/stdout server that routes tool
/// calls to the habit and journal tools.

pub mod protocol;
pub mod server;

pub use server::McpServer;
