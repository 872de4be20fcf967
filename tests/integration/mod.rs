/// End-to-end tests against SQLite files and the MCP server
mod basic_integration;
mod mcp_session;
