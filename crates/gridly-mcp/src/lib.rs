//! Gridly MCP Server library.
//!
//! Provides the [`GridlyMcpServer`](server::GridlyMcpServer) MCP handler, the
//! [`ToolRegistry`](registry::ToolRegistry) behind it and the declarative
//! input [`Schema`](schema::Schema) used to advertise and validate tool
//! arguments. Used by the `gridly-mcp` binary and available for integration
//! testing.

pub mod error;
pub mod registry;
pub mod schema;
pub mod server;
pub mod tools;
