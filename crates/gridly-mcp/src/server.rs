//! MCP ServerHandler implementation for Gridly.
//!
//! The handler is a thin adapter over [`ToolRegistry`]: `tools/list` returns
//! the registry's catalog and `tools/call` dispatches by name. Per-call
//! failures become MCP error responses; the session stays up.
//!
//! **Projects** `list_projects`, `retrieve_project`, `create_project`,
//! `update_project`, `delete_project`
//!
//! **Databases** `list_databases`, `retrieve_database`, `create_database`,
//! `update_database`, `delete_database`
//!
//! **Grids** `list_grids`, `retrieve_grid`, `create_grid`, `update_grid`,
//! `delete_grid`
//!
//! **Views** `list_views`, `retrieve_view`, `create_view`, `update_view`,
//! `delete_view`
//!
//! **Columns** `retrieve_column`, `create_column`, `update_column`,
//! `delete_column`
//!
//! **Dependencies** `list_dependencies`, `retrieve_dependency`,
//! `delete_dependency`
//!
//! **Records** `list_records`, `create_records`, `update_records`,
//! `delete_records`, `fetch_record_history`

use std::sync::Arc;

use gridly_client::GridlyClient;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use serde_json::Value;

use crate::error::SchemaError;
use crate::registry::ToolRegistry;

const INSTRUCTIONS: &str = "Gridly is a collaborative spreadsheet-database for localization and \
     game content. Resources nest as project → database → grid → view → columns/records.\n\
     Navigate top-down: list_projects → list_databases (projectId) → list_grids (dbId) → \
     list_views (gridId) → retrieve_view for its columns → list_records (viewId).\n\
     Records are read and written through a view: create_records, update_records and \
     delete_records take a viewId; update_records requires each record's id.\n\
     Delete tools report success only when Gridly confirms the deletion.";

/// Gridly MCP server handler.
#[derive(Debug, Clone)]
pub struct GridlyMcpServer {
    registry: Arc<ToolRegistry>,
}

impl GridlyMcpServer {
    /// Create a server exposing the full Gridly catalog over `client`.
    pub fn new(client: GridlyClient) -> Result<Self, SchemaError> {
        Ok(Self::with_registry(ToolRegistry::build(client)?))
    }

    pub fn with_registry(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

impl ServerHandler for GridlyMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "gridly-mcp".to_string(),
                title: Some("Gridly MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(
                    "MCP server exposing the Gridly REST API: projects, databases, grids, \
                     views, columns, dependencies and records"
                        .to_string(),
                ),
                icons: None,
                website_url: None,
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.registry.list()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = Value::Object(request.arguments.unwrap_or_default());
        self.registry
            .call(&request.name, arguments)
            .await
            .map_err(ErrorData::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridly_client::testing::RecordingTransport;

    fn server() -> GridlyMcpServer {
        let transport = Arc::new(RecordingTransport::new());
        GridlyMcpServer::new(GridlyClient::with_transport(transport)).unwrap()
    }

    #[test]
    fn test_server_info() {
        let info = server().get_info();

        assert_eq!(info.server_info.name, "gridly-mcp");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
        let instructions = info.instructions.unwrap();
        assert!(instructions.contains("list_projects"));
        assert!(instructions.contains("update_records"));
    }

    #[test]
    fn test_server_exposes_full_catalog() {
        let server = server();
        assert_eq!(server.registry().len(), 32);
        assert!(server.registry().find("fetch_record_history").is_some());
    }

    #[test]
    fn test_clones_share_registry() {
        let server = server();
        let clone = server.clone();
        assert!(std::ptr::eq(server.registry(), clone.registry()));
    }
}
