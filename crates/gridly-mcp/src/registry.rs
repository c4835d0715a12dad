//! Tool registry and dispatcher.
//!
//! The registry is the single source of truth mapping a tool name to its
//! description, input [`Schema`] and remote call. Listing is pure; invocation
//! is lookup → validate → deserialize → call → render.
//!
//! The catalog is small and fixed after construction, so lookup is a linear
//! scan over an ordered `Vec`, which also keeps the listing order stable.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use futures::{FutureExt, TryFutureExt};
use gridly_client::{ClientResult, GridlyClient};
use rmcp::model::{CallToolResult, Content, Tool};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{SchemaError, ToolError};
use crate::schema::{CompiledSchema, Schema};
use crate::tools::{remote, schemas, ToolOutput};

type ToolCall =
    Arc<dyn Fn(GridlyClient, Value) -> BoxFuture<'static, Result<ToolOutput, ToolError>> + Send + Sync>;

/// One registered tool.
#[derive(Clone)]
pub struct RegisteredTool {
    name: &'static str,
    description: &'static str,
    schema: CompiledSchema,
    call: ToolCall,
}

impl RegisteredTool {
    fn descriptor(&self) -> Tool {
        Tool::new(self.name, self.description, self.schema.document())
    }
}

impl fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Maps tool names to schemas and remote calls.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    client: GridlyClient,
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// Empty registry over `client`.
    pub fn new(client: GridlyClient) -> Self {
        Self {
            client,
            tools: Vec::new(),
        }
    }

    /// Registry holding the full Gridly catalog.
    ///
    /// Fails if a schema merge conflicts or a name is registered twice.
    pub fn build(client: GridlyClient) -> Result<Self, SchemaError> {
        let mut registry = Self::new(client);

        // projects
        registry.register(
            "list_projects",
            "List all projects",
            schemas::empty(),
            remote::list_projects,
        )?;
        registry.register(
            "retrieve_project",
            "Retrieve a project by ID",
            schemas::retrieve_project(),
            remote::retrieve_project,
        )?;
        registry.register(
            "create_project",
            "Create a new project",
            schemas::create_project(),
            remote::create_project,
        )?;
        registry.register(
            "update_project",
            "Update a project's name or description",
            schemas::update_project()?,
            remote::update_project,
        )?;
        registry.register(
            "delete_project",
            "Delete a project",
            schemas::delete_project(),
            remote::delete_project,
        )?;

        // databases
        registry.register(
            "list_databases",
            "List databases, optionally restricted to one project",
            schemas::list_databases(),
            remote::list_databases,
        )?;
        registry.register(
            "retrieve_database",
            "Retrieve a database by ID",
            schemas::retrieve_database(),
            remote::retrieve_database,
        )?;
        registry.register(
            "create_database",
            "Create a database in a project",
            schemas::create_database()?,
            remote::create_database,
        )?;
        registry.register(
            "update_database",
            "Update a database's name or description",
            schemas::update_database()?,
            remote::update_database,
        )?;
        registry.register(
            "delete_database",
            "Delete a database",
            schemas::delete_database(),
            remote::delete_database,
        )?;

        // grids
        registry.register(
            "list_grids",
            "List grids in a database",
            schemas::list_grids(),
            remote::list_grids,
        )?;
        registry.register(
            "retrieve_grid",
            "Retrieve a grid by ID",
            schemas::retrieve_grid(),
            remote::retrieve_grid,
        )?;
        registry.register(
            "create_grid",
            "Create a grid in a database",
            schemas::create_grid()?,
            remote::create_grid,
        )?;
        registry.register(
            "update_grid",
            "Update a grid's name or metadata",
            schemas::update_grid()?,
            remote::update_grid,
        )?;
        registry.register(
            "delete_grid",
            "Delete a grid",
            schemas::delete_grid(),
            remote::delete_grid,
        )?;

        // views
        registry.register(
            "list_views",
            "List views of a grid",
            schemas::list_views(),
            remote::list_views,
        )?;
        registry.register(
            "retrieve_view",
            "Retrieve a view by ID, including its columns",
            schemas::retrieve_view(),
            remote::retrieve_view,
        )?;
        registry.register(
            "create_view",
            "Create a view on a grid",
            schemas::create_view()?,
            remote::create_view,
        )?;
        registry.register(
            "update_view",
            "Rename a view",
            schemas::update_view()?,
            remote::update_view,
        )?;
        registry.register(
            "delete_view",
            "Delete a view",
            schemas::delete_view(),
            remote::delete_view,
        )?;

        // columns
        registry.register(
            "retrieve_column",
            "Retrieve a column of a view",
            schemas::retrieve_column()?,
            remote::retrieve_column,
        )?;
        registry.register(
            "create_column",
            "Add a column to a view",
            schemas::create_column()?,
            remote::create_column,
        )?;
        registry.register(
            "update_column",
            "Update a column of a view",
            schemas::update_column()?,
            remote::update_column,
        )?;
        registry.register(
            "delete_column",
            "Delete a column from a view",
            schemas::delete_column()?,
            remote::delete_column,
        )?;

        // dependencies
        registry.register(
            "list_dependencies",
            "List column dependencies of a view",
            schemas::list_dependencies(),
            remote::list_dependencies,
        )?;
        registry.register(
            "retrieve_dependency",
            "Retrieve a dependency of a view",
            schemas::retrieve_dependency()?,
            remote::retrieve_dependency,
        )?;
        registry.register(
            "delete_dependency",
            "Delete a dependency from a view",
            schemas::delete_dependency()?,
            remote::delete_dependency,
        )?;

        // records
        registry.register(
            "list_records",
            "List records of a view with optional sorting and pagination",
            schemas::list_records()?,
            remote::list_records,
        )?;
        registry.register(
            "create_records",
            "Create records in a view",
            schemas::create_records()?,
            remote::create_records,
        )?;
        registry.register(
            "update_records",
            "Update records in a view",
            schemas::update_records()?,
            remote::update_records,
        )?;
        registry.register(
            "delete_records",
            "Delete records from a view",
            schemas::delete_records()?,
            remote::delete_records,
        )?;
        registry.register(
            "fetch_record_history",
            "Fetch the change history of a record",
            schemas::fetch_record_history()?,
            remote::fetch_record_history,
        )?;

        Ok(registry)
    }

    /// Add a tool, compiling its schema once. `call` receives arguments that
    /// already passed it.
    pub fn register<P, F, Fut>(
        &mut self,
        name: &'static str,
        description: &'static str,
        schema: Schema,
        call: F,
    ) -> Result<(), SchemaError>
    where
        P: DeserializeOwned + Send + 'static,
        F: Fn(GridlyClient, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ClientResult<ToolOutput>> + Send + 'static,
    {
        if self.find(name).is_some() {
            return Err(SchemaError::DuplicateTool { name });
        }
        let schema = schema.compile()?;

        let handler: ToolCall = Arc::new(move |client: GridlyClient, arguments: Value| {
            match serde_json::from_value::<P>(arguments) {
                Ok(params) => call(client, params).map_err(ToolError::from).boxed(),
                Err(e) => future::ready(Err(ToolError::InvalidArguments(e))).boxed(),
            }
        });

        self.tools.push(RegisteredTool {
            name,
            description,
            schema,
            call: handler,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Tool descriptors in registration order. No side effects, no network.
    pub fn list(&self) -> Vec<Tool> {
        self.tools.iter().map(RegisteredTool::descriptor).collect()
    }

    /// Validate and invoke a tool, returning its unrendered output.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
        let Some(tool) = self.find(name) else {
            warn!(tool = name, "Unknown tool requested");
            return Err(ToolError::UnknownTool {
                name: name.to_string(),
            });
        };

        if let Err(errors) = tool.schema.validate(&arguments) {
            warn!(tool = name, violations = errors.violations().len(), "Rejected tool arguments");
            return Err(errors.into());
        }

        debug!(tool = name, "Dispatching tool call");
        let result = (tool.call)(self.client.clone(), arguments).await;
        if let Err(ref e) = result {
            warn!(tool = name, error = %e, "Tool call failed");
        }
        result
    }

    /// Validate, invoke and render a tool call as a single text block.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<CallToolResult, ToolError> {
        let output = self.dispatch(name, arguments).await?;
        Ok(CallToolResult::success(vec![Content::text(output.render())]))
    }
}
