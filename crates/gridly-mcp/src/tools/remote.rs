//! Remote call functions, one per tool.
//!
//! Each function takes validated, typed parameters, builds exactly one
//! [`ApiRequest`] and sends it. JSON responses are returned untouched;
//! deletions report the 204 success signal as a boolean.

use gridly_client::{ApiRequest, ClientResult, GridlyClient};

use super::params::{
    ColumnRefParams, CreateColumnParams, CreateDatabaseParams, CreateGridParams,
    CreateProjectParams, CreateViewParams, DeleteRecordsParams, DependencyRefParams,
    EntityIdParams, ListDatabasesParams, ListGridsParams, ListRecordsParams, ListViewsParams,
    NoParams, ProjectIdParams, RecordHistoryParams, RecordsParams, UpdateColumnParams,
    UpdateDatabaseParams, UpdateGridParams, UpdateProjectParams, UpdateViewParams,
    ViewScopeParams,
};
use super::ToolOutput;

async fn fetch(client: &GridlyClient, request: ApiRequest) -> ClientResult<ToolOutput> {
    client.send_json(request).await.map(ToolOutput::Json)
}

async fn remove(
    client: &GridlyClient,
    resource: &'static str,
    request: ApiRequest,
) -> ClientResult<ToolOutput> {
    let success = client.send_delete(request).await?;
    Ok(ToolOutput::Deleted { resource, success })
}

// ── projects ──

pub async fn list_projects(client: GridlyClient, _params: NoParams) -> ClientResult<ToolOutput> {
    fetch(&client, ApiRequest::get(["projects"])).await
}

pub async fn retrieve_project(
    client: GridlyClient,
    params: ProjectIdParams,
) -> ClientResult<ToolOutput> {
    let id = params.id.to_string();
    fetch(&client, ApiRequest::get(["projects", id.as_str()])).await
}

pub async fn create_project(
    client: GridlyClient,
    params: CreateProjectParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::post(["projects"]).json_body(&params)?;
    fetch(&client, request).await
}

pub async fn update_project(
    client: GridlyClient,
    params: UpdateProjectParams,
) -> ClientResult<ToolOutput> {
    let id = params.id.to_string();
    let request = ApiRequest::patch(["projects", id.as_str()]).json_body(&params)?;
    fetch(&client, request).await
}

pub async fn delete_project(
    client: GridlyClient,
    params: ProjectIdParams,
) -> ClientResult<ToolOutput> {
    let id = params.id.to_string();
    remove(&client, "project", ApiRequest::delete(["projects", id.as_str()])).await
}

// ── databases ──

pub async fn list_databases(
    client: GridlyClient,
    params: ListDatabasesParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::get(["databases"]).optional_query("projectId", params.project_id);
    fetch(&client, request).await
}

pub async fn retrieve_database(
    client: GridlyClient,
    params: EntityIdParams,
) -> ClientResult<ToolOutput> {
    fetch(&client, ApiRequest::get(["databases", params.id.as_str()])).await
}

pub async fn create_database(
    client: GridlyClient,
    params: CreateDatabaseParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::post(["databases"])
        .query("projectId", params.project_id)
        .json_body(&params)?;
    fetch(&client, request).await
}

pub async fn update_database(
    client: GridlyClient,
    params: UpdateDatabaseParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::patch(["databases", params.id.as_str()]).json_body(&params)?;
    fetch(&client, request).await
}

pub async fn delete_database(
    client: GridlyClient,
    params: EntityIdParams,
) -> ClientResult<ToolOutput> {
    remove(
        &client,
        "database",
        ApiRequest::delete(["databases", params.id.as_str()]),
    )
    .await
}

// ── grids ──

pub async fn list_grids(client: GridlyClient, params: ListGridsParams) -> ClientResult<ToolOutput> {
    fetch(&client, ApiRequest::get(["grids"]).query("dbId", params.db_id)).await
}

pub async fn retrieve_grid(
    client: GridlyClient,
    params: EntityIdParams,
) -> ClientResult<ToolOutput> {
    fetch(&client, ApiRequest::get(["grids", params.id.as_str()])).await
}

pub async fn create_grid(
    client: GridlyClient,
    params: CreateGridParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::post(["grids"])
        .query("dbId", &params.db_id)
        .json_body(&params)?;
    fetch(&client, request).await
}

pub async fn update_grid(
    client: GridlyClient,
    params: UpdateGridParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::patch(["grids", params.id.as_str()]).json_body(&params)?;
    fetch(&client, request).await
}

pub async fn delete_grid(client: GridlyClient, params: EntityIdParams) -> ClientResult<ToolOutput> {
    remove(&client, "grid", ApiRequest::delete(["grids", params.id.as_str()])).await
}

// ── views ──

pub async fn list_views(client: GridlyClient, params: ListViewsParams) -> ClientResult<ToolOutput> {
    fetch(&client, ApiRequest::get(["views"]).query("gridId", params.grid_id)).await
}

pub async fn retrieve_view(
    client: GridlyClient,
    params: EntityIdParams,
) -> ClientResult<ToolOutput> {
    fetch(&client, ApiRequest::get(["views", params.id.as_str()])).await
}

pub async fn create_view(
    client: GridlyClient,
    params: CreateViewParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::post(["views"]).json_body(&params)?;
    fetch(&client, request).await
}

pub async fn update_view(
    client: GridlyClient,
    params: UpdateViewParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::patch(["views", params.id.as_str()]).json_body(&params)?;
    fetch(&client, request).await
}

pub async fn delete_view(client: GridlyClient, params: EntityIdParams) -> ClientResult<ToolOutput> {
    remove(&client, "view", ApiRequest::delete(["views", params.id.as_str()])).await
}

// ── columns ──

pub async fn retrieve_column(
    client: GridlyClient,
    params: ColumnRefParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::get([
        "views",
        params.view_id.as_str(),
        "columns",
        params.column_id.as_str(),
    ]);
    fetch(&client, request).await
}

pub async fn create_column(
    client: GridlyClient,
    params: CreateColumnParams,
) -> ClientResult<ToolOutput> {
    let request =
        ApiRequest::post(["views", params.view_id.as_str(), "columns"]).json_body(&params)?;
    fetch(&client, request).await
}

pub async fn update_column(
    client: GridlyClient,
    params: UpdateColumnParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::patch([
        "views",
        params.view_id.as_str(),
        "columns",
        params.column_id.as_str(),
    ])
    .json_body(&params)?;
    fetch(&client, request).await
}

pub async fn delete_column(
    client: GridlyClient,
    params: ColumnRefParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::delete([
        "views",
        params.view_id.as_str(),
        "columns",
        params.column_id.as_str(),
    ]);
    remove(&client, "column", request).await
}

// ── dependencies ──

pub async fn list_dependencies(
    client: GridlyClient,
    params: ViewScopeParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::get(["views", params.view_id.as_str(), "dependencies"]);
    fetch(&client, request).await
}

pub async fn retrieve_dependency(
    client: GridlyClient,
    params: DependencyRefParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::get([
        "views",
        params.view_id.as_str(),
        "dependencies",
        params.dependency_id.as_str(),
    ]);
    fetch(&client, request).await
}

pub async fn delete_dependency(
    client: GridlyClient,
    params: DependencyRefParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::delete([
        "views",
        params.view_id.as_str(),
        "dependencies",
        params.dependency_id.as_str(),
    ]);
    remove(&client, "dependency", request).await
}

// ── records ──

pub async fn list_records(
    client: GridlyClient,
    params: ListRecordsParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::get(["views", params.view_id.as_str(), "records"])
        .optional_json_query("sort", params.sort.as_ref())?
        .optional_json_query("page", params.page.as_ref())?;
    fetch(&client, request).await
}

pub async fn create_records(
    client: GridlyClient,
    params: RecordsParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::post(["views", params.view_id.as_str(), "records"])
        .json_body(&params.records)?;
    fetch(&client, request).await
}

pub async fn update_records(
    client: GridlyClient,
    params: RecordsParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::patch(["views", params.view_id.as_str(), "records"])
        .json_body(&params.records)?;
    fetch(&client, request).await
}

pub async fn delete_records(
    client: GridlyClient,
    params: DeleteRecordsParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::delete(["views", params.view_id.as_str(), "records"])
        .json_body(&params)?;
    remove(&client, "records", request).await
}

// ── record history ──

pub async fn fetch_record_history(
    client: GridlyClient,
    params: RecordHistoryParams,
) -> ClientResult<ToolOutput> {
    let request = ApiRequest::get([
        "views",
        params.view_id.as_str(),
        "records",
        params.record_id.as_str(),
        "history",
    ])
    .optional_json_query("page", params.page.as_ref())?;
    fetch(&client, request).await
}
