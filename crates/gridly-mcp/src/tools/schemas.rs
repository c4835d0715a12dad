//! Input schemas for every Gridly tool, composed from shared field sets.

use crate::error::SchemaError;
use crate::schema::{Field, FieldType, Schema};

use super::params::{ColumnType, SortDirection};

// ── shared field sets ──

pub fn empty() -> Schema {
    Schema::new()
}

fn project_id() -> Schema {
    Schema::new().field(Field::required(
        "id",
        FieldType::non_negative_integer(),
        "The ID of the project",
    ))
}

fn project_scope() -> Schema {
    Schema::new().field(Field::required(
        "projectId",
        FieldType::non_negative_integer(),
        "The ID of the project",
    ))
}

fn name_and_description() -> Schema {
    Schema::new()
        .field(Field::required("name", FieldType::String, "The name"))
        .field(Field::optional(
            "description",
            FieldType::String,
            "A short description",
        ))
}

fn database_id() -> Schema {
    Schema::new().field(Field::required(
        "id",
        FieldType::Id,
        "The ID of the database",
    ))
}

fn database_scope() -> Schema {
    Schema::new().field(Field::required(
        "dbId",
        FieldType::String,
        "The ID of the database",
    ))
}

fn grid_id() -> Schema {
    Schema::new().field(Field::required("id", FieldType::Id, "The ID of the grid"))
}

fn grid_scope() -> Schema {
    Schema::new().field(Field::required(
        "gridId",
        FieldType::String,
        "The ID of the grid",
    ))
}

fn view_entity_id() -> Schema {
    Schema::new().field(Field::required("id", FieldType::Id, "The ID of the view"))
}

fn view_id() -> Schema {
    Schema::new().field(Field::required(
        "viewId",
        FieldType::Id,
        "The ID of the view",
    ))
}

fn column_id() -> Schema {
    Schema::new().field(Field::required(
        "columnId",
        FieldType::Id,
        "The ID of the column",
    ))
}

fn dependency_id() -> Schema {
    Schema::new().field(Field::required(
        "dependencyId",
        FieldType::Id,
        "The ID of the dependency",
    ))
}

fn record_id() -> Schema {
    Schema::new().field(Field::required(
        "recordId",
        FieldType::Id,
        "The ID of the record",
    ))
}

fn page() -> Schema {
    let window = Schema::new()
        .field(Field::optional(
            "offset",
            FieldType::non_negative_integer(),
            "Number of items to skip",
        ))
        .field(Field::optional(
            "limit",
            FieldType::non_negative_integer(),
            "Maximum number of items to return",
        ));
    Schema::new().field(Field::optional(
        "page",
        FieldType::Object(window),
        "Pagination window",
    ))
}

fn sort() -> Schema {
    Schema::new().field(Field::optional(
        "sort",
        FieldType::map_of(FieldType::Enum(SortDirection::NAMES)),
        "Sort order as a map from column ID to 'asc' or 'desc'",
    ))
}

fn cell() -> Schema {
    Schema::new()
        .field(Field::required(
            "columnId",
            FieldType::String,
            "The ID of the column",
        ))
        .field(Field::required("value", FieldType::String, "The cell value"))
}

fn record() -> Schema {
    Schema::new()
        .field(Field::optional("id", FieldType::String, "The ID of the record"))
        .field(Field::optional(
            "path",
            FieldType::String,
            "Folder path of the record",
        ))
        .field(Field::required(
            "cells",
            FieldType::array_of(FieldType::Object(cell())),
            "Cells of the record",
        ))
}

fn records(record: Schema, description: &'static str) -> Schema {
    Schema::new().field(Field::required(
        "records",
        FieldType::array_of(FieldType::Object(record)),
        description,
    ))
}

// ── projects ──

pub fn retrieve_project() -> Schema {
    project_id()
}

pub fn create_project() -> Schema {
    name_and_description()
}

pub fn update_project() -> Result<Schema, SchemaError> {
    project_id().merge(&name_and_description().optional())
}

pub fn delete_project() -> Schema {
    project_id()
}

// ── databases ──

pub fn list_databases() -> Schema {
    project_scope().optional()
}

pub fn retrieve_database() -> Schema {
    database_id()
}

pub fn create_database() -> Result<Schema, SchemaError> {
    project_scope().merge(&name_and_description())
}

pub fn update_database() -> Result<Schema, SchemaError> {
    database_id().merge(&name_and_description().optional())
}

pub fn delete_database() -> Schema {
    database_id()
}

// ── grids ──

pub fn list_grids() -> Schema {
    database_scope()
}

pub fn retrieve_grid() -> Schema {
    grid_id()
}

pub fn create_grid() -> Result<Schema, SchemaError> {
    database_scope().merge(
        &Schema::new()
            .field(Field::required("name", FieldType::String, "The name of the grid"))
            .field(Field::optional(
                "templateGridId",
                FieldType::String,
                "ID of a grid to use as template",
            )),
    )
}

pub fn update_grid() -> Result<Schema, SchemaError> {
    grid_id().merge(
        &Schema::new()
            .field(Field::optional("name", FieldType::String, "The new name of the grid"))
            .field(Field::optional(
                "metadata",
                FieldType::map_of(FieldType::MetadataValue),
                "Metadata entries to set; a null value removes the key",
            )),
    )
}

pub fn delete_grid() -> Schema {
    grid_id()
}

// ── views ──

pub fn list_views() -> Schema {
    grid_scope()
}

pub fn retrieve_view() -> Schema {
    view_entity_id()
}

pub fn create_view() -> Result<Schema, SchemaError> {
    let column = Schema::new()
        .field(Field::required("id", FieldType::String, "The ID of the column"))
        .field(Field::optional(
            "editable",
            FieldType::Boolean,
            "Whether the column is editable in this view",
        ));
    grid_scope().merge(
        &Schema::new()
            .field(Field::required("name", FieldType::String, "The name of the view"))
            .field(Field::optional(
                "columns",
                FieldType::array_of(FieldType::Object(column)),
                "Columns to include in the view",
            )),
    )
}

pub fn update_view() -> Result<Schema, SchemaError> {
    view_entity_id().merge(&Schema::new().field(Field::required(
        "name",
        FieldType::String,
        "The new name of the view",
    )))
}

pub fn delete_view() -> Schema {
    view_entity_id()
}

// ── columns ──

pub fn retrieve_column() -> Result<Schema, SchemaError> {
    view_id().merge(&column_id())
}

pub fn create_column() -> Result<Schema, SchemaError> {
    let definition = Schema::new()
        .field(Field::optional("id", FieldType::String, "The ID of the column"))
        .field(Field::required("name", FieldType::String, "The name of the column"))
        .field(Field::required(
            "type",
            FieldType::Enum(ColumnType::NAMES),
            "The column type",
        ))
        .field(Field::optional(
            "editable",
            FieldType::Boolean,
            "Whether the column is editable",
        ))
        .field(Field::optional(
            "description",
            FieldType::String,
            "A short description of the column",
        ));
    view_id().merge(&definition)
}

pub fn update_column() -> Result<Schema, SchemaError> {
    let patch = Schema::new()
        .field(Field::optional("name", FieldType::String, "The new name of the column"))
        .field(Field::optional(
            "editable",
            FieldType::Boolean,
            "Whether the column is editable",
        ))
        .field(Field::optional(
            "description",
            FieldType::String,
            "A short description of the column",
        ));
    view_id().merge(&column_id())?.merge(&patch)
}

pub fn delete_column() -> Result<Schema, SchemaError> {
    view_id().merge(&column_id())
}

// ── dependencies ──

pub fn list_dependencies() -> Schema {
    view_id()
}

pub fn retrieve_dependency() -> Result<Schema, SchemaError> {
    view_id().merge(&dependency_id())
}

pub fn delete_dependency() -> Result<Schema, SchemaError> {
    view_id().merge(&dependency_id())
}

// ── records ──

pub fn list_records() -> Result<Schema, SchemaError> {
    view_id().merge(&sort())?.merge(&page())
}

pub fn create_records() -> Result<Schema, SchemaError> {
    view_id().merge(&records(record(), "Records to create"))
}

pub fn update_records() -> Result<Schema, SchemaError> {
    let identified = record().merge(&Schema::new().field(Field::required(
        "id",
        FieldType::String,
        "The ID of the record",
    )))?;
    view_id().merge(&records(identified, "Records to update"))
}

pub fn delete_records() -> Result<Schema, SchemaError> {
    view_id().merge(&Schema::new().field(Field::required(
        "ids",
        FieldType::array_of(FieldType::String),
        "IDs of the records to delete",
    )))
}

pub fn fetch_record_history() -> Result<Schema, SchemaError> {
    view_id().merge(&record_id())?.merge(&page())
}
