//! Typed parameters for all Gridly tools.
//!
//! Arguments are checked against the tool's [`Schema`](crate::schema::Schema)
//! first, then deserialized into these structs. Fields that route the request
//! (path or query ids) are `skip_serializing`, so serializing a params struct
//! yields exactly the request body.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// String-keyed map that keeps the caller's key order through
/// deserialize and serialize. Sort keys are applied in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, V)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    match entries.iter_mut().find(|(k, _)| *k == key) {
                        Some(entry) => entry.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// For tools that take no arguments.
#[derive(Debug, Deserialize)]
pub struct NoParams {}

// ── projects ──

/// `retrieve_project`, `delete_project`
#[derive(Debug, Deserialize)]
pub struct ProjectIdParams {
    pub id: u64,
}

/// `create_project`
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateProjectParams {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `update_project`
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateProjectParams {
    #[serde(skip_serializing)]
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── databases ──

/// `list_databases`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDatabasesParams {
    #[serde(default)]
    pub project_id: Option<u64>,
}

/// `retrieve_database`, `delete_database`; also grids and views by id.
#[derive(Debug, Deserialize)]
pub struct EntityIdParams {
    pub id: String,
}

/// `create_database`
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseParams {
    #[serde(skip_serializing)]
    pub project_id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `update_database`
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateDatabaseParams {
    #[serde(skip_serializing)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── grids ──

/// `list_grids`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGridsParams {
    pub db_id: String,
}

/// `create_grid`
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGridParams {
    #[serde(skip_serializing)]
    pub db_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_grid_id: Option<String>,
}

/// `update_grid`
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateGridParams {
    #[serde(skip_serializing)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<OrderedMap<MetadataValue>>,
}

/// A grid metadata value. `Null` asks the remote side to remove the key.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Object(Map<String, Value>),
}

// ── views ──

/// `list_views`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListViewsParams {
    pub grid_id: String,
}

/// `create_view`
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateViewParams {
    pub grid_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ViewColumn>>,
}

/// Column selection when creating a view.
#[derive(Debug, Deserialize, Serialize)]
pub struct ViewColumn {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
}

/// `update_view`
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateViewParams {
    #[serde(skip_serializing)]
    pub id: String,
    pub name: String,
}

// ── columns ──

/// Column kinds accepted by Gridly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    SingleLine,
    MultipleLines,
    RichText,
    Markdown,
    SingleSelection,
    MultipleSelections,
    Boolean,
    Number,
    Datetime,
    Files,
    Reference,
    Language,
    Formula,
    Json,
    Yaml,
}

impl ColumnType {
    /// Wire names, in declaration order.
    pub const NAMES: &'static [&'static str] = &[
        "singleLine",
        "multipleLines",
        "richText",
        "markdown",
        "singleSelection",
        "multipleSelections",
        "boolean",
        "number",
        "datetime",
        "files",
        "reference",
        "language",
        "formula",
        "json",
        "yaml",
    ];
}

/// `retrieve_column`, `delete_column`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRefParams {
    pub view_id: String,
    pub column_id: String,
}

/// `create_column`
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnParams {
    #[serde(skip_serializing)]
    pub view_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `update_column`
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateColumnParams {
    #[serde(skip_serializing)]
    pub view_id: String,
    #[serde(skip_serializing)]
    pub column_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── dependencies ──

/// `list_dependencies`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewScopeParams {
    pub view_id: String,
}

/// `retrieve_dependency`, `delete_dependency`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRefParams {
    pub view_id: String,
    pub dependency_id: String,
}

// ── records ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const NAMES: &'static [&'static str] = &["asc", "desc"];
}

/// Offset/limit window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// `list_records`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecordsParams {
    pub view_id: String,
    #[serde(default)]
    pub sort: Option<OrderedMap<SortDirection>>,
    #[serde(default)]
    pub page: Option<Page>,
}

/// One cell of a record.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub column_id: String,
    pub value: String,
}

/// A record as sent to the remote side.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub cells: Vec<Cell>,
}

/// `create_records`, `update_records`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsParams {
    pub view_id: String,
    pub records: Vec<Record>,
}

/// `delete_records`
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecordsParams {
    #[serde(skip_serializing)]
    pub view_id: String,
    pub ids: Vec<String>,
}

// ── record history ──

/// `fetch_record_history`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordHistoryParams {
    pub view_id: String,
    pub record_id: String,
    #[serde(default)]
    pub page: Option<Page>,
}
