//! Error types for tool registration and dispatch.

use gridly_client::ClientError;
use rmcp::model::ErrorCode;
use rmcp::ErrorData;
use serde_json::json;
use thiserror::Error;

use crate::schema::ValidationErrors;

/// Definition-time errors raised while building schemas and the registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Field '{field}' declared as both {existing} and {incoming}")]
    FieldConflict {
        field: &'static str,
        existing: String,
        incoming: String,
    },

    #[error("Tool '{name}' is registered more than once")]
    DuplicateTool { name: &'static str },

    #[error("Rendered input schema does not compile: {0}")]
    InvalidSchema(String),
}

/// Per-invocation errors. None of these stop the server.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationErrors),

    /// Arguments passed the schema but did not fit the typed parameters.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(serde_json::Error),

    #[error(transparent)]
    Remote(#[from] ClientError),
}

impl From<ToolError> for ErrorData {
    fn from(err: ToolError) -> Self {
        let message = err.to_string();
        match err {
            ToolError::UnknownTool { name } => {
                ErrorData::new(ErrorCode::METHOD_NOT_FOUND, message, Some(json!({ "tool": name })))
            }
            ToolError::InvalidInput(errors) => ErrorData::invalid_params(
                message,
                Some(json!({ "violations": errors.violations() })),
            ),
            ToolError::InvalidArguments(_) => ErrorData::invalid_params(message, None),
            ToolError::Remote(e) => {
                ErrorData::internal_error(message, e.status().map(|s| json!({ "status": s })))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldType, Schema};

    #[test]
    fn test_unknown_tool_maps_to_method_not_found() {
        let data = ErrorData::from(ToolError::UnknownTool {
            name: "frobnicate".into(),
        });
        assert_eq!(data.code, ErrorCode::METHOD_NOT_FOUND);
        assert_eq!(data.message, "Unknown tool: frobnicate");
        assert_eq!(data.data, Some(json!({ "tool": "frobnicate" })));
    }

    #[test]
    fn test_invalid_input_carries_all_violations() {
        let schema = Schema::new()
            .field(Field::required("viewId", FieldType::String, "View"))
            .field(Field::required("columnId", FieldType::String, "Column"));
        let errors = schema.compile().unwrap().validate(&json!({})).unwrap_err();

        let data = ErrorData::from(ToolError::from(errors));

        assert_eq!(data.code, ErrorCode::INVALID_PARAMS);
        let violations = data.data.unwrap()["violations"].clone();
        assert_eq!(violations.as_array().unwrap().len(), 2);
        assert_eq!(violations[1]["field"], "columnId");
        assert_eq!(violations[1]["reason"], "missing");
    }

    #[test]
    fn test_remote_error_maps_to_internal_error_with_status() {
        let data = ErrorData::from(ToolError::from(ClientError::api_error(404, "no grid")));
        assert_eq!(data.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(data.message, "API error: 404 - no grid");
        assert_eq!(data.data, Some(json!({ "status": 404 })));
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::DuplicateTool { name: "list_grids" };
        assert_eq!(err.to_string(), "Tool 'list_grids' is registered more than once");
    }
}
