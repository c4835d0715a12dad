//! Gridly tool definitions: parameters, schemas and remote calls.

pub mod params;
pub mod remote;
pub mod schemas;

use serde_json::Value;

/// Result of a remote call, resolved into text at the response boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// JSON body returned by the remote API, unmodified.
    Json(Value),
    /// Outcome of a delete-style call.
    Deleted {
        resource: &'static str,
        success: bool,
    },
}

impl ToolOutput {
    /// Render as the single text block returned to the client.
    pub fn render(&self) -> String {
        match self {
            Self::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Deleted {
                resource,
                success: true,
            } => format!("{} successfully deleted.", capitalize(resource)),
            Self::Deleted {
                resource,
                success: false,
            } => format!("Failed to delete {resource}."),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_is_pretty_printed() {
        let output = ToolOutput::Json(json!({ "id": "g1" }));
        assert_eq!(output.render(), "{\n  \"id\": \"g1\"\n}");
    }

    #[test]
    fn test_deleted_messages() {
        let ok = ToolOutput::Deleted {
            resource: "grid",
            success: true,
        };
        let failed = ToolOutput::Deleted {
            resource: "grid",
            success: false,
        };
        assert_eq!(ok.render(), "Grid successfully deleted.");
        assert_eq!(failed.render(), "Failed to delete grid.");
    }
}
