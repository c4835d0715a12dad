//! Declarative tool input schemas.
//!
//! A [`Schema`] is an ordered set of [`Field`]s. It renders to the JSON Schema
//! document advertised in the tool listing ([`Schema::to_json_schema`]), and
//! that same document is compiled with `jsonschema` to check incoming
//! arguments ([`CompiledSchema::validate`]), so the two cannot drift apart.
//!
//! Schemas compose by field-set union with [`Schema::merge`]. Conflicting field
//! declarations are rejected when the schema is built, not when a call arrives.

mod validate;

use std::fmt;
use std::sync::Arc;

use jsonschema::Validator;
use serde_json::{json, Map, Value};

use crate::error::SchemaError;

pub use validate::{ValidationErrors, Violation, ViolationKind};

/// Accepts any non-empty string except `.` and `..`, which URL path
/// normalization would collapse.
const ID_PATTERN: &str = r"^([^.][\s\S]*|\.[^.][\s\S]*|\.\.[\s\S]+)$";

/// Type of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    /// String used as a URL path segment.
    Id,
    /// Whole number, optionally bounded below.
    Integer { minimum: Option<i64> },
    Boolean,
    /// One of a closed set of string literals.
    Enum(&'static [&'static str]),
    Array(Box<FieldType>),
    /// Nested object with its own fields.
    Object(Schema),
    /// Open string-keyed map whose values share one type.
    Map(Box<FieldType>),
    /// Free-form metadata value: string, number, boolean, null or object.
    MetadataValue,
}

impl FieldType {
    pub fn non_negative_integer() -> Self {
        Self::Integer { minimum: Some(0) }
    }

    pub fn array_of(item: FieldType) -> Self {
        Self::Array(Box::new(item))
    }

    pub fn map_of(value: FieldType) -> Self {
        Self::Map(Box::new(value))
    }

    /// Short human-readable name used in violation messages.
    pub fn label(&self) -> String {
        match self {
            Self::String => "string".into(),
            Self::Id => "non-empty ID".into(),
            Self::Integer { minimum: Some(0) } => "non-negative integer".into(),
            Self::Integer { .. } => "integer".into(),
            Self::Boolean => "boolean".into(),
            Self::Enum(values) => format!("one of [{}]", values.join(", ")),
            Self::Array(item) => format!("array of {}", item.label()),
            Self::Object(_) => "object".into(),
            Self::Map(value) => format!("map of {}", value.label()),
            Self::MetadataValue => "string, number, boolean, null or object".into(),
        }
    }

    fn json_schema(&self) -> Value {
        match self {
            Self::String => json!({ "type": "string" }),
            Self::Id => json!({ "type": "string", "pattern": ID_PATTERN }),
            Self::Integer { minimum } => match minimum {
                Some(min) => json!({ "type": "integer", "minimum": min }),
                None => json!({ "type": "integer" }),
            },
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Enum(values) => json!({ "type": "string", "enum": values }),
            Self::Array(item) => json!({ "type": "array", "items": item.json_schema() }),
            Self::Object(schema) => Value::Object(schema.to_json_schema()),
            Self::Map(value) => json!({
                "type": "object",
                "additionalProperties": value.json_schema()
            }),
            Self::MetadataValue => json!({
                "type": ["string", "number", "boolean", "null", "object"]
            }),
        }
    }
}

/// One named input field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    pub description: &'static str,
}

impl Field {
    pub fn required(name: &'static str, ty: FieldType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: true,
            description,
        }
    }

    pub fn optional(name: &'static str, ty: FieldType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: false,
            description,
        }
    }
}

/// Ordered field set describing an object argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Names must be unique within one builder chain; use
    /// [`Schema::merge`] to combine independently defined field sets.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field-set union.
    ///
    /// A field present on both sides must have the same type; it is required
    /// in the result if either side requires it.
    pub fn merge(mut self, other: &Schema) -> Result<Schema, SchemaError> {
        for incoming in &other.fields {
            match self.fields.iter_mut().find(|f| f.name == incoming.name) {
                Some(existing) if existing.ty != incoming.ty => {
                    return Err(SchemaError::FieldConflict {
                        field: incoming.name,
                        existing: existing.ty.label(),
                        incoming: incoming.ty.label(),
                    });
                }
                Some(existing) => existing.required |= incoming.required,
                None => self.fields.push(incoming.clone()),
            }
        }
        Ok(self)
    }

    /// Variant of this schema in which every field may be omitted.
    #[must_use]
    pub fn optional(&self) -> Schema {
        Schema {
            fields: self
                .fields
                .iter()
                .cloned()
                .map(|f| Field {
                    required: false,
                    ..f
                })
                .collect(),
        }
    }

    pub fn required_names(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect()
    }

    /// Descriptive JSON Schema (`type: object`) for client introspection.
    pub fn to_json_schema(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| {
                let mut property = f.ty.json_schema();
                if let Value::Object(ref mut obj) = property {
                    obj.insert("description".into(), Value::from(f.description));
                }
                (f.name.to_string(), property)
            })
            .collect();

        let mut schema = Map::new();
        schema.insert("type".into(), Value::from("object"));
        schema.insert("properties".into(), Value::Object(properties));
        let required = self.required_names();
        if !required.is_empty() {
            schema.insert("required".into(), json!(required));
        }
        schema
    }

    /// Render and compile the JSON Schema document once.
    pub fn compile(self) -> Result<CompiledSchema, SchemaError> {
        let document = self.to_json_schema();
        let validator = jsonschema::validator_for(&Value::Object(document.clone()))
            .map_err(|e| SchemaError::InvalidSchema(e.to_string()))?;
        Ok(CompiledSchema {
            schema: self,
            document: Arc::new(document),
            validator: Arc::new(validator),
        })
    }
}

/// A [`Schema`] together with its rendered document and compiled validator.
#[derive(Clone)]
pub struct CompiledSchema {
    schema: Schema,
    document: Arc<Map<String, Value>>,
    validator: Arc<Validator>,
}

impl CompiledSchema {
    /// The JSON Schema document advertised for the tool.
    pub fn document(&self) -> Arc<Map<String, Value>> {
        Arc::clone(&self.document)
    }

    /// Check an argument bag, collecting every violation in field order.
    pub fn validate(&self, arguments: &Value) -> Result<(), ValidationErrors> {
        let violations = validate::violations(&self.schema, &self.validator, arguments);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::new(violations))
        }
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
