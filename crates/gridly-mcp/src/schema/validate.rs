//! Argument validation: `jsonschema` errors mapped onto [`Schema`] fields.
//!
//! The compiled validator decides what is wrong; this module turns each error's
//! JSON pointer into a readable path (`records[0].cells[1].columnId`,
//! `sort.c1`), labels it with the declaring field's type and orders the result
//! by field declaration order.

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde::Serialize;
use serde_json::Value;

use super::{FieldType, Schema};

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    WrongType {
        expected: String,
        found: &'static str,
    },
    NotInEnum {
        allowed: Vec<&'static str>,
        found: String,
    },
    BelowMinimum {
        minimum: i64,
        found: i64,
    },
    /// Empty, `.` or `..` where a path ID is expected.
    InvalidId {
        found: String,
    },
    /// Any other schema rule, with the validator's message.
    Invalid {
        message: String,
    },
}

/// A rejected field and the reason.
///
/// `field` is a path such as `page.limit` or `records[0].cells[1].columnId`;
/// an empty path refers to the argument object itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = if self.field.is_empty() {
            "arguments"
        } else {
            self.field.as_str()
        };
        match &self.kind {
            ViolationKind::Missing => write!(f, "{field}: required field is missing"),
            ViolationKind::WrongType { expected, found } => {
                write!(f, "{field}: expected {expected}, found {found}")
            }
            ViolationKind::NotInEnum { allowed, found } => write!(
                f,
                "{field}: '{found}' is not one of [{}]",
                allowed.join(", ")
            ),
            ViolationKind::BelowMinimum { minimum, found } => {
                write!(f, "{field}: {found} is below the minimum of {minimum}")
            }
            ViolationKind::InvalidId { found } => {
                write!(f, "{field}: '{found}' is not a usable ID (empty, '.' and '..' are reserved)")
            }
            ViolationKind::Invalid { message } => write!(f, "{field}: {message}"),
        }
    }
}

/// Every violation found in one argument bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Paths of all rejected fields, in field declaration order.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

pub(super) fn violations(schema: &Schema, validator: &Validator, arguments: &Value) -> Vec<Violation> {
    let mut found: Vec<(Vec<usize>, Violation)> = validator
        .iter_errors(arguments)
        .filter_map(|error| convert(schema, arguments, &error))
        .collect();
    found.sort_by(|(a, _), (b, _)| a.cmp(b));
    found.into_iter().map(|(_, violation)| violation).collect()
}

/// Where a JSON pointer lands in the schema.
struct Target<'s> {
    path: String,
    /// Declaration index at each level; sorts violations into field order.
    order: Vec<usize>,
    ty: Option<&'s FieldType>,
    required: bool,
    /// Object schema at the target, when it is one.
    object: Option<&'s Schema>,
}

fn convert(schema: &Schema, arguments: &Value, error: &ValidationError<'_>) -> Option<(Vec<usize>, Violation)> {
    let target = resolve(schema, arguments, &error.instance_path().to_string());
    let instance: &Value = error.instance();

    // An explicit null on an optional field counts as absent.
    if instance.is_null() && !target.required {
        return None;
    }

    let (mut order, field, kind) = match error.kind() {
        ValidationErrorKind::Required { property } => {
            let name = property.as_str().unwrap_or_default();
            let mut order = target.order;
            order.push(
                target
                    .object
                    .and_then(|o| o.fields().iter().position(|f| f.name == name))
                    .unwrap_or(usize::MAX),
            );
            (order, child_path(&target.path, name), ViolationKind::Missing)
        }
        ValidationErrorKind::Type { .. } => {
            let expected = target.ty.map_or_else(|| "object".to_string(), FieldType::label);
            (
                target.order,
                target.path,
                ViolationKind::WrongType {
                    expected,
                    found: json_kind(instance),
                },
            )
        }
        ValidationErrorKind::Enum { .. } => {
            // Non-strings already fail the enum's `type: string`.
            let found = instance.as_str()?.to_string();
            let allowed = match target.ty {
                Some(FieldType::Enum(values)) => values.to_vec(),
                _ => Vec::new(),
            };
            (target.order, target.path, ViolationKind::NotInEnum { allowed, found })
        }
        ValidationErrorKind::Minimum { .. } => {
            let minimum = match target.ty {
                Some(FieldType::Integer { minimum: Some(min) }) => *min,
                _ => 0,
            };
            let found = instance.as_i64()?;
            (target.order, target.path, ViolationKind::BelowMinimum { minimum, found })
        }
        ValidationErrorKind::Pattern { .. } if target.ty == Some(&FieldType::Id) => {
            let found = instance.as_str().unwrap_or_default().to_string();
            (target.order, target.path, ViolationKind::InvalidId { found })
        }
        _ => (
            target.order,
            target.path,
            ViolationKind::Invalid {
                message: error.to_string(),
            },
        ),
    };
    if order.is_empty() {
        order.push(0);
    }
    Some((order, Violation { field, kind }))
}

fn resolve<'s>(schema: &'s Schema, arguments: &Value, pointer: &str) -> Target<'s> {
    let mut target = Target {
        path: String::new(),
        order: Vec::new(),
        ty: None,
        required: true,
        object: Some(schema),
    };
    let mut value = Some(arguments);

    for segment in pointer_segments(pointer) {
        let parent = value;
        value = parent.and_then(|v| match v {
            Value::Object(map) => map.get(&segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        });

        if let Some(object) = target.object {
            let declared = object
                .fields()
                .iter()
                .enumerate()
                .find(|(_, f)| f.name == segment);
            target.path = child_path(&target.path, &segment);
            match declared {
                Some((index, field)) => {
                    target.order.push(index);
                    target.ty = Some(&field.ty);
                    target.required = field.required;
                }
                None => target.ty = None,
            }
        } else {
            match target.ty {
                Some(FieldType::Array(item)) => {
                    target.path = format!("{}[{segment}]", target.path);
                    target.order.push(segment.parse().unwrap_or(usize::MAX));
                    target.ty = Some(item.as_ref());
                }
                Some(FieldType::Map(entry)) => {
                    let position = parent
                        .and_then(Value::as_object)
                        .and_then(|map| map.keys().position(|k| *k == segment));
                    target.path = child_path(&target.path, &segment);
                    target.order.push(position.unwrap_or(usize::MAX));
                    target.ty = Some(entry.as_ref());
                }
                _ => {
                    target.path = child_path(&target.path, &segment);
                    target.ty = None;
                }
            }
            target.required = true;
        }

        target.object = match target.ty {
            Some(FieldType::Object(nested)) => Some(nested),
            _ => None,
        };
    }
    target
}

/// Unescaped reference tokens of an RFC 6901 pointer.
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect()
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
