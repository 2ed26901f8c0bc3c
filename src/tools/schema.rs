//! Declarative input schemas and their validator.
//!
//! A schema is an object of named properties (some required) whose leaves
//! are strings, numbers or booleans, optionally restricted to a fixed set
//! of literals. Schemas serialize to the JSON Schema subset advertised in
//! `tools/list`.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            PrimitiveKind::String => value.is_string(),
            PrimitiveKind::Number => value.is_number(),
            PrimitiveKind::Boolean => value.is_boolean(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub description: Option<String>,
    pub properties: Vec<(String, SchemaNode)>,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSchema {
    pub kind: PrimitiveKind,
    pub description: Option<String>,
    pub allowed: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object(ObjectSchema),
    Primitive(PrimitiveSchema),
}

impl SchemaNode {
    /// An object node with no properties; accepts any object.
    pub fn object() -> ObjectSchema {
        ObjectSchema::default()
    }

    fn primitive(kind: PrimitiveKind, description: &str) -> Self {
        SchemaNode::Primitive(PrimitiveSchema {
            kind,
            description: Some(description.to_string()),
            allowed: None,
        })
    }

    pub fn string(description: &str) -> Self {
        Self::primitive(PrimitiveKind::String, description)
    }

    pub fn number(description: &str) -> Self {
        Self::primitive(PrimitiveKind::Number, description)
    }

    pub fn boolean(description: &str) -> Self {
        Self::primitive(PrimitiveKind::Boolean, description)
    }

    /// A string restricted to `allowed`.
    pub fn string_enum(description: &str, allowed: &[&str]) -> Self {
        SchemaNode::Primitive(PrimitiveSchema {
            kind: PrimitiveKind::String,
            description: Some(description.to_string()),
            allowed: Some(allowed.iter().map(|s| Value::from(*s)).collect()),
        })
    }

    /// JSON Schema rendering used by `tools/list`.
    pub fn to_json_schema(&self) -> Value {
        match self {
            SchemaNode::Object(object) => {
                let mut schema = json!({ "type": "object" });
                if let Some(description) = &object.description {
                    schema["description"] = json!(description);
                }
                let properties: Map<String, Value> = object
                    .properties
                    .iter()
                    .map(|(name, node)| (name.clone(), node.to_json_schema()))
                    .collect();
                schema["properties"] = Value::Object(properties);
                if !object.required.is_empty() {
                    schema["required"] = json!(object.required);
                }
                schema
            }
            SchemaNode::Primitive(primitive) => {
                let mut schema = json!({ "type": primitive.kind.as_str() });
                if let Some(description) = &primitive.description {
                    schema["description"] = json!(description);
                }
                if let Some(allowed) = &primitive.allowed {
                    schema["enum"] = Value::Array(allowed.clone());
                }
                schema
            }
        }
    }
}

impl ObjectSchema {
    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn required(mut self, name: &str, node: SchemaNode) -> Self {
        self.required.push(name.to_string());
        self.properties.push((name.to_string(), node));
        self
    }

    pub fn optional(mut self, name: &str, node: SchemaNode) -> Self {
        self.properties.push((name.to_string(), node));
        self
    }

    pub fn build(self) -> SchemaNode {
        SchemaNode::Object(self)
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_schema().serialize(serializer)
    }
}

/// Why a value failed validation. Paths are dotted from the argument root.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{path} must be an object, got {actual}")]
    NotAnObject { path: String, actual: &'static str },
    #[error("missing required field '{path}'")]
    MissingField { path: String },
    #[error("field '{path}' must be a {expected}, got {actual}")]
    WrongType {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("field '{path}' must be one of {allowed}")]
    NotAllowed { path: String, allowed: String },
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}

/// Checks `value` against `schema`. Never coerces; unknown fields pass.
pub fn validate(schema: &SchemaNode, value: &Value) -> Result<(), ValidationError> {
    validate_at(schema, value, "")
}

fn validate_at(schema: &SchemaNode, value: &Value, path: &str) -> Result<(), ValidationError> {
    match schema {
        SchemaNode::Object(object) => {
            let fields = value.as_object().ok_or_else(|| ValidationError::NotAnObject {
                path: if path.is_empty() {
                    "arguments".to_string()
                } else {
                    path.to_string()
                },
                actual: kind_name(value),
            })?;
            for name in &object.required {
                if !fields.contains_key(name) {
                    return Err(ValidationError::MissingField {
                        path: join(path, name),
                    });
                }
            }
            for (name, node) in &object.properties {
                if let Some(field) = fields.get(name) {
                    validate_at(node, field, &join(path, name))?;
                }
            }
            Ok(())
        }
        SchemaNode::Primitive(primitive) => {
            if !primitive.kind.matches(value) {
                return Err(ValidationError::WrongType {
                    path: path.to_string(),
                    expected: primitive.kind.as_str(),
                    actual: kind_name(value),
                });
            }
            if let Some(allowed) = &primitive.allowed {
                if !allowed.contains(value) {
                    let literals: Vec<String> = allowed.iter().map(Value::to_string).collect();
                    return Err(ValidationError::NotAllowed {
                        path: path.to_string(),
                        allowed: literals.join(", "),
                    });
                }
            }
            Ok(())
        }
    }
}
