//! Output contract for plan generation.
//!
//! The plan shape is declared once as a [`SchemaNode`] tree and rendered for whichever
//! provider dialect is in use. Property order is carried explicitly: Gemini receives it
//! as `propertyOrdering`, JSON Schema consumers see it as key order.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Structural schema node. Object properties keep declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    String,
    Array(Box<SchemaNode>),
    Object(Vec<(&'static str, SchemaNode)>),
}

/// Schema flavours understood by the supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaDialect {
    /// Gemini `responseSchema` (OpenAPI subset with upper-case types)
    Gemini,
    /// Strict JSON Schema as used by OpenAI-compatible `response_format`
    JsonSchema,
}

impl SchemaNode {
    fn object(properties: Vec<(&'static str, SchemaNode)>) -> Self {
        SchemaNode::Object(properties)
    }

    fn array_of(items: SchemaNode) -> Self {
        SchemaNode::Array(Box::new(items))
    }

    pub fn render(&self, dialect: SchemaDialect) -> Value {
        match dialect {
            SchemaDialect::Gemini => self.render_gemini(),
            SchemaDialect::JsonSchema => self.render_json_schema(),
        }
    }

    fn render_gemini(&self) -> Value {
        match self {
            SchemaNode::String => json!({ "type": "STRING" }),
            SchemaNode::Array(items) => json!({
                "type": "ARRAY",
                "items": items.render_gemini(),
            }),
            SchemaNode::Object(properties) => {
                let mut props = Map::new();
                for (name, node) in properties {
                    props.insert((*name).to_string(), node.render_gemini());
                }
                let ordering: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
                json!({
                    "type": "OBJECT",
                    "properties": props,
                    "propertyOrdering": ordering,
                })
            }
        }
    }

    fn render_json_schema(&self) -> Value {
        match self {
            SchemaNode::String => json!({ "type": "string" }),
            SchemaNode::Array(items) => json!({
                "type": "array",
                "items": items.render_json_schema(),
            }),
            SchemaNode::Object(properties) => {
                let mut props = Map::new();
                for (name, node) in properties {
                    props.insert((*name).to_string(), node.render_json_schema());
                }
                let required: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
                json!({
                    "type": "object",
                    "properties": props,
                    "required": required,
                    "additionalProperties": false,
                })
            }
        }
    }
}

/// The LearningPlan contract: plan → phases → steps → topics → resources.
pub fn learning_plan_schema() -> SchemaNode {
    let resource = SchemaNode::object(vec![
        ("title", SchemaNode::String),
        ("type", SchemaNode::String),
        ("link", SchemaNode::String),
    ]);
    let topic = SchemaNode::object(vec![
        ("title", SchemaNode::String),
        ("subtopics", SchemaNode::array_of(SchemaNode::String)),
        ("resources", SchemaNode::array_of(resource)),
        ("notes", SchemaNode::String),
    ]);
    let step = SchemaNode::object(vec![
        ("title", SchemaNode::String),
        ("topics", SchemaNode::array_of(topic)),
    ]);
    let phase = SchemaNode::object(vec![
        ("title", SchemaNode::String),
        ("duration", SchemaNode::String),
        ("goal", SchemaNode::String),
        ("steps", SchemaNode::array_of(step)),
    ]);
    SchemaNode::object(vec![
        ("title", SchemaNode::String),
        ("description", SchemaNode::String),
        ("phases", SchemaNode::array_of(phase)),
    ])
}

/// Cheap top-level shape check run before typed deserialization.
pub fn check_plan_shape(value: &Value) -> Result<(), String> {
    let object = value
        .as_object()
        .ok_or_else(|| "expected a JSON object at the top level".to_string())?;
    for field in ["title", "description"] {
        match object.get(field) {
            Some(Value::String(_)) => {}
            Some(_) => return Err(format!("field `{}` must be a string", field)),
            None => return Err(format!("missing field `{}`", field)),
        }
    }
    match object.get("phases") {
        Some(Value::Array(_)) => Ok(()),
        Some(_) => Err("field `phases` must be an array".to_string()),
        None => Err("missing field `phases`".to_string()),
    }
}
