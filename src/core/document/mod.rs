//! Workflow document model and its JSON codec.
//!
//! Only `nodes` is typed, and it must be a sequence. Every other field, `null`
//! values included, stays raw JSON in source key order, so a decode, mutate,
//! encode cycle leaves unknown and oddly typed fields intact.

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const NODES: &str = "nodes";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct WorkflowDocument {
    /// Layout order, not execution order. Absent means empty.
    pub nodes: Vec<Node>,

    /// Every top-level field except the node list. Holds a `nodes` slot when
    /// the source had one, so the list is written back in place.
    pub(crate) fields: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for WorkflowDocument {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let nodes = match fields.get_mut(NODES) {
            None => Vec::new(),
            Some(Value::Array(items)) => std::mem::take(items).into_iter().map(Node).collect(),
            Some(other) => {
                return Err(format!(
                    "`nodes` must be a sequence, found {}",
                    json_kind(other)
                ))
            }
        };
        Ok(WorkflowDocument { nodes, fields })
    }
}

impl From<WorkflowDocument> for Map<String, Value> {
    fn from(document: WorkflowDocument) -> Self {
        let WorkflowDocument { nodes, mut fields } = document;
        if fields.contains_key(NODES) || !nodes.is_empty() {
            let nodes = nodes.into_iter().map(|n| n.0).collect();
            fields.insert(NODES.to_string(), Value::Array(nodes));
        }
        fields
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One entry of `nodes`, kept as raw JSON. Non-object entries are tolerated and
/// read as untyped nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node(Value);

impl Default for Node {
    fn default() -> Self {
        Node(Value::Object(Map::new()))
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node(value)
    }
}

impl Node {
    /// An object node with only `type` set.
    pub fn new(node_type: impl Into<String>) -> Self {
        Node::default().with("type", Value::String(node_type.into()))
    }

    /// Sets `key` on an object node. Non-object nodes are returned unchanged.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        if let Value::Object(map) = &mut self.0 {
            map.insert(key.to_string(), value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn type_str(&self) -> Option<&str> {
        self.get("type").and_then(Value::as_str)
    }

    pub fn name_str(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    /// Keys of the `credentials` mapping. Empty when it is absent or not a mapping.
    pub fn credential_keys(&self) -> impl Iterator<Item = &str> {
        self.get("credentials")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|creds| creds.keys().map(String::as_str))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("invalid workflow document: {0}")]
    Schema(#[source] serde_json::Error),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Data => DecodeError::Schema(err),
            serde_json::error::Category::Syntax
            | serde_json::error::Category::Eof
            | serde_json::error::Category::Io => DecodeError::Syntax(err),
        }
    }
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        AppError::with_source(ErrorCategory::DecodeError, err.to_string(), err)
    }
}

/// Parse a document from its serialized bytes.
pub fn decode(bytes: &[u8]) -> Result<WorkflowDocument, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Serialize with a fixed two-space indent and no trailing newline.
pub fn encode(document: &WorkflowDocument) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(document)
}

impl WorkflowDocument {
    /// Interpret an already-parsed JSON value as a document.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// A top-level field other than `nodes`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if key == NODES {
            return None;
        }
        self.fields.get(key)
    }

    pub fn id(&self) -> Option<&Value> {
        self.get("id")
    }

    /// The `id` rendered as text when it is a non-empty string or a number.
    pub fn id_text(&self) -> Option<String> {
        match self.id()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// `name` when it is a non-empty string.
    pub fn name_str(&self) -> Option<&str> {
        self.get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// `connections` when it is a mapping.
    pub fn connections(&self) -> Option<&Map<String, Value>> {
        self.get("connections").and_then(Value::as_object)
    }

    /// `meta` when it is a mapping.
    pub fn meta(&self) -> Option<&Map<String, Value>> {
        self.get("meta").and_then(Value::as_object)
    }

    pub fn meta_value(&self, key: &str) -> Option<&Value> {
        self.meta().and_then(|m| m.get(key))
    }

    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta_value(key).and_then(Value::as_str)
    }

    /// Mutable `meta`. An absent or non-mapping `meta` is replaced by an empty mapping.
    pub fn meta_mut(&mut self) -> &mut Map<String, Value> {
        let slot = self
            .fields
            .entry("meta")
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        match slot {
            Value::Object(map) => map,
            _ => unreachable!("meta slot was just made a mapping"),
        }
    }
}
