use crate::core::document::Node;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Named groups of node type identifiers that archetype dimensions draw from.
pub type NodeCatalog = IndexMap<String, Vec<String>>;

fn default_port() -> String {
    "main".to_string()
}

/// Declarative archetype as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub dimensions: Vec<Dimension>,
    pub nodes: Vec<NodeTemplate>,
    #[serde(default)]
    pub edges: Vec<EdgeTemplate>,
    /// Dimension pairs that must not take the same value in one combination.
    #[serde(default)]
    pub distinct: Vec<[String; 2]>,
}

/// One axis of the cartesian product; its values are the union of the listed catalog groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub groups: Vec<String>,
}

/// Node role in the skeleton. `type` may contain `{dimension}` placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub position: [i64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeTemplate {
    pub from: String,
    pub to: String,
    #[serde(default = "default_port")]
    pub port: String,
}

impl ArchetypeTemplate {
    /// Bind the template's dimensions to concrete values from `catalog`.
    #[allow(clippy::result_large_err)]
    pub fn resolve(&self, catalog: &NodeCatalog) -> Result<Archetype, AppError> {
        let mut values = Vec::with_capacity(self.dimensions.len());
        for dimension in &self.dimensions {
            let mut dimension_values = Vec::new();
            for group in &dimension.groups {
                let members = catalog.get(group).ok_or_else(|| {
                    AppError::new(
                        ErrorCategory::ValidationError,
                        format!(
                            "archetype '{}' dimension '{}' references unknown catalog group '{}'",
                            self.id, dimension.name, group
                        ),
                    )
                })?;
                dimension_values.extend(members.iter().cloned());
            }
            values.push(dimension_values);
        }

        let mut distinct = Vec::with_capacity(self.distinct.len());
        for [left, right] in &self.distinct {
            let left_index = self.dimension_index(left)?;
            let right_index = self.dimension_index(right)?;
            distinct.push((left_index, right_index));
        }

        Ok(Archetype {
            template: self.clone(),
            values,
            distinct,
        })
    }

    #[allow(clippy::result_large_err)]
    fn dimension_index(&self, name: &str) -> Result<usize, AppError> {
        self.dimensions
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| {
                AppError::new(
                    ErrorCategory::ValidationError,
                    format!(
                        "archetype '{}' constrains unknown dimension '{}'",
                        self.id, name
                    ),
                )
            })
    }

    /// Structural problems that do not depend on the catalog.
    pub fn lint(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.dimensions.is_empty() {
            problems.push(format!("archetype '{}' has no dimensions", self.id));
        }
        for dimension in &self.dimensions {
            let placeholder = format!("{{{}}}", dimension.name);
            if !self.nodes.iter().any(|n| n.node_type.contains(&placeholder)) {
                problems.push(format!(
                    "archetype '{}' dimension '{}' is not used by any node",
                    self.id, dimension.name
                ));
            }
        }
        for edge in &self.edges {
            for endpoint in [&edge.from, &edge.to] {
                if !self.nodes.iter().any(|n| &n.name == endpoint) {
                    problems.push(format!(
                        "archetype '{}' edge references unknown node '{}'",
                        self.id, endpoint
                    ));
                }
            }
        }
        problems
    }
}

/// An archetype with every dimension bound to its value list.
#[derive(Debug, Clone)]
pub struct Archetype {
    template: ArchetypeTemplate,
    values: Vec<Vec<String>>,
    distinct: Vec<(usize, usize)>,
}

/// One synthetic workflow skeleton.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowGraph {
    pub nodes: Vec<Node>,
    pub connections: Map<String, Value>,
}

impl Archetype {
    pub fn id(&self) -> &str {
        &self.template.id
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn template(&self) -> &ArchetypeTemplate {
        &self.template
    }

    /// Upper bound on the combinations; `distinct` constraints may yield fewer.
    pub fn combinations(&self) -> usize {
        self.values.iter().map(Vec::len).product()
    }

    /// A fresh cursor positioned at the first combination.
    pub fn cursor(&self) -> ArchetypeCursor<'_> {
        ArchetypeCursor::new(self)
    }

    fn admits(&self, indices: &[usize]) -> bool {
        self.distinct
            .iter()
            .all(|&(l, r)| self.values[l][indices[l]] != self.values[r][indices[r]])
    }

    fn render(&self, indices: &[usize]) -> WorkflowGraph {
        let nodes = self
            .template
            .nodes
            .iter()
            .map(|node| {
                let mut node_type = node.node_type.clone();
                for (position, dimension) in self.template.dimensions.iter().enumerate() {
                    let placeholder = format!("{{{}}}", dimension.name);
                    let value = &self.values[position][indices[position]];
                    node_type = node_type.replace(&placeholder, value);
                }
                let rendered = Node::default()
                    .with("name", Value::String(node.name.clone()))
                    .with("type", Value::String(node_type));
                let rendered = match &node.parameters {
                    Some(parameters) => {
                        rendered.with("parameters", Value::Object(parameters.clone()))
                    }
                    None => rendered,
                };
                rendered.with("position", json!(node.position))
            })
            .collect();

        let mut connections = Map::new();
        for edge in &self.template.edges {
            let ports = connections
                .entry(edge.from.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(ports) = ports {
                let outputs = ports
                    .entry(edge.port.clone())
                    .or_insert_with(|| json!([[]]));
                if let Some(first) = outputs.get_mut(0).and_then(Value::as_array_mut) {
                    first.push(json!({"node": edge.to, "type": edge.port, "index": 0}));
                }
            }
        }

        WorkflowGraph { nodes, connections }
    }
}

/// Odometer over an archetype's cartesian product.
///
/// The first dimension is the outermost loop and the last dimension advances
/// fastest. Combinations rejected by a `distinct` constraint are stepped over.
pub struct ArchetypeCursor<'a> {
    archetype: &'a Archetype,
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'a> ArchetypeCursor<'a> {
    fn new(archetype: &'a Archetype) -> Self {
        let exhausted = archetype.values.is_empty() || archetype.values.iter().any(Vec::is_empty);
        ArchetypeCursor {
            archetype,
            indices: vec![0; archetype.values.len()],
            exhausted,
        }
    }

    fn advance(&mut self) {
        for position in (0..self.indices.len()).rev() {
            self.indices[position] += 1;
            if self.indices[position] < self.archetype.values[position].len() {
                return;
            }
            self.indices[position] = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for ArchetypeCursor<'_> {
    type Item = WorkflowGraph;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            let admitted = self.archetype.admits(&self.indices);
            let graph = admitted.then(|| self.archetype.render(&self.indices));
            self.advance();
            if graph.is_some() {
                return graph;
            }
        }
        None
    }
}
