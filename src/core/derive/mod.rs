use crate::core::config::DerivationConfig;
use crate::core::document::Node;
use crate::core::types::Complexity;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Complexity tier for a node count.
pub fn complexity_tier(node_count: usize) -> Complexity {
    Complexity::from_node_count(node_count)
}

/// Sorted, deduplicated integration and credential names for a node list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub integrations: Vec<String>,
    pub credentials: Vec<String>,
}

/// Decides which node types count as integrations.
#[derive(Debug, Clone)]
pub struct NodeClassifier {
    namespace: String,
    core: HashSet<String>,
}

impl NodeClassifier {
    pub fn new(namespace: impl Into<String>, core_nodes: &[String]) -> Self {
        let namespace = namespace.into();
        let core = core_nodes
            .iter()
            .map(|kind| format!("{}{}", namespace, kind))
            .collect();
        NodeClassifier { namespace, core }
    }

    pub fn from_config(config: &DerivationConfig) -> Self {
        Self::new(config.namespace.clone(), &config.core_nodes)
    }

    /// Classifier that keeps every namespaced type, core or not.
    pub fn without_allowlist(namespace: impl Into<String>) -> Self {
        Self::new(namespace, &[])
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_core(&self, node_type: &str) -> bool {
        self.core.contains(node_type)
    }

    /// The integration name for `node_type`, or `None` for foreign and core types.
    pub fn integration<'a>(&self, node_type: &'a str) -> Option<&'a str> {
        let kind = node_type.strip_prefix(self.namespace.as_str())?;
        if kind.is_empty() || self.is_core(node_type) {
            return None;
        }
        Some(kind)
    }

    pub fn summarize(&self, nodes: &[Node]) -> NodeSummary {
        let mut integrations = BTreeSet::new();
        let mut credentials = BTreeSet::new();
        for node in nodes {
            if let Some(kind) = node.type_str().and_then(|t| self.integration(t)) {
                integrations.insert(kind.to_string());
            }
            credentials.extend(node.credential_keys().map(str::to_string));
        }
        NodeSummary {
            integrations: integrations.into_iter().collect(),
            credentials: credentials.into_iter().collect(),
        }
    }
}
