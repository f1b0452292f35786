use crate::core::assignments::{AssignmentIndex, DocumentIdentity};
use crate::core::derive::complexity_tier;
use crate::core::document::WorkflowDocument;
use crate::core::types::Complexity;
use serde_json::Value;
use std::path::Path;

/// Result of applying a pass to one decoded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// `meta` already holds the target values; nothing to write.
    AlreadyLabeled { bucket: String },
    /// `meta` was modified and the document must be written back.
    Changed { bucket: String },
    /// No assignment exists for this document.
    NotFound,
}

/// One labeling pass: derives target values and merges them into `meta`.
pub trait LabelPass {
    /// Heading used in the run summary.
    fn title(&self) -> &'static str;

    /// Histogram buckets that are always reported, in display order.
    fn seed_buckets(&self) -> Vec<String> {
        Vec::new()
    }

    /// Whether this pass can report documents with no lookup result.
    fn uses_lookup(&self) -> bool {
        false
    }

    fn apply(&self, document: &mut WorkflowDocument, path: &Path) -> PassOutcome;
}

/// Sets `meta.complexity` and `meta.nodeCount` from the node list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexityPass;

impl LabelPass for ComplexityPass {
    fn title(&self) -> &'static str {
        "COMPLEXITY LABELS COMPLETE"
    }

    fn seed_buckets(&self) -> Vec<String> {
        Complexity::ALL.iter().map(|c| c.to_string()).collect()
    }

    fn apply(&self, document: &mut WorkflowDocument, _path: &Path) -> PassOutcome {
        let node_count = document.node_count();
        let tier = complexity_tier(node_count);
        let bucket = tier.to_string();

        let labeled = document.meta_str("complexity") == Some(tier.as_str())
            && document
                .meta_value("nodeCount")
                .and_then(Value::as_u64)
                .map(|n| n == node_count as u64)
                .unwrap_or(false);
        if labeled {
            return PassOutcome::AlreadyLabeled { bucket };
        }

        let meta = document.meta_mut();
        meta.insert("complexity".to_string(), Value::from(tier.as_str()));
        meta.insert("nodeCount".to_string(), Value::from(node_count));
        PassOutcome::Changed { bucket }
    }
}

/// Sets `meta.semanticLabel` and `meta.clusterId` from a cluster assignment.
pub struct SemanticPass<'a> {
    index: &'a AssignmentIndex,
    extension: String,
}

impl<'a> SemanticPass<'a> {
    pub fn new(index: &'a AssignmentIndex, extension: impl Into<String>) -> Self {
        SemanticPass {
            index,
            extension: extension.into(),
        }
    }
}

impl LabelPass for SemanticPass<'_> {
    fn title(&self) -> &'static str {
        "SEMANTIC LABELS APPLIED"
    }

    fn uses_lookup(&self) -> bool {
        true
    }

    fn apply(&self, document: &mut WorkflowDocument, path: &Path) -> PassOutcome {
        let identity = DocumentIdentity::of(document, path, &self.extension);
        let Some(resolved) = self.index.resolve(&identity) else {
            return PassOutcome::NotFound;
        };
        tracing::trace!(path = %path.display(), matched = ?resolved.matched, "assignment found");

        let assignment = resolved.assignment;
        let cluster = assignment.cluster.to_value();
        let bucket = assignment.label.clone();

        let labeled = document.meta_str("semanticLabel") == Some(assignment.label.as_str())
            && document.meta_value("clusterId") == Some(&cluster);
        if labeled {
            return PassOutcome::AlreadyLabeled { bucket };
        }

        let meta = document.meta_mut();
        meta.insert(
            "semanticLabel".to_string(),
            Value::from(assignment.label.as_str()),
        );
        meta.insert("clusterId".to_string(), cluster);
        PassOutcome::Changed { bucket }
    }
}
