//! Synthetic workflow generation from declarative archetypes.

mod archetype;

pub use archetype::{
    Archetype, ArchetypeCursor, ArchetypeTemplate, Dimension, EdgeTemplate, NodeCatalog,
    NodeTemplate, WorkflowGraph,
};

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use crate::utils::{IdMinter, JsonLinesWriter};
use indexmap::IndexMap;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;
use std::time::{Duration, Instant};

/// One emitted JSONL line.
#[derive(Debug, Clone, Serialize)]
pub struct SyntheticRecord {
    pub id: String,
    pub name: String,
    pub node_count: usize,
    pub integrations: Vec<String>,
    pub content: WorkflowGraph,
    pub meta: SyntheticMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyntheticMeta {
    pub generated: bool,
    pub archetype: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub written: usize,
    pub per_archetype: IndexMap<String, usize>,
    /// Whether the ceiling stopped expansion before every archetype was exhausted.
    pub capped: bool,
    pub elapsed: Duration,
}

/// Every archetype's combinations, archetype by archetype.
pub fn combinations(
    archetypes: &[Archetype],
) -> impl Iterator<Item = (&Archetype, WorkflowGraph)> {
    archetypes
        .iter()
        .flat_map(|archetype| archetype.cursor().map(move |graph| (archetype, graph)))
}

/// [`combinations`] cut off after `cap` graphs in total.
pub fn expand(
    archetypes: &[Archetype],
    cap: usize,
) -> impl Iterator<Item = (&Archetype, WorkflowGraph)> {
    combinations(archetypes).take(cap)
}

/// Resolve templates against a catalog, keeping only the ids in `only` when it is non-empty.
#[allow(clippy::result_large_err)]
pub fn resolve_archetypes(
    templates: &[ArchetypeTemplate],
    catalog: &NodeCatalog,
    only: &[String],
) -> Result<Vec<Archetype>, AppError> {
    for id in only {
        if !templates.iter().any(|t| &t.id == id) {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                format!("unknown archetype '{}'", id),
            ));
        }
    }
    templates
        .iter()
        .filter(|t| only.is_empty() || only.contains(&t.id))
        .map(|t| t.resolve(catalog))
        .collect()
}

pub struct SyntheticGenerator<R: Rng> {
    archetypes: Vec<Archetype>,
    max_documents: usize,
    namespace: String,
    minter: IdMinter<R>,
    progress_interval: usize,
}

impl<R: Rng> SyntheticGenerator<R> {
    pub fn new(
        archetypes: Vec<Archetype>,
        max_documents: usize,
        namespace: impl Into<String>,
        minter: IdMinter<R>,
    ) -> Self {
        SyntheticGenerator {
            archetypes,
            max_documents,
            namespace: namespace.into(),
            minter,
            progress_interval: 5000,
        }
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Stream records into `output` until every archetype is exhausted or the ceiling is hit.
    #[allow(clippy::result_large_err)]
    pub fn generate<W: Write>(&mut self, output: W) -> Result<GenerateStats, AppError> {
        let started = Instant::now();
        let mut writer = JsonLinesWriter::new(output);
        let mut stats = GenerateStats::default();
        let mut current: Option<&str> = None;

        let Self {
            archetypes,
            max_documents,
            namespace,
            minter,
            progress_interval,
        } = self;

        let mut stream = combinations(archetypes);
        for (sequence, (archetype, graph)) in stream.by_ref().take(*max_documents).enumerate() {
            if current != Some(archetype.id()) {
                tracing::info!(
                    archetype = archetype.id(),
                    "Generating variations for: {}",
                    archetype.name()
                );
                current = Some(archetype.id());
            }

            let record = SyntheticRecord {
                id: minter.mint(),
                name: format!("{} (Variant {})", archetype.name(), sequence),
                node_count: graph.nodes.len(),
                integrations: integrations(&graph, namespace),
                content: graph,
                meta: SyntheticMeta {
                    generated: true,
                    archetype: archetype.id().to_string(),
                },
            };
            writer.write_record(&record).map_err(|e| {
                AppError::with_source(ErrorCategory::IoError, "failed to write synthetic output", e)
            })?;

            stats.written += 1;
            *stats
                .per_archetype
                .entry(archetype.id().to_string())
                .or_insert(0) += 1;
            if stats.written % *progress_interval == 0 {
                tracing::info!(written = stats.written, "Generated {} workflows...", stats.written);
            }
        }

        writer.finish().map_err(|e| {
            AppError::with_source(ErrorCategory::IoError, "failed to flush synthetic output", e)
        })?;

        stats.capped = stream.next().is_some();
        stats.elapsed = started.elapsed();
        Ok(stats)
    }
}

/// Namespace-stripped node types, minus triggers, sorted and deduplicated.
fn integrations(graph: &WorkflowGraph, namespace: &str) -> Vec<String> {
    graph
        .nodes
        .iter()
        .filter_map(|n| n.type_str())
        .map(|t| t.strip_prefix(namespace).unwrap_or(t))
        .filter(|t| !t.contains("Trigger"))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
