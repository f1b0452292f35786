//! Frontend manifest: a read-only index of the labeled corpus, grouped by
//! top-level category directory.

use crate::core::config::CategoryMeta;
use crate::core::derive::{complexity_tier, NodeClassifier, NodeSummary};
use crate::core::document::decode;
use crate::core::error::AppError;
use crate::core::types::{Complexity, ErrorCategory};
use crate::core::walker::CorpusWalker;
use crate::utils::{relative_slash_path, FileSerializer, FileUtils, JsonSerializer};
use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::join_all;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub generated_at: String,
    pub total_workflows: usize,
    pub category_count: usize,
    pub categories: Vec<ManifestCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestCategory {
    pub id: String,
    pub label: String,
    pub description: String,
    pub count: usize,
    pub workflows: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub name: String,
    pub file_name: String,
    pub relative_path: String,
    pub category_id: String,
    pub size_bytes: u64,
    pub node_count: usize,
    pub complexity: Complexity,
    pub integrations: Vec<String>,
    pub credentials: Vec<String>,
}

/// Documents that could not contribute full metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Listed with default metadata because the content did not decode.
    pub decode_failures: usize,
    /// Left out because their size could not be read.
    pub unreadable: usize,
}

impl Manifest {
    /// Whether the totals agree with the per-category contents.
    pub fn is_consistent(&self) -> bool {
        self.category_count == self.categories.len()
            && self.total_workflows == self.categories.iter().map(|c| c.count).sum::<usize>()
            && self.categories.iter().all(|c| c.count == c.workflows.len())
    }
}

pub struct ManifestBuilder {
    corpus_root: PathBuf,
    extension: String,
    relative_to: PathBuf,
    categories: IndexMap<String, CategoryMeta>,
    default_description: String,
    classifier: NodeClassifier,
}

impl ManifestBuilder {
    /// `relative_to` defaults to the corpus root's parent.
    pub fn new(
        corpus_root: impl Into<PathBuf>,
        extension: impl Into<String>,
        classifier: NodeClassifier,
    ) -> Self {
        let corpus_root = corpus_root.into();
        let relative_to = corpus_root
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        ManifestBuilder {
            corpus_root,
            extension: extension.into(),
            relative_to,
            categories: IndexMap::new(),
            default_description: "Community-contributed workflows.".to_string(),
            classifier,
        }
    }

    pub fn with_relative_to(mut self, base: impl Into<PathBuf>) -> Self {
        self.relative_to = base.into();
        self
    }

    pub fn with_categories(
        mut self,
        categories: IndexMap<String, CategoryMeta>,
        default_description: impl Into<String>,
    ) -> Self {
        self.categories = categories;
        self.default_description = default_description.into();
        self
    }

    #[allow(clippy::result_large_err)]
    pub async fn build(&self) -> Result<(Manifest, BuildStats), AppError> {
        self.build_at(Utc::now()).await
    }

    /// Build with a fixed `generatedAt`.
    #[allow(clippy::result_large_err)]
    pub async fn build_at(&self, now: DateTime<Utc>) -> Result<(Manifest, BuildStats), AppError> {
        let mut stats = BuildStats::default();
        let mut categories = Vec::new();

        for category_id in self.category_dirs().await? {
            let meta = self.categories.get(&category_id).cloned().unwrap_or_else(|| {
                CategoryMeta {
                    label: category_id.clone(),
                    description: self.default_description.clone(),
                }
            });

            let files = self.category_files(&category_id).await?;
            let results = join_all(files.iter().map(|path| self.entry(&category_id, path))).await;

            let mut workflows = Vec::with_capacity(results.len());
            for result in results {
                match result {
                    EntryResult::Complete(entry) => workflows.push(entry),
                    EntryResult::Defaulted(entry) => {
                        stats.decode_failures += 1;
                        workflows.push(entry);
                    }
                    EntryResult::Unreadable => stats.unreadable += 1,
                }
            }
            workflows.sort_by(|a, b| {
                a.file_name
                    .cmp(&b.file_name)
                    .then_with(|| a.relative_path.cmp(&b.relative_path))
            });

            tracing::debug!(category = %category_id, workflows = workflows.len(), "category indexed");
            categories.push(ManifestCategory {
                id: category_id,
                label: meta.label,
                description: meta.description,
                count: workflows.len(),
                workflows,
            });
        }

        categories.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));

        let manifest = Manifest {
            generated_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_workflows: categories.iter().map(|c| c.count).sum(),
            category_count: categories.len(),
            categories,
        };
        Ok((manifest, stats))
    }

    /// Names of the top-level directories under the corpus root.
    #[allow(clippy::result_large_err)]
    async fn category_dirs(&self) -> Result<Vec<String>, AppError> {
        let root = &self.corpus_root;
        let root_error = |e: std::io::Error| {
            AppError::with_source(
                ErrorCategory::IoError,
                format!("cannot read corpus root {}", root.display()),
                e,
            )
            .with_path(root)
        };

        let mut reader = tokio::fs::read_dir(root).await.map_err(root_error)?;
        let mut dirs = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(root_error)? {
            let is_dir = match entry.file_type().await {
                Ok(file_type) => file_type.is_dir(),
                Err(err) => {
                    tracing::warn!(path = %entry.path().display(), error = %err, "skipping unreadable entry");
                    false
                }
            };
            if !is_dir {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => dirs.push(name),
                Err(name) => {
                    tracing::warn!(name = ?name, "skipping category with non UTF-8 name");
                }
            }
        }
        Ok(dirs)
    }

    #[allow(clippy::result_large_err)]
    async fn category_files(&self, category_id: &str) -> Result<Vec<PathBuf>, AppError> {
        let walker = CorpusWalker::new(self.corpus_root.join(category_id), self.extension.clone());
        tokio::task::spawn_blocking(move || walker.collect())
            .await
            .map_err(|e| {
                AppError::with_source(ErrorCategory::InternalError, "corpus walk panicked", e)
            })?
    }

    async fn entry(&self, category_id: &str, path: &Path) -> EntryResult {
        let size_bytes = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to stat workflow");
                return EntryResult::Unreadable;
            }
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = file_name
            .strip_suffix(self.extension.as_str())
            .unwrap_or(&file_name)
            .to_string();

        let parsed = match tokio::fs::read(path).await {
            Ok(bytes) => decode(&bytes).map_err(|e| e.to_string()),
            Err(err) => Err(err.to_string()),
        };
        let (node_count, summary, complete) = match parsed {
            Ok(document) => (
                document.node_count(),
                self.classifier.summarize(&document.nodes),
                true,
            ),
            Err(message) => {
                tracing::warn!(path = %path.display(), "Failed to parse {}: {}", path.display(), message);
                (0, NodeSummary::default(), false)
            }
        };

        let entry = ManifestEntry {
            name,
            file_name,
            relative_path: relative_slash_path(&self.relative_to, path),
            category_id: category_id.to_string(),
            size_bytes,
            node_count,
            complexity: complexity_tier(node_count),
            integrations: summary.integrations,
            credentials: summary.credentials,
        };
        if complete {
            EntryResult::Complete(entry)
        } else {
            EntryResult::Defaulted(entry)
        }
    }
}

enum EntryResult {
    Complete(ManifestEntry),
    Defaulted(ManifestEntry),
    Unreadable,
}

/// Replace the manifest file wholesale with a pretty-printed build.
#[allow(clippy::result_large_err)]
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), AppError> {
    FileUtils
        .save_to_file(path, manifest, &JsonSerializer)
        .map_err(|e| {
            AppError::with_source(
                ErrorCategory::WriteError,
                format!("failed to write manifest {}", path.display()),
                e,
            )
            .with_path(path)
        })
}
