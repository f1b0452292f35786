use crate::core::generator::{ArchetypeTemplate, NodeCatalog};
use crate::logging::config::LoggingSection;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod defaults;

/// Main Atlas configuration loaded from atlas.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AtlasConfig {
    #[serde(default)]
    pub corpus: CorpusConfig,

    #[serde(default)]
    pub reporting: ReportingConfig,

    #[serde(default)]
    pub derivation: DerivationConfig,

    #[serde(default)]
    pub labeling: LabelingConfig,

    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub cleaner: CleanerConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub search_text: SearchTextConfig,

    /// Read separately by the logging subsystem; kept here so the file parses as one document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingSection>,
}

/// Corpus location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_corpus_root")]
    pub root: PathBuf,

    /// File extension that marks a corpus document, with the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// Operator-facing reporting policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// Per-document errors printed before the rest are only counted
    #[serde(default = "default_max_errors_displayed")]
    pub max_errors_displayed: usize,

    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

/// Inputs to integration and credential derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivationConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Node kinds (without namespace) that never count as integrations
    #[serde(default = "defaults::core_nodes")]
    pub core_nodes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelingConfig {
    #[serde(default = "default_clusters_file")]
    pub clusters_file: PathBuf,

    #[serde(default = "default_true")]
    pub case_insensitive_lookup: bool,
}

/// Display metadata for a manifest category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMeta {
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    #[serde(default = "default_manifest_output")]
    pub output: PathBuf,

    /// Base for `relativePath`; the corpus root's parent when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<PathBuf>,

    #[serde(default = "default_category_description")]
    pub default_description: String,

    #[serde(default = "defaults::categories")]
    pub categories: IndexMap<String, CategoryMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanerConfig {
    #[serde(default = "default_cleaner_input")]
    pub input: PathBuf,

    #[serde(default = "default_cleaner_output")]
    pub output: PathBuf,

    #[serde(default = "default_name_fallback_chars")]
    pub name_fallback_chars: usize,

    #[serde(default = "default_source_tag")]
    pub source_tag: String,

    #[serde(default)]
    pub exclude_core_nodes: bool,

    #[serde(default)]
    pub dedupe: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_generator_output")]
    pub output: PathBuf,

    /// Ceiling on emitted documents across every archetype of a run
    #[serde(default = "default_max_documents")]
    pub max_documents: usize,

    #[serde(default = "defaults::catalog")]
    pub catalog: NodeCatalog,

    #[serde(default = "defaults::archetypes")]
    pub archetypes: Vec<ArchetypeTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTextConfig {
    #[serde(default = "default_search_text_input")]
    pub input: PathBuf,

    #[serde(default = "default_search_text_output")]
    pub output: PathBuf,
}

// Default functions
fn default_corpus_root() -> PathBuf {
    PathBuf::from("workflows")
}

fn default_extension() -> String {
    ".json".to_string()
}

fn default_max_errors_displayed() -> usize {
    5
}

fn default_progress_interval() -> usize {
    5000
}

fn default_namespace() -> String {
    "n8n-nodes-base.".to_string()
}

fn default_clusters_file() -> PathBuf {
    PathBuf::from("workflow_clusters.json")
}

fn default_true() -> bool {
    true
}

fn default_manifest_output() -> PathBuf {
    PathBuf::from("web/public/workflows.json")
}

fn default_category_description() -> String {
    "Community-contributed workflows.".to_string()
}

fn default_cleaner_input() -> PathBuf {
    PathBuf::from("n8n_external_converted.jsonl")
}

fn default_cleaner_output() -> PathBuf {
    PathBuf::from("n8n_external_cleaned.jsonl")
}

fn default_name_fallback_chars() -> usize {
    100
}

fn default_source_tag() -> String {
    "external_community".to_string()
}

fn default_generator_output() -> PathBuf {
    PathBuf::from("workflows/synthetic_generated.jsonl")
}

fn default_max_documents() -> usize {
    30_000
}

fn default_search_text_input() -> PathBuf {
    PathBuf::from("n8n_workflows.jsonl")
}

fn default_search_text_output() -> PathBuf {
    PathBuf::from("n8n_workflows_final.jsonl")
}

impl Default for CorpusConfig {
    fn default() -> Self {
        CorpusConfig {
            root: default_corpus_root(),
            extension: default_extension(),
        }
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        ReportingConfig {
            max_errors_displayed: default_max_errors_displayed(),
            progress_interval: default_progress_interval(),
        }
    }
}

impl Default for DerivationConfig {
    fn default() -> Self {
        DerivationConfig {
            namespace: default_namespace(),
            core_nodes: defaults::core_nodes(),
        }
    }
}

impl Default for LabelingConfig {
    fn default() -> Self {
        LabelingConfig {
            clusters_file: default_clusters_file(),
            case_insensitive_lookup: true,
        }
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            output: default_manifest_output(),
            relative_to: None,
            default_description: default_category_description(),
            categories: defaults::categories(),
        }
    }
}

impl Default for CleanerConfig {
    fn default() -> Self {
        CleanerConfig {
            input: default_cleaner_input(),
            output: default_cleaner_output(),
            name_fallback_chars: default_name_fallback_chars(),
            source_tag: default_source_tag(),
            exclude_core_nodes: false,
            dedupe: false,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output: default_generator_output(),
            max_documents: default_max_documents(),
            catalog: defaults::catalog(),
            archetypes: defaults::archetypes(),
        }
    }
}

impl Default for SearchTextConfig {
    fn default() -> Self {
        SearchTextConfig {
            input: default_search_text_input(),
            output: default_search_text_output(),
        }
    }
}


pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;
