use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct LabelArgs {
    #[command(subcommand)]
    pub command: LabelCommand,
}

#[derive(Subcommand)]
pub enum LabelCommand {
    /// Store meta.complexity and meta.nodeCount derived from each document's node count
    Complexity(ComplexityArgs),
    /// Store meta.semanticLabel and meta.clusterId from the cluster assignment file
    Semantic(SemanticArgs),
}

#[derive(Args)]
pub struct ComplexityArgs {
    /// Corpus root to walk (default: [corpus].root)
    #[arg(long, value_name = "DIR")]
    pub corpus: Option<PathBuf>,

    /// Number of per-document errors printed before the rest are only counted (default: 5)
    #[arg(long, value_name = "N", help_heading = "Output Options")]
    pub max_errors: Option<usize>,
}

#[derive(Args)]
pub struct SemanticArgs {
    /// Corpus root to walk (default: [corpus].root)
    #[arg(long, value_name = "DIR")]
    pub corpus: Option<PathBuf>,

    /// Cluster assignment file mapping identities to labels (default: [labeling].clusters_file)
    #[arg(long, value_name = "FILE")]
    pub clusters: Option<PathBuf>,

    /// Match identities exactly instead of falling back to a lowercase lookup
    #[arg(long)]
    pub case_sensitive: bool,

    /// Number of per-document errors printed before the rest are only counted (default: 5)
    #[arg(long, value_name = "N", help_heading = "Output Options")]
    pub max_errors: Option<usize>,
}

#[derive(Args)]
pub struct CleanArgs {
    /// External JSONL dataset with key/value records (default: [cleaner].input)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Destination for normalized records (default: [cleaner].output)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Drop records whose node structure was already written
    #[arg(long)]
    pub dedupe: bool,

    /// Leave core nodes such as Set or If out of the integrations list
    #[arg(long)]
    pub exclude_core_nodes: bool,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Destination for synthetic records (default: [generator].output)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Global ceiling on emitted records (default: 30000)
    #[arg(long, value_name = "N")]
    pub max_documents: Option<usize>,

    /// Only expand the named archetype; repeat to select several
    #[arg(long = "archetype", value_name = "ID")]
    pub archetypes: Vec<String>,
}

#[derive(Args)]
pub struct ManifestArgs {
    /// Corpus root to index (default: [corpus].root)
    #[arg(long, value_name = "DIR")]
    pub corpus: Option<PathBuf>,

    /// Manifest destination (default: [manifest].output)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct SearchTextArgs {
    /// Normalized JSONL records (default: [search_text].input)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Destination for records carrying search_text (default: [search_text].output)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
