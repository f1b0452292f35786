pub mod args;
pub mod commands;

pub use args::{
    CleanArgs, ComplexityArgs, GenerateArgs, LabelArgs, LabelCommand, ManifestArgs, SearchTextArgs,
    SemanticArgs,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
CORPUS COMMANDS:\n{subcommands}\n\
{after-help}";

fn after_long_help() -> String {
    let mut help = String::from(
        "Typical flow: clean external data, generate synthetic variants, label the corpus, then build the manifest.\n\nENVIRONMENT:\n",
    );
    for line in crate::core::ConfigLoader::env_var_documentation() {
        help.push_str("    ");
        help.push_str(line);
        help.push('\n');
    }
    help
}

#[derive(Parser)]
#[command(name = "atlas")]
#[command(version = crate::VERSION)]
#[command(about = "Batch tooling for a filesystem corpus of workflow documents")]
#[command(help_template = HELP_TEMPLATE)]
#[command(after_long_help = after_long_help())]
pub struct Args {
    /// Workspace root holding atlas.toml; relative paths resolve against it (default: current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub workspace: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(
        about = "Rewrite labels inside every corpus document",
        long_about = "Label walks the corpus and stores derived labels in each document's meta block. Documents that already carry the labels are left untouched.",
        after_help = "Examples:\n    atlas label complexity --corpus workflows\n    atlas label semantic --clusters workflow_clusters.json"
    )]
    Label(LabelArgs),
    #[command(
        about = "Normalize an external JSONL dataset",
        long_about = "Clean turns key/value training records into normalized workflow records, skipping lines that cannot be read.",
        after_help = "Example:\n    atlas clean --input external.jsonl --output cleaned.jsonl --dedupe"
    )]
    Clean(CleanArgs),
    #[command(
        about = "Expand archetypes into synthetic workflows",
        long_about = "Generate walks every combination of each archetype's dimensions and writes one JSONL record per workflow, up to a global ceiling.",
        after_help = "Example:\n    atlas generate --max-documents 500 --archetype support_triage"
    )]
    Generate(GenerateArgs),
    #[command(
        about = "Build the browsing manifest for the frontend",
        long_about = "Manifest groups corpus documents by their top-level directory and writes a single JSON index with per-document metadata.",
        after_help = "Example:\n    atlas manifest --corpus workflows --output web/public/workflows.json"
    )]
    Manifest(ManifestArgs),
    #[command(
        about = "Add search_text to normalized records",
        long_about = "Search-text reads normalized JSONL records and adds a single searchable string built from name, description, instruction, archetype, category, and tools.",
        after_help = "Example:\n    atlas search-text --input n8n_workflows.jsonl --output n8n_workflows_final.jsonl"
    )]
    SearchText(SearchTextArgs),
}

/// Dispatch a parsed command against an already resolved workspace root.
pub async fn run(args: Args, workspace: &Path) -> crate::Result<()> {
    match args.command {
        Command::Label(label_args) => commands::label(workspace, label_args).await,
        Command::Clean(clean_args) => commands::clean(workspace, clean_args).await,
        Command::Generate(generate_args) => commands::generate(workspace, generate_args).await,
        Command::Manifest(manifest_args) => commands::manifest(workspace, manifest_args).await,
        Command::SearchText(search_args) => commands::search_text(workspace, search_args).await,
    }
}
