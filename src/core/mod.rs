pub mod assignments;
pub mod cleaner;
pub mod config;
pub mod derive;
pub mod document;
pub mod error;
pub mod generator;
pub mod labeler;
pub mod manifest;
pub mod search_text;
pub mod types;
pub mod walker;

pub use assignments::{AssignmentIndex, ClusterAssignment, ClusterId, DocumentIdentity};
pub use cleaner::{CleanOptions, CleanStats, CorpusCleaner};
pub use config::{AtlasConfig, ConfigLoader, ConfigValidator};
pub use derive::{complexity_tier, NodeClassifier, NodeSummary};
pub use document::{decode, encode, DecodeError, Node, WorkflowDocument};
pub use error::{AppError, CappedErrorReporter, ErrorReporter};
pub use generator::{SyntheticGenerator, WorkflowGraph};
pub use labeler::{LabelApplier, RunStats, RunSummary};
pub use manifest::{Manifest, ManifestBuilder};
pub use types::*;
pub use walker::CorpusWalker;
