use crate::core::document::WorkflowDocument;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Cluster identifiers appear as integers or strings in the assignment file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClusterId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterId::Number(n) => write!(f, "{}", n),
            ClusterId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl ClusterId {
    pub fn to_value(&self) -> Value {
        match self {
            ClusterId::Number(n) => Value::from(*n),
            ClusterId::Text(s) => Value::from(s.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub label: String,
    pub cluster: ClusterId,
}

#[derive(Debug, Deserialize)]
struct ClusterFile {
    assignments: IndexMap<String, ClusterAssignment>,
    #[serde(default)]
    #[allow(dead_code)]
    cluster_info: Value,
}

/// Which identity candidate produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    Id,
    FileStem,
    Name,
}

/// The lookup keys of one document, in resolution priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentIdentity {
    pub id: Option<String>,
    pub file_stem: Option<String>,
    pub name: Option<String>,
}

impl DocumentIdentity {
    pub fn of(document: &WorkflowDocument, path: &Path, extension: &str) -> Self {
        let file_stem = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.strip_suffix(extension).unwrap_or(n).to_string())
            .filter(|s| !s.is_empty());
        DocumentIdentity {
            id: document.id_text(),
            file_stem,
            name: document.name_str().map(str::to_string),
        }
    }

    fn candidates(&self) -> impl Iterator<Item = (IdentityKind, &str)> {
        [
            (IdentityKind::Id, self.id.as_deref()),
            (IdentityKind::FileStem, self.file_stem.as_deref()),
            (IdentityKind::Name, self.name.as_deref()),
        ]
        .into_iter()
        .filter_map(|(kind, key)| key.map(|k| (kind, k)))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub assignment: &'a ClusterAssignment,
    pub matched: IdentityKind,
}

/// Precomputed assignment lookup.
///
/// Candidates are tried id, then file stem, then name. For each candidate an
/// exact match wins over a case-insensitive one.
#[derive(Debug, Clone, Default)]
pub struct AssignmentIndex {
    exact: IndexMap<String, ClusterAssignment>,
    folded: HashMap<String, String>,
    case_insensitive: bool,
}

impl AssignmentIndex {
    pub fn new(assignments: IndexMap<String, ClusterAssignment>, case_insensitive: bool) -> Self {
        let mut folded = HashMap::new();
        if case_insensitive {
            for key in assignments.keys() {
                folded
                    .entry(key.to_lowercase())
                    .or_insert_with(|| key.clone());
            }
        }
        AssignmentIndex {
            exact: assignments,
            folded,
            case_insensitive,
        }
    }

    /// Read a cluster assignment file. Failure here aborts a labeling run.
    #[allow(clippy::result_large_err)]
    pub fn load(path: &Path, case_insensitive: bool) -> Result<Self, AppError> {
        let bytes = fs::read(path).map_err(|e| {
            AppError::with_source(
                ErrorCategory::IoError,
                format!("cannot read cluster assignment file {}", path.display()),
                e,
            )
            .with_path(path)
        })?;
        let file: ClusterFile = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::with_source(
                ErrorCategory::SerializationError,
                format!("invalid cluster assignment file {}", path.display()),
                e,
            )
            .with_path(path)
        })?;
        Ok(Self::new(file.assignments, case_insensitive))
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ClusterAssignment> {
        if let Some(found) = self.exact.get(key) {
            return Some(found);
        }
        if !self.case_insensitive {
            return None;
        }
        self.folded
            .get(&key.to_lowercase())
            .and_then(|original| self.exact.get(original))
    }

    /// `None` is the expected not-found outcome, not an error.
    pub fn resolve(&self, identity: &DocumentIdentity) -> Option<Resolved<'_>> {
        identity.candidates().find_map(|(kind, key)| {
            self.get(key).map(|assignment| Resolved {
                assignment,
                matched: kind,
            })
        })
    }
}
