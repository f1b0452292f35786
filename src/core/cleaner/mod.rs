//! Streaming normalization of the external `{key, value}` dataset.
//!
//! Input is consumed one line at a time and each accepted record is written
//! immediately, so memory use does not grow with the input. The optional
//! structural dedupe keeps only 32-byte digests.

use crate::core::derive::NodeClassifier;
use crate::core::document::{DecodeError, WorkflowDocument};
use crate::core::error::{AppError, ErrorReporter};
use crate::core::types::ErrorCategory;
use crate::utils::{IdMinter, JsonLinesWriter};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Why a single input line produced no output.
#[derive(Debug, Error)]
pub enum CleanRejection {
    #[error("line is not valid UTF-8")]
    Encoding,

    #[error("malformed record: {0}")]
    Record(#[source] serde_json::Error),

    #[error("record has no string `key`")]
    MissingKey,

    #[error("record `value` is neither a JSON string nor an object")]
    InvalidValue,

    #[error("workflow has no `nodes` array")]
    MissingNodes,

    #[error(transparent)]
    Workflow(#[from] DecodeError),
}

impl From<CleanRejection> for AppError {
    fn from(err: CleanRejection) -> Self {
        AppError::with_source(ErrorCategory::DecodeError, err.to_string(), err)
    }
}

#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub name_fallback_chars: usize,
    pub source_tag: String,
    pub dedupe: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        CleanOptions {
            name_fallback_chars: 100,
            source_tag: "external_community".to_string(),
            dedupe: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanStats {
    /// Non-blank input lines.
    pub read: usize,
    pub written: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Deserialize)]
struct ExternalRecord {
    key: Option<Value>,
    value: Option<Value>,
}

#[derive(Debug, Serialize)]
struct CleanedRecord<'a> {
    id: Value,
    name: String,
    node_count: usize,
    integrations: Vec<String>,
    credentials: Vec<String>,
    content: &'a Value,
    meta: CleanedMeta<'a>,
}

#[derive(Debug, Serialize)]
struct CleanedMeta<'a> {
    source: &'a str,
    instruction: &'a str,
}

/// Normalizes external records into the corpus record shape.
pub struct CorpusCleaner<'r, R: Rng> {
    classifier: NodeClassifier,
    options: CleanOptions,
    minter: IdMinter<R>,
    reporter: &'r dyn ErrorReporter,
    progress_interval: usize,
    signatures: HashSet<[u8; 32]>,
}

impl<'r, R: Rng> CorpusCleaner<'r, R> {
    pub fn new(
        classifier: NodeClassifier,
        options: CleanOptions,
        minter: IdMinter<R>,
        reporter: &'r dyn ErrorReporter,
    ) -> Self {
        CorpusCleaner {
            classifier,
            options,
            minter,
            reporter,
            progress_interval: 5000,
            signatures: HashSet::new(),
        }
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Clean every line of `input` into `output`.
    ///
    /// Per-line problems are counted; only stream I/O failures end the run.
    #[allow(clippy::result_large_err)]
    pub fn clean<I: BufRead, O: Write>(
        &mut self,
        input: I,
        output: O,
    ) -> Result<CleanStats, AppError> {
        let started = Instant::now();
        let mut stats = CleanStats::default();
        let mut writer = JsonLinesWriter::new(output);

        for (index, line) in input.split(b'\n').enumerate() {
            let mut line = line.map_err(|e| {
                AppError::with_source(ErrorCategory::IoError, "failed to read cleaner input", e)
            })?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            stats.read += 1;

            match self.clean_line(&line, &mut writer) {
                Ok(LineOutcome::Written) => {
                    stats.written += 1;
                    if stats.written % self.progress_interval == 0 {
                        tracing::info!(written = stats.written, "Processed {}...", stats.written);
                    }
                }
                Ok(LineOutcome::Duplicate) => stats.duplicates += 1,
                Err(LineError::Rejected(rejection)) => {
                    stats.failed += 1;
                    let mut error = AppError::from(rejection);
                    error.add_context("path", &format!("line {}", index + 1));
                    self.reporter.report_error(&error);
                }
                Err(LineError::Io(error)) => return Err(error),
            }
        }

        writer.finish().map_err(|e| {
            AppError::with_source(ErrorCategory::IoError, "failed to flush cleaner output", e)
        })?;
        stats.elapsed = started.elapsed();
        tracing::info!(
            written = stats.written,
            failed = stats.failed,
            duplicates = stats.duplicates,
            "cleaning finished"
        );
        Ok(stats)
    }

    fn clean_line<O: Write>(
        &mut self,
        line: &[u8],
        writer: &mut JsonLinesWriter<O>,
    ) -> Result<LineOutcome, LineError> {
        let text = std::str::from_utf8(line).map_err(|_| CleanRejection::Encoding)?;
        let record: ExternalRecord = serde_json::from_str(text).map_err(CleanRejection::Record)?;

        let instruction = match record.key {
            Some(Value::String(key)) => key,
            _ => return Err(CleanRejection::MissingKey.into()),
        };
        let content = match record.value {
            Some(Value::String(raw)) => serde_json::from_str::<Value>(&raw)
                .map_err(|e| CleanRejection::Workflow(DecodeError::from(e)))?,
            Some(value @ Value::Object(_)) => value,
            _ => return Err(CleanRejection::InvalidValue.into()),
        };
        if !content.get("nodes").map(Value::is_array).unwrap_or(false) {
            return Err(CleanRejection::MissingNodes.into());
        }
        let document = WorkflowDocument::deserialize(&content)
            .map_err(|e| CleanRejection::Workflow(DecodeError::from(e)))?;

        if self.options.dedupe && !self.signatures.insert(structural_digest(&document)) {
            return Ok(LineOutcome::Duplicate);
        }

        let summary = self.classifier.summarize(&document.nodes);
        let id = match document.id() {
            Some(id) if document.id_text().is_some() => id.clone(),
            _ => Value::String(self.minter.mint()),
        };
        let name = match document.name_str() {
            Some(name) => name.to_string(),
            None => instruction
                .chars()
                .take(self.options.name_fallback_chars)
                .collect(),
        };

        let cleaned = CleanedRecord {
            id,
            name,
            node_count: document.node_count(),
            integrations: summary.integrations,
            credentials: summary.credentials,
            content: &content,
            meta: CleanedMeta {
                source: &self.options.source_tag,
                instruction: &instruction,
            },
        };
        writer.write_record(&cleaned).map_err(|e| {
            LineError::Io(AppError::with_source(
                ErrorCategory::IoError,
                "failed to write cleaner output",
                e,
            ))
        })?;
        Ok(LineOutcome::Written)
    }
}

enum LineOutcome {
    Written,
    Duplicate,
}

enum LineError {
    Rejected(CleanRejection),
    Io(AppError),
}

impl From<CleanRejection> for LineError {
    fn from(rejection: CleanRejection) -> Self {
        LineError::Rejected(rejection)
    }
}

/// Sorted node types joined by `-`, then `:` and the number of connection sources.
pub fn structural_signature(document: &WorkflowDocument) -> String {
    let mut types: Vec<&str> = document
        .nodes
        .iter()
        .map(|n| n.type_str().unwrap_or(""))
        .collect();
    types.sort_unstable();
    let connections = document.connections().map(|c| c.len()).unwrap_or(0);
    format!("{}:{}", types.join("-"), connections)
}

fn structural_digest(document: &WorkflowDocument) -> [u8; 32] {
    let digest = Sha256::digest(structural_signature(document).as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
