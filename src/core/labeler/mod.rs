//! In-place labeling of a workflow corpus.
//!
//! Each file moves through decode, derive, compare, and (only when something
//! changed) an atomic rewrite. Failures stay at the document boundary: they
//! are counted and reported through an [`ErrorReporter`], and the run carries on.

mod passes;

pub use passes::{ComplexityPass, LabelPass, PassOutcome, SemanticPass};

use crate::core::document::{decode, encode};
use crate::core::error::{AppError, ErrorReporter};
use crate::core::types::ErrorCategory;
use crate::core::walker::CorpusWalker;
use crate::utils::write_atomic;
use indexmap::IndexMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// Aggregate counters for one labeling run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub processed: usize,
    pub updated: usize,
    pub skipped: usize,
    pub not_found: usize,
    pub errors: usize,
    pub histogram: IndexMap<String, usize>,
    pub elapsed: Duration,
}

impl RunStats {
    fn seeded(buckets: Vec<String>) -> Self {
        RunStats {
            histogram: buckets.into_iter().map(|b| (b, 0)).collect(),
            ..Default::default()
        }
    }

    fn count_bucket(&mut self, bucket: String) {
        *self.histogram.entry(bucket).or_insert(0) += 1;
    }
}

pub struct LabelApplier<'r, P: LabelPass> {
    walker: CorpusWalker,
    pass: P,
    reporter: &'r dyn ErrorReporter,
    progress_interval: usize,
}

impl<'r, P: LabelPass> LabelApplier<'r, P> {
    pub fn new(walker: CorpusWalker, pass: P, reporter: &'r dyn ErrorReporter) -> Self {
        LabelApplier {
            walker,
            pass,
            reporter,
            progress_interval: 5000,
        }
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    pub fn pass(&self) -> &P {
        &self.pass
    }

    /// Label every document under the walker's root.
    ///
    /// Returns an error only when the corpus root itself cannot be read.
    #[allow(clippy::result_large_err)]
    pub fn run(&self) -> Result<RunStats, AppError> {
        let started = Instant::now();
        let files = self.walker.collect()?;
        let total = files.len();
        tracing::info!(
            root = %self.walker.root().display(),
            files = total,
            "found workflow files"
        );

        let mut stats = RunStats::seeded(self.pass.seed_buckets());
        for path in &files {
            stats.processed += 1;
            match self.label_file(path) {
                Ok(PassOutcome::AlreadyLabeled { bucket }) => {
                    stats.skipped += 1;
                    stats.count_bucket(bucket);
                }
                Ok(PassOutcome::Changed { bucket }) => {
                    stats.updated += 1;
                    stats.count_bucket(bucket);
                }
                Ok(PassOutcome::NotFound) => {
                    stats.not_found += 1;
                }
                Err(error) => {
                    stats.errors += 1;
                    self.reporter.report_error(&error);
                }
            }

            if stats.processed % self.progress_interval == 0 {
                tracing::info!(
                    processed = stats.processed,
                    total,
                    updated = stats.updated,
                    "Processed {}/{}...",
                    stats.processed,
                    total
                );
            }
        }

        stats.elapsed = started.elapsed();
        tracing::info!(
            processed = stats.processed,
            updated = stats.updated,
            skipped = stats.skipped,
            not_found = stats.not_found,
            errors = stats.errors,
            "labeling run finished"
        );
        Ok(stats)
    }

    #[allow(clippy::result_large_err)]
    fn label_file(&self, path: &Path) -> Result<PassOutcome, AppError> {
        let bytes = fs::read(path).map_err(|e| {
            AppError::with_source(ErrorCategory::DecodeError, e.to_string(), e).with_path(path)
        })?;
        let mut document = decode(&bytes).map_err(|e| AppError::from(e).with_path(path))?;

        let outcome = self.pass.apply(&mut document, path);
        if let PassOutcome::Changed { .. } = outcome {
            let encoded = encode(&document).map_err(|e| {
                AppError::with_source(ErrorCategory::WriteError, e.to_string(), e).with_path(path)
            })?;
            write_atomic(path, &encoded).map_err(|e| {
                AppError::with_source(ErrorCategory::WriteError, e.to_string(), e).with_path(path)
            })?;
        }
        Ok(outcome)
    }
}

/// Operator-facing report of a finished run.
pub struct RunSummary<'a> {
    pub title: &'a str,
    pub stats: &'a RunStats,
    pub show_not_found: bool,
    pub suppressed_errors: usize,
}

impl<'a> RunSummary<'a> {
    pub fn new<P: LabelPass>(pass: &P, stats: &'a RunStats, reporter: &dyn ErrorReporter) -> Self {
        RunSummary {
            title: pass.title(),
            stats,
            show_not_found: pass.uses_lookup(),
            suppressed_errors: reporter.suppressed(),
        }
    }
}

impl fmt::Display for RunSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats;
        writeln!(f, "=== {} ===", self.title)?;
        writeln!(f, "Processed: {}", stats.processed)?;
        writeln!(f, "Updated:   {}", stats.updated)?;
        writeln!(f, "Skipped:   {} (already labeled)", stats.skipped)?;
        if self.show_not_found {
            writeln!(f, "Not found: {}", stats.not_found)?;
        }
        if self.suppressed_errors > 0 {
            writeln!(
                f,
                "Errors:    {} ({} not shown)",
                stats.errors, self.suppressed_errors
            )?;
        } else {
            writeln!(f, "Errors:    {}", stats.errors)?;
        }
        writeln!(
            f,
            "Elapsed:   {}",
            humantime::format_duration(Duration::from_millis(stats.elapsed.as_millis() as u64))
        )?;

        if !stats.histogram.is_empty() {
            writeln!(f)?;
            writeln!(f, "Distribution:")?;
            let width = stats.histogram.keys().map(|k| k.len()).max().unwrap_or(0) + 1;
            for (bucket, count) in &stats.histogram {
                writeln!(f, "  {:<width$} {}", format!("{}:", bucket), count, width = width)?;
            }
        }
        Ok(())
    }
}
