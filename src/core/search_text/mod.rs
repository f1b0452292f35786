use crate::core::error::{AppError, ErrorReporter};
use crate::core::types::ErrorCategory;
use crate::utils::JsonLinesWriter;
use serde_json::{Map, Value};
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTextStats {
    pub written: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// Build the `search_text` string for one normalized record.
pub fn search_text(record: &Map<String, Value>) -> String {
    let meta = record.get("meta").and_then(Value::as_object);
    let meta_field = |key: &str| meta.and_then(|m| m.get(key)).and_then(non_empty);

    let mut parts = Vec::new();
    if let Some(name) = record.get("name").and_then(non_empty) {
        parts.push(format!("Name: {}", name));
    }
    if let Some(description) = meta_field("description") {
        parts.push(format!("Description: {}", description));
    }
    if let Some(instruction) = meta_field("instruction") {
        parts.push(format!("Instruction: {}", instruction));
    }
    if let Some(archetype) = meta_field("archetype") {
        parts.push(format!("Archetype: {}", archetype));
    }
    if let Some(category) = record.get("category").and_then(non_empty) {
        parts.push(format!("Category: {}", category));
    }
    let tools: Vec<String> = record
        .get("integrations")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(non_empty).collect())
        .unwrap_or_default();
    if !tools.is_empty() {
        parts.push(format!("Tools: {}", tools.join(", ")));
    }
    parts.join(" | ")
}

fn non_empty(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Stream `input` to `output`, adding `search_text` to every record.
#[allow(clippy::result_large_err)]
pub fn label_stream<I: BufRead, O: Write>(
    input: I,
    output: O,
    reporter: &dyn ErrorReporter,
    progress_interval: usize,
) -> Result<SearchTextStats, AppError> {
    let progress_interval = progress_interval.max(1);
    let started = Instant::now();
    let mut stats = SearchTextStats::default();
    let mut writer = JsonLinesWriter::new(output);

    for (index, line) in input.split(b'\n').enumerate() {
        let line = line.map_err(|e| {
            AppError::with_source(ErrorCategory::IoError, "failed to read search-text input", e)
        })?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let mut record = match serde_json::from_slice::<Value>(&line) {
            Ok(Value::Object(record)) => record,
            Ok(_) => {
                stats.failed += 1;
                report_line(reporter, index, "record is not a JSON object");
                continue;
            }
            Err(err) => {
                stats.failed += 1;
                report_line(reporter, index, &err.to_string());
                continue;
            }
        };

        let text = search_text(&record);
        record.insert("search_text".to_string(), Value::String(text));
        writer.write_record(&record).map_err(|e| {
            AppError::with_source(ErrorCategory::IoError, "failed to write search-text output", e)
        })?;
        stats.written += 1;
        if stats.written % progress_interval == 0 {
            tracing::info!(written = stats.written, "Labeled {} workflows...", stats.written);
        }
    }

    writer.finish().map_err(|e| {
        AppError::with_source(ErrorCategory::IoError, "failed to flush search-text output", e)
    })?;
    stats.elapsed = started.elapsed();
    Ok(stats)
}

fn report_line(reporter: &dyn ErrorReporter, index: usize, message: &str) {
    let mut error = AppError::new(ErrorCategory::DecodeError, message);
    error.add_context("path", &format!("line {}", index + 1));
    reporter.report_error(&error);
}
