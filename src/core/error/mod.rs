use crate::core::types::{ErrorCategory, ErrorSeverity};
use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug)]
pub struct AppError {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub message: String,
    pub context: HashMap<String, String>,
    pub occurred_at: DateTime<Utc>,
    pub source: Option<anyhow::Error>,
}

impl AppError {
    pub fn new<T: Into<String>>(category: ErrorCategory, message: T) -> Self {
        let severity = match category {
            ErrorCategory::NotFoundError => ErrorSeverity::Info,
            ErrorCategory::DecodeError | ErrorCategory::WriteError => ErrorSeverity::Warning,
            ErrorCategory::IoError
            | ErrorCategory::ValidationError
            | ErrorCategory::SerializationError
            | ErrorCategory::InternalError => ErrorSeverity::Error,
        };
        AppError {
            category,
            severity,
            message: message.into(),
            context: HashMap::new(),
            occurred_at: Utc::now(),
            source: None,
        }
    }

    pub fn with_source<T: Into<String>>(
        category: ErrorCategory,
        message: T,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        let mut error = AppError::new(category, message);
        error.source = Some(source.into());
        error
    }

    pub fn with_path(mut self, path: &Path) -> Self {
        self.context
            .insert("path".to_string(), path.display().to_string());
        self
    }

    pub fn add_context(&mut self, key: &str, value: &str) {
        self.context.insert(key.to_string(), value.to_string());
    }

    pub fn severity(&self) -> ErrorSeverity {
        self.severity
    }

    /// Whether the error aborts a whole run rather than a single document.
    pub fn is_fatal(&self) -> bool {
        self.severity == ErrorSeverity::Error
    }

    pub fn path(&self) -> Option<&str> {
        self.context.get("path").map(String::as_str)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.category, self.message)?;
        if let Some(path) = self.path() {
            write!(f, " ({})", path)?;
        }
        if let Some(ref source) = self.source {
            write!(f, "\nCaused by: {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        let message = e.to_string();
        AppError::with_source(ErrorCategory::IoError, message, e)
    }
}

pub trait ErrorReporter {
    fn report_error(&self, error: &AppError);

    /// Errors that were counted but not printed.
    fn suppressed(&self) -> usize {
        0
    }
}

/// Prints the first `max_displayed` errors and silently counts the rest.
///
/// Every error, printed or not, is still forwarded to the tracing subscriber at
/// debug level so a log file captures the complete list.
pub struct CappedErrorReporter {
    max_displayed: usize,
    reported: Cell<usize>,
}

impl CappedErrorReporter {
    pub fn new(max_displayed: usize) -> Self {
        CappedErrorReporter {
            max_displayed,
            reported: Cell::new(0),
        }
    }

    pub fn reported(&self) -> usize {
        self.reported.get()
    }
}

impl ErrorReporter for CappedErrorReporter {
    fn report_error(&self, error: &AppError) {
        let seen = self.reported.get() + 1;
        self.reported.set(seen);
        tracing::debug!(category = %error.category, path = ?error.path(), "{}", error.message);
        if seen <= self.max_displayed {
            match error.path() {
                Some(path) => eprintln!("Error: {} - {}", path, error.message),
                None => eprintln!("Error: {}", error.message),
            }
        }
    }

    fn suppressed(&self) -> usize {
        self.reported.get().saturating_sub(self.max_displayed)
    }
}
