use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists corpus documents below a root directory.
///
/// Symbolic links are not followed, so a link never contributes a document and
/// link cycles cannot occur. Unreadable entries below the root are logged and
/// skipped; only an unusable root is an error.
#[derive(Debug, Clone)]
pub struct CorpusWalker {
    root: PathBuf,
    extension: String,
}

impl CorpusWalker {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        CorpusWalker {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily yield every matching regular file, in filesystem enumeration order.
    #[allow(clippy::result_large_err)]
    pub fn walk(&self) -> Result<impl Iterator<Item = PathBuf> + '_, AppError> {
        Self::check_root(&self.root)?;
        let iter = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable corpus entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(move |entry| {
                entry
                    .file_name()
                    .to_str()
                    .map(|name| name.ends_with(self.extension.as_str()))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path());
        Ok(iter)
    }

    /// Eager variant of [`CorpusWalker::walk`].
    #[allow(clippy::result_large_err)]
    pub fn collect(&self) -> Result<Vec<PathBuf>, AppError> {
        Ok(self.walk()?.collect())
    }

    #[allow(clippy::result_large_err)]
    fn check_root(root: &Path) -> Result<(), AppError> {
        let metadata = fs::metadata(root).map_err(|e| {
            AppError::with_source(
                ErrorCategory::IoError,
                format!("cannot read corpus root {}", root.display()),
                e,
            )
            .with_path(root)
        })?;
        if !metadata.is_dir() {
            return Err(AppError::new(
                ErrorCategory::IoError,
                format!("corpus root {} is not a directory", root.display()),
            )
            .with_path(root));
        }
        fs::read_dir(root).map_err(|e| {
            AppError::with_source(
                ErrorCategory::IoError,
                format!("cannot list corpus root {}", root.display()),
                e,
            )
            .with_path(root)
        })?;
        Ok(())
    }
}
