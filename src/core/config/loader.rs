#![allow(clippy::result_large_err)]

use super::AtlasConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "atlas.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from workspace root (workspace/atlas.toml)
    /// Environment variables override config file values
    /// A missing file yields defaults + env vars
    pub fn load_from_workspace(workspace_path: &Path) -> Result<AtlasConfig, AppError> {
        let config_path = workspace_path.join(CONFIG_FILE_NAME);
        let config_file = Self::load_from_file(&config_path)?;

        let mut config = config_file.unwrap_or_default();

        Self::apply_env_overrides(&mut config);

        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<AtlasConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: AtlasConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ValidationError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
        })?;

        Ok(Some(config))
    }

    /// Apply environment variable overrides to the configuration
    /// Values that fail to parse are ignored
    fn apply_env_overrides(config: &mut AtlasConfig) {
        if let Ok(root) = env::var("ATLAS_CORPUS_ROOT") {
            config.corpus.root = PathBuf::from(root);
        }

        if let Ok(output) = env::var("ATLAS_MANIFEST_OUTPUT") {
            config.manifest.output = PathBuf::from(output);
        }

        if let Ok(clusters) = env::var("ATLAS_CLUSTERS_FILE") {
            config.labeling.clusters_file = PathBuf::from(clusters);
        }

        if let Ok(max_errors) = env::var("ATLAS_MAX_ERRORS_DISPLAYED") {
            if let Ok(max_errors) = max_errors.parse::<usize>() {
                config.reporting.max_errors_displayed = max_errors;
            }
        }

        if let Ok(interval) = env::var("ATLAS_PROGRESS_INTERVAL") {
            if let Ok(interval) = interval.parse::<usize>() {
                config.reporting.progress_interval = interval;
            }
        }

        if let Ok(max_documents) = env::var("ATLAS_GENERATOR_MAX_DOCUMENTS") {
            if let Ok(max_documents) = max_documents.parse::<usize>() {
                config.generator.max_documents = max_documents;
            }
        }
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "ATLAS_CORPUS_ROOT - Override the corpus root directory (default: workflows)",
            "ATLAS_MANIFEST_OUTPUT - Override the manifest output path (default: web/public/workflows.json)",
            "ATLAS_CLUSTERS_FILE - Override the cluster assignment file (default: workflow_clusters.json)",
            "ATLAS_MAX_ERRORS_DISPLAYED - Override how many per-document errors are printed (default: 5)",
            "ATLAS_PROGRESS_INTERVAL - Override the progress log interval in files (default: 5000)",
            "ATLAS_GENERATOR_MAX_DOCUMENTS - Override the synthetic document ceiling (default: 30000)",
            "ATLAS_LOG_DIR - Write logs to this directory and enable the file sink",
        ]
    }
}
