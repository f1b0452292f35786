#![allow(clippy::result_large_err)]

use super::AtlasConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules
    pub fn validate(config: &AtlasConfig) -> Result<(), AppError> {
        if config.corpus.extension.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                "corpus.extension cannot be empty",
            ));
        }

        if config.derivation.namespace.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                "derivation.namespace cannot be empty",
            ));
        }

        if config.reporting.progress_interval == 0 {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                "reporting.progress_interval must be greater than zero",
            ));
        }

        if config.generator.max_documents == 0 {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                "generator.max_documents must be greater than zero",
            ));
        }

        for template in &config.generator.archetypes {
            if let Some(problem) = template.lint().into_iter().next() {
                return Err(AppError::new(ErrorCategory::ValidationError, problem));
            }
            template.resolve(&config.generator.catalog)?;
        }

        Ok(())
    }
}
