//! Configuration validation.

use super::types::{AnalysisConfig, AppConfig, InputConfig, LookupConfig, OutputConfig};

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.input.validate());
        errors.extend(self.lookup.validate());
        errors.extend(self.analysis.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for InputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_file_size == 0 {
            errors.push(ConfigError {
                field: "input.max_file_size".to_string(),
                message: "Maximum file size must be greater than 0".to_string(),
            });
        }
        errors
    }
}

impl Validatable for LookupConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !(0.0..=1.0).contains(&self.fuzzy_cutoff) {
            errors.push(ConfigError {
                field: "lookup.fuzzy_cutoff".to_string(),
                message: format!(
                    "Cutoff must be between 0.0 and 1.0, got {}",
                    self.fuzzy_cutoff
                ),
            });
        }
        errors
    }
}

impl Validatable for AnalysisConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.sample_size == 0 {
            errors.push(ConfigError {
                field: "analysis.sample_size".to_string(),
                message: "Sample size must be at least 1".to_string(),
            });
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError {
                        field: "output.file".to_string(),
                        message: format!(
                            "Parent directory does not exist: {}",
                            parent.display()
                        ),
                    });
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = AppConfig::default();
        config.input.max_file_size = 0;
        config.lookup.fuzzy_cutoff = 1.5;
        config.analysis.sample_size = 0;
        config.output.file = Some(PathBuf::from("/nonexistent/dir/report.json"));

        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "input.max_file_size",
                "lookup.fuzzy_cutoff",
                "analysis.sample_size",
                "output.file",
            ]
        );
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError {
            field: "lookup.fuzzy_cutoff".to_string(),
            message: "out of range".to_string(),
        };
        assert_eq!(err.to_string(), "lookup.fuzzy_cutoff: out of range");
    }
}
