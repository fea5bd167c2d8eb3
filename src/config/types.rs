//! Configuration types for sbom-analyzer commands.

use crate::matching::{PackageLookup, DEFAULT_FUZZY_CUTOFF};
use crate::parsers::DEFAULT_MAX_FILE_SIZE;
use crate::quality::{Analyzer, DEFAULT_SAMPLE_SIZE};
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unified application configuration, loaded from a config file and then
/// overridden by command-line arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Input limits
    pub input: InputConfig,
    /// Package lookup settings
    pub lookup: LookupConfig,
    /// Analyzer settings
    pub analysis: AnalysisConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply command-line overrides; unset fields keep the file value.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(size) = overrides.max_file_size {
            self.input.max_file_size = size;
        }
        if let Some(cutoff) = overrides.fuzzy_cutoff {
            self.lookup.fuzzy_cutoff = cutoff;
        }
        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if overrides.output_file.is_some() {
            self.output.file.clone_from(&overrides.output_file);
        }
        if overrides.no_color {
            self.output.no_color = true;
        }
    }

    /// Analyzer configured from `analysis`
    #[must_use]
    pub fn analyzer(&self) -> Analyzer {
        Analyzer::new().with_sample_size(self.analysis.sample_size)
    }

    /// Package lookup configured from `lookup`
    #[must_use]
    pub fn package_lookup(&self) -> PackageLookup {
        PackageLookup::new().with_cutoff(self.lookup.fuzzy_cutoff)
    }
}

/// Values given on the command line, layered over the file configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_file_size: Option<u64>,
    pub fuzzy_cutoff: Option<f64>,
    pub format: Option<ReportFormat>,
    pub output_file: Option<PathBuf>,
    pub no_color: bool,
}

/// Input limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InputConfig {
    /// Largest SBOM file accepted, in bytes. Default: 100 MiB
    #[schemars(range(min = 1))]
    pub max_file_size: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Package lookup settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LookupConfig {
    /// Minimum name similarity (0.0-1.0) for a fuzzy match
    #[schemars(range(min = 0.0, max = 1.0))]
    pub fuzzy_cutoff: f64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            fuzzy_cutoff: DEFAULT_FUZZY_CUTOFF,
        }
    }
}

/// Analyzer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Package names quoted per recommendation before "and N more"
    #[schemars(range(min = 1))]
    pub sample_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::new();
        assert_eq!(config.input.max_file_size, 100 * 1024 * 1024);
        assert!((config.lookup.fuzzy_cutoff - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.analysis.sample_size, 5);
        assert_eq!(config.output.format, ReportFormat::Text);
        assert!(!config.output.no_color);
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = AppConfig::new();
        config.output.file = Some(PathBuf::from("from-file.json"));

        config.apply_overrides(&ConfigOverrides {
            fuzzy_cutoff: Some(0.8),
            format: Some(ReportFormat::Json),
            ..ConfigOverrides::default()
        });

        assert!((config.lookup.fuzzy_cutoff - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.output.format, ReportFormat::Json);
        assert_eq!(config.output.file, Some(PathBuf::from("from-file.json")));
        assert_eq!(config.input.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("lookup:\n  fuzzy_cutoff: 0.75\n").unwrap();
        assert!((config.lookup.fuzzy_cutoff - 0.75).abs() < f64::EPSILON);
        assert_eq!(config.analysis, AnalysisConfig::default());
    }
}
