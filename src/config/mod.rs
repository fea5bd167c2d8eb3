//! Configuration module for sbom-analyzer.
//!
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - Command-line overrides
//!
//! # Configuration File
//!
//! Place a `.sbom-analyzer.yaml` file in your project root or `~/.config/sbom-analyzer/`:
//!
//! ```yaml
//! input:
//!   max_file_size: 52428800
//! lookup:
//!   fuzzy_cutoff: 0.7
//! output:
//!   format: markdown
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{
    AnalysisConfig, AppConfig, ConfigOverrides, InputConfig, LookupConfig, OutputConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, init_config_file, load_config,
    load_config_file, load_or_default, ConfigFileError, DEFAULT_CONFIG_FILE_NAME,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all options that can be set in `.sbom-analyzer.yaml`
/// files. Editors can use it for validation and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
