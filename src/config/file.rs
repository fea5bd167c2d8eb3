//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use crate::error::SbomError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".sbom-analyzer.yaml",
    ".sbom-analyzer.yml",
    "sbom-analyzer.yaml",
    "sbom-analyzer.yml",
];

/// File name written by [`init_config_file`]
pub const DEFAULT_CONFIG_FILE_NAME: &str = ".sbom-analyzer.yaml";

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/sbom-analyzer/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        tracing::warn!("Config file {} does not exist", path.display());
    }

    let cwd = std::env::current_dir().ok();
    if let Some(path) = cwd.as_deref().and_then(find_config_in_dir) {
        return Some(path);
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(path) =
        dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("sbom-analyzer")))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Error type for config file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

/// Load the configuration for a run.
///
/// An explicit path must load. Discovered files fall back to defaults with a
/// warning, as in [`load_or_default`].
pub fn load_config(
    explicit_path: Option<&Path>,
) -> crate::error::Result<(AppConfig, Option<PathBuf>)> {
    let Some(path) = explicit_path else {
        return Ok(load_or_default(None));
    };
    let config = load_config_file(path)
        .map_err(|e| SbomError::config(format!("{}: {e}", path.display())))?;
    Ok((config, Some(path.to_path_buf())))
}

/// Write the example configuration into `dir`, never overwriting.
pub fn init_config_file(dir: &Path) -> crate::error::Result<PathBuf> {
    let target = dir.join(DEFAULT_CONFIG_FILE_NAME);
    if target.exists() {
        return Err(SbomError::config(format!(
            "{} already exists. Remove it first to re-initialize.",
            target.display()
        )));
    }
    std::fs::write(&target, generate_example_config())
        .map_err(|e| SbomError::io(target.clone(), e))?;
    Ok(target)
}

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    format!(
        r"# sbom-analyzer configuration
# Place this file at .sbom-analyzer.yaml in your project root or ~/.config/sbom-analyzer/

{}",
        serde_yaml::to_string(&AppConfig::default()).unwrap_or_default()
    )
}
