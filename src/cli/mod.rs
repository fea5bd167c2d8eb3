//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler loads one SBOM, runs one analysis and writes one report, and
//! returns the process exit code.

mod analyze;
mod check_pkg;
mod dep;
mod verify;

pub use analyze::run_analyze;
pub use check_pkg::{run_check_pkg, MAX_SUGGESTIONS};
pub use dep::run_dep;
pub use verify::run_verify;

use crate::config::AppConfig;
use crate::error::ErrorContext;
use crate::pipeline::{parse_sbom_with_context, should_use_color, write_output, OutputTarget, ParsedSbom};
use crate::reports::{create_reporter, ReportContext, ReportError, ReportGenerator};
use anyhow::Result;
use std::path::Path;

/// Load and convert the SBOM at `path` under the configured size limit
fn load(path: &Path, config: &AppConfig, quiet: bool) -> Result<ParsedSbom> {
    Ok(parse_sbom_with_context(
        path,
        config.input.max_file_size,
        quiet,
    )?)
}

/// Render with the configured reporter and write to the configured target
fn emit<F>(config: &AppConfig, quiet: bool, render: F) -> Result<()>
where
    F: FnOnce(&dyn ReportGenerator) -> std::result::Result<String, ReportError>,
{
    let target = OutputTarget::from_option(config.output.file.clone());
    let use_color = should_use_color(config.output.no_color, &target);
    let reporter = create_reporter(config.output.format, use_color);
    let content = render(reporter.as_ref())
        .with_context(|| format!("Failed to render {} report", config.output.format))?;
    write_output(&content, &target, quiet)?;
    Ok(())
}

fn context(path: &Path, parsed: &ParsedSbom) -> ReportContext {
    ReportContext::new(path, parsed.document())
}
