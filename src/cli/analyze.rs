//! Analyze command handler.
//!
//! Implements the `analyze` subcommand: license and vulnerability
//! histograms, dependency depth, completeness and recommendations.

use super::{context, emit, load};
use crate::config::AppConfig;
use crate::graph::build_tree;
use crate::pipeline::exit_codes;
use crate::quality::package_statistics;
use anyhow::Result;
use std::path::Path;

/// Run the analyze command
pub fn run_analyze(path: &Path, config: &AppConfig, quiet: bool) -> Result<i32> {
    let parsed = load(path, config, quiet)?;
    let document = parsed.document();

    let analysis = config.analyzer().analyze(document);
    let statistics = package_statistics(document);
    let tree = build_tree(document);
    tracing::debug!(
        "Completeness {:.1}%, {} recommendation(s)",
        analysis.completeness_score,
        analysis.recommendations.len()
    );

    let ctx = context(path, &parsed);
    emit(config, quiet, |reporter| {
        reporter.analysis_report(&ctx, &analysis, &statistics, &tree)
    })?;
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::{config, read_json, write_sbom, CYCLONEDX};

    #[test]
    fn test_analyze_writes_report() {
        let sbom = write_sbom(CYCLONEDX);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("analysis.json");

        let code = run_analyze(sbom.path(), &config(out.clone()), true).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let value = read_json(&out);
        assert_eq!(value["summary"]["total_packages"], 2);
        assert_eq!(value["summary"]["cycle_count"], 1);
        assert_eq!(value["analysis"]["license_distribution"]["MIT"], 1);
    }

    #[test]
    fn test_analyze_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_analyze(
            &dir.path().join("absent.json"),
            &config(dir.path().join("out.json")),
            true,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read SBOM file"));
    }
}
