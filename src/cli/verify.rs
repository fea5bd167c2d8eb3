//! Verify command handler.

use super::{context, emit, load};
use crate::config::AppConfig;
use crate::pipeline::exit_codes;
use crate::quality::Verifier;
use anyhow::Result;
use std::path::Path;

/// Run the verify command.
///
/// Exits with [`exit_codes::CHECK_FAILED`] when the document has issues.
/// Warnings alone never fail verification.
pub fn run_verify(path: &Path, config: &AppConfig, quiet: bool) -> Result<i32> {
    let parsed = load(path, config, quiet)?;
    let result = Verifier::new().verify(parsed.document());

    if !quiet {
        tracing::info!(
            "Verification: {} issue(s), {} warning(s)",
            result.issues.len(),
            result.warnings.len()
        );
    }

    let ctx = context(path, &parsed);
    emit(config, quiet, |reporter| {
        reporter.verification_report(&ctx, &result)
    })?;

    Ok(if result.is_valid {
        exit_codes::SUCCESS
    } else {
        exit_codes::CHECK_FAILED
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::{config, read_json, write_sbom, CYCLONEDX};

    #[test]
    fn test_verify_valid_document() {
        let sbom = write_sbom(CYCLONEDX);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("verify.json");

        let code = run_verify(sbom.path(), &config(out.clone()), true).unwrap();
        let value = read_json(&out);
        assert_eq!(code, exit_codes::SUCCESS, "{value}");
        assert_eq!(value["verification"]["is_valid"], true);
        assert!(value["verification"]["warnings"][0]
            .as_str()
            .unwrap()
            .starts_with("Circular dependency"));
    }

    #[test]
    fn test_verify_invalid_document() {
        let sbom = write_sbom(
            r#"{"bomFormat": "CycloneDX", "specVersion": "1.5",
                "components": [{"name": "lonely"}]}"#,
        );
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("verify.json");

        let code = run_verify(sbom.path(), &config(out.clone()), true).unwrap();
        assert_eq!(code, exit_codes::CHECK_FAILED);
        assert_eq!(read_json(&out)["verification"]["is_valid"], false);
    }
}
