//! SBOM loading stage.
//!
//! Reads a file under a size limit, detects its format and converts it,
//! attaching the file path to any failure.

use crate::error::{ErrorContext, Result};
use crate::model::Document;
use crate::parsers::{read_sbom_file, DetectionResult, FormatDetector};
use std::path::Path;

/// A converted SBOM together with how its format was recognized
#[derive(Debug, Clone)]
pub struct ParsedSbom {
    pub document: Document,
    pub detection: DetectionResult,
}

impl ParsedSbom {
    /// Get a reference to the document
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Consume and return the inner document
    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }
}

/// Parse an SBOM file with context for error messages
pub fn parse_sbom_with_context(path: &Path, max_size: u64, quiet: bool) -> Result<ParsedSbom> {
    if !quiet {
        tracing::info!("Parsing SBOM: {:?}", path);
    }

    let content = read_sbom_file(path, max_size)
        .with_context(|| format!("Failed to read SBOM file: {}", path.display()))?;

    let detector = FormatDetector::new();
    let detection = detector
        .detect(path, &content)
        .with_context(|| format!("Failed to detect SBOM format: {}", path.display()))?;
    tracing::debug!(
        "Detected {} ({}) via {}",
        detection.format,
        detection.variant,
        detection.method
    );

    let document = detector
        .parser_for(detection.format)
        .parse_str(&content)
        .with_context(|| format!("Failed to parse SBOM: {}", path.display()))?;

    if !quiet {
        tracing::info!("Parsed {} packages", document.package_count());
    }

    Ok(ParsedSbom {
        document,
        detection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SbomError;
    use crate::model::SbomFormat;
    use crate::parsers::{ParseError, DEFAULT_MAX_FILE_SIZE};
    use std::io::Write;

    fn write_temp(suffix: &str, content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_parse_swid_file() {
        let file = write_temp(
            ".json",
            br#"{"softwareIdentity":{"tagId":"t1","name":"demo","version":"1.0"}}"#,
        );
        let parsed = parse_sbom_with_context(file.path(), DEFAULT_MAX_FILE_SIZE, true).unwrap();
        assert_eq!(parsed.document().format, SbomFormat::Swid);
        assert_eq!(parsed.detection.format, SbomFormat::Swid);
        assert_eq!(parsed.into_document().package_count(), 1);
    }

    #[test]
    fn test_size_limit() {
        let file = write_temp(".json", br#"{"spdxVersion": "SPDX-2.3"}"#);
        let err = parse_sbom_with_context(file.path(), 4, true).unwrap_err();
        match err {
            SbomError::Parse { context, source } => {
                assert!(context.starts_with("Failed to read SBOM file"));
                assert!(matches!(source, ParseError::FileUnreadable { .. }));
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_undetected_carries_path() {
        let file = write_temp(".txt", b"just some notes");
        let err = parse_sbom_with_context(file.path(), DEFAULT_MAX_FILE_SIZE, true).unwrap_err();
        assert!(matches!(
            err.parse_error(),
            Some(ParseError::FormatUndetected(_))
        ));
        assert!(err.to_string().contains("Failed to detect SBOM format"));
    }
}
