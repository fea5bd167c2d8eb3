//! SBOM format parsers.
//!
//! This module provides converters for SPDX, CycloneDX and SWID documents,
//! turning them into the normalized [`Document`] model.
//!
//! ## Format Detection
//!
//! [`FormatDetector`] classifies input in a fixed priority order:
//! - File extension (`.spdx*`, `.cdx` / `.cyclonedx` / `.bom`, `.swid*`)
//! - JSON markers (`spdxVersion`, `bomFormat: "CycloneDX"`, `softwareIdentity` + `tagId`)
//! - XML root element name or namespace
//!
//! Nothing is assumed when all three fail.
//!
//! ## Usage
//!
//! ```no_run
//! use sbom_analyzer::parsers::{detect_format, parse_sbom};
//! use std::path::Path;
//!
//! let document = parse_sbom(Path::new("sbom.spdx.json")).unwrap();
//! println!("{} packages", document.package_count());
//!
//! let content = std::fs::read_to_string("bom.json").unwrap();
//! if let Ok(detection) = detect_format(Path::new("bom.json"), &content) {
//!     println!("Detected: {} via {}", detection.format, detection.method);
//! }
//! ```

mod cyclonedx;
mod detection;
mod spdx;
mod swid;
mod traits;

pub use cyclonedx::CycloneDxParser;
pub use detection::{read_xml_root, DetectionMethod, DetectionResult, FormatDetector};
pub use spdx::SpdxParser;
pub use swid::SwidParser;
pub use traits::{InvalidKind, ParseError, SbomParser, XmlRoot};

use crate::model::{Document, Package};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::Path;

/// Default maximum SBOM file size (100 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Name given to packages whose source omits one
pub const UNKNOWN_NAME: &str = "Unknown";

/// Detect SBOM format from a file name and content without converting
pub fn detect_format(path: &Path, content: &str) -> Result<DetectionResult, ParseError> {
    FormatDetector::new().detect(path, content)
}

/// Read an SBOM file as UTF-8 text.
///
/// Fails with `FileUnreadable` if the file is missing, larger than `max_size`
/// bytes, or not valid UTF-8.
pub fn read_sbom_file(path: &Path, max_size: u64) -> Result<String, ParseError> {
    let display = path.display().to_string();
    let metadata =
        std::fs::metadata(path).map_err(|e| ParseError::unreadable(&display, e.to_string()))?;
    if metadata.len() > max_size {
        return Err(ParseError::unreadable(
            &display,
            format!(
                "file is {} bytes, exceeding the {} byte limit",
                metadata.len(),
                max_size
            ),
        ));
    }
    let bytes = std::fs::read(path).map_err(|e| ParseError::unreadable(&display, e.to_string()))?;
    String::from_utf8(bytes)
        .map_err(|e| ParseError::unreadable(&display, format!("content is not valid UTF-8: {e}")))
}

/// Detect SBOM format from file name and content, then convert
///
/// Uses [`DEFAULT_MAX_FILE_SIZE`] as the size limit.
pub fn parse_sbom(path: &Path) -> Result<Document, ParseError> {
    let content = read_sbom_file(path, DEFAULT_MAX_FILE_SIZE)?;
    FormatDetector::new().parse(path, &content)
}

/// Parse SBOM from string content, detecting the format from content alone
pub fn parse_sbom_str(content: &str) -> Result<Document, ParseError> {
    FormatDetector::new().parse(Path::new(""), content)
}

/// Parse an RFC 3339 timestamp, falling back to the current time.
pub(crate) fn timestamp_or_now(value: Option<&str>) -> DateTime<Utc> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc))
}

/// Accumulates converted packages while keeping ids unique.
///
/// A package whose id is already taken is renamed `id#2`, `id#3`, ... and
/// counted as a collision. Nameless packages are named [`UNKNOWN_NAME`].
#[derive(Debug, Default)]
pub(crate) struct PackageCollector {
    packages: Vec<Package>,
    index: HashMap<String, usize>,
    collisions: usize,
}

impl PackageCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a package and return its position.
    pub(crate) fn push(&mut self, mut package: Package) -> usize {
        if package.name.trim().is_empty() {
            package.name = UNKNOWN_NAME.to_string();
        }
        if self.index.contains_key(&package.id) {
            let base = package.id.clone();
            let mut suffix = 2usize;
            while self.index.contains_key(&format!("{base}#{suffix}")) {
                suffix += 1;
            }
            package.id = format!("{base}#{suffix}");
            self.collisions += 1;
            tracing::debug!("Duplicate package id '{}' renamed to '{}'", base, package.id);
        }
        let position = self.packages.len();
        self.index.insert(package.id.clone(), position);
        self.packages.push(package);
        position
    }

    pub(crate) fn get(&self, position: usize) -> Option<&Package> {
        self.packages.get(position)
    }

    pub(crate) fn get_mut(&mut self, position: usize) -> Option<&mut Package> {
        self.packages.get_mut(position)
    }

    /// Look up a package by its final id.
    pub(crate) fn position_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Move the packages into the document.
    pub(crate) fn finish(self, document: &mut Document) {
        document.packages = self.packages;
        document.collision_count = self.collisions;
        document.log_collision_summary();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SbomFormat;

    #[test]
    fn test_collector_disambiguates_ids() {
        let mut collector = PackageCollector::new();
        collector.push(Package::new("a", "first"));
        collector.push(Package::new("a", "second"));
        collector.push(Package::new("a", "third"));
        collector.push(Package::new("a#2", "fourth"));
        collector.push(Package::new("b", "  "));

        let mut doc = Document::new(SbomFormat::Spdx, "SPDX-2.3", "demo");
        collector.finish(&mut doc);

        let ids: Vec<&str> = doc.packages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a#2", "a#3", "a#2#2", "b"]);
        assert_eq!(doc.collision_count, 3);
        assert_eq!(doc.packages[4].name, UNKNOWN_NAME);
    }

    #[test]
    fn test_timestamp_fallback() {
        let parsed = timestamp_or_now(Some("2024-01-15T10:00:00Z"));
        assert_eq!(parsed.to_rfc3339(), "2024-01-15T10:00:00+00:00");

        let before = Utc::now();
        let fallback = timestamp_or_now(Some("yesterday"));
        assert!(fallback >= before);
        assert!(timestamp_or_now(None) >= before);
    }

    #[test]
    fn test_parse_sbom_str_swid() {
        let doc =
            parse_sbom_str(r#"{"softwareIdentity":{"tagId":"t1","name":"demo","version":"1.0"}}"#)
                .unwrap();
        assert_eq!(doc.format, SbomFormat::Swid);
        assert_eq!(doc.package_count(), 1);
    }

    #[test]
    fn test_parse_sbom_str_undetected() {
        let err = parse_sbom_str(r#"{"specVersion": "1.5", "components": []}"#).unwrap_err();
        assert!(matches!(err, ParseError::FormatUndetected(_)));
    }
}
