//! Integration tests for sbom-analyzer
//!
//! These tests verify end-to-end functionality of format detection,
//! conversion, analysis, lookup and verification on fixture documents.

use sbom_analyzer::{
    build_tree,
    model::{Document, SbomFormat},
    parsers::{
        detect_format, parse_sbom, parse_sbom_str, CycloneDxParser, DetectionMethod, InvalidKind,
        ParseError, SbomParser,
    },
    pipeline::parse_sbom_with_context,
    Analyzer, MatchKind, PackageLookup, Verifier,
};
use std::io::Write;
use std::path::Path;

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn fixture(name: &str) -> Document {
    parse_sbom(&fixture_path(name)).expect("Failed to parse fixture")
}

// ============================================================================
// Parser Tests
// ============================================================================

mod parser_tests {
    use super::*;

    #[test]
    fn test_parse_spdx_json() {
        let doc = fixture("spdx/minimal.spdx.json");

        assert_eq!(doc.format, SbomFormat::Spdx);
        assert_eq!(doc.version, "SPDX-2.3");
        assert_eq!(doc.name, "web-service");
        assert_eq!(doc.creator, "Tool: example-builder-1.0");
        assert_eq!(doc.package_count(), 3);
        assert_eq!(doc.dependency_edge_count(), 2);

        let app = doc.package_by_id("SPDXRef-app").unwrap();
        assert_eq!(app.purl.as_deref(), Some("pkg:cargo/web-service@1.0.0"));
        assert_eq!(app.supplier.as_deref(), Some("Example Corp"));
        assert_eq!(app.dependencies[0].target_name, "serde");

        let serde = doc.package_by_id("SPDXRef-serde").unwrap();
        assert!(serde.checksums.contains_key("SHA256"));
        // DESCRIBES is kept as a raw record but adds no edge
        assert_eq!(doc.relationships.len(), 3);
    }

    #[test]
    fn test_parse_spdx_tag_value() {
        let doc = fixture("spdx/minimal.spdx");

        assert_eq!(doc.format, SbomFormat::Spdx);
        assert_eq!(doc.name, "tag-value-demo");
        assert_eq!(doc.package_count(), 2);
        assert_eq!(doc.dependency_edge_count(), 1);

        let demo = &doc.packages[0];
        assert_eq!(demo.version.as_deref(), Some("2.1.0"));
        assert_eq!(demo.purl.as_deref(), Some("pkg:npm/demo@2.1.0"));
        assert_eq!(demo.licenses[0].identifier, "MIT");
    }

    #[test]
    fn test_parse_cyclonedx_json() {
        let doc = fixture("cyclonedx/minimal.cdx.json");

        assert_eq!(doc.format, SbomFormat::CycloneDx);
        assert_eq!(doc.version, "1.5");
        assert_eq!(doc.name, "shop-frontend");
        assert_eq!(doc.creator, "cdx-builder");
        // metadata.component is the subject, not a package
        assert_eq!(doc.package_count(), 3);

        let lodash = doc.package_by_id("pkg:npm/lodash@4.17.20").unwrap();
        assert_eq!(lodash.vulnerabilities.len(), 2);
        assert_eq!(lodash.licenses[0].identifier, "MIT OR CC0-1.0");

        let envify = doc.package_by_id("pkg:npm/loose-envify@1.4.0").unwrap();
        assert_eq!(envify.dependencies[0].target_id, "pkg:npm/js-tokens@4.0.0");
        assert_eq!(envify.dependencies[0].target_name, "js-tokens");
    }

    #[test]
    fn test_parse_cyclonedx_xml() {
        let doc = fixture("cyclonedx/minimal.cdx.xml");

        assert_eq!(doc.format, SbomFormat::CycloneDx);
        assert_eq!(doc.version, "1.4");
        assert_eq!(doc.name, "xml-demo");
        assert_eq!(doc.creator, "cdx-xml-builder");
        assert_eq!(doc.package_count(), 2);
        assert_eq!(doc.packages[0].dependencies[0].target_name, "lib");
        assert_eq!(doc.packages[1].licenses[0].identifier, "MIT");
    }

    #[test]
    fn test_parse_swid_xml() {
        let doc = fixture("swid/demo.swidtag");

        assert_eq!(doc.format, SbomFormat::Swid);
        assert_eq!(doc.name, "ACME Roadrunner Detector");
        assert_eq!(doc.creator, "The ACME Corporation");
        assert_eq!(doc.package_count(), 1);

        let pkg = &doc.packages[0];
        assert_eq!(pkg.id, "com.acme.rrd2013-ce-sp1-v4-1-5-0");
        assert_eq!(pkg.version.as_deref(), Some("4.1.5"));
        assert_eq!(pkg.supplier.as_deref(), Some("acme.com"));
        assert_eq!(pkg.description.as_deref(), Some("Detects roadrunners"));
    }

    #[test]
    fn test_swid_json_single_package() {
        let doc = fixture("swid/demo.swid.json");

        assert_eq!(doc.package_count(), 1);
        let pkg = &doc.packages[0];
        assert_eq!(pkg.name, "demo");
        assert_eq!(pkg.version.as_deref(), Some("1.0"));
        assert!(pkg.licenses.is_empty());
        assert!(pkg.dependencies.is_empty());
        assert!(pkg.vulnerabilities.is_empty());
    }

    #[test]
    fn test_every_converter_sets_creation_time() {
        for name in [
            "spdx/minimal.spdx.json",
            "spdx/minimal.spdx",
            "cyclonedx/minimal.cdx.json",
            "cyclonedx/minimal.cdx.xml",
            "swid/demo.swidtag",
            "swid/demo.swid.json",
        ] {
            assert!(fixture(name).created.is_some(), "{name}");
        }
    }
}

// ============================================================================
// Detection Tests
// ============================================================================

mod detection_tests {
    use super::*;

    #[test]
    fn test_extension_beats_content() {
        let content = r#"{"bomFormat": "CycloneDX", "specVersion": "1.5"}"#;
        let result = detect_format(Path::new("odd.spdx.json"), content).unwrap();
        assert_eq!(result.format, SbomFormat::Spdx);
        assert_eq!(result.method, DetectionMethod::Extension);
    }

    #[test]
    fn test_json_markers() {
        let cdx = detect_format(Path::new("bom.json"), r#"{"bomFormat": "CycloneDX"}"#).unwrap();
        assert_eq!(cdx.format, SbomFormat::CycloneDx);
        assert_eq!(cdx.method, DetectionMethod::JsonContent);

        let swid = detect_format(
            Path::new("tag.json"),
            r#"{"softwareIdentity": {"tagId": "t1"}}"#,
        )
        .unwrap();
        assert_eq!(swid.format, SbomFormat::Swid);
    }

    #[test]
    fn test_cyclonedx_without_marker() {
        let content = r#"{"specVersion": "1.5", "components": [{"name": "x"}]}"#;

        let direct = CycloneDxParser::new().parse_str(content).unwrap_err();
        assert_eq!(
            direct.invalid_kind(),
            Some(&InvalidKind::MissingMarker("bomFormat".to_string()))
        );

        let detected = parse_sbom_str(content).unwrap_err();
        assert!(matches!(detected, ParseError::FormatUndetected(_)));
    }

    #[test]
    fn test_plain_text_undetected() {
        let err = parse_sbom_str("hello world").unwrap_err();
        assert!(matches!(err, ParseError::FormatUndetected(_)));
    }

    #[test]
    fn test_syntax_error_names_format() {
        let err = parse_sbom_str("<bom xmlns=\"http://cyclonedx.org/schema/bom/1.5\"><components>")
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::FormatInvalid {
                format: SbomFormat::CycloneDx,
                ..
            }
        ));
    }
}

// ============================================================================
// Pipeline Tests
// ============================================================================

mod pipeline_tests {
    use super::*;

    fn temp_file(suffix: &str, content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_size_limit_rejects_before_parsing() {
        let file = temp_file(".cdx.json", br#"{"bomFormat": "CycloneDX"}"#);
        let err = parse_sbom_with_context(file.path(), 8, true).unwrap_err();
        let source = err.parse_error().unwrap();
        assert!(matches!(source, ParseError::FileUnreadable { .. }));
        assert!(source.to_string().contains("byte limit"));
    }

    #[test]
    fn test_non_utf8_is_unreadable() {
        let file = temp_file(".cdx.json", &[0x7b, 0xff, 0xfe, 0x7d]);
        let err = parse_sbom_with_context(file.path(), 1024, true).unwrap_err();
        assert!(matches!(
            err.parse_error(),
            Some(ParseError::FileUnreadable { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_sbom(&fixture_path("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ParseError::FileUnreadable { .. }));
    }
}

// ============================================================================
// Analysis Tests
// ============================================================================

mod analysis_tests {
    use super::*;

    #[test]
    fn test_analyze_spdx_chain() {
        let doc = fixture("spdx/minimal.spdx.json");
        let analysis = Analyzer::new().analyze(&doc);

        assert_eq!(analysis.total_packages, 3);
        assert_eq!(analysis.unique_licenses, vec!["Apache-2.0", "MIT"]);
        assert_eq!(analysis.license_distribution["MIT"], 2);
        assert_eq!(analysis.dependency_depth["web-service"], 2);
        assert_eq!(analysis.dependency_depth["itoa"], 0);
        assert!(analysis.vulnerability_summary.is_empty());
    }

    #[test]
    fn test_analyze_cyclonedx_vulnerabilities() {
        let doc = fixture("cyclonedx/minimal.cdx.json");
        let analysis = Analyzer::new().analyze(&doc);

        assert_eq!(analysis.vulnerability_summary["high"], 1);
        assert_eq!(analysis.vulnerability_summary["medium"], 1);
        assert_eq!(analysis.total_vulnerabilities(), 2);
        assert!(analysis
            .recommendations
            .iter()
            .any(|r| r.starts_with("2 known vulnerabilities")));
        // dangling js-tokens counts as a leaf below loose-envify
        assert_eq!(analysis.dependency_depth["react"], 2);
    }

    #[test]
    fn test_dependency_tree() {
        let doc = fixture("cyclonedx/minimal.cdx.json");
        let tree = build_tree(&doc);

        assert_eq!(tree.root_packages, vec!["lodash"]);
        assert_eq!(tree.total_dependencies, 2);
        assert_eq!(tree.max_depth, 2);
        assert!(!tree.has_cycles());
    }
}

// ============================================================================
// Lookup Tests
// ============================================================================

mod lookup_tests {
    use super::*;

    #[test]
    fn test_exact_ignores_case() {
        let doc = fixture("cyclonedx/minimal.cdx.json");
        let found = PackageLookup::new().find_package(&doc, "REACT").unwrap();
        assert_eq!(found.package.name, "react");
        assert_eq!(found.kind, MatchKind::Exact);
    }

    #[test]
    fn test_fuzzy_typo() {
        let doc = fixture("cyclonedx/minimal.cdx.json");
        let info = PackageLookup::new().find(&doc, "lodahs").unwrap();
        assert_eq!(info.name, "lodash");
        assert_eq!(info.vulnerabilities.len(), 2);
        assert!(info.vulnerabilities.contains(&"CVE-2021-23337 (high)".to_string()));
    }

    #[test]
    fn test_not_found() {
        let doc = fixture("cyclonedx/minimal.cdx.json");
        assert!(PackageLookup::new().find(&doc, "kubernetes").is_none());
    }
}

// ============================================================================
// Verification Tests
// ============================================================================

mod verification_tests {
    use super::*;

    #[test]
    fn test_leaf_package_lacks_dependency_information() {
        let result = Verifier::new().verify(&fixture("spdx/minimal.spdx.json"));
        // itoa is a leaf and therefore has no dependency information
        assert!(!result.is_valid);
        assert_eq!(
            result.issues,
            vec!["Packages without dependency information: itoa".to_string()]
        );
        assert_eq!(result.format_detected, SbomFormat::Spdx);
        assert_eq!(result.version_detected, "SPDX-2.3");
    }

    #[test]
    fn test_dangling_dependency_is_warning() {
        let result = Verifier::new().verify(&fixture("cyclonedx/minimal.cdx.json"));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("'pkg:npm/js-tokens@4.0.0' does not refer to a package")));
        assert!(result
            .issues
            .iter()
            .all(|i| !i.contains("js-tokens")));
    }

    #[test]
    fn test_empty_document_name() {
        let doc = Document::new(SbomFormat::Spdx, "SPDX-2.3", "");
        let result = Verifier::new().verify(&doc);
        assert!(!result.is_valid);
        assert!(result.issues.iter().any(|i| i == "Missing document name"));
    }

    #[test]
    fn test_swid_single_package_has_no_dependency_issue() {
        let result = Verifier::new().verify(&fixture("swid/demo.swid.json"));
        assert!(result
            .issues
            .iter()
            .all(|i| !i.starts_with("Packages without dependency information")));
        assert!(result
            .issues
            .iter()
            .any(|i| i.starts_with("Packages without license information")));
    }
}
