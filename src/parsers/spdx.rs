//! SPDX SBOM parser.
//!
//! Supports SPDX 2.x in JSON and tag-value formats.

use super::traits::{InvalidKind, ParseError, SbomParser, XmlRoot};
use super::{timestamp_or_now, PackageCollector, UNKNOWN_NAME};
use crate::model::{Dependency, Document, License, MetadataValue, Package, RawRecord, SbomFormat};
use serde::Deserialize;
use std::collections::HashMap;

const DEFAULT_DOCUMENT_NAME: &str = "Unknown SPDX Document";

/// Parser for SPDX SBOM format
pub struct SpdxParser;

impl SpdxParser {
    /// Create a new SPDX parser
    pub const fn new() -> Self {
        Self
    }

    /// Parse SPDX JSON format
    fn parse_json(&self, content: &str) -> Result<Document, ParseError> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| ParseError::invalid(SbomFormat::Spdx, InvalidKind::Json(e.to_string())))?;
        if !value.is_object() {
            return Err(ParseError::invalid(
                SbomFormat::Spdx,
                InvalidKind::Structure("expected a JSON object".to_string()),
            ));
        }
        if value.get("spdxVersion").is_none() {
            return Err(ParseError::missing_marker(SbomFormat::Spdx, "spdxVersion"));
        }

        let spdx: SpdxDocument = serde_json::from_value(value).map_err(|e| {
            ParseError::invalid(SbomFormat::Spdx, InvalidKind::Structure(e.to_string()))
        })?;

        Ok(self.convert(spdx))
    }

    /// Parse SPDX tag-value format
    fn parse_tag_value(&self, content: &str) -> Result<Document, ParseError> {
        let spdx = self.parse_tag_value_format(content);
        if spdx.spdx_version.is_none() {
            return Err(ParseError::missing_marker(SbomFormat::Spdx, "SPDXVersion"));
        }
        Ok(self.convert(spdx))
    }

    /// Parse tag-value format into SpdxDocument
    fn parse_tag_value_format(&self, content: &str) -> SpdxDocument {
        let mut doc = SpdxDocument::default();
        let mut creation_info = SpdxCreationInfo::default();
        let mut current_package: Option<SpdxPackage> = None;
        let mut in_file_section = false;
        let mut packages = Vec::new();
        let mut relationships = Vec::new();

        for (key, value) in tag_value_pairs(content) {
            match key {
                "SPDXVersion" => doc.spdx_version = Some(value),
                "SPDXID" => match current_package.as_mut() {
                    Some(pkg) => pkg.spdx_id = Some(value),
                    None if !in_file_section => doc.spdx_id = Some(value),
                    None => {}
                },
                // File and snippet sections end the current package; their
                // tags (including SPDXID) belong to the file until the next
                // PackageName.
                "FileName" | "SnippetSPDXID" => {
                    if let Some(pkg) = current_package.take() {
                        packages.push(pkg);
                    }
                    in_file_section = true;
                }
                "DocumentName" => doc.name = Some(value),
                "DataLicense" => doc.data_license = Some(value),
                "DocumentNamespace" => doc.document_namespace = Some(value),
                "Creator" => creation_info.creators.get_or_insert_with(Vec::new).push(value),
                "Created" => creation_info.created = Some(value),
                "PackageName" => {
                    if let Some(pkg) = current_package.take() {
                        packages.push(pkg);
                    }
                    in_file_section = false;
                    current_package = Some(SpdxPackage {
                        name: Some(value),
                        ..SpdxPackage::default()
                    });
                }
                "Relationship" => {
                    if let Some(rel) = self.parse_relationship_line(&value) {
                        relationships.push(rel);
                    }
                }
                _ => {
                    if let Some(pkg) = current_package.as_mut() {
                        self.apply_package_tag(pkg, key, value);
                    }
                }
            }
        }

        if let Some(pkg) = current_package {
            packages.push(pkg);
        }

        doc.creation_info = Some(creation_info);
        doc.packages = Some(packages);
        doc.relationships = Some(relationships);
        doc
    }

    /// Apply a package-scoped tag to the package being built
    fn apply_package_tag(&self, pkg: &mut SpdxPackage, key: &str, value: String) {
        match key {
            "PackageVersion" => pkg.version_info = Some(value),
            "PackageLicenseConcluded" => pkg.license_concluded = Some(value),
            "PackageLicenseDeclared" => pkg.license_declared = Some(value),
            "PackageSupplier" => pkg.supplier = Some(value),
            "PackageHomePage" => pkg.homepage = Some(value),
            "PackageSourceInfo" => pkg.source_info = Some(value),
            "PackageDescription" => pkg.description = Some(value),
            "PackageSummary" => pkg.summary = Some(value),
            "ExternalRef" => {
                if let Some(ext_ref) = self.parse_external_ref_line(&value) {
                    pkg.external_refs.get_or_insert_with(Vec::new).push(ext_ref);
                }
            }
            "PackageChecksum" => {
                if let Some(checksum) = self.parse_checksum_line(&value) {
                    pkg.checksums.get_or_insert_with(Vec::new).push(checksum);
                }
            }
            _ => {}
        }
    }

    /// Parse a relationship line from tag-value format
    fn parse_relationship_line(&self, value: &str) -> Option<SpdxRelationship> {
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() >= 3 {
            Some(SpdxRelationship {
                spdx_element_id: Some(parts[0].to_string()),
                relationship_type: Some(parts[1].to_string()),
                related_spdx_element: Some(parts[2].to_string()),
            })
        } else {
            None
        }
    }

    /// Parse an external ref line from tag-value format
    fn parse_external_ref_line(&self, value: &str) -> Option<SpdxExternalRef> {
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() >= 3 {
            Some(SpdxExternalRef {
                reference_category: Some(parts[0].to_string()),
                reference_type: Some(parts[1].to_string()),
                reference_locator: Some(parts[2].to_string()),
            })
        } else {
            None
        }
    }

    /// Parse a checksum line from tag-value format
    fn parse_checksum_line(&self, value: &str) -> Option<SpdxChecksum> {
        let (algorithm, digest) = value.split_once(':')?;
        Some(SpdxChecksum {
            algorithm: Some(algorithm.trim().to_string()),
            checksum_value: Some(digest.trim().to_string()),
        })
    }

    /// Convert an SPDX document to the normalized model
    fn convert(&self, spdx: SpdxDocument) -> Document {
        let name = spdx
            .document_name
            .clone()
            .or_else(|| spdx.name.clone())
            .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string());

        let mut document = Document::new(
            SbomFormat::Spdx,
            spdx.spdx_version.clone().unwrap_or_default(),
            name,
        );
        document.namespace = spdx.document_namespace.clone();

        let creation_info = spdx.creation_info.as_ref();
        document.created = Some(timestamp_or_now(
            creation_info.and_then(|ci| ci.created.as_deref()),
        ));
        document.creator = creation_info
            .and_then(|ci| ci.creators.as_ref())
            .and_then(|creators| creators.first())
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        document.metadata = self.convert_metadata(&spdx);

        // SPDXID -> position of the first package that declared it
        let mut collector = PackageCollector::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for pkg in spdx.packages.unwrap_or_default() {
            let source_id = pkg.spdx_id.clone();
            let position = collector.push(self.convert_package(pkg));
            if let Some(source_id) = source_id {
                positions.entry(source_id).or_insert(position);
            }
        }

        for rel in spdx.relationships.unwrap_or_default() {
            let (Some(element), Some(related), Some(rel_type)) = (
                rel.spdx_element_id.as_deref(),
                rel.related_spdx_element.as_deref(),
                rel.relationship_type.as_deref(),
            ) else {
                tracing::debug!("Skipping incomplete SPDX relationship");
                continue;
            };

            let edge = match rel_type {
                "DEPENDS_ON" => Some((element, related)),
                "DEPENDENCY_OF" => Some((related, element)),
                _ => None,
            };
            if let Some((from, to)) = edge {
                self.add_edge(&mut collector, &positions, from, to, rel_type);
            }

            document.relationships.push(relationship_record(element, related, rel_type));
        }

        collector.finish(&mut document);
        document
    }

    /// Add a dependency edge between two SPDX elements, if both are packages
    fn add_edge(
        &self,
        collector: &mut PackageCollector,
        positions: &HashMap<String, usize>,
        from: &str,
        to: &str,
        relationship: &str,
    ) {
        let (Some(&from_pos), Some(&to_pos)) = (positions.get(from), positions.get(to)) else {
            tracing::debug!("Dropping SPDX relationship {} -> {}: unknown element", from, to);
            return;
        };
        let Some(target) = collector.get(to_pos) else {
            return;
        };
        let dependency = Dependency::new(target.id.clone(), target.name.clone())
            .with_relationship(relationship);
        if let Some(source) = collector.get_mut(from_pos) {
            source.dependencies.push(dependency);
        }
    }

    /// Collect format-native document fields
    fn convert_metadata(&self, spdx: &SpdxDocument) -> RawRecord {
        let mut metadata = RawRecord::new();
        let fields = [
            ("spdx_version", &spdx.spdx_version),
            ("data_license", &spdx.data_license),
            ("spdx_id", &spdx.spdx_id),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                metadata.insert(key.to_string(), MetadataValue::from(value.as_str()));
            }
        }
        metadata
    }

    /// Convert SPDX package to normalized Package
    fn convert_package(&self, pkg: SpdxPackage) -> Package {
        let name = pkg
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());
        let id = pkg.spdx_id.unwrap_or_else(|| match &pkg.version_info {
            Some(version) => format!("{name}@{version}"),
            None => name.clone(),
        });
        let mut package = Package::new(id, name);
        package.version = pkg.version_info;
        package.description = pkg.description.or(pkg.summary);
        package.homepage = pkg.homepage.filter(|h| is_assertion(h));
        package.source_info = pkg.source_info;

        for expr in [pkg.license_declared, pkg.license_concluded].into_iter().flatten() {
            let expr = expr.trim();
            if !expr.is_empty() && expr != "NONE" {
                package.licenses.push(License::new(expr));
            }
        }

        if let Some(supplier) = &pkg.supplier {
            let supplier = supplier
                .strip_prefix("Organization:")
                .or_else(|| supplier.strip_prefix("Person:"))
                .unwrap_or(supplier)
                .trim();
            if is_assertion(supplier) {
                package.supplier = Some(supplier.to_string());
            }
        }

        for ext_ref in pkg.external_refs.unwrap_or_default() {
            if ext_ref.reference_type.as_deref() == Some("purl") {
                if let Some(locator) = ext_ref.reference_locator {
                    package.purl = Some(locator);
                    break;
                }
            }
        }

        for checksum in pkg.checksums.unwrap_or_default() {
            if let (Some(algorithm), Some(value)) = (checksum.algorithm, checksum.checksum_value) {
                package.checksums.insert(algorithm, value);
            }
        }

        package
    }
}

impl Default for SpdxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomParser for SpdxParser {
    fn format(&self) -> SbomFormat {
        SbomFormat::Spdx
    }

    fn parse_str(&self, content: &str) -> Result<Document, ParseError> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{') {
            self.parse_json(content)
        } else if trimmed.starts_with('<') {
            Err(ParseError::invalid(
                SbomFormat::Spdx,
                InvalidKind::Structure("RDF/XML serialization is not supported".to_string()),
            ))
        } else {
            self.parse_tag_value(content)
        }
    }

    fn matches_json(&self, value: &serde_json::Value) -> bool {
        value.get("spdxVersion").is_some()
    }

    fn matches_xml(&self, root: &XmlRoot) -> bool {
        root.mentions("spdx")
    }

    fn matches_extension(&self, segment: &str) -> bool {
        segment.starts_with("spdx")
    }
}

/// Whether a field carries real content rather than an SPDX placeholder
fn is_assertion(value: &str) -> bool {
    !value.is_empty() && value != "NOASSERTION" && value != "NONE"
}

fn relationship_record(element: &str, related: &str, rel_type: &str) -> RawRecord {
    let mut record = RawRecord::new();
    record.insert("spdx_element_id".to_string(), element.into());
    record.insert("related_spdx_element_id".to_string(), related.into());
    record.insert("relationship_type".to_string(), rel_type.into());
    record
}

/// Split tag-value content into `(tag, value)` pairs.
///
/// Values wrapped in `<text>...</text>` may span several lines.
fn tag_value_pairs(content: &str) -> Vec<(&str, String)> {
    let mut pairs = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        let Some(text) = value.strip_prefix("<text>") else {
            pairs.push((key.trim(), value.to_string()));
            continue;
        };
        let mut text = text.to_string();
        if let Some(end) = text.find("</text>") {
            text.truncate(end);
        } else {
            for next in lines.by_ref() {
                if let Some(end) = next.find("</text>") {
                    text.push('\n');
                    text.push_str(&next[..end]);
                    break;
                }
                text.push('\n');
                text.push_str(next);
            }
        }
        pairs.push((key.trim(), text.trim().to_string()));
    }

    pairs
}

// SPDX JSON structures for deserialization

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxDocument {
    spdx_version: Option<String>,
    #[serde(rename = "SPDXID")]
    spdx_id: Option<String>,
    document_name: Option<String>,
    name: Option<String>,
    data_license: Option<String>,
    document_namespace: Option<String>,
    creation_info: Option<SpdxCreationInfo>,
    packages: Option<Vec<SpdxPackage>>,
    relationships: Option<Vec<SpdxRelationship>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxCreationInfo {
    created: Option<String>,
    creators: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxPackage {
    #[serde(rename = "SPDXID")]
    spdx_id: Option<String>,
    name: Option<String>,
    version_info: Option<String>,
    license_concluded: Option<String>,
    license_declared: Option<String>,
    supplier: Option<String>,
    homepage: Option<String>,
    source_info: Option<String>,
    description: Option<String>,
    summary: Option<String>,
    checksums: Option<Vec<SpdxChecksum>>,
    external_refs: Option<Vec<SpdxExternalRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxChecksum {
    algorithm: Option<String>,
    checksum_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct SpdxExternalRef {
    reference_category: Option<String>,
    reference_type: Option<String>,
    reference_locator: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxRelationship {
    spdx_element_id: Option<String>,
    relationship_type: Option<String>,
    #[serde(alias = "relatedSpdxElementId")]
    related_spdx_element: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPDX_JSON: &str = r#"{
        "spdxVersion": "SPDX-2.3",
        "dataLicense": "CC0-1.0",
        "SPDXID": "SPDXRef-DOCUMENT",
        "documentName": "Test SPDX Document",
        "documentNamespace": "https://example.com/spdx/test",
        "creationInfo": {
            "created": "2024-01-15T10:00:00Z",
            "creators": ["Tool: test-tool", "Organization: Acme"]
        },
        "packages": [
            {
                "SPDXID": "SPDXRef-Package-requests",
                "name": "requests",
                "versionInfo": "2.31.0",
                "licenseDeclared": "Apache-2.0",
                "licenseConcluded": "NOASSERTION",
                "supplier": "Organization: PSF",
                "externalRefs": [
                    {"referenceCategory": "PACKAGE-MANAGER", "referenceType": "purl",
                     "referenceLocator": "pkg:pypi/requests@2.31.0"}
                ],
                "checksums": [{"algorithm": "SHA256", "checksumValue": "abc123"}]
            },
            {
                "SPDXID": "SPDXRef-Package-urllib3",
                "name": "urllib3",
                "versionInfo": "2.0.7",
                "licenseDeclared": "NONE",
                "summary": "HTTP library"
            }
        ],
        "relationships": [
            {"spdxElementId": "SPDXRef-DOCUMENT", "relationshipType": "DESCRIBES",
             "relatedSpdxElement": "SPDXRef-Package-requests"},
            {"spdxElementId": "SPDXRef-Package-requests", "relationshipType": "DEPENDS_ON",
             "relatedSpdxElementId": "SPDXRef-Package-urllib3"},
            {"spdxElementId": "SPDXRef-Package-requests", "relationshipType": "DEPENDS_ON",
             "relatedSpdxElement": "SPDXRef-Package-missing"}
        ]
    }"#;

    #[test]
    fn test_parse_json_document() {
        let doc = SpdxParser::new().parse_str(SPDX_JSON).unwrap();

        assert_eq!(doc.format, SbomFormat::Spdx);
        assert_eq!(doc.version, "SPDX-2.3");
        assert_eq!(doc.name, "Test SPDX Document");
        assert_eq!(doc.namespace.as_deref(), Some("https://example.com/spdx/test"));
        assert_eq!(doc.creator, "Tool: test-tool");
        assert_eq!(
            doc.created.map(|c| c.to_rfc3339()).as_deref(),
            Some("2024-01-15T10:00:00+00:00")
        );
        assert_eq!(doc.metadata["data_license"], MetadataValue::from("CC0-1.0"));
        assert_eq!(doc.relationships.len(), 3);
    }

    #[test]
    fn test_parse_json_packages() {
        let doc = SpdxParser::new().parse_str(SPDX_JSON).unwrap();
        assert_eq!(doc.package_count(), 2);

        let requests = &doc.packages[0];
        assert_eq!(requests.id, "SPDXRef-Package-requests");
        assert_eq!(requests.version.as_deref(), Some("2.31.0"));
        let licenses: Vec<&str> = requests.licenses.iter().map(|l| l.identifier.as_str()).collect();
        assert_eq!(licenses, vec!["Apache-2.0", "NOASSERTION"]);
        assert_eq!(requests.supplier.as_deref(), Some("PSF"));
        assert_eq!(requests.purl.as_deref(), Some("pkg:pypi/requests@2.31.0"));
        assert_eq!(requests.checksums["SHA256"], "abc123");

        let urllib3 = &doc.packages[1];
        assert!(urllib3.licenses.is_empty());
        assert_eq!(urllib3.description.as_deref(), Some("HTTP library"));
    }

    #[test]
    fn test_dangling_relationship_dropped() {
        let doc = SpdxParser::new().parse_str(SPDX_JSON).unwrap();
        assert_eq!(doc.dependency_edge_count(), 1);

        let dep = &doc.packages[0].dependencies[0];
        assert_eq!(dep.target_id, "SPDXRef-Package-urllib3");
        assert_eq!(dep.target_name, "urllib3");
        assert_eq!(dep.relationship, "DEPENDS_ON");
    }

    #[test]
    fn test_dependency_of_is_reversed() {
        let content = r#"{
            "spdxVersion": "SPDX-2.3",
            "packages": [
                {"SPDXID": "SPDXRef-a", "name": "a"},
                {"SPDXID": "SPDXRef-b", "name": "b"}
            ],
            "relationships": [
                {"spdxElementId": "SPDXRef-b", "relationshipType": "DEPENDENCY_OF",
                 "relatedSpdxElement": "SPDXRef-a"}
            ]
        }"#;
        let doc = SpdxParser::new().parse_str(content).unwrap();
        let dep = &doc.packages[0].dependencies[0];
        assert_eq!(dep.target_name, "b");
        assert_eq!(dep.relationship, "DEPENDENCY_OF");
        assert!(doc.packages[1].dependencies.is_empty());
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let doc = SpdxParser::new()
            .parse_str(r#"{"spdxVersion": "SPDX-2.2", "packages": [{"versionInfo": "1.0"}]}"#)
            .unwrap();
        assert_eq!(doc.name, DEFAULT_DOCUMENT_NAME);
        assert_eq!(doc.creator, "Unknown");
        assert!(doc.created.is_some());
        assert_eq!(doc.packages[0].name, "Unknown");
        assert_eq!(doc.packages[0].id, "Unknown@1.0");
    }

    #[test]
    fn test_missing_version_marker() {
        let err = SpdxParser::new().parse_str(r#"{"packages": []}"#).unwrap_err();
        assert_eq!(
            err.invalid_kind(),
            Some(&InvalidKind::MissingMarker("spdxVersion".to_string()))
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = SpdxParser::new().parse_str(r#"{"spdxVersion": "#).unwrap_err();
        assert!(matches!(err.invalid_kind(), Some(InvalidKind::Json(_))));
        assert!(err.to_string().contains("JSON syntax error"));
    }

    #[test]
    fn test_rdf_not_supported() {
        let err = SpdxParser::new().parse_str("<rdf:RDF/>").unwrap_err();
        assert!(matches!(err.invalid_kind(), Some(InvalidKind::Structure(_))));
    }

    #[test]
    fn test_parse_tag_value() {
        let content = "\
SPDXVersion: SPDX-2.3
DataLicense: CC0-1.0
SPDXID: SPDXRef-DOCUMENT
DocumentName: tv-doc
Creator: Tool: tv-generator
Created: 2024-02-01T00:00:00Z

PackageName: app
SPDXID: SPDXRef-app
PackageVersion: 1.0.0
PackageLicenseDeclared: MIT
PackageDescription: <text>An application
spanning two lines</text>
ExternalRef: PACKAGE-MANAGER purl pkg:cargo/app@1.0.0
PackageChecksum: SHA1: 0123abcd

PackageName: lib
SPDXID: SPDXRef-lib
PackageSupplier: Person: Jane

Relationship: SPDXRef-app DEPENDS_ON SPDXRef-lib
";
        let doc = SpdxParser::new().parse_str(content).unwrap();
        assert_eq!(doc.name, "tv-doc");
        assert_eq!(doc.creator, "Tool: tv-generator");
        assert_eq!(doc.metadata["spdx_id"], MetadataValue::from("SPDXRef-DOCUMENT"));
        assert_eq!(doc.package_count(), 2);

        let app = &doc.packages[0];
        assert_eq!(app.id, "SPDXRef-app");
        assert_eq!(app.description.as_deref(), Some("An application\nspanning two lines"));
        assert_eq!(app.purl.as_deref(), Some("pkg:cargo/app@1.0.0"));
        assert_eq!(app.checksums["SHA1"], "0123abcd");
        assert_eq!(app.dependencies[0].target_id, "SPDXRef-lib");
        assert_eq!(doc.packages[1].supplier.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_tag_value_file_section_keeps_package_id() {
        let content = "\
SPDXVersion: SPDX-2.3
DocumentName: files

PackageName: app
SPDXID: SPDXRef-app
PackageVersion: 1.0.0

FileName: ./src/main.rs
SPDXID: SPDXRef-File1
PackageVersion: 9.9.9

PackageName: lib
SPDXID: SPDXRef-lib

Relationship: SPDXRef-app DEPENDS_ON SPDXRef-lib
";
        let doc = SpdxParser::new().parse_str(content).unwrap();
        assert_eq!(doc.package_count(), 2);
        assert!(!doc.metadata.contains_key("spdx_id"));

        let app = &doc.packages[0];
        assert_eq!(app.id, "SPDXRef-app");
        assert_eq!(app.version.as_deref(), Some("1.0.0"));
        assert_eq!(app.dependencies.len(), 1);
        assert_eq!(app.dependencies[0].target_id, "SPDXRef-lib");
        assert_eq!(doc.packages[1].id, "SPDXRef-lib");
    }

    #[test]
    fn test_tag_value_snippet_before_packages() {
        let content = "\
SPDXVersion: SPDX-2.3
SPDXID: SPDXRef-DOCUMENT
SnippetSPDXID: SPDXRef-Snippet1
SPDXID: SPDXRef-Stray
PackageName: only
SPDXID: SPDXRef-only
";
        let doc = SpdxParser::new().parse_str(content).unwrap();
        assert_eq!(doc.metadata["spdx_id"], MetadataValue::from("SPDXRef-DOCUMENT"));
        assert_eq!(doc.package_count(), 1);
        assert_eq!(doc.packages[0].id, "SPDXRef-only");
    }

    #[test]
    fn test_tag_value_requires_version() {
        let err = SpdxParser::new().parse_str("DocumentName: x\n").unwrap_err();
        assert_eq!(
            err.invalid_kind(),
            Some(&InvalidKind::MissingMarker("SPDXVersion".to_string()))
        );
    }

    #[test]
    fn test_idempotent() {
        let parser = SpdxParser::new();
        let a = parser.parse_str(SPDX_JSON).unwrap();
        let b = parser.parse_str(SPDX_JSON).unwrap();
        assert_eq!(a.packages, b.packages);
        assert_eq!(a.relationships, b.relationships);
    }
}
