//! Normalized SBOM document structures.
//!
//! Every supported input format (SPDX, CycloneDX, SWID) is converted into a
//! [`Document`] before any analysis runs. A document is built once by a
//! converter and is never mutated afterwards.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SBOM interchange format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SbomFormat {
    Spdx,
    CycloneDx,
    Swid,
}

impl SbomFormat {
    /// Human-readable format name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Spdx => "SPDX",
            Self::CycloneDx => "CycloneDX",
            Self::Swid => "SWID",
        }
    }
}

impl fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loosely-typed value for format-native metadata and relationship records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<MetadataValue>),
    Map(IndexMap<String, MetadataValue>),
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items.into_iter().map(Self::String).collect())
    }
}

/// String-keyed map of loosely-typed values, insertion ordered.
pub type RawRecord = IndexMap<String, MetadataValue>;

/// Normalized SBOM document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source format
    pub format: SbomFormat,
    /// Format version string as written in the source (e.g. "SPDX-2.3", "1.5")
    pub version: String,
    /// Document name
    pub name: String,
    /// Document namespace or serial number
    pub namespace: Option<String>,
    /// Creation timestamp
    pub created: Option<DateTime<Utc>>,
    /// Creator identity (tool, person or organization)
    pub creator: String,
    /// Packages in document order
    pub packages: Vec<Package>,
    /// Format-native relationship records
    pub relationships: Vec<RawRecord>,
    /// Format-native document metadata
    pub metadata: RawRecord,
    /// Number of package id collisions resolved while converting
    #[serde(skip)]
    pub collision_count: usize,
}

impl Document {
    /// Create an empty document with the given identity
    pub fn new(format: SbomFormat, version: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            format,
            version: version.into(),
            name: name.into(),
            namespace: None,
            created: None,
            creator: String::new(),
            packages: Vec::new(),
            relationships: Vec::new(),
            metadata: RawRecord::new(),
            collision_count: 0,
        }
    }

    /// Number of packages
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Look up a package by its id
    #[must_use]
    pub fn package_by_id(&self, id: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.id == id)
    }

    /// Total number of dependency edges across all packages
    #[must_use]
    pub fn dependency_edge_count(&self) -> usize {
        self.packages.iter().map(|p| p.dependencies.len()).sum()
    }

    /// Total number of vulnerability records across all packages
    #[must_use]
    pub fn vulnerability_count(&self) -> usize {
        self.packages.iter().map(|p| p.vulnerabilities.len()).sum()
    }

    /// Log a single summary line if any package id collisions occurred during conversion.
    pub fn log_collision_summary(&self) {
        if self.collision_count > 0 {
            tracing::info!(
                collision_count = self.collision_count,
                "Package id collisions: {} packages reused an existing id and were renamed \
                 with a numeric suffix",
                self.collision_count
            );
        }
    }
}

/// A single software component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Identifier, unique within the owning document
    pub id: String,
    /// Package name (may repeat across packages)
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub licenses: Vec<License>,
    /// Outgoing dependency edges
    pub dependencies: Vec<Dependency>,
    pub vulnerabilities: Vec<Vulnerability>,
    /// Package URL
    pub purl: Option<String>,
    pub supplier: Option<String>,
    pub homepage: Option<String>,
    /// Source provenance
    pub source_info: Option<String>,
    /// Checksum algorithm to digest
    pub checksums: IndexMap<String, String>,
}

impl Package {
    /// Create a package with an id and a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a license
    #[must_use]
    pub fn with_license(mut self, license: License) -> Self {
        self.licenses.push(license);
        self
    }

    /// Add a dependency edge
    #[must_use]
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Add a vulnerability
    #[must_use]
    pub fn with_vulnerability(mut self, vulnerability: Vulnerability) -> Self {
        self.vulnerabilities.push(vulnerability);
        self
    }

    /// Whether any of supplier, homepage or package URL is present
    #[must_use]
    pub fn has_provenance(&self) -> bool {
        self.supplier.is_some() || self.homepage.is_some() || self.purl.is_some()
    }
}

/// License entry attached to a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// SPDX-style short identifier, kept exactly as written in the source
    pub identifier: String,
    pub name: Option<String>,
    pub url: Option<String>,
    /// OSI approval, known only for identifiers found in the SPDX license list
    pub is_osi_approved: Option<bool>,
}

impl License {
    /// Create a license from an identifier, resolving OSI approval from the SPDX license list.
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let is_osi_approved = osi_approval(&identifier);
        Self {
            identifier,
            name: None,
            url: None,
            is_osi_approved,
        }
    }

    /// Set the display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// OSI approval for an SPDX identifier or expression.
///
/// A compound expression is approved when every term is an approved SPDX license.
fn osi_approval(identifier: &str) -> Option<bool> {
    if identifier.is_empty() {
        return None;
    }
    if let Some(id) = spdx::license_id(identifier) {
        return Some(id.is_osi_approved());
    }
    let expr = spdx::Expression::parse_mode(identifier, spdx::ParseMode::LAX).ok()?;
    let mut approved = true;
    for req in expr.requirements() {
        match req.req.license {
            spdx::LicenseItem::Spdx { id, .. } => approved &= id.is_osi_approved(),
            _ => return None,
        }
    }
    Some(approved)
}

/// Directed dependency edge from the owning package to a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Target package identifier
    pub target_id: String,
    /// Target package name, denormalized for display
    pub target_name: String,
    pub version_constraint: Option<String>,
    /// Relationship tag (e.g. `DEPENDS_ON`)
    pub relationship: String,
}

impl Dependency {
    /// Create a `DEPENDS_ON` edge
    pub fn new(target_id: impl Into<String>, target_name: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            target_name: target_name.into(),
            version_constraint: None,
            relationship: "DEPENDS_ON".to_string(),
        }
    }

    /// Override the relationship tag
    #[must_use]
    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = relationship.into();
        self
    }
}

/// Known vulnerability recorded against a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    /// CVE-style identifier
    pub id: Option<String>,
    /// Severity as written in the source
    pub severity: Option<String>,
    pub description: Option<String>,
    pub affected_versions: Vec<String>,
}

/// Severity buckets used in vulnerability summaries
pub const SEVERITY_BUCKETS: [&str; 4] = ["critical", "high", "medium", "low"];

impl Vulnerability {
    /// Create a vulnerability record with an id and a severity
    pub fn new(id: impl Into<String>, severity: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            severity: Some(severity.into()),
            ..Self::default()
        }
    }

    /// Lowercased severity, or `"unknown"` when unset or not a recognized level.
    #[must_use]
    pub fn severity_bucket(&self) -> String {
        self.severity
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| SEVERITY_BUCKETS.contains(&s.as_str()))
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_bucket() {
        assert_eq!(Vulnerability::new("CVE-1", "HIGH").severity_bucket(), "high");
        assert_eq!(Vulnerability::new("CVE-1", " Critical ").severity_bucket(), "critical");
        assert_eq!(Vulnerability::new("CVE-1", "moderate").severity_bucket(), "unknown");
        assert_eq!(Vulnerability::default().severity_bucket(), "unknown");
    }

    #[test]
    fn test_license_osi_flag() {
        assert_eq!(License::new("MIT").is_osi_approved, Some(true));
        assert_eq!(License::new("Apache-2.0").is_osi_approved, Some(true));
        assert_eq!(License::new("LicenseRef-custom").is_osi_approved, None);
        assert_eq!(License::new("").is_osi_approved, None);
    }

    #[test]
    fn test_document_counts() {
        let mut doc = Document::new(SbomFormat::Spdx, "SPDX-2.3", "demo");
        doc.packages.push(
            Package::new("a", "a")
                .with_dependency(Dependency::new("b", "b"))
                .with_vulnerability(Vulnerability::new("CVE-2024-1", "low")),
        );
        doc.packages.push(Package::new("b", "b"));

        assert_eq!(doc.package_count(), 2);
        assert_eq!(doc.dependency_edge_count(), 1);
        assert_eq!(doc.vulnerability_count(), 1);
        assert_eq!(doc.package_by_id("b").map(|p| p.name.as_str()), Some("b"));
        assert!(doc.package_by_id("c").is_none());
    }

    #[test]
    fn test_package_provenance() {
        let mut pkg = Package::new("a", "a");
        assert!(!pkg.has_provenance());
        pkg.homepage = Some("https://example.com".to_string());
        assert!(pkg.has_provenance());
    }
}
