//! SBOM analyzer.
//!
//! Computes license and vulnerability histograms, per-package dependency
//! depth, a completeness score and threshold-based recommendations.

use crate::graph::DependencyGraph;
use crate::model::{AnalysisResult, Document, Package, PackageStatistics};
use std::collections::BTreeMap;

/// Default number of package names quoted in a recommendation
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Completeness below this is reported as low
pub const LOW_COMPLETENESS: f64 = 50.0;

/// Completeness below this (and at or above [`LOW_COMPLETENESS`]) is moderate
pub const MODERATE_COMPLETENESS: f64 = 80.0;

/// More distinct licenses than this suggests a compliance review
const HIGH_LICENSE_DIVERSITY: usize = 10;

/// Dependency chains deeper than this are flagged
const DEEP_DEPENDENCY_TREE: usize = 5;

/// More high-severity findings than this are flagged when none are critical
const MANY_HIGH_SEVERITY: usize = 5;

/// Points awarded per package field, out of 100
const NAME_POINTS: u32 = 20;
const VERSION_POINTS: u32 = 20;
const DESCRIPTION_POINTS: u32 = 20;
const LICENSE_POINTS: u32 = 20;
const DEPENDENCY_POINTS: u32 = 10;
const PROVENANCE_POINTS: u32 = 10;

/// Document analyzer
#[derive(Debug, Clone)]
pub struct Analyzer {
    sample_size: usize,
}

impl Analyzer {
    /// Create an analyzer with default settings
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    /// Set how many package names a recommendation quotes before summarizing
    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size.max(1);
        self
    }

    /// Analyze a document
    #[must_use]
    pub fn analyze(&self, document: &Document) -> AnalysisResult {
        let license_distribution = license_distribution(document);
        let vulnerability_summary = vulnerability_summary(document);
        let completeness_score = completeness_score(document);

        let mut result = AnalysisResult {
            total_packages: document.package_count(),
            unique_licenses: license_distribution.keys().cloned().collect(),
            license_distribution,
            dependency_depth: DependencyGraph::from_document(document).depths(),
            vulnerability_summary,
            completeness_score,
            recommendations: Vec::new(),
        };
        result.recommendations = self.recommendations(document, &result);

        tracing::debug!(
            "Analyzed {} packages: completeness {:.1}, {} recommendations",
            result.total_packages,
            result.completeness_score,
            result.recommendations.len()
        );
        result
    }

    fn recommendations(&self, document: &Document, result: &AnalysisResult) -> Vec<String> {
        let mut recommendations = Vec::new();
        let score = result.completeness_score;

        if score < LOW_COMPLETENESS {
            recommendations.push(format!(
                "SBOM completeness is low ({score:.1}%). Consider adding missing package information."
            ));
        } else if score < MODERATE_COMPLETENESS {
            recommendations.push(format!(
                "SBOM completeness is moderate ({score:.1}%). Consider filling in the remaining package fields."
            ));
        }

        let without_licenses = names_where(document, |p| p.licenses.is_empty());
        if !without_licenses.is_empty() {
            recommendations.push(format!(
                "{} package(s) have no license information: {}",
                without_licenses.len(),
                self.sample(&without_licenses)
            ));
        }

        if document.package_count() > 1 {
            let without_deps = names_where(document, |p| p.dependencies.is_empty());
            if !without_deps.is_empty() {
                recommendations.push(format!(
                    "{} package(s) declare no dependencies: {}",
                    without_deps.len(),
                    self.sample(&without_deps)
                ));
            }
        }

        let without_versions = names_where(document, |p| !has_text(p.version.as_deref()));
        if !without_versions.is_empty() {
            recommendations.push(format!(
                "{} package(s) have no version: {}",
                without_versions.len(),
                self.sample(&without_versions)
            ));
        }

        let total_vulnerabilities = result.total_vulnerabilities();
        if total_vulnerabilities > 0 {
            recommendations.push(format!(
                "{total_vulnerabilities} known vulnerabilities found. Review and update the affected packages."
            ));
        }

        if result.unique_licenses.len() > HIGH_LICENSE_DIVERSITY {
            recommendations.push(
                "High license diversity detected. Consider license compliance review.".to_string(),
            );
        }

        if result.max_depth() > DEEP_DEPENDENCY_TREE {
            recommendations.push(
                "Deep dependency tree detected. Consider dependency optimization.".to_string(),
            );
        }

        let severity = |bucket: &str| result.vulnerability_summary.get(bucket).copied().unwrap_or(0);
        if severity("critical") > 0 {
            recommendations
                .push("Critical vulnerabilities detected. Immediate action required.".to_string());
        } else if severity("high") > MANY_HIGH_SEVERITY {
            recommendations.push(
                "Multiple high-severity vulnerabilities. Review security posture.".to_string(),
            );
        }

        recommendations
    }

    /// Join up to `sample_size` names, summarizing the rest
    fn sample(&self, names: &[&str]) -> String {
        let shown = names.iter().take(self.sample_size).copied().collect::<Vec<_>>();
        let mut text = shown.join(", ");
        if names.len() > shown.len() {
            text.push_str(&format!(" and {} more", names.len() - shown.len()));
        }
        text
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}

fn names_where(document: &Document, predicate: impl Fn(&Package) -> bool) -> Vec<&str> {
    document
        .packages
        .iter()
        .filter(|p| predicate(p))
        .map(|p| p.name.as_str())
        .collect()
}

/// License identifier to number of (package, license) pairs.
///
/// Identifiers are counted as written; empty identifiers are skipped.
#[must_use]
pub fn license_distribution(document: &Document) -> BTreeMap<String, usize> {
    let mut distribution = BTreeMap::new();
    for license in document.packages.iter().flat_map(|p| &p.licenses) {
        if !license.identifier.is_empty() {
            *distribution.entry(license.identifier.clone()).or_insert(0) += 1;
        }
    }
    distribution
}

/// Lowercased severity to number of vulnerability records
#[must_use]
pub fn vulnerability_summary(document: &Document) -> BTreeMap<String, usize> {
    let mut summary = BTreeMap::new();
    for vuln in document.packages.iter().flat_map(|p| &p.vulnerabilities) {
        *summary.entry(vuln.severity_bucket()).or_insert(0) += 1;
    }
    summary
}

/// Points (out of 100) a single package earns
#[must_use]
pub fn package_points(package: &Package) -> u32 {
    let mut points = 0;
    if has_text(Some(&package.name)) {
        points += NAME_POINTS;
    }
    if has_text(package.version.as_deref()) {
        points += VERSION_POINTS;
    }
    if has_text(package.description.as_deref()) {
        points += DESCRIPTION_POINTS;
    }
    if !package.licenses.is_empty() {
        points += LICENSE_POINTS;
    }
    if !package.dependencies.is_empty() {
        points += DEPENDENCY_POINTS;
    }
    if package.has_provenance() {
        points += PROVENANCE_POINTS;
    }
    points
}

/// Mean package points as a percentage; 0.0 for an empty document
#[must_use]
pub fn completeness_score(document: &Document) -> f64 {
    if document.packages.is_empty() {
        return 0.0;
    }
    let total: u64 = document
        .packages
        .iter()
        .map(|p| u64::from(package_points(p)))
        .sum();
    let max = document.package_count() as f64 * 100.0;
    (total as f64 / max) * 100.0
}

/// Field coverage counters across all packages
#[must_use]
pub fn package_statistics(document: &Document) -> PackageStatistics {
    let total = document.package_count();
    let count = |predicate: fn(&Package) -> bool| document.packages.iter().filter(|p| predicate(p)).count();

    let with_version = count(|p| has_text(p.version.as_deref()));
    let with_description = count(|p| has_text(p.description.as_deref()));
    let with_licenses = count(|p| !p.licenses.is_empty());
    let with_dependencies = count(|p| !p.dependencies.is_empty());
    let with_vulnerabilities = count(|p| !p.vulnerabilities.is_empty());

    let percentage = |n: usize| {
        if total == 0 {
            0.0
        } else {
            n as f64 / total as f64 * 100.0
        }
    };
    let coverage = BTreeMap::from([
        ("version".to_string(), percentage(with_version)),
        ("description".to_string(), percentage(with_description)),
        ("licenses".to_string(), percentage(with_licenses)),
        ("dependencies".to_string(), percentage(with_dependencies)),
        ("vulnerabilities".to_string(), percentage(with_vulnerabilities)),
    ]);

    PackageStatistics {
        total_packages: total,
        packages_with_version: with_version,
        packages_with_description: with_description,
        packages_with_licenses: with_licenses,
        packages_with_dependencies: with_dependencies,
        packages_with_vulnerabilities: with_vulnerabilities,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dependency, License, SbomFormat, Vulnerability};

    fn document(packages: Vec<Package>) -> Document {
        let mut doc = Document::new(SbomFormat::CycloneDx, "1.5", "demo");
        doc.packages = packages;
        doc
    }

    fn full_package(name: &str) -> Package {
        let mut pkg = Package::new(name, name)
            .with_version("1.0.0")
            .with_description("a package")
            .with_license(License::new("MIT"))
            .with_dependency(Dependency::new("other", "other"));
        pkg.purl = Some(format!("pkg:npm/{name}@1.0.0"));
        pkg
    }

    #[test]
    fn test_empty_document() {
        let result = Analyzer::new().analyze(&document(Vec::new()));
        assert_eq!(result.total_packages, 0);
        assert_eq!(result.completeness_score, 0.0);
        assert!(result.unique_licenses.is_empty());
        assert!(result.dependency_depth.is_empty());
        assert_eq!(result.recommendations.len(), 1);
        assert!(result.recommendations[0].starts_with("SBOM completeness is low"));
    }

    #[test]
    fn test_package_points() {
        assert_eq!(package_points(&full_package("a")), 100);
        assert_eq!(package_points(&Package::new("a", "a")), 20);
        assert_eq!(package_points(&Package::new("a", "a").with_version("")), 20);
        assert_eq!(package_points(&Package::new("a", "a").with_version("1")), 40);
    }

    #[test]
    fn test_completeness_is_mean() {
        let doc = document(vec![full_package("a"), Package::new("b", "b")]);
        assert!((completeness_score(&doc) - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_license_distribution_counts_literal_identifiers() {
        let doc = document(vec![
            Package::new("a", "a")
                .with_license(License::new("MIT"))
                .with_license(License::new("mit")),
            Package::new("b", "b")
                .with_license(License::new("MIT"))
                .with_license(License::new("")),
        ]);
        let result = Analyzer::new().analyze(&doc);
        assert_eq!(result.license_distribution["MIT"], 2);
        assert_eq!(result.license_distribution["mit"], 1);
        assert_eq!(result.unique_licenses, vec!["MIT", "mit"]);
        assert_eq!(result.license_distribution.values().sum::<usize>(), 3);
    }

    #[test]
    fn test_vulnerability_summary() {
        let mut unset = Vulnerability::default();
        unset.id = Some("CVE-3".to_string());
        let doc = document(vec![Package::new("a", "a")
            .with_vulnerability(Vulnerability::new("CVE-1", "HIGH"))
            .with_vulnerability(Vulnerability::new("CVE-2", "high"))
            .with_vulnerability(unset)]);

        let summary = vulnerability_summary(&doc);
        assert_eq!(summary["high"], 2);
        assert_eq!(summary["unknown"], 1);
    }

    #[test]
    fn test_dependency_depth() {
        let doc = document(vec![
            Package::new("app", "app").with_dependency(Dependency::new("lib", "lib")),
            Package::new("lib", "lib").with_dependency(Dependency::new("core", "core")),
            Package::new("core", "core"),
        ]);
        let result = Analyzer::new().analyze(&doc);
        assert_eq!(result.dependency_depth["app"], 2);
        assert_eq!(result.dependency_depth["core"], 0);
        assert_eq!(result.max_depth(), 2);
    }

    #[test]
    fn test_recommendations_order_and_sampling() {
        let packages = (0..7)
            .map(|i| Package::new(format!("p{i}"), format!("p{i}")))
            .collect::<Vec<_>>();
        let mut doc = document(packages);
        doc.packages[0]
            .vulnerabilities
            .push(Vulnerability::new("CVE-1", "low"));

        let recs = Analyzer::new().analyze(&doc).recommendations;
        assert_eq!(recs.len(), 5);
        assert!(recs[0].starts_with("SBOM completeness is low (20.0%)"));
        assert_eq!(
            recs[1],
            "7 package(s) have no license information: p0, p1, p2, p3, p4 and 2 more"
        );
        assert!(recs[2].starts_with("7 package(s) declare no dependencies"));
        assert!(recs[3].starts_with("7 package(s) have no version"));
        assert!(recs[4].starts_with("1 known vulnerabilities"));
    }

    #[test]
    fn test_extra_recommendations_follow_core_rules() {
        let mut packages = (0..7)
            .map(|i| {
                let mut pkg = full_package(&format!("p{i}"));
                pkg.licenses = vec![License::new(format!("L{i}a")), License::new(format!("L{i}b"))];
                pkg.dependencies = if i < 6 {
                    vec![Dependency::new(format!("p{}", i + 1), format!("p{}", i + 1))]
                } else {
                    Vec::new()
                };
                pkg
            })
            .collect::<Vec<_>>();
        packages[0]
            .vulnerabilities
            .push(Vulnerability::new("CVE-1", "CRITICAL"));

        let result = Analyzer::new().analyze(&document(packages));
        assert_eq!(result.unique_licenses.len(), 14);
        assert_eq!(result.max_depth(), 6);
        let recs = &result.recommendations;
        assert_eq!(recs.len(), 5);
        assert!(recs[0].starts_with("1 package(s) declare no dependencies: p6"));
        assert!(recs[1].starts_with("1 known vulnerabilities"));
        assert_eq!(
            recs[2],
            "High license diversity detected. Consider license compliance review."
        );
        assert_eq!(
            recs[3],
            "Deep dependency tree detected. Consider dependency optimization."
        );
        assert_eq!(
            recs[4],
            "Critical vulnerabilities detected. Immediate action required."
        );
    }

    #[test]
    fn test_high_severity_rule_needs_more_than_five() {
        let with_high = |n: usize| {
            let mut pkg = full_package("a");
            for i in 0..n {
                pkg.vulnerabilities
                    .push(Vulnerability::new(format!("CVE-{i}"), "high"));
            }
            Analyzer::new().analyze(&document(vec![pkg])).recommendations
        };
        let flagged = |recs: &[String]| recs.iter().any(|r| r.starts_with("Multiple high-severity"));

        assert!(!flagged(&with_high(5)));
        assert!(flagged(&with_high(6)));
    }

    #[test]
    fn test_single_package_skips_dependency_recommendation() {
        let recs = Analyzer::new()
            .with_sample_size(2)
            .analyze(&document(vec![Package::new("solo", "solo")]))
            .recommendations;
        assert!(!recs.iter().any(|r| r.contains("declare no dependencies")));
    }

    #[test]
    fn test_moderate_band() {
        let mut pkg = full_package("a");
        pkg.purl = None;
        pkg.dependencies.clear();
        // 80 points is outside the moderate band
        let recs = Analyzer::new().analyze(&document(vec![pkg.clone()])).recommendations;
        assert!(!recs.iter().any(|r| r.contains("completeness")));

        pkg.description = None;
        let recs = Analyzer::new().analyze(&document(vec![pkg])).recommendations;
        assert!(recs[0].starts_with("SBOM completeness is moderate (60.0%)"));
    }

    #[test]
    fn test_package_statistics() {
        let doc = document(vec![full_package("a"), Package::new("b", "b")]);
        let stats = package_statistics(&doc);
        assert_eq!(stats.total_packages, 2);
        assert_eq!(stats.packages_with_version, 1);
        assert_eq!(stats.packages_with_vulnerabilities, 0);
        assert!((stats.coverage["licenses"] - 50.0).abs() < f64::EPSILON);

        let empty = package_statistics(&document(Vec::new()));
        assert_eq!(empty.coverage["version"], 0.0);
    }
}
