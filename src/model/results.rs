//! Derived result objects.
//!
//! These are produced by the graph engine, analyzer, lookup and verifier from a
//! [`Document`](super::Document) and handed to the report renderers. None of them
//! hold references back into the document.

use super::SbomFormat;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate analysis of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_packages: usize,
    /// Sorted unique license identifiers
    pub unique_licenses: Vec<String>,
    /// License identifier to number of (package, license) pairs
    pub license_distribution: BTreeMap<String, usize>,
    /// Package name to dependency depth
    pub dependency_depth: IndexMap<String, usize>,
    /// Lowercased severity to number of vulnerability records
    pub vulnerability_summary: BTreeMap<String, usize>,
    /// Completeness score in `[0, 100]`
    pub completeness_score: f64,
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    /// Total number of vulnerability records
    #[must_use]
    pub fn total_vulnerabilities(&self) -> usize {
        self.vulnerability_summary.values().sum()
    }

    /// Maximum dependency depth
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.dependency_depth.values().copied().max().unwrap_or(0)
    }
}

/// Name-keyed view of the dependency graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyTree {
    /// Package names with no outgoing dependencies
    pub root_packages: Vec<String>,
    /// Package name to dependency names
    pub dependency_graph: IndexMap<String, Vec<String>>,
    /// Package name to depth
    pub depth_map: IndexMap<String, usize>,
    /// Detected cycles, each closed by repeating its first node
    pub cycles: Vec<Vec<String>>,
    pub total_dependencies: usize,
    pub max_depth: usize,
}

impl DependencyTree {
    /// Whether the graph contains at least one cycle
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }
}

/// Flattened view of a single package for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: Option<String>,
    /// Primary (first) license identifier
    pub license: Option<String>,
    pub description: Option<String>,
    /// Direct dependency names
    pub dependencies: Vec<String>,
    /// Vulnerabilities formatted as `"{id} ({severity})"`
    pub vulnerabilities: Vec<String>,
    pub supplier: Option<String>,
    pub homepage: Option<String>,
    pub purl: Option<String>,
}

/// Outcome of structural and completeness checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// True iff `issues` is empty
    pub is_valid: bool,
    pub issues: Vec<String>,
    /// Advisory findings that do not affect validity
    pub warnings: Vec<String>,
    pub format_detected: SbomFormat,
    pub version_detected: String,
}

/// Field coverage counters across all packages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageStatistics {
    pub total_packages: usize,
    pub packages_with_version: usize,
    pub packages_with_description: usize,
    pub packages_with_licenses: usize,
    pub packages_with_dependencies: usize,
    pub packages_with_vulnerabilities: usize,
    /// Field name to percentage of packages that carry it
    pub coverage: BTreeMap<String, f64>,
}

/// Flat counters combining analysis and dependency results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_packages: usize,
    pub unique_licenses: usize,
    pub completeness_score: f64,
    pub total_dependencies: usize,
    pub max_depth: usize,
    pub cycle_count: usize,
    pub vulnerability_count: usize,
    pub recommendation_count: usize,
}

impl AnalysisSummary {
    /// Combine an analysis result with its dependency tree
    #[must_use]
    pub fn new(analysis: &AnalysisResult, tree: &DependencyTree) -> Self {
        Self {
            total_packages: analysis.total_packages,
            unique_licenses: analysis.unique_licenses.len(),
            completeness_score: analysis.completeness_score,
            total_dependencies: tree.total_dependencies,
            max_depth: tree.max_depth,
            cycle_count: tree.cycles.len(),
            vulnerability_count: analysis.total_vulnerabilities(),
            recommendation_count: analysis.recommendations.len(),
        }
    }
}
