//! Package lookup by name.
//!
//! Exact (case-insensitive) matches always win. Only when no package has the
//! queried name does the lookup fall back to edit-distance similarity.

use crate::model::{Document, Package, PackageInfo};
use serde::{Deserialize, Serialize};

/// Default minimum similarity for a fuzzy match
pub const DEFAULT_FUZZY_CUTOFF: f64 = 0.6;

/// How a lookup matched
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MatchKind {
    /// Case-insensitive name equality
    Exact,
    /// Closest name above the cutoff
    Fuzzy { score: f64 },
}

/// Result of [`PackageLookup::find_package`]
#[derive(Debug, Clone, Copy)]
pub struct PackageMatch<'a> {
    pub package: &'a Package,
    pub kind: MatchKind,
}

/// Normalized similarity of two names in `[0, 1]`, ignoring case
#[must_use]
pub fn name_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_damerau_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Name lookup over a document's packages
#[derive(Debug, Clone)]
pub struct PackageLookup {
    cutoff: f64,
}

impl PackageLookup {
    /// Create a lookup with the default fuzzy cutoff
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cutoff: DEFAULT_FUZZY_CUTOFF,
        }
    }

    /// Set the minimum similarity for fuzzy matches, clamped to `[0, 1]`
    #[must_use]
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub const fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Find a package and report how it matched.
    ///
    /// The first exact match in document order wins. Otherwise the most
    /// similar name at or above the cutoff wins, ties going to the earlier
    /// package.
    #[must_use]
    pub fn find_package<'a>(&self, document: &'a Document, query: &str) -> Option<PackageMatch<'a>> {
        let query_lower = query.to_lowercase();
        if let Some(package) = document
            .packages
            .iter()
            .find(|p| p.name.to_lowercase() == query_lower)
        {
            return Some(PackageMatch {
                package,
                kind: MatchKind::Exact,
            });
        }

        let mut best: Option<(&Package, f64)> = None;
        for package in &document.packages {
            let score = name_similarity(query, &package.name);
            if score < self.cutoff {
                continue;
            }
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((package, score));
            }
        }

        let (package, score) = best?;
        tracing::info!("Found fuzzy match: {} for '{}' ({:.2})", package.name, query, score);
        Some(PackageMatch {
            package,
            kind: MatchKind::Fuzzy { score },
        })
    }

    /// Find a package by name. `None` means no package matched.
    #[must_use]
    pub fn find(&self, document: &Document, query: &str) -> Option<PackageInfo> {
        self.find_package(document, query)
            .map(|m| package_info(m.package))
    }

    /// Packages whose name or description contains `term`, ignoring case
    #[must_use]
    pub fn search(&self, document: &Document, term: &str) -> Vec<PackageInfo> {
        let term = term.to_lowercase();
        document
            .packages
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&term)
                    || p.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            })
            .map(package_info)
            .collect()
    }

    /// Package names in document order
    #[must_use]
    pub fn list_names(&self, document: &Document) -> Vec<String> {
        document.packages.iter().map(|p| p.name.clone()).collect()
    }
}

impl Default for PackageLookup {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten a package for display
#[must_use]
pub fn package_info(package: &Package) -> PackageInfo {
    PackageInfo {
        name: package.name.clone(),
        version: package.version.clone(),
        license: package.licenses.first().map(|l| l.identifier.clone()),
        description: package.description.clone(),
        dependencies: package
            .dependencies
            .iter()
            .map(|d| d.target_name.clone())
            .collect(),
        vulnerabilities: package
            .vulnerabilities
            .iter()
            .map(|v| {
                let id = v.id.as_deref().filter(|s| !s.is_empty()).unwrap_or("Unknown");
                match v.severity.as_deref().filter(|s| !s.is_empty()) {
                    Some(severity) => format!("{id} ({severity})"),
                    None => id.to_string(),
                }
            })
            .collect(),
        supplier: package.supplier.clone(),
        homepage: package.homepage.clone(),
        purl: package.purl.clone(),
    }
}
