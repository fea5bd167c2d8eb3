//! SBOM verifier.
//!
//! Runs every structural and completeness check and accumulates the
//! findings. Checks never short-circuit: a document with many problems
//! reports all of them. Only `issues` decide validity; `warnings` are
//! advisory.

use crate::graph::DependencyGraph;
use crate::model::{Document, Package, SbomFormat, VerificationResult};
use std::collections::HashSet;
use std::str::FromStr;

/// Document verifier
#[derive(Debug, Clone, Copy, Default)]
pub struct Verifier;

impl Verifier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Verify a document
    #[must_use]
    pub fn verify(&self, document: &Document) -> VerificationResult {
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        check_document_fields(document, &mut issues);
        check_licenses(document, &mut issues, &mut warnings);
        check_dependencies(document, &mut issues, &mut warnings);
        check_packages(document, &mut issues);
        if document.metadata.is_empty() {
            issues.push("Missing metadata information".to_string());
        }
        check_purls(document, &mut warnings);

        tracing::debug!(
            "Verified '{}': {} issues, {} warnings",
            document.name,
            issues.len(),
            warnings.len()
        );

        VerificationResult {
            is_valid: issues.is_empty(),
            issues,
            warnings,
            format_detected: document.format,
            version_detected: document.version.clone(),
        }
    }
}

fn names_where<'a>(document: &'a Document, predicate: impl Fn(&Package) -> bool) -> Vec<&'a str> {
    document
        .packages
        .iter()
        .filter(|p| predicate(p))
        .map(|p| p.name.as_str())
        .collect()
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

fn check_document_fields(document: &Document, issues: &mut Vec<String>) {
    if document.name.trim().is_empty() {
        issues.push("Missing document name".to_string());
    }
    if document.creator.trim().is_empty() {
        issues.push("Missing creator information".to_string());
    }
    if document.created.is_none() {
        issues.push("Missing creation timestamp".to_string());
    }

    match document.format {
        SbomFormat::Spdx if !document.version.starts_with("SPDX-") => {
            issues.push("Invalid SPDX version format".to_string());
        }
        SbomFormat::CycloneDx if !document.version.starts_with("1.") => {
            issues.push("Invalid CycloneDX version format".to_string());
        }
        _ => {}
    }
}

fn check_licenses(document: &Document, issues: &mut Vec<String>, warnings: &mut Vec<String>) {
    let without = names_where(document, |p| p.licenses.is_empty());
    if !without.is_empty() {
        issues.push(format!(
            "Packages without license information: {}",
            without.join(", ")
        ));
    }

    for package in &document.packages {
        if package.licenses.iter().any(|l| l.identifier.trim().is_empty()) {
            warnings.push(format!("{}: missing license identifier", package.name));
        }
    }
}

fn check_dependencies(document: &Document, issues: &mut Vec<String>, warnings: &mut Vec<String>) {
    if document.package_count() > 1 {
        let without = names_where(document, |p| p.dependencies.is_empty());
        if !without.is_empty() {
            issues.push(format!(
                "Packages without dependency information: {}",
                without.join(", ")
            ));
        }
    }

    let ids: HashSet<&str> = document.packages.iter().map(|p| p.id.as_str()).collect();
    for package in &document.packages {
        for dep in &package.dependencies {
            if !ids.contains(dep.target_id.as_str()) {
                warnings.push(format!(
                    "{}: dependency '{}' does not refer to a package in this document",
                    package.name, dep.target_id
                ));
            }
        }
    }

    for cycle in DependencyGraph::from_document(document).cycles() {
        warnings.push(format!("Circular dependency: {}", cycle.join(" -> ")));
    }
}

fn check_packages(document: &Document, issues: &mut Vec<String>) {
    let without_version = names_where(document, |p| is_blank(p.version.as_deref()));
    if !without_version.is_empty() {
        issues.push(format!(
            "Packages without version information: {}",
            without_version.join(", ")
        ));
    }

    let without_description = names_where(document, |p| is_blank(p.description.as_deref()));
    if !without_description.is_empty() {
        issues.push(format!(
            "Packages without description: {}",
            without_description.join(", ")
        ));
    }
}

fn check_purls(document: &Document, warnings: &mut Vec<String>) {
    for package in &document.packages {
        let Some(purl) = package.purl.as_deref() else {
            continue;
        };
        if let Err(e) = packageurl::PackageUrl::from_str(purl) {
            warnings.push(format!("{}: invalid package URL '{}': {}", package.name, purl, e));
        }
    }
}
