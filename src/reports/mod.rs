//! Report rendering for analysis results.
//!
//! Every renderer turns the same typed results into one output format:
//! - Text: terminal output, optionally colored
//! - JSON: structured data for programmatic integration
//! - Markdown: documentation and PR comments
//! - HTML: standalone page for stakeholders
//!
//! # Security
//!
//! SBOM-derived strings (package names, descriptions, licenses) are
//! untrusted. The HTML and Markdown renderers pass all of them through
//! [`escape`] before embedding.

pub mod escape;
mod html;
mod json;
mod markdown;
mod text;
mod types;

pub use html::HtmlReporter;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use text::TextReporter;
pub use types::{ReportContext, ReportFormat};

use crate::model::{AnalysisResult, DependencyTree, PackageInfo, PackageStatistics, VerificationResult};
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Result of a `check-pkg` lookup handed to the renderers
#[derive(Debug, Clone, Copy)]
pub struct PackageReport<'a> {
    /// Name or search term as typed
    pub query: &'a str,
    /// Matched packages; empty when nothing matched
    pub matches: &'a [PackageInfo],
    /// Whether `matches` came from a substring search rather than a lookup
    pub search: bool,
    /// Fuzzy similarity of the match, `None` for exact matches and searches
    pub fuzzy_score: Option<f64>,
    /// Known package names, listed when nothing matched
    pub suggestions: &'a [String],
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render the `analyze` result
    fn analysis_report(
        &self,
        ctx: &ReportContext,
        analysis: &AnalysisResult,
        statistics: &PackageStatistics,
        tree: &DependencyTree,
    ) -> Result<String, ReportError>;

    /// Render the `verify` result
    fn verification_report(
        &self,
        ctx: &ReportContext,
        result: &VerificationResult,
    ) -> Result<String, ReportError>;

    /// Render the `dep` result
    fn dependency_report(
        &self,
        ctx: &ReportContext,
        tree: &DependencyTree,
    ) -> Result<String, ReportError>;

    /// Render the `check-pkg` result
    fn package_report(
        &self,
        ctx: &ReportContext,
        report: &PackageReport<'_>,
    ) -> Result<String, ReportError>;

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format.
///
/// `use_color` only affects [`ReportFormat::Text`].
#[must_use]
pub fn create_reporter(format: ReportFormat, use_color: bool) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Text => {
            if use_color {
                Box::new(TextReporter::new())
            } else {
                Box::new(TextReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
        ReportFormat::Html => Box::new(HtmlReporter::new()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_reporter_formats() {
        for format in [
            ReportFormat::Text,
            ReportFormat::Json,
            ReportFormat::Markdown,
            ReportFormat::Html,
        ] {
            assert_eq!(create_reporter(format, false).format(), format);
        }
    }

    #[test]
    fn test_every_renderer_handles_empty_results() {
        let doc = crate::model::Document::new(crate::model::SbomFormat::Spdx, "SPDX-2.3", "");
        let ctx = test_support::context(&doc);
        let (analysis, stats, tree) = test_support::analysis(&doc);
        let verification = test_support::verification(&doc);
        let report = PackageReport {
            query: "missing",
            matches: &[],
            search: false,
            fuzzy_score: None,
            suggestions: &[],
        };

        for format in [
            ReportFormat::Text,
            ReportFormat::Json,
            ReportFormat::Markdown,
            ReportFormat::Html,
        ] {
            let reporter = create_reporter(format, false);
            assert!(reporter.analysis_report(&ctx, &analysis, &stats, &tree).is_ok());
            assert!(reporter.verification_report(&ctx, &verification).is_ok());
            assert!(reporter.dependency_report(&ctx, &tree).is_ok());
            assert!(reporter.package_report(&ctx, &report).is_ok());
        }
    }
}
