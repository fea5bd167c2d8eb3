//! JSON report generator.

use super::{PackageReport, ReportContext, ReportError, ReportFormat, ReportGenerator};
use crate::model::{
    AnalysisResult, AnalysisSummary, DependencyTree, PackageInfo, PackageStatistics,
    VerificationResult,
};
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize>(&self, ctx: &ReportContext, body: T) -> Result<String, ReportError> {
        let report = JsonReport {
            metadata: JsonReportMetadata {
                tool: ToolInfo {
                    name: env!("CARGO_PKG_NAME"),
                    version: env!("CARGO_PKG_VERSION"),
                },
                generated_at: ctx.generated_at.to_rfc3339(),
                sbom: SbomInfo {
                    file_path: &ctx.source,
                    name: &ctx.document_name,
                    format: ctx.format.name(),
                    version: &ctx.version,
                },
            },
            body,
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn analysis_report(
        &self,
        ctx: &ReportContext,
        analysis: &AnalysisResult,
        statistics: &PackageStatistics,
        tree: &DependencyTree,
    ) -> Result<String, ReportError> {
        self.render(
            ctx,
            AnalysisBody {
                summary: AnalysisSummary::new(analysis, tree),
                analysis,
                statistics,
            },
        )
    }

    fn verification_report(
        &self,
        ctx: &ReportContext,
        result: &VerificationResult,
    ) -> Result<String, ReportError> {
        self.render(ctx, VerificationBody { verification: result })
    }

    fn dependency_report(
        &self,
        ctx: &ReportContext,
        tree: &DependencyTree,
    ) -> Result<String, ReportError> {
        self.render(ctx, DependencyBody { dependencies: tree })
    }

    fn package_report(
        &self,
        ctx: &ReportContext,
        report: &PackageReport<'_>,
    ) -> Result<String, ReportError> {
        let body = PackageBody {
            query: report.query,
            found: !report.matches.is_empty(),
            match_kind: match (report.matches.is_empty(), report.search, report.fuzzy_score) {
                (true, _, _) => None,
                (false, true, _) => Some("search"),
                (false, false, Some(_)) => Some("fuzzy"),
                (false, false, None) => Some("exact"),
            },
            similarity: report.fuzzy_score,
            packages: report.matches,
            available_packages: report.suggestions,
        };
        self.render(ctx, body)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[derive(Serialize)]
struct JsonReport<'a, T> {
    metadata: JsonReportMetadata<'a>,
    #[serde(flatten)]
    body: T,
}

#[derive(Serialize)]
struct JsonReportMetadata<'a> {
    tool: ToolInfo,
    generated_at: String,
    sbom: SbomInfo<'a>,
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct SbomInfo<'a> {
    file_path: &'a str,
    name: &'a str,
    format: &'static str,
    version: &'a str,
}

#[derive(Serialize)]
struct AnalysisBody<'a> {
    summary: AnalysisSummary,
    analysis: &'a AnalysisResult,
    statistics: &'a PackageStatistics,
}

#[derive(Serialize)]
struct VerificationBody<'a> {
    verification: &'a VerificationResult,
}

#[derive(Serialize)]
struct DependencyBody<'a> {
    dependencies: &'a DependencyTree,
}

#[derive(Serialize)]
struct PackageBody<'a> {
    query: &'a str,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    match_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    similarity: Option<f64>,
    packages: &'a [PackageInfo],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    available_packages: &'a [String],
}
