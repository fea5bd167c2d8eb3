//! Markdown report generator.

use super::escape::{escape_markdown_inline, escape_markdown_table, escape_md_opt};
use super::{PackageReport, ReportContext, ReportError, ReportFormat, ReportGenerator};
use crate::model::{
    AnalysisResult, AnalysisSummary, DependencyTree, PackageInfo, PackageStatistics,
    VerificationResult, SEVERITY_BUCKETS,
};
use std::fmt::Write;

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(md: &mut String, title: &str, ctx: &ReportContext) -> std::fmt::Result {
    writeln!(md, "# {title}")?;
    writeln!(md)?;
    writeln!(md, "**File:** `{}`  ", ctx.source.replace('`', "'"))?;
    writeln!(md, "**Document:** {}  ", escape_markdown_inline(&ctx.document_name))?;
    writeln!(md, "**Format:** {}  ", escape_markdown_inline(&ctx.format_label()))?;
    writeln!(
        md,
        "**Generated:** {}",
        ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(md)
}

fn bullet_list(md: &mut String, items: &[String]) -> std::fmt::Result {
    for item in items {
        writeln!(md, "- {}", escape_markdown_inline(item))?;
    }
    writeln!(md)
}

fn package_table(md: &mut String, info: &PackageInfo) -> std::fmt::Result {
    writeln!(md, "## {}", escape_markdown_inline(&info.name))?;
    writeln!(md)?;
    writeln!(md, "| Field | Value |")?;
    writeln!(md, "|-------|-------|")?;
    let fields = [
        ("Version", info.version.as_deref()),
        ("License", info.license.as_deref()),
        ("Supplier", info.supplier.as_deref()),
        ("Homepage", info.homepage.as_deref()),
        ("PURL", info.purl.as_deref()),
        ("Description", info.description.as_deref()),
    ];
    for (label, value) in fields {
        writeln!(md, "| {label} | {} |", escape_md_opt(value))?;
    }
    writeln!(md)?;

    if !info.dependencies.is_empty() {
        writeln!(md, "**Dependencies ({}):**", info.dependencies.len())?;
        writeln!(md)?;
        bullet_list(md, &info.dependencies)?;
    }
    if !info.vulnerabilities.is_empty() {
        writeln!(md, "**Vulnerabilities ({}):**", info.vulnerabilities.len())?;
        writeln!(md)?;
        bullet_list(md, &info.vulnerabilities)?;
    }
    Ok(())
}

impl ReportGenerator for MarkdownReporter {
    fn analysis_report(
        &self,
        ctx: &ReportContext,
        analysis: &AnalysisResult,
        statistics: &PackageStatistics,
        tree: &DependencyTree,
    ) -> Result<String, ReportError> {
        let summary = AnalysisSummary::new(analysis, tree);
        let mut md = String::new();
        header(&mut md, "SBOM Analysis Report", ctx)?;

        writeln!(md, "## Summary")?;
        writeln!(md)?;
        writeln!(md, "| Metric | Value |")?;
        writeln!(md, "|--------|-------|")?;
        writeln!(md, "| Packages | {} |", summary.total_packages)?;
        writeln!(md, "| Completeness | {:.1}% |", summary.completeness_score)?;
        writeln!(md, "| Unique licenses | {} |", summary.unique_licenses)?;
        writeln!(md, "| Dependencies | {} |", summary.total_dependencies)?;
        writeln!(md, "| Max depth | {} |", summary.max_depth)?;
        writeln!(md, "| Cycles | {} |", summary.cycle_count)?;
        writeln!(md, "| Vulnerabilities | {} |", summary.vulnerability_count)?;
        writeln!(md)?;

        writeln!(md, "## Field Coverage")?;
        writeln!(md)?;
        writeln!(md, "| Field | Coverage |")?;
        writeln!(md, "|-------|----------|")?;
        for (field, pct) in &statistics.coverage {
            writeln!(md, "| {field} | {pct:.1}% |")?;
        }
        writeln!(md)?;

        if !analysis.license_distribution.is_empty() {
            writeln!(md, "## Licenses")?;
            writeln!(md)?;
            writeln!(md, "| License | Packages |")?;
            writeln!(md, "|---------|----------|")?;
            let mut licenses: Vec<_> = analysis.license_distribution.iter().collect();
            licenses.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (license, count) in licenses {
                writeln!(md, "| {} | {count} |", escape_markdown_table(license))?;
            }
            writeln!(md)?;
        }

        if !analysis.vulnerability_summary.is_empty() {
            writeln!(md, "## Vulnerabilities")?;
            writeln!(md)?;
            writeln!(md, "| Severity | Count |")?;
            writeln!(md, "|----------|-------|")?;
            for severity in SEVERITY_BUCKETS.iter().copied().chain(["unknown"]) {
                if let Some(count) = analysis.vulnerability_summary.get(severity) {
                    writeln!(md, "| {severity} | {count} |")?;
                }
            }
            writeln!(md)?;
        }

        if !analysis.recommendations.is_empty() {
            writeln!(md, "## Recommendations")?;
            writeln!(md)?;
            bullet_list(&mut md, &analysis.recommendations)?;
        }
        Ok(md)
    }

    fn verification_report(
        &self,
        ctx: &ReportContext,
        result: &VerificationResult,
    ) -> Result<String, ReportError> {
        let mut md = String::new();
        header(&mut md, "SBOM Verification Report", ctx)?;

        if result.is_valid {
            writeln!(md, "**Status:** ✅ Valid")?;
        } else {
            writeln!(md, "**Status:** ❌ Invalid ({} issues)", result.issues.len())?;
        }
        writeln!(md)?;

        if !result.issues.is_empty() {
            writeln!(md, "## Issues")?;
            writeln!(md)?;
            bullet_list(&mut md, &result.issues)?;
        }
        if !result.warnings.is_empty() {
            writeln!(md, "## Warnings")?;
            writeln!(md)?;
            bullet_list(&mut md, &result.warnings)?;
        }
        Ok(md)
    }

    fn dependency_report(
        &self,
        ctx: &ReportContext,
        tree: &DependencyTree,
    ) -> Result<String, ReportError> {
        let mut md = String::new();
        header(&mut md, "Dependency Report", ctx)?;

        writeln!(
            md,
            "{} packages, {} dependencies, max depth {}.",
            tree.dependency_graph.len(),
            tree.total_dependencies,
            tree.max_depth
        )?;
        writeln!(md)?;

        if !tree.dependency_graph.is_empty() {
            writeln!(md, "| Package | Depth | Dependencies |")?;
            writeln!(md, "|---------|-------|--------------|")?;
            for (name, deps) in &tree.dependency_graph {
                let depth = tree.depth_map.get(name).copied().unwrap_or(0);
                let deps = if deps.is_empty() {
                    "-".to_string()
                } else {
                    deps.iter()
                        .map(|d| escape_markdown_table(d))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                writeln!(md, "| {} | {depth} | {deps} |", escape_markdown_table(name))?;
            }
            writeln!(md)?;
        }

        if !tree.root_packages.is_empty() {
            writeln!(md, "## Leaf Packages")?;
            writeln!(md)?;
            bullet_list(&mut md, &tree.root_packages)?;
        }

        if tree.has_cycles() {
            writeln!(md, "## Cycles")?;
            writeln!(md)?;
            for cycle in &tree.cycles {
                let path: Vec<String> = cycle.iter().map(|n| escape_markdown_inline(n)).collect();
                writeln!(md, "- {}", path.join(" → "))?;
            }
            writeln!(md)?;
        }
        Ok(md)
    }

    fn package_report(
        &self,
        ctx: &ReportContext,
        report: &PackageReport<'_>,
    ) -> Result<String, ReportError> {
        let mut md = String::new();
        header(&mut md, "Package Lookup", ctx)?;

        if report.matches.is_empty() {
            writeln!(
                md,
                "No package matching **{}**.",
                escape_markdown_inline(report.query)
            )?;
            writeln!(md)?;
            if !report.suggestions.is_empty() {
                writeln!(md, "## Available Packages")?;
                writeln!(md)?;
                bullet_list(&mut md, report.suggestions)?;
            }
            return Ok(md);
        }

        if report.search {
            writeln!(
                md,
                "{} match(es) for **{}**.",
                report.matches.len(),
                escape_markdown_inline(report.query)
            )?;
            writeln!(md)?;
        } else if let Some(score) = report.fuzzy_score {
            writeln!(
                md,
                "> Closest match for **{}** (similarity {score:.2})",
                escape_markdown_inline(report.query)
            )?;
            writeln!(md)?;
        }

        for info in report.matches {
            package_table(&mut md, info)?;
        }
        Ok(md)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Markdown
    }
}
