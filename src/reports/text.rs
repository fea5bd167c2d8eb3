//! Plain text report generator for terminal output.

use super::{PackageReport, ReportContext, ReportError, ReportFormat, ReportGenerator};
use crate::model::{
    AnalysisResult, AnalysisSummary, DependencyTree, PackageInfo, PackageStatistics,
    VerificationResult, SEVERITY_BUCKETS,
};
use std::fmt::Write;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

fn severity_color(severity: &str) -> &'static str {
    match severity {
        "critical" | "high" => "red",
        "medium" => "yellow",
        "low" => "cyan",
        _ => "dim",
    }
}

/// Text reporter for terminal output
pub struct TextReporter {
    colored: bool,
}

impl TextReporter {
    /// Create a new text reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn header(&self, out: &mut String, title: &str, ctx: &ReportContext) -> std::fmt::Result {
        writeln!(out, "{}", self.color(title, "bold"))?;
        writeln!(out, "{}", self.color("─".repeat(50).as_str(), "dim"))?;
        writeln!(out, "{}  {}", self.color("File:", "cyan"), ctx.source)?;
        writeln!(out, "{}  {}", self.color("Document:", "cyan"), ctx.document_name)?;
        writeln!(out, "{}  {}", self.color("Format:", "cyan"), ctx.format_label())?;
        writeln!(out)
    }

    fn package_block(&self, out: &mut String, info: &PackageInfo) -> std::fmt::Result {
        writeln!(out, "{}", self.color(&info.name, "bold"))?;
        let fields = [
            ("Version", info.version.as_deref()),
            ("License", info.license.as_deref()),
            ("Supplier", info.supplier.as_deref()),
            ("Homepage", info.homepage.as_deref()),
            ("PURL", info.purl.as_deref()),
            ("Description", info.description.as_deref()),
        ];
        for (label, value) in fields {
            writeln!(out, "  {:<12} {}", format!("{label}:"), value.unwrap_or("-"))?;
        }
        if info.dependencies.is_empty() {
            writeln!(out, "  {:<12} none", "Dependencies:")?;
        } else {
            writeln!(out, "  Dependencies ({}):", info.dependencies.len())?;
            for dep in &info.dependencies {
                writeln!(out, "    - {dep}")?;
            }
        }
        if !info.vulnerabilities.is_empty() {
            writeln!(
                out,
                "  {}",
                self.color(&format!("Vulnerabilities ({}):", info.vulnerabilities.len()), "red")
            )?;
            for vuln in &info.vulnerabilities {
                writeln!(out, "    - {vuln}")?;
            }
        }
        Ok(())
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TextReporter {
    fn analysis_report(
        &self,
        ctx: &ReportContext,
        analysis: &AnalysisResult,
        statistics: &PackageStatistics,
        tree: &DependencyTree,
    ) -> Result<String, ReportError> {
        let summary = AnalysisSummary::new(analysis, tree);
        let mut out = String::new();
        self.header(&mut out, "SBOM Analysis", ctx)?;

        let score_color = match summary.completeness_score {
            s if s >= 80.0 => "green",
            s if s >= 50.0 => "yellow",
            _ => "red",
        };
        writeln!(out, "{}", self.color("Overview:", "bold"))?;
        writeln!(out, "  Packages:          {}", summary.total_packages)?;
        writeln!(
            out,
            "  Completeness:      {}",
            self.color(&format!("{:.1}%", summary.completeness_score), score_color)
        )?;
        writeln!(out, "  Unique licenses:   {}", summary.unique_licenses)?;
        writeln!(out, "  Dependencies:      {}", summary.total_dependencies)?;
        writeln!(out, "  Max depth:         {}", summary.max_depth)?;
        writeln!(out, "  Cycles:            {}", summary.cycle_count)?;
        writeln!(out)?;

        writeln!(out, "{}", self.color("Field coverage:", "bold"))?;
        for (field, pct) in &statistics.coverage {
            writeln!(out, "  {field:<16} {pct:>5.1}%")?;
        }
        writeln!(out)?;

        if !analysis.license_distribution.is_empty() {
            writeln!(out, "{}", self.color("Licenses:", "bold"))?;
            let mut licenses: Vec<_> = analysis.license_distribution.iter().collect();
            licenses.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (license, count) in licenses {
                writeln!(out, "  {count:>4}  {license}")?;
            }
            writeln!(out)?;
        }

        writeln!(out, "{}", self.color("Vulnerabilities:", "bold"))?;
        if analysis.vulnerability_summary.is_empty() {
            writeln!(out, "  {}", self.color("None recorded", "dim"))?;
        } else {
            let order = SEVERITY_BUCKETS.iter().copied().chain(["unknown"]);
            for severity in order {
                if let Some(count) = analysis.vulnerability_summary.get(severity) {
                    writeln!(
                        out,
                        "  {}",
                        self.color(&format!("{severity:<9} {count}"), severity_color(severity))
                    )?;
                }
            }
        }

        if !analysis.recommendations.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", self.color("Recommendations:", "bold"))?;
            for rec in &analysis.recommendations {
                writeln!(out, "  • {rec}")?;
            }
        }
        Ok(out)
    }

    fn verification_report(
        &self,
        ctx: &ReportContext,
        result: &VerificationResult,
    ) -> Result<String, ReportError> {
        let mut out = String::new();
        self.header(&mut out, "SBOM Verification", ctx)?;

        if result.is_valid {
            writeln!(out, "{}", self.color("✓ Valid", "green"))?;
        } else {
            writeln!(
                out,
                "{}",
                self.color(&format!("✗ Invalid ({} issues)", result.issues.len()), "red")
            )?;
        }

        if !result.issues.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", self.color("Issues:", "bold"))?;
            for issue in &result.issues {
                writeln!(out, "  {} {issue}", self.color("✗", "red"))?;
            }
        }
        if !result.warnings.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", self.color("Warnings:", "bold"))?;
            for warning in &result.warnings {
                writeln!(out, "  {} {warning}", self.color("!", "yellow"))?;
            }
        }
        Ok(out)
    }

    fn dependency_report(
        &self,
        ctx: &ReportContext,
        tree: &DependencyTree,
    ) -> Result<String, ReportError> {
        let mut out = String::new();
        self.header(&mut out, "Dependency Tree", ctx)?;

        writeln!(out, "  Packages:      {}", tree.dependency_graph.len())?;
        writeln!(out, "  Dependencies:  {}", tree.total_dependencies)?;
        writeln!(out, "  Max depth:     {}", tree.max_depth)?;
        writeln!(out, "  Leaf packages: {}", tree.root_packages.len())?;
        writeln!(out)?;

        for (name, deps) in &tree.dependency_graph {
            let depth = tree.depth_map.get(name).copied().unwrap_or(0);
            writeln!(
                out,
                "{} {}",
                self.color(name, "bold"),
                self.color(&format!("(depth {depth})"), "dim")
            )?;
            for (i, dep) in deps.iter().enumerate() {
                let branch = if i + 1 == deps.len() { "└──" } else { "├──" };
                writeln!(out, "  {branch} {dep}")?;
            }
        }

        if tree.has_cycles() {
            writeln!(out)?;
            writeln!(
                out,
                "{}",
                self.color(&format!("Cycles ({}):", tree.cycles.len()), "yellow")
            )?;
            for cycle in &tree.cycles {
                writeln!(out, "  {}", cycle.join(" → "))?;
            }
        }
        Ok(out)
    }

    fn package_report(
        &self,
        ctx: &ReportContext,
        report: &PackageReport<'_>,
    ) -> Result<String, ReportError> {
        let mut out = String::new();
        self.header(&mut out, "Package Lookup", ctx)?;

        if report.matches.is_empty() {
            writeln!(
                out,
                "{}",
                self.color(&format!("No package matching '{}'", report.query), "red")
            )?;
            if !report.suggestions.is_empty() {
                writeln!(out)?;
                writeln!(out, "Available packages:")?;
                for name in report.suggestions {
                    writeln!(out, "  - {name}")?;
                }
            }
            return Ok(out);
        }

        if report.search {
            writeln!(out, "{} match(es) for '{}':", report.matches.len(), report.query)?;
            writeln!(out)?;
        } else if let Some(score) = report.fuzzy_score {
            writeln!(
                out,
                "{}",
                self.color(
                    &format!("Closest match for '{}' (similarity {score:.2})", report.query),
                    "yellow"
                )
            )?;
            writeln!(out)?;
        }

        for (i, info) in report.matches.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            self.package_block(&mut out, info)?;
        }
        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }
}
