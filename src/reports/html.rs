//! HTML report generator.

use super::escape::{escape_html, escape_html_opt};
use super::{PackageReport, ReportContext, ReportError, ReportFormat, ReportGenerator};
use crate::model::{
    AnalysisResult, AnalysisSummary, DependencyTree, PackageInfo, PackageStatistics,
    VerificationResult, SEVERITY_BUCKETS,
};
use std::fmt::Write;

/// HTML report generator
pub struct HtmlReporter {
    /// Include inline CSS
    include_styles: bool,
}

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            include_styles: true,
        }
    }

    /// Leave out the inline stylesheet
    #[must_use]
    pub const fn without_styles(mut self) -> Self {
        self.include_styles = false;
        self
    }

    const fn get_styles(&self) -> &'static str {
        r#"
        <style>
            :root {
                --bg-color: #1e1e2e;
                --text-color: #cdd6f4;
                --accent-color: #89b4fa;
                --success-color: #a6e3a1;
                --warning-color: #f9e2af;
                --error-color: #f38ba8;
                --border-color: #45475a;
                --card-bg: #313244;
            }

            body {
                font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
                background-color: var(--bg-color);
                color: var(--text-color);
                margin: 0;
                padding: 20px;
                line-height: 1.6;
            }

            .container { max-width: 1200px; margin: 0 auto; }
            h1, h2, h3 { color: var(--accent-color); }

            .header {
                border-bottom: 2px solid var(--border-color);
                padding-bottom: 20px;
                margin-bottom: 30px;
            }

            .summary-cards {
                display: grid;
                grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
                gap: 20px;
                margin-bottom: 30px;
            }

            .card {
                background-color: var(--card-bg);
                border-radius: 8px;
                padding: 20px;
                border: 1px solid var(--border-color);
            }

            .card-title { font-size: 0.9em; color: #a6adc8; margin-bottom: 10px; }
            .card-value { font-size: 2em; font-weight: bold; }
            .card-value.good { color: var(--success-color); }
            .card-value.fair { color: var(--warning-color); }
            .card-value.poor { color: var(--error-color); }

            table {
                width: 100%;
                border-collapse: collapse;
                margin-bottom: 30px;
                background-color: var(--card-bg);
                border-radius: 8px;
                overflow: hidden;
            }

            th, td {
                padding: 12px 15px;
                text-align: left;
                border-bottom: 1px solid var(--border-color);
            }

            th { background-color: #45475a; font-weight: 600; }
            tr:hover { background-color: #3b3d4d; }

            .badge {
                display: inline-block;
                padding: 2px 8px;
                border-radius: 4px;
                font-size: 0.85em;
                font-weight: 500;
            }

            .badge-valid { background-color: rgba(166, 227, 161, 0.2); color: var(--success-color); }
            .badge-invalid { background-color: rgba(243, 139, 168, 0.2); color: var(--error-color); }
            .badge-critical { background-color: rgba(243, 139, 168, 0.3); color: var(--error-color); }
            .badge-high { background-color: rgba(250, 179, 135, 0.3); color: #fab387; }
            .badge-medium { background-color: rgba(249, 226, 175, 0.3); color: var(--warning-color); }
            .badge-low { background-color: rgba(148, 226, 213, 0.3); color: #94e2d5; }
            .badge-unknown { background-color: rgba(110, 118, 129, 0.3); color: #6e7681; }

            .section { margin-bottom: 40px; }
            ul.issues li { color: var(--error-color); }
            ul.warnings li { color: var(--warning-color); }
            code { color: var(--accent-color); }

            .footer {
                margin-top: 40px;
                padding-top: 20px;
                border-top: 1px solid var(--border-color);
                font-size: 0.9em;
                color: #a6adc8;
            }
        </style>
        "#
    }

    fn open(&self, html: &mut String, title: &str, ctx: &ReportContext) -> std::fmt::Result {
        writeln!(html, "<!DOCTYPE html>")?;
        writeln!(html, "<html lang=\"en\">")?;
        writeln!(html, "<head>")?;
        writeln!(html, "    <meta charset=\"UTF-8\">")?;
        writeln!(
            html,
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(
            html,
            "    <title>{title}: {}</title>",
            escape_html(&ctx.document_name)
        )?;
        if self.include_styles {
            writeln!(html, "{}", self.get_styles())?;
        }
        writeln!(html, "</head>")?;
        writeln!(html, "<body>")?;
        writeln!(html, "<div class=\"container\">")?;
        writeln!(html, "    <div class=\"header\">")?;
        writeln!(html, "        <h1>{title}</h1>")?;
        writeln!(
            html,
            "        <p>Document: <strong>{}</strong> ({})</p>",
            escape_html(&ctx.document_name),
            escape_html(&ctx.format_label())
        )?;
        writeln!(
            html,
            "        <p>File: <code>{}</code></p>",
            escape_html(&ctx.source)
        )?;
        writeln!(html, "    </div>")
    }

    fn close(html: &mut String, ctx: &ReportContext) -> std::fmt::Result {
        writeln!(html, "    <div class=\"footer\">")?;
        writeln!(
            html,
            "        <p>Generated by {} v{} on {}</p>",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(html, "    </div>")?;
        writeln!(html, "</div>")?;
        writeln!(html, "</body>")?;
        writeln!(html, "</html>")
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn card(html: &mut String, title: &str, value: &str, class: &str) -> std::fmt::Result {
    writeln!(html, "        <div class=\"card\">")?;
    writeln!(html, "            <div class=\"card-title\">{title}</div>")?;
    writeln!(
        html,
        "            <div class=\"card-value {class}\">{value}</div>"
    )?;
    writeln!(html, "        </div>")
}

fn list(html: &mut String, class: &str, items: &[String]) -> std::fmt::Result {
    writeln!(html, "        <ul class=\"{class}\">")?;
    for item in items {
        writeln!(html, "            <li>{}</li>", escape_html(item))?;
    }
    writeln!(html, "        </ul>")
}

fn package_section(html: &mut String, info: &PackageInfo) -> std::fmt::Result {
    writeln!(html, "    <div class=\"section\">")?;
    writeln!(html, "        <h2>{}</h2>", escape_html(&info.name))?;
    writeln!(html, "        <table>")?;
    let fields = [
        ("Version", info.version.as_deref()),
        ("License", info.license.as_deref()),
        ("Supplier", info.supplier.as_deref()),
        ("Homepage", info.homepage.as_deref()),
        ("PURL", info.purl.as_deref()),
        ("Description", info.description.as_deref()),
    ];
    for (label, value) in fields {
        writeln!(
            html,
            "            <tr><th>{label}</th><td>{}</td></tr>",
            escape_html_opt(value)
        )?;
    }
    writeln!(html, "        </table>")?;
    if !info.dependencies.is_empty() {
        writeln!(html, "        <h3>Dependencies ({})</h3>", info.dependencies.len())?;
        list(html, "dependencies", &info.dependencies)?;
    }
    if !info.vulnerabilities.is_empty() {
        writeln!(
            html,
            "        <h3>Vulnerabilities ({})</h3>",
            info.vulnerabilities.len()
        )?;
        list(html, "issues", &info.vulnerabilities)?;
    }
    writeln!(html, "    </div>")
}

impl ReportGenerator for HtmlReporter {
    fn analysis_report(
        &self,
        ctx: &ReportContext,
        analysis: &AnalysisResult,
        statistics: &PackageStatistics,
        tree: &DependencyTree,
    ) -> Result<String, ReportError> {
        let summary = AnalysisSummary::new(analysis, tree);
        let mut html = String::new();
        self.open(&mut html, "SBOM Analysis Report", ctx)?;

        let score_class = match summary.completeness_score {
            s if s >= 80.0 => "good",
            s if s >= 50.0 => "fair",
            _ => "poor",
        };
        writeln!(html, "    <div class=\"summary-cards\">")?;
        card(&mut html, "Packages", &summary.total_packages.to_string(), "")?;
        card(
            &mut html,
            "Completeness",
            &format!("{:.1}%", summary.completeness_score),
            score_class,
        )?;
        card(&mut html, "Unique Licenses", &summary.unique_licenses.to_string(), "")?;
        card(&mut html, "Max Depth", &summary.max_depth.to_string(), "")?;
        card(
            &mut html,
            "Vulnerabilities",
            &summary.vulnerability_count.to_string(),
            if summary.vulnerability_count > 0 { "poor" } else { "good" },
        )?;
        writeln!(html, "    </div>")?;

        writeln!(html, "    <div class=\"section\">")?;
        writeln!(html, "        <h2>Field Coverage</h2>")?;
        writeln!(html, "        <table>")?;
        writeln!(html, "            <tr><th>Field</th><th>Coverage</th></tr>")?;
        for (field, pct) in &statistics.coverage {
            writeln!(
                html,
                "            <tr><td>{}</td><td>{pct:.1}%</td></tr>",
                escape_html(field)
            )?;
        }
        writeln!(html, "        </table>")?;
        writeln!(html, "    </div>")?;

        if !analysis.license_distribution.is_empty() {
            writeln!(html, "    <div class=\"section\">")?;
            writeln!(html, "        <h2>Licenses</h2>")?;
            writeln!(html, "        <table>")?;
            writeln!(html, "            <tr><th>License</th><th>Packages</th></tr>")?;
            let mut licenses: Vec<_> = analysis.license_distribution.iter().collect();
            licenses.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (license, count) in licenses {
                writeln!(
                    html,
                    "            <tr><td>{}</td><td>{count}</td></tr>",
                    escape_html(license)
                )?;
            }
            writeln!(html, "        </table>")?;
            writeln!(html, "    </div>")?;
        }

        if !analysis.vulnerability_summary.is_empty() {
            writeln!(html, "    <div class=\"section\">")?;
            writeln!(html, "        <h2>Vulnerabilities</h2>")?;
            writeln!(html, "        <table>")?;
            writeln!(html, "            <tr><th>Severity</th><th>Count</th></tr>")?;
            for severity in SEVERITY_BUCKETS.iter().copied().chain(["unknown"]) {
                if let Some(count) = analysis.vulnerability_summary.get(severity) {
                    writeln!(
                        html,
                        "            <tr><td><span class=\"badge badge-{severity}\">{severity}</span></td><td>{count}</td></tr>"
                    )?;
                }
            }
            writeln!(html, "        </table>")?;
            writeln!(html, "    </div>")?;
        }

        if !analysis.recommendations.is_empty() {
            writeln!(html, "    <div class=\"section\">")?;
            writeln!(html, "        <h2>Recommendations</h2>")?;
            list(&mut html, "recommendations", &analysis.recommendations)?;
            writeln!(html, "    </div>")?;
        }

        Self::close(&mut html, ctx)?;
        Ok(html)
    }

    fn verification_report(
        &self,
        ctx: &ReportContext,
        result: &VerificationResult,
    ) -> Result<String, ReportError> {
        let mut html = String::new();
        self.open(&mut html, "SBOM Verification Report", ctx)?;

        writeln!(html, "    <div class=\"section\">")?;
        if result.is_valid {
            writeln!(html, "        <p><span class=\"badge badge-valid\">VALID</span></p>")?;
        } else {
            writeln!(
                html,
                "        <p><span class=\"badge badge-invalid\">INVALID</span> {} issue(s)</p>",
                result.issues.len()
            )?;
        }
        writeln!(html, "    </div>")?;

        if !result.issues.is_empty() {
            writeln!(html, "    <div class=\"section\">")?;
            writeln!(html, "        <h2>Issues</h2>")?;
            list(&mut html, "issues", &result.issues)?;
            writeln!(html, "    </div>")?;
        }
        if !result.warnings.is_empty() {
            writeln!(html, "    <div class=\"section\">")?;
            writeln!(html, "        <h2>Warnings</h2>")?;
            list(&mut html, "warnings", &result.warnings)?;
            writeln!(html, "    </div>")?;
        }

        Self::close(&mut html, ctx)?;
        Ok(html)
    }

    fn dependency_report(
        &self,
        ctx: &ReportContext,
        tree: &DependencyTree,
    ) -> Result<String, ReportError> {
        let mut html = String::new();
        self.open(&mut html, "Dependency Report", ctx)?;

        writeln!(html, "    <div class=\"summary-cards\">")?;
        card(&mut html, "Packages", &tree.dependency_graph.len().to_string(), "")?;
        card(&mut html, "Dependencies", &tree.total_dependencies.to_string(), "")?;
        card(&mut html, "Max Depth", &tree.max_depth.to_string(), "")?;
        card(
            &mut html,
            "Cycles",
            &tree.cycles.len().to_string(),
            if tree.has_cycles() { "fair" } else { "good" },
        )?;
        writeln!(html, "    </div>")?;

        if !tree.dependency_graph.is_empty() {
            writeln!(html, "    <div class=\"section\">")?;
            writeln!(html, "        <h2>Packages</h2>")?;
            writeln!(html, "        <table>")?;
            writeln!(
                html,
                "            <tr><th>Package</th><th>Depth</th><th>Dependencies</th></tr>"
            )?;
            for (name, deps) in &tree.dependency_graph {
                let depth = tree.depth_map.get(name).copied().unwrap_or(0);
                let deps = if deps.is_empty() {
                    "-".to_string()
                } else {
                    deps.iter()
                        .map(|d| escape_html(d))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                writeln!(
                    html,
                    "            <tr><td>{}</td><td>{depth}</td><td>{deps}</td></tr>",
                    escape_html(name)
                )?;
            }
            writeln!(html, "        </table>")?;
            writeln!(html, "    </div>")?;
        }

        if tree.has_cycles() {
            writeln!(html, "    <div class=\"section\">")?;
            writeln!(html, "        <h2>Cycles</h2>")?;
            let cycles: Vec<String> = tree.cycles.iter().map(|c| c.join(" → ")).collect();
            list(&mut html, "warnings", &cycles)?;
            writeln!(html, "    </div>")?;
        }

        Self::close(&mut html, ctx)?;
        Ok(html)
    }

    fn package_report(
        &self,
        ctx: &ReportContext,
        report: &PackageReport<'_>,
    ) -> Result<String, ReportError> {
        let mut html = String::new();
        self.open(&mut html, "Package Lookup", ctx)?;

        if report.matches.is_empty() {
            writeln!(html, "    <div class=\"section\">")?;
            writeln!(
                html,
                "        <p><span class=\"badge badge-invalid\">NOT FOUND</span> No package matching <code>{}</code></p>",
                escape_html(report.query)
            )?;
            if !report.suggestions.is_empty() {
                writeln!(html, "        <h2>Available Packages</h2>")?;
                list(&mut html, "suggestions", report.suggestions)?;
            }
            writeln!(html, "    </div>")?;
        } else {
            if report.search {
                writeln!(
                    html,
                    "    <p>{} match(es) for <code>{}</code></p>",
                    report.matches.len(),
                    escape_html(report.query)
                )?;
            } else if let Some(score) = report.fuzzy_score {
                writeln!(
                    html,
                    "    <p>Closest match for <code>{}</code> (similarity {score:.2})</p>",
                    escape_html(report.query)
                )?;
            }
            for info in report.matches {
                package_section(&mut html, info)?;
            }
        }

        Self::close(&mut html, ctx)?;
        Ok(html)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Html
    }
}
