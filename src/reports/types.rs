//! Report type definitions.

use crate::model::{Document, SbomFormat};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Plain terminal text (colored on a TTY)
    #[default]
    Text,
    /// Structured JSON output
    Json,
    /// Human-readable Markdown
    #[value(alias = "md")]
    Markdown,
    /// Standalone HTML page
    Html,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Markdown => write!(f, "markdown"),
            Self::Html => write!(f, "html"),
        }
    }
}

/// Where a report's data came from
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    /// Input file as given on the command line
    pub source: String,
    pub document_name: String,
    pub format: SbomFormat,
    pub version: String,
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    /// Describe a document read from `path`
    #[must_use]
    pub fn new(path: &Path, document: &Document) -> Self {
        Self {
            source: path.display().to_string(),
            document_name: document.name.clone(),
            format: document.format,
            version: document.version.clone(),
            generated_at: Utc::now(),
        }
    }

    /// `"SPDX SPDX-2.3"`, `"CycloneDX 1.5"`
    #[must_use]
    pub fn format_label(&self) -> String {
        format!("{} {}", self.format, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_display_and_serde() {
        assert_eq!(ReportFormat::Markdown.to_string(), "markdown");
        assert_eq!(
            serde_json::to_string(&ReportFormat::Html).unwrap(),
            "\"html\""
        );
        assert_eq!(ReportFormat::default(), ReportFormat::Text);
    }

    #[test]
    fn test_context_label() {
        let doc = Document::new(SbomFormat::CycloneDx, "1.5", "demo");
        let ctx = ReportContext::new(Path::new("bom.json"), &doc);
        assert_eq!(ctx.source, "bom.json");
        assert_eq!(ctx.format_label(), "CycloneDX 1.5");
    }
}
