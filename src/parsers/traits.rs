//! Parser trait definitions and error types.
//!
//! This module defines the `SbomParser` trait implemented by each
//! format-specific converter, and the error taxonomy shared by detection
//! and conversion.

use crate::model::{Document, SbomFormat};
use thiserror::Error;

/// Errors that can occur during format detection and conversion
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Cannot read {path}: {reason}")]
    FileUnreadable { path: String, reason: String },

    #[error("Could not detect SBOM format of {0}. Expected SPDX, CycloneDX or SWID markers")]
    FormatUndetected(String),

    #[error("Invalid {format} document: {kind}")]
    FormatInvalid {
        format: SbomFormat,
        #[source]
        kind: InvalidKind,
    },
}

/// Why a converter rejected its input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidKind {
    #[error("JSON syntax error: {0}")]
    Json(String),

    #[error("XML syntax error: {0}")]
    Xml(String),

    #[error("missing required field '{0}'")]
    MissingMarker(String),

    #[error("unexpected structure: {0}")]
    Structure(String),
}

impl ParseError {
    /// Create a `FormatInvalid` error
    pub const fn invalid(format: SbomFormat, kind: InvalidKind) -> Self {
        Self::FormatInvalid { format, kind }
    }

    /// Create a `FormatInvalid` error for an absent top-level marker
    pub fn missing_marker(format: SbomFormat, field: &str) -> Self {
        Self::invalid(format, InvalidKind::MissingMarker(field.to_string()))
    }

    /// Create a `FileUnreadable` error
    pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FileUnreadable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The invalid-input kind, for `FormatInvalid` errors
    #[must_use]
    pub const fn invalid_kind(&self) -> Option<&InvalidKind> {
        match self {
            Self::FormatInvalid { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

/// Root element of an XML document, as seen by the format sniffers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlRoot {
    /// Qualified element name as written (e.g. `spdx:SpdxDocument`)
    pub name: String,
    /// Values of `xmlns` / `xmlns:*` attributes on the root element
    pub namespaces: Vec<String>,
}

impl XmlRoot {
    /// Lowercased element name without namespace prefix
    #[must_use]
    pub fn local_name(&self) -> String {
        self.name
            .rsplit(':')
            .next()
            .unwrap_or(&self.name)
            .to_lowercase()
    }

    /// Whether the element name or any namespace contains `needle` (case-insensitive)
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .namespaces
                .iter()
                .any(|ns| ns.to_lowercase().contains(needle))
    }
}

/// Trait for SBOM format converters
///
/// Each converter owns the content markers for its format, so the detector can
/// ask converters in priority order without knowing format internals.
pub trait SbomParser {
    /// The format this parser produces
    fn format(&self) -> SbomFormat;

    /// Convert raw content into a normalized document
    fn parse_str(&self, content: &str) -> Result<Document, ParseError>;

    /// Whether a parsed JSON object carries this format's markers
    fn matches_json(&self, value: &serde_json::Value) -> bool;

    /// Whether an XML root element carries this format's markers
    fn matches_xml(&self, root: &XmlRoot) -> bool;

    /// Whether a lowercased file-name segment (text between dots) names this format
    fn matches_extension(&self, segment: &str) -> bool;
}
