//! Centralized format detection for SBOM parsers.
//!
//! Detection runs in a fixed priority order: file extension, then JSON
//! content markers, then the XML root element. There is no default format;
//! content that matches nothing is rejected with `FormatUndetected`.

use super::traits::{ParseError, SbomParser, XmlRoot};
use super::{CycloneDxParser, SpdxParser, SwidParser};
use crate::model::{Document, SbomFormat};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt;
use std::path::Path;

/// Extensions that name a serialization rather than an SBOM format
const SERIALIZATION_SUFFIXES: &[&str] = &["json", "xml"];

/// How a format was recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    /// The file extension
    Extension,
    /// Top-level keys of a JSON object
    JsonContent,
    /// Name or namespace of the XML root element
    XmlContent,
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extension => write!(f, "file extension"),
            Self::JsonContent => write!(f, "JSON content"),
            Self::XmlContent => write!(f, "XML content"),
        }
    }
}

/// Result of format detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    pub format: SbomFormat,
    pub method: DetectionMethod,
    /// Serialization variant guessed from content ("JSON", "XML", "tag-value")
    pub variant: &'static str,
}

/// Centralized format detector for SBOM content.
pub struct FormatDetector {
    spdx: SpdxParser,
    cyclonedx: CycloneDxParser,
    swid: SwidParser,
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatDetector {
    /// Create a new format detector.
    pub fn new() -> Self {
        Self {
            spdx: SpdxParser::new(),
            cyclonedx: CycloneDxParser::new(),
            swid: SwidParser::new(),
        }
    }

    /// Parsers in detection priority order
    fn parsers(&self) -> [&dyn SbomParser; 3] {
        [&self.spdx, &self.cyclonedx, &self.swid]
    }

    /// Get the parser for a format.
    pub fn parser_for(&self, format: SbomFormat) -> &dyn SbomParser {
        match format {
            SbomFormat::Spdx => &self.spdx,
            SbomFormat::CycloneDx => &self.cyclonedx,
            SbomFormat::Swid => &self.swid,
        }
    }

    /// Classify content as SPDX, CycloneDX or SWID.
    ///
    /// `path` is only used for its file name.
    pub fn detect(&self, path: &Path, content: &str) -> Result<DetectionResult, ParseError> {
        let variant = content_variant(content);

        if let Some(format) = self.detect_from_extension(path) {
            tracing::debug!("Format detection: {} by file extension", format);
            return Ok(DetectionResult {
                format,
                method: DetectionMethod::Extension,
                variant,
            });
        }

        match serde_json::from_str::<serde_json::Value>(content) {
            Ok(value) => {
                if value.is_object() {
                    if let Some(parser) = self.parsers().into_iter().find(|p| p.matches_json(&value))
                    {
                        tracing::debug!("Format detection: {} by JSON markers", parser.format());
                        return Ok(DetectionResult {
                            format: parser.format(),
                            method: DetectionMethod::JsonContent,
                            variant: "JSON",
                        });
                    }
                }
                tracing::debug!("Format detection: valid JSON without SBOM markers");
            }
            Err(_) => {
                if let Some(root) = read_xml_root(content) {
                    if let Some(parser) = self.parsers().into_iter().find(|p| p.matches_xml(&root))
                    {
                        tracing::debug!(
                            "Format detection: {} by XML root <{}>",
                            parser.format(),
                            root.name
                        );
                        return Ok(DetectionResult {
                            format: parser.format(),
                            method: DetectionMethod::XmlContent,
                            variant: "XML",
                        });
                    }
                    tracing::debug!("Format detection: unrecognized XML root <{}>", root.name);
                }
            }
        }

        Err(ParseError::FormatUndetected(display_name(path)))
    }

    /// Match the final extension against each parser, then the one before
    /// it when the final one is a serialization suffix (`.cdx.json`).
    pub fn detect_from_extension(&self, path: &Path) -> Option<SbomFormat> {
        let file_name = path.file_name()?.to_string_lossy().to_lowercase();
        let mut segments: Vec<&str> = file_name.split('.').skip(1).collect();
        let last = segments.pop()?;

        let mut candidates = vec![last];
        if SERIALIZATION_SUFFIXES.contains(&last) {
            candidates.extend(segments.last());
        }
        candidates.into_iter().find_map(|segment| {
            self.parsers()
                .into_iter()
                .find(|p| p.matches_extension(segment))
                .map(|p| p.format())
        })
    }

    /// Detect and convert in a single operation.
    pub fn parse(&self, path: &Path, content: &str) -> Result<Document, ParseError> {
        let detection = self.detect(path, content)?;
        self.parser_for(detection.format).parse_str(content)
    }
}

/// Guess the serialization from the first non-whitespace character.
fn content_variant(content: &str) -> &'static str {
    match content.trim_start().chars().next() {
        Some('{' | '[') => "JSON",
        Some('<') => "XML",
        _ => "tag-value",
    }
}

fn display_name(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        "<input>".to_string()
    } else {
        path.display().to_string()
    }
}

/// Read the root element of an XML document.
///
/// Returns `None` when the content is not well-formed up to its first element.
pub fn read_xml_root(content: &str) -> Option<XmlRoot> {
    let mut reader = Reader::from_str(content);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let namespaces = e
                    .attributes()
                    .flatten()
                    .filter(|attr| {
                        let key = attr.key.as_ref();
                        key == b"xmlns" || key.starts_with(b"xmlns:")
                    })
                    .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
                    .collect();
                return Some(XmlRoot { name, namespaces });
            }
            Ok(Event::Text(text)) => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return None;
                }
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}
