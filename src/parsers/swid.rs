//! SWID tag parser.
//!
//! A SWID tag (ISO/IEC 19770-2) describes a single software identity, so the
//! resulting document always holds exactly one package with no licenses,
//! dependencies or vulnerabilities. XML is tried first, then JSON.

use super::detection::read_xml_root;
use super::traits::{InvalidKind, ParseError, SbomParser, XmlRoot};
use super::{timestamp_or_now, PackageCollector, UNKNOWN_NAME};
use crate::model::{Document, MetadataValue, Package, RawRecord, SbomFormat};
use serde::Deserialize;

const SWID_VERSION: &str = "1.0";
const DEFAULT_CREATOR: &str = "SWID Generator";

/// Parser for SWID tags
pub struct SwidParser;

impl SwidParser {
    /// Create a new SWID parser
    pub const fn new() -> Self {
        Self
    }

    /// Parse a `<SoftwareIdentity>` XML tag
    fn parse_xml(&self, content: &str) -> Result<Document, ParseError> {
        let root = read_xml_root(content).ok_or_else(|| {
            ParseError::invalid(
                SbomFormat::Swid,
                InvalidKind::Xml("not a well-formed XML document".to_string()),
            )
        })?;
        if !self.matches_xml(&root) {
            return Err(ParseError::missing_marker(SbomFormat::Swid, "SoftwareIdentity"));
        }

        let tag: SwidTagXml = quick_xml::de::from_str(content)
            .map_err(|e| ParseError::invalid(SbomFormat::Swid, InvalidKind::Xml(e.to_string())))?;

        let creator = tag
            .entities
            .iter()
            .find(|e| e.role.as_deref().is_some_and(|r| r.contains("tagCreator")))
            .or_else(|| tag.entities.first())
            .and_then(|e| e.name.clone());
        let regid = tag
            .regid
            .or_else(|| tag.entities.iter().find_map(|e| e.regid.clone()));
        let description = tag
            .description
            .or_else(|| tag.meta.iter().find_map(|m| m.description.clone()));

        Ok(self.convert(SwidIdentity {
            tag_id: tag.tag_id,
            name: tag.name,
            version: tag.version,
            regid,
            version_scheme: tag.version_scheme,
            description,
            creator,
        }))
    }

    /// Parse a JSON tag with a `softwareIdentity` object
    fn parse_json(&self, content: &str) -> Result<Document, ParseError> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| ParseError::invalid(SbomFormat::Swid, InvalidKind::Json(e.to_string())))?;
        let Some(identity) = value.get("softwareIdentity").filter(|v| v.is_object()) else {
            return Err(ParseError::missing_marker(SbomFormat::Swid, "softwareIdentity"));
        };

        let mut identity: SwidIdentity = serde_json::from_value(identity.clone()).map_err(|e| {
            ParseError::invalid(SbomFormat::Swid, InvalidKind::Structure(e.to_string()))
        })?;
        if identity.tag_id.is_none() {
            identity.tag_id = value
                .get("tagId")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string);
        }

        Ok(self.convert(identity))
    }

    /// Build the single-package document
    fn convert(&self, identity: SwidIdentity) -> Document {
        let name = non_empty(identity.name).unwrap_or_else(|| UNKNOWN_NAME.to_string());
        let version = non_empty(identity.version);
        let tag_id = non_empty(identity.tag_id);
        let regid = non_empty(identity.regid);

        let id = tag_id.clone().unwrap_or_else(|| match &version {
            Some(v) => format!("{name}@{v}"),
            None => name.clone(),
        });

        let mut document = Document::new(SbomFormat::Swid, SWID_VERSION, name.clone());
        document.created = Some(timestamp_or_now(None));
        document.creator =
            non_empty(identity.creator).unwrap_or_else(|| DEFAULT_CREATOR.to_string());

        let mut metadata = RawRecord::new();
        let fields = [
            ("tagId", &tag_id),
            ("regid", &regid),
            ("versionScheme", &identity.version_scheme),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                metadata.insert(key.to_string(), MetadataValue::from(value.as_str()));
            }
        }
        document.metadata = metadata;

        let mut package = Package::new(id, name);
        package.version = version;
        package.description = non_empty(identity.description);
        package.supplier = regid;

        let mut collector = PackageCollector::new();
        collector.push(package);
        collector.finish(&mut document);
        document
    }
}

impl Default for SwidParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomParser for SwidParser {
    fn format(&self) -> SbomFormat {
        SbomFormat::Swid
    }

    fn parse_str(&self, content: &str) -> Result<Document, ParseError> {
        let xml_err = match self.parse_xml(content) {
            Ok(doc) => return Ok(doc),
            Err(e) if matches!(e.invalid_kind(), Some(InvalidKind::Xml(_))) => e,
            Err(e) => return Err(e),
        };
        tracing::debug!("SWID content is not XML, trying JSON");

        match self.parse_json(content) {
            Ok(doc) => Ok(doc),
            Err(json_err) if content.trim_start().starts_with('{') => Err(json_err),
            Err(json_err) => {
                if matches!(json_err.invalid_kind(), Some(InvalidKind::Json(_))) {
                    Err(xml_err)
                } else {
                    Err(json_err)
                }
            }
        }
    }

    fn matches_json(&self, value: &serde_json::Value) -> bool {
        let Some(identity) = value.get("softwareIdentity") else {
            return false;
        };
        identity.get("tagId").is_some() || value.get("tagId").is_some()
    }

    fn matches_xml(&self, root: &XmlRoot) -> bool {
        root.local_name().ends_with("softwareidentity") || root.mentions("swid")
    }

    fn matches_extension(&self, segment: &str) -> bool {
        segment.starts_with("swid")
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Normalized view of a tag, shared by the XML and JSON forms
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwidIdentity {
    tag_id: Option<String>,
    name: Option<String>,
    version: Option<String>,
    regid: Option<String>,
    version_scheme: Option<String>,
    description: Option<String>,
    #[serde(skip)]
    creator: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SwidTagXml {
    #[serde(rename = "@tagId")]
    tag_id: Option<String>,
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "@version")]
    version: Option<String>,
    #[serde(rename = "@regid")]
    regid: Option<String>,
    #[serde(rename = "@versionScheme")]
    version_scheme: Option<String>,
    #[serde(rename = "@description")]
    description: Option<String>,
    #[serde(rename = "Entity", default)]
    entities: Vec<SwidEntityXml>,
    #[serde(rename = "Meta", default)]
    meta: Vec<SwidMetaXml>,
}

#[derive(Debug, Deserialize)]
struct SwidEntityXml {
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "@regid")]
    regid: Option<String>,
    #[serde(rename = "@role")]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SwidMetaXml {
    #[serde(rename = "@description")]
    description: Option<String>,
}
