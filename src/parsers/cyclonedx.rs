//! CycloneDX SBOM parser.
//!
//! Supports CycloneDX versions 1.4, 1.5, and 1.6 in JSON and XML formats.

use super::detection::read_xml_root;
use super::traits::{InvalidKind, ParseError, SbomParser, XmlRoot};
use super::{timestamp_or_now, PackageCollector, UNKNOWN_NAME};
use crate::model::{
    Dependency, Document, License, MetadataValue, Package, RawRecord, SbomFormat, Vulnerability,
};
use packageurl::PackageUrl;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

const DEFAULT_DOCUMENT_NAME: &str = "CycloneDX BOM";
const DEFAULT_SPEC_VERSION: &str = "1.5";
const XML_NAMESPACE_PREFIX: &str = "http://cyclonedx.org/schema/bom/";

/// Parser for CycloneDX SBOM format
pub struct CycloneDxParser;

impl CycloneDxParser {
    /// Create a new CycloneDX parser
    pub const fn new() -> Self {
        Self
    }

    /// Parse a CycloneDX BOM from JSON
    fn parse_json(&self, content: &str) -> Result<Document, ParseError> {
        let value: serde_json::Value = serde_json::from_str(content).map_err(|e| {
            ParseError::invalid(SbomFormat::CycloneDx, InvalidKind::Json(e.to_string()))
        })?;
        if !value.is_object() {
            return Err(ParseError::invalid(
                SbomFormat::CycloneDx,
                InvalidKind::Structure("expected a JSON object".to_string()),
            ));
        }
        match value.get("bomFormat") {
            None => return Err(ParseError::missing_marker(SbomFormat::CycloneDx, "bomFormat")),
            Some(format) if format.as_str() != Some("CycloneDX") => {
                tracing::warn!("Unexpected bomFormat value {}, parsing as CycloneDX", format);
            }
            Some(_) => {}
        }

        let cdx: CycloneDxBom = serde_json::from_value(value).map_err(|e| {
            ParseError::invalid(SbomFormat::CycloneDx, InvalidKind::Structure(e.to_string()))
        })?;

        Ok(self.convert(cdx))
    }

    /// Parse a CycloneDX BOM from XML
    fn parse_xml(&self, content: &str) -> Result<Document, ParseError> {
        let root = read_xml_root(content).ok_or_else(|| {
            ParseError::invalid(
                SbomFormat::CycloneDx,
                InvalidKind::Xml("no root element found".to_string()),
            )
        })?;
        if !root.local_name().ends_with("bom") {
            return Err(ParseError::missing_marker(SbomFormat::CycloneDx, "bom"));
        }

        let cdx: CycloneDxBomXml = quick_xml::de::from_str(content).map_err(|e| {
            ParseError::invalid(SbomFormat::CycloneDx, InvalidKind::Xml(e.to_string()))
        })?;

        let spec_version = root
            .namespaces
            .iter()
            .find_map(|ns| ns.strip_prefix(XML_NAMESPACE_PREFIX))
            .map(str::to_string);

        // Convert XML structure to common BOM structure
        let bom = CycloneDxBom {
            bom_format: Some("CycloneDX".to_string()),
            spec_version,
            serial_number: cdx.serial_number,
            version: cdx.version,
            metadata: cdx.metadata.map(CdxMetadata::from),
            components: cdx
                .components
                .map(|c| c.component.into_iter().map(CdxComponent::from).collect()),
            dependencies: cdx
                .dependencies
                .map(|d| d.dependency.into_iter().map(CdxDependency::from).collect()),
            vulnerabilities: cdx
                .vulnerabilities
                .map(|v| v.vulnerability.into_iter().map(CdxVulnerability::from).collect()),
        };

        Ok(self.convert(bom))
    }

    /// Convert CycloneDX BOM to the normalized model
    fn convert(&self, cdx: CycloneDxBom) -> Document {
        let metadata = cdx.metadata.unwrap_or_default();
        let name = metadata
            .component
            .as_ref()
            .and_then(|c| c.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string());
        let spec_version = cdx
            .spec_version
            .clone()
            .unwrap_or_else(|| DEFAULT_SPEC_VERSION.to_string());

        let mut document = Document::new(SbomFormat::CycloneDx, spec_version.clone(), name);
        document.namespace = cdx.serial_number.clone();
        document.created = Some(timestamp_or_now(metadata.timestamp.as_deref()));
        document.creator = metadata
            .tools
            .iter()
            .flatten()
            .find_map(|t| t.name.clone())
            .or_else(|| metadata.authors.iter().flatten().find_map(|a| a.name.clone()))
            .unwrap_or_else(|| "Unknown".to_string());

        let mut raw = RawRecord::new();
        if let Some(bom_format) = &cdx.bom_format {
            raw.insert("bomFormat".to_string(), bom_format.as_str().into());
        }
        raw.insert("specVersion".to_string(), spec_version.into());
        if let Some(serial) = &cdx.serial_number {
            raw.insert("serialNumber".to_string(), serial.as_str().into());
        }
        if let Some(version) = cdx.version {
            raw.insert("version".to_string(), MetadataValue::Integer(version));
        }
        document.metadata = raw;

        // bom-ref, purl and package id -> position of the first component carrying it
        let mut collector = PackageCollector::new();
        let mut refs: HashMap<String, usize> = HashMap::new();

        let mut stack: Vec<CdxComponent> = cdx.components.unwrap_or_default();
        stack.reverse();
        while let Some(mut comp) = stack.pop() {
            if let Some(children) = comp.components.take() {
                stack.extend(children.into_iter().rev());
            }
            let mut keys: Vec<String> = comp.bom_ref.iter().chain(&comp.purl).cloned().collect();
            let position = collector.push(self.convert_component(comp));
            if let Some(pkg) = collector.get(position) {
                keys.push(pkg.id.clone());
            }
            for key in keys {
                refs.entry(key).or_insert(position);
            }
        }

        for vuln in cdx.vulnerabilities.unwrap_or_default() {
            for affects in vuln.affects.iter().flatten() {
                let target = affects.ref_field.as_deref().unwrap_or_default();
                match refs.get(target).and_then(|&pos| collector.get_mut(pos)) {
                    Some(pkg) => pkg
                        .vulnerabilities
                        .push(convert_vulnerability(&vuln, Some(affects))),
                    None => tracing::debug!(
                        "Vulnerability {:?} affects unknown component '{}'",
                        vuln.id,
                        target
                    ),
                }
            }
        }

        for dep in cdx.dependencies.unwrap_or_default() {
            let Some(source) = dep.ref_field else {
                continue;
            };
            let depends_on = dep.depends_on.unwrap_or_default();

            let mut record = RawRecord::new();
            record.insert("ref".to_string(), source.as_str().into());
            record.insert("dependsOn".to_string(), depends_on.clone().into());
            document.relationships.push(record);

            let Some(&source_pos) = refs.get(&source) else {
                tracing::debug!("Skipping dependencies of unknown component '{}'", source);
                continue;
            };
            for target in depends_on {
                let dependency = match refs.get(&target).and_then(|&pos| collector.get(pos)) {
                    Some(pkg) => Dependency::new(pkg.id.clone(), pkg.name.clone()),
                    None => {
                        let target_name = purl_name(&target).unwrap_or_else(|| target.clone());
                        Dependency::new(target, target_name)
                    }
                };
                if let Some(pkg) = collector.get_mut(source_pos) {
                    pkg.dependencies.push(dependency);
                }
            }
        }

        collector.finish(&mut document);
        document
    }

    /// Convert a CycloneDX component to a normalized Package
    fn convert_component(&self, comp: CdxComponent) -> Package {
        let name = comp
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());
        let external_refs = comp.external_references.unwrap_or_default();

        let purl = comp.purl.or_else(|| {
            external_refs
                .iter()
                .find(|r| r.ref_type.as_deref() == Some("purl"))
                .and_then(|r| r.url.clone())
        });
        let id = comp
            .bom_ref
            .or_else(|| purl.clone())
            .unwrap_or_else(|| match &comp.version {
                Some(version) => format!("pkg:{name}@{version}"),
                None => format!("pkg:{name}"),
            });

        let mut package = Package::new(id, name);
        package.version = comp.version;
        package.description = comp.description;
        package.purl = purl;
        package.supplier = comp
            .supplier
            .and_then(|s| s.name)
            .or(comp.publisher)
            .filter(|s| !s.is_empty());
        package.homepage = external_refs
            .iter()
            .find(|r| r.ref_type.as_deref() == Some("website"))
            .or_else(|| external_refs.first())
            .and_then(|r| r.url.clone());

        for choice in comp.licenses.unwrap_or_default() {
            if let Some(lic) = choice.license {
                let mut license = match (lic.id, lic.name) {
                    (Some(id), Some(name)) => License::new(id).with_name(name),
                    (Some(id), None) => License::new(id),
                    (None, name) => License::new(name.unwrap_or_default()),
                };
                license.url = lic.url;
                package.licenses.push(license);
            }
            if let Some(expression) = choice.expression {
                package.licenses.push(License::new(expression));
            }
        }

        for hash in comp.hashes.unwrap_or_default() {
            if let (Some(alg), Some(content)) = (hash.alg, hash.content) {
                package.checksums.insert(alg, content);
            }
        }

        for vuln in comp.vulnerabilities.unwrap_or_default() {
            package.vulnerabilities.push(convert_vulnerability(&vuln, None));
        }

        package
    }
}

impl Default for CycloneDxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomParser for CycloneDxParser {
    fn format(&self) -> SbomFormat {
        SbomFormat::CycloneDx
    }

    fn parse_str(&self, content: &str) -> Result<Document, ParseError> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('<') {
            self.parse_xml(content)
        } else {
            self.parse_json(content)
        }
    }

    fn matches_json(&self, value: &serde_json::Value) -> bool {
        value.get("bomFormat").and_then(serde_json::Value::as_str) == Some("CycloneDX")
    }

    fn matches_xml(&self, root: &XmlRoot) -> bool {
        root.mentions("cyclonedx") || root.local_name().ends_with("bom")
    }

    fn matches_extension(&self, segment: &str) -> bool {
        matches!(segment, "cdx" | "cyclonedx" | "bom")
    }
}

/// Convert a vulnerability, taking affected versions from one `affects`
/// entry or, when none is given, from all of them.
fn convert_vulnerability(vuln: &CdxVulnerability, affects: Option<&CdxAffects>) -> Vulnerability {
    let versions = match affects {
        Some(a) => a.versions.iter().flatten().collect::<Vec<_>>(),
        None => vuln
            .affects
            .iter()
            .flatten()
            .flat_map(|a| a.versions.iter().flatten())
            .collect(),
    };

    Vulnerability {
        id: vuln.id.clone(),
        severity: vuln
            .ratings
            .iter()
            .flatten()
            .find_map(|r| r.severity.clone()),
        description: vuln.description.clone(),
        affected_versions: versions
            .into_iter()
            .filter_map(|v| v.version.clone().or_else(|| v.range.clone()))
            .collect(),
    }
}

/// Package name from a purl-shaped reference
fn purl_name(reference: &str) -> Option<String> {
    PackageUrl::from_str(reference)
        .ok()
        .map(|purl| purl.name().to_string())
}

// CycloneDX JSON structures for deserialization

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CycloneDxBom {
    bom_format: Option<String>,
    spec_version: Option<String>,
    serial_number: Option<String>,
    version: Option<i64>,
    metadata: Option<CdxMetadata>,
    components: Option<Vec<CdxComponent>>,
    dependencies: Option<Vec<CdxDependency>>,
    vulnerabilities: Option<Vec<CdxVulnerability>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxMetadata {
    timestamp: Option<String>,
    /// Tools field - can be either array (1.4/1.5) or object with components (1.6)
    #[serde(default, deserialize_with = "deserialize_tools")]
    tools: Option<Vec<CdxTool>>,
    authors: Option<Vec<CdxAuthor>>,
    component: Option<CdxComponent>,
}

/// CycloneDX 1.6 tools object format
#[derive(Debug, Deserialize)]
struct CdxToolsObject {
    components: Option<Vec<CdxTool>>,
    services: Option<Vec<CdxTool>>,
}

#[derive(Debug, Deserialize)]
struct CdxAuthor {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxTool {
    name: Option<String>,
}

/// Custom deserializer to handle both CycloneDX 1.4/1.5 (array) and 1.6 (object) tool formats
fn deserialize_tools<'de, D>(deserializer: D) -> Result<Option<Vec<CdxTool>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    struct ToolsVisitor;

    impl<'de> Visitor<'de> for ToolsVisitor {
        type Value = Option<Vec<CdxTool>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an array of tools or an object with components/services")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut tools = Vec::new();
            while let Some(tool) = seq.next_element::<CdxTool>()? {
                tools.push(tool);
            }
            Ok(Some(tools))
        }

        fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let tools_obj: CdxToolsObject =
                serde::Deserialize::deserialize(de::value::MapAccessDeserializer::new(map))?;

            let tools: Vec<CdxTool> = tools_obj
                .components
                .into_iter()
                .flatten()
                .chain(tools_obj.services.into_iter().flatten())
                .collect();

            Ok(if tools.is_empty() { None } else { Some(tools) })
        }
    }

    deserializer.deserialize_any(ToolsVisitor)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxComponent {
    #[serde(alias = "bom-ref")]
    bom_ref: Option<String>,
    name: Option<String>,
    version: Option<String>,
    purl: Option<String>,
    description: Option<String>,
    publisher: Option<String>,
    licenses: Option<Vec<CdxLicenseChoice>>,
    supplier: Option<CdxSupplier>,
    hashes: Option<Vec<CdxHash>>,
    external_references: Option<Vec<CdxExternalReference>>,
    components: Option<Vec<CdxComponent>>,
    vulnerabilities: Option<Vec<CdxVulnerability>>,
}

#[derive(Debug, Deserialize)]
struct CdxLicenseChoice {
    license: Option<CdxLicense>,
    expression: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxLicense {
    id: Option<String>,
    name: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxSupplier {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxHash {
    alg: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxExternalReference {
    #[serde(rename = "type")]
    ref_type: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxDependency {
    #[serde(rename = "ref")]
    ref_field: Option<String>,
    depends_on: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CdxVulnerability {
    id: Option<String>,
    description: Option<String>,
    ratings: Option<Vec<CdxRating>>,
    affects: Option<Vec<CdxAffects>>,
}

#[derive(Debug, Deserialize)]
struct CdxRating {
    severity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxAffects {
    #[serde(rename = "ref")]
    ref_field: Option<String>,
    versions: Option<Vec<CdxVersionAffected>>,
}

#[derive(Debug, Deserialize)]
struct CdxVersionAffected {
    version: Option<String>,
    range: Option<String>,
}

// =============================================================================
// CycloneDX XML structures for deserialization
// XML uses wrapper elements for collections (e.g., <components><component>...)
// =============================================================================

/// Root BOM element for XML format
#[derive(Debug, Deserialize)]
struct CycloneDxBomXml {
    /// BOM revision (e.g., version="1")
    #[serde(rename = "@version")]
    version: Option<i64>,
    #[serde(rename = "@serialNumber")]
    serial_number: Option<String>,
    metadata: Option<CdxMetadataXml>,
    components: Option<CdxComponentsXml>,
    dependencies: Option<CdxDependenciesXml>,
    vulnerabilities: Option<CdxVulnerabilitiesXml>,
}

#[derive(Debug, Deserialize)]
struct CdxMetadataXml {
    timestamp: Option<String>,
    tools: Option<CdxToolsXml>,
    authors: Option<CdxAuthorsXml>,
    component: Option<CdxComponentXml>,
}

/// Tools element: `<tool>` entries (1.4) or `<components>` (1.5+)
#[derive(Debug, Deserialize)]
struct CdxToolsXml {
    #[serde(default)]
    tool: Vec<CdxTool>,
    components: Option<CdxComponentsXml>,
}

#[derive(Debug, Deserialize)]
struct CdxAuthorsXml {
    #[serde(default)]
    author: Vec<CdxAuthor>,
}

#[derive(Debug, Deserialize)]
struct CdxComponentsXml {
    #[serde(default)]
    component: Vec<CdxComponentXml>,
}

#[derive(Debug, Deserialize)]
struct CdxComponentXml {
    #[serde(rename = "@bom-ref")]
    bom_ref: Option<String>,
    name: Option<String>,
    version: Option<String>,
    purl: Option<String>,
    description: Option<String>,
    publisher: Option<String>,
    licenses: Option<CdxLicensesXml>,
    supplier: Option<CdxSupplier>,
    hashes: Option<CdxHashesXml>,
    #[serde(rename = "externalReferences")]
    external_references: Option<CdxExternalReferencesXml>,
    components: Option<CdxComponentsXml>,
    vulnerabilities: Option<CdxVulnerabilitiesXml>,
}

#[derive(Debug, Deserialize)]
struct CdxLicensesXml {
    #[serde(default)]
    license: Vec<CdxLicense>,
    #[serde(default)]
    expression: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CdxHashesXml {
    #[serde(default)]
    hash: Vec<CdxHashXml>,
}

#[derive(Debug, Deserialize)]
struct CdxHashXml {
    #[serde(rename = "@alg")]
    alg: Option<String>,
    #[serde(rename = "$text")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxExternalReferencesXml {
    #[serde(default)]
    reference: Vec<CdxExternalReferenceXml>,
}

#[derive(Debug, Deserialize)]
struct CdxExternalReferenceXml {
    #[serde(rename = "@type")]
    ref_type: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxDependenciesXml {
    #[serde(default)]
    dependency: Vec<CdxDependencyXml>,
}

#[derive(Debug, Deserialize)]
struct CdxDependencyXml {
    #[serde(rename = "@ref")]
    ref_field: Option<String>,
    #[serde(rename = "dependency", default)]
    depends_on: Vec<CdxDependencyRefXml>,
}

#[derive(Debug, Deserialize)]
struct CdxDependencyRefXml {
    #[serde(rename = "@ref")]
    ref_field: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxVulnerabilitiesXml {
    #[serde(default)]
    vulnerability: Vec<CdxVulnerabilityXml>,
}

#[derive(Debug, Deserialize)]
struct CdxVulnerabilityXml {
    id: Option<String>,
    description: Option<String>,
    ratings: Option<CdxRatingsXml>,
    affects: Option<CdxAffectsXml>,
}

#[derive(Debug, Deserialize)]
struct CdxRatingsXml {
    #[serde(default)]
    rating: Vec<CdxRating>,
}

#[derive(Debug, Deserialize)]
struct CdxAffectsXml {
    #[serde(default)]
    target: Vec<CdxTargetXml>,
}

#[derive(Debug, Deserialize)]
struct CdxTargetXml {
    #[serde(rename = "ref")]
    ref_field: Option<String>,
    versions: Option<CdxVersionsXml>,
}

#[derive(Debug, Deserialize)]
struct CdxVersionsXml {
    #[serde(default)]
    version: Vec<CdxVersionAffected>,
}

impl From<CdxMetadataXml> for CdxMetadata {
    fn from(m: CdxMetadataXml) -> Self {
        let tools = m.tools.map(|t| {
            let nested = t
                .components
                .into_iter()
                .flat_map(|c| c.component)
                .map(|c| CdxTool { name: c.name });
            t.tool.into_iter().chain(nested).collect()
        });
        Self {
            timestamp: m.timestamp,
            tools,
            authors: m.authors.map(|a| a.author),
            component: m.component.map(CdxComponent::from),
        }
    }
}

impl From<CdxComponentXml> for CdxComponent {
    fn from(c: CdxComponentXml) -> Self {
        let licenses = c.licenses.map(|l| {
            let licenses = l.license.into_iter().map(|license| CdxLicenseChoice {
                license: Some(license),
                expression: None,
            });
            let expressions = l.expression.into_iter().map(|expression| CdxLicenseChoice {
                license: None,
                expression: Some(expression),
            });
            licenses.chain(expressions).collect()
        });

        Self {
            bom_ref: c.bom_ref,
            name: c.name,
            version: c.version,
            purl: c.purl,
            description: c.description,
            publisher: c.publisher,
            licenses,
            supplier: c.supplier,
            hashes: c.hashes.map(|h| {
                h.hash
                    .into_iter()
                    .map(|hash| CdxHash {
                        alg: hash.alg,
                        content: hash.content.map(|s| s.trim().to_string()),
                    })
                    .collect()
            }),
            external_references: c.external_references.map(|r| {
                r.reference
                    .into_iter()
                    .map(|reference| CdxExternalReference {
                        ref_type: reference.ref_type,
                        url: reference.url,
                    })
                    .collect()
            }),
            components: c
                .components
                .map(|nested| nested.component.into_iter().map(Self::from).collect()),
            vulnerabilities: c
                .vulnerabilities
                .map(|v| v.vulnerability.into_iter().map(CdxVulnerability::from).collect()),
        }
    }
}

impl From<CdxDependencyXml> for CdxDependency {
    fn from(d: CdxDependencyXml) -> Self {
        Self {
            ref_field: d.ref_field,
            depends_on: Some(d.depends_on.into_iter().filter_map(|r| r.ref_field).collect()),
        }
    }
}

impl From<CdxVulnerabilityXml> for CdxVulnerability {
    fn from(v: CdxVulnerabilityXml) -> Self {
        Self {
            id: v.id,
            description: v.description,
            ratings: v.ratings.map(|r| r.rating),
            affects: v.affects.map(|a| {
                a.target
                    .into_iter()
                    .map(|t| CdxAffects {
                        ref_field: t.ref_field,
                        versions: t.versions.map(|v| v.version),
                    })
                    .collect()
            }),
        }
    }
}
