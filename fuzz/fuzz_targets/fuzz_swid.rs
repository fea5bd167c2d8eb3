#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_analyzer::parsers::{SbomParser, SwidParser};

/// Fuzz the SWID converter, raw and inside a `SoftwareIdentity` element.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let parser = SwidParser::new();
        let _ = parser.parse_str(s);

        if s.len() < 10_000 {
            let wrapped = format!(
                r#"<SoftwareIdentity xmlns="http://standards.iso.org/iso/19770/-2/2015/schema.xsd" name="fuzz" version="1.0">{s}</SoftwareIdentity>"#,
            );
            let _ = parser.parse_str(&wrapped);
        }
    }
});
