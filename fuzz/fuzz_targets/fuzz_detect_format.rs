#![no_main]
use libfuzzer_sys::fuzz_target;
use std::path::Path;

const FILE_NAMES: &[&str] = &["sbom.json", "bom.xml", "app.spdx", "tag.swidtag", "unknown"];

/// Fuzz format detection.
///
/// The first byte picks a file name so both the extension rules and the
/// content heuristics are reached.
fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    if let Ok(s) = std::str::from_utf8(rest) {
        let name = FILE_NAMES[usize::from(first) % FILE_NAMES.len()];
        let _ = sbom_analyzer::parsers::detect_format(Path::new(name), s);
    }
});
