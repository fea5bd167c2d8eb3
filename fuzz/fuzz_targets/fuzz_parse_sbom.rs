#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_analyzer::{build_tree, parse_sbom_str, Analyzer, PackageLookup, Verifier};

/// Fuzz the main SBOM parsing entry point.
///
/// Every document that converts is also run through the analyzer, the
/// verifier, the dependency graph and a lookup, since converter output
/// can contain arbitrary names and dangling edges.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(document) = parse_sbom_str(s) {
            let _ = Analyzer::new().analyze(&document);
            let _ = Verifier::new().verify(&document);
            let _ = build_tree(&document);
            let _ = PackageLookup::new().find(&document, "fuzz");
        }
    }
});
