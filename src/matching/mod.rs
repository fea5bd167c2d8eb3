//! Package name matching.
//!
//! [`PackageLookup`] resolves a user-supplied name to a package of a
//! document. Exact matches are case-insensitive; otherwise the closest name
//! by normalized Damerau-Levenshtein similarity is taken if it reaches the
//! cutoff (0.6 by default).
//!
//! # Example
//!
//! ```no_run
//! use sbom_analyzer::matching::PackageLookup;
//! use sbom_analyzer::parsers::parse_sbom;
//! use std::path::Path;
//!
//! let document = parse_sbom(Path::new("sbom.json")).unwrap();
//! match PackageLookup::new().find(&document, "reqeusts") {
//!     Some(info) => println!("{} {}", info.name, info.version.unwrap_or_default()),
//!     None => println!("not found"),
//! }
//! ```

mod lookup;

pub use lookup::{
    name_similarity, package_info, MatchKind, PackageLookup, PackageMatch, DEFAULT_FUZZY_CUTOFF,
};
