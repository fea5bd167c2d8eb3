//! SBOM quality assessment.
//!
//! - [`Analyzer`]: license and vulnerability histograms, dependency depth,
//!   completeness score and recommendations
//! - [`Verifier`]: structural and completeness checks with issues and warnings
//!
//! # Usage
//!
//! ```no_run
//! use sbom_analyzer::parsers::parse_sbom;
//! use sbom_analyzer::quality::{Analyzer, Verifier};
//! use std::path::Path;
//!
//! let document = parse_sbom(Path::new("sbom.json")).unwrap();
//! let analysis = Analyzer::new().analyze(&document);
//! println!("Completeness: {:.1}%", analysis.completeness_score);
//!
//! let verification = Verifier::new().verify(&document);
//! for issue in &verification.issues {
//!     println!("- {issue}");
//! }
//! ```

mod analyzer;
mod verifier;

pub use analyzer::{
    completeness_score, license_distribution, package_points, package_statistics,
    vulnerability_summary, Analyzer, DEFAULT_SAMPLE_SIZE, LOW_COMPLETENESS, MODERATE_COMPLETENESS,
};
pub use verifier::Verifier;
