//! **Analysis of Software Bills of Materials (SBOMs).**
//!
//! `sbom-analyzer` reads SPDX, CycloneDX and SWID documents, normalizes them
//! into one data model and answers questions about them: which licenses are
//! used, how deep the dependency graph goes, whether it has cycles, how
//! complete the package data is and whether the document is structurally
//! sound.
//!
//! ## Core Concepts & Modules
//!
//! - **[`parsers`]**: format detection and the per-format converters. Every
//!   input becomes a [`Document`].
//! - **[`model`]**: the normalized [`Document`] and the derived result types.
//! - **[`graph`]**: the dependency graph engine (depths, roots, cycles). All
//!   traversals are iterative, so deep graphs cannot overflow the stack.
//! - **[`quality`]**: the [`Analyzer`] (histograms, completeness score,
//!   recommendations) and the [`Verifier`] (issues and warnings).
//! - **[`matching`]**: [`PackageLookup`], exact then fuzzy name lookup.
//! - **[`reports`]**: text, JSON, Markdown and HTML renderers.
//! - **[`config`]**, **[`pipeline`]**, **[`cli`]**: the command-line surface.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use sbom_analyzer::{build_tree, parse_sbom, Analyzer, Verifier};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let document = parse_sbom(Path::new("path/to/sbom.spdx.json"))?;
//!
//!     let analysis = Analyzer::new().analyze(&document);
//!     println!("{} packages, {:.1}% complete", analysis.total_packages, analysis.completeness_score);
//!
//!     let tree = build_tree(&document);
//!     for cycle in &tree.cycles {
//!         println!("cycle: {}", cycle.join(" -> "));
//!     }
//!
//!     let verification = Verifier::new().verify(&document);
//!     if !verification.is_valid {
//!         for issue in &verification.issues {
//!             println!("- {issue}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! The `sbom-analyzer` binary exposes `analyze`, `verify`, `dep` and
//! `check-pkg` subcommands over the same library calls.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Percentages are computed from package counts
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::fn_params_excessive_bools,
    clippy::unused_self,
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod matching;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod quality;
pub mod reports;

// Re-export main types for convenience
pub use config::{AppConfig, ConfigError, ConfigOverrides, Validatable};
pub use error::{ErrorContext, Result, SbomError};
pub use graph::{build_tree, DependencyGraph};
pub use matching::{MatchKind, PackageLookup};
pub use model::{
    AnalysisResult, DependencyTree, Document, Package, PackageInfo, SbomFormat,
    VerificationResult,
};
pub use parsers::{detect_format, parse_sbom, parse_sbom_str, FormatDetector, ParseError, SbomParser};
pub use quality::{Analyzer, Verifier};
pub use reports::{create_reporter, ReportFormat, ReportGenerator};
