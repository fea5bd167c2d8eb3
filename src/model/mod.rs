//! Normalized representation of SBOM documents.
//!
//! All three input formats are converted into [`Document`] before analysis.
//! Analysis components never mutate a document; they produce the derived
//! result types in [`results`](self) instead.

mod document;
mod results;

pub use document::{
    Dependency, Document, License, MetadataValue, Package, RawRecord, SbomFormat, Vulnerability,
    SEVERITY_BUCKETS,
};
pub use results::{
    AnalysisResult, AnalysisSummary, DependencyTree, PackageInfo, PackageStatistics,
    VerificationResult,
};
