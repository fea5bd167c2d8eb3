//! Crate-level error type for sbom-analyzer.
//!
//! Converter failures are [`ParseError`]s; this module wraps them (and I/O,
//! configuration and report failures) with a chain of context strings.

use crate::parsers::ParseError;
use crate::reports::ReportError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-analyzer operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SbomError {
    /// Errors while reading, detecting or converting an SBOM
    #[error("Failed to parse SBOM: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseError,
    },

    /// Errors during report generation
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportError,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenient Result type for sbom-analyzer operations
pub type Result<T> = std::result::Result<T, SbomError>;

impl SbomError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            message: source.to_string(),
            source,
        }
    }

    /// Create a report error with context
    pub fn report(context: impl Into<String>, source: ReportError) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The underlying converter error, if this is a parse failure
    #[must_use]
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ParseError> for SbomError {
    fn from(err: ParseError) -> Self {
        Self::parse(String::new(), err)
    }
}

impl From<ReportError> for SbomError {
    fn from(err: ReportError) -> Self {
        Self::report(String::new(), err)
    }
}

impl From<std::io::Error> for SbomError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: err.to_string(),
            source: err,
        }
    }
}

/// Extension trait for adding context to errors.
///
/// ```ignore
/// use sbom_analyzer::error::ErrorContext;
///
/// let document = FormatDetector::new()
///     .parse(path, &content)
///     .with_context(|| format!("converting {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Prepend a context string to the error's existing context.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Like [`context`](ErrorContext::context), computing the string only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SbomError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: SbomError, new_ctx: &str) -> SbomError {
    match err {
        SbomError::Parse {
            context: existing,
            source,
        } => SbomError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomError::Report {
            context: existing,
            source,
        } => SbomError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomError::Io {
            path,
            message,
            source,
        } => SbomError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SbomError::Config(msg) => SbomError::Config(chain_context(new_ctx, &msg)),
    }
}

/// Join context strings as `"new: existing"`; an empty existing context
/// yields just `new`.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
