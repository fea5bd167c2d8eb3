//! Check-pkg command handler.
//!
//! Looks up a single package by name (exact, then fuzzy) or, with
//! `--search`, lists every package whose name or description contains the
//! term.

use super::{context, emit, load};
use crate::config::AppConfig;
use crate::matching::{package_info, MatchKind};
use crate::pipeline::exit_codes;
use crate::reports::PackageReport;
use anyhow::Result;
use std::path::Path;

/// Package names listed when a lookup finds nothing
pub const MAX_SUGGESTIONS: usize = 10;

/// Run the check-pkg command.
///
/// Exits with [`exit_codes::CHECK_FAILED`] when nothing matched.
pub fn run_check_pkg(
    path: &Path,
    query: &str,
    search: bool,
    config: &AppConfig,
    quiet: bool,
) -> Result<i32> {
    let parsed = load(path, config, quiet)?;
    let document = parsed.document();
    let lookup = config.package_lookup();

    let mut fuzzy_score = None;
    let matches = if search {
        lookup.search(document, query)
    } else {
        match lookup.find_package(document, query) {
            Some(found) => {
                if let MatchKind::Fuzzy { score } = found.kind {
                    fuzzy_score = Some(score);
                }
                vec![package_info(found.package)]
            }
            None => Vec::new(),
        }
    };

    let suggestions: Vec<String> = if matches.is_empty() {
        lookup
            .list_names(document)
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .collect()
    } else {
        Vec::new()
    };
    if matches.is_empty() && !quiet {
        tracing::warn!("No package matching '{}'", query);
    }

    let report = PackageReport {
        query,
        matches: &matches,
        search,
        fuzzy_score,
        suggestions: &suggestions,
    };
    let ctx = context(path, &parsed);
    emit(config, quiet, |reporter| reporter.package_report(&ctx, &report))?;

    Ok(if matches.is_empty() {
        exit_codes::CHECK_FAILED
    } else {
        exit_codes::SUCCESS
    })
}
