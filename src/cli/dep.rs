//! Dep command handler.

use super::{context, emit, load};
use crate::config::AppConfig;
use crate::graph::build_tree;
use crate::pipeline::exit_codes;
use anyhow::Result;
use std::path::Path;

/// Run the dep command: print the dependency tree, depths and cycles
pub fn run_dep(path: &Path, config: &AppConfig, quiet: bool) -> Result<i32> {
    let parsed = load(path, config, quiet)?;
    let tree = build_tree(parsed.document());

    if tree.has_cycles() && !quiet {
        tracing::warn!("Dependency graph contains {} cycle(s)", tree.cycles.len());
    }

    let ctx = context(path, &parsed);
    emit(config, quiet, |reporter| reporter.dependency_report(&ctx, &tree))?;
    Ok(exit_codes::SUCCESS)
}
