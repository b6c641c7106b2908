//! Tree-wide migration pass.
//!
//! Feeds each discovered file through the rewriter and persists the result
//! when anything changed. Files are independent: a read or write failure
//! skips that file with a warning and the run continues.

use crate::rewriter::{Change, Rewriter};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Changes applied (or pending, in a dry run) for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileChange {
    pub file: PathBuf,
    pub changes: Vec<Change>,
}

/// Aggregate counts for a migration pass.
#[derive(Debug, Default, Serialize)]
pub struct MigrationSummary {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub imports_rewritten: usize,
    pub files_skipped: usize,
}

/// Per-file changes plus aggregate counts.
#[derive(Debug, Default, Serialize)]
pub struct MigrationResult {
    pub files: Vec<FileChange>,
    pub summary: MigrationSummary,
}

/// Rewrites one file, returning its change list.
///
/// Writes the new text back only when `write` is set and at least one import
/// was rewritten. A dry run leaves the file untouched but returns exactly
/// the changes a real run would apply.
pub fn migrate_file(file: &Path, rewriter: &Rewriter, write: bool) -> Result<Vec<Change>> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let outcome = rewriter.rewrite(&source, file);
    if write && !outcome.changes.is_empty() {
        std::fs::write(file, &outcome.text)
            .with_context(|| format!("Failed to write {}", file.display()))?;
    }

    Ok(outcome.changes)
}

/// Runs the migration over `files`.
///
/// Per-file failures are reported to stderr and counted as skipped; they
/// never abort the pass.
pub fn migrate(files: &[PathBuf], rewriter: &Rewriter, write: bool) -> MigrationResult {
    let mut result = MigrationResult::default();

    for file in files {
        result.summary.files_scanned += 1;
        match migrate_file(file, rewriter, write) {
            Ok(changes) => {
                if changes.is_empty() {
                    continue;
                }
                result.summary.files_changed += 1;
                result.summary.imports_rewritten += changes.len();
                result.files.push(FileChange {
                    file: file.clone(),
                    changes,
                });
            }
            Err(err) => {
                eprintln!("{} {:#}", "warn:".yellow().bold(), err);
                result.summary.files_skipped += 1;
            }
        }
    }

    result
}
