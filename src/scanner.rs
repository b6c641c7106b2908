//! Source file scanner.
//!
//! Recursively walks directories to collect candidate source files by
//! extension, pruning excluded directories and user-supplied glob patterns.
//! The walk order is made deterministic by sorting, so reports are stable
//! across runs.

use anyhow::{Context, Result};
use colored::Colorize;
use glob::Pattern;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Extensions processed when none are given on the command line.
pub const DEFAULT_EXTENSIONS: &[&str] = &["vue", "ts", "tsx", "js", "jsx", "scss"];

/// Directory names that are never descended into.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules", "dist"];

/// Collects all matching source files under `paths`.
///
/// Dot-prefixed entries and directories named in `excluded_dirs` are pruned
/// from the walk; `exclude_patterns` match against entry file names. An
/// unreadable entry below the root is reported and skipped; failure to walk
/// a root path itself is fatal.
pub fn collect_source_files(
    paths: &[PathBuf],
    extensions: &[String],
    excluded_dirs: &[String],
    exclude_patterns: &[Pattern],
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        for entry in WalkDir::new(path)
            .into_iter()
            .filter_entry(|e| !is_excluded(e, excluded_dirs, exclude_patterns))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err.depth() == 0 {
                        return Err(err)
                            .with_context(|| format!("Cannot walk {}", path.display()));
                    }
                    eprintln!("{} {}", "warn:".yellow().bold(), err);
                    continue;
                }
            };
            if entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
            {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    Ok(files)
}

fn is_excluded(
    entry: &walkdir::DirEntry,
    excluded_dirs: &[String],
    exclude_patterns: &[Pattern],
) -> bool {
    let Some(name) = entry.file_name().to_str() else {
        return true;
    };
    // depth 0 is the scan root itself, which may legitimately be `.`
    if entry.depth() > 0 && name.starts_with('.') {
        return true;
    }
    if entry.file_type().is_dir() && excluded_dirs.iter().any(|dir| dir == name) {
        return true;
    }
    exclude_patterns.iter().any(|pattern| pattern.matches(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn extensions() -> Vec<String> {
        DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
    }

    fn excluded_dirs() -> Vec<String> {
        DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn collects_matching_extensions_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("src/b.vue"));
        touch(&dir.path().join("src/a.ts"));
        touch(&dir.path().join("src/notes.md"));

        let files = collect_source_files(
            &[dir.path().to_path_buf()],
            &extensions(),
            &excluded_dirs(),
            &[],
        )
        .unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.ts", "b.vue"]);
    }

    #[test]
    fn skips_excluded_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("src/app.vue"));
        touch(&dir.path().join("node_modules/pkg/index.js"));
        touch(&dir.path().join("dist/bundle.js"));

        let files = collect_source_files(
            &[dir.path().to_path_buf()],
            &extensions(),
            &excluded_dirs(),
            &[],
        )
        .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/app.vue"));
    }

    #[test]
    fn skips_hidden_entries_below_the_root() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("src/app.ts"));
        touch(&dir.path().join(".git/hooks/pre-commit.js"));
        touch(&dir.path().join("src/.backup.ts"));

        let files = collect_source_files(
            &[dir.path().to_path_buf()],
            &extensions(),
            &excluded_dirs(),
            &[],
        )
        .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/app.ts"));
    }

    #[test]
    fn applies_exclude_patterns_to_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("src/app.ts"));
        touch(&dir.path().join("src/api.generated.ts"));
        touch(&dir.path().join("legacy/old.ts"));

        let patterns = vec![
            Pattern::new("*.generated.ts").unwrap(),
            Pattern::new("legacy").unwrap(),
        ];
        let files = collect_source_files(
            &[dir.path().to_path_buf()],
            &extensions(),
            &excluded_dirs(),
            &patterns,
        )
        .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/app.ts"));
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = collect_source_files(
            &[dir.path().join("no-such-dir")],
            &extensions(),
            &excluded_dirs(),
            &[],
        );
        assert!(result.is_err());
    }
}
