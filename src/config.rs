//! Build-configuration patching.
//!
//! After the tree pass no import references the alias, so its declarations
//! can be retired: the wildcard entry is removed from the tsconfig `paths`
//! mapping and the alias block in the bundler config is commented out. Both
//! are whole-file read/transform/write operations, and both are no-ops when
//! the alias entry is absent.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Locates the type-check config under `project_root`, preferring
/// `tsconfig.json`.
pub fn find_tsconfig(project_root: &Path) -> Option<PathBuf> {
    ["tsconfig.json", "jsconfig.json"]
        .iter()
        .map(|name| project_root.join(name))
        .find(|candidate| candidate.is_file())
}

/// Locates the bundler config under `project_root`.
pub fn find_bundler_config(project_root: &Path) -> Option<PathBuf> {
    ["vite.config.ts", "vite.config.js", "vite.config.mjs"]
        .iter()
        .map(|name| project_root.join(name))
        .find(|candidate| candidate.is_file())
}

/// Removes the alias's wildcard entry from the tsconfig `paths` mapping.
///
/// Deletes `compilerOptions.paths["<alias>/*"]`, and the whole `paths`
/// mapping if that leaves it empty. Returns whether anything changed; the
/// file is only rewritten when `write` is set. Malformed JSON is an error
/// and the file is left untouched.
pub fn strip_tsconfig_paths(path: &Path, alias: &str, write: bool) -> Result<bool> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut root: serde_json::Value = serde_json::from_str(&source)
        .with_context(|| format!("Malformed JSON in {}", path.display()))?;

    let key = format!("{}/*", alias);
    let emptied = {
        let Some(paths) = root
            .pointer_mut("/compilerOptions/paths")
            .and_then(serde_json::Value::as_object_mut)
        else {
            return Ok(false);
        };
        if paths.remove(&key).is_none() {
            return Ok(false);
        }
        paths.is_empty()
    };

    if emptied
        && let Some(options) = root
            .pointer_mut("/compilerOptions")
            .and_then(serde_json::Value::as_object_mut)
    {
        options.remove("paths");
    }

    if write {
        let mut out = serde_json::to_string_pretty(&root)
            .with_context(|| format!("Failed to serialize {}", path.display()))?;
        out.push('\n');
        std::fs::write(path, out)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(true)
}

/// Comments out the `alias` block of the bundler config.
///
/// Finds the uncommented `alias:` property, extends the span to the block's
/// closing brace by brace counting, and prefixes each covered line with
/// `//`. The block must actually mention the alias (quoted) to be touched,
/// so an unrelated alias table is left alone. Returns whether anything
/// changed; the file is only rewritten when `write` is set.
pub fn comment_out_bundler_alias(path: &Path, alias: &str, write: bool) -> Result<bool> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let lines: Vec<&str> = source.lines().collect();

    let Some(start) = lines.iter().position(|line| {
        let trimmed = line.trim_start();
        !trimmed.starts_with("//")
            && trimmed.starts_with("alias")
            && trimmed["alias".len()..].trim_start().starts_with(':')
    }) else {
        return Ok(false);
    };

    let mut end = start;
    let mut depth: usize = 0;
    let mut seen_brace = false;
    for (i, line) in lines.iter().enumerate().skip(start) {
        for ch in line.chars() {
            match ch {
                '{' => {
                    depth += 1;
                    seen_brace = true;
                }
                '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        end = i;
        if !seen_brace || depth == 0 {
            break;
        }
    }

    let single = format!("'{}'", alias);
    let double = format!("\"{}\"", alias);
    if !lines[start..=end]
        .iter()
        .any(|line| line.contains(&single) || line.contains(&double))
    {
        return Ok(false);
    }

    let mut patched: Vec<String> = lines.iter().map(|line| (*line).to_string()).collect();
    for line in &mut patched[start..=end] {
        let indent = line.len() - line.trim_start().len();
        line.insert_str(indent, "// ");
    }

    let mut out = patched.join("\n");
    if source.ends_with('\n') {
        out.push('\n');
    }

    if write {
        std::fs::write(path, out)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(true)
}
