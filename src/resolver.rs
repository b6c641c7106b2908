//! Alias-to-relative path resolution.
//!
//! Pure lexical path arithmetic over the alias root, the importing file and
//! the import's alias-relative path. Nothing here touches the filesystem, so
//! resolution cannot fail; a target that does not exist on disk still
//! resolves to a well-formed relative path.

use std::path::{Component, Path, PathBuf};

/// Extensions the SCSS `@use` rule resolves implicitly.
const STYLE_EXTENSIONS: &[&str] = &["scss", "sass", "css"];

/// Resolves an alias-relative path to a relative import specifier.
///
/// Joins `alias_relative` onto `root`, then computes the path from the
/// importing file's directory to that target. The result uses forward
/// slashes on every platform and always starts with `./` or `../`, so it
/// cannot be mistaken for a package import. Joining it back onto the
/// importing file's directory and normalizing reproduces the target.
pub fn resolve(alias_relative: &str, importing_file: &Path, root: &Path) -> String {
    let target = normalize(&root.join(alias_relative));
    let from = importing_file.parent().map(normalize).unwrap_or_default();

    let rel = relative(&from, &target);
    if rel.starts_with('.') {
        rel
    } else {
        format!("./{}", rel)
    }
}

/// Resolves a style-sheet import against the styles root.
///
/// `@use` resolves partials and extensions implicitly, so a leading `_` and
/// a trailing style extension are stripped from the final segment.
pub fn resolve_style(style_relative: &str, importing_file: &Path, styles_root: &Path) -> String {
    let resolved = resolve(style_relative, importing_file, styles_root);
    match resolved.rsplit_once('/') {
        Some((dir, name)) => format!("{}/{}", dir, strip_partial_affixes(name)),
        None => strip_partial_affixes(&resolved).to_string(),
    }
}

fn strip_partial_affixes(name: &str) -> &str {
    let name = name.strip_prefix('_').unwrap_or(name);
    match name.rsplit_once('.') {
        Some((stem, ext)) if STYLE_EXTENSIONS.contains(&ext) => stem,
        _ => name,
    }
}

/// Lexically normalizes a path, dropping `.` and resolving `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut stack: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(stack.last(), Some(Component::Normal(_))) {
                    stack.pop();
                } else if !matches!(
                    stack.last(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    // `..` above a relative start is kept as-is
                    stack.push(Component::ParentDir);
                }
            }
            other => stack.push(other),
        }
    }
    stack.iter().map(|component| component.as_os_str()).collect()
}

/// Computes the relative path between two normalized paths, `/`-joined.
///
/// Counts the shared component prefix, emits one `..` per remaining source
/// directory, then appends the remaining target components.
fn relative(from_dir: &Path, target: &Path) -> String {
    let from: Vec<Component> = from_dir.components().collect();
    let to: Vec<Component> = target.components().collect();

    let shared = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in shared..from.len() {
        parts.push("..".to_string());
    }
    for component in &to[shared..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
