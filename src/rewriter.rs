//! Import rewriting.
//!
//! Scans one file's text for alias-prefixed import statements and replaces
//! each path literal with the equivalent relative path. Matches are collected
//! with their byte spans in document order, then applied in reverse offset
//! order to preserve span validity. Only the path portion inside the quotes
//! is in a span, so quote style and binding syntax survive byte-for-byte.

use crate::resolver;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Binding of one alias prefix to one source root for a migration run.
#[derive(Debug, Clone)]
pub struct AliasConfig {
    /// Alias prefix as written in import specifiers, e.g. `@`.
    pub alias: String,
    /// Absolute directory the alias points at.
    pub source_root: PathBuf,
    /// Style partial subtree under the source root.
    pub styles_subdir: String,
}

impl AliasConfig {
    pub fn new(alias: impl Into<String>, source_root: impl Into<PathBuf>) -> Self {
        Self {
            alias: alias.into(),
            source_root: source_root.into(),
            styles_subdir: "assets/styles".to_string(),
        }
    }

    /// Absolute directory style partials are resolved against.
    pub fn styles_root(&self) -> PathBuf {
        self.source_root.join(&self.styles_subdir)
    }
}

/// Syntactic form an import occurrence was matched as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    JsImport,
    ScssUse,
}

/// One rewritten import occurrence.
#[derive(Debug, Clone, Serialize)]
pub struct Change {
    pub kind: ImportKind,
    /// Line number, 1-indexed.
    pub line: usize,
    /// Path literal as it appeared in the source.
    pub original: String,
    /// Relative path it was replaced with.
    pub updated: String,
    /// Local name bound by `@use ... as`, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound_as: Option<String>,
}

/// Result of rewriting one file's text.
#[derive(Debug)]
pub struct RewriteOutcome {
    pub text: String,
    pub changes: Vec<Change>,
}

/// Rewrites alias-prefixed imports in source text.
///
/// Two pattern families are recognized: SCSS `@use` rules whose path sits
/// under the styles subtree, and JS/TS import clauses (default, named,
/// namespace, side-effect, re-export and dynamic forms) whose source string
/// begins with the alias. Everything else passes through untouched.
pub struct Rewriter {
    config: AliasConfig,
    styles_root: PathBuf,
    scss_prefix: String,
    js_prefix: String,
    scss_use: Regex,
    js_import: Regex,
}

impl Rewriter {
    pub fn new(config: AliasConfig) -> Self {
        let alias = regex::escape(&config.alias);
        let styles = regex::escape(&config.styles_subdir);

        // The alias is escaped, so compilation cannot fail on user input.
        let scss_use = Regex::new(&format!(
            r#"@use\s+(?:'(?P<sq>{alias}/{styles}/[^'\n]+)'|"(?P<dq>{alias}/{styles}/[^"\n]+)")(?:\s+as\s+(?P<name>[\w$*-]+))?"#
        ))
        .expect("scss @use pattern");

        let js_import = Regex::new(&format!(
            r#"(?:\b(?:import|export)\b(?:[\s\w$,{{}}*]*?\bfrom\b)?\s*|\bimport\s*\(\s*)(?:'(?P<sq>{alias}/[^'\n]+)'|"(?P<dq>{alias}/[^"\n]+)")"#
        ))
        .expect("js import pattern");

        let styles_root = config.styles_root();
        let scss_prefix = format!("{}/{}/", config.alias, config.styles_subdir);
        let js_prefix = format!("{}/", config.alias);

        Self {
            config,
            styles_root,
            scss_prefix,
            js_prefix,
            scss_use,
            js_import,
        }
    }

    /// Rewrites every alias-prefixed import in `text`.
    ///
    /// Returns the input unchanged with an empty change list when nothing
    /// matches. Each occurrence is resolved independently against the
    /// importing file's directory; resolution is never cached across files.
    /// Malformed or partially matching alias syntax is not an error, it
    /// simply does not match.
    pub fn rewrite(&self, text: &str, importing_file: &Path) -> RewriteOutcome {
        let mut edits: Vec<(usize, usize, Change)> = Vec::new();

        for caps in self.scss_use.captures_iter(text) {
            let Some(m) = caps.name("sq").or_else(|| caps.name("dq")) else {
                continue;
            };
            let Some(logical) = m.as_str().strip_prefix(&self.scss_prefix) else {
                continue;
            };
            let updated = resolver::resolve_style(logical, importing_file, &self.styles_root);
            edits.push((
                m.start(),
                m.end(),
                Change {
                    kind: ImportKind::ScssUse,
                    line: line_of(text, m.start()),
                    original: m.as_str().to_string(),
                    updated,
                    bound_as: caps.name("name").map(|n| n.as_str().to_string()),
                },
            ));
        }

        for caps in self.js_import.captures_iter(text) {
            let Some(m) = caps.name("sq").or_else(|| caps.name("dq")) else {
                continue;
            };
            let Some(logical) = m.as_str().strip_prefix(&self.js_prefix) else {
                continue;
            };
            let updated = resolver::resolve(logical, importing_file, &self.config.source_root);
            edits.push((
                m.start(),
                m.end(),
                Change {
                    kind: ImportKind::JsImport,
                    line: line_of(text, m.start()),
                    original: m.as_str().to_string(),
                    updated,
                    bound_as: None,
                },
            ));
        }

        if edits.is_empty() {
            return RewriteOutcome {
                text: text.to_string(),
                changes: Vec::new(),
            };
        }

        // Document order for reporting; reverse offset order for applying.
        edits.sort_by_key(|(start, _, _)| *start);
        let changes: Vec<Change> = edits.iter().map(|(_, _, change)| change.clone()).collect();

        let mut result = text.to_string();
        for (start, end, change) in edits.iter().rev() {
            result.replace_range(*start..*end, &change.updated);
        }

        RewriteOutcome {
            text: result,
            changes,
        }
    }
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> Rewriter {
        Rewriter::new(AliasConfig::new("@", "/project/src"))
    }

    #[test]
    fn rewrites_default_import() {
        let text = "import Foo from '@/components/Foo.vue';\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/pages/Home.vue"));
        assert_eq!(out.text, "import Foo from '../components/Foo.vue';\n");
        assert_eq!(out.changes.len(), 1);
        assert_eq!(out.changes[0].kind, ImportKind::JsImport);
        assert_eq!(out.changes[0].original, "@/components/Foo.vue");
        assert_eq!(out.changes[0].updated, "../components/Foo.vue");
    }

    #[test]
    fn rewrites_named_import() {
        let text = "import { ref, watch } from '@/composables/useThing';\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/components/Widget.vue"));
        assert_eq!(out.text, "import { ref, watch } from '../composables/useThing';\n");
    }

    #[test]
    fn rewrites_namespace_import() {
        let text = "import * as api from '@/api/client';\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/main.ts"));
        assert_eq!(out.text, "import * as api from './api/client';\n");
    }

    #[test]
    fn rewrites_side_effect_import_keeping_extension() {
        let text = "import '@/assets/styles/global.scss';\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/main.ts"));
        assert_eq!(out.text, "import './assets/styles/global.scss';\n");
        assert_eq!(out.changes[0].kind, ImportKind::JsImport);
    }

    #[test]
    fn rewrites_reexport() {
        let text = "export { default as Foo } from '@/components/Foo.vue';\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/components/index.ts"));
        assert_eq!(out.text, "export { default as Foo } from './Foo.vue';\n");
    }

    #[test]
    fn rewrites_dynamic_import() {
        let text = "const About = () => import('@/pages/About.vue');\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/router/index.ts"));
        assert_eq!(out.text, "const About = () => import('../pages/About.vue');\n");
    }

    #[test]
    fn rewrites_multiline_named_import() {
        let text = "import {\n  a,\n  b,\n} from '@/utils/format';\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/pages/Home.vue"));
        assert_eq!(out.text, "import {\n  a,\n  b,\n} from '../utils/format';\n");
    }

    #[test]
    fn preserves_double_quotes() {
        let text = "import Foo from \"@/components/Foo.vue\";\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/pages/Home.vue"));
        assert_eq!(out.text, "import Foo from \"../components/Foo.vue\";\n");
    }

    #[test]
    fn preserves_quote_style_per_occurrence() {
        let text = "import a from '@/a/x';\nimport b from \"@/b/y\";\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/main.ts"));
        assert_eq!(out.text, "import a from './a/x';\nimport b from \"./b/y\";\n");
    }

    #[test]
    fn rewrites_scss_use_preserving_binding() {
        let text = "@use '@/assets/styles/variables' as v;\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/components/Button.vue"));
        assert_eq!(out.text, "@use '../assets/styles/variables' as v;\n");
        assert_eq!(out.changes.len(), 1);
        assert_eq!(out.changes[0].kind, ImportKind::ScssUse);
        assert_eq!(out.changes[0].bound_as.as_deref(), Some("v"));
    }

    #[test]
    fn rewrites_scss_use_stripping_partial_affixes() {
        let text = "@use \"@/assets/styles/_mixins.scss\" as m;\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/pages/Home.vue"));
        assert_eq!(out.text, "@use \"../assets/styles/mixins\" as m;\n");
    }

    #[test]
    fn rewrites_scss_use_without_binding() {
        let text = "@use '@/assets/styles/reset';\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/pages/Home.vue"));
        assert_eq!(out.text, "@use '../assets/styles/reset';\n");
        assert!(out.changes[0].bound_as.is_none());
    }

    #[test]
    fn scss_use_outside_styles_subtree_is_untouched() {
        let text = "@use '@/components/theme' as t;\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/pages/Home.vue"));
        assert_eq!(out.text, text);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn no_op_for_plain_relative_import() {
        let text = "import Sibling from './sibling';\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/pages/Home.vue"));
        assert_eq!(out.text, text);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn no_op_for_scoped_package_import() {
        let text = "import { createApp } from 'vue';\nimport { isRef } from '@vue/reactivity';\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/main.ts"));
        assert_eq!(out.text, text);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn alias_in_prose_comment_is_not_matched() {
        let text = "// TODO: move @/components/Foo.vue into features\nconst x = 1;\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/main.ts"));
        assert_eq!(out.text, text);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn template_interpolated_path_is_not_matched() {
        let text = "const page = `@/pages/${name}.vue`;\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/router/index.ts"));
        assert_eq!(out.text, text);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let text = "import Foo from '@/components/Foo.vue';\n@use '@/assets/styles/variables' as v;\n";
        let rw = rewriter();
        let file = Path::new("/project/src/pages/Home.vue");
        let first = rw.rewrite(text, file);
        let second = rw.rewrite(&first.text, file);
        assert_eq!(second.text, first.text);
        assert!(second.changes.is_empty());
    }

    #[test]
    fn changes_are_reported_in_document_order() {
        let text = "<script>\nimport Foo from '@/components/Foo.vue';\n</script>\n<style lang=\"scss\">\n@use '@/assets/styles/variables' as v;\n</style>\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/pages/Home.vue"));
        assert_eq!(out.changes.len(), 2);
        assert_eq!(out.changes[0].kind, ImportKind::JsImport);
        assert_eq!(out.changes[0].line, 2);
        assert_eq!(out.changes[1].kind, ImportKind::ScssUse);
        assert_eq!(out.changes[1].line, 5);
        assert!(out.text.contains("'../components/Foo.vue'"));
        assert!(out.text.contains("'../assets/styles/variables'"));
    }

    #[test]
    fn rewrites_multiple_imports_on_one_line() {
        let text = "import a from '@/a/x'; import b from '@/b/y';\n";
        let out = rewriter().rewrite(text, Path::new("/project/src/main.ts"));
        assert_eq!(out.text, "import a from './a/x'; import b from './b/y';\n");
        assert_eq!(out.changes.len(), 2);
        assert_eq!(out.changes[0].original, "@/a/x");
        assert_eq!(out.changes[1].original, "@/b/y");
    }

    #[test]
    fn resolves_each_occurrence_against_its_own_file() {
        let rw = rewriter();
        let text = "import Foo from '@/components/Foo.vue';\n";
        let from_pages = rw.rewrite(text, Path::new("/project/src/pages/Home.vue"));
        let from_root = rw.rewrite(text, Path::new("/project/src/main.ts"));
        assert_eq!(from_pages.changes[0].updated, "../components/Foo.vue");
        assert_eq!(from_root.changes[0].updated, "./components/Foo.vue");
    }

    #[test]
    fn respects_a_custom_alias() {
        let rw = Rewriter::new(AliasConfig::new("~", "/project/src"));
        let text = "import Foo from '~/components/Foo.vue';\nimport Bar from '@/components/Bar.vue';\n";
        let out = rw.rewrite(text, Path::new("/project/src/pages/Home.vue"));
        assert_eq!(out.changes.len(), 1);
        assert_eq!(out.changes[0].original, "~/components/Foo.vue");
        assert!(out.text.contains("'@/components/Bar.vue'"));
    }

    #[test]
    fn empty_input_yields_empty_outcome() {
        let out = rewriter().rewrite("", Path::new("/project/src/main.ts"));
        assert_eq!(out.text, "");
        assert!(out.changes.is_empty());
    }
}
