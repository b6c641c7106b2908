//! alias-migrate: rewrite path-alias imports to relative paths.
//!
//! Scans a project tree for alias-prefixed import specifiers in JS/TS
//! import clauses and SCSS `@use` rules, replaces each with the equivalent
//! relative path, and retires the alias declaration from tsconfig and the
//! bundler config.

mod cli;

use alias_migrate::migrator::{self, FileChange, MigrationResult, MigrationSummary};
use alias_migrate::rewriter::{AliasConfig, Rewriter};
use alias_migrate::{config, scanner};
use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ConfigOpts, MigrateOpts, ProjectOpts, ScanOpts};
use colored::Colorize;
use dialoguer::Confirm;
use glob::Pattern;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate(opts) => cmd_migrate(opts),
        Commands::Scan(opts) => cmd_scan(opts),
        Commands::Config(opts) => cmd_config(opts),
    }
}

fn cmd_migrate(opts: MigrateOpts) -> Result<()> {
    let (project_root, alias_config) = resolve_project(&opts.project)?;
    let files = gather_files(&opts.paths, &alias_config.source_root, &opts.ext, &opts.exclude)?;
    if opts.verbose {
        eprintln!(
            "{} Found {} file(s) to scan",
            "info:".blue().bold(),
            files.len()
        );
    }

    let alias = alias_config.alias.clone();
    let rewriter = Rewriter::new(alias_config);
    let apply = opts.write || opts.interactive;

    let result = if opts.interactive {
        migrate_interactive(&files, &rewriter)?
    } else {
        migrator::migrate(&files, &rewriter, opts.write)
    };

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if opts.interactive {
        print_summary(&result.summary);
    } else {
        print_migration(&result, opts.write);
    }

    if !opts.skip_config {
        patch_configs(&project_root, &alias, apply, opts.verbose);
    }

    if !apply {
        println!("\n{} Use --write to apply changes", "hint:".cyan().bold());
    }

    Ok(())
}

fn cmd_scan(opts: ScanOpts) -> Result<()> {
    let (_, alias_config) = resolve_project(&opts.project)?;
    let files = gather_files(&opts.paths, &alias_config.source_root, &opts.ext, &opts.exclude)?;

    println!("Would scan {} file(s):", files.len());
    for file in files {
        println!("  {}", file.display());
    }

    Ok(())
}

fn cmd_config(opts: ConfigOpts) -> Result<()> {
    let (project_root, alias_config) = resolve_project(&opts.project)?;
    patch_configs(&project_root, &alias_config.alias, opts.write, opts.verbose);

    if !opts.write {
        println!("\n{} Use --write to apply changes", "hint:".cyan().bold());
    }

    Ok(())
}

/// Anchors the project and alias roots to absolute paths so relative-path
/// arithmetic sees a consistent view regardless of how the tool was invoked.
fn resolve_project(opts: &ProjectOpts) -> Result<(PathBuf, AliasConfig)> {
    let project_root = opts
        .project_root
        .canonicalize()
        .with_context(|| format!("Cannot access project root {}", opts.project_root.display()))?;

    let source_root = match &opts.source_root {
        Some(dir) => dir
            .canonicalize()
            .with_context(|| format!("Cannot access source root {}", dir.display()))?,
        None => project_root.join("src"),
    };

    let mut alias_config = AliasConfig::new(opts.alias.clone(), source_root);
    alias_config.styles_subdir = opts.styles_dir.clone();

    Ok((project_root, alias_config))
}

fn gather_files(
    paths: &Option<Vec<PathBuf>>,
    source_root: &Path,
    ext: &[String],
    exclude: &[String],
) -> Result<Vec<PathBuf>> {
    let scan_paths = match paths {
        Some(list) => list
            .iter()
            .map(|p| {
                p.canonicalize()
                    .with_context(|| format!("Cannot access {}", p.display()))
            })
            .collect::<Result<Vec<_>>>()?,
        None => vec![source_root.to_path_buf()],
    };

    let extensions: Vec<String> = if ext.is_empty() {
        scanner::DEFAULT_EXTENSIONS
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        ext.to_vec()
    };
    let excluded_dirs: Vec<String> = scanner::DEFAULT_EXCLUDED_DIRS
        .iter()
        .map(|s| s.to_string())
        .collect();
    let patterns = exclude
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern '{}'", p)))
        .collect::<Result<Vec<_>>>()?;

    scanner::collect_source_files(&scan_paths, &extensions, &excluded_dirs, &patterns)
}

/// Per-file confirmation loop. Each file's pending changes are shown and
/// written only after the user approves them.
fn migrate_interactive(files: &[PathBuf], rewriter: &Rewriter) -> Result<MigrationResult> {
    let mut result = MigrationResult::default();

    for file in files {
        result.summary.files_scanned += 1;
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("{} {}: {}", "warn:".yellow().bold(), file.display(), err);
                result.summary.files_skipped += 1;
                continue;
            }
        };

        let outcome = rewriter.rewrite(&source, file);
        if outcome.changes.is_empty() {
            continue;
        }

        println!("\n{} {}", "Pending:".yellow().bold(), file.display());
        for change in &outcome.changes {
            println!(
                "  {}: {} -> {}",
                change.line,
                change.original.red(),
                change.updated.green()
            );
        }

        let confirmed = Confirm::new()
            .with_prompt(format!("Apply {} change(s)?", outcome.changes.len()))
            .default(true)
            .interact()?;
        if !confirmed {
            continue;
        }

        if let Err(err) = std::fs::write(file, &outcome.text) {
            eprintln!("{} {}: {}", "warn:".yellow().bold(), file.display(), err);
            result.summary.files_skipped += 1;
            continue;
        }
        result.summary.files_changed += 1;
        result.summary.imports_rewritten += outcome.changes.len();
        result.files.push(FileChange {
            file: file.clone(),
            changes: outcome.changes,
        });
    }

    Ok(result)
}

fn print_migration(result: &MigrationResult, write: bool) {
    for file_change in &result.files {
        println!(
            "\n{} {}",
            update_label(write),
            file_change.file.display()
        );
        for change in &file_change.changes {
            println!(
                "  {}: {} -> {}",
                change.line,
                change.original.red(),
                change.updated.green()
            );
        }
    }
    print_summary(&result.summary);
}

fn print_summary(summary: &MigrationSummary) {
    println!(
        "\n{} {} of {} file(s) changed, {} import(s) rewritten, {} skipped",
        "done:".green().bold(),
        summary.files_changed,
        summary.files_scanned,
        summary.imports_rewritten,
        summary.files_skipped
    );
}

/// Runs both config patchers. Failures here are reported but never abort
/// the run; the tree pass has already happened.
fn patch_configs(project_root: &Path, alias: &str, write: bool, verbose: bool) {
    match config::find_tsconfig(project_root) {
        Some(path) => match config::strip_tsconfig_paths(&path, alias, write) {
            Ok(true) => println!(
                "{} {} ({}/* removed from paths)",
                update_label(write),
                path.display(),
                alias
            ),
            Ok(false) => {
                if verbose {
                    eprintln!(
                        "{} no {}/* entry in {}",
                        "info:".blue().bold(),
                        alias,
                        path.display()
                    );
                }
            }
            Err(err) => eprintln!("{} {:#}", "error:".red().bold(), err),
        },
        None => {
            if verbose {
                eprintln!(
                    "{} no tsconfig.json or jsconfig.json under {}",
                    "info:".blue().bold(),
                    project_root.display()
                );
            }
        }
    }

    match config::find_bundler_config(project_root) {
        Some(path) => match config::comment_out_bundler_alias(&path, alias, write) {
            Ok(true) => println!(
                "{} {} (alias block commented out)",
                update_label(write),
                path.display()
            ),
            Ok(false) => {
                if verbose {
                    eprintln!(
                        "{} no {} alias block in {}",
                        "info:".blue().bold(),
                        alias,
                        path.display()
                    );
                }
            }
            Err(err) => eprintln!("{} {:#}", "error:".red().bold(), err),
        },
        None => {
            if verbose {
                eprintln!(
                    "{} no bundler config under {}",
                    "info:".blue().bold(),
                    project_root.display()
                );
            }
        }
    }
}

fn update_label(write: bool) -> colored::ColoredString {
    if write { "Updated:" } else { "Would update:" }.yellow().bold()
}
