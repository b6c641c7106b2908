//! Command-line interface definitions.
//!
//! Defines the argument parser and subcommands using clap's derive API.
//! Each subcommand corresponds to a distinct operation: rewriting alias
//! imports across the tree, listing scan targets, or retiring the alias
//! from the build configuration.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Rewrite path-alias imports to relative paths.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rewrite alias imports to relative paths across the tree.
    Migrate(MigrateOpts),

    /// List files that would be processed without rewriting them.
    Scan(ScanOpts),

    /// Retire the alias from tsconfig and the bundler config.
    Config(ConfigOpts),
}

/// Options shared by every subcommand that needs to know the project shape.
#[derive(Debug, Args)]
pub struct ProjectOpts {
    /// Project root containing the build configuration.
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,

    /// Alias prefix used in import specifiers.
    #[arg(long, default_value = "@")]
    pub alias: String,

    /// Directory the alias points at. Defaults to `<project-root>/src`.
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Style partial subtree under the source root.
    #[arg(long, default_value = "assets/styles")]
    pub styles_dir: String,
}

#[derive(Debug, Args)]
pub struct MigrateOpts {
    /// Actually modify files (default is dry-run).
    #[arg(long)]
    pub write: bool,

    /// Confirm each file's changes before writing them (implies --write).
    #[arg(short, long)]
    pub interactive: bool,

    /// Paths to scan. Defaults to the source root.
    #[arg(short, long)]
    pub paths: Option<Vec<PathBuf>>,

    #[command(flatten)]
    pub project: ProjectOpts,

    /// File extensions to process. Defaults to vue,ts,tsx,js,jsx,scss.
    #[arg(long, value_delimiter = ',')]
    pub ext: Vec<String>,

    /// Glob patterns for files/directories to exclude (e.g. "legacy", "*.generated.ts").
    /// node_modules, dist and dot-prefixed entries are always skipped.
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Leave tsconfig and the bundler config untouched.
    #[arg(long)]
    pub skip_config: bool,

    /// Emit JSON instead of human-readable output.
    #[arg(long)]
    pub json: bool,

    /// Print additional diagnostics to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ScanOpts {
    /// Paths to scan. Defaults to the source root.
    #[arg(short, long)]
    pub paths: Option<Vec<PathBuf>>,

    #[command(flatten)]
    pub project: ProjectOpts,

    /// File extensions to process. Defaults to vue,ts,tsx,js,jsx,scss.
    #[arg(long, value_delimiter = ',')]
    pub ext: Vec<String>,

    /// Glob patterns for files/directories to exclude.
    #[arg(short, long)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ConfigOpts {
    /// Actually modify files (default is dry-run).
    #[arg(long)]
    pub write: bool,

    #[command(flatten)]
    pub project: ProjectOpts,

    /// Print additional diagnostics to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}
