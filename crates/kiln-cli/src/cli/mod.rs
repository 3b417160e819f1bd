//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kiln",
    bin_name = "kiln",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Marker-driven, idempotent project scaffolding",
    long_about = "kiln renders templates into files and inserts code fragments \
                  above marker comments, so the same manifest can be applied \
                  again and again without duplicating anything.",
    after_help = "EXAMPLES:\n\
        \x20 kiln init\n\
        \x20 kiln apply --yes\n\
        \x20 kiln apply scaffolds/api.toml --dir ./operator --dry-run\n\
        \x20 kiln markers cmd/main.go\n\
        \x20 kiln completions bash > /usr/share/bash-completion/completions/kiln",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run every builder declared in a manifest.
    #[command(
        visible_alias = "a",
        about = "Apply a scaffold manifest",
        after_help = "EXAMPLES:\n\
            \x20 kiln apply                       # ./kiln.toml into .\n\
            \x20 kiln apply api.toml --dir out    # write below ./out\n\
            \x20 kiln apply --dry-run             # show what would change"
    )]
    Apply(ApplyArgs),

    /// Write a starter manifest.
    #[command(
        about = "Create a starter kiln.toml",
        after_help = "EXAMPLES:\n\
            \x20 kiln init\n\
            \x20 kiln init scaffolds/api.toml --force"
    )]
    Init(InitArgs),

    /// List marker lines in a file.
    #[command(
        visible_alias = "m",
        about = "List scaffold markers in a file",
        after_help = "EXAMPLES:\n\
            \x20 kiln markers cmd/main.go\n\
            \x20 kiln markers config/rbac/role.yaml --prefix kiln"
    )]
    Markers(MarkersArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kiln completions bash > ~/.local/share/bash-completion/completions/kiln\n\
            \x20 kiln completions zsh  > ~/.zfunc/_kiln\n\
            \x20 kiln completions fish > ~/.config/fish/completions/kiln.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the kiln configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 kiln config get scaffold.file_mode\n\
            \x20 kiln config list\n\
            \x20 kiln config path"
    )]
    Config(ConfigCommands),
}

// ── apply ─────────────────────────────────────────────────────────────────────

/// Arguments for `kiln apply`.
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Manifest to apply. Defaults to `scaffold.manifest` from the config.
    #[arg(value_name = "MANIFEST", help = "Manifest file (default: kiln.toml)")]
    pub manifest: Option<PathBuf>,

    /// Root every generated path is resolved against.
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        help = "Output directory (default: scaffold.root)"
    )]
    pub dir: Option<PathBuf>,

    #[arg(long = "dry-run", help = "Show what would be written without writing")]
    pub dry_run: bool,

    #[arg(short = 'y', long = "yes", help = "Skip confirmation and write immediately")]
    pub yes: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(
        value_name = "PATH",
        default_value = "kiln.toml",
        help = "Where to write the manifest"
    )]
    pub path: PathBuf,

    #[arg(short = 'f', long = "force", help = "Overwrite an existing manifest")]
    pub force: bool,
}

// ── markers ───────────────────────────────────────────────────────────────────

/// Arguments for `kiln markers`.
#[derive(Debug, Args)]
pub struct MarkersArgs {
    #[arg(value_name = "FILE", help = "File to scan")]
    pub file: PathBuf,

    /// Manifest whose `[markers]` section defines prefix and comment tokens.
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "MANIFEST",
        help = "Take marker syntax from this manifest"
    )]
    pub manifest: Option<PathBuf>,

    #[arg(long = "prefix", value_name = "PREFIX", help = "Marker prefix to look for")]
    pub prefix: Option<String>,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one value, e.g. `scaffold.root`.
    Get { key: String },
    /// Print the effective configuration as TOML.
    List,
    /// Print the default configuration file location.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
