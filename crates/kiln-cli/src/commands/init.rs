//! `kiln init`: write a starter manifest.

use std::path::Path;

use tracing::info;

use crate::{
    cli::InitArgs,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// A small but complete manifest: one template that owns two markers and one
/// inserter that feeds them.
pub const STARTER_MANIFEST: &str = r#"# kiln scaffold manifest. Apply it with `kiln apply`.

[project]
domain = "example.com"
repository = "github.com/example/hello"
project_name = "hello"

# Every template renders one file. `if_exists` decides what happens when the
# file is already there: "skip" (default), "overwrite" or "error".
[[templates]]
path = "main.go"
if_exists = "skip"
body = """
package main

import (
	"fmt"
	// +kubebuilder:scaffold:imports
)

func main() {
	fmt.Println("{{ project_name }} ({{ repository }})")
	// +kubebuilder:scaffold:main
}
"""

# Inserters add fragments above markers. Fragments already present are left
# alone, so applying twice changes nothing.
[[inserters]]
path = "main.go"
if_not_exists = "error"

[inserters.fragments]
imports = ["\t\"os\"\n"]
main = ["\tos.Exit(0)\n"]
"#;

/// Create a starter manifest at `args.path`.
pub fn execute(args: InitArgs, output: OutputManager) -> CliResult<()> {
    if args.path.exists() && !args.force {
        return Err(CliError::ManifestExists { path: args.path });
    }

    write_manifest(&args.path)?;
    info!(path = %args.path.display(), "Starter manifest written");

    output.success(&format!("Manifest created at {}", args.path.display()))?;
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  kiln apply {} --dry-run", args.path.display()))?;
    output.print(&format!("  kiln apply {} --yes", args.path.display()))?;
    Ok(())
}

fn write_manifest(path: &Path) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    std::fs::write(path, STARTER_MANIFEST)
        .with_cli_context(|| format!("Failed to write manifest to '{}'", path.display()))
}

// ── tests ─────────────────────────────────────────────────────────────────────
