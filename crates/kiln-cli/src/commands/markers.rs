//! `kiln markers`: list the marker lines a file carries.

use std::path::Path;

use serde_json::json;

use kiln_adapters::Manifest;
use kiln_core::domain::{Marker, MarkerSyntax};

use crate::{
    cli::MarkersArgs,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(args: MarkersArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let syntax = marker_syntax(&args, &config)?;
    let content = std::fs::read_to_string(&args.file)
        .with_cli_context(|| format!("Failed to read '{}'", args.file.display()))?;

    let found = syntax.scan(&args.file, &content)?;

    if output.is_json() {
        let entries: Vec<_> = found
            .iter()
            .map(|(line, marker)| {
                json!({
                    "line": line,
                    "value": marker.value(),
                    "marker": marker.to_string(),
                })
            })
            .collect();
        output.json(&json!({
            "file": args.file.display().to_string(),
            "markers": entries,
        }))?;
        return Ok(());
    }

    if found.is_empty() {
        output.info(&format!(
            "No '{}' markers in {}",
            syntax.prefix(),
            args.file.display()
        ))?;
        return Ok(());
    }

    output.header(&format!("{}:", args.file.display()))?;
    for line in format_lines(&found) {
        output.print(&line)?;
    }
    Ok(())
}

/// `--manifest` wins, then the configured manifest if it exists, then the
/// built-in table. `--prefix` applies on top of whichever was chosen.
fn marker_syntax(args: &MarkersArgs, config: &AppConfig) -> CliResult<MarkerSyntax> {
    let manifest_path = args.manifest.as_deref().or_else(|| {
        let default = config.scaffold.manifest.as_path();
        default.is_file().then_some(default)
    });

    let syntax = match manifest_path {
        Some(path) => load_syntax(path)?,
        None => MarkerSyntax::default(),
    };

    Ok(match &args.prefix {
        Some(prefix) => syntax.with_prefix(prefix.as_str()),
        None => syntax,
    })
}

fn load_syntax(path: &Path) -> CliResult<MarkerSyntax> {
    Ok(Manifest::load(path)?.marker_syntax())
}

/// `<line>  <marker>` rows with the line numbers right-aligned.
fn format_lines(found: &[(usize, Marker)]) -> Vec<String> {
    let width = found
        .last()
        .map(|(line, _)| line.to_string().len())
        .unwrap_or(1);
    found
        .iter()
        .map(|(line, marker)| format!("  {line:>width$}  {marker}"))
        .collect()
}
