//! Implementation of the `kiln apply` command.
//!
//! Responsibility: load the manifest, wire adapters into a
//! [`ScaffoldService`] and report what happened. No scaffolding logic lives
//! here.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{debug, field, info, instrument};

use kiln_adapters::{
    DryRunFilesystem, LocalFilesystem, Manifest, MiniJinjaRenderer, PrependBoilerplate,
    TrimTrailingWhitespace,
};
use kiln_core::{
    application::{Filesystem, ScaffoldReport, ScaffoldService},
    domain::FileMode,
};

use crate::{
    cli::{ApplyArgs, global::GlobalArgs},
    config::{AppConfig, ScaffoldConfig},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `kiln apply` command.
///
/// 1. Resolve and parse the manifest
/// 2. Expand it into builders (template bodies and trees are read here)
/// 3. Confirm with the user unless `--yes`, `--dry-run` or `--quiet`
/// 4. Run the builders through a [`ScaffoldService`]
/// 5. Print the written and skipped files
#[instrument(skip_all, fields(manifest, root))]
pub fn execute(
    args: ApplyArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let manifest_path = args
        .manifest
        .unwrap_or_else(|| config.scaffold.manifest.clone());
    let root = args.dir.unwrap_or_else(|| config.scaffold.root.clone());
    tracing::Span::current()
        .record("manifest", field::display(manifest_path.display()))
        .record("root", field::display(root.display()));

    // 1. Manifest
    if !manifest_path.is_file() {
        return Err(CliError::ManifestNotFound {
            path: manifest_path,
        });
    }
    let manifest = Manifest::load(&manifest_path)?;
    let base_dir = base_dir(&manifest_path);

    // 2. Builders
    let builders = manifest.builders(base_dir)?;
    let boilerplate = manifest.boilerplate(base_dir)?;
    debug!(builders = builders.len(), "Manifest expanded");

    // 3. Confirm
    if !args.dry_run && !args.yes && !global.quiet {
        output.header(&format!(
            "Applying {} builder(s) from {} into {}",
            builders.len(),
            manifest_path.display(),
            root.display(),
        ))?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    // 4. Run
    let local = LocalFilesystem::rooted(&root);
    let filesystem: Box<dyn Filesystem> = if args.dry_run {
        Box::new(DryRunFilesystem::new(local))
    } else {
        Box::new(local)
    };

    let mut service = ScaffoldService::new(filesystem, Box::new(MiniJinjaRenderer::default()));
    if let Some(project) = manifest.project.clone() {
        service = service.with_config(project);
    }
    if let Some(resource) = manifest.resource.clone() {
        service = service.with_resource(resource);
    }
    if let Some(header) = boilerplate.clone() {
        service = service.with_boilerplate(header);
    }
    service = with_permissions(service, &config.scaffold);
    service = with_post_processors(service, &config.scaffold, boilerplate.as_deref());

    info!(dry_run = args.dry_run, "Scaffold started");
    let report = service.execute(builders)?;
    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "Scaffold completed"
    );

    // 5. Report
    print_report(&report, &root, args.dry_run, &output)
}

/// Relative paths inside a manifest are resolved against its directory.
fn base_dir(manifest_path: &Path) -> &Path {
    match manifest_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn with_permissions(service: ScaffoldService, scaffold: &ScaffoldConfig) -> ScaffoldService {
    service
        .with_directory_permissions(FileMode::new(scaffold.directory_mode))
        .with_file_permissions(FileMode::new(scaffold.file_mode))
}

fn with_post_processors(
    mut service: ScaffoldService,
    scaffold: &ScaffoldConfig,
    boilerplate: Option<&str>,
) -> ScaffoldService {
    // Boilerplate goes on first so whitespace trimming also covers it.
    if let Some(header) = boilerplate {
        for ext in &scaffold.prepend_boilerplate {
            service = service.with_post_processor(ext, Box::new(PrependBoilerplate::new(header)));
        }
    }
    for ext in &scaffold.trim_trailing_whitespace {
        service = service.with_post_processor(ext, Box::new(TrimTrailingWhitespace));
    }
    service
}

fn print_report(
    report: &ScaffoldReport,
    root: &Path,
    dry_run: bool,
    output: &OutputManager,
) -> CliResult<()> {
    if output.is_json() {
        output.json(&json!({
            "run_id": report.run_id.to_string(),
            "root": root.display().to_string(),
            "dry_run": dry_run,
            "written": paths(&report.written),
            "skipped": paths(&report.skipped),
        }))?;
        return Ok(());
    }

    for path in &report.written {
        if dry_run {
            output.info(&format!("would write {}", path.display()))?;
        } else {
            output.success(&format!("wrote {}", path.display()))?;
        }
    }
    for path in &report.skipped {
        output.print(&format!("  skipped {} (exists)", path.display()))?;
    }

    let verb = if dry_run { "would write" } else { "wrote" };
    output.print("")?;
    output.print(&format!(
        "{verb} {} file(s), skipped {}",
        report.written.len(),
        report.skipped.len()
    ))?;
    if dry_run {
        output.warning("dry run: nothing was written")?;
    }
    Ok(())
}

fn paths(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

// ── Confirmation ──────────────────────────────────────────────────────────────

/// Ask before touching disk. Refuses outright when stdin is not a terminal.
fn confirm() -> CliResult<bool> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::InvalidInput {
            message: "confirmation needs a terminal; pass --yes to apply without asking".into(),
            source: None,
        });
    }
    prompt()
}

#[cfg(feature = "interactive")]
fn prompt() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: "failed to read confirmation".into(),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn prompt() -> CliResult<bool> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_dir_of_bare_file_is_cwd() {
        assert_eq!(base_dir(Path::new("kiln.toml")), Path::new("."));
    }

    #[test]
    fn base_dir_of_nested_manifest() {
        assert_eq!(
            base_dir(Path::new("scaffolds/api/kiln.toml")),
            Path::new("scaffolds/api")
        );
    }

    #[test]
    fn paths_are_rendered_for_json() {
        let rendered = paths(&[PathBuf::from("cmd/main.go"), PathBuf::from("go.mod")]);
        assert_eq!(rendered, vec!["cmd/main.go", "go.mod"]);
    }
}
