//! End-to-end scaffold runs through the real adapters.

use std::fs;
use std::path::Path;

use kiln_adapters::{
    DryRunFilesystem, LocalFilesystem, Manifest, ManifestTemplate, MemoryFilesystem,
    MiniJinjaRenderer, PrependBoilerplate, TrimTrailingWhitespace,
};
use kiln_core::prelude::*;
use tempfile::TempDir;

fn service(fs: &MemoryFilesystem) -> ScaffoldService {
    ScaffoldService::new(Box::new(fs.clone()), Box::new(MiniJinjaRenderer::default()))
}

fn template(path: &str, body: &str, action: IfExistsAction) -> Box<dyn Builder> {
    Box::new(ManifestTemplate::new(path, body).with_if_exists_action(action))
}

fn manifest_builders(raw: &str) -> Vec<Box<dyn Builder>> {
    Manifest::parse(raw, Path::new("kiln.toml"))
        .unwrap()
        .builders(Path::new("."))
        .unwrap()
}

const OPERATOR: &str = r#"
[project]
domain = "my.domain"
repository = "github.com/acme/op"

[resource]
group = "crew"
version = "v1"
kind = "Captain"

[[templates]]
path = "cmd/main.go"
body = """
package main

import (
	// +kubebuilder:scaffold:imports
)

// {{ repository }}
"""

[[templates]]
path = "api/%[version]/%[kind]_types.go"
body = "package {{ resource.version }}\n\ntype {{ resource.kind }} struct{}\n"

[[inserters]]
path = "cmd/main.go"
[inserters.fragments]
imports = ["\t%[group]%[version] \"github.com/acme/op/api/%[version]\"\n"]
"#;

fn operator_run(fs: &MemoryFilesystem) -> ScaffoldReport {
    let manifest = Manifest::parse(OPERATOR, Path::new("kiln.toml")).unwrap();
    let mut svc = service(fs);
    if let Some(project) = manifest.project.clone() {
        svc = svc.with_config(project);
    }
    if let Some(resource) = manifest.resource.clone() {
        svc = svc.with_resource(resource);
    }
    svc.execute(manifest.builders(Path::new(".")).unwrap())
        .unwrap()
}

#[test]
fn manifest_run_renders_and_inserts() {
    let fs = MemoryFilesystem::new();
    let report = operator_run(&fs);

    assert_eq!(report.written.len(), 2);
    assert_eq!(
        fs.read_file("cmd/main.go").unwrap(),
        "package main\n\nimport (\n\tcrewv1 \"github.com/acme/op/api/v1\"\n\t// +kubebuilder:scaffold:imports\n)\n\n// github.com/acme/op\n"
    );
    assert_eq!(
        fs.read_file("api/v1/captain_types.go").unwrap(),
        "package v1\n\ntype Captain struct{}\n"
    );
}

#[test]
fn second_run_is_idempotent() {
    let fs = MemoryFilesystem::new();
    operator_run(&fs);
    let before: Vec<_> = fs
        .list_files()
        .iter()
        .map(|p| (p.clone(), fs.read_file(p)))
        .collect();
    let writes = fs.write_count();

    let report = operator_run(&fs);

    let after: Vec<_> = fs
        .list_files()
        .iter()
        .map(|p| (p.clone(), fs.read_file(p)))
        .collect();
    assert_eq!(before, after);
    assert_eq!(fs.write_count(), writes);
    assert!(report.written.is_empty());
    assert_eq!(report.skipped.len(), 2);
}

#[test]
fn overwrite_then_skip_keeps_the_first_render() {
    let fs = MemoryFilesystem::new();
    service(&fs)
        .execute(vec![
            template("p.txt", "A", IfExistsAction::Overwrite),
            template("p.txt", "B", IfExistsAction::Skip),
        ])
        .unwrap();
    assert_eq!(fs.read_file("p.txt").as_deref(), Some("A"));
}

#[test]
fn error_model_conflict_aborts_before_writing() {
    let fs = MemoryFilesystem::new();
    let err = service(&fs)
        .execute(vec![
            template("p.txt", "A", IfExistsAction::Error),
            template("p.txt", "B", IfExistsAction::Overwrite),
        ])
        .unwrap_err();

    assert!(err.to_string().contains("model already exists"));
    assert!(fs.read_file("p.txt").is_none());
    assert_eq!(fs.write_count(), 0);
}

#[test]
fn fragments_land_above_the_marker_in_order() {
    let fs = MemoryFilesystem::new().with_file("main.go", "package main\n\n// +kubebuilder:scaffold:-\n");
    let raw = r#"
[[inserters]]
path = "main.go"
[inserters.fragments]
"-" = ["var a int\n", "var b int\n"]
"#;
    let expected = "package main\n\nvar a int\nvar b int\n// +kubebuilder:scaffold:-\n";

    service(&fs).execute(manifest_builders(raw)).unwrap();
    assert_eq!(fs.read_file("main.go").unwrap(), expected);

    let writes = fs.write_count();
    service(&fs).execute(manifest_builders(raw)).unwrap();
    assert_eq!(fs.read_file("main.go").unwrap(), expected);
    assert_eq!(fs.write_count(), writes);
}

#[test]
fn skip_leaves_existing_bytes_alone() {
    let fs = MemoryFilesystem::new().with_file("README.md", "hand written\n");
    let report = service(&fs)
        .execute(vec![template("README.md", "generated\n", IfExistsAction::Skip)])
        .unwrap();

    assert_eq!(fs.read_file("README.md").as_deref(), Some("hand written\n"));
    assert_eq!(report.skipped, vec![Path::new("README.md").to_path_buf()]);
}

#[test]
fn missing_inserter_target_depends_on_policy() {
    let strict = r#"
[[inserters]]
path = "main.go"
[inserters.fragments]
imports = ["x\n"]
"#;
    let lenient = r#"
[[inserters]]
path = "main.go"
if_not_exists = "ignore"
[inserters.fragments]
imports = ["x\n"]
"#;

    let fs = MemoryFilesystem::new();
    let err = service(&fs).execute(manifest_builders(strict)).unwrap_err();
    assert!(matches!(
        err.as_scaffold(),
        Some(ScaffoldError::FileNotFound { .. })
    ));

    let report = service(&fs).execute(manifest_builders(lenient)).unwrap();
    assert!(report.written.is_empty());
    assert!(fs.list_files().is_empty());
}

#[test]
fn post_processors_apply_per_extension() {
    let fs = MemoryFilesystem::new();
    service(&fs)
        .with_boilerplate("// Copyright Acme")
        .with_post_processor("go", Box::new(PrependBoilerplate::new("// Copyright Acme")))
        .with_post_processor("go", Box::new(TrimTrailingWhitespace))
        .execute(vec![
            template("a.go", "package a   \n\n\n", IfExistsAction::Skip),
            template("a.yaml", "a: 1   \n", IfExistsAction::Skip),
        ])
        .unwrap();

    assert_eq!(
        fs.read_file("a.go").unwrap(),
        "// Copyright Acme\n\npackage a\n"
    );
    assert_eq!(fs.read_file("a.yaml").unwrap(), "a: 1   \n");
}

#[test]
fn dry_run_plans_without_touching_disk() {
    let disk = MemoryFilesystem::new().with_file("cmd/main.go", "package main\n");
    let dry = DryRunFilesystem::new(disk.clone());

    let report = ScaffoldService::new(Box::new(dry), Box::new(MiniJinjaRenderer::default()))
        .execute(vec![
            template("cmd/main.go", "new\n", IfExistsAction::Overwrite),
            template("docs/a.md", "a\n", IfExistsAction::Skip),
        ])
        .unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(disk.read_file("cmd/main.go").as_deref(), Some("package main\n"));
    assert!(disk.read_file("docs/a.md").is_none());
}

#[test]
fn local_filesystem_run_from_manifest_on_disk() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project");
    let source = temp.path().join("source");
    fs::create_dir_all(source.join("skeleton/config")).unwrap();
    fs::write(
        source.join("skeleton/config/values.yaml"),
        "name: [[ project_name ]]\nimage: {{ .Values.image }}\n",
    )
    .unwrap();
    fs::write(
        source.join("kiln.toml"),
        r#"
[project]
project_name = "op"

[[trees]]
source = "skeleton"
delimiters = ["[[", "]]"]
"#,
    )
    .unwrap();

    let manifest = Manifest::load(&source.join("kiln.toml")).unwrap();
    let builders = manifest.builders(&source).unwrap();
    ScaffoldService::new(
        Box::new(LocalFilesystem::rooted(&project)),
        Box::new(MiniJinjaRenderer::default()),
    )
    .with_config(manifest.project.clone().unwrap_or_default())
    .execute(builders)
    .unwrap();

    assert_eq!(
        fs::read_to_string(project.join("config/values.yaml")).unwrap(),
        "name: op\nimage: {{ .Values.image }}\n"
    );
}

#[test]
fn render_errors_name_the_file() {
    let fs = MemoryFilesystem::new();
    let err = service(&fs)
        .execute(vec![template("a.go", "{{ nope }}", IfExistsAction::Skip)])
        .unwrap_err();

    assert!(matches!(
        err.as_scaffold(),
        Some(ScaffoldError::Render { path, .. }) if path == Path::new("a.go")
    ));
}

#[test]
fn unreadable_user_file_is_never_overwritten() {
    let temp = TempDir::new().unwrap();
    let user_bytes: &[u8] = b"package main\n\xff\xfe\n// +kubebuilder:scaffold:-\n";
    fs::write(temp.path().join("main.go"), user_bytes).unwrap();

    let builders = manifest_builders(
        r#"
[[templates]]
path = "main.go"
if_exists = "skip"
body = "// +kubebuilder:scaffold:-\n"

[[inserters]]
path = "main.go"
[inserters.fragments]
"-" = ["var a int\n"]
"#,
    );
    let err = ScaffoldService::new(
        Box::new(LocalFilesystem::rooted(temp.path())),
        Box::new(MiniJinjaRenderer::default()),
    )
    .execute(builders)
    .unwrap_err();

    assert!(matches!(
        err.as_scaffold(),
        Some(ScaffoldError::ReadFile { path, .. }) if path == Path::new("main.go")
    ));
    assert_eq!(fs::read(temp.path().join("main.go")).unwrap(), user_bytes);
}

#[test]
fn fragment_without_newline_keeps_the_marker_usable() {
    let fs = MemoryFilesystem::new();
    let raw = r#"
[[templates]]
path = "main.go"
body = "package main\n// +kubebuilder:scaffold:-\n"

[[inserters]]
path = "main.go"
[inserters.fragments]
"-" = ["var a int"]
"#;
    service(&fs).execute(manifest_builders(raw)).unwrap();
    let first = fs.read_file("main.go").unwrap();
    assert_eq!(first, "package main\nvar a int\n// +kubebuilder:scaffold:-\n");

    service(&fs).execute(manifest_builders(raw)).unwrap();
    assert_eq!(fs.read_file("main.go").unwrap(), first);
}
