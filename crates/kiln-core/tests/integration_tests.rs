//! Integration tests for kiln-core's public API.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use kiln_core::domain::{DomainMixin, HasDomain, HasResource, ResourceMixin};
use kiln_core::prelude::*;

#[derive(Clone, Default)]
struct SharedFs(Arc<Mutex<BTreeMap<PathBuf, String>>>);

impl SharedFs {
    fn read(&self, path: &str) -> String {
        self.0.lock().unwrap()[Path::new(path)].clone()
    }
}

impl Filesystem for SharedFs {
    fn stat(&self, path: &Path) -> KilnResult<Option<FileStat>> {
        Ok(self.0.lock().unwrap().get(path).map(|c| FileStat {
            is_dir: false,
            len: c.len() as u64,
            mode: None,
        }))
    }

    fn read_to_string(&self, path: &Path) -> KilnResult<String> {
        self.0.lock().unwrap().get(path).cloned().ok_or_else(|| {
            ScaffoldError::OpenFile {
                path: path.to_path_buf(),
                reason: "missing".into(),
            }
            .into()
        })
    }

    fn write_file(&self, path: &Path, contents: &str, _mode: FileMode) -> KilnResult<()> {
        self.0
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn create_dir_all(&self, _path: &Path, _mode: FileMode) -> KilnResult<()> {
        Ok(())
    }
}

/// Substitutes `${key}` for every top-level string in the context.
struct DollarRenderer;

impl TemplateRenderer for DollarRenderer {
    fn render(&self, _path: &Path, template: &dyn Template) -> KilnResult<String> {
        let mut out = template.body().to_string();
        if let serde_json::Value::Object(map) = template.render_context() {
            for (key, value) in map {
                if let Some(s) = value.as_str() {
                    out = out.replace(&format!("${{{key}}}"), s);
                }
            }
        }
        Ok(out)
    }
}

// main.go with an import marker, rendered once.
struct MainGo {
    template: TemplateMixin,
    domain: DomainMixin,
}

impl MainGo {
    fn new() -> Self {
        Self {
            template: TemplateMixin::default(),
            domain: DomainMixin::default(),
        }
    }
}

impl Builder for MainGo {
    fn path(&self) -> &Path {
        self.template.path()
    }
    fn if_exists_action(&self) -> IfExistsAction {
        self.template.if_exists_action()
    }
    fn as_template_mut(&mut self) -> Option<&mut dyn Template> {
        Some(self)
    }
    fn as_domain_mut(&mut self) -> Option<&mut dyn HasDomain> {
        Some(&mut self.domain)
    }
}

impl Template for MainGo {
    fn body(&self) -> &str {
        self.template.body()
    }
    fn set_template_defaults(&mut self) -> Result<(), BuilderError> {
        self.template.set_path_if_empty("cmd/main.go");
        self.template.set_body_if_empty(
            "// ${domain}\nimport (\n\t// +kubebuilder:scaffold:imports\n)\n",
        );
        Ok(())
    }
    fn render_context(&self) -> serde_json::Value {
        serde_json::json!({ "domain": self.domain.domain() })
    }
}

// Registers the resource's API package in main.go.
struct RegisterApi {
    mixin: InserterMixin,
    resource: ResourceMixin,
}

impl RegisterApi {
    fn new() -> Self {
        Self {
            mixin: InserterMixin::new("cmd/main.go"),
            resource: ResourceMixin::default(),
        }
    }

    fn imports(&self) -> Marker {
        Marker::for_path(&MarkerSyntax::default(), self.mixin.path(), "imports")
    }
}

impl Builder for RegisterApi {
    fn path(&self) -> &Path {
        self.mixin.path()
    }
    fn if_exists_action(&self) -> IfExistsAction {
        self.mixin.if_exists_action()
    }
    fn validate(&self) -> Result<(), BuilderError> {
        match self.resource.resource() {
            Some(_) => Ok(()),
            None => Err("a resource is required".into()),
        }
    }
    fn as_inserter(&self) -> Option<&dyn Inserter> {
        Some(self)
    }
    fn as_resource_mut(&mut self) -> Option<&mut dyn HasResource> {
        Some(&mut self.resource)
    }
}

impl Inserter for RegisterApi {
    fn markers(&self) -> Vec<Marker> {
        vec![self.imports()]
    }
    fn code_fragments(&self) -> CodeFragmentsMap {
        let Some(r) = self.resource.resource() else {
            return CodeFragmentsMap::new();
        };
        let line = r
            .replacer()
            .replace("\t%[package-name]%[version] \"example.com/api/%[version]\"\n");
        CodeFragmentsMap::from([(self.imports(), vec![line])])
    }
}

fn service(fs: &SharedFs, kind: &str) -> ScaffoldService {
    ScaffoldService::new(Box::new(fs.clone()), Box::new(DollarRenderer))
        .with_config(ProjectConfig::new().with_domain("my.domain"))
        .with_resource(Resource::new("crew", "v1", kind))
}

#[test]
fn scaffold_then_extend_then_rerun() {
    let fs = SharedFs::default();

    service(&fs, "Captain")
        .execute(vec![Box::new(MainGo::new()), Box::new(RegisterApi::new())])
        .unwrap();

    let expected = "// my.domain\nimport (\n\tcrewv1 \"example.com/api/v1\"\n\t// +kubebuilder:scaffold:imports\n)\n";
    assert_eq!(fs.read("cmd/main.go"), expected);

    // Second run: the template is skipped (file exists), the fragment is
    // already present.
    let report = service(&fs, "Captain")
        .execute(vec![Box::new(MainGo::new()), Box::new(RegisterApi::new())])
        .unwrap();

    assert_eq!(fs.read("cmd/main.go"), expected);
    assert_eq!(report.skipped, vec![PathBuf::from("cmd/main.go")]);
    assert!(report.written.is_empty());
}

#[test]
fn missing_resource_fails_validation() {
    let fs = SharedFs::default();
    let err = ScaffoldService::new(Box::new(fs.clone()), Box::new(DollarRenderer))
        .execute(vec![Box::new(MainGo::new()), Box::new(RegisterApi::new())])
        .unwrap_err();

    assert!(matches!(
        err,
        KilnError::Scaffold(ScaffoldError::Validate { .. })
    ));
    assert!(fs.0.lock().unwrap().is_empty());
}

#[test]
fn file_operations_edit_scaffolded_output() {
    let fs = SharedFs::default();
    service(&fs, "Captain")
        .execute(vec![Box::new(MainGo::new())])
        .unwrap();

    FileOperations::new(&fs)
        .insert_after(Path::new("cmd/main.go"), &[("import (\n", "\t\"fmt\"\n")])
        .unwrap();

    assert!(fs.read("cmd/main.go").contains("import (\n\t\"fmt\"\n"));
}
