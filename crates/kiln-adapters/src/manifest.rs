//! `kiln.toml` builder manifests.
//!
//! A manifest declares the project configuration, an optional resource and
//! the builders of one scaffold run. Builders are produced in a fixed order:
//! `[[templates]]` as declared, then every file of each `[[trees]]` entry
//! (sorted by path), then `[[inserters]]` as declared.
//!
//! ```toml
//! boilerplate_file = "hack/boilerplate.go.txt"
//!
//! [project]
//! domain = "my.domain"
//! repository = "github.com/acme/op"
//!
//! [resource]
//! group = "crew"
//! version = "v1"
//! kind = "Captain"
//!
//! [[templates]]
//! path = "api/%[version]/%[kind]_types.go"
//! body_file = "templates/types.go.j2"
//! if_exists = "overwrite"
//!
//! [[trees]]
//! source = "skeleton"
//!
//! [[inserters]]
//! path = "cmd/main.go"
//! [inserters.fragments]
//! imports = ["%[group]%[version] \"github.com/acme/op/api/%[version]\"\n"]
//! ```
//!
//! Relative `body_file`, `boilerplate_file` and tree `source` paths resolve
//! against the manifest's directory.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use kiln_core::{
    application::ScaffoldError,
    domain::{
        BoilerplateMixin, Builder, BuilderError, CodeFragmentsMap, ComponentConfigMixin,
        Delimiters, DomainError, DomainMixin, HasBoilerplate, HasComponentConfig, HasDomain,
        HasMultiGroup, HasProjectName, HasRepository, HasResource, IfExistsAction,
        IfNotExistsAction, Inserter, InserterMixin, Marker, MarkerSyntax, MultiGroupMixin,
        ProjectConfig, ProjectNameMixin, RepositoryMixin, Resource, ResourceMixin, Template,
        TemplateMixin,
    },
    error::{KilnError, KilnResult},
};

/// File name `kiln apply` looks for by default.
pub const MANIFEST_FILE_NAME: &str = "kiln.toml";

const PLACEHOLDER: &str = "%[";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised `kiln.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub project: Option<ProjectConfig>,
    pub resource: Option<Resource>,
    pub boilerplate_file: Option<PathBuf>,
    #[serde(default)]
    pub markers: MarkersSection,
    #[serde(default)]
    pub templates: Vec<TemplateEntry>,
    #[serde(default)]
    pub trees: Vec<TreeEntry>,
    #[serde(default)]
    pub inserters: Vec<InserterEntry>,
}

/// `[markers]`: prefix and extra comment tokens on top of the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkersSection {
    pub prefix: Option<String>,
    /// Extension (or extension-less file name) → comment token.
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

impl MarkersSection {
    pub fn syntax(&self) -> MarkerSyntax {
        let mut syntax = MarkerSyntax::default();
        if let Some(prefix) = &self.prefix {
            syntax = syntax.with_prefix(prefix.as_str());
        }
        for (ext, token) in &self.tokens {
            syntax = syntax.with_token(ext, token.as_str());
        }
        syntax
    }
}

/// One `[[templates]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateEntry {
    /// Target path; may contain resource placeholders such as `%[kind]`.
    pub path: String,
    pub body: Option<String>,
    pub body_file: Option<PathBuf>,
    pub if_exists: Option<String>,
    pub delimiters: Option<[String; 2]>,
    /// Extra values for the render context.
    #[serde(default)]
    pub vars: Map<String, Value>,
}

/// One `[[trees]]` entry: every file below `source` becomes a template.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeEntry {
    pub source: PathBuf,
    /// Prefix for target paths. Defaults to the scaffold root.
    #[serde(default)]
    pub destination: String,
    pub if_exists: Option<String>,
    pub delimiters: Option<[String; 2]>,
    #[serde(default)]
    pub vars: Map<String, Value>,
}

/// One `[[inserters]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InserterEntry {
    pub path: String,
    pub if_not_exists: Option<String>,
    /// Marker value → fragments inserted above it.
    #[serde(default)]
    pub fragments: BTreeMap<String, Vec<String>>,
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl Manifest {
    /// Read and parse a manifest file.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> KilnResult<Self> {
        let raw = read_source(path)?;
        Self::parse(&raw, path)
    }

    /// Parse manifest text. `origin` is only used in error messages.
    pub fn parse(raw: &str, origin: &Path) -> KilnResult<Self> {
        toml::from_str(raw).map_err(|e| {
            KilnError::configuration(format!("failed to parse '{}': {e}", origin.display()))
        })
    }

    pub fn marker_syntax(&self) -> MarkerSyntax {
        self.markers.syntax()
    }

    /// Contents of `boilerplate_file`, if one is declared.
    pub fn boilerplate(&self, base_dir: &Path) -> KilnResult<Option<String>> {
        self.boilerplate_file
            .as_ref()
            .map(|file| read_source(&base_dir.join(file)))
            .transpose()
    }

    /// Every builder the manifest declares, in run order.
    #[instrument(skip_all, fields(base_dir = %base_dir.display()))]
    pub fn builders(&self, base_dir: &Path) -> KilnResult<Vec<Box<dyn Builder>>> {
        let mut builders: Vec<Box<dyn Builder>> = Vec::new();

        for entry in &self.templates {
            let body = match (&entry.body, &entry.body_file) {
                (Some(body), None) => body.clone(),
                (None, Some(file)) => read_source(&base_dir.join(file))?,
                (Some(_), Some(_)) => {
                    return Err(KilnError::configuration(format!(
                        "template '{}' sets both body and body_file",
                        entry.path
                    )));
                }
                (None, None) => {
                    return Err(KilnError::configuration(format!(
                        "template '{}' needs a body or a body_file",
                        entry.path
                    )));
                }
            };
            builders.push(Box::new(ManifestTemplate::from_parts(
                &entry.path,
                body,
                entry.if_exists.as_deref(),
                entry.delimiters.as_ref(),
                entry.vars.clone(),
            )?));
        }

        for tree in &self.trees {
            let root = base_dir.join(&tree.source);
            for (rel, body) in walk_tree(&root)? {
                let path = join_destination(&tree.destination, &rel);
                builders.push(Box::new(ManifestTemplate::from_parts(
                    &path,
                    body,
                    tree.if_exists.as_deref(),
                    tree.delimiters.as_ref(),
                    tree.vars.clone(),
                )?));
            }
        }

        let syntax = self.marker_syntax();
        for entry in &self.inserters {
            let action = match entry.if_not_exists.as_deref() {
                Some(raw) => raw.parse::<IfNotExistsAction>()?,
                None => IfNotExistsAction::default(),
            };
            builders.push(Box::new(ManifestInserter::new(
                &entry.path,
                action,
                syntax.clone(),
                entry.fragments.clone(),
            )));
        }

        debug!(count = builders.len(), "loaded builders from manifest");
        Ok(builders)
    }
}

fn read_source(path: &Path) -> KilnResult<String> {
    fs::read_to_string(path).map_err(|e| {
        let path = path.to_path_buf();
        match e.kind() {
            io::ErrorKind::NotFound => ScaffoldError::FileNotFound { path },
            _ => ScaffoldError::ReadFile {
                path,
                reason: e.to_string(),
            },
        }
        .into()
    })
}

/// Files below `root` as (forward-slash relative path, contents), sorted.
fn walk_tree(root: &Path) -> KilnResult<Vec<(String, String)>> {
    if !root.is_dir() {
        return Err(ScaffoldError::FileNotFound {
            path: root.to_path_buf(),
        }
        .into());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ScaffoldError::ReadFile {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| KilnError::internal(format!("walked outside tree root: {e}")))?;
        let rel = rel.to_string_lossy().replace('\\', "/");
        files.push((rel, read_source(entry.path())?));
    }
    Ok(files)
}

fn join_destination(destination: &str, rel: &str) -> String {
    let destination = destination.trim_end_matches('/');
    if destination.is_empty() {
        rel.to_string()
    } else {
        format!("{destination}/{rel}")
    }
}

fn unresolved(path: &str, resource: Option<&Resource>) -> Result<(), BuilderError> {
    if resource.is_none() && path.contains(PLACEHOLDER) {
        return Err(BuilderError::new(format!(
            "path '{path}' uses resource placeholders but no resource is configured"
        )));
    }
    Ok(())
}

// ── ManifestTemplate ──────────────────────────────────────────────────────────

/// A template declared in a manifest. Accepts every injected field and
/// exposes them to the template body alongside its `vars`.
#[derive(Debug, Clone)]
pub struct ManifestTemplate {
    template: TemplateMixin,
    raw_path: String,
    domain: DomainMixin,
    repository: RepositoryMixin,
    project_name: ProjectNameMixin,
    multi_group: MultiGroupMixin,
    component_config: ComponentConfigMixin,
    boilerplate: BoilerplateMixin,
    resource: ResourceMixin,
    vars: Map<String, Value>,
}

impl ManifestTemplate {
    pub fn new(path: impl Into<String>, body: impl Into<String>) -> Self {
        let raw_path = path.into();
        Self {
            template: TemplateMixin::new(raw_path.as_str(), body),
            raw_path,
            domain: DomainMixin::default(),
            repository: RepositoryMixin::default(),
            project_name: ProjectNameMixin::default(),
            multi_group: MultiGroupMixin::default(),
            component_config: ComponentConfigMixin::default(),
            boilerplate: BoilerplateMixin::default(),
            resource: ResourceMixin::default(),
            vars: Map::new(),
        }
    }

    pub fn with_if_exists_action(mut self, action: IfExistsAction) -> Self {
        self.template.set_if_exists_action(action);
        self
    }

    pub fn with_vars(mut self, vars: Map<String, Value>) -> Self {
        self.vars = vars;
        self
    }

    fn from_parts(
        path: &str,
        body: String,
        if_exists: Option<&str>,
        delimiters: Option<&[String; 2]>,
        vars: Map<String, Value>,
    ) -> KilnResult<Self> {
        let mut template = Self::new(path, body).with_vars(vars);
        if let Some(raw) = if_exists {
            let action = raw.parse::<IfExistsAction>().map_err(|e| match e {
                DomainError::UnknownIfExistsAction { action } => {
                    KilnError::from(ScaffoldError::UnknownIfExistsAction {
                        path: PathBuf::from(path),
                        action,
                    })
                }
                other => other.into(),
            })?;
            template = template.with_if_exists_action(action);
        }
        if let Some([left, right]) = delimiters {
            template.set_delimiters(left, right);
        }
        Ok(template)
    }
}

impl Builder for ManifestTemplate {
    fn path(&self) -> &Path {
        self.template.path()
    }

    fn if_exists_action(&self) -> IfExistsAction {
        self.template.if_exists_action()
    }

    fn validate(&self) -> Result<(), BuilderError> {
        unresolved(&self.raw_path, self.resource.resource())
    }

    fn as_template_mut(&mut self) -> Option<&mut dyn Template> {
        Some(self)
    }

    fn as_domain_mut(&mut self) -> Option<&mut dyn HasDomain> {
        Some(&mut self.domain)
    }

    fn as_repository_mut(&mut self) -> Option<&mut dyn HasRepository> {
        Some(&mut self.repository)
    }

    fn as_project_name_mut(&mut self) -> Option<&mut dyn HasProjectName> {
        Some(&mut self.project_name)
    }

    fn as_multi_group_mut(&mut self) -> Option<&mut dyn HasMultiGroup> {
        Some(&mut self.multi_group)
    }

    fn as_component_config_mut(&mut self) -> Option<&mut dyn HasComponentConfig> {
        Some(&mut self.component_config)
    }

    fn as_boilerplate_mut(&mut self) -> Option<&mut dyn HasBoilerplate> {
        Some(&mut self.boilerplate)
    }

    fn as_resource_mut(&mut self) -> Option<&mut dyn HasResource> {
        Some(&mut self.resource)
    }
}

impl Template for ManifestTemplate {
    fn body(&self) -> &str {
        self.template.body()
    }

    fn set_template_defaults(&mut self) -> Result<(), BuilderError> {
        if let Some(resource) = self.resource.resource() {
            let path = resource.replacer().replace(&self.raw_path);
            self.template.set_path(path);
        }
        Ok(())
    }

    fn delimiters(&self) -> Option<&Delimiters> {
        self.template.delimiters()
    }

    fn set_delimiters(&mut self, left: &str, right: &str) {
        self.template.set_delimiters(left, right);
    }

    fn render_context(&self) -> Value {
        let mut context = self.vars.clone();
        let builtins = [
            ("domain", Value::from(self.domain.domain())),
            ("repository", Value::from(self.repository.repository())),
            ("project_name", Value::from(self.project_name.project_name())),
            ("multi_group", Value::from(self.multi_group.multi_group())),
            (
                "component_config",
                Value::from(self.component_config.component_config()),
            ),
            ("boilerplate", Value::from(self.boilerplate.boilerplate())),
            (
                "resource",
                serde_json::to_value(self.resource.resource()).unwrap_or(Value::Null),
            ),
        ];
        for (key, value) in builtins {
            context.insert(key.to_string(), value);
        }
        Value::Object(context)
    }
}

// ── ManifestInserter ──────────────────────────────────────────────────────────

/// Fragments declared in a manifest, keyed by marker value.
///
/// Resource placeholders in the path and in fragments are substituted once a
/// resource is injected.
#[derive(Debug, Clone)]
pub struct ManifestInserter {
    mixin: InserterMixin,
    raw_path: String,
    syntax: MarkerSyntax,
    fragments: BTreeMap<String, Vec<String>>,
    resource: ResourceMixin,
}

impl ManifestInserter {
    pub fn new(
        path: impl Into<String>,
        if_not_exists: IfNotExistsAction,
        syntax: MarkerSyntax,
        fragments: BTreeMap<String, Vec<String>>,
    ) -> Self {
        let raw_path = path.into();
        Self {
            mixin: InserterMixin::new(raw_path.as_str()).with_if_not_exists_action(if_not_exists),
            raw_path,
            syntax,
            fragments,
            resource: ResourceMixin::default(),
        }
    }

    fn marker(&self, value: &str) -> Result<Marker, DomainError> {
        Marker::try_for_path(&self.syntax, self.mixin.path(), value)
    }
}

impl Builder for ManifestInserter {
    fn path(&self) -> &Path {
        self.mixin.path()
    }

    fn if_exists_action(&self) -> IfExistsAction {
        self.mixin.if_exists_action()
    }

    fn validate(&self) -> Result<(), BuilderError> {
        unresolved(&self.raw_path, self.resource.resource())?;
        for value in self.fragments.keys() {
            self.marker(value)
                .map_err(|e| BuilderError::new(e.to_string()))?;
        }
        Ok(())
    }

    fn as_inserter(&self) -> Option<&dyn Inserter> {
        Some(self)
    }

    fn as_resource_mut(&mut self) -> Option<&mut dyn HasResource> {
        Some(self)
    }
}

impl HasResource for ManifestInserter {
    fn inject_resource(&mut self, resource: &Resource) {
        self.resource.inject_resource(resource);
        if let Some(resource) = self.resource.resource() {
            let path = resource.replacer().replace(&self.raw_path);
            self.mixin = InserterMixin::new(path)
                .with_if_not_exists_action(self.mixin.if_not_exists_action());
        }
    }
}

impl Inserter for ManifestInserter {
    fn markers(&self) -> Vec<Marker> {
        self.fragments
            .keys()
            .filter_map(|value| self.marker(value).ok())
            .collect()
    }

    fn code_fragments(&self) -> CodeFragmentsMap {
        let replacer = self.resource.resource().map(Resource::replacer);
        self.fragments
            .iter()
            .filter_map(|(value, fragments)| {
                let marker = self.marker(value).ok()?;
                let fragments = fragments
                    .iter()
                    .map(|f| match &replacer {
                        Some(r) => r.replace(f),
                        None => f.clone(),
                    })
                    .collect();
                Some((marker, fragments))
            })
            .collect()
    }

    fn if_not_exists_action(&self) -> IfNotExistsAction {
        self.mixin.if_not_exists_action()
    }
}
