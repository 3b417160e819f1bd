//! Scaffold Service - main application orchestrator.
//!
//! One call to [`ScaffoldService::execute`] is one run:
//! 1. Inject shared fields into every builder, in order
//! 2. Validate the builder
//! 3. Render templates / merge inserter fragments into the in-memory model
//! 4. Pipe the whole model through the registered plugins
//! 5. Write every model to the filesystem, in path order
//!
//! The run is fail-fast. Files written before a failure stay written.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    application::{
        ScaffoldError,
        ports::{Filesystem, Plugin, PostProcessor, TemplateRenderer},
    },
    domain::{
        Builder, DomainValidator as validator, FileMode, FileModel, FileModels, IfExistsAction,
        IfNotExistsAction, Injector, ProjectConfig, Resource, Universe, insertion,
    },
    error::KilnResult,
};

/// What a run did on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub run_id: Uuid,
    /// Files created or overwritten.
    pub written: Vec<PathBuf>,
    /// Files that already existed and were left alone.
    pub skipped: Vec<PathBuf>,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
    post_processors: BTreeMap<String, Vec<Box<dyn PostProcessor>>>,
    plugins: Vec<Box<dyn Plugin>>,
    directory_mode: FileMode,
    file_mode: FileMode,
    config: Option<ProjectConfig>,
    boilerplate: Option<String>,
    resource: Option<Resource>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use kiln_core::application::ScaffoldService;
    ///
    /// let service = ScaffoldService::new(
    ///     filesystem, // impl Filesystem
    ///     renderer,   // impl TemplateRenderer
    /// )
    /// .with_config(config)
    /// .with_boilerplate(header);
    ///
    /// service.execute(builders)?;
    /// ```
    pub fn new(filesystem: Box<dyn Filesystem>, renderer: Box<dyn TemplateRenderer>) -> Self {
        Self {
            filesystem,
            renderer,
            post_processors: BTreeMap::new(),
            plugins: Vec::new(),
            directory_mode: FileMode::DEFAULT_DIRECTORY,
            file_mode: FileMode::DEFAULT_FILE,
            config: None,
            boilerplate: None,
            resource: None,
        }
    }

    pub fn with_config(mut self, config: ProjectConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_boilerplate(mut self, boilerplate: impl Into<String>) -> Self {
        self.boilerplate = Some(boilerplate.into());
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource.with_defaults());
        self
    }

    pub fn with_directory_permissions(mut self, mode: FileMode) -> Self {
        self.directory_mode = mode;
        self
    }

    pub fn with_file_permissions(mut self, mode: FileMode) -> Self {
        self.file_mode = mode;
        self
    }

    /// Run `processor` over every rendered or updated file with the given
    /// extension. Processors for one extension run in registration order.
    pub fn with_post_processor(
        mut self,
        extension: &str,
        processor: Box<dyn PostProcessor>,
    ) -> Self {
        self.post_processors
            .entry(extension.trim_start_matches('.').to_ascii_lowercase())
            .or_default()
            .push(processor);
        self
    }

    pub fn with_plugin(mut self, plugin: Box<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Run every builder in order and persist the result.
    #[instrument(skip_all, fields(run_id = tracing::field::Empty, builders = builders.len()))]
    pub fn execute(&self, builders: Vec<Box<dyn Builder>>) -> KilnResult<ScaffoldReport> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        if let Some(config) = &self.config {
            validator::validate_config(config)?;
        }
        if let Some(resource) = &self.resource {
            validator::validate_resource(resource)?;
        }

        let injector = Injector::new(
            self.config.clone(),
            self.boilerplate.clone(),
            self.resource.clone(),
        );
        let mut models = FileModels::new();

        for mut builder in builders {
            injector.inject_into(builder.as_mut());

            if let Err(source) = builder.validate() {
                return Err(ScaffoldError::Validate {
                    path: builder.path().to_path_buf(),
                    source,
                }
                .into());
            }

            self.build_file_model(builder.as_mut(), &mut models)?;
            self.update_file_model(builder.as_ref(), &mut models)?;
        }

        let mut universe = Universe {
            config: self.config.clone(),
            boilerplate: self.boilerplate.clone(),
            resource: self.resource.clone(),
            files: models,
        };
        for plugin in &self.plugins {
            debug!(plugin = plugin.name(), "piping universe");
            plugin
                .pipe(&mut universe)
                .map_err(|source| ScaffoldError::Plugin {
                    name: plugin.name().to_string(),
                    source,
                })?;
        }

        let mut report = ScaffoldReport {
            run_id,
            ..ScaffoldReport::default()
        };
        for model in universe.files.values() {
            self.write_file(model, &mut report)?;
        }

        info!(
            written = report.written.len(),
            skipped = report.skipped.len(),
            "Scaffold completed successfully"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Render a template builder into the model map.
    fn build_file_model(&self, builder: &mut dyn Builder, models: &mut FileModels) -> KilnResult<()> {
        let Some(template) = builder.as_template_mut() else {
            return Ok(());
        };
        if let Err(source) = template.set_template_defaults() {
            return Err(ScaffoldError::SetTemplateDefaults {
                path: builder.path().to_path_buf(),
                source,
            }
            .into());
        }

        let path = builder.path().to_path_buf();
        let action = builder.if_exists_action();

        if let Some(existing) = models.get(&path) {
            // A model claimed with Error stays unique whatever comes later.
            if existing.if_exists_action == IfExistsAction::Error {
                return Err(ScaffoldError::ModelAlreadyExists { path }.into());
            }
            match action {
                IfExistsAction::Skip => {
                    debug!(path = %path.display(), "model exists, keeping the first one");
                    return Ok(());
                }
                IfExistsAction::Error => {
                    return Err(ScaffoldError::ModelAlreadyExists { path }.into());
                }
                IfExistsAction::Overwrite => {
                    debug!(path = %path.display(), "model exists, replacing it");
                }
            }
        }

        let Some(template) = builder.as_template_mut() else {
            return Ok(());
        };
        let rendered = self.renderer.render(&path, &*template)?;
        let contents = self.post_process(&path, rendered)?;

        models.insert(path.clone(), FileModel::new(path, contents, action));
        Ok(())
    }

    /// Merge an inserter's fragments into the best-known content for its path.
    fn update_file_model(&self, builder: &dyn Builder, models: &mut FileModels) -> KilnResult<()> {
        let Some(inserter) = builder.as_inserter() else {
            return Ok(());
        };
        let path = builder.path().to_path_buf();

        let Some(mut model) =
            self.load_previous_model(&path, inserter.if_not_exists_action(), models)?
        else {
            debug!(path = %path.display(), "nothing to insert into, inserter ignored");
            return Ok(());
        };

        let Some(merged) = insertion::merge_fragments(
            &model.contents,
            &inserter.markers(),
            inserter.code_fragments(),
        ) else {
            debug!(path = %path.display(), "all fragments already present");
            return Ok(());
        };

        model.contents = self.post_process(&path, merged)?;
        model.if_exists_action = IfExistsAction::Overwrite;
        models.insert(path, model);
        Ok(())
    }

    /// The content an inserter works on: the model of this run, the file on
    /// disk, or nothing.
    fn load_previous_model(
        &self,
        path: &Path,
        if_not_exists: IfNotExistsAction,
        models: &FileModels,
    ) -> KilnResult<Option<FileModel>> {
        if let Some(model) = models.get(path) {
            if !self.filesystem.exists(path)? {
                return Ok(Some(model.clone()));
            }

            return match model.if_exists_action {
                IfExistsAction::Skip => self.load_model_from_file(path).map(Some),
                IfExistsAction::Error => Err(ScaffoldError::FileAlreadyExists {
                    path: path.to_path_buf(),
                }
                .into()),
                IfExistsAction::Overwrite => Ok(Some(model.clone())),
            };
        }

        if self.filesystem.exists(path)? {
            return self.load_model_from_file(path).map(Some);
        }

        match if_not_exists {
            IfNotExistsAction::Error => Err(ScaffoldError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into()),
            IfNotExistsAction::Ignore => Ok(None),
        }
    }

    fn load_model_from_file(&self, path: &Path) -> KilnResult<FileModel> {
        let contents = self.filesystem.read_to_string(path)?;
        Ok(FileModel::new(path, contents, IfExistsAction::default()))
    }

    fn post_process(&self, path: &Path, mut contents: String) -> KilnResult<String> {
        let Some(ext) = path.extension() else {
            return Ok(contents);
        };
        let ext = ext.to_string_lossy().to_ascii_lowercase();

        for processor in self.post_processors.get(&ext).into_iter().flatten() {
            contents = processor.process(path, contents).map_err(|source| {
                ScaffoldError::PostProcess {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        }
        Ok(contents)
    }

    /// Persist one model, re-checking existence right before writing.
    fn write_file(&self, model: &FileModel, report: &mut ScaffoldReport) -> KilnResult<()> {
        let path = &model.path;

        if self.filesystem.exists(path)? {
            match model.if_exists_action {
                IfExistsAction::Overwrite => {}
                IfExistsAction::Skip => {
                    info!(path = %path.display(), "exists, skipped");
                    report.skipped.push(path.clone());
                    return Ok(());
                }
                IfExistsAction::Error => {
                    return Err(ScaffoldError::FileAlreadyExists { path: path.clone() }.into());
                }
            }
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.filesystem.create_dir_all(parent, self.directory_mode)?;
        }
        self.filesystem
            .write_file(path, &model.contents, self.file_mode)?;

        info!(path = %path.display(), bytes = model.contents.len(), "wrote file");
        report.written.push(path.clone());
        Ok(())
    }
}
