use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::entities::{project_config::ProjectConfig, resource::Resource};
use crate::domain::value_objects::IfExistsAction;

/// The in-memory result for one path during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileModel {
    pub path: PathBuf,
    pub contents: String,
    pub if_exists_action: IfExistsAction,
}

impl FileModel {
    pub fn new(
        path: impl Into<PathBuf>,
        contents: impl Into<String>,
        if_exists_action: IfExistsAction,
    ) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
            if_exists_action,
        }
    }
}

/// Path → model, iterated in path order.
pub type FileModels = BTreeMap<PathBuf, FileModel>;

/// Run-scoped state handed to plugins after all builders ran.
///
/// Plugins may read the injected inputs and add, change or drop file models;
/// whatever is left in `files` gets written.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    pub config: Option<ProjectConfig>,
    pub boilerplate: Option<String>,
    pub resource: Option<Resource>,
    pub files: FileModels,
}

impl Universe {
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&FileModel> {
        self.files.get(path.as_ref())
    }

    pub fn insert_file(&mut self, model: FileModel) -> Option<FileModel> {
        self.files.insert(model.path.clone(), model)
    }
}
