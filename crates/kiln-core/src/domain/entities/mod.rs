pub mod file_model;
pub mod project_config;
pub mod resource;

pub use file_model::{FileModel, FileModels, Universe};
pub use project_config::ProjectConfig;
pub use resource::{Replacer, Resource};
