//! Application layer errors.
//!
//! These errors represent failures while orchestrating a scaffold run.
//! Failures of the domain model itself are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::BuilderError;
use crate::error::ErrorCategory;

/// Errors raised while executing builders and persisting their output.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScaffoldError {
    // ========================================================================
    // Builder hooks
    // ========================================================================
    #[error("{}: validation failed: {source}", path.display())]
    Validate {
        path: PathBuf,
        #[source]
        source: BuilderError,
    },

    #[error("{}: unable to set template defaults: {source}", path.display())]
    SetTemplateDefaults {
        path: PathBuf,
        #[source]
        source: BuilderError,
    },

    #[error("{}: unable to render template: {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error("{}: post-processing failed: {source}", path.display())]
    PostProcess {
        path: PathBuf,
        #[source]
        source: BuilderError,
    },

    #[error("plugin '{name}' failed: {source}")]
    Plugin {
        name: String,
        #[source]
        source: BuilderError,
    },

    // ========================================================================
    // Filesystem
    // ========================================================================
    #[error("{}: unable to check existence: {reason}", path.display())]
    ExistsFile { path: PathBuf, reason: String },

    #[error("{}: unable to open: {reason}", path.display())]
    OpenFile { path: PathBuf, reason: String },

    #[error("{}: unable to read: {reason}", path.display())]
    ReadFile { path: PathBuf, reason: String },

    #[error("{}: unable to create: {reason}", path.display())]
    CreateFile { path: PathBuf, reason: String },

    #[error("{}: unable to write: {reason}", path.display())]
    WriteFile { path: PathBuf, reason: String },

    #[error("{}: unable to close: {reason}", path.display())]
    CloseFile { path: PathBuf, reason: String },

    #[error("{}: unable to create directory: {reason}", path.display())]
    CreateDirectory { path: PathBuf, reason: String },

    // ========================================================================
    // Conflict resolution
    // ========================================================================
    #[error("{}: model already exists", path.display())]
    ModelAlreadyExists { path: PathBuf },

    #[error("{}: unknown if-exists action '{action}'", path.display())]
    UnknownIfExistsAction { path: PathBuf, action: String },

    #[error("{}: file already exists", path.display())]
    FileAlreadyExists { path: PathBuf },

    #[error("{}: file not found", path.display())]
    FileNotFound { path: PathBuf },

    // ========================================================================
    // File operations
    // ========================================================================
    #[error("{}: target not found: {target:?}", path.display())]
    TargetNotFound { path: PathBuf, target: String },

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ScaffoldError {
    /// Path the error is about, when there is one.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Validate { path, .. }
            | Self::SetTemplateDefaults { path, .. }
            | Self::Render { path, .. }
            | Self::PostProcess { path, .. }
            | Self::ExistsFile { path, .. }
            | Self::OpenFile { path, .. }
            | Self::ReadFile { path, .. }
            | Self::CreateFile { path, .. }
            | Self::WriteFile { path, .. }
            | Self::CloseFile { path, .. }
            | Self::CreateDirectory { path, .. }
            | Self::ModelAlreadyExists { path }
            | Self::UnknownIfExistsAction { path, .. }
            | Self::FileAlreadyExists { path }
            | Self::FileNotFound { path }
            | Self::TargetNotFound { path, .. } => Some(path),
            Self::Plugin { .. } | Self::InvalidPattern { .. } => None,
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Validate { .. } | Self::SetTemplateDefaults { .. } => vec![
                "Check the builder's inputs in your manifest".into(),
            ],
            Self::Render { .. } => vec![
                "Check the template syntax and that every variable it uses is defined".into(),
                "Templates with custom delimiters must use them consistently".into(),
            ],
            Self::ModelAlreadyExists { path } => vec![
                format!(
                    "Two builders target {}; set if_exists = \"skip\" or \"overwrite\" on the later one",
                    path.display()
                ),
            ],
            Self::FileAlreadyExists { path } => vec![
                format!("{} already exists on disk", path.display()),
                "Remove it, or change the builder's if_exists policy".into(),
            ],
            Self::FileNotFound { path } => vec![
                format!("Nothing scaffolded or present at {}", path.display()),
                "Scaffold the file first, or set if_not_exists = \"ignore\"".into(),
            ],
            Self::UnknownIfExistsAction { .. } => {
                vec!["Valid if-exists actions: skip, error, overwrite".into()]
            }
            Self::TargetNotFound { target, .. } => vec![
                format!("The file does not contain {target:?}"),
                "Has it been edited since it was scaffolded?".into(),
            ],
            Self::InvalidPattern { .. } => vec!["Check the regular expression syntax".into()],
            Self::ExistsFile { .. }
            | Self::OpenFile { .. }
            | Self::ReadFile { .. }
            | Self::CreateFile { .. }
            | Self::WriteFile { .. }
            | Self::CloseFile { .. }
            | Self::CreateDirectory { .. } => vec![
                "Check that you have permissions on the output directory".into(),
                "Ensure there is enough disk space".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validate { .. } | Self::UnknownIfExistsAction { .. } | Self::InvalidPattern { .. } => {
                ErrorCategory::Validation
            }
            Self::ModelAlreadyExists { .. } | Self::FileAlreadyExists { .. } => {
                ErrorCategory::Conflict
            }
            Self::FileNotFound { .. } | Self::TargetNotFound { .. } => ErrorCategory::NotFound,
            Self::SetTemplateDefaults { .. }
            | Self::Render { .. }
            | Self::PostProcess { .. }
            | Self::Plugin { .. } => ErrorCategory::Validation,
            _ => ErrorCategory::Internal,
        }
    }
}
