// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Failure reported by a builder hook (`validate`, `set_template_defaults`),
/// a post-processor or a plugin.
///
/// Builders are written by plugin authors, so the payload is a plain message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct BuilderError {
    message: String,
}

impl BuilderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for BuilderError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for BuilderError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Root domain error type.
///
/// All errors are:
/// - Cloneable
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Authoring errors
    // ========================================================================
    #[error("no comment token registered for extension '{extension}' (path: {path})")]
    UnsupportedMarkerExtension { path: String, extension: String },

    #[error("unknown if-exists action '{action}'")]
    UnknownIfExistsAction { action: String },

    #[error("unknown if-not-exists action '{action}'")]
    UnknownIfNotExistsAction { action: String },

    // ========================================================================
    // Validation errors
    // ========================================================================
    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("invalid project configuration: {0}")]
    InvalidConfig(String),

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnsupportedMarkerExtension { extension, .. } => vec![
                format!("Register a comment token for '{extension}' in MarkerSyntax"),
                "Markers can only be placed in files whose comment syntax is known".into(),
            ],
            Self::UnknownIfExistsAction { .. } => vec![
                "Valid if-exists actions: skip, error, overwrite".into(),
            ],
            Self::UnknownIfNotExistsAction { .. } => {
                vec!["Valid if-not-exists actions: error, ignore".into()]
            }
            Self::InvalidResource(msg) => vec![
                "Check the [resource] section of your manifest".into(),
                format!("Details: {msg}"),
            ],
            Self::InvalidConfig(msg) => vec![
                "Check the [project] section of your manifest".into(),
                format!("Details: {msg}"),
            ],
            Self::MissingRequiredField { field } => {
                vec![format!("Provide a value for '{field}'")]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedMarkerExtension { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Internal,
}
