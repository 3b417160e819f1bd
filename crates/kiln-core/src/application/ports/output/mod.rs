//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what a scaffold run needs from the outside world.
//! The `kiln-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{BuilderError, FileMode, Template, Universe};
use crate::error::KilnResult;

/// Metadata returned by [`Filesystem::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_dir: bool,
    pub len: u64,
    /// Permission bits, where the platform has them.
    pub mode: Option<FileMode>,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kiln_adapters::filesystem::LocalFilesystem` (production)
/// - `kiln_adapters::filesystem::MemoryFilesystem` (testing)
/// - `kiln_adapters::filesystem::DryRunFilesystem` (preview)
///
/// ## Design Notes
///
/// - Paths are relative to the adapter's root
/// - Each failing step maps to its own `ScaffoldError` kind
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Metadata for `path`, or `None` if nothing exists there.
    fn stat(&self, path: &Path) -> KilnResult<Option<FileStat>>;

    /// Whether `path` exists.
    fn exists(&self, path: &Path) -> KilnResult<bool> {
        Ok(self.stat(path)?.is_some())
    }

    fn read_to_string(&self, path: &Path) -> KilnResult<String>;

    /// Create or truncate `path` and write `contents` with the given mode.
    fn write_file(&self, path: &Path, contents: &str, mode: FileMode) -> KilnResult<()>;

    /// Create a directory and all missing parents. Existing directories are
    /// fine.
    fn create_dir_all(&self, path: &Path, mode: FileMode) -> KilnResult<()>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `kiln_adapters::renderer::MiniJinjaRenderer`
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` into full file content. `path` names the template
    /// in error messages.
    fn render(&self, path: &Path, template: &dyn Template) -> KilnResult<String>;
}

/// Port for rewriting content right before it is stored in the model.
///
/// Registered per file extension on the orchestrator.
pub trait PostProcessor: Send + Sync {
    fn process(&self, path: &Path, contents: String) -> Result<String, BuilderError>;
}

/// Port for whole-run transformations, applied after every builder.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn pipe(&self, universe: &mut Universe) -> Result<(), BuilderError>;
}
