//! Infrastructure adapters for kiln.
//!
//! This crate implements the ports defined in `kiln_core::application::ports`
//! and loads `kiln.toml` manifests into builders. It contains all I/O and
//! every third-party engine the core stays independent of.

pub mod filesystem;
pub mod manifest;
pub mod postprocess;
pub mod renderer;

// Re-export commonly used adapters
pub use filesystem::{DryRunFilesystem, LocalFilesystem, MemoryFilesystem, PlannedWrite};
pub use manifest::{MANIFEST_FILE_NAME, Manifest, ManifestInserter, ManifestTemplate};
pub use postprocess::{PrependBoilerplate, TrimTrailingWhitespace};
pub use renderer::MiniJinjaRenderer;
