//! Application layer for kiln.
//!
//! This layer contains:
//! - **Services**: the scaffold orchestrator and in-place file operations
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: orchestration error types
//!
//! The application layer drives the domain layer. Conflict resolution lives
//! here because it needs the filesystem; everything else is in
//! `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{FileOperations, ScaffoldReport, ScaffoldService};

pub use ports::{FileStat, Filesystem, Plugin, PostProcessor, TemplateRenderer};

pub use error::ScaffoldError;
