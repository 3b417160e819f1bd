//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `kiln-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by the orchestrator, implemented by
//!   infrastructure
//!   - `Filesystem`: reads, writes, existence checks
//!   - `TemplateRenderer`: template rendering
//!   - `PostProcessor`: per-extension content rewriting
//!   - `Plugin`: whole-run transformations
//!
//! - **Driving (Input) Ports**: called by the outside world, implemented by
//!   services (`ScaffoldService::execute`, `FileOperations`)

pub mod output;

pub use output::{FileStat, Filesystem, Plugin, PostProcessor, TemplateRenderer};

#[cfg(test)]
pub use output::MockFilesystem;
