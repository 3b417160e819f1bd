//! Application services (use case orchestrators).

pub mod operations;
pub mod scaffold_service;

pub use operations::FileOperations;
pub use scaffold_service::{ScaffoldReport, ScaffoldService};
