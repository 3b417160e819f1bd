//! kiln core - scaffolding engine
//!
//! This crate provides the domain and application layers of kiln, following
//! hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             kiln-cli (CLI)              │
//! │        manifest → builders → run        │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (ScaffoldService, FileOperations)     │
//! │     conflict resolution, persistence    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (Filesystem, TemplateRenderer, Plugin)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     kiln-adapters (Infrastructure)      │
//! │ (LocalFilesystem, MiniJinjaRenderer, …) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (Builder, Marker, Injector, FuncMap)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kiln_core::prelude::*;
//!
//! let service = ScaffoldService::new(filesystem, renderer)
//!     .with_config(ProjectConfig::new().with_domain("my.domain"));
//!
//! // Builders run strictly in order; later ones may insert into earlier ones.
//! let report = service.execute(vec![Box::new(main_go), Box::new(register_api)])?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        FileOperations, ScaffoldError, ScaffoldReport, ScaffoldService,
        ports::{FileStat, Filesystem, Plugin, PostProcessor, TemplateRenderer},
    };
    pub use crate::domain::{
        Builder, BuilderError, CodeFragmentsMap, Delimiters, FileMode, FileModel, FuncMap,
        IfExistsAction, IfNotExistsAction, Inserter, InserterMixin, Marker, MarkerSyntax,
        ProjectConfig, Resource, Template, TemplateFunction, TemplateMixin, Universe,
    };
    pub use crate::error::{KilnError, KilnResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
