//! Core domain layer for kiln.
//!
//! Pure scaffolding logic: builder contracts, markers, idempotent fragment
//! insertion, the injector and the template function map. All I/O and
//! template rendering go through ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no filesystem, network, or external calls
//! - **Explicit configuration**: marker syntax and function maps are values,
//!   never globals

pub mod builder;
pub mod entities;
pub mod error;
pub mod funcs;
pub mod injector;
pub mod insertion;
pub mod marker;
pub mod mixins;
pub mod value_objects;

mod validation;

pub use builder::{
    Builder, Delimiters, HasBoilerplate, HasComponentConfig, HasDomain, HasMultiGroup,
    HasProjectName, HasRepository, HasResource, Inserter, Template,
};
pub use entities::{FileModel, FileModels, ProjectConfig, Replacer, Resource, Universe};
pub use error::{BuilderError, DomainError, ErrorCategory};
pub use funcs::{FuncMap, TemplateFunction};
pub use injector::Injector;
pub use marker::{
    CodeFragment, CodeFragments, CodeFragmentsMap, DEFAULT_MARKER_PREFIX, Marker, MarkerSyntax,
};
pub use mixins::{
    Blank, BoilerplateMixin, ComponentConfigMixin, DomainMixin, InserterMixin, MultiGroupMixin,
    ProjectNameMixin, RepositoryMixin, ResourceMixin, Slot, TemplateMixin,
};
pub use validation::DomainValidator;
pub use value_objects::{FileMode, IfExistsAction, IfNotExistsAction};
