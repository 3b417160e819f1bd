//! Builder contracts.
//!
//! Every scaffolded artifact is a [`Builder`]: something with a target path
//! and an existence policy. What else it can do is discovered through the
//! `as_*` accessors rather than downcasting: a builder that renders a
//! template returns itself from [`Builder::as_template_mut`], a builder that
//! wants the project domain returns its [`DomainMixin`](super::mixins::DomainMixin)
//! from [`Builder::as_domain_mut`], and so on. Every accessor defaults to
//! `None`.
//!
//! ```rust
//! use std::path::Path;
//! use kiln_core::domain::{
//!     Builder, BuilderError, DomainMixin, HasDomain, IfExistsAction, Template, TemplateMixin,
//! };
//!
//! struct Readme {
//!     template: TemplateMixin,
//!     domain: DomainMixin,
//! }
//!
//! impl Builder for Readme {
//!     fn path(&self) -> &Path { self.template.path() }
//!     fn if_exists_action(&self) -> IfExistsAction { self.template.if_exists_action() }
//!     fn as_template_mut(&mut self) -> Option<&mut dyn Template> { Some(self) }
//!     fn as_domain_mut(&mut self) -> Option<&mut dyn HasDomain> { Some(&mut self.domain) }
//! }
//!
//! impl Template for Readme {
//!     fn body(&self) -> &str { self.template.body() }
//!     fn set_template_defaults(&mut self) -> Result<(), BuilderError> {
//!         self.template.set_path_if_empty("README.md");
//!         self.template.set_body_if_empty("# {{ domain }}\n");
//!         Ok(())
//!     }
//!     fn render_context(&self) -> serde_json::Value {
//!         serde_json::json!({ "domain": self.domain.domain() })
//!     }
//! }
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::entities::resource::Resource;
use crate::domain::error::BuilderError;
use crate::domain::funcs::FuncMap;
use crate::domain::marker::{CodeFragmentsMap, Marker};
use crate::domain::value_objects::{IfExistsAction, IfNotExistsAction};

// ── Builder ───────────────────────────────────────────────────────────────────

/// The minimal identity every scaffolded artifact has.
pub trait Builder {
    /// Target path, relative to the scaffold root.
    ///
    /// For templates this may only be final after
    /// [`Template::set_template_defaults`] has run.
    fn path(&self) -> &Path;

    /// Policy applied when the path is already modeled or already on disk.
    fn if_exists_action(&self) -> IfExistsAction;

    /// Checked once per run, after injection and before any rendering.
    fn validate(&self) -> Result<(), BuilderError> {
        Ok(())
    }

    fn as_template_mut(&mut self) -> Option<&mut dyn Template> {
        None
    }

    fn as_inserter(&self) -> Option<&dyn Inserter> {
        None
    }

    fn as_domain_mut(&mut self) -> Option<&mut dyn HasDomain> {
        None
    }

    fn as_repository_mut(&mut self) -> Option<&mut dyn HasRepository> {
        None
    }

    fn as_project_name_mut(&mut self) -> Option<&mut dyn HasProjectName> {
        None
    }

    fn as_multi_group_mut(&mut self) -> Option<&mut dyn HasMultiGroup> {
        None
    }

    fn as_component_config_mut(&mut self) -> Option<&mut dyn HasComponentConfig> {
        None
    }

    fn as_boilerplate_mut(&mut self) -> Option<&mut dyn HasBoilerplate> {
        None
    }

    fn as_resource_mut(&mut self) -> Option<&mut dyn HasResource> {
        None
    }
}

impl fmt::Debug for dyn Builder + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("path", &self.path())
            .field("if_exists_action", &self.if_exists_action())
            .finish_non_exhaustive()
    }
}

// ── Template ──────────────────────────────────────────────────────────────────

/// Delimiters around template actions. The engine default is `{{` / `}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    pub left: String,
    pub right: String,
}

impl Delimiters {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// A builder whose content comes from rendering a template body.
pub trait Template {
    /// Raw template source.
    fn body(&self) -> &str;

    /// Finalize path, body and existence policy. Runs before rendering.
    fn set_template_defaults(&mut self) -> Result<(), BuilderError>;

    /// Custom action delimiters; `None` means the engine default.
    fn delimiters(&self) -> Option<&Delimiters> {
        None
    }

    fn set_delimiters(&mut self, _left: &str, _right: &str) {}

    /// Functions replacing the renderer's default map, if any.
    fn func_map(&self) -> Option<&FuncMap> {
        None
    }

    /// Data the body is rendered against.
    fn render_context(&self) -> serde_json::Value;
}

// ── Inserter ──────────────────────────────────────────────────────────────────

/// A builder that inserts code fragments at markers of an existing file.
pub trait Inserter {
    /// Markers this inserter is allowed to touch.
    fn markers(&self) -> Vec<Marker>;

    /// Fragments to insert, keyed by marker.
    fn code_fragments(&self) -> CodeFragmentsMap;

    fn if_not_exists_action(&self) -> IfNotExistsAction {
        IfNotExistsAction::default()
    }
}

// ── Injection capabilities ────────────────────────────────────────────────────
//
// Setters never overwrite a value the builder already holds.

pub trait HasDomain {
    fn inject_domain(&mut self, domain: &str);
}

pub trait HasRepository {
    fn inject_repository(&mut self, repository: &str);
}

pub trait HasProjectName {
    fn inject_project_name(&mut self, project_name: &str);
}

pub trait HasMultiGroup {
    fn inject_multi_group(&mut self, multi_group: bool);
}

pub trait HasComponentConfig {
    fn inject_component_config(&mut self, component_config: bool);
}

pub trait HasBoilerplate {
    fn inject_boilerplate(&mut self, boilerplate: &str);
}

pub trait HasResource {
    fn inject_resource(&mut self, resource: &Resource);
}
