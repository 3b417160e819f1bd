//! Reusable field bundles for builders.
//!
//! A builder composes the mixins it needs and hands them out through its
//! `Builder::as_*` accessors. Injected fields live in a [`Slot`], which only
//! accepts a value while it is empty, so a value set by the builder's author
//! always wins over one injected from project configuration.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::builder::{
    Delimiters, HasBoilerplate, HasComponentConfig, HasDomain, HasMultiGroup, HasProjectName,
    HasRepository, HasResource,
};
use crate::domain::entities::resource::Resource;
use crate::domain::funcs::FuncMap;
use crate::domain::value_objects::{IfExistsAction, IfNotExistsAction};

// ── Slot ──────────────────────────────────────────────────────────────────────

/// Values with a notion of "nothing set yet".
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for bool {
    fn is_blank(&self) -> bool {
        !*self
    }
}

impl Blank for Resource {
    fn is_blank(&self) -> bool {
        false
    }
}

/// A set-if-empty cell.
///
/// A slot is empty when it holds nothing or a [`Blank`] value (`""`,
/// `false`). Injection only ever fills empty slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Slot<T>(Option<T>);

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T: Blank> Slot<T> {
    pub fn filled(value: T) -> Self {
        Self(Some(value))
    }

    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_ref().is_none_or(|v| v.is_blank())
    }

    /// Store `value` unless the slot already holds a non-blank value.
    /// Returns whether the value was taken.
    pub fn set_if_empty(&mut self, value: T) -> bool {
        if self.is_empty() {
            self.0 = Some(value);
            true
        } else {
            false
        }
    }

    /// Unconditional set, for the builder's own author.
    pub fn set(&mut self, value: T) {
        self.0 = Some(value);
    }
}

impl<T: Blank> From<T> for Slot<T> {
    fn from(value: T) -> Self {
        Self::filled(value)
    }
}

// ── Template / Inserter ───────────────────────────────────────────────────────

/// Path, body, existence policy and engine options for a template builder.
#[derive(Debug, Clone, Default)]
pub struct TemplateMixin {
    path: PathBuf,
    body: String,
    if_exists_action: IfExistsAction,
    delimiters: Option<Delimiters>,
    func_map: Option<FuncMap>,
}

impl TemplateMixin {
    pub fn new(path: impl Into<PathBuf>, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn with_if_exists_action(mut self, action: IfExistsAction) -> Self {
        self.if_exists_action = action;
        self
    }

    pub fn with_delimiters(mut self, left: &str, right: &str) -> Self {
        self.set_delimiters(left, right);
        self
    }

    pub fn with_func_map(mut self, func_map: FuncMap) -> Self {
        self.func_map = Some(func_map);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
    }

    /// Used by `set_template_defaults` implementations.
    pub fn set_path_if_empty(&mut self, path: impl Into<PathBuf>) {
        if self.path.as_os_str().is_empty() {
            self.path = path.into();
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn set_body_if_empty(&mut self, body: impl Into<String>) {
        if self.body.is_empty() {
            self.body = body.into();
        }
    }

    pub fn if_exists_action(&self) -> IfExistsAction {
        self.if_exists_action
    }

    pub fn set_if_exists_action(&mut self, action: IfExistsAction) {
        self.if_exists_action = action;
    }

    pub fn delimiters(&self) -> Option<&Delimiters> {
        self.delimiters.as_ref()
    }

    pub fn set_delimiters(&mut self, left: &str, right: &str) {
        self.delimiters = Some(Delimiters::new(left, right));
    }

    pub fn func_map(&self) -> Option<&FuncMap> {
        self.func_map.as_ref()
    }
}

/// Path and policies for an inserter builder.
///
/// Inserters always report [`IfExistsAction::Overwrite`]: their whole point
/// is to update a file that exists.
#[derive(Debug, Clone, Default)]
pub struct InserterMixin {
    path: PathBuf,
    if_not_exists_action: IfNotExistsAction,
}

impl InserterMixin {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            if_not_exists_action: IfNotExistsAction::default(),
        }
    }

    pub fn with_if_not_exists_action(mut self, action: IfNotExistsAction) -> Self {
        self.if_not_exists_action = action;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn if_exists_action(&self) -> IfExistsAction {
        IfExistsAction::Overwrite
    }

    pub fn if_not_exists_action(&self) -> IfNotExistsAction {
        self.if_not_exists_action
    }
}

// ── Injected fields ───────────────────────────────────────────────────────────

macro_rules! string_mixin {
    ($(#[$doc:meta])* $name:ident, $field:ident, $trait:ident, $inject:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
        pub struct $name {
            $field: Slot<String>,
        }

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self {
                    $field: Slot::filled(value.into()),
                }
            }

            pub fn $field(&self) -> Option<&str> {
                self.$field.get().map(String::as_str)
            }
        }

        impl $trait for $name {
            fn $inject(&mut self, value: &str) {
                self.$field.set_if_empty(value.to_string());
            }
        }
    };
}

macro_rules! flag_mixin {
    ($(#[$doc:meta])* $name:ident, $field:ident, $trait:ident, $inject:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
        pub struct $name {
            $field: Slot<bool>,
        }

        impl $name {
            pub fn new(value: bool) -> Self {
                Self {
                    $field: Slot::filled(value),
                }
            }

            pub fn $field(&self) -> bool {
                self.$field.get().copied().unwrap_or(false)
            }
        }

        impl $trait for $name {
            fn $inject(&mut self, value: bool) {
                self.$field.set_if_empty(value);
            }
        }
    };
}

string_mixin!(
    /// Project domain, e.g. `my.domain`.
    DomainMixin,
    domain,
    HasDomain,
    inject_domain
);
string_mixin!(
    /// Go-style module path of the project.
    RepositoryMixin,
    repository,
    HasRepository,
    inject_repository
);
string_mixin!(ProjectNameMixin, project_name, HasProjectName, inject_project_name);
string_mixin!(
    /// License header prepended by templates that ask for it.
    BoilerplateMixin,
    boilerplate,
    HasBoilerplate,
    inject_boilerplate
);
flag_mixin!(MultiGroupMixin, multi_group, HasMultiGroup, inject_multi_group);
flag_mixin!(
    ComponentConfigMixin,
    component_config,
    HasComponentConfig,
    inject_component_config
);

/// The resource being scaffolded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceMixin {
    resource: Slot<Resource>,
}

impl ResourceMixin {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource: Slot::filled(resource),
        }
    }

    pub fn resource(&self) -> Option<&Resource> {
        self.resource.get()
    }
}

impl HasResource for ResourceMixin {
    fn inject_resource(&mut self, resource: &Resource) {
        if self.resource.is_empty() {
            self.resource.set(resource.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_fills_only_when_empty() {
        let mut slot = Slot::<String>::default();
        assert!(slot.is_empty());
        assert!(slot.set_if_empty("a".into()));
        assert!(!slot.set_if_empty("b".into()));
        assert_eq!(slot.get().map(String::as_str), Some("a"));
    }

    #[test]
    fn blank_string_counts_as_empty() {
        let mut slot = Slot::filled(String::new());
        assert!(slot.set_if_empty("x".into()));
        assert_eq!(slot.get().map(String::as_str), Some("x"));
    }

    #[test]
    fn true_flag_is_never_reset() {
        let mut m = MultiGroupMixin::new(true);
        m.inject_multi_group(false);
        assert!(m.multi_group());

        let mut unset = MultiGroupMixin::default();
        unset.inject_multi_group(true);
        assert!(unset.multi_group());
    }

    #[test]
    fn domain_injected_when_unset() {
        let mut m = DomainMixin::default();
        m.inject_domain("my.domain");
        assert_eq!(m.domain(), Some("my.domain"));
    }

    #[test]
    fn domain_preset_value_wins() {
        let mut m = DomainMixin::new("kept.io");
        m.inject_domain("my.domain");
        assert_eq!(m.domain(), Some("kept.io"));
    }

    #[test]
    fn resource_injected_once() {
        let first = Resource::new("crew", "v1", "Captain");
        let second = Resource::new("ship", "v2", "Frigate");

        let mut m = ResourceMixin::default();
        m.inject_resource(&first);
        m.inject_resource(&second);
        assert_eq!(m.resource(), Some(&first));
    }

    #[test]
    fn template_mixin_defaults_fill_gaps_only() {
        let mut t = TemplateMixin::new("", "body");
        t.set_path_if_empty("a.go");
        t.set_body_if_empty("other");
        assert_eq!(t.path(), Path::new("a.go"));
        assert_eq!(t.body(), "body");
        assert_eq!(t.if_exists_action(), IfExistsAction::Skip);
    }

    #[test]
    fn template_mixin_stores_delimiters() {
        let t = TemplateMixin::new("a.go", "").with_delimiters("[[", "]]");
        assert_eq!(t.delimiters(), Some(&Delimiters::new("[[", "]]")));
    }

    #[test]
    fn inserter_always_overwrites() {
        let i = InserterMixin::new("main.go");
        assert_eq!(i.if_exists_action(), IfExistsAction::Overwrite);
        assert_eq!(i.if_not_exists_action(), IfNotExistsAction::Error);
    }

    #[test]
    fn mixins_serialize_flat_values() {
        let m = DomainMixin::new("my.domain");
        assert_eq!(
            serde_json::to_value(&m).unwrap(),
            serde_json::json!({ "domain": "my.domain" })
        );
        assert_eq!(
            serde_json::to_value(DomainMixin::default()).unwrap(),
            serde_json::json!({ "domain": null })
        );
    }
}
