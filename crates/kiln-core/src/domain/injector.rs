//! Fills cross-cutting fields into builders.

use tracing::trace;

use crate::domain::builder::Builder;
use crate::domain::entities::{project_config::ProjectConfig, resource::Resource};

/// Shared inputs of a run, pushed into every builder that asks for them.
///
/// A source value is only injected when it is present and non-empty, and the
/// builder side never lets an injected value replace one it already holds.
#[derive(Debug, Clone, Default)]
pub struct Injector {
    config: Option<ProjectConfig>,
    boilerplate: Option<String>,
    resource: Option<Resource>,
}

impl Injector {
    pub fn new(
        config: Option<ProjectConfig>,
        boilerplate: Option<String>,
        resource: Option<Resource>,
    ) -> Self {
        Self {
            config,
            boilerplate,
            resource,
        }
    }

    pub fn config(&self) -> Option<&ProjectConfig> {
        self.config.as_ref()
    }

    pub fn boilerplate(&self) -> Option<&str> {
        self.boilerplate.as_deref()
    }

    pub fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    pub fn inject_into(&self, builder: &mut dyn Builder) {
        if let Some(config) = &self.config {
            if !config.domain().is_empty() {
                if let Some(target) = builder.as_domain_mut() {
                    target.inject_domain(config.domain());
                }
            }
            if !config.repository().is_empty() {
                if let Some(target) = builder.as_repository_mut() {
                    target.inject_repository(config.repository());
                }
            }
            if !config.project_name().is_empty() {
                if let Some(target) = builder.as_project_name_mut() {
                    target.inject_project_name(config.project_name());
                }
            }
            if let Some(target) = builder.as_multi_group_mut() {
                target.inject_multi_group(config.multi_group);
            }
            if let Some(target) = builder.as_component_config_mut() {
                target.inject_component_config(config.component_config);
            }
        }

        if let Some(boilerplate) = self.boilerplate.as_deref().filter(|b| !b.is_empty()) {
            if let Some(target) = builder.as_boilerplate_mut() {
                target.inject_boilerplate(boilerplate);
            }
        }

        if let Some(resource) = &self.resource {
            if let Some(target) = builder.as_resource_mut() {
                target.inject_resource(resource);
            }
        }

        trace!(path = %builder.path().display(), "injected shared fields");
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::domain::builder::*;
    use crate::domain::mixins::*;
    use crate::domain::value_objects::IfExistsAction;

    #[derive(Default)]
    struct Everything {
        path: PathBuf,
        domain: DomainMixin,
        repository: RepositoryMixin,
        project_name: ProjectNameMixin,
        multi_group: MultiGroupMixin,
        component_config: ComponentConfigMixin,
        boilerplate: BoilerplateMixin,
        resource: ResourceMixin,
    }

    impl Builder for Everything {
        fn path(&self) -> &Path {
            &self.path
        }
        fn if_exists_action(&self) -> IfExistsAction {
            IfExistsAction::Error
        }
        fn as_domain_mut(&mut self) -> Option<&mut dyn HasDomain> {
            Some(&mut self.domain)
        }
        fn as_repository_mut(&mut self) -> Option<&mut dyn HasRepository> {
            Some(&mut self.repository)
        }
        fn as_project_name_mut(&mut self) -> Option<&mut dyn HasProjectName> {
            Some(&mut self.project_name)
        }
        fn as_multi_group_mut(&mut self) -> Option<&mut dyn HasMultiGroup> {
            Some(&mut self.multi_group)
        }
        fn as_component_config_mut(&mut self) -> Option<&mut dyn HasComponentConfig> {
            Some(&mut self.component_config)
        }
        fn as_boilerplate_mut(&mut self) -> Option<&mut dyn HasBoilerplate> {
            Some(&mut self.boilerplate)
        }
        fn as_resource_mut(&mut self) -> Option<&mut dyn HasResource> {
            Some(&mut self.resource)
        }
    }

    struct Plain;

    impl Builder for Plain {
        fn path(&self) -> &Path {
            Path::new("plain.txt")
        }
        fn if_exists_action(&self) -> IfExistsAction {
            IfExistsAction::Skip
        }
    }

    fn full_config() -> ProjectConfig {
        ProjectConfig::new()
            .with_domain("my.domain")
            .with_repository("github.com/example/repo")
            .with_project_name("my-op")
            .with_multi_group(true)
            .with_component_config(true)
    }

    #[test]
    fn nothing_injected_without_sources() {
        let mut b = Everything::default();
        Injector::default().inject_into(&mut b);

        assert_eq!(b.domain.domain(), None);
        assert_eq!(b.repository.repository(), None);
        assert!(!b.multi_group.multi_group());
        assert_eq!(b.resource.resource(), None);
    }

    #[test]
    fn injects_every_capability() {
        let resource = Resource::new("crew", "v1", "Captain");
        let injector = Injector::new(
            Some(full_config()),
            Some("// Copyright".into()),
            Some(resource.clone()),
        );
        let mut b = Everything::default();
        injector.inject_into(&mut b);

        assert_eq!(b.domain.domain(), Some("my.domain"));
        assert_eq!(b.repository.repository(), Some("github.com/example/repo"));
        assert_eq!(b.project_name.project_name(), Some("my-op"));
        assert!(b.multi_group.multi_group());
        assert!(b.component_config.component_config());
        assert_eq!(b.boilerplate.boilerplate(), Some("// Copyright"));
        assert_eq!(b.resource.resource(), Some(&resource));
    }

    #[test]
    fn empty_sources_are_not_injected() {
        let injector = Injector::new(Some(ProjectConfig::new()), Some(String::new()), None);
        let mut b = Everything::default();
        injector.inject_into(&mut b);

        assert_eq!(b.domain.domain(), None);
        assert_eq!(b.boilerplate.boilerplate(), None);
    }

    #[test]
    fn preset_values_survive_injection() {
        let injector = Injector::new(Some(full_config().with_multi_group(false)), None, None);
        let mut b = Everything {
            domain: DomainMixin::new("kept.io"),
            multi_group: MultiGroupMixin::new(true),
            ..Everything::default()
        };
        injector.inject_into(&mut b);

        assert_eq!(b.domain.domain(), Some("kept.io"));
        assert!(b.multi_group.multi_group());
        assert_eq!(b.repository.repository(), Some("github.com/example/repo"));
    }

    #[test]
    fn builders_without_capabilities_are_untouched() {
        let injector = Injector::new(Some(full_config()), Some("x".into()), None);
        let mut b = Plain;
        injector.inject_into(&mut b);
        assert_eq!(b.path(), Path::new("plain.txt"));
    }
}
