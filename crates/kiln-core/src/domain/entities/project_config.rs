use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Project-wide settings injected into builders. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub domain: Option<String>,
    pub repository: Option<String>,
    pub project_name: Option<String>,
    pub multi_group: bool,
    pub component_config: bool,
}

impl ProjectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn with_multi_group(mut self, multi_group: bool) -> Self {
        self.multi_group = multi_group;
        self
    }

    pub fn with_component_config(mut self, component_config: bool) -> Self {
        self.component_config = component_config;
        self
    }

    pub fn domain(&self) -> &str {
        self.domain.as_deref().unwrap_or_default()
    }

    pub fn repository(&self) -> &str {
        self.repository.as_deref().unwrap_or_default()
    }

    pub fn project_name(&self) -> &str {
        self.project_name.as_deref().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let domain = self.domain();
        if domain.chars().any(char::is_whitespace) || domain.starts_with('.') || domain.ends_with('.') {
            return Err(DomainError::InvalidConfig(format!(
                "domain '{domain}' is not a valid DNS name"
            )));
        }

        let name = self.project_name();
        if name.len() > 63 {
            return Err(DomainError::InvalidConfig(format!(
                "project name '{name}' is longer than 63 characters"
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(DomainError::InvalidConfig(format!(
                "project name '{name}' must consist of lower-case letters, digits and '-'"
            )));
        }
        Ok(())
    }
}
