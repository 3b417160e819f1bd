use crate::domain::{
    entities::{project_config::ProjectConfig, resource::Resource},
    error::DomainError,
};

/// Centralized domain validation.
///
/// Run once per scaffold, before any builder is touched.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_config(config: &ProjectConfig) -> Result<(), DomainError> {
        config.validate()
    }

    pub fn validate_resource(resource: &Resource) -> Result<(), DomainError> {
        resource.validate()
    }
}
