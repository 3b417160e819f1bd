use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// An API resource being scaffolded: group, version and kind plus where it
/// lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    pub group: String,
    pub domain: String,
    pub version: String,
    pub kind: String,
    /// Lower-case plural of `kind`. Derived when left empty.
    pub plural: String,
    /// Import path of the API package.
    pub path: String,
}

impl Resource {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            group: group.into(),
            version: version.into(),
            plural: regular_plural(&kind),
            kind,
            ..Self::default()
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = plural.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Fill derived fields (`plural`) left empty.
    pub fn with_defaults(mut self) -> Self {
        if self.plural.is_empty() {
            self.plural = regular_plural(&self.kind);
        }
        self
    }

    /// `group.domain`, or whichever half is set.
    pub fn qualified_group(&self) -> String {
        match (self.group.is_empty(), self.domain.is_empty()) {
            (false, false) => format!("{}.{}", self.group, self.domain),
            (false, true) => self.group.clone(),
            _ => self.domain.clone(),
        }
    }

    /// Go-safe package name: the group, or the domain when there is no group,
    /// with dots and dashes removed.
    pub fn package_name(&self) -> String {
        let base = if self.group.is_empty() {
            &self.domain
        } else {
            &self.group
        };
        base.chars().filter(|c| !matches!(c, '.' | '-')).collect()
    }

    /// Substitutes `%[...]` placeholders in builder paths.
    pub fn replacer(&self) -> Replacer {
        Replacer {
            pairs: vec![
                ("%[group]", self.group.clone()),
                ("%[version]", self.version.clone()),
                ("%[kind]", self.kind.to_lowercase()),
                ("%[plural]", self.plural.to_lowercase()),
                ("%[domain]", self.domain.clone()),
                ("%[package-name]", self.package_name()),
            ],
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.version.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "version" });
        }
        if self.kind.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "kind" });
        }
        if !self.kind.starts_with(|c: char| c.is_ascii_uppercase()) {
            return Err(DomainError::InvalidResource(format!(
                "kind '{}' must start with an upper-case letter",
                self.kind
            )));
        }
        if !self.kind.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidResource(format!(
                "kind '{}' must be alphanumeric",
                self.kind
            )));
        }
        if !self
            .version
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            || !self.version.starts_with('v')
        {
            return Err(DomainError::InvalidResource(format!(
                "version '{}' must look like v1, v1beta1, v2alpha1",
                self.version
            )));
        }
        if self.group.chars().any(|c| c.is_ascii_uppercase() || c.is_whitespace()) {
            return Err(DomainError::InvalidResource(format!(
                "group '{}' must be lower-case without spaces",
                self.group
            )));
        }
        Ok(())
    }
}

/// Literal placeholder substitution, applied left to right.
#[derive(Debug, Clone)]
pub struct Replacer {
    pairs: Vec<(&'static str, String)>,
}

impl Replacer {
    pub fn replace(&self, input: &str) -> String {
        self.pairs
            .iter()
            .fold(input.to_string(), |acc, (pattern, value)| {
                acc.replace(pattern, value)
            })
    }
}

/// Plural of a kind for the common English cases, lower-cased.
pub fn regular_plural(kind: &str) -> String {
    let lower = kind.to_lowercase();
    if lower.is_empty() {
        return lower;
    }
    if let Some(stem) = lower.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if lower.ends_with(['s', 'x', 'z']) || lower.ends_with("ch") || lower.ends_with("sh") {
        return format!("{lower}es");
    }
    format!("{lower}s")
}
