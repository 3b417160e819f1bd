//! Domain value objects: existence policies.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! Both enums are closed; decoding from text is the only place an unknown
//! policy can show up, and it is rejected there.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── IfExistsAction ────────────────────────────────────────────────────────────

/// What to do when a path is already modeled in the current run or already
/// exists on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IfExistsAction {
    /// Keep what is already there. The run carries on.
    #[default]
    Skip,
    /// Abort the run.
    Error,
    /// Replace what is already there.
    Overwrite,
}

impl IfExistsAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Error => "error",
            Self::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for IfExistsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IfExistsAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "error" => Ok(Self::Error),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(DomainError::UnknownIfExistsAction {
                action: other.to_string(),
            }),
        }
    }
}

// ── IfNotExistsAction ─────────────────────────────────────────────────────────

/// What an inserter does when its target has neither an in-memory model nor
/// a file on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IfNotExistsAction {
    /// Abort the run.
    #[default]
    Error,
    /// Skip the inserter silently.
    Ignore,
}

impl IfNotExistsAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for IfNotExistsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IfNotExistsAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "ignore" => Ok(Self::Ignore),
            other => Err(DomainError::UnknownIfNotExistsAction {
                action: other.to_string(),
            }),
        }
    }
}

// ── Modes ─────────────────────────────────────────────────────────────────────

/// Unix-style permission bits applied to created directories and files.
///
/// Adapters on platforms without mode bits ignore these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode(u32);

impl FileMode {
    pub const DEFAULT_DIRECTORY: Self = Self(0o755);
    pub const DEFAULT_FILE: Self = Self(0o644);

    pub const fn new(bits: u32) -> Self {
        Self(bits & 0o7777)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#o}", self.0)
    }
}
