//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `KILN_` environment variables, nested with `__`
//!    (`KILN_SCAFFOLD__ROOT=out`)
//! 3. Config file (`--config`, else [`AppConfig::config_path`] if present)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use kiln_adapters::MANIFEST_FILE_NAME;

use crate::cli::global::OutputFormat;

const ENV_PREFIX: &str = "KILN";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where manifests are read from and output is written to.
    pub scaffold: ScaffoldConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Log sinks beyond stderr.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Manifest `kiln apply` uses when none is given.
    pub manifest: PathBuf,
    /// Output root `kiln apply` uses when `--dir` is absent.
    pub root: PathBuf,
    /// Permission bits for created directories.
    pub directory_mode: u32,
    /// Permission bits for written files.
    pub file_mode: u32,
    /// Extensions whose output has trailing whitespace stripped.
    pub trim_trailing_whitespace: Vec<String>,
    /// Extensions that get the manifest boilerplate prepended.
    pub prepend_boilerplate: Vec<String>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(MANIFEST_FILE_NAME),
            root: PathBuf::from("."),
            directory_mode: 0o755,
            file_mode: 0o644,
            trim_trailing_whitespace: Vec::new(),
            prepend_boilerplate: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// Used when `--output-format` is left at `auto`.
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append log events to this file as well as stderr.
    pub file: Option<PathBuf>,
    /// Emit JSON lines instead of the human format.
    pub json: bool,
}

impl AppConfig {
    /// Load configuration: defaults, then the file, then `KILN_*` variables.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_from(config_file.map(PathBuf::as_path), None)
    }

    /// [`Self::load`] with the environment replaced by `env` when given.
    fn load_from(
        config_file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };

        let defaults =
            Config::try_from(&Self::default()).context("failed to encode built-in defaults")?;

        Config::builder()
            .add_source(defaults)
            .add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scaffold.trim_trailing_whitespace")
                    .with_list_parse_key("scaffold.prepend_boilerplate")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .with_context(|| format!("failed to read configuration from '{}'", path.display()))?
            .try_deserialize()
            .context("configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.kiln.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "kiln", "kiln")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".kiln.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_match_core_modes() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.scaffold.directory_mode, 0o755);
        assert_eq!(cfg.scaffold.file_mode, 0o644);
        assert_eq!(cfg.scaffold.manifest, PathBuf::from("kiln.toml"));
        assert_eq!(cfg.output.format, OutputFormat::Auto);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(AppConfig::load_from(Some(&missing), env(&[])).is_err());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let cfg = AppConfig::load_from(Some(&path), env(&[])).unwrap();
        assert_eq!(cfg.scaffold.root, PathBuf::from("."));
        assert_eq!(cfg.scaffold.file_mode, 0o644);
        assert!(cfg.logging.file.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[scaffold]\nroot = \"out\"\nfile_mode = 0o600\ntrim_trailing_whitespace = [\"go\"]\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(Some(&path), env(&[])).unwrap();
        assert_eq!(cfg.scaffold.root, PathBuf::from("out"));
        assert_eq!(cfg.scaffold.file_mode, 0o600);
        assert_eq!(cfg.scaffold.directory_mode, 0o755);
        assert_eq!(cfg.scaffold.trim_trailing_whitespace, vec!["go".to_string()]);
        assert_eq!(cfg.output.format, OutputFormat::Json);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scaffold]\nroot = \"from-file\"\n").unwrap();

        let cfg = AppConfig::load_from(
            Some(&path),
            env(&[
                ("KILN_SCAFFOLD__ROOT", "from-env"),
                ("KILN_LOGGING__JSON", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.scaffold.root, PathBuf::from("from-env"));
        assert!(cfg.logging.json);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scaffold\nroot = ").unwrap();
        assert!(AppConfig::load_from(Some(&path), env(&[])).is_err());
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
