//! `kiln config`: inspect configuration values.

use serde_json::json;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            if output.is_json() {
                output.json(&json!({ "key": key, "value": value }))?;
            } else {
                output.print(&format!("{key} = {value}"))?;
            }
        }

        ConfigCommands::List => {
            if output.is_json() {
                let value = serde_json::to_value(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
                output.json(&value)?;
            } else {
                output.header("Current Configuration:")?;
                let serialised =
                    toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                        message: format!("Failed to serialise config: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                output.print(&serialised)?;
            }
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let scaffold = &config.scaffold;
    match key {
        "scaffold.manifest" => Ok(scaffold.manifest.display().to_string()),
        "scaffold.root" => Ok(scaffold.root.display().to_string()),
        "scaffold.directory_mode" => Ok(format!("{:#o}", scaffold.directory_mode)),
        "scaffold.file_mode" => Ok(format!("{:#o}", scaffold.file_mode)),
        "scaffold.trim_trailing_whitespace" => Ok(scaffold.trim_trailing_whitespace.join(",")),
        "scaffold.prepend_boilerplate" => Ok(scaffold.prepend_boilerplate.join(",")),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(format!("{:?}", config.output.format).to_lowercase()),
        "logging.file" => Ok(config
            .logging
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()),
        "logging.json" => Ok(config.logging.json.to_string()),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    #[test]
    fn get_modes_in_octal() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "scaffold.file_mode").unwrap(), "0o644");
        assert_eq!(
            get_config_value(&cfg, "scaffold.directory_mode").unwrap(),
            "0o755"
        );
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn get_output_format_is_lowercase() {
        let mut cfg = AppConfig::default();
        cfg.output.format = OutputFormat::Json;
        assert_eq!(get_config_value(&cfg, "output.format").unwrap(), "json");
    }

    #[test]
    fn unset_log_file_is_empty() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "logging.file").unwrap(), "");
    }

    #[test]
    fn default_config_serialises_to_toml() {
        let rendered = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(rendered.contains("[scaffold]"));
        assert!(rendered.contains("file_mode = 420"));
    }
}
