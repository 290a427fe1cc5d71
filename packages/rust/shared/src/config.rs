//! Application configuration for catchlog.
//!
//! User config lives at `~/.catchlog/catchlog.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CatchlogError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "catchlog.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".catchlog";

// ---------------------------------------------------------------------------
// Config structs (matching catchlog.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Report output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report log written by every command unless `--log` is given.
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Echo report fragments to stdout as well as the log.
    #[serde(default = "default_true")]
    pub echo: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            echo: true,
        }
    }
}

fn default_log_file() -> String {
    "catchlog.log".into()
}
fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.catchlog/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CatchlogError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.catchlog/catchlog.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CatchlogError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CatchlogError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CatchlogError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| CatchlogError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CatchlogError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        assert!(toml_str.contains("log_file"));
        assert!(toml_str.contains("catchlog.log"));
    }

    #[test]
    fn config_roundtrip() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.output.log_file, "catchlog.log");
        assert!(parsed.output.echo);
    }

    #[test]
    fn partial_output_section_fills_defaults() {
        let toml_str = r#"
[output]
echo = false
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert!(!config.output.echo);
        assert_eq!(config.output.log_file, "catchlog.log");
    }

    #[test]
    fn load_config_from_reports_bad_toml() {
        let path = std::env::temp_dir().join(format!("catchlog_cfg_{}.toml", uuid::Uuid::now_v7()));
        std::fs::write(&path, "[output\nlog_file = 1").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().starts_with("config error: failed to parse"));

        let _ = std::fs::remove_file(&path);
    }
}
