//! Client configuration
//!
//! Config file: ~/.config/failuresense/config.toml or /etc/failuresense/config.toml
//! Environment overrides: FAILURESENSE_CONFIG, FAILURESENSE_ENDPOINT,
//! FAILURESENSE_TIMEOUT_SECS

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/predict";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONFIG_ENV: &str = "FAILURESENSE_CONFIG";

/// Color display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

/// Result rendering format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Prediction service connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Full URL of the prediction endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout; an expired request counts as unreachable
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,

    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl ClientConfig {
    /// User config path: $XDG_CONFIG_HOME/failuresense/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
        Ok(config_dir.join("failuresense").join("config.toml"))
    }

    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/failuresense/config.toml")
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. $FAILURESENSE_CONFIG (explicit path, must exist)
    /// 2. User config
    /// 3. System config
    /// 4. Defaults
    ///
    /// Environment overrides are applied on top of whichever file was used.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from(Path::new(&path))?,
            None => Self::load_from_standard_paths()?,
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Contents of the writable file only, without environment overrides
    /// or the system config, so `config --set` never copies system values
    /// into the user file.
    pub fn load_file_only() -> Result<Self> {
        Self::load_or_default(&Self::writable_path()?)
    }

    /// Load `path`, or defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Where `save()` writes: $FAILURESENSE_CONFIG or the user config path
    pub fn writable_path() -> Result<PathBuf> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::user_config_path(),
        }
    }

    fn load_from_standard_paths() -> Result<Self> {
        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::load_from(&system_path);
        }

        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ClientConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        validate_endpoint(&config.service.endpoint)
            .with_context(|| format!("Invalid endpoint in {}", path.display()))?;
        validate_timeout(config.service.timeout_secs)
            .with_context(|| format!("Invalid timeout in {}", path.display()))?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(endpoint) = std::env::var("FAILURESENSE_ENDPOINT") {
            self.set("endpoint", &endpoint)
                .context("Invalid FAILURESENSE_ENDPOINT")?;
        }
        if let Ok(timeout) = std::env::var("FAILURESENSE_TIMEOUT_SECS") {
            self.set("timeout", &timeout)
                .context("Invalid FAILURESENSE_TIMEOUT_SECS")?;
        }
        Ok(())
    }

    /// Save to the writable config file
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::writable_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let toml_string = self.to_toml()?;
        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Set a single value by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "endpoint" => {
                validate_endpoint(value)?;
                self.service.endpoint = value.to_string();
            }
            "timeout" | "timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout: '{}'", value))?;
                validate_timeout(secs)?;
                self.service.timeout_secs = secs;
            }
            "color" => {
                self.output.color = match value.to_lowercase().as_str() {
                    "auto" => ColorMode::Auto,
                    "always" | "on" => ColorMode::Always,
                    "never" | "off" | "none" => ColorMode::Never,
                    _ => anyhow::bail!(
                        "Invalid color mode: '{}'. Valid values: auto, always, never",
                        value
                    ),
                };
            }
            "format" => {
                self.output.format = match value.to_lowercase().as_str() {
                    "text" => OutputFormat::Text,
                    "json" => OutputFormat::Json,
                    _ => anyhow::bail!("Invalid format: '{}'. Valid values: text, json", value),
                };
            }
            _ => anyhow::bail!(
                "Unknown config key: '{}'. Valid keys: endpoint, timeout, color, format",
                key
            ),
        }
        Ok(())
    }

    /// Parse and apply a `key=value` assignment
    pub fn set_assignment(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment
            .split_once('=')
            .with_context(|| format!("Expected key=value, got '{}'", assignment))?;
        self.set(key.trim(), value)
    }
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = reqwest::Url::parse(endpoint)
        .with_context(|| format!("Invalid endpoint URL: '{}'", endpoint))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => anyhow::bail!("Unsupported endpoint scheme '{}': use http or https", other),
    }
}

fn validate_timeout(secs: u64) -> Result<()> {
    if secs == 0 {
        anyhow::bail!("Timeout must be at least 1 second");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.service.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.output.color, ColorMode::Auto);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_set_values() {
        let mut config = ClientConfig::default();

        config.set("endpoint", "https://pm.example.com/predict").unwrap();
        assert_eq!(config.service.endpoint, "https://pm.example.com/predict");

        config.set("timeout", "5").unwrap();
        assert_eq!(config.service.timeout_secs, 5);

        config.set("color", "off").unwrap();
        assert_eq!(config.output.color, ColorMode::Never);

        config.set_assignment("format=json").unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = ClientConfig::default();
        assert!(config.set("endpoint", "not a url").is_err());
        assert!(config.set("endpoint", "ftp://host/predict").is_err());
        assert!(config.set("timeout", "0").is_err());
        assert!(config.set("timeout", "soon").is_err());
        assert!(config.set("color", "purple").is_err());
        assert!(config.set("retries", "3").is_err());
        assert!(config.set_assignment("endpoint").is_err());
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[service]\ntimeout_secs = 7\n").unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.service.timeout_secs, 7);
        assert_eq!(config.service.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ClientConfig::default();
        config.set("endpoint", "http://10.0.0.5:8000/predict").unwrap();
        config.set("format", "json").unwrap();
        config.save_to(&path).unwrap();

        assert_eq!(ClientConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_endpoint_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[service]\nendpoint = \"localhost\"\n").unwrap();
        assert!(ClientConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_zero_timeout_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[service]\ntimeout_secs = 0\n").unwrap();

        let err = ClientConfig::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("at least 1 second"));
    }

    #[test]
    fn test_load_or_default_reads_only_the_given_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert_eq!(
            ClientConfig::load_or_default(&path).unwrap(),
            ClientConfig::default()
        );

        fs::write(&path, "[output]\nformat = \"json\"\n").unwrap();
        let config = ClientConfig::load_or_default(&path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.service, ServiceConfig::default());
    }
}
