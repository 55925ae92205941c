//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (TOML/YAML/JSON)
//! - Environment variables
//! - Command-line arguments

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the project configuration, searched in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".contentkit.toml";

/// Environment variable overriding `content_dir`
pub const CONTENT_DIR_ENV: &str = "CONTENTKIT_CONTENT_DIR";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory holding one sub-directory per collection
    pub content_dir: PathBuf,

    /// Validation settings
    pub validation: ValidationConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// File the configuration was loaded from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject undeclared front-matter keys
    pub strict: bool,

    /// Stop at the first failing entry
    pub fail_fast: bool,

    /// Maximum number of errors reported per entry (0 = unlimited)
    pub max_errors: usize,

    /// Concurrent validation tasks (defaults to available parallelism)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (compact, full, json)
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("src/content"),
            validation: ValidationConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            source: None,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strict: false,
            fail_fast: false,
            max_errors: 0,
            jobs: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// Serialization format of a config file, from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::config(format!(
                "Unsupported config file '{}': expected .toml, .yaml or .json",
                path.display()
            ))),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let mut config: Config = match FileFormat::from_path(path)? {
            FileFormat::Toml => toml::from_str(&content)?,
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Json => serde_json::from_str(&content)?,
        };
        config.source = Some(path.to_path_buf());

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in &Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Failed to load config");
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations, then
    /// apply environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = file {
            Self::from_file(path)?
        } else {
            Self::load()?
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var(CONTENT_DIR_ENV) {
            if !dir.is_empty() {
                self.content_dir = PathBuf::from(dir);
            }
        }
    }

    /// Get default configuration file paths to check, in priority order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            // Current directory
            PathBuf::from(PROJECT_CONFIG_FILE),
            PathBuf::from(".contentkit.yaml"),
            PathBuf::from(".contentkit.json"),
        ];

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let contentkit_dir = config_dir.join("contentkit");
            paths.push(contentkit_dir.join("config.toml"));
            paths.push(contentkit_dir.join("config.yaml"));
            paths.push(contentkit_dir.join("config.json"));
        }

        paths
    }

    /// Save configuration to a file, in the format implied by its extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match FileFormat::from_path(path)? {
            FileFormat::Toml => toml::to_string_pretty(self)?,
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.content_dir, PathBuf::from("src/content"));
        assert!(!config.validation.strict);
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "content_dir = \"site/content\"\n[validation]\nstrict = true\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.content_dir, PathBuf::from("site/content"));
        assert!(config.validation.strict);
        assert!(!config.validation.fail_fast);
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_yaml_and_json_files() {
        let dir = TempDir::new().unwrap();

        let yaml = dir.path().join("c.yaml");
        std::fs::write(&yaml, "validation:\n  max_errors: 3\n").unwrap();
        assert_eq!(Config::from_file(&yaml).unwrap().validation.max_errors, 3);

        let json = dir.path().join("c.json");
        std::fs::write(&json, r#"{"output": {"format": "json"}}"#).unwrap();
        assert_eq!(Config::from_file(&json).unwrap().output.format, "json");
    }

    #[test]
    fn test_save_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.validation.jobs = Some(2);
        config.save(&path).unwrap();

        let mut loaded = Config::from_file(&path).unwrap();
        loaded.source = None;
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_and_unsupported_files() {
        let dir = TempDir::new().unwrap();
        let missing = Config::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, Error::FileNotFound { .. }));

        let ini = dir.path().join("config.ini");
        std::fs::write(&ini, "x=1").unwrap();
        assert!(matches!(Config::from_file(&ini).unwrap_err(), Error::Config(_)));
    }
}
