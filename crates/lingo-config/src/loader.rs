//! Configuration loading utilities

use crate::settings::Config;
use lingo_common::{LingoError, Result as LingoResult};
use std::env;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "LINGO_CONFIG_PATH";

/// File names tried in the working directory, in order
pub const DEFAULT_CONFIG_FILES: &[&str] = &["lingo.toml", "lingo.yaml", "lingo.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension is neither TOML nor YAML
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),
}

impl From<ConfigError> for LingoError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ValidationError(errors) => {
                let message = format!("invalid configuration: {errors}");
                match errors.errors().keys().next() {
                    Some(field) => Self::validation_field(message, *field),
                    None => Self::validation(message),
                }
            }
            other => Self::config_with_source("could not load configuration", other),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a TOML or YAML file, apply `LINGO_*` environment overrides and
    /// validate the result.
    ///
    /// # Errors
    ///
    /// Fails on unreadable or malformed files, bad override values and
    /// validation failures.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config_with(path, |var| env::var(var).ok())
    }

    /// Like [`ConfigLoader::load_config`], reading overrides through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load_config`].
    pub fn load_config_with<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse_str(&content, path)?;
        debug!(path = %path.display(), "loaded configuration file");

        Self::apply_overrides(&mut config, lookup)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Parse configuration text, picking the format from `path`'s extension.
    ///
    /// # Errors
    ///
    /// Fails on malformed text or an unknown extension.
    pub fn parse_str(content: &str, path: &Path) -> Result<Config, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("yaml" | "yml") => Ok(serde_yaml::from_str(content)?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Load from `LINGO_CONFIG_PATH`, else the first default file present in
    /// the working directory, else built-in defaults. Environment overrides
    /// apply in every case.
    ///
    /// # Errors
    ///
    /// Fails when the chosen file cannot be loaded or the result is invalid.
    pub fn load() -> LingoResult<Config> {
        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            return Ok(Self::load_config(&config_path)?);
        }

        if let Some(path) = DEFAULT_CONFIG_FILES
            .iter()
            .find(|name| Path::new(name).exists())
        {
            return Ok(Self::load_config(path)?);
        }

        debug!("no configuration file found, using defaults");
        Ok(Self::defaults_with(|var| env::var(var).ok())?)
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load_config`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LingoResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Built-in defaults with overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Fails on bad override values or when the overrides make the
    /// configuration invalid.
    pub fn defaults_with<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        Self::apply_overrides(&mut config, lookup)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Apply `LINGO_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Fails when a variable holds a value of the wrong shape.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Bundle overrides
        if let Some(value) = parse_var(&lookup, "LINGO_USE_ISOLATING")? {
            config.bundle.use_isolating = value;
        }
        if let Some(value) = parse_var(&lookup, "LINGO_TRANSFORM")? {
            config.bundle.transform = value;
        }

        // Negotiation overrides
        if let Some(value) = parse_var(&lookup, "LINGO_STRATEGY")? {
            config.negotiation.strategy = value;
        }
        if let Some(locale) = lookup("LINGO_DEFAULT_LOCALE") {
            config.negotiation.default_locale = Some(locale).filter(|l| !l.is_empty());
        }
        if let Some(languages) = lookup("LINGO_REGION_MATCHING_LANGUAGES") {
            config.negotiation.region_matching_languages = languages
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Logging overrides
        if let Some(level) = lookup("LINGO_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(value) = parse_var(&lookup, "LINGO_LOG_FORMAT")? {
            config.logging.format = value;
        }
        if let Some(file) = lookup("LINGO_LOG_FILE") {
            config.logging.file = Some(file);
        }

        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Into<Box<dyn std::error::Error + Send + Sync>>,
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|raw| {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::EnvParseError {
                var: var.to_string(),
                source: e.into(),
            })
        })
        .transpose()
}
