//! # Lingo Config
//!
//! Configuration for hosts of the localization engine: bundle formatting
//! options, negotiation settings and logging.
//!
//! Configuration is read from TOML or YAML, overridden by `LINGO_*`
//! environment variables and validated before use.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader, CONFIG_PATH_VAR, DEFAULT_CONFIG_FILES};
pub use settings::{
    BundleSettings, Config, LogFormatSetting, LoggingSettings, NegotiationSettings, TransformKind,
};
