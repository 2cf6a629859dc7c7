//! Configuration structures

use crate::validation::{validate_file_path, validate_locale_tag, validate_log_level};
use lingo_bundle::TextTransform;
use lingo_common::{LogFormat, LoggingConfig};
use lingo_langneg::{LikelySubtags, NegotiateOptions, NegotiationStrategy};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Bundle formatting options
    #[validate]
    pub bundle: BundleSettings,

    /// Locale negotiation options
    #[validate]
    pub negotiation: NegotiationSettings,

    /// Logging configuration
    #[validate]
    pub logging: LoggingSettings,
}

impl Config {
    /// Derive validation plus the checks that span several fields.
    ///
    /// # Errors
    ///
    /// Returns every failed check, keyed by field name.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        self.negotiation.validate_negotiation()?;
        Ok(())
    }
}

/// Text transform applied by bundles built from this configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Leave text untouched
    #[default]
    None,
    /// Upper-case literal text
    Uppercase,
    /// Lower-case literal text
    Lowercase,
}

fn uppercase(text: &str) -> Cow<'_, str> {
    Cow::Owned(text.to_uppercase())
}

fn lowercase(text: &str) -> Cow<'_, str> {
    Cow::Owned(text.to_lowercase())
}

impl TransformKind {
    /// Bundle hook for this kind.
    #[must_use]
    pub fn text_transform(self) -> Option<TextTransform> {
        match self {
            Self::None => None,
            Self::Uppercase => Some(uppercase as TextTransform),
            Self::Lowercase => Some(lowercase as TextTransform),
        }
    }
}

impl FromStr for TransformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "uppercase" => Ok(Self::Uppercase),
            "lowercase" => Ok(Self::Lowercase),
            _ => Err(format!("unknown text transform: {s:?}")),
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
        })
    }
}

/// Bundle formatting options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BundleSettings {
    /// Wrap placeables in bidi isolation marks
    pub use_isolating: bool,

    /// Transform applied to literal text
    pub transform: TransformKind,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            use_isolating: true,
            transform: TransformKind::None,
        }
    }
}

/// Locale negotiation options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NegotiationSettings {
    /// Negotiation strategy
    pub strategy: NegotiationStrategy,

    /// Fallback locale, required by the `lookup` strategy
    #[validate(custom(function = "validate_locale_tag", message = "Default locale must be a valid language tag"))]
    pub default_locale: Option<String>,

    /// Extra languages whose region duplicates the language code
    pub region_matching_languages: Vec<String>,

    /// Extra likely-subtags entries, added on top of the built-in table
    pub likely_subtags: BTreeMap<String, String>,
}

impl NegotiationSettings {
    /// Checks the derive attributes cannot express.
    ///
    /// # Errors
    ///
    /// Fails when `lookup` has no default locale or a likely-subtags entry
    /// is not a language tag.
    pub fn validate_negotiation(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.strategy == NegotiationStrategy::Lookup && self.default_locale.is_none() {
            let mut err = ValidationError::new("missing_default_locale");
            err.message = Some("The lookup strategy requires a default locale".into());
            errors.add("default_locale", err);
        }

        for (tag, expanded) in &self.likely_subtags {
            if validate_locale_tag(tag).is_err() || validate_locale_tag(expanded).is_err() {
                let mut err = ValidationError::new("invalid_likely_subtags_entry");
                err.add_param("tag".into(), tag);
                errors.add("likely_subtags", err);
            }
        }

        for language in &self.region_matching_languages {
            if validate_locale_tag(language).is_err() || language.contains('-') {
                let mut err = ValidationError::new("invalid_region_matching_language");
                err.add_param("language".into(), language);
                errors.add("region_matching_languages", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Built-in likely-subtags data extended with the configured entries.
    #[must_use]
    pub fn likely_subtags_table(&self) -> LikelySubtags {
        let mut table = LikelySubtags::default().with_entries(&self.likely_subtags);
        table.region_matching_languages.extend(
            self.region_matching_languages
                .iter()
                .map(|language| language.to_ascii_lowercase()),
        );
        table
    }

    /// Negotiation options for these settings.
    #[must_use]
    pub fn negotiate_options(&self) -> NegotiateOptions {
        let mut options =
            NegotiateOptions::new(self.strategy).with_likely_subtags(self.likely_subtags_table());
        if let Some(locale) = &self.default_locale {
            options = options.with_default_locale(locale.clone());
        }
        options
    }
}

/// Output style of log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    /// Multi-line human readable output
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// JSON lines
    Json,
}

impl FromStr for LogFormatSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown log format: {s:?}")),
        }
    }
}

impl From<LogFormatSetting> for LogFormat {
    fn from(format: LogFormatSetting) -> Self {
        match format {
            LogFormatSetting::Pretty => Self::Pretty,
            LogFormatSetting::Compact => Self::Compact,
            LogFormatSetting::Json => Self::Json,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    /// Output style
    pub format: LogFormatSetting,

    /// Optional log file path
    #[validate(custom(function = "validate_file_path", message = "Log file path contains invalid characters"))]
    pub file: Option<String>,

    /// Whether to log span open/close events
    pub include_spans: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormatSetting::Compact,
            file: None,
            include_spans: false,
        }
    }
}

impl LoggingSettings {
    /// Subscriber settings for [`lingo_common::init_logging`].
    #[must_use]
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            format: self.format.into(),
            file_path: self.file.clone(),
            include_spans: self.include_spans,
            include_targets: true,
        }
    }
}
