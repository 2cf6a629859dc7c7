//! Values produced by the resolver.
//!
//! [`FluentValue`] is a closed set: plain strings, numbers and date-times
//! carrying their formatting options, symbols used for selector matching,
//! and `None` for anything that failed to resolve.

use crate::intl::FormatterCache;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Display string of a [`FluentValue::None`] without a fallback.
pub const NONE_DISPLAY: &str = "???";

/// A single formatting option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Numeric option such as `minimumFractionDigits`.
    Number(f64),
    /// String option such as `type` or `dateStyle`.
    String(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Ordered `name → value` options shared by numbers, date-times and the
/// formatters built from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatOptions(BTreeMap<String, OptionValue>);

impl FormatOptions {
    /// Empty options.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set one option, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder form of [`FormatOptions::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Raw option value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.0.get(name)
    }

    /// Option value if it is a string.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(OptionValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Option value if it is a number.
    #[must_use]
    pub fn get_number(&self, name: &str) -> Option<f64> {
        match self.0.get(name) {
            Some(OptionValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Copy of `self` with every option of `other` applied on top.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged
            .0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Iterate in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether no option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical serialization used as a cache key. Keys are sorted, so two
    /// equal option sets always produce the same key.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

impl<K, V> FromIterator<(K, V)> for FormatOptions
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A number plus the options used to format it.
#[derive(Debug, Clone, PartialEq)]
pub struct FluentNumber {
    /// Numeric value.
    pub value: f64,
    /// Formatting options.
    pub options: FormatOptions,
}

impl FluentNumber {
    /// Create a number with explicit options.
    #[must_use]
    pub const fn new(value: f64, options: FormatOptions) -> Self {
        Self { value, options }
    }

    /// Parse a number literal. Unparseable input becomes `NaN`.
    #[must_use]
    pub fn from_literal(raw: &str) -> Self {
        Self::new(raw.trim().parse().unwrap_or(f64::NAN), FormatOptions::new())
    }
}

impl From<f64> for FluentNumber {
    fn from(value: f64) -> Self {
        Self::new(value, FormatOptions::new())
    }
}

/// An instant plus the options used to format it.
#[derive(Debug, Clone, PartialEq)]
pub struct FluentDateTime {
    /// The instant, in UTC.
    pub value: DateTime<Utc>,
    /// Formatting options.
    pub options: FormatOptions,
}

impl FluentDateTime {
    /// Create a date-time with explicit options.
    #[must_use]
    pub const fn new(value: DateTime<Utc>, options: FormatOptions) -> Self {
        Self { value, options }
    }
}

/// A resolved value.
#[derive(Debug, Clone, PartialEq)]
pub enum FluentValue {
    /// Already formatted text or a string argument.
    String(String),
    /// A number, formatted through the bundle's number formatter.
    Number(FluentNumber),
    /// A date-time, formatted through the bundle's date-time formatter.
    DateTime(FluentDateTime),
    /// Variant keyword, only meaningful for selector matching.
    Symbol(String),
    /// Resolution failed. Displays the fallback, or `???` without one.
    None(Option<String>),
}

impl FluentValue {
    /// Whether this is [`FluentValue::None`].
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None(_))
    }

    /// Render the value for display. Formatter failures fall back to a
    /// locale-neutral rendering.
    #[must_use]
    pub fn format(&self, cache: &FormatterCache) -> Cow<'_, str> {
        match self {
            Self::String(s) | Self::Symbol(s) => Cow::Borrowed(s),
            Self::None(Some(fallback)) => Cow::Borrowed(fallback),
            Self::None(None) => Cow::Borrowed(NONE_DISPLAY),
            Self::Number(number) => match cache.number_format(&number.options) {
                Ok(formatter) => Cow::Owned(formatter.format(number.value)),
                Err(err) => {
                    debug!("falling back to plain number rendering: {err}");
                    Cow::Owned(number.value.to_string())
                }
            },
            Self::DateTime(date) => match cache.date_time_format(&date.options) {
                Ok(formatter) => Cow::Owned(formatter.format(&date.value)),
                Err(err) => {
                    debug!("falling back to RFC 3339 date rendering: {err}");
                    Cow::Owned(date.value.to_rfc3339())
                }
            },
        }
    }

    /// Whether `self`, used as a variant key, matches `selector`.
    ///
    /// Numbers match equal numbers. Symbols match equal symbols or strings,
    /// and match a number when they name its plural category.
    #[must_use]
    pub fn matches(&self, selector: &Self, cache: &FormatterCache) -> bool {
        match (self, selector) {
            #[allow(clippy::float_cmp)]
            (Self::Number(a), Self::Number(b)) => a.value == b.value,
            (Self::Symbol(a), Self::Symbol(b) | Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Number(b)) => match cache.plural_category(b) {
                Ok(category) => a == category,
                Err(err) => {
                    debug!("plural category unavailable: {err}");
                    false
                }
            },
            _ => false,
        }
    }
}

impl From<String> for FluentValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FluentValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<FluentNumber> for FluentValue {
    fn from(value: FluentNumber) -> Self {
        Self::Number(value)
    }
}

impl From<FluentDateTime> for FluentValue {
    fn from(value: FluentDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<f64> for FluentValue {
    fn from(value: f64) -> Self {
        Self::Number(value.into())
    }
}

impl From<DateTime<Utc>> for FluentValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(FluentDateTime::new(value, FormatOptions::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intl::DefaultIntlProvider;
    use std::sync::Arc;
    use unic_langid::LanguageIdentifier;

    fn cache(locale: &str) -> FormatterCache {
        let locale: LanguageIdentifier = locale.parse().unwrap();
        FormatterCache::new(vec![locale], Arc::new(DefaultIntlProvider))
    }

    #[test]
    fn test_canonical_key_is_order_independent() {
        let a = FormatOptions::new()
            .with("minimumFractionDigits", 2.0)
            .with("style", "percent");
        let b = FormatOptions::new()
            .with("style", "percent")
            .with("minimumFractionDigits", 2.0);
        assert_eq!(a.canonical_key(), b.canonical_key());
        assert_eq!(
            a.canonical_key(),
            r#"{"minimumFractionDigits":2.0,"style":"percent"}"#
        );
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = FormatOptions::new().with("style", "decimal").with("a", 1.0);
        let call = FormatOptions::new().with("style", "percent");
        let merged = base.merge(&call);
        assert_eq!(merged.get_str("style"), Some("percent"));
        assert_eq!(merged.get_number("a"), Some(1.0));
    }

    #[test]
    fn test_number_literal() {
        assert!((FluentNumber::from_literal("-1.5").value + 1.5).abs() < f64::EPSILON);
        assert!(FluentNumber::from_literal("abc").value.is_nan());
    }

    #[test]
    fn test_none_display() {
        let cache = cache("en-US");
        assert_eq!(FluentValue::None(None).format(&cache), "???");
        assert_eq!(
            FluentValue::None(Some("name".to_string())).format(&cache),
            "name"
        );
    }

    #[test]
    fn test_number_matching() {
        let cache = cache("en-US");
        let one = FluentValue::from(1.0);
        assert!(one.matches(&FluentValue::from(1.0), &cache));
        assert!(!one.matches(&FluentValue::from(2.0), &cache));
        assert!(!one.matches(&FluentValue::from("1"), &cache));
    }

    #[test]
    fn test_symbol_matching() {
        let cache = cache("en-US");
        let key = FluentValue::Symbol("masculine".to_string());
        assert!(key.matches(&FluentValue::from("masculine"), &cache));
        assert!(key.matches(&FluentValue::Symbol("masculine".to_string()), &cache));
        assert!(!key.matches(&FluentValue::from("feminine"), &cache));

        let one = FluentValue::Symbol("one".to_string());
        let other = FluentValue::Symbol("other".to_string());
        assert!(one.matches(&FluentValue::from(1.0), &cache));
        assert!(!one.matches(&FluentValue::from(5.0), &cache));
        assert!(other.matches(&FluentValue::from(5.0), &cache));
    }

    #[test]
    fn test_plural_uses_number_options() {
        let cache = cache("en-US");
        let one_point_zero = FluentValue::Number(FluentNumber::new(
            1.0,
            FormatOptions::new().with("minimumFractionDigits", 1.0),
        ));
        assert!(FluentValue::Symbol("other".to_string()).matches(&one_point_zero, &cache));

        let ordinal = FluentValue::Number(FluentNumber::new(
            2.0,
            FormatOptions::new().with("type", "ordinal"),
        ));
        assert!(FluentValue::Symbol("two".to_string()).matches(&ordinal, &cache));
    }
}
