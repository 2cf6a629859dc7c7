//! Locale-sensitive formatting capability and its per-bundle cache.
//!
//! A host plugs its own number, date-time and plural-rule implementations in
//! through [`IntlProvider`]. [`DefaultIntlProvider`] ships CLDR plural rules
//! and a locale-neutral rendering of numbers and dates.

use crate::types::{FluentNumber, FormatOptions, OptionValue};
use chrono::{DateTime, Utc};
use intl_pluralrules::{PluralCategory, PluralRuleType, PluralRules as IntlPluralRules};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;
use unic_langid::LanguageIdentifier;

/// Formatter families kept in a [`FormatterCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatterKind {
    /// Number formatting.
    Number,
    /// Date and time formatting.
    DateTime,
    /// Plural category selection.
    PluralRules,
}

/// Failure to build or use a formatter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntlError {
    /// An option has a value the provider cannot honour.
    #[error("Invalid value for option {name}: {value}")]
    InvalidOption {
        /// Option name.
        name: String,
        /// Offending value.
        value: String,
    },

    /// No locale in the list is supported.
    #[error("No supported locale for {kind:?} among {locales}")]
    UnsupportedLocale {
        /// Formatter family.
        kind: FormatterKind,
        /// Requested locales, comma separated.
        locales: String,
    },

    /// The underlying implementation rejected the input.
    #[error("Formatter error: {0}")]
    Backend(String),
}

/// Formats numbers for display.
pub trait NumberFormat: Send + Sync {
    /// Render `value`.
    fn format(&self, value: f64) -> String;
}

/// Formats instants for display.
pub trait DateTimeFormat: Send + Sync {
    /// Render `value`.
    fn format(&self, value: &DateTime<Utc>) -> String;
}

/// Maps numbers to plural categories (`zero`, `one`, `two`, `few`, `many`,
/// `other`).
pub trait PluralSelector: Send + Sync {
    /// Category of `value`. Non-finite values fall in `other`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the plural operand.
    fn select(&self, value: f64) -> Result<&'static str, IntlError>;
}

/// Builds locale-aware formatters for a locale list and a set of options.
pub trait IntlProvider: Send + Sync {
    /// Number formatter.
    ///
    /// # Errors
    ///
    /// Returns an error when the options or locales are not supported.
    fn number_format(
        &self,
        locales: &[LanguageIdentifier],
        options: &FormatOptions,
    ) -> Result<Arc<dyn NumberFormat>, IntlError>;

    /// Date-time formatter.
    ///
    /// # Errors
    ///
    /// Returns an error when the options or locales are not supported.
    fn date_time_format(
        &self,
        locales: &[LanguageIdentifier],
        options: &FormatOptions,
    ) -> Result<Arc<dyn DateTimeFormat>, IntlError>;

    /// Plural rules.
    ///
    /// # Errors
    ///
    /// Returns an error when the options or locales are not supported.
    fn plural_rules(
        &self,
        locales: &[LanguageIdentifier],
        options: &FormatOptions,
    ) -> Result<Arc<dyn PluralSelector>, IntlError>;
}

#[derive(Clone)]
enum CachedFormatter {
    Number(Arc<dyn NumberFormat>),
    DateTime(Arc<dyn DateTimeFormat>),
    PluralRules(Arc<dyn PluralSelector>),
}

type CacheKey = (FormatterKind, String);

/// Memoizes formatters by `(kind, canonical options)` for one locale list.
///
/// The cache only grows. It is owned by a bundle and dropped with it.
pub struct FormatterCache {
    locales: Vec<LanguageIdentifier>,
    provider: Arc<dyn IntlProvider>,
    formatters: Mutex<HashMap<CacheKey, CachedFormatter>>,
}

impl fmt::Debug for FormatterCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterCache")
            .field("locales", &self.locales)
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}

impl FormatterCache {
    /// Empty cache for `locales`, building through `provider`.
    #[must_use]
    pub fn new(locales: Vec<LanguageIdentifier>, provider: Arc<dyn IntlProvider>) -> Self {
        Self {
            locales,
            provider,
            formatters: Mutex::new(HashMap::new()),
        }
    }

    /// Locales formatters are built for.
    #[must_use]
    pub fn locales(&self) -> &[LanguageIdentifier] {
        &self.locales
    }

    /// Number of formatters built so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.formatters.lock().len()
    }

    /// Whether nothing has been built yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formatters.lock().is_empty()
    }

    fn lookup(&self, key: &CacheKey) -> Option<CachedFormatter> {
        self.formatters.lock().get(key).cloned()
    }

    // The lock is not held while the provider runs, so a provider may use
    // the cache itself without deadlocking.
    fn store(&self, key: CacheKey, formatter: CachedFormatter) {
        trace!(kind = ?key.0, options = %key.1, "caching formatter");
        self.formatters.lock().entry(key).or_insert(formatter);
    }

    /// Number formatter for `options`, built once.
    ///
    /// # Errors
    ///
    /// Propagates the provider's error.
    pub fn number_format(&self, options: &FormatOptions) -> Result<Arc<dyn NumberFormat>, IntlError> {
        let key = (FormatterKind::Number, options.canonical_key());
        if let Some(CachedFormatter::Number(formatter)) = self.lookup(&key) {
            return Ok(formatter);
        }
        let formatter = self.provider.number_format(&self.locales, options)?;
        self.store(key, CachedFormatter::Number(Arc::clone(&formatter)));
        Ok(formatter)
    }

    /// Date-time formatter for `options`, built once.
    ///
    /// # Errors
    ///
    /// Propagates the provider's error.
    pub fn date_time_format(
        &self,
        options: &FormatOptions,
    ) -> Result<Arc<dyn DateTimeFormat>, IntlError> {
        let key = (FormatterKind::DateTime, options.canonical_key());
        if let Some(CachedFormatter::DateTime(formatter)) = self.lookup(&key) {
            return Ok(formatter);
        }
        let formatter = self.provider.date_time_format(&self.locales, options)?;
        self.store(key, CachedFormatter::DateTime(Arc::clone(&formatter)));
        Ok(formatter)
    }

    /// Plural rules for `options`, built once.
    ///
    /// # Errors
    ///
    /// Propagates the provider's error.
    pub fn plural_rules(&self, options: &FormatOptions) -> Result<Arc<dyn PluralSelector>, IntlError> {
        let key = (FormatterKind::PluralRules, options.canonical_key());
        if let Some(CachedFormatter::PluralRules(rules)) = self.lookup(&key) {
            return Ok(rules);
        }
        let rules = self.provider.plural_rules(&self.locales, options)?;
        self.store(key, CachedFormatter::PluralRules(Arc::clone(&rules)));
        Ok(rules)
    }

    /// Plural category of `number`, using the number's own options.
    ///
    /// # Errors
    ///
    /// Fails when no plural rules can be built or the number has no category.
    pub fn plural_category(&self, number: &FluentNumber) -> Result<&'static str, IntlError> {
        self.plural_rules(&number.options)?.select(number.value)
    }
}

/// Built-in provider: CLDR plural rules from `intl_pluralrules`, and plain
/// digit and ISO-style date rendering for the supported options.
///
/// Number options: `style` (`decimal`, `percent`), `minimumIntegerDigits`,
/// `minimumFractionDigits`, `maximumFractionDigits`, `useGrouping`.
/// Date-time options: `dateStyle`, `timeStyle` (`full`, `long`, `medium`,
/// `short`). Plural options: `type` (`cardinal`, `ordinal`) and
/// `minimumFractionDigits`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIntlProvider;

impl IntlProvider for DefaultIntlProvider {
    fn number_format(
        &self,
        _locales: &[LanguageIdentifier],
        options: &FormatOptions,
    ) -> Result<Arc<dyn NumberFormat>, IntlError> {
        Ok(Arc::new(DecimalFormat::from_options(options)?))
    }

    fn date_time_format(
        &self,
        _locales: &[LanguageIdentifier],
        options: &FormatOptions,
    ) -> Result<Arc<dyn DateTimeFormat>, IntlError> {
        Ok(Arc::new(PatternDateFormat::from_options(options)?))
    }

    fn plural_rules(
        &self,
        locales: &[LanguageIdentifier],
        options: &FormatOptions,
    ) -> Result<Arc<dyn PluralSelector>, IntlError> {
        let ordinal = match options.get("type") {
            None => false,
            Some(OptionValue::String(s)) if s == "cardinal" => false,
            Some(OptionValue::String(s)) if s == "ordinal" => true,
            Some(other) => return Err(invalid("type", other)),
        };
        let fraction_digits = digits_option(options, "minimumFractionDigits", 20)?;

        for candidate in plural_candidates(locales) {
            let rule_type = if ordinal {
                PluralRuleType::ORDINAL
            } else {
                PluralRuleType::CARDINAL
            };
            if let Ok(rules) = IntlPluralRules::create(candidate.clone(), rule_type) {
                trace!(locale = %candidate, "plural rules selected");
                return Ok(Arc::new(CldrPluralRules {
                    rules,
                    fraction_digits,
                }));
            }
        }

        Err(IntlError::UnsupportedLocale {
            kind: FormatterKind::PluralRules,
            locales: locales
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

/// Each locale, then its bare language, then `en`.
fn plural_candidates(locales: &[LanguageIdentifier]) -> Vec<LanguageIdentifier> {
    let mut candidates = Vec::with_capacity(locales.len() * 2 + 1);
    for locale in locales {
        candidates.push(locale.clone());
        let mut base = locale.clone();
        base.script = None;
        base.region = None;
        base.clear_variants();
        candidates.push(base);
    }
    if let Ok(en) = "en".parse() {
        candidates.push(en);
    }
    candidates.dedup();
    candidates
}

fn invalid(name: &str, value: &OptionValue) -> IntlError {
    IntlError::InvalidOption {
        name: name.to_string(),
        value: value.to_string(),
    }
}

/// Non-negative integer option no larger than `max`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn digits_option(options: &FormatOptions, name: &str, max: u8) -> Result<Option<usize>, IntlError> {
    let Some(value) = options.get(name) else {
        return Ok(None);
    };
    let number = match value {
        OptionValue::Number(n) => *n,
        OptionValue::String(s) => s.trim().parse().map_err(|_| invalid(name, value))?,
    };
    if number.fract() != 0.0 || number < 0.0 || number > f64::from(max) {
        return Err(invalid(name, value));
    }
    Ok(Some(number as usize))
}

fn plural_name(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::ZERO => "zero",
        PluralCategory::ONE => "one",
        PluralCategory::TWO => "two",
        PluralCategory::FEW => "few",
        PluralCategory::MANY => "many",
        PluralCategory::OTHER => "other",
    }
}

struct CldrPluralRules {
    rules: IntlPluralRules,
    fraction_digits: Option<usize>,
}

impl PluralSelector for CldrPluralRules {
    fn select(&self, value: f64) -> Result<&'static str, IntlError> {
        if !value.is_finite() {
            return Ok(plural_name(PluralCategory::OTHER));
        }
        // Operands come from the rendered number so that `1.0` and `1` can
        // land in different categories.
        let operand = match self.fraction_digits {
            Some(digits) => format!("{value:.digits$}"),
            None => value.to_string(),
        };
        self.rules
            .select(operand.as_str())
            .map(plural_name)
            .map_err(|err| IntlError::Backend(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DecimalFormat {
    percent: bool,
    minimum_integer_digits: usize,
    minimum_fraction_digits: usize,
    maximum_fraction_digits: usize,
    grouping: bool,
}

impl DecimalFormat {
    fn from_options(options: &FormatOptions) -> Result<Self, IntlError> {
        let percent = match options.get("style") {
            None => false,
            Some(OptionValue::String(s)) if s == "decimal" => false,
            Some(OptionValue::String(s)) if s == "percent" => true,
            Some(other) => return Err(invalid("style", other)),
        };
        let grouping = match options.get("useGrouping") {
            None => false,
            Some(OptionValue::String(s)) if matches!(s.as_str(), "true" | "always" | "auto") => true,
            Some(OptionValue::String(s)) if s == "false" => false,
            Some(OptionValue::Number(n)) => *n != 0.0,
            Some(other) => return Err(invalid("useGrouping", other)),
        };

        let minimum_integer_digits = digits_option(options, "minimumIntegerDigits", 21)?.unwrap_or(1);
        let minimum_fraction_digits =
            digits_option(options, "minimumFractionDigits", 20)?.unwrap_or(0);
        let maximum_fraction_digits = digits_option(options, "maximumFractionDigits", 20)?
            .unwrap_or_else(|| minimum_fraction_digits.max(if percent { 0 } else { 3 }));

        if maximum_fraction_digits < minimum_fraction_digits {
            return Err(IntlError::InvalidOption {
                name: "maximumFractionDigits".to_string(),
                value: maximum_fraction_digits.to_string(),
            });
        }

        Ok(Self {
            percent,
            minimum_integer_digits: minimum_integer_digits.max(1),
            minimum_fraction_digits,
            maximum_fraction_digits,
            grouping,
        })
    }
}

impl NumberFormat for DecimalFormat {
    fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let scaled = if self.percent { value * 100.0 } else { value };
        let rendered = format!("{:.*}", self.maximum_fraction_digits, scaled.abs());
        let (integer, fraction) = rendered
            .split_once('.')
            .unwrap_or((rendered.as_str(), ""));

        let mut fraction = fraction.trim_end_matches('0').to_string();
        while fraction.len() < self.minimum_fraction_digits {
            fraction.push('0');
        }

        let mut integer = format!("{integer:0>width$}", width = self.minimum_integer_digits);
        if self.grouping {
            integer = group_thousands(&integer);
        }

        let negative = scaled < 0.0 && rendered.bytes().any(|b| (b'1'..=b'9').contains(&b));

        let mut out = String::with_capacity(integer.len() + fraction.len() + 3);
        if negative {
            out.push('-');
        }
        out.push_str(&integer);
        if !fraction.is_empty() {
            out.push('.');
            out.push_str(&fraction);
        }
        if self.percent {
            out.push('%');
        }
        out
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PatternDateFormat {
    pattern: String,
}

impl PatternDateFormat {
    fn from_options(options: &FormatOptions) -> Result<Self, IntlError> {
        let date = match options.get("dateStyle") {
            None => None,
            Some(OptionValue::String(s)) => Some(match s.as_str() {
                "full" => "%A, %B %-d, %Y",
                "long" => "%B %-d, %Y",
                "medium" => "%b %-d, %Y",
                "short" => "%Y-%m-%d",
                _ => return Err(invalid("dateStyle", &OptionValue::String(s.clone()))),
            }),
            Some(other) => return Err(invalid("dateStyle", other)),
        };
        let time = match options.get("timeStyle") {
            None => None,
            Some(OptionValue::String(s)) => Some(match s.as_str() {
                "full" | "long" => "%H:%M:%S %Z",
                "medium" => "%H:%M:%S",
                "short" => "%H:%M",
                _ => return Err(invalid("timeStyle", &OptionValue::String(s.clone()))),
            }),
            Some(other) => return Err(invalid("timeStyle", other)),
        };

        let pattern = match (date, time) {
            (Some(date), Some(time)) => format!("{date}, {time}"),
            (Some(date), None) => date.to_string(),
            (None, Some(time)) => time.to_string(),
            (None, None) => "%Y-%m-%d".to_string(),
        };
        Ok(Self { pattern })
    }
}

impl DateTimeFormat for PatternDateFormat {
    fn format(&self, value: &DateTime<Utc>) -> String {
        value.format(&self.pattern).to_string()
    }
}
