//! Four-field language tags with range matching.

use crate::errors::LocaleError;
use crate::likely_subtags::LikelySubtags;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// `language[-script][-region][-variant]`, any subtag may be `*`.
static LOCALE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z]{2,3}|\*)(?:-([a-z]{4}|\*))?(?:-([a-z]{2}|\*))?(?:-([a-z]{3}|\*))?$")
        .expect("Invalid locale regex pattern")
});

/// One subtag position of a [`Locale`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Subtag {
    /// Not present in the tag.
    #[default]
    Absent,
    /// `*`, matches anything.
    Any,
    /// A concrete value, compared case-insensitively.
    Value(String),
}

impl Subtag {
    fn parse(raw: Option<&str>, range: bool) -> Self {
        match raw {
            Some("*") => Self::Any,
            Some(value) => Self::Value(value.to_string()),
            None if range => Self::Any,
            None => Self::Absent,
        }
    }

    /// The concrete value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Any => None,
        }
    }

    /// Either side is `*`, both are absent, or both hold the same value.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Any, _) | (_, Self::Any) | (Self::Absent, Self::Absent) => true,
            (Self::Value(a), Self::Value(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }

    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a.eq_ignore_ascii_case(b),
            _ => self == other,
        }
    }
}

/// A parsed language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// 2-3 letters.
    pub language: Subtag,
    /// 4 letters.
    pub script: Subtag,
    /// 2 letters.
    pub region: Subtag,
    /// 3 letters.
    pub variant: Subtag,
    tag: String,
}

impl Locale {
    /// Parse a tag. In range mode, missing subtags become [`Subtag::Any`].
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::Invalid`] when the tag does not have the
    /// `language[-script][-region][-variant]` shape.
    pub fn parse(tag: &str, range: bool) -> Result<Self, LocaleError> {
        let normalized = tag.replace('_', "-");
        let captures = LOCALE_REGEX
            .captures(&normalized)
            .ok_or_else(|| LocaleError::Invalid(tag.to_string()))?;
        let group = |i: usize| captures.get(i).map(|m| m.as_str());

        Ok(Self {
            language: Subtag::parse(group(1), range),
            script: Subtag::parse(group(2), range),
            region: Subtag::parse(group(3), range),
            variant: Subtag::parse(group(4), range),
            tag: tag.to_string(),
        })
    }

    /// The tag this locale was parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// Consume the locale, returning its original tag.
    #[must_use]
    pub fn into_string(self) -> String {
        self.tag
    }

    /// Strict equality of all four subtags (case-insensitive values).
    #[must_use]
    pub fn is_equal(&self, other: &Self) -> bool {
        self.language.same(&other.language)
            && self.script.same(&other.script)
            && self.region.same(&other.region)
            && self.variant.same(&other.variant)
    }

    /// Range matching: every subtag position matches.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.language.matches(&other.language)
            && self.script.matches(&other.script)
            && self.region.matches(&other.region)
            && self.variant.matches(&other.variant)
    }

    /// Accept any variant from now on.
    pub fn set_variant_range(&mut self) {
        self.variant = Subtag::Any;
    }

    /// Accept any region from now on.
    pub fn set_region_range(&mut self) {
        self.region = Subtag::Any;
    }

    /// Replace the subtags with their likely expansion. Returns `false` and
    /// leaves the locale untouched when `table` has nothing for it.
    pub fn add_likely_subtags(&mut self, table: &LikelySubtags) -> bool {
        match table.maximize(self) {
            Some(expanded) => {
                *self = expanded;
                true
            }
            None => false,
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, false)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}
