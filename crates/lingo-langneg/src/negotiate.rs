//! Matching requested locales against the available ones.
//!
//! Every requested tag goes through the same cascade, from the strictest to
//! the loosest comparison:
//!
//! 1. exact (case-insensitive) tag equality,
//! 2. range match (`en` available matches `en-US` requested),
//! 3. likely-subtags expansion of the requested tag, then range match,
//! 4. requested variant widened to `*`,
//! 5. requested region widened to `*`.
//!
//! An available locale is handed out at most once.

use crate::errors::NegotiationError;
use crate::likely_subtags::LikelySubtags;
use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// How many locales to return and when to stop looking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegotiationStrategy {
    /// Every available locale that matches any requested locale.
    #[default]
    Filtering,
    /// The best available match for each requested locale.
    Matching,
    /// A single locale: the first match, else the default.
    Lookup,
}

impl NegotiationStrategy {
    /// Lower-case name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filtering => "filtering",
            Self::Matching => "matching",
            Self::Lookup => "lookup",
        }
    }
}

impl FromStr for NegotiationStrategy {
    type Err = NegotiationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "filtering" => Ok(Self::Filtering),
            "matching" => Ok(Self::Matching),
            "lookup" => Ok(Self::Lookup),
            _ => Err(NegotiationError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for NegotiationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`negotiate_languages`].
#[derive(Debug, Clone, Default)]
pub struct NegotiateOptions {
    /// Defaults to [`NegotiationStrategy::Filtering`].
    pub strategy: NegotiationStrategy,
    /// Appended when missing; required for [`NegotiationStrategy::Lookup`].
    pub default_locale: Option<String>,
    /// Defaults to [`LikelySubtags::default`].
    pub likely_subtags: Option<LikelySubtags>,
}

impl NegotiateOptions {
    /// Options with the given strategy.
    #[must_use]
    pub fn new(strategy: NegotiationStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Set the default locale.
    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    /// Use a custom likely-subtags table.
    #[must_use]
    pub fn with_likely_subtags(mut self, table: LikelySubtags) -> Self {
        self.likely_subtags = Some(table);
        self
    }
}

enum Progress {
    /// Keep walking the cascade for this requested locale.
    Continue,
    /// Done with this requested locale.
    NextRequested,
    /// Done with negotiation.
    Finished,
}

struct Matches<'a> {
    strategy: NegotiationStrategy,
    pool: Vec<Locale>,
    supported: &'a mut Vec<String>,
}

impl Matches<'_> {
    /// Move every pooled locale accepted by `accept` into the result,
    /// stopping early as the strategy demands.
    fn take(&mut self, stage: &str, accept: impl Fn(&Locale) -> bool) -> Progress {
        let mut found = false;
        let mut i = 0;
        while i < self.pool.len() {
            if !accept(&self.pool[i]) {
                i += 1;
                continue;
            }

            let locale = self.pool.remove(i).into_string();
            trace!(stage, locale = %locale, "matched available locale");
            push_unique(self.supported, locale);
            found = true;

            match self.strategy {
                NegotiationStrategy::Lookup => return Progress::Finished,
                NegotiationStrategy::Matching => return Progress::NextRequested,
                NegotiationStrategy::Filtering => {}
            }
        }

        if found && self.strategy != NegotiationStrategy::Filtering {
            Progress::NextRequested
        } else {
            Progress::Continue
        }
    }
}

/// Negotiate `requested` (in preference order) against `available`.
///
/// Invalid tags on either side are ignored. The result keeps the spelling
/// used in `available`.
///
/// # Errors
///
/// [`NegotiationError::MissingDefaultLocale`] when the strategy is
/// [`NegotiationStrategy::Lookup`] and no default locale is set.
pub fn negotiate_languages<R, A>(
    requested: &[R],
    available: &[A],
    options: &NegotiateOptions,
) -> Result<Vec<String>, NegotiationError>
where
    R: AsRef<str>,
    A: AsRef<str>,
{
    if options.strategy == NegotiationStrategy::Lookup && options.default_locale.is_none() {
        return Err(NegotiationError::MissingDefaultLocale);
    }

    let default_table;
    let table = match &options.likely_subtags {
        Some(table) => table,
        None => {
            default_table = LikelySubtags::default();
            &default_table
        }
    };

    let mut supported = filter_matches(requested, available, options.strategy, table);

    match (&options.default_locale, options.strategy) {
        (Some(default), NegotiationStrategy::Lookup) if supported.is_empty() => {
            supported.push(default.clone());
        }
        (Some(default), NegotiationStrategy::Filtering | NegotiationStrategy::Matching) => {
            push_unique(&mut supported, default.clone());
        }
        _ => {}
    }

    debug!(
        strategy = %options.strategy,
        requested = requested.len(),
        available = available.len(),
        result = ?supported,
        "negotiated languages"
    );
    Ok(supported)
}

fn filter_matches<R, A>(
    requested: &[R],
    available: &[A],
    strategy: NegotiationStrategy,
    table: &LikelySubtags,
) -> Vec<String>
where
    R: AsRef<str>,
    A: AsRef<str>,
{
    let mut supported = Vec::new();

    let pool = available
        .iter()
        .filter_map(|tag| match Locale::parse(tag.as_ref(), true) {
            Ok(locale) => Some(locale),
            Err(err) => {
                debug!("ignoring available locale: {err}");
                None
            }
        })
        .collect();

    let mut matches = Matches {
        strategy,
        pool,
        supported: &mut supported,
    };

    for tag in requested {
        let lowered = tag.as_ref().to_ascii_lowercase();
        let mut wanted = match Locale::parse(&lowered, false) {
            Ok(locale) => locale,
            Err(err) => {
                debug!("ignoring requested locale: {err}");
                continue;
            }
        };

        let exact = normalize(&lowered);
        let mut progress = matches.take("exact", |locale| normalize(locale.as_str()) == exact);

        for stage in ["range", "likely-subtags", "variant-range", "region-range"] {
            if !matches!(progress, Progress::Continue) {
                break;
            }
            match stage {
                "likely-subtags" => {
                    if !wanted.add_likely_subtags(table) {
                        continue;
                    }
                }
                "variant-range" => wanted.set_variant_range(),
                "region-range" => wanted.set_region_range(),
                _ => {}
            }
            progress = matches.take(stage, |locale| wanted.matches(locale));
        }

        if matches!(progress, Progress::Finished) {
            break;
        }
    }

    supported
}

fn normalize(tag: &str) -> String {
    tag.replace('_', "-").to_ascii_lowercase()
}

fn push_unique(list: &mut Vec<String>, tag: String) {
    if !list.iter().any(|existing| normalize(existing) == normalize(&tag)) {
        list.push(tag);
    }
}
