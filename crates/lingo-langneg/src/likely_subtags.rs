//! Curated likely-subtags data used to expand under-specified tags.
//!
//! This is a small stand-in for the CLDR table. It is plain data so that a
//! host can extend or replace it without touching the negotiation code.

use crate::locale::{Locale, Subtag};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const DEFAULT_TABLE: &[(&str, &str)] = &[
    ("ar", "ar-arab-eg"),
    ("az-arab", "az-arab-ir"),
    ("az-ir", "az-arab-ir"),
    ("be", "be-cyrl-by"),
    ("da", "da-latn-dk"),
    ("el", "el-grek-gr"),
    ("en", "en-latn-us"),
    ("fa", "fa-arab-ir"),
    ("ja", "ja-jpan-jp"),
    ("ko", "ko-kore-kr"),
    ("pt", "pt-latn-br"),
    ("sr", "sr-cyrl-rs"),
    ("sr-ru", "sr-latn-ru"),
    ("sv", "sv-latn-se"),
    ("ta", "ta-taml-in"),
    ("uk", "uk-cyrl-ua"),
    ("zh", "zh-hans-cn"),
    ("zh-gb", "zh-hant-gb"),
    ("zh-us", "zh-hant-us"),
];

/// Languages whose main region shares the language code (`de` → `de-DE`).
const REGION_MATCHING_LANGUAGES: &[&str] = &[
    "az", "bg", "cs", "de", "es", "fi", "fr", "hu", "it", "lt", "lv", "nl", "pl", "ro", "ru",
];

/// Expansion table plus the region-duplication whitelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LikelySubtags {
    /// Lower-case tag → lower-case maximized tag.
    pub table: BTreeMap<String, String>,
    /// Languages expanded by copying the language code into the region.
    pub region_matching_languages: BTreeSet<String>,
}

impl Default for LikelySubtags {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE
                .iter()
                .map(|(tag, expanded)| ((*tag).to_string(), (*expanded).to_string()))
                .collect(),
            region_matching_languages: REGION_MATCHING_LANGUAGES
                .iter()
                .map(|lang| (*lang).to_string())
                .collect(),
        }
    }
}

impl LikelySubtags {
    /// A table that expands nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
            region_matching_languages: BTreeSet::new(),
        }
    }

    /// Add or replace one expansion.
    pub fn insert(&mut self, tag: impl AsRef<str>, expanded: impl AsRef<str>) {
        self.table.insert(
            tag.as_ref().to_ascii_lowercase(),
            expanded.as_ref().to_ascii_lowercase(),
        );
    }

    /// Extend with `(tag, expansion)` pairs.
    #[must_use]
    pub fn with_entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (tag, expanded) in entries {
            self.insert(tag, expanded);
        }
        self
    }

    /// Replace the region-duplication whitelist.
    #[must_use]
    pub fn with_region_matching_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.region_matching_languages = languages
            .into_iter()
            .map(|lang| lang.as_ref().to_ascii_lowercase())
            .collect();
        self
    }

    /// Likely expansion of `locale`, if known.
    #[must_use]
    pub fn maximize(&self, locale: &Locale) -> Option<Locale> {
        let key = locale.as_str().replace('_', "-").to_ascii_lowercase();
        if let Some(expanded) = self.table.get(&key) {
            return Locale::parse(expanded, false).ok();
        }

        let language = locale.language.value()?.to_ascii_lowercase();
        if locale.region != Subtag::Absent || !self.region_matching_languages.contains(&language) {
            return None;
        }

        let mut tag = language.clone();
        if let Some(script) = locale.script.value() {
            tag = format!("{tag}-{}", script.to_ascii_lowercase());
        }
        tag = format!("{tag}-{language}");
        if let Some(variant) = locale.variant.value() {
            tag = format!("{tag}-{}", variant.to_ascii_lowercase());
        }
        let mut expanded = Locale::parse(&tag, false).ok()?;
        if locale.variant == Subtag::Any {
            expanded.set_variant_range();
        }
        Some(expanded)
    }
}
