//! Fallback chain over several bundles.
//!
//! Bundles are tried in order, typically the output of language
//! negotiation. Each key is translated by the first bundle that has it.

use crate::args::FluentArgs;
use crate::bundle::FluentBundle;
use crate::errors::FluentError;
use serde::Serialize;
use tracing::warn;

/// A message id plus the arguments to format it with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct L10nKey {
    /// Message id.
    pub id: String,
    /// Arguments, if any.
    pub args: Option<FluentArgs>,
}

impl L10nKey {
    /// Key without arguments.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            args: None,
        }
    }

    /// Attach arguments.
    #[must_use]
    pub fn with_args(mut self, args: FluentArgs) -> Self {
        self.args = Some(args);
        self
    }
}

impl From<&str> for L10nKey {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Formatted attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct L10nAttribute {
    /// Attribute name.
    pub name: String,
    /// Formatted value.
    pub value: String,
}

/// Formatted value and attributes of one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct L10nMessage {
    /// `None` when the message only has attributes.
    pub value: Option<String>,
    /// Attributes in source order.
    pub attributes: Vec<L10nAttribute>,
}

/// Ordered list of bundles with per-key fallback.
#[derive(Debug, Default)]
pub struct Localization {
    bundles: Vec<FluentBundle>,
}

impl Localization {
    /// Chain over `bundles`, most preferred first.
    #[must_use]
    pub fn new(bundles: Vec<FluentBundle>) -> Self {
        Self { bundles }
    }

    /// Append a less preferred bundle.
    pub fn push(&mut self, bundle: FluentBundle) {
        self.bundles.push(bundle);
    }

    /// Bundles in fallback order.
    #[must_use]
    pub fn bundles(&self) -> &[FluentBundle] {
        &self.bundles
    }

    /// Format one message value.
    #[must_use]
    pub fn format_value(&self, id: &str, args: Option<&FluentArgs>) -> Option<String> {
        let key = L10nKey {
            id: id.to_string(),
            args: args.cloned(),
        };
        self.format_values(std::slice::from_ref(&key))
            .pop()
            .flatten()
    }

    /// Format message values. `None` for keys no bundle has and for
    /// messages without a value.
    #[must_use]
    pub fn format_values(&self, keys: &[L10nKey]) -> Vec<Option<String>> {
        self.format_with_fallback(keys, |bundle, key, errors| {
            bundle
                .get_message(&key.id)
                .and_then(|entry| bundle.format(entry, key.args.as_ref(), errors))
        })
    }

    /// Format values and attributes. `None` for keys no bundle has.
    #[must_use]
    pub fn format_messages(&self, keys: &[L10nKey]) -> Vec<Option<L10nMessage>> {
        self.format_with_fallback(keys, |bundle, key, errors| {
            let entry = bundle.get_message(&key.id)?;
            let args = key.args.as_ref();
            let value = bundle.format(entry, args, errors);
            let attributes = entry
                .attributes()
                .iter()
                .map(|attr| L10nAttribute {
                    name: attr.id.clone(),
                    value: bundle.format_pattern(&attr.value, args, errors),
                })
                .collect();
            Some(L10nMessage { value, attributes })
        })
    }

    /// Run `method` for each key against the first bundle that has the
    /// message. Keys no bundle knows stay `None`.
    fn format_with_fallback<T, F>(&self, keys: &[L10nKey], method: F) -> Vec<Option<T>>
    where
        F: Fn(&FluentBundle, &L10nKey, &mut Vec<FluentError>) -> Option<T>,
    {
        let mut translations: Vec<Option<T>> = keys.iter().map(|_| None).collect();
        let mut done = vec![false; keys.len()];

        for bundle in &self.bundles {
            let mut missing = Vec::new();
            for (i, key) in keys.iter().enumerate() {
                if done[i] {
                    continue;
                }
                if !bundle.has_message(&key.id) {
                    missing.push(key.id.as_str());
                    continue;
                }

                let mut errors = Vec::new();
                translations[i] = method(bundle, key, &mut errors);
                done[i] = true;
                for error in &errors {
                    warn!(id = %key.id, locale = ?bundle.locales().first(), "{error}");
                }
            }

            if missing.is_empty() {
                break;
            }
            warn!(
                locale = ?bundle.locales().first(),
                "Missing translations: {}",
                missing.join(", ")
            );
        }

        translations
    }
}
