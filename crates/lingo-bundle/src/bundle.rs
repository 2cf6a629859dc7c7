//! Message bundles: entries for one locale list, plus everything needed to
//! format them.

use crate::args::FluentArgs;
use crate::builtins::FunctionResult;
use crate::errors::{EntryKind, FluentError};
use crate::intl::{DefaultIntlProvider, FormatterCache, IntlProvider};
use crate::resolver::Scope;
use crate::types::FluentValue;
use lingo_syntax::{is_term_id, Entry, Pattern, Resource};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

/// A custom function callable from messages as `NAME(...)`.
///
/// Receives resolved positional and named arguments. An `Err` makes the
/// call resolve to a `None` value.
pub type FluentFunction = Box<
    dyn Fn(&[FluentValue], &BTreeMap<String, FluentValue>) -> FunctionResult + Send + Sync,
>;

/// Hook applied to every piece of literal text during formatting.
pub type TextTransform = fn(&str) -> Cow<'_, str>;

/// Entries for one locale list.
///
/// Messages and terms live in separate stores. The first entry added under
/// an id wins; later ones are rejected with [`FluentError::Overriding`].
/// Entries are never removed.
pub struct FluentBundle {
    locales: Vec<LanguageIdentifier>,
    messages: BTreeMap<String, Entry>,
    terms: BTreeMap<String, Entry>,
    functions: HashMap<String, FluentFunction>,
    use_isolating: bool,
    transform: Option<TextTransform>,
    intls: FormatterCache,
}

impl fmt::Debug for FluentBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluentBundle")
            .field("locales", &self.locales)
            .field("messages", &self.messages.len())
            .field("terms", &self.terms.len())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("use_isolating", &self.use_isolating)
            .field("transform", &self.transform.is_some())
            .finish_non_exhaustive()
    }
}

impl FluentBundle {
    /// Empty bundle for `locales`, the first being the primary one.
    /// Isolation is on and the [`DefaultIntlProvider`] is used.
    #[must_use]
    pub fn new(locales: Vec<LanguageIdentifier>) -> Self {
        let intls = FormatterCache::new(locales.clone(), Arc::new(DefaultIntlProvider));
        Self {
            locales,
            messages: BTreeMap::new(),
            terms: BTreeMap::new(),
            functions: HashMap::new(),
            use_isolating: true,
            transform: None,
            intls,
        }
    }

    /// Locales this bundle formats for.
    #[must_use]
    pub fn locales(&self) -> &[LanguageIdentifier] {
        &self.locales
    }

    /// Wrap placeables in U+2068/U+2069 when a pattern has more than one
    /// element.
    pub fn set_use_isolating(&mut self, value: bool) {
        self.use_isolating = value;
    }

    /// Whether placeables are isolated.
    #[must_use]
    pub const fn use_isolating(&self) -> bool {
        self.use_isolating
    }

    /// Set or clear the text transform.
    pub fn set_transform(&mut self, transform: Option<TextTransform>) {
        self.transform = transform;
    }

    /// Replace the formatting capability. Formatters built so far are
    /// dropped with the old cache.
    pub fn set_intl_provider(&mut self, provider: Arc<dyn IntlProvider>) {
        self.intls = FormatterCache::new(self.locales.clone(), provider);
    }

    /// Formatter cache of this bundle.
    #[must_use]
    pub const fn intls(&self) -> &FormatterCache {
        &self.intls
    }

    /// Register a custom function. Custom functions take precedence over the
    /// built-in `NUMBER` and `DATETIME`; registering a name twice replaces
    /// the earlier function.
    pub fn add_function<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[FluentValue], &BTreeMap<String, FluentValue>) -> FunctionResult
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        if self.functions.insert(name.clone(), Box::new(function)).is_some() {
            debug!(function = %name, "replaced custom function");
        }
    }

    /// Parse `source` and add its entries.
    ///
    /// Returns the syntax errors followed by one error per rejected
    /// duplicate.
    pub fn add_messages(&mut self, source: &str) -> Vec<FluentError> {
        self.add_resource(lingo_syntax::parse(source))
    }

    /// Add the entries of a parsed resource.
    ///
    /// Returns the resource's syntax errors followed by one error per
    /// rejected duplicate.
    pub fn add_resource(&mut self, resource: Resource) -> Vec<FluentError> {
        let (entries, parse_errors) = resource.into_parts();
        let mut errors: Vec<FluentError> = parse_errors.into_iter().map(Into::into).collect();

        let mut added = 0_usize;
        for (id, entry) in entries {
            let (kind, store) = if is_term_id(&id) {
                (EntryKind::Term, &mut self.terms)
            } else {
                (EntryKind::Message, &mut self.messages)
            };
            if store.contains_key(&id) {
                warn!(%kind, id = %id, "rejected duplicate entry");
                errors.push(FluentError::Overriding { kind, id });
                continue;
            }
            store.insert(id, entry);
            added += 1;
        }

        debug!(
            added,
            errors = errors.len(),
            locale = ?self.locales.first(),
            "added resource"
        );
        errors
    }

    /// Whether a message (not a term) with this id exists.
    #[must_use]
    pub fn has_message(&self, id: &str) -> bool {
        self.messages.contains_key(id)
    }

    /// Message by id. Terms are never returned.
    #[must_use]
    pub fn get_message(&self, id: &str) -> Option<&Entry> {
        self.messages.get(id)
    }

    /// All messages, ordered by id.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.messages.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    pub(crate) fn get_term(&self, id: &str) -> Option<&Entry> {
        self.terms.get(id)
    }

    pub(crate) fn get_function(&self, name: &str) -> Option<&FluentFunction> {
        self.functions.get(name)
    }

    pub(crate) fn transform_text<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match self.transform {
            Some(transform) => transform(text),
            None => Cow::Borrowed(text),
        }
    }

    /// Format the value of `entry`. Returns `None` when the entry has no
    /// value. Problems are appended to `errors`; formatting itself never
    /// fails.
    pub fn format(
        &self,
        entry: &Entry,
        args: Option<&FluentArgs>,
        errors: &mut Vec<FluentError>,
    ) -> Option<String> {
        match entry {
            Entry::Text(text) => Some(self.transform_text(text).into_owned()),
            Entry::Message(message) => message
                .value
                .as_ref()
                .map(|pattern| self.format_pattern(pattern, args, errors)),
        }
    }

    /// Format a single pattern, typically an attribute value.
    pub fn format_pattern(
        &self,
        pattern: &Pattern,
        args: Option<&FluentArgs>,
        errors: &mut Vec<FluentError>,
    ) -> String {
        match pattern {
            Pattern::Text(text) => self.transform_text(text).into_owned(),
            Pattern::Elements(_) => Scope::new(self, args, errors).format_pattern(pattern),
        }
    }
}
