//! Parsed resource: entries in source order plus the errors met on the way.

use crate::ast::Entry;
use crate::errors::ParserError;
use serde::{Deserialize, Serialize};

/// Output of [`crate::parse`].
///
/// Entries keep source order. A duplicated id is kept as a second entry so
/// that the bundle can report it as an override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    entries: Vec<(String, Entry)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ParserError>,
}

impl Resource {
    /// Parse FTL source. Shorthand for [`crate::parse`].
    #[must_use]
    pub fn from_string(source: &str) -> Self {
        crate::parse(source)
    }

    /// Build a resource from already parsed entries.
    #[must_use]
    pub fn from_entries(entries: Vec<(String, Entry)>) -> Self {
        Self {
            entries,
            errors: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, id: String, entry: Entry) {
        self.entries.push((id, entry));
    }

    pub(crate) fn push_error(&mut self, error: ParserError) {
        self.errors.push(error);
    }

    /// Iterate over `(id, entry)` pairs in source order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// First entry with the given id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, entry)| entry)
    }

    /// Syntax errors, in source order.
    #[must_use]
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    /// Number of parsed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry survived parsing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split into entries and errors.
    #[must_use]
    pub fn into_parts(self) -> (Vec<(String, Entry)>, Vec<ParserError>) {
        (self.entries, self.errors)
    }
}
