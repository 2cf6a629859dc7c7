//! # Lingo Bundle
//!
//! Runtime half of the localization engine: bundles of parsed entries, the
//! resolver that turns a message plus arguments into display text, the
//! value types it works with, and a fallback chain over several bundles.
//!
//! ```
//! use lingo_bundle::{fluent_args, FluentBundle};
//!
//! let mut bundle = FluentBundle::new(vec!["en-US".parse().unwrap()]);
//! bundle.set_use_isolating(false);
//! let errors = bundle.add_messages(
//!     "emails = { $count ->\n    [one] One new email\n   *[other] { $count } new emails\n}\n",
//! );
//! assert!(errors.is_empty());
//!
//! let message = bundle.get_message("emails").unwrap();
//! let args = fluent_args!("count" => 3);
//! let mut errors = Vec::new();
//! let value = bundle.format(message, args.as_ref(), &mut errors);
//! assert_eq!(value.as_deref(), Some("3 new emails"));
//! assert!(errors.is_empty());
//! ```
//!
//! Locale-sensitive pieces (number and date rendering, plural categories)
//! go through an [`IntlProvider`]; formatters are built once per option set
//! and cached for the lifetime of the bundle.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod args;
pub mod builtins;
pub mod bundle;
pub mod errors;
pub mod intl;
pub mod localization;
pub mod resolver;
pub mod types;

pub use args::{FluentArg, FluentArgs};
pub use builtins::FunctionResult;
pub use bundle::{FluentBundle, FluentFunction, TextTransform};
pub use errors::{EntryKind, ErrorCategory, FluentError, FunctionError, ResolverError};
pub use intl::{
    DateTimeFormat, DefaultIntlProvider, FormatterCache, FormatterKind, IntlError, IntlProvider,
    NumberFormat, PluralSelector,
};
pub use localization::{L10nAttribute, L10nKey, L10nMessage, Localization};
pub use resolver::MAX_PLACEABLE_LENGTH;
pub use types::{FluentDateTime, FluentNumber, FluentValue, FormatOptions, OptionValue};

pub use unic_langid::LanguageIdentifier;
