//! # Lingo Langneg
//!
//! Language tags and language negotiation.
//!
//! [`Locale`] models `language[-script][-region][-variant]` tags with
//! wildcard ranges. [`negotiate_languages`] matches a user's ordered
//! preferences against the locales an application ships, using the
//! strategies described on [`NegotiationStrategy`].
//!
//! ```
//! use lingo_langneg::{negotiate_languages, NegotiateOptions};
//!
//! let supported = negotiate_languages(
//!     &["fr", "en-US"],
//!     &["en", "fr-FR", "de"],
//!     &NegotiateOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(supported, vec!["fr-FR", "en"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod errors;
pub mod likely_subtags;
pub mod locale;
pub mod negotiate;

pub use errors::{LocaleError, NegotiationError};
pub use likely_subtags::LikelySubtags;
pub use locale::{Locale, Subtag};
pub use negotiate::{negotiate_languages, NegotiateOptions, NegotiationStrategy};
