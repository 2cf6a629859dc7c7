//! Errors of the locale model and the negotiator.

use thiserror::Error;

/// A tag that is not `language[-script][-region][-variant]`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// The tag could not be parsed.
    #[error("invalid language tag: {0:?}")]
    Invalid(String),
}

/// Negotiation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    /// `lookup` always returns one locale and needs a fallback for that.
    #[error("a default locale is required for the lookup strategy")]
    MissingDefaultLocale,
    /// An unknown strategy name.
    #[error("unknown negotiation strategy: {0:?}")]
    UnknownStrategy(String),
}
