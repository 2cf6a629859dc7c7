//! Errors reported while adding resources and formatting messages.
//!
//! None of these abort an operation: they are collected next to the output
//! so that a caller can log them and still show the best-effort result.

use lingo_syntax::ParserError;
use std::fmt;
use thiserror::Error;

/// Broad class of a [`ResolverError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Something referenced does not exist.
    Reference,
    /// A value is out of the acceptable range (cycles, length, defaults).
    Range,
    /// An argument has a kind the resolver cannot use.
    Type,
}

/// Problems met while resolving a pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// `$name` was not passed in.
    #[error("Unknown variable: ${0}")]
    UnknownVariable(String),

    /// No message with this id.
    #[error("Unknown message: {0}")]
    UnknownMessage(String),

    /// No term with this id.
    #[error("Unknown term: {0}")]
    UnknownTerm(String),

    /// The entry has no attribute with this name.
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The term has no variant with this key.
    #[error("Unknown variant: {0}")]
    UnknownVariant(String),

    /// No custom or built-in function with this name.
    #[error("Unknown function: {0}()")]
    UnknownFunction(String),

    /// A select expression has no usable default variant.
    #[error("No default")]
    MissingDefault,

    /// The referenced entry only has attributes.
    #[error("No value: {0}")]
    NoValue(String),

    /// A pattern references itself, directly or not.
    #[error("Cyclic reference")]
    Cyclic,

    /// A placeable rendered to more characters than allowed.
    #[error("Too many characters in placeable ({length}, max allowed is {max})")]
    PlaceableTooLong {
        /// Characters produced.
        length: usize,
        /// Limit.
        max: usize,
    },

    /// An argument exists but cannot be used.
    #[error("Unsupported variable type: {name}, {kind}")]
    UnsupportedVariableType {
        /// Argument name.
        name: String,
        /// Kind of the argument.
        kind: String,
    },
}

impl ResolverError {
    /// Broad class of the error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownVariable(_)
            | Self::UnknownMessage(_)
            | Self::UnknownTerm(_)
            | Self::UnknownAttribute(_)
            | Self::UnknownVariant(_)
            | Self::UnknownFunction(_) => ErrorCategory::Reference,
            Self::MissingDefault
            | Self::NoValue(_)
            | Self::Cyclic
            | Self::PlaceableTooLong { .. } => ErrorCategory::Range,
            Self::UnsupportedVariableType { .. } => ErrorCategory::Type,
        }
    }
}

/// Which store an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Public entry.
    Message,
    /// Private entry, id starts with `-`.
    Term,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message => f.write_str("message"),
            Self::Term => f.write_str("term"),
        }
    }
}

/// Any error a bundle reports.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FluentError {
    /// An entry with the same id is already stored; the new one was dropped.
    #[error("Attempt to override an existing {kind}: \"{id}\"")]
    Overriding {
        /// Store the id collided in.
        kind: EntryKind,
        /// Colliding id.
        id: String,
    },

    /// Syntax error from the resource.
    #[error("Parser error: {0}")]
    Parser(#[from] ParserError),

    /// Problem met while formatting.
    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolverError),
}

/// Error returned by a custom function. The resolver replaces the call with
/// a `None` value and carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FunctionError(pub String);

impl FunctionError {
    /// Error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
