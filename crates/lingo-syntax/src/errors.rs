//! Syntax errors reported by the parser.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A recoverable syntax error, scoped to the entry it was found in.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("line {line}: {kind}")]
pub struct ParserError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Byte offset into the source.
    pub offset: usize,
    /// 1-based line number of `offset`.
    pub line: usize,
}

/// Kinds of syntax errors.
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum ErrorKind {
    #[error("expected an entry to start at the beginning of the file or on a new line")]
    ExpectedEntryStart,
    #[error("expected {0:?}")]
    ExpectedToken(char),
    #[error("expected an identifier")]
    ExpectedIdentifier,
    #[error("expected a variant key")]
    ExpectedVariantKey,
    #[error("expected a literal")]
    ExpectedLiteral,
    #[error("expected \"}}\" or \"->\"")]
    ExpectedPlaceableEnd,
    #[error("expected \",\" or \")\"")]
    ExpectedArgumentSeparator,
    #[error("expected a string in quotes or a number")]
    ExpectedOptionValue,
    #[error("expected a number")]
    ExpectedNumber,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unknown escape sequence: \\{0}")]
    UnknownEscape(char),
    #[error("invalid unicode escape sequence: \\u{0}")]
    InvalidUnicodeEscape(String),
    #[error("too many placeables, maximum allowed is {0}")]
    TooManyPlaceables(usize),
    #[error("function names must be all upper-case: {0}")]
    InvalidFunctionName(String),
    #[error("term \"{0}\" must have a value")]
    MissingTermValue(String),
    #[error("message \"{0}\" must have a value or attributes")]
    MissingMessageValue(String),
    #[error("attribute \"{0}\" must have a value")]
    MissingAttributeValue(String),
    #[error("variant must have a value")]
    MissingVariantValue,
    #[error("expected at least one variant")]
    MissingVariants,
    #[error("expected a default variant marked with \"*\"")]
    MissingDefaultVariant,
    #[error("only one variant can be marked as default")]
    MultipleDefaultVariants,
    #[error("variants should be listed in a new line")]
    VariantsNotOnNewLine,
    #[error("attributes of private messages cannot be interpolated")]
    TermAttributeAsPlaceable,
    #[error("message references cannot be used as selectors")]
    ReferenceAsSelector,
    #[error("variants cannot be used as selectors")]
    VariantAsSelector,
    #[error("attributes of public messages cannot be used as selectors")]
    MessageAttributeAsSelector,
}
