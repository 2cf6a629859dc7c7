//! Errors of the command line front end.

use lingo_langneg::NegotiationError;

/// Failures of a `lingo` subcommand.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] lingo_common::LingoError),

    /// A resource file could not be read.
    #[error("could not read {path}: {source}")]
    Read {
        /// File that failed.
        path: String,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// A malformed command line value.
    #[error("invalid argument {0}")]
    InvalidArgument(String),

    /// `--args-json` is not a JSON object.
    #[error("invalid --args-json: {0}")]
    Json(#[from] serde_json::Error),

    /// Negotiation failed.
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    /// No bundle in the chain has the message.
    #[error("message not found: {0}")]
    MessageNotFound(String),

    /// The message only has attributes.
    #[error("message {0} has no value, pass --attr to format an attribute")]
    NoValue(String),

    /// The message exists but has no such attribute.
    #[error("message {id} has no attribute {attribute}")]
    AttributeNotFound {
        /// Message id.
        id: String,
        /// Requested attribute.
        attribute: String,
    },
}

/// Result type for `lingo` subcommands.
pub type CliResult<T> = Result<T, CliError>;
