//! # Lingo Syntax
//!
//! Parser for FTL, the localization file format made of messages, terms,
//! attributes, placeables and select expressions.
//!
//! Parsing is forgiving: a broken entry is recorded as a [`ParserError`] and
//! skipped, and the parser resumes at the next line that can start an entry.
//!
//! ```
//! use lingo_syntax::{parse, Entry};
//!
//! let resource = parse("hello = Hello, world!\n-brand = Lingo\n");
//! assert!(resource.errors().is_empty());
//! assert_eq!(resource.get("hello"), Some(&Entry::Text("Hello, world!".into())));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod ast;
pub mod errors;
pub mod parser;
pub mod resource;

pub use ast::{
    is_term_id, Attribute, Entry, Expression, Message, NamedArgument, Pattern, PatternElement,
    Variant, VariantKey,
};
pub use errors::{ErrorKind, ParserError};
pub use parser::{parse, MAX_PLACEABLES};
pub use resource::Resource;
