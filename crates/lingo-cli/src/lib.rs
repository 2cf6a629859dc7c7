//! # Lingo CLI
//!
//! Command line front end of the localization engine. `lingo parse` checks
//! FTL files, `lingo format` formats a message through negotiated bundles
//! and `lingo negotiate` shows how a locale list would be negotiated.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Args, Command};
pub use commands::{run, Output};
pub use error::{CliError, CliResult};
