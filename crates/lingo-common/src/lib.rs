//! # Lingo Common
//!
//! Shared error type and logging bootstrap for the lingo workspace.
//!
//! The localization core (`lingo-syntax`, `lingo-langneg`, `lingo-bundle`)
//! reports its own domain errors; this crate carries the ambient concerns
//! used by the configuration layer and the command line front end.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{LingoError, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
