//! Library entrypoint for `argv-reader`.
//!
//! The crate exposes the token reader, its error taxonomy, and a
//! TOML-configured grammar for common command lines.

pub mod args;
pub mod config;
pub mod error;
pub mod grammar;
pub mod logging;

pub use args::{Accumulator, Action, Classification, Reader, Tagged, Verdict};
pub use error::{CommandlineError, PredefinedCode, ProtocolError, ReadError};
