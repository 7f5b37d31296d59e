//! Grammar configuration: types and loading.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{GrammarConfig, OptionKind, OptionRule, UnknownOptions};

pub(crate) use loader::short_letter;
