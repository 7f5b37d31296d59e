use serde::{Deserialize, Serialize};

/// Root grammar configuration.
///
/// ```toml
/// rest_marker = "--"
/// verbatim_marker = "-@"
/// positional = "files"
///
/// [[option]]
/// names = ["-v", "--verbose"]
/// kind = "multiflag"
/// target = "verbose"
/// bundle = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarConfig {
    /// Token that starts rest mode. Empty string disables it (default: "--").
    #[serde(default = "default_rest_marker")]
    pub rest_marker: String,
    /// Token that makes the following token a positional even if it looks
    /// like an option (e.g. "-@").
    #[serde(default)]
    pub verbatim_marker: Option<String>,
    /// Argument name for bare tokens. When unset they go to `rest`.
    #[serde(default)]
    pub positional: Option<String>,
    /// What to do with option-looking tokens that match no rule.
    #[serde(default)]
    pub unknown_options: UnknownOptions,
    #[serde(default, rename = "option")]
    pub options: Vec<OptionRule>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownOptions {
    /// Fail with an `unknown-option` error.
    #[default]
    Error,
    /// Append the token to `rest`.
    NoMatch,
}

/// One option and the names it answers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRule {
    /// Spellings, e.g. `["-o", "--output"]`.
    pub names: Vec<String>,
    pub kind: OptionKind,
    /// Key in the accumulator.
    pub target: String,
    /// Value stored by `optional` when no value follows.
    #[serde(default)]
    pub default: String,
    /// `multiflag` only: accept `-vvv` for `-v -v -v`.
    #[serde(default)]
    pub bundle: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Flag,
    NoFlag,
    MultiFlag,
    Single,
    Multiple,
    /// Takes the next token as its value unless it is absent or looks like
    /// an option.
    Optional,
}

fn default_rest_marker() -> String {
    "--".to_string()
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            rest_marker: default_rest_marker(),
            verbatim_marker: None,
            positional: None,
            unknown_options: UnknownOptions::default(),
            options: Vec::new(),
        }
    }
}
