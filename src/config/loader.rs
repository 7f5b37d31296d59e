use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::{GrammarConfig, OptionKind};

/// Errors that can occur when loading a grammar.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read grammar file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse grammar file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Grammar validation failed: {message}")]
    ValidationError { message: String },
}

impl GrammarConfig {
    /// Returns the path to the default grammar file.
    ///
    /// Uses `~/.config/argv-reader/grammar.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("argv-reader").join("grammar.toml")
    }

    /// Loads the grammar from the default path.
    ///
    /// - If the file doesn't exist, returns `GrammarConfig::default()`.
    /// - Otherwise behaves like [`GrammarConfig::load_from`].
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no grammar file, using default grammar");
            return Ok(GrammarConfig::default());
        }

        Self::load_from(&path)
    }

    /// Reads, parses and validates a grammar file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: GrammarConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            options = config.options.len(),
            "loaded grammar"
        );
        Ok(config)
    }

    /// Parses and validates a grammar held in memory.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GrammarConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError {
                path: PathBuf::from("<inline>"),
                source: e,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the grammar.
    ///
    /// Checks:
    /// - Every rule has a target and at least one name
    /// - Names start with `-` and are not reused across rules
    /// - `bundle` is only set on multiflags with a single-letter short name
    /// - `optional` defaults cannot be mistaken for an option or a marker
    /// - Markers don't shadow option names or each other
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();

        for rule in &self.options {
            if rule.target.is_empty() {
                return Err(invalid(format!(
                    "Option {:?} has an empty target",
                    rule.names
                )));
            }
            if rule.names.is_empty() {
                return Err(invalid(format!(
                    "Option '{}' has no names",
                    rule.target
                )));
            }

            for name in &rule.names {
                if name.len() < 2 || !name.starts_with('-') {
                    return Err(invalid(format!(
                        "Option name '{}' must start with '-'",
                        name
                    )));
                }
                if !seen.insert(name.as_str()) {
                    return Err(invalid(format!(
                        "Option name '{}' is defined more than once",
                        name
                    )));
                }
            }

            if rule.bundle {
                if rule.kind != OptionKind::MultiFlag {
                    return Err(invalid(format!(
                        "Option '{}': bundle is only supported for multiflag",
                        rule.target
                    )));
                }
                if short_letter(&rule.names).is_none() {
                    return Err(invalid(format!(
                        "Option '{}': bundle requires a single-letter short name",
                        rule.target
                    )));
                }
            }

            if rule.kind == OptionKind::Optional && rule.default.starts_with('-') {
                return Err(invalid(format!(
                    "Option '{}': default '{}' looks like an option",
                    rule.target, rule.default
                )));
            }

            let is_marker = (!self.rest_marker.is_empty() && rule.default == self.rest_marker)
                || self.verbatim_marker.as_deref() == Some(rule.default.as_str());
            if rule.kind == OptionKind::Optional && is_marker {
                return Err(invalid(format!(
                    "Option '{}': default '{}' is a marker",
                    rule.target, rule.default
                )));
            }
        }

        let markers = [Some(&self.rest_marker), self.verbatim_marker.as_ref()];
        for marker in markers.into_iter().flatten() {
            if seen.contains(marker.as_str()) {
                return Err(invalid(format!(
                    "Marker '{}' is also an option name",
                    marker
                )));
            }
        }

        if let Some(verbatim) = &self.verbatim_marker {
            if verbatim.is_empty() || *verbatim == self.rest_marker {
                return Err(invalid(format!(
                    "Verbatim marker '{}' must be non-empty and differ from the rest marker",
                    verbatim
                )));
            }
        }

        Ok(())
    }
}

/// The letter of the first `-x` style name, if any.
pub(crate) fn short_letter(names: &[String]) -> Option<char> {
    names.iter().find_map(|name| {
        let mut chars = name.strip_prefix('-')?.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c != '-' => Some(c),
            _ => None,
        }
    })
}

fn invalid(message: String) -> ConfigError {
    ConfigError::ValidationError { message }
}
