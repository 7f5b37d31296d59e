//! Table-driven classifier built from a [`GrammarConfig`].
//!
//! Covers the shapes most command lines need (flags, counters, valued and
//! optionally-valued options, `--`, a verbatim escape) without writing a
//! classifier by hand.

use std::collections::HashMap;

use crate::args::{Accumulator, Classification, Reader};
use crate::config::{short_letter, ConfigError, GrammarConfig, OptionKind, OptionRule, UnknownOptions};
use crate::error::{CommandlineError, ReadError};

/// State threaded by [`Grammar::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarState {
    /// The next token is positional whatever it looks like.
    Verbatim,
}

pub type GrammarClassification = Classification<GrammarState, CommandlineError>;

/// A validated grammar with its name lookup tables.
#[derive(Debug, Clone)]
pub struct Grammar {
    config: GrammarConfig,
    /// Option name → index into `config.options`.
    names: HashMap<String, usize>,
    /// Bundled letter → short option name (`'v'` → `"-v"`).
    bundles: HashMap<char, String>,
}

impl Grammar {
    pub fn new(config: GrammarConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut names = HashMap::new();
        let mut bundles = HashMap::new();
        for (index, rule) in config.options.iter().enumerate() {
            for name in &rule.names {
                names.insert(name.clone(), index);
            }
            if rule.bundle {
                if let Some(letter) = short_letter(&rule.names) {
                    bundles.insert(letter, format!("-{}", letter));
                }
            }
        }

        Ok(Self {
            config,
            names,
            bundles,
        })
    }

    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }

    /// Classifier entry point; pass to [`Reader`] as
    /// `|t: &str, s: Option<&GrammarState>| grammar.classify(t, s)`.
    pub fn classify(
        &self,
        token: &str,
        state: Option<&GrammarState>,
    ) -> Result<GrammarClassification, CommandlineError> {
        if let Some(GrammarState::Verbatim) = state {
            return Ok(self.bare().reset_state());
        }

        if !self.config.rest_marker.is_empty() && token == self.config.rest_marker {
            return Ok(Classification::rest());
        }
        if self.config.verbatim_marker.as_deref() == Some(token) {
            return Ok(Classification::skip().with_state(GrammarState::Verbatim));
        }
        if !token.starts_with('-') || token == "-" {
            return Ok(self.bare());
        }

        if let Some(&index) = self.names.get(token) {
            return Ok(option(&self.config.options[index], token, &self.config));
        }
        if let Some(expanded) = self.expand_bundle(token) {
            return Ok(Classification::replace(expanded));
        }

        match self.config.unknown_options {
            UnknownOptions::Error => Err(CommandlineError::invalid_option(
                format!("unknown option: {}", token),
                "unknown-option",
                token,
            )),
            UnknownOptions::NoMatch => Ok(Classification::no_match()),
        }
    }

    /// Read `tokens` with this grammar.
    pub fn read<I>(&self, tokens: I) -> Result<Accumulator, ReadError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Reader::raw(|token: &str, state: Option<&GrammarState>| self.classify(token, state))
            .read(tokens)
    }

    fn bare(&self) -> GrammarClassification {
        match &self.config.positional {
            Some(name) => Classification::argument(name.clone()),
            None => Classification::no_match(),
        }
    }

    /// `-vvv` → `["-v", "-v", "-v"]` when `v` is a bundled multiflag.
    fn expand_bundle(&self, token: &str) -> Option<Vec<String>> {
        let letters = token.strip_prefix('-')?;
        let first = letters.chars().next()?;
        if letters.len() < 2 || !letters.chars().all(|c| c == first) {
            return None;
        }
        let name = self.bundles.get(&first)?;
        Some(letters.chars().map(|_| name.clone()).collect())
    }
}

fn option(rule: &OptionRule, token: &str, config: &GrammarConfig) -> GrammarClassification {
    let target = rule.target.clone();
    match rule.kind {
        OptionKind::Flag => Classification::flag(target),
        OptionKind::NoFlag => Classification::no_flag(target),
        OptionKind::MultiFlag => Classification::multi_flag(target),
        OptionKind::Single => Classification::single(target),
        OptionKind::Multiple => Classification::multiple(target),
        OptionKind::Optional => {
            // Without a value, re-read the option followed by its default.
            let token = token.to_owned();
            let default = rule.default.clone();
            let rest_marker = config.rest_marker.clone();
            let verbatim_marker = config.verbatim_marker.clone();
            Classification::look_ahead(move |next: Option<&str>, _: Option<&GrammarState>| {
                let is_marker = |value: &str| {
                    (!rest_marker.is_empty() && value == rest_marker)
                        || verbatim_marker.as_deref() == Some(value)
                };
                let classification: GrammarClassification = match next {
                    Some(value) if !value.starts_with('-') && !is_marker(value) => {
                        Classification::single(target)
                    }
                    _ => Classification::replace([token, default]),
                };
                Ok::<_, CommandlineError>(classification)
            })
        }
    }
}
