//! Error taxonomy shared by the reader, classifiers and converters.
//!
//! Two tiers cross the reader boundary:
//!
//! - [`CommandlineError`] and any caller-defined domain error: invalid user
//!   input. These pass through the reader unchanged.
//! - [`ProtocolError`]: a classifier broke the classification contract.
//!   Always fatal.

use thiserror::Error;

/// Error codes the reader itself raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredefinedCode {
    /// An option demanded a value but input ended first.
    MissingArgument,
}

impl PredefinedCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredefinedCode::MissingArgument => "missing-argument",
        }
    }
}

/// User-facing command-line errors.
///
/// The message is rendered verbatim; option name and code are for callers
/// that want to react to a specific failure (e.g. print help for
/// `unknown-option`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandlineError {
    /// Generic error carrying only a message.
    #[error("{message}")]
    Message { message: String },

    /// The option itself is not acceptable.
    #[error("{message}")]
    InvalidOption {
        message: String,
        option_name: String,
        code: String,
    },

    /// The option is known but its value is missing or invalid.
    #[error("{message}")]
    InvalidOptionValue {
        message: String,
        option_name: String,
        code: String,
        value: Option<String>,
    },
}

impl CommandlineError {
    pub fn new(message: impl Into<String>) -> Self {
        CommandlineError::Message {
            message: message.into(),
        }
    }

    pub fn invalid_option(
        message: impl Into<String>,
        code: impl Into<String>,
        option_name: impl Into<String>,
    ) -> Self {
        CommandlineError::InvalidOption {
            message: message.into(),
            option_name: option_name.into(),
            code: code.into(),
        }
    }

    pub fn invalid_option_value(
        message: impl Into<String>,
        code: impl Into<String>,
        option_name: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        CommandlineError::InvalidOptionValue {
            message: message.into(),
            option_name: option_name.into(),
            code: code.into(),
            value,
        }
    }

    /// Build an option-value error with one of the reader's own codes.
    pub fn predefined(
        message: impl Into<String>,
        code: PredefinedCode,
        option_name: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::invalid_option_value(message, code.as_str(), option_name, value)
    }

    /// The error raised when input ends while `option_name` awaits a value.
    pub fn missing_argument(option_name: &str) -> Self {
        Self::predefined(
            format!("the argument of {} is not specified", option_name),
            PredefinedCode::MissingArgument,
            option_name,
            None,
        )
    }

    pub fn message(&self) -> &str {
        match self {
            CommandlineError::Message { message }
            | CommandlineError::InvalidOption { message, .. }
            | CommandlineError::InvalidOptionValue { message, .. } => message,
        }
    }

    pub fn option_name(&self) -> Option<&str> {
        match self {
            CommandlineError::Message { .. } => None,
            CommandlineError::InvalidOption { option_name, .. }
            | CommandlineError::InvalidOptionValue { option_name, .. } => Some(option_name),
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            CommandlineError::Message { .. } => None,
            CommandlineError::InvalidOption { code, .. }
            | CommandlineError::InvalidOptionValue { code, .. } => Some(code),
        }
    }

    pub fn option_value(&self) -> Option<&str> {
        match self {
            CommandlineError::InvalidOptionValue { value, .. } => value.as_deref(),
            _ => None,
        }
    }
}

/// Classification contract violations. These indicate a bug in the
/// classifier, not bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unknown arg type: {0}")]
    UnknownArgType(String),

    #[error("lookahead in lookahead is not allowed")]
    NestedLookahead,

    #[error("lookahead requires a callback")]
    LookaheadWithoutCallback,

    #[error("arg type {kind} requires a name")]
    MissingName { kind: String },
}

/// Failure of a single `read` call.
#[derive(Debug, Error)]
pub enum ReadError<E = CommandlineError> {
    /// Raised by the classifier or converter, or the reader's own
    /// missing-argument error converted into the caller's error type.
    #[error("{0}")]
    Domain(E),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl<E> ReadError<E> {
    pub fn domain(&self) -> Option<&E> {
        match self {
            ReadError::Domain(err) => Some(err),
            ReadError::Protocol(_) => None,
        }
    }

    pub fn into_domain(self) -> Option<E> {
        match self {
            ReadError::Domain(err) => Some(err),
            ReadError::Protocol(_) => None,
        }
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, ReadError::Protocol(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_error_has_no_option() {
        let err = CommandlineError::new("message1");
        assert_eq!(err.message(), "message1");
        assert_eq!(err.to_string(), "message1");
        assert!(err.option_name().is_none());
        assert!(err.code().is_none());
    }

    #[test]
    fn test_invalid_option_fields() {
        let err = CommandlineError::invalid_option("message1", "unknown-option", "opt1");
        assert_eq!(err.message(), "message1");
        assert_eq!(err.option_name(), Some("opt1"));
        assert_eq!(err.code(), Some("unknown-option"));
        assert!(err.option_value().is_none());
    }

    #[test]
    fn test_invalid_option_value_fields() {
        let err = CommandlineError::invalid_option_value(
            "message1",
            "missing-argument",
            "opt1",
            Some("value1".to_string()),
        );
        assert_eq!(err.option_name(), Some("opt1"));
        assert_eq!(err.option_value(), Some("value1"));
    }

    #[test]
    fn test_missing_argument_is_predefined() {
        let err = CommandlineError::missing_argument("single1");
        assert_eq!(err.code(), Some("missing-argument"));
        assert_eq!(err.option_name(), Some("single1"));
        assert_eq!(err.to_string(), "the argument of single1 is not specified");
    }

    #[test]
    fn test_protocol_error_messages() {
        assert_eq!(
            ProtocolError::UnknownArgType("?".into()).to_string(),
            "unknown arg type: ?"
        );
        assert_eq!(
            ProtocolError::NestedLookahead.to_string(),
            "lookahead in lookahead is not allowed"
        );
    }

    #[test]
    fn test_read_error_accessors() {
        let err: ReadError = ReadError::Domain(CommandlineError::new("bad"));
        assert!(!err.is_protocol());
        assert_eq!(err.domain().map(|e| e.message()), Some("bad"));

        let err: ReadError = ProtocolError::NestedLookahead.into();
        assert!(err.is_protocol());
        assert!(err.into_domain().is_none());
    }
}
