//! Classification results: what the reader does with one token.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ProtocolError;

/// Argument name that also switches the reader into rest mode.
pub const REST_ARGUMENT: &str = "rest";

/// Deferred classification: receives the following token (if any) and the
/// current state.
pub type LookAheadFn<S, E> = Box<dyn FnOnce(Option<&str>, Option<&S>) -> Result<Verdict<S, E>, E>>;

/// The canonical set of things a classifier can ask for.
pub enum Action<S, E> {
    /// Set a boolean option to `true`.
    Flag(String),
    /// Set a boolean option to `false`.
    NoFlag(String),
    /// Increment a counter.
    MultiFlag(String),
    /// The next token is this option's value.
    Single(String),
    /// The next token is appended to this option's values.
    Multiple(String),
    /// The token itself is a positional value. [`REST_ARGUMENT`] also
    /// starts rest mode and appends the token to `rest` as well.
    Argument(String),
    /// Start rest mode, dropping the triggering token.
    Rest,
    /// Drop the token.
    Skip,
    /// Drop the token and read these instead.
    Replace(Vec<String>),
    /// Append the token to `rest` without changing mode.
    NoMatch,
    /// Decide based on the following token.
    LookAhead(LookAheadFn<S, E>),
}

impl<S, E> Action<S, E> {
    /// Tag name, as used by [`Tagged`].
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Flag(_) => "flag",
            Action::NoFlag(_) => "noflag",
            Action::MultiFlag(_) => "multiflag",
            Action::Single(_) => "single",
            Action::Multiple(_) => "multiple",
            Action::Argument(_) => "argument",
            Action::Rest => "rest",
            Action::Skip => "skip",
            Action::Replace(_) => "replace",
            Action::NoMatch => "nomatch",
            Action::LookAhead(_) => "lookahead",
        }
    }
}

impl<S, E> fmt::Debug for Action<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Flag(name)
            | Action::NoFlag(name)
            | Action::MultiFlag(name)
            | Action::Single(name)
            | Action::Multiple(name)
            | Action::Argument(name) => f.debug_tuple(self.kind()).field(name).finish(),
            Action::Replace(tokens) => f.debug_tuple(self.kind()).field(tokens).finish(),
            Action::Rest | Action::Skip | Action::NoMatch | Action::LookAhead(_) => {
                f.write_str(self.kind())
            }
        }
    }
}

/// An [`Action`] plus an optional state transition.
///
/// `next_state` is `None` for "keep the current state", `Some(None)` to
/// reset it to absent and `Some(Some(s))` to replace it.
pub struct Classification<S, E> {
    pub action: Action<S, E>,
    pub next_state: Option<Option<S>>,
}

impl<S, E> Classification<S, E> {
    pub fn new(action: Action<S, E>) -> Self {
        Self {
            action,
            next_state: None,
        }
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(Action::Flag(name.into()))
    }

    pub fn no_flag(name: impl Into<String>) -> Self {
        Self::new(Action::NoFlag(name.into()))
    }

    pub fn multi_flag(name: impl Into<String>) -> Self {
        Self::new(Action::MultiFlag(name.into()))
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self::new(Action::Single(name.into()))
    }

    pub fn multiple(name: impl Into<String>) -> Self {
        Self::new(Action::Multiple(name.into()))
    }

    pub fn argument(name: impl Into<String>) -> Self {
        Self::new(Action::Argument(name.into()))
    }

    pub fn rest() -> Self {
        Self::new(Action::Rest)
    }

    pub fn skip() -> Self {
        Self::new(Action::Skip)
    }

    pub fn no_match() -> Self {
        Self::new(Action::NoMatch)
    }

    pub fn replace<I>(tokens: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::new(Action::Replace(tokens.into_iter().map(Into::into).collect()))
    }

    /// Defer to `callback(next_token, state)`.
    ///
    /// The callback's result is the effective classification, including its
    /// state transition. It must not itself be a lookahead.
    pub fn look_ahead<G, R>(callback: G) -> Self
    where
        G: FnOnce(Option<&str>, Option<&S>) -> Result<R, E> + 'static,
        R: Into<Verdict<S, E>>,
    {
        Self::new(Action::LookAhead(Box::new(
            move |next: Option<&str>, state: Option<&S>| {
                callback(next, state).map(Into::into)
            },
        )))
    }

    pub fn with_state(mut self, state: S) -> Self {
        self.next_state = Some(Some(state));
        self
    }

    pub fn reset_state(mut self) -> Self {
        self.next_state = Some(None);
        self
    }
}

impl<S, E> From<Action<S, E>> for Classification<S, E> {
    fn from(action: Action<S, E>) -> Self {
        Self::new(action)
    }
}

impl<S: fmt::Debug, E> fmt::Debug for Classification<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classification")
            .field("action", &self.action)
            .field("next_state", &self.next_state)
            .finish()
    }
}

/// String-tagged classification, for classifiers that build their answer
/// from data rather than code.
///
/// Normalized into a [`Classification`] when the reader receives it. A
/// lookahead cannot be expressed in this form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tagged<S> {
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub replace: Vec<String>,
    /// Absent means "keep", `null` means "reset".
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_state",
        bound(deserialize = "S: Deserialize<'de>")
    )]
    pub state: Option<Option<S>>,
}

/// Wraps any present `state` field, `null` included, so it reads back as a
/// transition rather than "no change".
fn present_state<'de, D, S>(deserializer: D) -> Result<Option<Option<S>>, D::Error>
where
    D: Deserializer<'de>,
    S: Deserialize<'de>,
{
    Option::<S>::deserialize(deserializer).map(Some)
}

impl<S> Tagged<S> {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            replace: Vec::new(),
            state: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn replacing<I>(mut self, tokens: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.replace = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_state(mut self, state: S) -> Self {
        self.state = Some(Some(state));
        self
    }

    pub fn reset_state(mut self) -> Self {
        self.state = Some(None);
        self
    }

    pub(crate) fn is_look_ahead(&self) -> bool {
        self.kind == "lookahead"
    }

    fn normalize<E>(self) -> Result<Classification<S, E>, ProtocolError> {
        let Tagged {
            kind,
            name,
            replace,
            state,
        } = self;

        let named = |wrap: fn(String) -> Action<S, E>| match name {
            Some(name) => Ok(wrap(name)),
            None => Err(ProtocolError::MissingName { kind: kind.clone() }),
        };

        let action = match kind.as_str() {
            "flag" => named(Action::Flag)?,
            "noflag" => named(Action::NoFlag)?,
            "multiflag" => named(Action::MultiFlag)?,
            "single" => named(Action::Single)?,
            "multiple" => named(Action::Multiple)?,
            "argument" => named(Action::Argument)?,
            "rest" => Action::Rest,
            "skip" => Action::Skip,
            "replace" => Action::Replace(replace),
            "nomatch" | "false" => Action::NoMatch,
            "lookahead" => return Err(ProtocolError::LookaheadWithoutCallback),
            _ => return Err(ProtocolError::UnknownArgType(kind.clone())),
        };

        Ok(Classification {
            action,
            next_state: state,
        })
    }
}

/// What classifier and lookahead callbacks hand back to the reader.
pub enum Verdict<S, E> {
    Typed(Classification<S, E>),
    Tagged(Tagged<S>),
}

impl<S, E> Verdict<S, E> {
    pub(crate) fn is_look_ahead(&self) -> bool {
        match self {
            Verdict::Typed(c) => matches!(c.action, Action::LookAhead(_)),
            Verdict::Tagged(t) => t.is_look_ahead(),
        }
    }

    /// Reduce to the canonical form.
    pub(crate) fn normalize(self) -> Result<Classification<S, E>, ProtocolError> {
        match self {
            Verdict::Typed(c) => Ok(c),
            Verdict::Tagged(t) => t.normalize(),
        }
    }
}

impl<S, E> From<Classification<S, E>> for Verdict<S, E> {
    fn from(c: Classification<S, E>) -> Self {
        Verdict::Typed(c)
    }
}

impl<S, E> From<Action<S, E>> for Verdict<S, E> {
    fn from(action: Action<S, E>) -> Self {
        Verdict::Typed(Classification::new(action))
    }
}

impl<S, E> From<Tagged<S>> for Verdict<S, E> {
    fn from(t: Tagged<S>) -> Self {
        Verdict::Tagged(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type C = Classification<&'static str, ()>;

    fn normalize(t: Tagged<&'static str>) -> Result<C, ProtocolError> {
        Verdict::<&'static str, ()>::from(t).normalize()
    }

    #[test]
    fn test_tagged_named_kinds() {
        let c = normalize(Tagged::new("single").named("single1")).unwrap();
        assert!(matches!(c.action, Action::Single(ref n) if n == "single1"));
        assert!(c.next_state.is_none());

        let c = normalize(Tagged::new("argument").named("command").with_state("rest")).unwrap();
        assert!(matches!(c.action, Action::Argument(ref n) if n == "command"));
        assert_eq!(c.next_state, Some(Some("rest")));
    }

    #[test]
    fn test_tagged_false_is_no_match() {
        let c = normalize(Tagged::new("false")).unwrap();
        assert!(matches!(c.action, Action::NoMatch));
    }

    #[test]
    fn test_tagged_replace_keeps_tokens() {
        let c = normalize(Tagged::new("replace").replacing(["-v", "-v"])).unwrap();
        match c.action {
            Action::Replace(tokens) => assert_eq!(tokens, vec!["-v", "-v"]),
            other => panic!("Expected Replace, got {:?}", other),
        }
    }

    #[test]
    fn test_tagged_unknown_kind() {
        let err = normalize(Tagged::new("?")).unwrap_err();
        assert_eq!(err, ProtocolError::UnknownArgType("?".into()));
    }

    #[test]
    fn test_tagged_missing_name() {
        let err = normalize(Tagged::new("flag")).unwrap_err();
        assert_eq!(err, ProtocolError::MissingName { kind: "flag".into() });
    }

    #[test]
    fn test_tagged_lookahead_is_detected() {
        let verdict: Verdict<&'static str, ()> = Tagged::new("lookahead").into();
        assert!(verdict.is_look_ahead());
        assert_eq!(
            verdict.normalize().unwrap_err(),
            ProtocolError::LookaheadWithoutCallback
        );
    }

    #[test]
    fn test_tagged_deserializes_from_json() {
        let t: Tagged<String> =
            serde_json::from_str(r#"{"kind":"skip","state":"verbatim"}"#).unwrap();
        assert_eq!(t, Tagged::new("skip").with_state("verbatim".to_string()));
    }

    #[test]
    fn test_tagged_state_survives_json() {
        let reset = Tagged::<String>::new("skip").reset_state();
        let json = serde_json::to_string(&reset).unwrap();
        assert!(json.contains(r#""state":null"#));
        let back: Tagged<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reset);
        assert_eq!(back.state, Some(None));

        let keep = Tagged::<String>::new("skip");
        let json = serde_json::to_string(&keep).unwrap();
        assert!(!json.contains("state"));
        let back: Tagged<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.state, None);
    }

    #[test]
    fn test_action_debug_uses_kind() {
        assert_eq!(format!("{:?}", C::flag("flag1").action), "flag(\"flag1\")");
        assert_eq!(format!("{:?}", C::rest().action), "rest");
    }
}
