//! Drives a classifier over a token list and fills an
//! [`Accumulator`].
//!
//! ```text
//! tokens → classify (→ lookahead) → apply → … → Accumulator → convert
//! ```
//!
//! Each `read` owns its own [`Cursor`], so one reader can be shared and
//! called repeatedly.

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::args::accumulator::Accumulator;
use crate::args::classification::{Action, Classification, Verdict, REST_ARGUMENT};
use crate::error::{CommandlineError, ProtocolError, ReadError};

/// Token reader built from a classifier and a converter.
///
/// - classifier: `(token, state) -> Result<R, E>` where `R` is a
///   [`Classification`], an [`Action`], a [`Tagged`](crate::args::Tagged)
///   value or a [`Verdict`].
/// - converter: `(Accumulator) -> Result<T, E>`, run once after the last
///   token.
///
/// `E` must absorb [`CommandlineError`] because the reader itself raises a
/// `missing-argument` error when input ends while a value is still owed.
pub struct Reader<S, T, E, R, F, C> {
    classifier: F,
    converter: C,
    _marker: PhantomData<fn() -> (S, T, E, R)>,
}

/// A value the next token must fill.
#[derive(Debug)]
enum Pending {
    Single(String),
    Multiple(String),
}

impl Pending {
    fn name(&self) -> &str {
        match self {
            Pending::Single(name) | Pending::Multiple(name) => name,
        }
    }
}

/// Everything a single read threads between steps.
struct Cursor<S> {
    /// Working copy of the input; `Replace` pushes to the front.
    queue: VecDeque<String>,
    state: Option<S>,
    pending: Option<Pending>,
    rest_mode: bool,
}

impl<S> Cursor<S> {
    fn new<I>(tokens: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            queue: tokens.into_iter().map(|t| t.as_ref().to_owned()).collect(),
            state: None,
            pending: None,
            rest_mode: false,
        }
    }

    fn requeue(&mut self, tokens: Vec<String>) {
        for token in tokens.into_iter().rev() {
            self.queue.push_front(token);
        }
    }

    fn peek(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    /// Carry out a resolved action for `token`.
    fn apply<E>(
        &mut self,
        acc: &mut Accumulator,
        token: String,
        action: Action<S, E>,
    ) -> Result<(), ProtocolError> {
        match action {
            Action::Flag(name) => acc.set_flag(name, true),
            Action::NoFlag(name) => acc.set_flag(name, false),
            Action::MultiFlag(name) => acc.bump(name),
            Action::Single(name) => self.pending = Some(Pending::Single(name)),
            Action::Multiple(name) => self.pending = Some(Pending::Multiple(name)),
            Action::Argument(name) => {
                if name == REST_ARGUMENT {
                    tracing::debug!(target: "argv_reader::reader", token = %token, "entering rest mode");
                    acc.push_rest(token.clone());
                    self.rest_mode = true;
                }
                acc.push_argument(name, token);
            }
            Action::Rest => {
                tracing::debug!(target: "argv_reader::reader", token = %token, "entering rest mode");
                self.rest_mode = true;
            }
            Action::Skip => {}
            Action::NoMatch => acc.push_rest(token),
            Action::Replace(tokens) => {
                tracing::debug!(
                    target: "argv_reader::reader",
                    token = %token,
                    replacement = ?tokens,
                    "replacing token"
                );
                self.requeue(tokens);
            }
            // Lookaheads are resolved before dispatch; one left here is not
            // an action this step can carry out.
            Action::LookAhead(_) => {
                return Err(ProtocolError::UnknownArgType("lookahead".to_string()))
            }
        }
        Ok(())
    }
}

impl<S, T, E, R, F, C> Reader<S, T, E, R, F, C>
where
    F: Fn(&str, Option<&S>) -> Result<R, E>,
    R: Into<Verdict<S, E>>,
    C: Fn(Accumulator) -> Result<T, E>,
    E: From<CommandlineError>,
{
    pub fn new(classifier: F, converter: C) -> Self {
        Self {
            classifier,
            converter,
            _marker: PhantomData,
        }
    }

    /// Read `tokens` and convert the result.
    ///
    /// Any error aborts the whole read; no partial result is returned.
    pub fn read<I>(&self, tokens: I) -> Result<T, ReadError<E>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let acc = self.accumulate(Cursor::new(tokens))?;
        (self.converter)(acc).map_err(ReadError::Domain)
    }

    fn accumulate(&self, mut cursor: Cursor<S>) -> Result<Accumulator, ReadError<E>> {
        let mut acc = Accumulator::default();

        while let Some(token) = cursor.queue.pop_front() {
            if cursor.rest_mode {
                acc.push_rest(token);
                continue;
            }

            if let Some(pending) = cursor.pending.take() {
                match pending {
                    Pending::Single(name) => acc.set_single(name, token),
                    Pending::Multiple(name) => acc.push_multiple(name, token),
                }
                continue;
            }

            let classification = self.classify(&token, &cursor)?;
            tracing::trace!(
                target: "argv_reader::reader",
                token = %token,
                action = ?classification.action,
                "classified token"
            );

            if let Some(next_state) = classification.next_state {
                cursor.state = next_state;
            }

            cursor.apply(&mut acc, token, classification.action)?;
        }

        if let Some(pending) = cursor.pending {
            return Err(ReadError::Domain(E::from(CommandlineError::missing_argument(
                pending.name(),
            ))));
        }

        Ok(acc)
    }

    /// Classify one token, resolving a lookahead against the token after it.
    fn classify(
        &self,
        token: &str,
        cursor: &Cursor<S>,
    ) -> Result<Classification<S, E>, ReadError<E>> {
        let primary: Verdict<S, E> = (self.classifier)(token, cursor.state.as_ref())
            .map_err(ReadError::Domain)?
            .into();
        let primary = primary.normalize()?;

        match primary.action {
            Action::LookAhead(callback) => {
                let next = cursor.peek();
                tracing::debug!(
                    target: "argv_reader::reader",
                    token = %token,
                    next = ?next,
                    "looking ahead"
                );
                let resolved = callback(next, cursor.state.as_ref()).map_err(ReadError::Domain)?;
                if resolved.is_look_ahead() {
                    return Err(ProtocolError::NestedLookahead.into());
                }
                Ok(resolved.normalize()?)
            }
            action => Ok(Classification {
                action,
                next_state: primary.next_state,
            }),
        }
    }
}

impl<S, E, R, F> Reader<S, Accumulator, E, R, F, fn(Accumulator) -> Result<Accumulator, E>>
where
    F: Fn(&str, Option<&S>) -> Result<R, E>,
    R: Into<Verdict<S, E>>,
    E: From<CommandlineError>,
{
    /// Reader whose result is the [`Accumulator`] itself.
    pub fn raw(classifier: F) -> Self {
        Self::new(classifier, Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type C = Classification<(), CommandlineError>;

    fn echo(token: &str, _: Option<&()>) -> Result<C, CommandlineError> {
        match token {
            "-f" => Ok(C::flag("f")),
            "-s" => Ok(C::single("s")),
            _ => Ok(C::no_match()),
        }
    }

    #[test]
    fn test_requeue_preserves_order() {
        let mut cursor: Cursor<()> = Cursor::new(["c"]);
        cursor.requeue(vec!["a".into(), "b".into()]);
        assert_eq!(cursor.queue, ["a", "b", "c"]);
    }

    #[test]
    fn test_reader_is_reusable() {
        let reader = Reader::raw(echo);
        let first = reader.read(["-f", "x"]).unwrap();
        let second = reader.read(["y"]).unwrap();
        assert_eq!(first.flag("f"), Some(true));
        assert_eq!(first.rest, vec!["x"]);
        assert_eq!(second.flag("f"), None);
        assert_eq!(second.rest, vec!["y"]);
    }

    #[test]
    fn test_caller_tokens_untouched_by_replace() {
        let reader = Reader::raw(|token: &str, _: Option<&()>| -> Result<C, CommandlineError> {
            if token == "-ff" {
                Ok(C::replace(["-f", "-f"]))
            } else {
                echo(token, None)
            }
        });
        let tokens = vec!["-ff".to_string()];
        let acc = reader.read(&tokens).unwrap();
        assert_eq!(acc.flag("f"), Some(true));
        assert_eq!(tokens, vec!["-ff"]);
    }

    #[test]
    fn test_unresolved_lookahead_is_rejected_at_dispatch() {
        let mut cursor: Cursor<()> = Cursor::new(["next"]);
        let mut acc = Accumulator::default();
        let action = C::look_ahead(|_: Option<&str>, _: Option<&()>| {
            Ok::<_, CommandlineError>(C::skip())
        })
        .action;
        let err = cursor.apply(&mut acc, "-l".into(), action).unwrap_err();
        assert_eq!(err, ProtocolError::UnknownArgType("lookahead".into()));
        assert!(acc.is_empty());
        assert_eq!(cursor.queue, ["next"]);
    }

    #[test]
    fn test_pending_value_skips_classifier() {
        let acc = Reader::raw(echo).read(["-s", "-f"]).unwrap();
        assert_eq!(acc.single("s"), Some("-f"));
        assert_eq!(acc.flag("f"), None);
    }
}
