//! Parse state, the snapshot/restore discipline, and the `parse` driver.
//!
//! A single mutable [`ParseState`] is threaded by reference through every
//! matcher invocation. Matchers that succeed advance the input cursor and
//! record the matched text; matchers that fail must leave the state exactly
//! as they found it. Combinators that can retry or choose among alternatives
//! enforce that contract by taking a [`Checkpoint`] before attempting their
//! sub-matchers and restoring it verbatim on failure.
//!
//! Restoring a checkpoint also truncates the deferred-action queue to the
//! length it had when the checkpoint was taken. That single rule is what
//! makes semantic actions transactional: an action recorded inside a branch
//! that is later abandoned disappears along with the rest of that branch's
//! state and can never fire.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::peg::error::ParseError;

/// Insertion-ordered multimap of named captures.
///
/// A name may be bound more than once (one entry per repetition iteration,
/// for example); all bindings are retained in match order, never overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bindings {
    entries: Vec<(String, String)>,
}

impl Bindings {
    pub fn new() -> Bindings {
        Bindings::default()
    }

    /// Append a binding, keeping any existing entries under the same name.
    pub(crate) fn push(&mut self, name: &str, value: String) {
        self.entries.push((name.to_string(), value));
    }

    /// The first value bound under `name`, in match order.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value bound under `name`, in match order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// All `(name, value)` pairs in the order they were bound.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Outcome of a successful parse: the matched text of the top-level matcher,
/// the unconsumed remainder, and the final capture multimap.
///
/// Also the payload handed to action callbacks — a by-value snapshot of the
/// state at the moment the action's matcher succeeded, independent of any
/// later mutation of the live state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub matched: String,
    pub rest: String,
    pub bindings: Bindings,
}

pub(crate) type ActionFn = dyn Fn(&MatchResult) -> Result<(), ParseError>;

/// A deferred action: a state snapshot bound to a user callback, held until
/// the top-level parse concludes.
pub(crate) struct Pending {
    pub(crate) snapshot: MatchResult,
    pub(crate) callback: Rc<ActionFn>,
}

/// The mutable context threaded through a single parse.
pub(crate) struct ParseState {
    input: Rc<str>,
    pos: usize,
    /// Text produced by the most recently completed matcher.
    pub(crate) last: String,
    /// Set by `pluck` to mark `last` as the preferred contributor to an
    /// enclosing sequence's result.
    pub(crate) pluck: bool,
    /// True while matching speculatively under a lookahead; actions
    /// encountered then are not scheduled.
    pub(crate) suppress_actions: bool,
    pub(crate) bindings: Bindings,
    pub(crate) pending: Vec<Pending>,
}

/// Value copy of the restorable parts of a [`ParseState`]. The pending-action
/// queue is captured as a length; restoring truncates back to it.
pub(crate) struct Checkpoint {
    pos: usize,
    last: String,
    pluck: bool,
    bindings: Bindings,
    pending_len: usize,
}

impl ParseState {
    pub(crate) fn new(input: &str) -> ParseState {
        ParseState {
            input: Rc::from(input),
            pos: 0,
            last: String::new(),
            pluck: false,
            suppress_actions: false,
            bindings: Bindings::new(),
            pending: Vec::new(),
        }
    }

    /// The unconsumed suffix of the input.
    pub(crate) fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Consume `len` bytes. `len` must end on a character boundary of the
    /// remaining input.
    pub(crate) fn advance(&mut self, len: usize) {
        self.pos += len;
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            last: self.last.clone(),
            pluck: self.pluck,
            bindings: self.bindings.clone(),
            pending_len: self.pending.len(),
        }
    }

    /// Rewind to `checkpoint`, discarding captures and deferred actions
    /// recorded after it was taken.
    pub(crate) fn restore(&mut self, checkpoint: &Checkpoint) {
        self.pos = checkpoint.pos;
        self.last.clone_from(&checkpoint.last);
        self.pluck = checkpoint.pluck;
        self.bindings.clone_from(&checkpoint.bindings);
        self.pending.truncate(checkpoint.pending_len);
    }
}

/// A composable matcher over a prefix of the input.
///
/// On success the parse state reflects the consumed prefix; on failure with
/// [`ParseError::NoMatch`] the state is left exactly as it was found. Cloning
/// is cheap (shared handle) and matchers are reusable across parses.
#[derive(Clone)]
pub struct Matcher {
    run: Rc<dyn Fn(&mut ParseState) -> Result<(), ParseError>>,
}

impl Matcher {
    pub(crate) fn new(
        run: impl Fn(&mut ParseState) -> Result<(), ParseError> + 'static,
    ) -> Matcher {
        Matcher { run: Rc::new(run) }
    }

    pub(crate) fn apply(&self, state: &mut ParseState) -> Result<(), ParseError> {
        (self.run)(state)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Matcher")
    }
}

/// Run `matcher` over `input` from offset zero.
///
/// Partial consumption is not an error; anchor the grammar with
/// `end_of_input` to require exhaustion. On overall success the deferred
/// actions accumulated during matching are replayed in the order they were
/// scheduled; the first failing action aborts the remainder of the queue and
/// its error is surfaced (actions already replayed are not undone).
pub fn parse(matcher: &Matcher, input: &str) -> Result<MatchResult, ParseError> {
    let mut state = ParseState::new(input);
    matcher.apply(&mut state)?;

    let pending = std::mem::take(&mut state.pending);
    for action in &pending {
        (action.callback)(&action.snapshot)?;
    }

    let rest = state.rest().to_string();
    Ok(MatchResult {
        matched: state.last,
        rest,
        bindings: state.bindings,
    })
}
