//! Error taxonomy for the engine.
//!
//! Two tiers: [`ParseError::NoMatch`] is the expected control-flow signal
//! that drives backtracking — alternation tries the next branch, optional
//! succeeds empty, repetition stops accumulating. Every other variant is a
//! construction or callback failure that no combinator retries or swallows;
//! those propagate verbatim to the top-level caller.

use std::fmt;

/// Errors reported by matchers and by the parse driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The matcher does not apply at the current position. Expected and
    /// recoverable; never consumes input.
    NoMatch,
    /// A character-class expression failed to compile.
    InvalidClass { expr: String, detail: String },
    /// A recursion slot was dereferenced before being defined.
    UndefinedSlot,
    /// An action callback reported an error during replay.
    Action(String),
}

impl ParseError {
    /// True for the backtracking sentinel, false for the hard failures.
    pub fn is_no_match(&self) -> bool {
        matches!(self, ParseError::NoMatch)
    }

    /// Wrap a message reported by an action callback.
    pub fn action(msg: impl Into<String>) -> ParseError {
        ParseError::Action(msg.into())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NoMatch => write!(f, "no match found"),
            ParseError::InvalidClass { expr, detail } => {
                write!(f, "invalid character class {expr:?}: {detail}")
            }
            ParseError::UndefinedSlot => {
                write!(f, "recursion slot used before being defined")
            }
            ParseError::Action(msg) => write!(f, "action failed: {msg}"),
        }
    }
}

impl std::error::Error for ParseError {}
