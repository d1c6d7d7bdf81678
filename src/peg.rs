//! PEG combinator engine
//!
//! A grammar is a tree of [`Matcher`]s assembled bottom-up: primitive
//! matchers (literals, code-point ranges, compiled character classes)
//! composed with structural combinators (sequence, ordered choice, bounded
//! repetition, optional, lookahead), with named captures and deferred
//! semantic actions attached to sub-expressions. [`parse`] drives the
//! composed matcher once over an input and — only on overall success —
//! replays the accumulated actions in the order they were scheduled.
//!
//! Matching is all-or-nothing at every level: a matcher that fails consumes
//! nothing, and a branch abandoned by backtracking takes its captures and
//! scheduled actions with it. See the `state` module for the checkpoint
//! discipline behind that guarantee.

pub mod captures;
pub mod class;
pub mod combinators;
pub mod error;
pub mod lookahead;
pub mod primitives;
pub mod slot;
pub mod state;
pub mod trace;

pub use captures::{action, bind, pluck};
pub use class::{char_class, CharClass};
pub use combinators::{alternation, optional, repeat, repeat_range, sep_by, sequence};
pub use error::ParseError;
pub use lookahead::{negative_assert, positive_assert};
pub use primitives::{any_char, char_in, end_of_input, literal, one_of, single_char};
pub use slot::Slot;
pub use state::{parse, Bindings, MatchResult, Matcher};
pub use trace::traced;
