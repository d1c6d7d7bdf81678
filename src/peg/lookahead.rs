//! Zero-width lookahead assertions.
//!
//! Both assertions checkpoint the state, run the inner matcher
//! speculatively with action scheduling suppressed, and restore the
//! checkpoint before reporting — whatever the inner matcher consumed or
//! recorded is discarded, and only the polarity of its outcome survives.

use crate::peg::error::ParseError;
use crate::peg::state::Matcher;

/// Succeed, consuming nothing, iff `matcher` matches here. No captures or
/// actions from the speculative match are retained.
pub fn positive_assert(matcher: Matcher) -> Matcher {
    Matcher::new(move |state| {
        let checkpoint = state.checkpoint();
        let suppressed = state.suppress_actions;
        state.suppress_actions = true;
        let outcome = matcher.apply(state);
        state.suppress_actions = suppressed;
        state.restore(&checkpoint);

        match outcome {
            Ok(()) => {
                state.last.clear();
                Ok(())
            }
            Err(err) => Err(err),
        }
    })
}

/// Succeed, consuming nothing, iff `matcher` does not match here: its
/// success becomes `NoMatch`, its `NoMatch` becomes a zero-width success
/// with an empty result, and any other error propagates.
pub fn negative_assert(matcher: Matcher) -> Matcher {
    Matcher::new(move |state| {
        let checkpoint = state.checkpoint();
        let suppressed = state.suppress_actions;
        state.suppress_actions = true;
        let outcome = matcher.apply(state);
        state.suppress_actions = suppressed;
        state.restore(&checkpoint);

        match outcome {
            Ok(()) => Err(ParseError::NoMatch),
            Err(ParseError::NoMatch) => {
                state.last.clear();
                Ok(())
            }
            Err(err) => Err(err),
        }
    })
}
