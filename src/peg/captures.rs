//! Named captures, pluck selection and deferred actions.
//!
//! Actions are transactional: `action` only records a callback together with
//! a snapshot of the post-match state, and the top-level `parse` replays the
//! queue once the whole parse has succeeded. A branch abandoned by
//! backtracking takes its recorded actions with it (the enclosing
//! combinator's checkpoint restore truncates the queue), so a callback
//! attached to a locally-successful but ultimately rejected match never
//! fires.

use std::rc::Rc;

use crate::peg::error::ParseError;
use crate::peg::state::{ActionFn, MatchResult, Matcher, Pending};

/// Bind the matched text of `matcher` under `name`.
///
/// Bindings are append-only: matching the same `bind` again (inside a
/// repetition, say) adds another entry under the name rather than
/// overwriting the first.
pub fn bind(name: &str, matcher: Matcher) -> Matcher {
    let name = name.to_string();
    Matcher::new(move |state| {
        matcher.apply(state)?;
        let value = state.last.clone();
        state.bindings.push(&name, value);
        Ok(())
    })
}

/// Mark the matched text as the preferred contributor to the enclosing
/// sequence's result, suppressing non-plucked siblings.
pub fn pluck(matcher: Matcher) -> Matcher {
    Matcher::new(move |state| {
        matcher.apply(state)?;
        state.pluck = true;
        Ok(())
    })
}

/// Schedule `callback` to run over a snapshot of the post-match state once
/// the whole top-level parse has succeeded.
///
/// Captures recorded up to this point are scoped to the action: they travel
/// with the snapshot and the live multimap is reset after recording. Under a
/// lookahead the match still succeeds and produces text and captures, but no
/// action is queued.
pub fn action(
    matcher: Matcher,
    callback: impl Fn(&MatchResult) -> Result<(), ParseError> + 'static,
) -> Matcher {
    let callback: Rc<ActionFn> = Rc::new(callback);
    Matcher::new(move |state| {
        matcher.apply(state)?;

        if !state.suppress_actions {
            let snapshot = MatchResult {
                matched: state.last.clone(),
                rest: state.rest().to_string(),
                bindings: state.bindings.clone(),
            };
            state.pending.push(Pending {
                snapshot,
                callback: Rc::clone(&callback),
            });
            state.bindings.clear();
        }

        Ok(())
    })
}
