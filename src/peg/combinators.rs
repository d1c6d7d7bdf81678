//! Structural combinators: sequence, ordered choice, optional and bounded
//! repetition.
//!
//! Each combinator upholds the engine-wide contract that a failed match
//! leaves the parse state untouched. Sequence and repetition take a
//! checkpoint before attempting sub-matchers and restore it verbatim when a
//! required piece fails; ordered choice relies on each alternative's own
//! guarantee and needs no checkpoint of its own.

use crate::peg::error::ParseError;
use crate::peg::state::Matcher;

/// Apply `matchers` in order, concatenating their matched text.
///
/// If any sub-matcher fails, everything the earlier ones consumed or
/// recorded is rolled back and the failure propagates.
///
/// The first sub-match marked by `pluck` switches the accumulator into pluck
/// mode: text gathered so far is discarded and from then on only
/// pluck-marked sub-matches contribute. The pluck flag is cleared on the
/// composite result.
pub fn sequence<I>(matchers: I) -> Matcher
where
    I: IntoIterator<Item = Matcher>,
{
    let matchers: Vec<Matcher> = matchers.into_iter().collect();
    Matcher::new(move |state| {
        let checkpoint = state.checkpoint();
        let mut acc = String::new();
        let mut pluck_mode = false;

        for matcher in &matchers {
            state.last.clear();
            state.pluck = false;

            if let Err(err) = matcher.apply(state) {
                state.restore(&checkpoint);
                return Err(err);
            }

            if !pluck_mode && state.pluck {
                acc.clear();
                pluck_mode = true;
            }

            if !pluck_mode || state.pluck {
                acc.push_str(&state.last);
            }
        }

        state.last = acc;
        state.pluck = false;
        Ok(())
    })
}

/// Ordered choice: try each alternative against the same starting state and
/// return the first success. `NoMatch` moves on to the next alternative;
/// success or any other error stops the search immediately.
pub fn alternation<I>(matchers: I) -> Matcher
where
    I: IntoIterator<Item = Matcher>,
{
    let matchers: Vec<Matcher> = matchers.into_iter().collect();
    Matcher::new(move |state| {
        for matcher in &matchers {
            match matcher.apply(state) {
                Err(ParseError::NoMatch) => continue,
                outcome => return outcome,
            }
        }
        Err(ParseError::NoMatch)
    })
}

/// Apply `matcher`, turning `NoMatch` into a zero-width success with an
/// empty result. Other errors propagate.
pub fn optional(matcher: Matcher) -> Matcher {
    Matcher::new(move |state| match matcher.apply(state) {
        Err(ParseError::NoMatch) => {
            state.last.clear();
            Ok(())
        }
        outcome => outcome,
    })
}

/// Apply `matcher` repeatedly, with `separator` (when given) before every
/// repetition after the first, accumulating matched text.
///
/// `max: None` means unbounded; the loop stops early once `max` repetitions
/// are reached. Fewer than `min` successful repetitions fail the whole
/// construct as a unit. Separator and element are tried as one step: if the
/// element fails after the separator succeeded, the step is rolled back
/// whole, so a dangling trailing separator is left in the unconsumed
/// remainder rather than silently absorbed.
pub fn repeat_range(
    matcher: Matcher,
    min: usize,
    max: Option<usize>,
    separator: Option<Matcher>,
) -> Matcher {
    Matcher::new(move |state| {
        let start = state.checkpoint();
        let mut acc = String::new();
        let mut count = 0usize;

        loop {
            if let Some(max) = max {
                if count >= max {
                    break;
                }
            }

            let step = state.checkpoint();
            let before = state.pos();
            let mut step_text = String::new();

            if count > 0 {
                if let Some(separator) = &separator {
                    state.last.clear();
                    state.pluck = false;
                    match separator.apply(state) {
                        Ok(()) => step_text.push_str(&state.last),
                        Err(ParseError::NoMatch) => {
                            state.restore(&step);
                            break;
                        }
                        Err(err) => {
                            state.restore(&start);
                            return Err(err);
                        }
                    }
                }
            }

            state.last.clear();
            state.pluck = false;
            match matcher.apply(state) {
                Ok(()) => step_text.push_str(&state.last),
                Err(ParseError::NoMatch) => {
                    state.restore(&step);
                    break;
                }
                Err(err) => {
                    state.restore(&start);
                    return Err(err);
                }
            }

            acc.push_str(&step_text);
            count += 1;

            // A successful step that consumed nothing would never stop.
            if state.pos() == before {
                break;
            }
        }

        if count < min {
            state.restore(&start);
            return Err(ParseError::NoMatch);
        }

        state.last = acc;
        state.pluck = false;
        Ok(())
    })
}

/// Unbounded repetition without separator. `allow_empty` decides whether
/// zero repetitions succeed.
pub fn repeat(matcher: Matcher, allow_empty: bool) -> Matcher {
    repeat_range(matcher, if allow_empty { 0 } else { 1 }, None, None)
}

/// Unbounded repetition with `separator` between consecutive elements.
pub fn sep_by(matcher: Matcher, separator: Matcher, allow_empty: bool) -> Matcher {
    repeat_range(
        matcher,
        if allow_empty { 0 } else { 1 },
        None,
        Some(separator),
    )
}
