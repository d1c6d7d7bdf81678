//! Diagnostic decorator for grammar debugging.

use std::time::Instant;

use crate::peg::state::Matcher;

/// Wrap `matcher` to print each invocation's outcome, consumed byte count
/// and elapsed time to stderr. Orthogonal to the engine: the wrapped matcher
/// behaves exactly as the original.
pub fn traced(label: &str, matcher: Matcher) -> Matcher {
    let label = label.to_string();
    Matcher::new(move |state| {
        let before = state.pos();
        let started = Instant::now();
        let outcome = matcher.apply(state);
        let elapsed = started.elapsed();

        match &outcome {
            Ok(()) => eprintln!(
                "[{label}] matched {:?} ({} bytes, {elapsed:?})",
                state.last,
                state.pos() - before
            ),
            Err(err) => eprintln!("[{label}] failed: {err} ({elapsed:?})"),
        }

        outcome
    })
}
