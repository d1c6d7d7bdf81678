//! Primitive matchers: literal strings and single-code-point matching.

use crate::peg::error::ParseError;
use crate::peg::lookahead::negative_assert;
use crate::peg::state::Matcher;

/// Match `literal_string` as a prefix of the remaining input, consuming it.
pub fn literal(literal_string: &str) -> Matcher {
    let wanted = literal_string.to_string();
    Matcher::new(move |state| {
        if state.rest().starts_with(&wanted) {
            state.advance(wanted.len());
            state.last = wanted.clone();
            Ok(())
        } else {
            Err(ParseError::NoMatch)
        }
    })
}

/// Match one code point in the inclusive range `lo..=hi`. Fails without
/// consuming on empty input.
pub fn char_in(lo: char, hi: char) -> Matcher {
    Matcher::new(move |state| match state.rest().chars().next() {
        Some(c) if lo <= c && c <= hi => {
            state.advance(c.len_utf8());
            state.last = c.to_string();
            Ok(())
        }
        _ => Err(ParseError::NoMatch),
    })
}

/// Match exactly the code point `c`.
pub fn single_char(c: char) -> Matcher {
    char_in(c, c)
}

/// Match one code point drawn from the enumerated `set`.
pub fn one_of(set: &str) -> Matcher {
    let set: Vec<char> = set.chars().collect();
    Matcher::new(move |state| match state.rest().chars().next() {
        Some(c) if set.contains(&c) => {
            state.advance(c.len_utf8());
            state.last = c.to_string();
            Ok(())
        }
        _ => Err(ParseError::NoMatch),
    })
}

/// Match any single code point; fails only on empty input.
pub fn any_char() -> Matcher {
    char_in('\0', char::MAX)
}

/// Succeed, consuming nothing, exactly when the input is exhausted.
pub fn end_of_input() -> Matcher {
    negative_assert(any_char())
}
