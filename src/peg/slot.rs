//! Forward references for recursive grammars.

use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::peg::error::ParseError;
use crate::peg::state::Matcher;

/// An assign-once cell that lets a matcher reference another matcher defined
/// later, for self- or mutually-recursive grammars.
///
/// Declare the slot first, build matchers that delegate to it via
/// [`Slot::matcher`], then assign the completed matcher with
/// [`Slot::define`]. The delegating matcher dereferences the cell at call
/// time, so grammars without a non-recursive base case are the author's
/// responsibility.
#[derive(Clone, Default)]
pub struct Slot {
    cell: Rc<OnceCell<Matcher>>,
}

impl Slot {
    pub fn new() -> Slot {
        Slot::default()
    }

    /// Assign the completed matcher. The first definition wins; later calls
    /// have no effect.
    pub fn define(&self, matcher: Matcher) {
        let _ = self.cell.set(matcher);
    }

    /// A matcher that delegates to this slot's definition at call time.
    /// Running it before `define` is an [`ParseError::UndefinedSlot`] error,
    /// not a `NoMatch`.
    pub fn matcher(&self) -> Matcher {
        let cell = Rc::clone(&self.cell);
        Matcher::new(move |state| match cell.get() {
            Some(matcher) => matcher.apply(state),
            None => Err(ParseError::UndefinedSlot),
        })
    }
}
