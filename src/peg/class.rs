//! Self-hosted character-class compiler.
//!
//! `[a-z^...]`-style class expressions are compiled once, at matcher
//! construction time, by running a small grammar — built from this engine's
//! own primitives and combinators — over the expression text. The compiled
//! form is a flat set of inclusive code-point ranges plus an inversion flag;
//! matching against it is a range scan, never a re-parse of the class
//! syntax.
//!
//! The class grammar itself is built once per thread and reused across
//! compilations. Its actions write into a shared accumulator cell that each
//! compilation resets before running the grammar.

use std::cell::RefCell;
use std::rc::Rc;

use crate::peg::captures::{action, bind, pluck};
use crate::peg::combinators::{alternation, optional, repeat, sequence};
use crate::peg::error::ParseError;
use crate::peg::lookahead::negative_assert;
use crate::peg::primitives::{any_char, char_in, end_of_input, literal, one_of, single_char};
use crate::peg::state::{parse, MatchResult, Matcher};

/// A compiled character class: inclusive code-point ranges plus an inversion
/// flag. Immutable once compiled and reusable across parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    ranges: Vec<(char, char)>,
    inverted: bool,
}

impl CharClass {
    /// Compile a textual class expression.
    ///
    /// Syntax: `[`, an optional leading `^` for inversion, one or more items
    /// — each a single character or an `a-b` inclusive range with both ends
    /// lowercase, both uppercase, or both digits — terminated by `]`. The
    /// four syntactically special characters are written `\]`, `\[`, `\-`,
    /// `\^`. The expression must be consumed in full.
    pub fn compile(expr: &str) -> Result<CharClass, ParseError> {
        COMPILER.with(|compiler| compiler.compile(expr))
    }

    /// The compiled inclusive ranges, in the order they appeared.
    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// A matcher for one code point accepted by this class. An inverted
    /// class is a negative lookahead over the ranges followed by any single
    /// code point.
    pub fn matcher(&self) -> Matcher {
        let ranges = alternation(self.ranges.iter().map(|&(lo, hi)| char_in(lo, hi)));
        if self.inverted {
            sequence([negative_assert(ranges), any_char()])
        } else {
            ranges
        }
    }
}

/// Match one code point against a class expression compiled at construction
/// time. A malformed expression is a construction-time error, reported on
/// every use of the returned matcher.
pub fn char_class(expr: &str) -> Matcher {
    match CharClass::compile(expr) {
        Ok(class) => class.matcher(),
        Err(err) => Matcher::new(move |_| Err(err.clone())),
    }
}

thread_local! {
    static COMPILER: Compiler = Compiler::new();
}

/// Accumulator the class grammar's actions write into during replay.
#[derive(Default)]
struct Scratch {
    ranges: Vec<(char, char)>,
    inverted: bool,
}

impl Scratch {
    fn reset(&mut self) {
        self.ranges.clear();
        self.inverted = false;
    }
}

struct Compiler {
    grammar: Matcher,
    scratch: Rc<RefCell<Scratch>>,
}

impl Compiler {
    fn new() -> Compiler {
        let scratch = Rc::new(RefCell::new(Scratch::default()));
        let grammar = class_grammar(Rc::clone(&scratch));
        Compiler { grammar, scratch }
    }

    fn compile(&self, expr: &str) -> Result<CharClass, ParseError> {
        self.scratch.borrow_mut().reset();

        parse(&self.grammar, expr).map_err(|err| {
            let detail = match err {
                ParseError::NoMatch => "malformed class expression".to_string(),
                other => other.to_string(),
            };
            ParseError::InvalidClass {
                expr: expr.to_string(),
                detail,
            }
        })?;

        let scratch = self.scratch.borrow();
        Ok(CharClass {
            ranges: scratch.ranges.clone(),
            inverted: scratch.inverted,
        })
    }
}

fn class_grammar(scratch: Rc<RefCell<Scratch>>) -> Matcher {
    let range_item = |lo: char, hi: char| {
        sequence([
            bind("lo", char_in(lo, hi)),
            single_char('-'),
            bind("hi", char_in(lo, hi)),
        ])
    };

    // Escaped form first; a plain item is any code point that is not
    // syntactically special.
    let escaped_char = sequence([literal("\\"), pluck(one_of("][-^"))]);
    let plain_char = sequence([negative_assert(one_of("][-^")), any_char()]);
    let single = bind("ch", alternation([escaped_char, plain_char]));

    let item = action(
        alternation([
            range_item('a', 'z'),
            range_item('A', 'Z'),
            range_item('0', '9'),
            single,
        ]),
        move |result| record_item(&scratch, result),
    );

    sequence([
        single_char('['),
        optional(bind("invert", single_char('^'))),
        repeat(item, false),
        single_char(']'),
        end_of_input(),
    ])
}

fn record_item(scratch: &Rc<RefCell<Scratch>>, result: &MatchResult) -> Result<(), ParseError> {
    let mut scratch = scratch.borrow_mut();

    if result.bindings.contains("invert") {
        scratch.inverted = true;
    }

    if let Some(ch) = result.bindings.get("ch") {
        let c = first_char(ch)?;
        scratch.ranges.push((c, c));
    }

    if let (Some(lo), Some(hi)) = (result.bindings.get("lo"), result.bindings.get("hi")) {
        scratch.ranges.push((first_char(lo)?, first_char(hi)?));
    }

    Ok(())
}

fn first_char(text: &str) -> Result<char, ParseError> {
    text.chars()
        .next()
        .ok_or_else(|| ParseError::action("empty capture for class item"))
}
