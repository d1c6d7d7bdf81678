//! Lookahead assertions and recursive grammars.

use pegmatch::peg::{
    alternation, any_char, bind, end_of_input, literal, negative_assert, optional, parse,
    positive_assert, repeat, sequence, ParseError, Slot,
};

#[test]
fn negative_assert_succeeds_zero_width() {
    let result = parse(&negative_assert(literal("h")), "world").unwrap();
    assert_eq!(result.matched, "");
    assert_eq!(result.rest, "world");
}

#[test]
fn negative_assert_fails_when_pattern_present() {
    assert_eq!(
        parse(&negative_assert(literal("w")), "world").unwrap_err(),
        ParseError::NoMatch
    );
}

#[test]
fn positive_assert_consumes_nothing() {
    let grammar = sequence([
        positive_assert(literal("wor")),
        bind("tail", repeat(any_char(), true)),
    ]);
    let result = parse(&grammar, "world").unwrap();
    assert_eq!(result.bindings.get("tail"), Some("world"));
}

#[test]
fn positive_assert_propagates_no_match() {
    assert_eq!(
        parse(&positive_assert(literal("x")), "world").unwrap_err(),
        ParseError::NoMatch
    );
}

#[test]
fn lookahead_retains_no_captures() {
    let grammar = sequence([
        positive_assert(bind("peek", literal("w"))),
        literal("world"),
    ]);
    let result = parse(&grammar, "world").unwrap();
    assert_eq!(result.bindings.get("peek"), None);
}

#[test]
fn negative_assert_discards_speculative_consumption() {
    // The inner matcher consumes "wo" before failing overall; nothing of
    // that survives the assertion.
    let grammar = sequence([
        negative_assert(sequence([literal("wo"), literal("XX")])),
        bind("tail", repeat(any_char(), true)),
    ]);
    let result = parse(&grammar, "world").unwrap();
    assert_eq!(result.bindings.get("tail"), Some("world"));
}

#[test]
fn slot_enables_self_recursion() {
    // balanced := '(' balanced* ')'
    let balanced = Slot::new();
    balanced.define(sequence([
        literal("("),
        repeat(balanced.matcher(), true),
        literal(")"),
    ]));

    let grammar = sequence([repeat(balanced.matcher(), false), end_of_input()]);

    let result = parse(&grammar, "(())").unwrap();
    assert_eq!(result.matched, "(())");
    assert_eq!(result.rest, "");

    assert!(parse(&grammar, "()(())").is_ok());
    assert!(parse(&grammar, "(()").is_err());
    assert!(parse(&grammar, ")(").is_err());
}

#[test]
fn mutual_recursion_across_slots() {
    // a := 'a' b?, b := 'b' a?
    let a = Slot::new();
    let b = Slot::new();
    a.define(sequence([literal("a"), optional(b.matcher())]));
    b.define(sequence([literal("b"), optional(a.matcher())]));

    let result = parse(&a.matcher(), "ababx").unwrap();
    assert_eq!(result.matched, "abab");
    assert_eq!(result.rest, "x");
}

#[test]
fn undefined_slot_is_an_error_not_no_match() {
    let slot = Slot::new();
    assert_eq!(
        parse(&slot.matcher(), "anything").unwrap_err(),
        ParseError::UndefinedSlot
    );

    // Alternation must not swallow it like a NoMatch.
    let grammar = alternation([slot.matcher(), literal("anything")]);
    assert_eq!(
        parse(&grammar, "anything").unwrap_err(),
        ParseError::UndefinedSlot
    );
}

#[test]
fn slot_first_definition_wins() {
    let slot = Slot::new();
    slot.define(literal("first"));
    slot.define(literal("second"));

    assert!(parse(&slot.matcher(), "first").is_ok());
    assert!(parse(&slot.matcher(), "second").is_err());
}
