//! # pegmatch
//!
//! A parsing-expression-grammar combinator engine.
//!
//! Grammar authors compose primitive matchers with structural combinators,
//! attach named captures and deferred semantic actions, and run the composed
//! matcher tree repeatedly through [`peg::parse`]. Actions are transactional
//! under backtracking: a callback attached to a branch that is later
//! abandoned never fires.

pub mod peg;
