//! An expression-evaluator grammar exercising captures and deferred actions
//! end to end: the computation runs inside a deferred action, so it must
//! happen exactly once, and only for parses that fully succeed.

use std::cell::RefCell;
use std::rc::Rc;

use pegmatch::peg::{
    action, alternation, bind, char_in, end_of_input, literal, one_of, optional, parse, repeat,
    sequence, Bindings, Matcher, ParseError,
};

/// Operand-then-operator chain evaluated strictly left to right, storing the
/// result through a deferred action.
fn calculator(output: Rc<RefCell<Option<i64>>>) -> Matcher {
    let digit = || char_in('0', '9');
    let unsigned = || sequence([digit(), repeat(digit(), true)]);
    let operand = || sequence([optional(one_of("-~")), unsigned()]);
    let ws = || repeat(one_of(" "), true);

    let binary_op = alternation([
        literal("<<<"),
        literal("<<"),
        literal(">>"),
        one_of("&|^+-*/"),
    ]);

    let expression = sequence([
        bind("operand", operand()),
        repeat(
            sequence([ws(), bind("op", binary_op), ws(), bind("operand", operand())]),
            true,
        ),
        end_of_input(),
    ]);

    action(expression, move |result| {
        let value = evaluate(&result.bindings).map_err(ParseError::action)?;
        *output.borrow_mut() = Some(value);
        Ok(())
    })
}

fn evaluate(bindings: &Bindings) -> Result<i64, String> {
    let mut acc: Option<i64> = None;
    let mut pending_op: Option<String> = None;

    for (name, value) in bindings.iter() {
        match name {
            "operand" => {
                let operand = resolve_operand(value)?;
                acc = Some(match (acc, pending_op.take()) {
                    (None, _) => operand,
                    (Some(left), Some(op)) => apply_op(left, &op, operand)?,
                    (Some(_), None) => return Err("operand without an operator".to_string()),
                });
            }
            "op" => pending_op = Some(value.to_string()),
            _ => {}
        }
    }

    acc.ok_or_else(|| "empty expression".to_string())
}

fn resolve_operand(raw: &str) -> Result<i64, String> {
    let mut chars = raw.chars();
    match chars.next() {
        Some('-') => parse_digits(chars.as_str()).map(|v| -v),
        Some('~') => parse_digits(chars.as_str()).map(|v| !v),
        _ => parse_digits(raw),
    }
}

fn parse_digits(digits: &str) -> Result<i64, String> {
    digits
        .parse::<i64>()
        .map_err(|err| format!("bad number {digits:?}: {err}"))
}

fn apply_op(left: i64, op: &str, right: i64) -> Result<i64, String> {
    Ok(match op {
        "+" => left.wrapping_add(right),
        "-" => left.wrapping_sub(right),
        "*" => left.wrapping_mul(right),
        "/" => left
            .checked_div(right)
            .ok_or_else(|| "division by zero".to_string())?,
        "&" => left & right,
        "|" => left | right,
        "^" => left ^ right,
        "<<" => left.wrapping_shl(right as u32),
        ">>" => left.wrapping_shr(right as u32),
        "<<<" => left.rotate_left(right.rem_euclid(64) as u32),
        _ => return Err(format!("unknown operator {op:?}")),
    })
}

fn eval(expr: &str) -> Result<Option<i64>, ParseError> {
    let output = Rc::new(RefCell::new(None));
    let grammar = calculator(Rc::clone(&output));
    parse(&grammar, expr)?;
    let value = *output.borrow();
    Ok(value)
}

#[test]
fn single_operand() {
    assert_eq!(eval("7").unwrap(), Some(7));
}

#[test]
fn left_to_right_without_precedence() {
    // (2 - 3) * 3, not 2 - (3 * 3)
    assert_eq!(eval("2-3*3").unwrap(), Some(-3));
}

#[test]
fn spaces_around_operators() {
    assert_eq!(eval("1 + 2 + 3 + 4").unwrap(), Some(10));
}

#[test]
fn bitwise_operators() {
    assert_eq!(eval("1 << 4 | 2").unwrap(), Some(18));
    assert_eq!(eval("12 & 10").unwrap(), Some(8));
    assert_eq!(eval("5 ^ 3").unwrap(), Some(6));
}

#[test]
fn unary_prefixes() {
    assert_eq!(eval("~0").unwrap(), Some(-1));
    assert_eq!(eval("-2+5").unwrap(), Some(3));
    assert_eq!(eval("2*-3").unwrap(), Some(-6));
}

#[test]
fn rotate_operator() {
    assert_eq!(eval("1 <<< 64").unwrap(), Some(1));
    assert_eq!(eval("1 <<< 1").unwrap(), Some(2));
}

#[test]
fn malformed_expression_never_runs_the_action() {
    let output = Rc::new(RefCell::new(None));
    let grammar = calculator(Rc::clone(&output));

    assert!(parse(&grammar, "2 +").is_err());
    assert_eq!(*output.borrow(), None);
}

#[test]
fn callback_error_surfaces_through_parse() {
    let err = eval("1/0").unwrap_err();
    assert_eq!(err, ParseError::Action("division by zero".to_string()));
}
