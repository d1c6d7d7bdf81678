//! Command-line interface for pegmatch
//! This binary demonstrates the combinator engine on two consumer grammars.
//!
//! Usage:
//!   pegmatch eval `<expr>`                        - Evaluate a bitwise/arithmetic expression
//!   pegmatch semver `<version>` [--format `<format>`] - Parse a semantic version string

use clap::{Arg, Command};
use serde::Serialize;

use pegmatch::peg::{
    action, alternation, bind, char_class, char_in, end_of_input, literal, one_of, optional,
    parse, pluck, repeat, sequence, single_char, Bindings, Matcher, ParseError,
};

fn main() {
    let matches = Command::new("pegmatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Grammar demos built on the pegmatch combinator engine")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("eval")
                .about("Evaluate a bitwise/arithmetic expression strictly left to right")
                .arg(
                    Arg::new("expr")
                        .help("Expression, e.g. \"2-3*3\" or \"1 << 4 | 2\"")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("semver")
                .about("Parse a semantic version string")
                .arg(
                    Arg::new("version")
                        .help("Version string, e.g. \"1.0.0-alpha+001\"")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('text', 'json' or 'raw-json')")
                        .default_value("text"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("eval", eval_matches)) => {
            let expr = eval_matches.get_one::<String>("expr").unwrap();
            handle_eval_command(expr);
        }
        Some(("semver", semver_matches)) => {
            let version = semver_matches.get_one::<String>("version").unwrap();
            let format = semver_matches.get_one::<String>("format").unwrap();
            handle_semver_command(version, format);
        }
        _ => unreachable!(),
    }
}

// ---------------------------------------------------------------------------
// eval
// ---------------------------------------------------------------------------

/// One evaluation step: the operator applied, the operand as written, and
/// the operand's value.
struct Step {
    op: String,
    repr: String,
    value: i64,
}

/// Handle the eval command: parse the expression, then let the deferred
/// action compute and print the result once the parse has fully succeeded.
fn handle_eval_command(expr: &str) {
    let grammar = action(expression_grammar(), |result| {
        let (steps, total) = evaluate(&result.bindings).map_err(ParseError::action)?;
        print_expression(&steps, total);
        Ok(())
    });

    if let Err(err) = parse(&grammar, expr) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

/// Operand-then-operator chain: `operand (op operand)*`, single optional
/// spaces around operators, anchored to the end of the input.
fn expression_grammar() -> Matcher {
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

    sequence([
        bind("operand", operand()),
        repeat(
            sequence([ws(), bind("op", binary_op), ws(), bind("operand", operand())]),
            true,
        ),
        optional(single_char('\n')),
        end_of_input(),
    ])
}

/// Fold the captured operand/operator chain strictly left to right.
fn evaluate(bindings: &Bindings) -> Result<(Vec<Step>, i64), String> {
    let mut acc: Option<i64> = None;
    let mut pending_op: Option<String> = None;
    let mut steps = Vec::new();

    for (name, value) in bindings.iter() {
        match name {
            "operand" => {
                let operand = resolve_operand(value)?;
                let op = pending_op.take();
                acc = Some(match (acc, &op) {
                    (None, _) => operand,
                    (Some(left), Some(op)) => apply_op(left, op, operand)?,
                    (Some(_), None) => return Err("operand without an operator".to_string()),
                });
                steps.push(Step {
                    op: op.unwrap_or_default(),
                    repr: value.to_string(),
                    value: operand,
                });
            }
            "op" => pending_op = Some(value.to_string()),
            _ => {}
        }
    }

    acc.map(|total| (steps, total))
        .ok_or_else(|| "empty expression".to_string())
}

/// Resolve a raw operand, honoring a leading `-` (negate) or `~` (bitwise
/// complement).
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

/// Print every step and the running total, with the operand and binary
/// columns aligned.
fn print_expression(steps: &[Step], total: i64) {
    let total_repr = total.to_string();
    let total_bits = binary_repr(total);

    let repr_width = steps
        .iter()
        .map(|s| s.repr.len())
        .chain([total_repr.len()])
        .max()
        .unwrap_or(0);
    let bits_width = steps
        .iter()
        .map(|s| binary_repr(s.value).len())
        .chain([total_bits.len()])
        .max()
        .unwrap_or(0);

    for step in steps {
        let op = if step.op.is_empty() { " " } else { step.op.as_str() };
        println!(
            "  {op:>3} {:>repr_width$} {:>bits_width$}",
            step.repr,
            binary_repr(step.value)
        );
    }
    println!("  {:>3} {total_repr:>repr_width$} {total_bits:>bits_width$}", "=");
}

fn binary_repr(value: i64) -> String {
    if value < 0 {
        format!("-0b{:b}", (value as i128).unsigned_abs())
    } else {
        format!("0b{value:b}")
    }
}

// ---------------------------------------------------------------------------
// semver
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SemVer {
    major: u64,
    minor: u64,
    patch: u64,
    pre_release: Option<String>,
    build: Option<String>,
}

/// Handle the semver command.
fn handle_semver_command(version: &str, format: &str) {
    let result = match parse(&semver_grammar(), version) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    if format == "raw-json" {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    let semver = match semver_from(&result.bindings) {
        Ok(semver) => semver,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    match format {
        "json" => match serde_json::to_string_pretty(&semver) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        },
        "text" => {
            println!("version : {version}");
            println!("major   : {}", semver.major);
            println!("minor   : {}", semver.minor);
            println!("patch   : {}", semver.patch);
            if let Some(pre_release) = &semver.pre_release {
                println!("pre     : {pre_release}");
            }
            if let Some(build) = &semver.build {
                println!("build   : {build}");
            }
        }
        other => {
            eprintln!("Error: unknown format {other:?}");
            std::process::exit(1);
        }
    }
}

/// Semantic-version grammar: `major.minor.patch` with optional `-pre` and
/// `+build` dot-separated identifier lists. The leading `-`/`+` markers are
/// dropped from the captured text via `pluck`.
fn semver_grammar() -> Matcher {
    let digit = || char_in('0', '9');
    let positive_digit = || char_in('1', '9');
    let dot = || single_char('.');

    // No leading zeros: either a lone 0 or a positive-digit-led run.
    let numeric_identifier = || {
        alternation([
            sequence([positive_digit(), repeat(digit(), true)]),
            single_char('0'),
        ])
    };

    let non_digit = || char_class("[a-zA-Z\\-]");
    let identifier_char = || char_class("[a-zA-Z0-9\\-]");
    let alphanumeric_identifier =
        || sequence([repeat(digit(), true), non_digit(), repeat(identifier_char(), true)]);

    let pre_release_identifier =
        || alternation([alphanumeric_identifier(), numeric_identifier()]);
    let pre_release = sequence([
        bind("pre_id", pre_release_identifier()),
        repeat(
            sequence([dot(), bind("pre_id", pre_release_identifier())]),
            true,
        ),
    ]);

    let build_identifier = || alternation([alphanumeric_identifier(), repeat(digit(), false)]);
    let build = sequence([
        bind("build_id", build_identifier()),
        repeat(sequence([dot(), bind("build_id", build_identifier())]), true),
    ]);

    sequence([
        bind("major", numeric_identifier()),
        dot(),
        bind("minor", numeric_identifier()),
        dot(),
        bind("patch", numeric_identifier()),
        bind(
            "pre",
            optional(sequence([single_char('-'), pluck(pre_release)])),
        ),
        bind(
            "build",
            optional(sequence([single_char('+'), pluck(build)])),
        ),
        end_of_input(),
    ])
}

fn semver_from(bindings: &Bindings) -> Result<SemVer, String> {
    Ok(SemVer {
        major: version_component(bindings, "major")?,
        minor: version_component(bindings, "minor")?,
        patch: version_component(bindings, "patch")?,
        pre_release: non_empty(bindings.get("pre")),
        build: non_empty(bindings.get("build")),
    })
}

fn version_component(bindings: &Bindings, name: &str) -> Result<u64, String> {
    let raw = bindings
        .get(name)
        .ok_or_else(|| format!("missing {name} component"))?;
    raw.parse::<u64>()
        .map_err(|err| format!("{name} component {raw:?}: {err}"))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(String::from)
}
