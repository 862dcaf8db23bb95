//! Safe arithmetic over free text.
//!
//! A character-class filter ([`is_expression`]) decides whether a query
//! looks like arithmetic at all; [`evaluate`] then parses it with a
//! recursive-descent grammar and interprets the resulting tree. Nothing
//! outside the grammar's closed set of operators, whitelisted functions
//! and constants is reachable from query text, so arbitrary identifiers
//! can never be evaluated.

pub mod ast;
pub mod evaluator;
pub mod parser;

pub use ast::{BinaryOp, Constant, Expr, Function, UnaryOp};
pub use evaluator::{eval, ExprError, ExprResult};
pub use parser::parse;

/// Characters admitted by the expression filter: digits, operators,
/// grouping, and the letters appearing in supported function and
/// constant names.
const ALLOWED: &str = "0123456789+-*/^%().,abcdefgilmnopqrstuwx";

/// Cheap routing check: true iff, whitespace removed, the query is
/// non-empty and every character belongs to the allowed set. This is a
/// character filter, not a grammar check; it admits some strings that
/// fail to parse.
pub fn is_expression(query: &str) -> bool {
    let mut chars = query.chars().filter(|c| !c.is_whitespace()).peekable();
    if chars.peek().is_none() {
        return false;
    }
    chars.all(|c| ALLOWED.contains(c))
}

/// Evaluates an arithmetic expression to a display string. Never fails:
/// division by zero yields `"Error: Division by zero"` and any other
/// parse or evaluation failure yields `"Invalid math expression: …"`.
/// Callers treat strings starting with `"Error"` or `"Invalid"` as
/// failures.
pub fn evaluate(expression: &str) -> String {
    match parser::parse(expression).and_then(|expr| evaluator::eval(&expr)) {
        Ok(value) if value.is_finite() => format_number(value),
        Ok(_) => format!("Invalid math expression: {}", ExprError::NonFinite),
        Err(ExprError::DivisionByZero) => "Error: Division by zero".to_string(),
        Err(err) => format!("Invalid math expression: {}", err),
    }
}

/// Whole-valued results render as integer literals; everything else is
/// rounded to 10 decimal places.
fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        ((value * 1e10).round() / 1e10).to_string()
    }
}
