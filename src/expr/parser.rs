//! Recursive-descent parser for the arithmetic grammar.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/' | '%') unary)*
//! unary  := '-' unary | power
//! power  := atom ('^' unary)?            // right-associative
//! atom   := number | '(' expr ')' | name '(' expr (',' expr)* ')' | name
//! ```
//!
//! Exponentiation binds tighter than unary minus on its left and looser
//! on its right, so `-2^2` is `-(2^2)` and `2^-3` parses. A bare `name`
//! must be a known constant; a called `name` must be a whitelisted
//! function.

use std::str::FromStr;

use nom::{
    branch::alt,
    character::complete::{alpha1, char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize},
    error::{context, Error as NomError, ErrorKind},
    multi::{fold_many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use super::ast::{BinaryOp, Constant, Expr, Function};
use super::evaluator::ExprError;

type ParseResult<'a, T> = IResult<&'a str, T>;

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> ParseResult<'a, O>
where
    F: FnMut(&'a str) -> ParseResult<'a, O>,
{
    preceded(multispace0, inner)
}

fn parse_number(input: &str) -> ParseResult<Expr> {
    context(
        "number",
        map_res(
            recognize(alt((
                recognize(tuple((digit1, opt(pair(char('.'), digit0))))),
                recognize(pair(char('.'), digit1)),
            ))),
            |s: &str| s.parse::<f64>().map(Expr::Number),
        ),
    )(input)
}

fn parse_name(input: &str) -> ParseResult<&str> {
    recognize(pair(alpha1, digit0))(input)
}

/// A name followed by an argument list is a function call; a bare name
/// must resolve to a constant.
fn parse_call_or_constant(input: &str) -> ParseResult<Expr> {
    let (rest, name) = parse_name(input)?;
    let (rest, args) = opt(delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), parse_expr),
        ws(char(')')),
    ))(rest)?;

    match args {
        Some(args) => {
            let function = Function::from_str(name)
                .map_err(|_| nom::Err::Error(NomError::new(input, ErrorKind::Tag)))?;
            Ok((rest, Expr::Call { function, args }))
        }
        None => {
            let constant = Constant::from_str(name)
                .map_err(|_| nom::Err::Error(NomError::new(input, ErrorKind::Tag)))?;
            Ok((rest, Expr::Constant(constant)))
        }
    }
}

fn parse_atom(input: &str) -> ParseResult<Expr> {
    context(
        "atom",
        ws(alt((
            parse_number,
            delimited(char('('), parse_expr, ws(char(')'))),
            parse_call_or_constant,
        ))),
    )(input)
}

fn parse_power(input: &str) -> ParseResult<Expr> {
    let (input, base) = parse_atom(input)?;
    let (input, exponent) = opt(preceded(ws(char('^')), parse_unary))(input)?;
    Ok(match exponent {
        Some(exponent) => (input, Expr::binary(BinaryOp::Power, base, exponent)),
        None => (input, base),
    })
}

fn parse_unary(input: &str) -> ParseResult<Expr> {
    context(
        "unary",
        alt((
            map(preceded(ws(char('-')), parse_unary), Expr::neg),
            parse_power,
        )),
    )(input)
}

fn parse_term(input: &str) -> ParseResult<Expr> {
    let (input, init) = parse_unary(input)?;
    fold_many0(
        pair(ws(one_of("*/%")), parse_unary),
        move || init.clone(),
        |left, (op, right)| {
            let op = match op {
                '*' => BinaryOp::Multiply,
                '/' => BinaryOp::Divide,
                _ => BinaryOp::Modulo,
            };
            Expr::binary(op, left, right)
        },
    )(input)
}

fn parse_expr(input: &str) -> ParseResult<Expr> {
    let (input, init) = parse_term(input)?;
    fold_many0(
        pair(ws(one_of("+-")), parse_term),
        move || init.clone(),
        |left, (op, right)| {
            let op = if op == '+' {
                BinaryOp::Add
            } else {
                BinaryOp::Subtract
            };
            Expr::binary(op, left, right)
        },
    )(input)
}

/// Parses a complete expression, rejecting any trailing input.
pub fn parse(input: &str) -> Result<Expr, ExprError> {
    match all_consuming(terminated(parse_expr, multispace0))(input) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ExprError::Parse(format!(
            "unexpected input at '{}'",
            e.input.trim()
        ))),
        Err(nom::Err::Incomplete(_)) => Err(ExprError::Parse("incomplete expression".to_string())),
    }
}
