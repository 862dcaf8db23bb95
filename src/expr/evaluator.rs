use thiserror::Error;

use super::ast::{BinaryOp, Constant, Expr, Function, UnaryOp};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("unable to parse expression: {0}")]
    Parse(String),
    #[error("{function} expects exactly {expected} argument(s), got {actual}")]
    Arity {
        function: Function,
        expected: usize,
        actual: usize,
    },
    #[error("result is not a finite number")]
    NonFinite,
}

pub type ExprResult<T> = Result<T, ExprError>;

/// Interprets an expression tree. The only names reachable from here are
/// the whitelisted functions and constants of the AST.
pub fn eval(expr: &Expr) -> ExprResult<f64> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Constant(Constant::Pi) => Ok(std::f64::consts::PI),
        Expr::Constant(Constant::E) => Ok(std::f64::consts::E),
        Expr::Unary {
            op: UnaryOp::Neg,
            operand,
        } => Ok(-eval(operand)?),
        Expr::Binary { op, left, right } => eval_binary(*op, eval(left)?, eval(right)?),
        Expr::Call { function, args } => eval_call(*function, args),
    }
}

fn eval_binary(op: BinaryOp, left: f64, right: f64) -> ExprResult<f64> {
    match op {
        BinaryOp::Add => Ok(left + right),
        BinaryOp::Subtract => Ok(left - right),
        BinaryOp::Multiply => Ok(left * right),
        BinaryOp::Divide => {
            if right == 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            Ok(left / right)
        }
        BinaryOp::Modulo => {
            if right == 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            // floored modulo, result takes the sign of the divisor
            Ok(left - right * (left / right).floor())
        }
        BinaryOp::Power => Ok(left.powf(right)),
    }
}

fn eval_call(function: Function, args: &[Expr]) -> ExprResult<f64> {
    let expected = function.arity();
    if args.len() != expected {
        return Err(ExprError::Arity {
            function,
            expected,
            actual: args.len(),
        });
    }
    let first = eval(&args[0])?;
    match function {
        Function::Min => Ok(first.min(eval(&args[1])?)),
        Function::Max => Ok(first.max(eval(&args[1])?)),
        Function::Pow => Ok(first.powf(eval(&args[1])?)),
        Function::Abs => Ok(first.abs()),
        Function::Round => Ok(first.round()),
        Function::Sqrt => Ok(first.sqrt()),
        Function::Sin => Ok(first.sin()),
        Function::Cos => Ok(first.cos()),
        Function::Tan => Ok(first.tan()),
        Function::Log => Ok(first.ln()),
        Function::Log10 => Ok(first.log10()),
        Function::Exp => Ok(first.exp()),
        Function::Ceil => Ok(first.ceil()),
        Function::Floor => Ok(first.floor()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::parser::parse;
    use super::*;

    fn eval_str(input: &str) -> ExprResult<f64> {
        eval(&parse(input).unwrap())
    }

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(eval_str("2 + 2").unwrap(), 4.0);
        assert_eq!(eval_str("10 - 4").unwrap(), 6.0);
        assert_eq!(eval_str("6 * 7").unwrap(), 42.0);
        assert_eq!(eval_str("9 / 2").unwrap(), 4.5);
        assert_eq!(eval_str("7 % 3").unwrap(), 1.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval_str("1 / 0"), Err(ExprError::DivisionByZero));
        assert_eq!(eval_str("5 % 0"), Err(ExprError::DivisionByZero));
    }

    #[test]
    fn test_power() {
        assert_eq!(eval_str("2 ^ 10").unwrap(), 1024.0);
        assert_eq!(eval_str("2 ^ 3 ^ 2").unwrap(), 512.0);
        assert_eq!(eval_str("-2 ^ 2").unwrap(), -4.0);
    }

    #[test]
    fn test_modulo_sign_follows_divisor() {
        assert_eq!(eval_str("-7 % 3").unwrap(), 2.0);
        assert_eq!(eval_str("7 % -3").unwrap(), -2.0);
    }

    #[test]
    fn test_functions() {
        assert_eq!(eval_str("sqrt(16)").unwrap(), 4.0);
        assert_eq!(eval_str("abs(-3)").unwrap(), 3.0);
        assert_eq!(eval_str("min(3, 5)").unwrap(), 3.0);
        assert_eq!(eval_str("max(3, 5)").unwrap(), 5.0);
        assert_eq!(eval_str("pow(2, 8)").unwrap(), 256.0);
        assert_eq!(eval_str("log10(1000)").unwrap(), 3.0);
        assert_eq!(eval_str("ceil(1.2)").unwrap(), 2.0);
        assert_eq!(eval_str("floor(1.8)").unwrap(), 1.0);
        assert!((eval_str("log(e)").unwrap() - 1.0).abs() < 1e-12);
        assert!((eval_str("sin(pi)").unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_arity_mismatch() {
        assert_eq!(
            eval_str("min(1)"),
            Err(ExprError::Arity {
                function: Function::Min,
                expected: 2,
                actual: 1,
            })
        );
        assert!(matches!(eval_str("sqrt(1, 2)"), Err(ExprError::Arity { .. })));
    }

    #[test]
    fn test_nested_expression() {
        assert_eq!(eval_str("3 * (4 + 5)").unwrap(), 27.0);
        assert_eq!(eval_str("sqrt(abs(-16)) + max(1, 2)").unwrap(), 6.0);
    }
}
