//! Expression evaluation against named parameters.

use std::collections::HashMap;

use crate::ast::{BinaryOp, Expr, UnaryOp, Value};
use crate::error::{ExprError, ExprResult};

impl Expr {
    /// Evaluate this expression with `params` bound as named values.
    pub fn evaluate(&self, params: &HashMap<String, f64>) -> ExprResult<Value> {
        match self {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Ident(name) => params
                .get(name)
                .map(|n| Value::Number(*n))
                .ok_or_else(|| ExprError::UnknownParameter(name.clone())),
            Expr::Unary(op, rhs) => {
                let rhs = rhs.evaluate(params)?;
                match op {
                    UnaryOp::Neg => Ok(Value::Number(-rhs.as_number()?)),
                    UnaryOp::Not => Ok(Value::Bool(!rhs.as_bool()?)),
                }
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = lhs.evaluate(params)?;
                let rhs = rhs.evaluate(params)?;
                apply_binary(*op, lhs, rhs)
            }
        }
    }
}

fn apply_binary(op: BinaryOp, lhs: Value, rhs: Value) -> ExprResult<Value> {
    match op {
        BinaryOp::Add => Ok(Value::Number(lhs.as_number()? + rhs.as_number()?)),
        BinaryOp::Sub => Ok(Value::Number(lhs.as_number()? - rhs.as_number()?)),
        BinaryOp::Mul => Ok(Value::Number(lhs.as_number()? * rhs.as_number()?)),
        BinaryOp::Div => Ok(Value::Number(lhs.as_number()? / rhs.as_number()?)),
        BinaryOp::Rem => Ok(Value::Number(lhs.as_number()? % rhs.as_number()?)),
        BinaryOp::Lt => Ok(Value::Bool(lhs.as_number()? < rhs.as_number()?)),
        BinaryOp::Le => Ok(Value::Bool(lhs.as_number()? <= rhs.as_number()?)),
        BinaryOp::Gt => Ok(Value::Bool(lhs.as_number()? > rhs.as_number()?)),
        BinaryOp::Ge => Ok(Value::Bool(lhs.as_number()? >= rhs.as_number()?)),
        BinaryOp::Eq => equality(lhs, rhs).map(Value::Bool),
        BinaryOp::Ne => equality(lhs, rhs).map(|eq| Value::Bool(!eq)),
        BinaryOp::And => Ok(Value::Bool(lhs.as_bool()? && rhs.as_bool()?)),
        BinaryOp::Or => Ok(Value::Bool(lhs.as_bool()? || rhs.as_bool()?)),
    }
}

fn equality(lhs: Value, rhs: Value) -> ExprResult<bool> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        _ => Err(ExprError::Type(
            "cannot compare a number with a boolean".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(source: &str) -> ExprResult<Value> {
        let tokens = crate::lexer::lex(source)?;
        crate::parser::parse(&tokens)?.evaluate(&HashMap::new())
    }

    #[test]
    fn division_follows_float_semantics() {
        assert_eq!(eval("1 / 0").unwrap(), Value::Number(f64::INFINITY));
    }

    #[test]
    fn boolean_operands_reject_arithmetic() {
        assert!(matches!(eval("(1 == 1) + 2"), Err(ExprError::Type(_))));
    }

    #[test]
    fn numbers_reject_logic() {
        assert!(matches!(eval("1 && 2"), Err(ExprError::Type(_))));
    }

    #[test]
    fn mixed_equality_is_a_type_error() {
        assert!(matches!(eval("1 == (2 == 2)"), Err(ExprError::Type(_))));
    }

    #[test]
    fn negation() {
        assert_eq!(eval("-(2 + 3)").unwrap(), Value::Number(-5.0));
        assert_eq!(eval("!(2 < 3)").unwrap(), Value::Bool(false));
    }
}
