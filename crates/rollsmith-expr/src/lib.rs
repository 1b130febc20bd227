//! Infix arithmetic and boolean expressions with named parameters.
//!
//! Table text embeds small expressions such as `(2+3)*4` or
//! `Gold >= 10 && Level < 3`. This crate lexes, parses, and evaluates
//! them against a set of named `f64` parameters supplied by the caller.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expression  = or
//! or          = and ( "||" and )*
//! and         = comparison ( "&&" comparison )*
//! comparison  = additive ( ("==" | "!=" | "<" | "<=" | ">" | ">=") additive )*
//! additive    = multiplicative ( ("+" | "-") multiplicative )*
//! multiplicative = unary ( ("*" | "/" | "%") unary )*
//! unary       = ("-" | "!") unary | atom
//! atom        = number | identifier | "(" expression ")"
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;

use std::collections::HashMap;

pub use ast::{BinaryOp, Expr, UnaryOp, Value};
pub use error::{ExprError, ExprResult};

/// Parse `source` and evaluate it with `params` bound as named values.
pub fn evaluate(source: &str, params: &HashMap<String, f64>) -> ExprResult<Value> {
    let tokens = lexer::lex(source)?;
    let expr = parser::parse(&tokens)?;
    expr.evaluate(params)
}
