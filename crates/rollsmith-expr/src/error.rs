//! Error types for expression lexing, parsing, and evaluation.

use thiserror::Error;

/// Result type for expression operations.
pub type ExprResult<T> = Result<T, ExprError>;

/// Errors produced while lexing, parsing, or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// The lexer hit a character that is not part of the grammar.
    #[error("unexpected character at offset {0}")]
    UnexpectedChar(usize),

    /// The parser found a token it did not expect.
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),

    /// The expression ended before a complete term was parsed.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// An identifier did not match any bound parameter.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// An operator was applied to operands of the wrong type.
    #[error("type error: {0}")]
    Type(String),
}
