//! Error types for parsing and evaluation.

use thiserror::Error;

use crate::registry::RegistryError;
use crate::vars::VarError;

/// Result type for evaluation operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// A parse-time error. Fatal to the table being parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    /// 1-based line number in the table source.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

impl SyntaxError {
    /// Build a syntax error at `line`.
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Errors that can occur while expanding table text.
///
/// Only [`EvalError::CycleDetected`] aborts an evaluation; every other
/// variant is recovered by the engine and rendered as an inline error
/// marker so that generation always produces output.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The recursion ceiling was exceeded, most likely a table that
    /// references itself directly or through a chain.
    #[error("recursion limit of {0} exceeded")]
    CycleDetected(usize),

    /// A builtin call named a function that is not registered.
    #[error("no builtin function named {0}")]
    UnknownFunction(String),

    /// A `%Name%` reference named a variable that was never declared.
    #[error("variable %{0}% does not exist")]
    UnknownVariable(String),

    /// A builtin received malformed or out-of-range arguments.
    #[error("{0}")]
    Argument(String),

    /// A variable mutation failed.
    #[error(transparent)]
    Var(#[from] VarError),

    /// Dice notation failed to parse.
    #[error(transparent)]
    Dice(#[from] rollsmith_dice::DiceError),

    /// An embedded expression failed to parse or evaluate.
    #[error(transparent)]
    Expr(#[from] rollsmith_expr::ExprError),

    /// A table could not be resolved through the registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An interactive prompt could not be read.
    #[error("input error: {0}")]
    Input(#[from] std::io::Error),
}

impl EvalError {
    /// Whether this error aborts the whole evaluation instead of
    /// degrading to an inline marker.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EvalError::CycleDetected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_display_includes_line() {
        let err = SyntaxError::new(12, "no delimiter between range and text");
        assert_eq!(
            err.to_string(),
            "line 12: no delimiter between range and text"
        );
    }

    #[test]
    fn only_cycles_are_fatal() {
        assert!(EvalError::CycleDetected(64).is_fatal());
        assert!(!EvalError::UnknownFunction("frobnicate".into()).is_fatal());
        assert!(!EvalError::UnknownVariable("Gold".into()).is_fatal());
    }
}
