//! Per-table variable storage with typed mutation operators.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::num::{format_number, is_number};

/// Errors produced by variable mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VarError {
    /// A numeric operator was applied to a value that does not parse
    /// as a number.
    #[error("non-numeric operand \"{value}\" for variable {name}")]
    NonNumeric {
        /// The variable being assigned.
        name: String,
        /// The offending value.
        value: String,
    },
}

/// A variable assignment operator, written between the variable name
/// and the operand in a `|Name<op>Value|` assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    /// `+` numeric addition.
    Add,
    /// `-` numeric subtraction.
    Sub,
    /// `*` numeric multiplication.
    Mul,
    /// `/` numeric division.
    Div,
    /// `\` truncating integer division.
    IntDiv,
    /// `>` keep the larger of the current and new value.
    Max,
    /// `<` keep the smaller of the current and new value.
    Min,
    /// `&` string concatenation.
    Concat,
    /// `=` unconditional replacement.
    Set,
}

impl AssignOp {
    /// The set of characters that introduce an operator.
    pub const SYMBOLS: &'static [char] = &['+', '-', '*', '/', '\\', '>', '<', '&', '='];

    /// Map an operator character to its operator, if any.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            '\\' => Some(Self::IntDiv),
            '>' => Some(Self::Max),
            '<' => Some(Self::Min),
            '&' => Some(Self::Concat),
            '=' => Some(Self::Set),
            _ => None,
        }
    }
}

/// Mapping of variable name to string value. Declarations overwrite,
/// so later defaults win; arithmetic treats an absent variable as 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableStore {
    values: HashMap<String, String>,
}

impl VariableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value` unconditionally.
    pub fn declare(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a variable's current value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Number of declared variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no variables are declared.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The variables whose values parse fully as numbers, for binding
    /// as expression parameters.
    pub fn numeric(&self) -> HashMap<String, f64> {
        self.values
            .iter()
            .filter_map(|(name, value)| {
                value.parse::<f64>().ok().map(|n| (name.clone(), n))
            })
            .collect()
    }

    /// Apply `op` to `name` with the given operand.
    ///
    /// An undeclared variable reads as numeric 0 for the arithmetic
    /// operators; a declared but non-numeric value is an error there.
    pub fn assign(&mut self, name: &str, op: AssignOp, operand: &str) -> Result<(), VarError> {
        let stored = match op {
            AssignOp::Set => operand.to_string(),
            AssignOp::Concat => {
                let old = self.get(name).unwrap_or_default();
                format!("{old}{operand}")
            }
            AssignOp::Max => {
                let old = self.numeric_value(name)?;
                let new = parse_operand(name, operand)?;
                if new > old {
                    operand.to_string()
                } else {
                    self.get(name).unwrap_or("0").to_string()
                }
            }
            AssignOp::Min => {
                let old = self.numeric_value(name)?;
                let new = parse_operand(name, operand)?;
                if new < old {
                    operand.to_string()
                } else {
                    self.get(name).unwrap_or("0").to_string()
                }
            }
            AssignOp::Add | AssignOp::Sub | AssignOp::Mul | AssignOp::Div | AssignOp::IntDiv => {
                let old = self.numeric_value(name)?;
                let new = parse_operand(name, operand)?;
                match op {
                    AssignOp::Add => format_number(old + new),
                    AssignOp::Sub => format_number(old - new),
                    AssignOp::Mul => format_number(old * new),
                    AssignOp::Div => format_number(old / new),
                    AssignOp::IntDiv => format!("{}", (old / new).trunc()),
                    _ => unreachable!("arithmetic operators only"),
                }
            }
        };
        self.values.insert(name.to_string(), stored);
        Ok(())
    }

    /// The current value as a number: 0 when absent, an error when the
    /// stored value is not numeric.
    fn numeric_value(&self, name: &str) -> Result<f64, VarError> {
        match self.get(name) {
            None => Ok(0.0),
            Some(value) if is_number(value.trim()) => Ok(value.trim().parse().unwrap_or(0.0)),
            Some(value) => Err(VarError::NonNumeric {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

fn parse_operand(name: &str, operand: &str) -> Result<f64, VarError> {
    let trimmed = operand.trim();
    if is_number(trimmed) {
        Ok(trimmed.parse().unwrap_or(0.0))
    } else {
        Err(VarError::NonNumeric {
            name: name.to_string(),
            value: operand.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(name: &str, value: &str) -> VariableStore {
        let mut store = VariableStore::new();
        store.declare(name, value);
        store
    }

    #[test]
    fn declare_overwrites() {
        let mut store = store_with("Gold", "5");
        store.declare("Gold", "10");
        assert_eq!(store.get("Gold"), Some("10"));
    }

    #[test]
    fn arithmetic_operators() {
        let mut store = store_with("N", "10");
        store.assign("N", AssignOp::Add, "2.5").unwrap();
        assert_eq!(store.get("N"), Some("12.5"));
        store.assign("N", AssignOp::Sub, "0.5").unwrap();
        assert_eq!(store.get("N"), Some("12"));
        store.assign("N", AssignOp::Mul, "2").unwrap();
        assert_eq!(store.get("N"), Some("24"));
        store.assign("N", AssignOp::Div, "5").unwrap();
        assert_eq!(store.get("N"), Some("4.8"));
    }

    #[test]
    fn integer_division_truncates() {
        let mut store = store_with("N", "7");
        store.assign("N", AssignOp::IntDiv, "2").unwrap();
        assert_eq!(store.get("N"), Some("3"));
    }

    #[test]
    fn absent_variable_reads_as_zero() {
        let mut store = VariableStore::new();
        store.assign("Fresh", AssignOp::Add, "4").unwrap();
        assert_eq!(store.get("Fresh"), Some("4"));
    }

    #[test]
    fn max_keeps_the_larger_value() {
        let mut store = store_with("Best", "10");
        store.assign("Best", AssignOp::Max, "3").unwrap();
        assert_eq!(store.get("Best"), Some("10"));
        store.assign("Best", AssignOp::Max, "15").unwrap();
        assert_eq!(store.get("Best"), Some("15"));
        // Equal keeps the old value.
        store.assign("Best", AssignOp::Max, "15.0").unwrap();
        assert_eq!(store.get("Best"), Some("15"));
    }

    #[test]
    fn min_keeps_the_smaller_value() {
        let mut store = store_with("Worst", "10");
        store.assign("Worst", AssignOp::Min, "15").unwrap();
        assert_eq!(store.get("Worst"), Some("10"));
        store.assign("Worst", AssignOp::Min, "3").unwrap();
        assert_eq!(store.get("Worst"), Some("3"));
    }

    #[test]
    fn concat_and_set() {
        let mut store = store_with("Name", "Gor");
        store.assign("Name", AssignOp::Concat, "bash").unwrap();
        assert_eq!(store.get("Name"), Some("Gorbash"));
        store.assign("Name", AssignOp::Set, "Karg").unwrap();
        assert_eq!(store.get("Name"), Some("Karg"));
    }

    #[test]
    fn non_numeric_value_rejects_arithmetic() {
        let mut store = store_with("Name", "Gorbash");
        let err = store.assign("Name", AssignOp::Add, "1").unwrap_err();
        assert!(matches!(err, VarError::NonNumeric { .. }));
    }

    #[test]
    fn non_numeric_operand_rejects_arithmetic() {
        let mut store = store_with("N", "1");
        assert!(store.assign("N", AssignOp::Add, "lots").is_err());
    }

    #[test]
    fn numeric_params_skip_text_values() {
        let mut store = VariableStore::new();
        store.declare("Gold", "12");
        store.declare("Name", "Gorbash");
        let params = store.numeric();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("Gold"), Some(&12.0));
    }
}
