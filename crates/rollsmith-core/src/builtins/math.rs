//! Numeric and dice builtins.

use std::sync::LazyLock;

use rand::rngs::StdRng;
use regex::Regex;
use rollsmith_dice::DicePool;

use crate::error::{EvalError, EvalResult};
use crate::eval::Engine;
use crate::num::{format_number, strip_zeros};
use crate::registry::TableHandle;

pub(super) fn abs(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let n: i64 = args
        .trim()
        .parse()
        .map_err(|_| EvalError::Argument(format!("Abs~{args} is not a number")))?;
    Ok(n.abs().to_string())
}

pub(super) fn ceil(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let f = parse_float("Ceil", args)?;
    Ok(format_number(f.ceil()))
}

pub(super) fn floor(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let f = parse_float("Floor", args)?;
    Ok(format_number(f.floor()))
}

/// `Round~Places,Value`: round to N decimal places, trailing zeros
/// stripped.
pub(super) fn round(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let parts: Vec<&str> = args.split(',').collect();
    let [places, value] = parts[..] else {
        return Err(EvalError::Argument(format!(
            "No decimal places in Round~{args}"
        )));
    };
    let places: i32 = places
        .trim()
        .parse::<f64>()
        .map_err(|_| EvalError::Argument(format!("Round~{args} precision is not a number")))?
        as i32;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| EvalError::Argument(format!("Round~{args} value is not a number")))?;
    let ratio = 10f64.powi(places);
    let rounded = (value * ratio).round() / ratio;
    let precision = places.max(0) as usize;
    Ok(strip_zeros(format!("{rounded:.precision$}")))
}

pub(super) fn sqrt(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let f = parse_float("Sqrt", args)?;
    Ok(format_number(f.sqrt()))
}

/// `Trunc~Value`: drop the fractional part, toward zero.
pub(super) fn trunc(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let f = parse_float("Trunc", args)?;
    let t = f.trunc();
    if t == 0.0 {
        Ok("0".to_string())
    } else {
        Ok(format!("{t}"))
    }
}

/// `IsNumber~Text`: 1 when Text is a plain decimal number, else 0.
pub(super) fn is_number(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    Ok(if crate::num::is_number(args) { "1" } else { "0" }.to_string())
}

/// `Calc~Expr`: evaluate an arithmetic expression with the table's
/// numeric variables bound as parameters.
pub(super) fn calc(
    _engine: &mut Engine,
    table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let expr = translate_expression(args);
    let params = table.borrow().variables.numeric();
    let value = rollsmith_expr::evaluate(&expr, &params)?;
    Ok(value.to_string())
}

/// `Dice~Spec`: roll dice notation, with trailing arithmetic applied
/// to the summed result.
pub(super) fn dice(
    engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    roll_with_modifiers(args, &mut engine.rng).map(|n| n.to_string())
}

static TRAILING_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+\-*/]\s*\d+").expect("trailing math pattern compiles"));

/// Roll dice notation like `3d6+2*10`, where the trailing `+N -N *N /N`
/// modifiers are not part of the pool notation itself: they are split
/// off first and applied, in order, to the summed roll.
pub fn roll_with_modifiers(spec: &str, rng: &mut StdRng) -> EvalResult<i64> {
    let cut = TRAILING_MATH
        .find(spec)
        .map(|m| m.start())
        .unwrap_or(spec.len());
    let pool = DicePool::parse(spec[..cut].trim())?;
    let mut sum = i64::from(pool.roll(rng).total());
    for m in TRAILING_MATH.find_iter(spec) {
        let text = m.as_str();
        let op = text.as_bytes()[0] as char;
        let n: i64 = text[1..]
            .trim_start()
            .parse()
            .map_err(|_| EvalError::Argument(format!("Dice~{spec}: bad modifier {text}")))?;
        sum = match op {
            '+' => sum + n,
            '-' => sum - n,
            '*' => sum * n,
            '/' if n == 0 => {
                return Err(EvalError::Argument(format!(
                    "Dice~{spec}: division by zero"
                )));
            }
            '/' => sum / n,
            _ => sum,
        };
    }
    Ok(sum)
}

/// Translate table expression syntax into the evaluator's: `%Var%`
/// references lose their percent signs and a lone `=` becomes `==`,
/// leaving `==`, `!=`, `<=`, and `>=` untouched.
pub(super) fn translate_expression(s: &str) -> String {
    let chars: Vec<char> = s.chars().filter(|&c| c != '%').collect();
    let mut out = String::with_capacity(chars.len() + 4);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '=' {
            if chars.get(i + 1) == Some(&'=') {
                out.push_str("==");
                i += 2;
                continue;
            }
            let prev = if i == 0 { None } else { Some(chars[i - 1]) };
            if matches!(prev, Some('<' | '>' | '!')) {
                out.push('=');
            } else {
                out.push_str("==");
            }
        } else {
            out.push(c);
        }
        i += 1;
    }
    out
}

fn parse_float(name: &str, args: &str) -> EvalResult<f64> {
    args.trim()
        .parse()
        .map_err(|_| EvalError::Argument(format!("{name}~{args} is not a number")))
}
