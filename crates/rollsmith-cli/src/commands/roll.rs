//! The `roll` command: dice expressions straight from the shell.

use rand::SeedableRng;
use rand::rngs::StdRng;

use rollsmith_core::roll_with_modifiers;

/// Split an `N-` repeat prefix off a dice expression: `4-1d8` rolls
/// `1d8` four times. Expressions without the prefix roll once.
fn split_repeat(expr: &str) -> (u32, &str) {
    match expr.split_once('-') {
        Some((head, rest)) if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()) => {
            match head.parse() {
                Ok(n) => (n, rest),
                Err(_) => (1, expr),
            }
        }
        _ => (1, expr),
    }
}

/// Roll each expression. Arguments that are not dice notation print
/// as-is, so titles can be mixed in between rolls.
pub fn run(exprs: &[String], seed: Option<u64>) -> Result<(), String> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    for expr in exprs {
        let (repeat, spec) = split_repeat(expr);
        match roll_with_modifiers(spec, &mut rng) {
            Err(_) => println!("{expr}"),
            Ok(first) => {
                let mut results = vec![first.to_string()];
                for _ in 1..repeat {
                    let n = roll_with_modifiers(spec, &mut rng).map_err(|e| e.to_string())?;
                    results.push(n.to_string());
                }
                println!("{}", results.join(" "));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_prefix_splits() {
        assert_eq!(split_repeat("4-1d4"), (4, "1d4"));
        assert_eq!(split_repeat("12-1d8"), (12, "1d8"));
    }

    #[test]
    fn no_prefix_rolls_once() {
        assert_eq!(split_repeat("3d6"), (1, "3d6"));
        assert_eq!(split_repeat("init"), (1, "init"));
    }

    #[test]
    fn dice_with_subtraction_is_not_a_repeat() {
        assert_eq!(split_repeat("3d6-2"), (1, "3d6-2"));
    }
}
