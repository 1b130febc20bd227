//! Control-flow and session builtins.

use rollsmith_expr::Value;

use crate::error::{EvalError, EvalResult};
use crate::eval::Engine;
use crate::registry::TableHandle;

use super::math::translate_expression;

/// `If~Expr ? ResultIfTrue/ResultIfFalse`: evaluate Expr, then pick a
/// branch. The expression is expanded first, so it may contain nested
/// calls and variable references; a missing `/` leaves the false branch
/// empty. Only a boolean true selects the first branch.
pub(super) fn if_then(
    engine: &mut Engine,
    table: &TableHandle,
    depth: usize,
    args: &str,
) -> EvalResult<String> {
    let Some((expr_part, results)) = args.split_once('?') else {
        return Err(EvalError::Argument(format!(
            "If~{args}: expected Expr ? Result1/Result2"
        )));
    };
    let (when_true, when_false) = results.split_once('/').unwrap_or((results, ""));
    let expr_text = engine.eval_at(table, expr_part, depth + 1)?;
    let expr = translate_expression(&expr_text);
    let params = table.borrow().variables.numeric();
    let value = rollsmith_expr::evaluate(&expr, &params)?;
    if value == Value::Bool(true) {
        Ok(when_true.to_string())
    } else {
        Ok(when_false.to_string())
    }
}

/// `Reset~GroupName`: clear a use-once group's seen-state.
pub(super) fn reset(
    _engine: &mut Engine,
    table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let mut t = table.borrow_mut();
    match t.group_mut(args) {
        Some(group) => {
            group.reset();
            Ok(String::new())
        }
        None => Err(EvalError::Argument(format!(
            "Reset~{args}: nonexistent group"
        ))),
    }
}

/// `InputList~Default,Prompt,Option,...`: present a numbered option
/// list through the engine's prompt source and return the chosen
/// option. An empty answer picks the default.
pub(super) fn input_list(
    engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let parts: Vec<&str> = args.split(',').collect();
    if parts.len() < 3 {
        return Err(EvalError::Argument(format!(
            "InputList~{args}: expected Default,Prompt,Option,..."
        )));
    }
    let default: usize = parts[0].trim().parse().map_err(|_| {
        EvalError::Argument(format!("InputList~{args}: {} is not a number", parts[0]))
    })?;
    let options = &parts[2..];
    if default >= options.len() {
        return Err(EvalError::Argument(format!(
            "InputList~{args}: default {default} is out of range"
        )));
    }

    let mut prompt = String::new();
    prompt.push_str(parts[1]);
    prompt.push('\n');
    for (i, option) in options.iter().enumerate() {
        let mark = if i == default { '*' } else { ' ' };
        prompt.push_str(&format!("{mark}{i}) {option}\n"));
    }

    let answer = engine.prompt.read_line(&prompt)?;
    let choice = if answer.trim().is_empty() {
        default
    } else {
        answer.trim().parse().map_err(|_| {
            EvalError::Argument(format!("InputList~{args}: {answer} is not a number"))
        })?
    };
    options
        .get(choice)
        .map(|option| (*option).to_string())
        .ok_or_else(|| {
            EvalError::Argument(format!("InputList~{args}: choice {choice} is out of range"))
        })
}

/// `Version~`: the engine's version string.
pub(super) fn version(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    _args: &str,
) -> EvalResult<String> {
    Ok(env!("CARGO_PKG_VERSION").to_string())
}

#[cfg(test)]
mod tests {
    use crate::builtins::BuiltinRegistry;
    use crate::builtins::testing::call;
    use crate::eval::{CannedPrompt, Engine};
    use crate::group::{Group, GroupKind};
    use crate::registry::TableRegistry;
    use crate::table::Table;

    #[test]
    fn if_picks_branches() {
        assert_eq!(call("If", "1=1?yes/no").unwrap(), "yes");
        assert_eq!(call("If", "2>3?yes/no").unwrap(), "no");
        assert_eq!(call("If", "1=2?yes").unwrap(), "");
        assert!(call("If", "no question mark").is_err());
    }

    #[test]
    fn if_reads_variables() {
        let mut registry = TableRegistry::new();
        let mut table = Table::new("t");
        table.variables.declare("Gold", "12");
        let handle = registry.insert(table);
        let mut engine = Engine::with_seed(registry, 42);
        let out = engine
            .evaluate(&handle, "{If~%Gold%>10?rich/poor}")
            .unwrap();
        assert_eq!(out, "rich");
    }

    #[test]
    fn reset_recycles_use_once_groups() {
        let mut registry = TableRegistry::new();
        let mut table = Table::new("t");
        let mut group = Group::new("Gear", GroupKind::Relative);
        group.use_once = true;
        group.add_weighted(1, "rope");
        table.add_group(group);
        let handle = registry.insert(table);
        let mut engine = Engine::with_seed(registry, 42);

        assert_eq!(engine.evaluate(&handle, "[Gear]").unwrap(), "rope");
        assert_eq!(engine.evaluate(&handle, "[Gear]").unwrap(), "");
        assert_eq!(engine.evaluate(&handle, "{Reset~Gear}[Gear]").unwrap(), "rope");
    }

    #[test]
    fn reset_unknown_group_errors() {
        assert!(call("Reset", "Nothing").is_err());
    }

    #[test]
    fn input_list_uses_prompt_source() {
        let mut registry = TableRegistry::new();
        let handle = registry.insert(Table::new("t"));
        let mut engine =
            Engine::with_seed(registry, 42).with_prompt(CannedPrompt { line: "1".into() });
        let func = BuiltinRegistry::standard().get("InputList").cloned().unwrap();
        let out = func(&mut engine, &handle, 0, "0,Pick a side,dawn,dusk").unwrap();
        assert_eq!(out, "dusk");
    }

    #[test]
    fn input_list_empty_answer_takes_default() {
        // The canned prompt's default line is empty.
        assert_eq!(call("InputList", "1,Pick a side,dawn,dusk").unwrap(), "dusk");
        assert!(call("InputList", "9,Pick a side,dawn,dusk").is_err());
        assert!(call("InputList", "0,Pick").is_err());
    }

    #[test]
    fn version_is_nonempty() {
        let v = call("Version", "").unwrap();
        assert!(!v.is_empty());
        assert_eq!(v, env!("CARGO_PKG_VERSION"));
    }
}
