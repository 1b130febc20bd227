//! The `new` command: generate results from tables.

use std::path::Path;

use rollsmith_core::{Engine, StdinPrompt, TableRegistry};

/// One `Table[.Group][:repeat]` call from the command line.
#[derive(Debug, PartialEq, Eq)]
struct TableCall {
    table: String,
    group: String,
    repeat: u32,
}

/// Parse a table call. The group defaults to `Start`; a trailing `:N`
/// repeats the generation. Surrounding brackets are tolerated so calls
/// can be pasted straight out of table text.
fn parse_call(arg: &str) -> Result<TableCall, String> {
    let s = arg.trim();
    let s = s.strip_prefix('[').unwrap_or(s);
    let s = s.strip_suffix(']').unwrap_or(s);
    let (body, repeat) = match s.rsplit_once(':') {
        Some((body, count)) => (
            body,
            count
                .parse::<u32>()
                .map_err(|_| format!("non-numeric repeat count in {arg}"))?,
        ),
        None => (s, 1),
    };
    let (table, group) = match body.split_once('.') {
        Some((table, group)) => (table, group),
        None => (body, "Start"),
    };
    if table.is_empty() {
        return Err(format!("missing table name in {arg}"));
    }
    Ok(TableCall {
        table: table.to_string(),
        group: group.to_string(),
        repeat,
    })
}

/// Run the command against every call in order.
pub fn run(calls: &[String], root: Option<&Path>, seed: Option<u64>) -> Result<(), String> {
    let root = super::table_root(root);
    let registry = TableRegistry::discover(&root)
        .map_err(|e| format!("cannot scan {}: {e}", root.display()))?;
    if registry.is_empty() {
        return Err(format!("no .tab files found in {}", root.display()));
    }

    let mut engine = match seed {
        Some(seed) => Engine::with_seed(registry, seed),
        None => Engine::new(registry),
    }
    .with_prompt(StdinPrompt);

    for call in calls {
        let call = parse_call(call)?;
        for _ in 0..call.repeat {
            let out = engine
                .generate(&call.table, &call.group)
                .map_err(|e| e.to_string())?;
            println!("{out}");
        }
    }
    Ok(())
}
