//! Recursive expansion of table text.
//!
//! The engine scans text left to right, character by character,
//! recognizing three nestable delimiter pairs: `[Group]` references,
//! `{Builtin~Args}` calls, and `%Variable%` substitutions. The content
//! of each pair is itself evaluated before use, so arguments and
//! references may nest arbitrarily. Everything else copies verbatim.
//!
//! Expansion is best-effort: missing groups degrade to the unresolved
//! reference name, and builtin or variable failures degrade to inline
//! `-ERROR ...-` markers. Only the recursion ceiling aborts an
//! evaluation, which keeps self-referential tables from exhausting the
//! stack.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::builtins::BuiltinRegistry;
use crate::error::{EvalError, EvalResult};
use crate::registry::{RegistryError, TableHandle, TableRegistry};
use crate::vars::AssignOp;

/// Default recursion ceiling for nested references.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Supplies lines for interactive builtins such as `InputList`.
pub trait PromptSource {
    /// Present `prompt` and read one line of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
}

/// Prompt source backed by stdin and stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

impl PromptSource for StdinPrompt {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Deterministic prompt source for non-interactive callers; answers
/// every prompt with the same fixed line.
#[derive(Debug, Clone, Default)]
pub struct CannedPrompt {
    /// The line returned for every prompt.
    pub line: String,
}

impl PromptSource for CannedPrompt {
    fn read_line(&mut self, _prompt: &str) -> io::Result<String> {
        Ok(self.line.clone())
    }
}

/// The roll engine: owns the table registry, builtin registry, RNG, and
/// prompt source, and drives all recursive expansion.
pub struct Engine {
    pub(crate) tables: TableRegistry,
    pub(crate) builtins: BuiltinRegistry,
    pub(crate) rng: StdRng,
    pub(crate) prompt: Box<dyn PromptSource>,
    max_depth: usize,
}

impl Engine {
    /// Create an engine over `tables` with an OS-seeded RNG.
    pub fn new(tables: TableRegistry) -> Self {
        Self::with_rng(tables, StdRng::from_os_rng())
    }

    /// Create an engine with a seeded RNG for reproducible output.
    pub fn with_seed(tables: TableRegistry, seed: u64) -> Self {
        Self::with_rng(tables, StdRng::seed_from_u64(seed))
    }

    fn with_rng(tables: TableRegistry, rng: StdRng) -> Self {
        Self {
            tables,
            builtins: BuiltinRegistry::standard(),
            rng,
            prompt: Box::new(CannedPrompt::default()),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replace the prompt source used by interactive builtins.
    pub fn with_prompt(mut self, prompt: impl PromptSource + 'static) -> Self {
        self.prompt = Box::new(prompt);
        self
    }

    /// Replace the recursion ceiling.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The table registry.
    pub fn tables(&self) -> &TableRegistry {
        &self.tables
    }

    /// The table registry, for registering more tables.
    pub fn tables_mut(&mut self) -> &mut TableRegistry {
        &mut self.tables
    }

    /// The builtin registry, for registering custom functions.
    pub fn builtins_mut(&mut self) -> &mut BuiltinRegistry {
        &mut self.builtins
    }

    /// Generate output from `table_name` starting at `group`: the
    /// evaluated header, the expanded group roll, and the evaluated
    /// footer, concatenated.
    pub fn generate(&mut self, table_name: &str, group: &str) -> EvalResult<String> {
        let handle = self.tables.resolve(table_name)?;
        let (header, footer) = {
            let t = handle.borrow();
            (t.header.clone(), t.footer.clone())
        };
        let mut out = String::new();
        if let Some(header) = header {
            out.push_str(&self.eval_at(&handle, &header, 0)?);
        }
        out.push_str(&self.roll_reference(&handle, group, 0)?);
        if let Some(footer) = footer {
            out.push_str(&self.eval_at(&handle, &footer, 0)?);
        }
        Ok(out)
    }

    /// Expand `text` in the context of `table`.
    pub fn evaluate(&mut self, table: &TableHandle, text: &str) -> EvalResult<String> {
        self.eval_at(table, text, 0)
    }

    pub(crate) fn eval_at(
        &mut self,
        table: &TableHandle,
        text: &str,
        depth: usize,
    ) -> EvalResult<String> {
        if depth > self.max_depth {
            return Err(EvalError::CycleDetected(self.max_depth));
        }
        let mut out = String::new();
        let mut rest = text;
        loop {
            let Some(pos) = rest.find(['[', '{', '%', '|']) else {
                out.push_str(rest);
                break;
            };
            out.push_str(&rest[..pos]);
            let delim = rest.as_bytes()[pos] as char;
            rest = &rest[pos + 1..];
            match delim {
                '[' => {
                    let (inner, consumed) = split_balanced(rest, '[', ']');
                    rest = &rest[consumed..];
                    let reference = self.eval_at(table, inner, depth + 1)?;
                    let expansion = self.roll_reference(table, &reference, depth + 1)?;
                    out.push_str(&expansion);
                }
                '{' => {
                    let (inner, consumed) = split_balanced(rest, '{', '}');
                    rest = &rest[consumed..];
                    let call = self.eval_at(table, inner, depth + 1)?;
                    let (name, args) = call.split_once('~').unwrap_or((call.as_str(), ""));
                    match self.call_builtin(table, depth, name, args) {
                        Ok(result) => out.push_str(&result),
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => out.push_str(&error_marker(format!("{name}~{args}: {e}"))),
                    }
                }
                '%' => match rest.find('%') {
                    // A lone percent sign is literal text.
                    None => out.push('%'),
                    Some(end) => {
                        let name = &rest[..end];
                        rest = &rest[end + 1..];
                        let value = table.borrow().variables.get(name).map(str::to_string);
                        match value {
                            Some(value) => out.push_str(&self.eval_at(table, &value, depth + 1)?),
                            None => out.push_str(&error_marker(format!(
                                "variable %{name}% does not exist"
                            ))),
                        }
                    }
                },
                '|' => match rest.find('|') {
                    None => out.push('|'),
                    Some(end) => match split_assignment(&rest[..end]) {
                        Some((name, op, value_part)) => {
                            rest = &rest[end + 1..];
                            let operand = self.eval_at(table, value_part, depth + 1)?;
                            let assigned =
                                table.borrow_mut().variables.assign(name, op, &operand);
                            if let Err(e) = assigned {
                                out.push_str(&error_marker(e));
                            }
                        }
                        // Not an assignment; the pipe is literal text.
                        None => out.push('|'),
                    },
                },
                other => out.push(other),
            }
        }
        Ok(out)
    }

    /// Resolve and roll a `[...]` reference: an optional `=N` suffix
    /// selects deterministically, a dotted prefix resolves a foreign
    /// table, and the selected text is expanded before returning.
    pub(crate) fn roll_reference(
        &mut self,
        table: &TableHandle,
        reference: &str,
        depth: usize,
    ) -> EvalResult<String> {
        if depth > self.max_depth {
            return Err(EvalError::CycleDetected(self.max_depth));
        }
        let (name_part, pick) = match reference.split_once('=') {
            Some((name, index)) => match index.trim().parse::<u32>() {
                Ok(n) => (name, Some(n)),
                Err(_) => {
                    return Ok(error_marker(format!(
                        "{reference} does not select an integer"
                    )));
                }
            },
            None => (reference, None),
        };

        // A local group wins; otherwise a dotted name reaches into a
        // foreign table through the registry.
        let local = table.borrow().groups.contains_key(name_part);
        let (target, group_name) = if local {
            (Rc::clone(table), name_part)
        } else if let Some((table_name, group_name)) = name_part.split_once('.') {
            match self.tables.resolve(table_name) {
                Ok(handle) => (handle, group_name),
                Err(RegistryError::UnknownTable(_)) => return Ok(name_part.to_string()),
                Err(e) => return Ok(error_marker(e)),
            }
        } else {
            return Ok(name_part.to_string());
        };

        let rolled = {
            let mut t = target.borrow_mut();
            match t.group_mut(group_name) {
                None => return Ok(name_part.to_string()),
                Some(group) => match pick {
                    Some(n) => group.select(n),
                    None => group.roll(&mut self.rng),
                },
            }
        };
        self.eval_at(&target, &rolled, depth + 1)
    }

    fn call_builtin(
        &mut self,
        table: &TableHandle,
        depth: usize,
        name: &str,
        args: &str,
    ) -> EvalResult<String> {
        let Some(func) = self.builtins.get(name).cloned() else {
            return Err(EvalError::UnknownFunction(name.to_string()));
        };
        func(self, table, depth, args)
    }
}

/// Render a recovered failure as inline output text.
fn error_marker(message: impl Display) -> String {
    format!("-ERROR {message}-")
}

/// Return the text inside a balanced delimiter pair and the number of
/// bytes consumed, counting the closing delimiter. The scan starts just
/// after the opening delimiter; an unbalanced span runs to the end.
fn split_balanced(s: &str, open: char, close: char) -> (&str, usize) {
    let mut level = 1u32;
    for (i, c) in s.char_indices() {
        if c == open {
            level += 1;
        } else if c == close {
            level -= 1;
            if level == 0 {
                return (&s[..i], i + close.len_utf8());
            }
        }
    }
    (s, s.len())
}

/// Recognize `Name<op>Value` where `Name` is a plain identifier.
/// Anything else is literal text containing pipes.
fn split_assignment(body: &str) -> Option<(&str, AssignOp, &str)> {
    let idx = body.find(AssignOp::SYMBOLS)?;
    let name = &body[..idx];
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    let op = body[idx..].chars().next().and_then(AssignOp::from_char)?;
    Some((name, op, &body[idx + 1..]))
}
