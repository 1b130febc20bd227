//! Line-scanning parser that builds a [`Table`] from source text.
//!
//! The parser is a three-state machine driven by the first significant
//! character of each comment-stripped, trimmed line: outside any group,
//! inside an absolute-probability group (`:`), or inside a
//! relative-probability group (`;`). A group stays open until the next
//! group declaration or end of input; blank lines do not close it.

use serde::{Deserialize, Serialize};

use crate::error::SyntaxError;
use crate::group::{Group, GroupKind, MatchRange};
use crate::table::Table;
use crate::vars::AssignOp;

/// Marker inserted where a `_` continuation line joins the previous
/// item's text.
pub const LINE_BREAK: &str = "<br>";

/// A non-fatal observation made while parsing, reported with its
/// 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// 1-based line number in the table source.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

/// The outcome of a successful parse.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    /// The parsed document.
    pub table: Table,
    /// Ignored lines, unknown directives, and similar diagnostics.
    pub warnings: Vec<ParseWarning>,
}

/// Parse table source text into a [`Table`] named `name`.
///
/// Table names are held lowercase so that references resolve
/// case-insensitively. The first error aborts the parse; the whole
/// table is rejected, not just the offending line.
pub fn parse_table(name: &str, source: &str) -> Result<ParsedTable, SyntaxError> {
    let mut table = Table::new(name.to_lowercase());
    let mut warnings = Vec::new();
    let mut current: Option<Group> = None;

    for (idx, raw) in source.lines().enumerate() {
        let lineno = idx + 1;
        let stripped = strip_comment(raw);
        let line = stripped
            .trim_start_matches([' ', '\t'])
            .trim_end_matches(['\t', '\r']);
        if line.is_empty() {
            continue;
        }
        let Some(first) = line.chars().next() else {
            continue;
        };

        // Directives and group declarations apply in any state.
        match first {
            '/' => {
                directive(line, &mut table, &mut warnings, lineno);
                continue;
            }
            ':' => {
                if let Some(done) = current.take() {
                    table.add_group(done);
                }
                current = Some(declare_group(&line[1..], GroupKind::Absolute, lineno)?);
                continue;
            }
            ';' => {
                if let Some(done) = current.take() {
                    table.add_group(done);
                }
                current = Some(declare_group(&line[1..], GroupKind::Relative, lineno)?);
                continue;
            }
            _ => {}
        }

        if let Some(group) = current.as_mut() {
            match first {
                '<' => group.prefix = line[1..].to_string(),
                '>' => group.suffix = line[1..].to_string(),
                '_' => {
                    if !group.append_last(&format!("{LINE_BREAK}{}", &line[1..])) {
                        return Err(SyntaxError::new(
                            lineno,
                            format!("cannot continue, no items in group {}", group.name),
                        ));
                    }
                }
                _ => match group.kind {
                    GroupKind::Absolute => {
                        let (range, text) = parse_absolute_item(line, lineno)?;
                        group.add_item(range, text);
                    }
                    GroupKind::Relative => {
                        let (weight, text) = parse_relative_item(line, lineno)?;
                        group.add_weighted(weight, text);
                    }
                },
            }
            continue;
        }

        match first {
            '%' => declare_variable(line, &mut table, &mut warnings, lineno),
            '|' => assign_variable(line, &mut table, lineno)?,
            _ => warnings.push(ParseWarning {
                line: lineno,
                message: format!("line outside any group, ignoring: {line}"),
            }),
        }
    }

    if let Some(done) = current.take() {
        table.add_group(done);
    }

    Ok(ParsedTable { table, warnings })
}

/// Cut everything after the first unescaped `#`, then unescape `\#`.
fn strip_comment(line: &str) -> String {
    let mut cut = line.len();
    let mut prev_backslash = false;
    for (i, c) in line.char_indices() {
        if c == '#' && !prev_backslash {
            cut = i;
            break;
        }
        prev_backslash = c == '\\';
    }
    line[..cut].replace("\\#", "#")
}

fn directive(line: &str, table: &mut Table, warnings: &mut Vec<ParseWarning>, lineno: usize) {
    let body = &line[1..];
    let (word, rest) = body.split_once(' ').unwrap_or((body, ""));
    match word {
        "OutputHeader" => table.header = Some(rest.to_string()),
        "OutputFooter" => table.footer = Some(rest.to_string()),
        _ => warnings.push(ParseWarning {
            line: lineno,
            message: format!("unknown directive, ignoring: {line}"),
        }),
    }
}

/// Parse a group declaration after its `:`/`;` lead character,
/// consuming `!` (use-once) and `~` (reroll) modifier flags.
fn declare_group(decl: &str, kind: GroupKind, lineno: usize) -> Result<Group, SyntaxError> {
    let mut rest = decl;
    let mut use_once = false;
    let mut reroll = false;
    loop {
        if let Some(r) = rest.strip_prefix('!') {
            use_once = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('~') {
            reroll = true;
            rest = r;
        } else {
            break;
        }
    }
    let name = rest.trim();
    if name.is_empty() {
        return Err(SyntaxError::new(lineno, "group declaration has no name"));
    }
    let mut group = Group::new(name, kind);
    group.use_once = use_once;
    group.reroll = reroll;
    Ok(group)
}

/// Split an item line at its first comma, falling back to a tab.
fn split_item(line: &str) -> Option<(&str, &str)> {
    line.split_once(',').or_else(|| line.split_once('\t'))
}

/// Parse `start[-end]<delim>text` for an absolute group.
fn parse_absolute_item<'a>(
    line: &'a str,
    lineno: usize,
) -> Result<(MatchRange, &'a str), SyntaxError> {
    let Some((range_part, text)) = split_item(line) else {
        return Err(SyntaxError::new(
            lineno,
            format!("no delimiter between range and text: {line}"),
        ));
    };
    let range = match range_part.split_once('-') {
        None => {
            let n: u32 = range_part.trim().parse().map_err(|_| {
                SyntaxError::new(lineno, format!("probability is not a number: {line}"))
            })?;
            MatchRange { start: n, end: n }
        }
        Some((min, max)) => {
            let start: u32 = min.trim().parse().map_err(|_| {
                SyntaxError::new(
                    lineno,
                    format!("min probability of range is not a number: {line}"),
                )
            })?;
            let end: u32 = max.trim().parse().map_err(|_| {
                SyntaxError::new(
                    lineno,
                    format!("max probability of range is not a number: {line}"),
                )
            })?;
            if end < start {
                return Err(SyntaxError::new(
                    lineno,
                    format!("max of probability range is less than min: {line}"),
                ));
            }
            MatchRange { start, end }
        }
    };
    Ok((range, text))
}

/// Parse `weight<delim>text` for a relative group.
fn parse_relative_item<'a>(line: &'a str, lineno: usize) -> Result<(u32, &'a str), SyntaxError> {
    let Some((weight_part, text)) = split_item(line) else {
        return Err(SyntaxError::new(
            lineno,
            format!("no delimiter between weight and text: {line}"),
        ));
    };
    let weight: u32 = weight_part
        .trim()
        .parse()
        .map_err(|_| SyntaxError::new(lineno, format!("weight is not a number: {line}")))?;
    Ok((weight, text))
}

/// Handle a `%Name%,Default` declaration line.
fn declare_variable(
    line: &str,
    table: &mut Table,
    warnings: &mut Vec<ParseWarning>,
    lineno: usize,
) {
    let body = &line[1..];
    match body.split_once('%') {
        Some((name, after)) => {
            let value = after.strip_prefix(',').unwrap_or("");
            table.variables.declare(name, value);
        }
        None => warnings.push(ParseWarning {
            line: lineno,
            message: format!("malformed variable declaration, ignoring: {line}"),
        }),
    }
}

/// Handle a `|Name<op>Value|` assignment line.
fn assign_variable(line: &str, table: &mut Table, lineno: usize) -> Result<(), SyntaxError> {
    let Some(body) = line[1..].strip_suffix('|') else {
        return Err(SyntaxError::new(
            lineno,
            format!("variable assignment needs a closing delimiter: {line}"),
        ));
    };
    let Some(idx) = body.find(AssignOp::SYMBOLS) else {
        return Err(SyntaxError::new(
            lineno,
            format!("no operator in assignment: {line}"),
        ));
    };
    let name = &body[..idx];
    let op = body[idx..]
        .chars()
        .next()
        .and_then(AssignOp::from_char)
        .ok_or_else(|| SyntaxError::new(lineno, format!("no operator in assignment: {line}")))?;
    let operand = &body[idx + 1..];
    table
        .variables
        .assign(name, op, operand)
        .map_err(|e| SyntaxError::new(lineno, e.to_string()))
}
