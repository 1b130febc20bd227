//! English-language builtins: articles, plurals, ordinals, titles.

use crate::error::{EvalError, EvalResult};
use crate::eval::Engine;
use crate::registry::TableHandle;

use super::capitalize_first;

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// `AorAn~Text`: prepend "a" or "an" by the leading-vowel heuristic,
/// replacing any article already present.
pub(super) fn aor_an(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let rest = args
        .strip_prefix("an ")
        .or_else(|| args.strip_prefix("a "))
        .unwrap_or(args);
    let Some(first) = rest.chars().next() else {
        return Ok(args.to_string());
    };
    if is_vowel(first) {
        Ok(format!("an {rest}"))
    } else {
        Ok(format!("a {rest}"))
    }
}

/// Default pluralization: append `s`; `ch`/`sh`/`o`/`s`/`x` endings take
/// `es`; `fe` and `f` endings become `ves`; `y` after a consonant
/// becomes `ies`.
fn pluralize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    for suffix in ["ch", "sh", "o", "s", "x"] {
        if s.ends_with(suffix) {
            return format!("{s}es");
        }
    }
    if let Some(stem) = s.strip_suffix("fe") {
        return format!("{stem}ves");
    }
    if let Some(stem) = s.strip_suffix('f') {
        return format!("{stem}ves");
    }
    if let Some(stem) = s.strip_suffix('y') {
        if let Some(prev) = stem.chars().last() {
            if !is_vowel(prev) {
                return format!("{stem}ies");
            }
        }
    }
    format!("{s}s")
}

/// `Plural~Text`: the plural form of Text.
pub(super) fn plural(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    Ok(pluralize(args))
}

/// `PluralIf~X,Text`: Text pluralized unless X equals 1.
pub(super) fn plural_if(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    if args.is_empty() {
        return Ok(String::new());
    }
    let Some((count, text)) = args.split_once(',') else {
        return Err(EvalError::Argument(format!(
            "PluralIf~{args} does not have a number"
        )));
    };
    let n: f64 = count.trim().parse().map_err(|_| {
        EvalError::Argument(format!(
            "PluralIf~{args} 1st argument is not a number ({count})"
        ))
    })?;
    if n == 1.0 {
        Ok(text.to_string())
    } else {
        Ok(pluralize(text))
    }
}

/// `Ordinal~N`: append the English ordinal suffix. The teens (11 to 13)
/// take `th`, checked by the tens digit rather than the last digit.
pub(super) fn ordinal(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let chars: Vec<char> = args.chars().collect();
    let Some(&last) = chars.last() else {
        return Ok(String::new());
    };
    if chars.len() >= 2 && chars[chars.len() - 2] == '1' {
        return Ok(format!("{args}th"));
    }
    let suffix = match last {
        '1' => "st",
        '2' => "nd",
        '3' => "rd",
        _ => "th",
    };
    Ok(format!("{args}{suffix}"))
}

/// `VowelStart~Text`: 1 when Text starts with a vowel, else 0. A
/// `%variable%` argument is dereferenced before testing.
pub(super) fn vowel_start(
    _engine: &mut Engine,
    table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    if args.is_empty() {
        return Ok("0".to_string());
    }
    let subject = if let Some(inner) = args.strip_prefix('%') {
        let name = inner.strip_suffix('%').unwrap_or(inner);
        match table.borrow().variables.get(name) {
            Some(value) => value.to_string(),
            None => return Err(EvalError::UnknownVariable(name.to_string())),
        }
    } else {
        args.to_string()
    };
    let starts_with_vowel = subject.chars().next().is_some_and(is_vowel);
    Ok(if starts_with_vowel { "1" } else { "0" }.to_string())
}

/// Words kept lowercase in long titles unless they start the phrase.
const STOP_WORDS: &[&str] = &[
    "a", "an", "about", "above", "across", "after", "against", "ago", "and", "at", "before",
    "behind", "below", "beside", "between", "by", "during", "else", "for", "from", "if", "in",
    "into", "near", "of", "on", "onto", "or", "over", "past", "since", "the", "till", "to",
    "under", "until", "with",
];

/// `Title~Text`: title-case Text. Phrases of four words or fewer
/// capitalize every word; longer phrases keep stop words lowercase
/// except at the start.
pub(super) fn title(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let lower = args.to_lowercase();
    let mut words: Vec<String> = lower.split(' ').map(capitalize_first).collect();
    if words.len() > 4 {
        for word in words.iter_mut().skip(1) {
            let plain = word.to_lowercase();
            if STOP_WORDS.contains(&plain.as_str()) {
                *word = plain;
            }
        }
    }
    Ok(words.join(" "))
}
