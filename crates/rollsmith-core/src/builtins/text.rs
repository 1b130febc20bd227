//! String-transformation builtins.

use crate::error::{EvalError, EvalResult};
use crate::eval::Engine;
use crate::registry::TableHandle;

use super::capitalize_first;

pub(super) fn lcase(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    Ok(args.to_lowercase())
}

pub(super) fn ucase(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    Ok(args.to_uppercase())
}

pub(super) fn cap(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    Ok(capitalize_first(args))
}

/// Uppercase the first letter of every word, leaving the rest of each
/// word untouched.
pub(super) fn cap_each_word(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let mut out = String::with_capacity(args.len());
    let mut at_word_start = true;
    for c in args.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !c.is_alphanumeric();
    }
    Ok(out)
}

pub(super) fn trim(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    Ok(args.trim().to_string())
}

/// `Left~N,Text`: the first N characters.
pub(super) fn left(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let (n, text) = count_and_text("Left", args)?;
    Ok(text.chars().take(n).collect())
}

/// `Right~N,Text`: the last N characters.
pub(super) fn right(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let (n, text) = count_and_text("Right", args)?;
    let len = text.chars().count();
    Ok(text.chars().skip(len.saturating_sub(n)).collect())
}

/// `Mid~Len,Start,Text`: Len characters starting at offset Start.
pub(super) fn mid(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let parts: Vec<&str> = args.splitn(3, ',').collect();
    let [len, start, text] = parts[..] else {
        return Err(EvalError::Argument(format!(
            "Mid~{args}: expected Len,Start,Text"
        )));
    };
    let len: usize = len
        .trim()
        .parse()
        .map_err(|_| EvalError::Argument(format!("Mid~{args}: length is not a number")))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|_| EvalError::Argument(format!("Mid~{args}: start is not a number")))?;
    if start > text.chars().count() {
        return Err(EvalError::Argument(format!(
            "Mid~{args}: start is past the end"
        )));
    }
    Ok(text.chars().skip(start).take(len).collect())
}

pub(super) fn length(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    Ok(args.chars().count().to_string())
}

/// `Replace~SearchFor,ReplaceWith,Text`: replace every occurrence.
pub(super) fn replace(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let parts: Vec<&str> = args.split(',').collect();
    let [search, replacement, text] = parts[..] else {
        return Err(EvalError::Argument(format!(
            "Replace~{args}: expected SearchFor,ReplaceWith,Text"
        )));
    };
    if search.is_empty() {
        return Err(EvalError::Argument(format!(
            "Replace~{args}: missing SearchFor word"
        )));
    }
    if text.is_empty() {
        return Ok(String::new());
    }
    Ok(text.replace(search, replacement))
}

/// `OrderAsc~"X",Text`: sort X-delimited tokens ascending.
pub(super) fn order_asc(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    ordered("OrderAsc", args, false)
}

/// `OrderDesc~"X",Text`: sort X-delimited tokens descending.
pub(super) fn order_desc(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    ordered("OrderDesc", args, true)
}

fn ordered(name: &str, args: &str, descending: bool) -> EvalResult<String> {
    if args.is_empty() {
        return Ok(String::new());
    }
    // The delimiter is a single quoted character: "X",Text
    let mut chars = args.chars();
    let (quote_open, delim, quote_close, comma) =
        (chars.next(), chars.next(), chars.next(), chars.next());
    let (Some('"'), Some(delim), Some('"'), Some(',')) = (quote_open, delim, quote_close, comma)
    else {
        return Err(EvalError::Argument(format!(
            "{name}~{args} is missing a delimiter"
        )));
    };
    let text = chars.as_str();
    let mut words: Vec<&str> = text.split(delim).collect();
    words.sort_unstable();
    if descending {
        words.reverse();
    }
    Ok(words.join(&delim.to_string()))
}

/// `Space~N` / `Spc~N`: N spaces.
pub(super) fn space(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let n: usize = args
        .trim()
        .parse()
        .map_err(|_| EvalError::Argument(format!("Space~{args} is not a number")))?;
    Ok(" ".repeat(n))
}

/// `Loop~N,Text`: Text repeated N times.
pub(super) fn loop_repeat(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let Some((count, text)) = args.split_once(',') else {
        return Err(EvalError::Argument(format!(
            "Loop~{args}: expected N,Text"
        )));
    };
    let n: usize = count
        .trim()
        .parse()
        .map_err(|_| EvalError::Argument(format!("Loop~{args}: {count} is not a number")))?;
    Ok(text.repeat(n))
}

pub(super) fn char_ret(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    _args: &str,
) -> EvalResult<String> {
    Ok("\n".to_string())
}

/// `Color~Color,Text`: wrap Text in a color markup span.
pub(super) fn color(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    let Some((color, text)) = args.split_once(',') else {
        return Err(EvalError::Argument(format!(
            "Color~Color,Text: no color supplied in {args}"
        )));
    };
    Ok(format!("<font color=\"{color}\">{text}</font>"))
}

/// `Status~Text`: pass-through for status-bar messages.
pub(super) fn status(
    _engine: &mut Engine,
    _table: &TableHandle,
    _depth: usize,
    args: &str,
) -> EvalResult<String> {
    Ok(args.to_string())
}

fn count_and_text<'a>(name: &str, args: &'a str) -> EvalResult<(usize, &'a str)> {
    let parts: Vec<&str> = args.split(',').collect();
    let [count, text] = parts[..] else {
        return Err(EvalError::Argument(format!("No offset in {name}~{args}")));
    };
    let n: usize = count
        .trim()
        .parse()
        .map_err(|_| EvalError::Argument(format!("{name}~{args}: {count} is not a number")))?;
    Ok((n, text))
}

#[cfg(test)]
mod tests {
    use crate::builtins::testing::call;

    #[test]
    fn case_changes() {
        assert_eq!(call("LCase", "Mighty Giant").unwrap(), "mighty giant");
        assert_eq!(call("UCase", "orc").unwrap(), "ORC");
        assert_eq!(call("Cap", "orc warband").unwrap(), "Orc warband");
    }

    #[test]
    fn cap_each_word() {
        assert_eq!(
            call("CapEachWord", "sword of ancient might").unwrap(),
            "Sword Of Ancient Might"
        );
        assert_eq!(call("capeachword", "ORC").unwrap(), "ORC");
        assert_eq!(call("CapEachWord", "laser Pistol").unwrap(), "Laser Pistol");
    }

    #[test]
    fn trim_strips_whitespace() {
        assert_eq!(call("Trim", " \t \n").unwrap(), "");
        assert_eq!(call("Trim", "\tgiant Goblin  ").unwrap(), "giant Goblin");
    }

    #[test]
    fn left_takes_leading_characters() {
        assert_eq!(call("LEFT", "6,Mighty Giant").unwrap(), "Mighty");
        assert_eq!(call("Left", "42,1200.4").unwrap(), "1200.4");
        assert_eq!(call("Left", "0,space faring shuttle").unwrap(), "");
        assert!(call("Left", "no comma").is_err());
    }

    #[test]
    fn right_takes_trailing_characters() {
        assert_eq!(call("right", "5,Mighty Giant").unwrap(), "Giant");
        assert_eq!(call("Right", "42,1200.4").unwrap(), "1200.4");
        assert_eq!(call("Right", "0,space faring shuttle").unwrap(), "");
        assert_eq!(call("Right", "4,").unwrap(), "");
    }

    #[test]
    fn mid_slices_from_offset() {
        assert_eq!(
            call("Mid", "5,2,A Cargo hold filled with gems").unwrap(),
            "Cargo"
        );
        assert_eq!(call("Mid", "3,0,gem").unwrap(), "gem");
        assert!(call("Mid", "4,6").is_err());
        assert!(call("Mid", "2,99,gem").is_err());
    }

    #[test]
    fn length_counts_characters() {
        assert_eq!(call("length", "A Cargo hold filled with gems").unwrap(), "29");
        assert_eq!(call("Length", "").unwrap(), "0");
        assert_eq!(call("Length", "gem").unwrap(), "3");
    }

    #[test]
    fn replace_rewrites_text() {
        assert_eq!(
            call("Replace", "@@,Sword,the Giant is armed with a @@").unwrap(),
            "the Giant is armed with a Sword"
        );
        assert_eq!(call("Replace", "@,HI,--@@--").unwrap(), "--HIHI--");
        assert_eq!(call("Replace", "giant,,giant goblins").unwrap(), " goblins");
        assert!(call("Replace", "").is_err());
        assert!(call("Replace", ",Bye,Forty Four Skidoo").is_err());
    }

    #[test]
    fn ordering_tokens() {
        assert_eq!(
            call("OrderAsc", "\"|\",sword|dagger|gem|rope|apple").unwrap(),
            "apple|dagger|gem|rope|sword"
        );
        assert_eq!(
            call("OrderDesc", "\"|\",sword|dagger|gem|rope|apple").unwrap(),
            "sword|rope|gem|dagger|apple"
        );
        assert_eq!(call("OrderAsc", "").unwrap(), "");
        assert!(call("OrderAsc", ",this is missing a delimiter").is_err());
    }

    #[test]
    fn space_pads() {
        assert_eq!(call("Space", "5").unwrap(), "     ");
        assert_eq!(call("Spc", "0").unwrap(), "");
        assert!(call("Space", "lots").is_err());
    }

    #[test]
    fn loop_repeats() {
        assert_eq!(call("Loop", "3,ha").unwrap(), "hahaha");
        assert_eq!(call("Loop", "0,ha").unwrap(), "");
        assert_eq!(call("Loop", "2,a,b").unwrap(), "a,ba,b");
        assert!(call("Loop", "many,ha").is_err());
    }

    #[test]
    fn newline_builtins() {
        assert_eq!(call("CharRet", "").unwrap(), "\n");
        assert_eq!(call("CR", "ignored").unwrap(), "\n");
    }

    #[test]
    fn color_wraps_in_markup() {
        assert_eq!(
            call("Color", "red,a glowing rune").unwrap(),
            "<font color=\"red\">a glowing rune</font>"
        );
        assert!(call("Color", "no comma here").is_err());
    }

    #[test]
    fn status_passes_through() {
        assert_eq!(call("Status", "").unwrap(), "");
        assert_eq!(
            call("Status", "rolling encounters").unwrap(),
            "rolling encounters"
        );
    }
}
