//! Builtin function registry and dispatch.
//!
//! Table text invokes builtins as `{Name~Args}`. Names are
//! case-insensitive; each function owns its argument-splitting
//! conventions, with comma-delimited positional arguments as the
//! dominant one. The registry is a flat name-to-closure table populated
//! at startup, so embedders can register additional functions without
//! touching the engine.

mod flow;
mod math;
mod text;
mod words;

pub use math::roll_with_modifiers;

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::EvalResult;
use crate::eval::Engine;
use crate::registry::TableHandle;

/// The signature shared by all builtins: the engine (RNG, prompt
/// source, and recursive evaluation), the table under evaluation, the
/// current recursion depth, and the raw argument string.
pub type BuiltinFn = Rc<dyn Fn(&mut Engine, &TableHandle, usize, &str) -> EvalResult<String>>;

/// Case-insensitive name-to-function dispatch table.
#[derive(Clone, Default)]
pub struct BuiltinRegistry {
    funcs: HashMap<String, BuiltinFn>,
}

impl BuiltinRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard function set.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("Abs", math::abs);
        registry.register("AorAn", words::aor_an);
        registry.register("Calc", math::calc);
        registry.register("Cap", text::cap);
        registry.register("CapEachWord", text::cap_each_word);
        registry.register("Ceil", math::ceil);
        registry.register("CharRet", text::char_ret);
        registry.register("CR", text::char_ret);
        registry.register("Color", text::color);
        registry.register("Dice", math::dice);
        registry.register("Floor", math::floor);
        registry.register("If", flow::if_then);
        registry.register("InputList", flow::input_list);
        registry.register("IsNumber", math::is_number);
        registry.register("LCase", text::lcase);
        registry.register("Left", text::left);
        registry.register("Length", text::length);
        registry.register("Loop", text::loop_repeat);
        registry.register("Mid", text::mid);
        registry.register("OrderAsc", text::order_asc);
        registry.register("OrderDesc", text::order_desc);
        registry.register("Ordinal", words::ordinal);
        registry.register("Plural", words::plural);
        registry.register("PluralIf", words::plural_if);
        registry.register("Replace", text::replace);
        registry.register("Reset", flow::reset);
        registry.register("Right", text::right);
        registry.register("Round", math::round);
        registry.register("Space", text::space);
        registry.register("Spc", text::space);
        registry.register("Sqrt", math::sqrt);
        registry.register("Status", text::status);
        registry.register("Title", words::title);
        registry.register("Trim", text::trim);
        registry.register("Trunc", math::trunc);
        registry.register("UCase", text::ucase);
        registry.register("Version", flow::version);
        registry.register("VowelStart", words::vowel_start);
        registry
    }

    /// Register `func` under `name`, replacing any previous holder.
    pub fn register(
        &mut self,
        name: &str,
        func: impl Fn(&mut Engine, &TableHandle, usize, &str) -> EvalResult<String> + 'static,
    ) {
        self.funcs.insert(name.to_lowercase(), Rc::new(func));
    }

    /// Look up a function by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&BuiltinFn> {
        self.funcs.get(&name.to_lowercase())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    /// Returns true if no functions are registered.
    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

/// Uppercase the first character, leaving the rest untouched.
pub(crate) fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = BuiltinRegistry::standard();
        assert!(registry.get("ucase").is_some());
        assert!(registry.get("UCASE").is_some());
        assert!(registry.get("uCaSe").is_some());
        assert!(registry.get("frobnicate").is_none());
    }

    #[test]
    fn standard_set_is_complete() {
        let registry = BuiltinRegistry::standard();
        for name in [
            "abs", "aoran", "calc", "cap", "capeachword", "ceil", "charret", "cr", "color",
            "dice", "floor", "if", "inputlist", "isnumber", "lcase", "left", "length", "loop",
            "mid", "orderasc", "orderdesc", "ordinal", "plural", "pluralif", "replace", "reset",
            "right", "round", "space", "spc", "sqrt", "status", "title", "trim", "trunc",
            "ucase", "version", "vowelstart",
        ] {
            assert!(registry.get(name).is_some(), "missing builtin {name}");
        }
    }

    #[test]
    fn custom_functions_can_be_registered() {
        let mut registry = BuiltinRegistry::standard();
        let before = registry.len();
        registry.register("Shout", |_, _, _, args| Ok(format!("{args}!!")));
        assert_eq!(registry.len(), before + 1);
        assert!(registry.get("shout").is_some());
    }

    #[test]
    fn capitalize_first_handles_unicode() {
        assert_eq!(capitalize_first("orc"), "Orc");
        assert_eq!(capitalize_first("émeraude"), "Émeraude");
        assert_eq!(capitalize_first(""), "");
    }
}
