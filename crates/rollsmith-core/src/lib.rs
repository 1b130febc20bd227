//! Table document model, parser, and roll engine.
//!
//! A table file is a line-oriented text document declaring named groups
//! of weighted text alternatives, variables, and output decoration.
//! Parsing a file yields a [`Table`]; an [`Engine`] then expands a
//! starting group by weighted random selection, recursively resolving
//! `[Group]` references, `{Builtin~Args}` calls, and `%Variable%`
//! substitutions in the selected text.
//!
//! ```
//! use rollsmith_core::{Engine, TableRegistry, parse_table};
//!
//! let source = "
//! ;Start
//! 1,a gleaming [Metal] sword
//! 1,a rusty [Metal] dagger
//! ;Metal
//! 3,steel
//! 1,mithril
//! ";
//! let parsed = parse_table("weapons", source).unwrap();
//! let mut registry = TableRegistry::new();
//! registry.insert(parsed.table);
//! let mut engine = Engine::with_seed(registry, 42);
//! let result = engine.generate("weapons", "Start").unwrap();
//! assert!(result.contains("sword") || result.contains("dagger"));
//! ```

pub mod builtins;
pub mod error;
pub mod eval;
pub mod group;
mod num;
pub mod parse;
pub mod registry;
pub mod table;
pub mod vars;

pub use builtins::{BuiltinRegistry, roll_with_modifiers};
pub use error::{EvalError, EvalResult, SyntaxError};
pub use eval::{CannedPrompt, Engine, PromptSource, StdinPrompt};
pub use group::{Group, GroupKind, Item, MatchRange};
pub use parse::{ParseWarning, ParsedTable, parse_table};
pub use registry::{RegistryError, TableHandle, TableRegistry};
pub use table::Table;
pub use vars::{AssignOp, VarError, VariableStore};
