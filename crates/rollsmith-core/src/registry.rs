//! Table lookup with lazy parse-on-first-reference.
//!
//! A registry maps lowercase table names to sources, parsing each table
//! the first time it is referenced and caching the result. Tables are
//! handed out behind `Rc<RefCell<..>>` because rolling mutates variable
//! and use-once state, and a table may reference itself through a
//! foreign call while it is being evaluated.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use crate::error::SyntaxError;
use crate::parse::parse_table;
use crate::table::Table;

/// File extension recognized as a table source.
pub const TABLE_EXTENSION: &str = "tab";

/// Shared, interiorly-mutable handle to a parsed table.
pub type TableHandle = Rc<RefCell<Table>>;

/// Errors produced while resolving a table through the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No table with the requested name is registered.
    #[error("no table named {0}")]
    UnknownTable(String),

    /// The table source file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The table source failed to parse.
    #[error("table {name}: {source}")]
    Parse {
        /// The table that failed.
        name: String,
        /// The parse error, with line number.
        source: SyntaxError,
    },
}

#[derive(Debug, Default)]
struct Entry {
    path: Option<PathBuf>,
    source: Option<String>,
    table: Option<TableHandle>,
}

/// Name-to-table registry owned by the caller, so tests and embedders
/// get isolated instances instead of process-global state.
#[derive(Debug, Default)]
pub struct TableRegistry {
    entries: HashMap<String, Entry>,
}

impl TableRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `root` recursively and register every `.tab` file found,
    /// keyed by its lowercase file stem.
    pub fn discover(root: &Path) -> io::Result<Self> {
        let mut paths = Vec::new();
        collect_tables(root, &mut paths)?;
        let mut registry = Self::new();
        for path in paths {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                registry.register_path(stem, path.clone());
            }
        }
        Ok(registry)
    }

    /// Register a table backed by a file, read and parsed on first use.
    pub fn register_path(&mut self, name: &str, path: PathBuf) {
        self.entries.insert(
            name.to_lowercase(),
            Entry {
                path: Some(path),
                ..Entry::default()
            },
        );
    }

    /// Register a table backed by in-memory source text.
    pub fn register_source(&mut self, name: &str, source: impl Into<String>) {
        self.entries.insert(
            name.to_lowercase(),
            Entry {
                source: Some(source.into()),
                ..Entry::default()
            },
        );
    }

    /// Register an already-parsed table and return its handle.
    pub fn insert(&mut self, table: Table) -> TableHandle {
        let name = table.name.to_lowercase();
        let handle: TableHandle = Rc::new(RefCell::new(table));
        self.entries.insert(
            name,
            Entry {
                table: Some(Rc::clone(&handle)),
                ..Entry::default()
            },
        );
        handle
    }

    /// Whether a table with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_lowercase())
    }

    /// Registered table names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered tables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `name` to a parsed table, parsing and caching on first
    /// reference. Lookup is case-insensitive.
    pub fn resolve(&mut self, name: &str) -> Result<TableHandle, RegistryError> {
        let key = name.to_lowercase();
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| RegistryError::UnknownTable(name.to_string()))?;

        if let Some(handle) = &entry.table {
            return Ok(Rc::clone(handle));
        }

        let source = match (&entry.source, &entry.path) {
            (Some(source), _) => source.clone(),
            (None, Some(path)) => {
                std::fs::read_to_string(path).map_err(|e| RegistryError::Io {
                    path: path.clone(),
                    source: e,
                })?
            }
            (None, None) => return Err(RegistryError::UnknownTable(name.to_string())),
        };

        let parsed = parse_table(&key, &source).map_err(|e| RegistryError::Parse {
            name: key.clone(),
            source: e,
        })?;
        let handle: TableHandle = Rc::new(RefCell::new(parsed.table));
        entry.table = Some(Rc::clone(&handle));
        Ok(handle)
    }
}

/// Walk `root` and list tables by category, where the category is the
/// parent directory's base name. Used for directory listings.
pub fn discover_by_category(root: &Path) -> io::Result<BTreeMap<String, Vec<String>>> {
    let mut paths = Vec::new();
    collect_tables(root, &mut paths)?;
    let mut categories: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let category = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();
        categories.entry(category).or_default().push(stem.to_string());
    }
    for tables in categories.values_mut() {
        tables.sort_unstable();
    }
    Ok(categories)
}

fn collect_tables(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_tables(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == TABLE_EXTENSION) {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn resolve_parses_lazily_and_caches() {
        let mut registry = TableRegistry::new();
        registry.register_source("colors", ";Start\n1,red\n");

        let first = registry.resolve("colors").unwrap();
        let second = registry.resolve("Colors").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.borrow().groups.len(), 1);
    }

    #[test]
    fn resolve_unknown_table() {
        let mut registry = TableRegistry::new();
        assert!(matches!(
            registry.resolve("nope"),
            Err(RegistryError::UnknownTable(_))
        ));
    }

    #[test]
    fn resolve_reports_parse_errors() {
        let mut registry = TableRegistry::new();
        registry.register_source("bad", ":Start\nbroken line\n");
        match registry.resolve("bad") {
            Err(RegistryError::Parse { name, source }) => {
                assert_eq!(name, "bad");
                assert_eq!(source.line, 2);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn discover_walks_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Names")).unwrap();
        fs::write(dir.path().join("Names/Greek.tab"), ";Start\n1,Zeno\n").unwrap();
        fs::write(dir.path().join("Dungeon.tab"), ";Start\n1,a cave\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a table").unwrap();

        let registry = TableRegistry::discover(dir.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("greek"));
        assert!(registry.contains("Dungeon"));
        assert!(!registry.contains("notes"));
    }

    #[test]
    fn categories_group_by_parent_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Names")).unwrap();
        fs::write(dir.path().join("Names/Greek.tab"), ";Start\n1,Zeno\n").unwrap();
        fs::write(dir.path().join("Names/Norse.tab"), ";Start\n1,Sif\n").unwrap();

        let categories = discover_by_category(dir.path()).unwrap();
        assert_eq!(categories["Names"], vec!["Greek", "Norse"]);
    }
}
