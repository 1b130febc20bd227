//! The `list` command: show available tables by category.

use std::path::Path;

use rollsmith_core::registry::discover_by_category;

/// List tables grouped by their parent directory, sorted both ways.
pub fn run(root: Option<&Path>) -> Result<(), String> {
    let root = super::table_root(root);
    let categories = discover_by_category(&root)
        .map_err(|e| format!("cannot scan {}: {e}", root.display()))?;
    if categories.is_empty() {
        return Err(format!("no .tab files found in {}", root.display()));
    }
    for (category, tables) in &categories {
        println!("{category}");
        for table in tables {
            println!("   {table}");
        }
    }
    Ok(())
}
