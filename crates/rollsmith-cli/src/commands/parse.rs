//! The `parse` command: check tables and optionally export JSON.

use std::fs;
use std::path::Path;

use rollsmith_core::parse_table;

/// Parse each named table, reporting errors and warnings. With
/// `export`, successfully parsed tables print as pretty JSON.
pub fn run(names: &[String], root: Option<&Path>, export: bool) -> Result<(), String> {
    let root = super::table_root(root);
    let mut failed = false;

    for name in names {
        let mut path = root.join(name);
        if path.extension().is_none() {
            path.set_extension("tab");
        }
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                failed = true;
                continue;
            }
        };
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name.as_str());
        match parse_table(stem, &source) {
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                failed = true;
            }
            Ok(parsed) => {
                for warning in &parsed.warnings {
                    eprintln!(
                        "{}: line {}: {}",
                        path.display(),
                        warning.line,
                        warning.message
                    );
                }
                println!("{}: no errors", path.display());
                if export {
                    let json = serde_json::to_string_pretty(&parsed.table)
                        .map_err(|e| format!("internal error: {e}"))?;
                    println!("{json}");
                }
            }
        }
    }

    if failed {
        Err("one or more tables failed to parse".into())
    } else {
        Ok(())
    }
}
