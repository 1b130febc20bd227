//! CLI subcommand implementations.

pub mod list;
pub mod new;
pub mod parse;
pub mod roll;

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the default table root directory.
pub const ROOT_ENV: &str = "ROLLSMITH_ROOT";

/// Resolve the table root: the `--root` flag wins, then the
/// `ROLLSMITH_ROOT` environment variable, then the current directory.
pub fn table_root(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    match env::var(ROOT_ENV) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from("."),
    }
}
