//! External tool discovery

use std::path::{Path, PathBuf};

/// Resolve `program` the way a spawn would: a bare name is looked up on
/// `PATH`, anything with a path separator is checked directly.
pub fn resolve_tool(program: &Path) -> Option<PathBuf> {
    which::which(program).ok()
}

pub fn is_tool_available(program: &Path) -> bool {
    resolve_tool(program).is_some()
}
