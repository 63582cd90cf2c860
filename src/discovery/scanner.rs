//! File system scanner for base and goal images.
//!
//! A directory is walked recursively and every file whose trailing path
//! components match the glob pattern is collected, the way
//! `**/<pattern>` would. A plain file is used as-is.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::error::{Result, TransferError};

use super::filter::Filter;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compile a filename filter, reporting bad patterns as configuration errors.
pub fn compile_pattern(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| TransferError::Config {
        message: format!("Invalid filter pattern '{}': {}", pattern, e),
        help: Some("Use glob syntax such as *.png or sprites/*".to_string()),
    })
}

/// Check whether the last components of `relative` match `pattern`.
pub fn matches_pattern(relative: &Path, pattern: &Pattern) -> bool {
    let depth = pattern.as_str().split('/').filter(|c| !c.is_empty()).count().max(1);

    let components: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if components.len() < depth {
        return false;
    }

    let tail = components[components.len() - depth..].join("/");
    pattern.matches_with(&tail, MATCH_OPTIONS)
}

/// Collect the images under `root` matching `pattern` and passing `filter`.
///
/// Files are returned sorted by path. When `root` is a file it is returned
/// alone, without filtering.
pub fn scan(root: &Path, pattern: &str, filter: &Filter) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Err(TransferError::Io {
            path: root.to_path_buf(),
            message: "No such file or directory".to_string(),
        });
    }

    let pattern = compile_pattern(pattern)?;
    let mut found = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        if !matches_pattern(relative, &pattern) {
            continue;
        }

        if filter.skips(path) {
            continue;
        }

        found.push(path.to_path_buf());
    }

    Ok(found)
}
