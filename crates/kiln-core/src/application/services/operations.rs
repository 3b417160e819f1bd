//! Targeted in-place edits of files that already exist.
//!
//! Unlike inserters these edits are not idempotent: they search for literal
//! text (or a pattern) and fail when it is not there.

use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::{
    application::{ScaffoldError, ports::Filesystem},
    domain::FileMode,
    error::KilnResult,
};

/// Edit operations over a [`Filesystem`]. Each call reads the whole file,
/// applies every pair in order and writes it back once with its original
/// mode.
pub struct FileOperations<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> FileOperations<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Insert each `code` right before the first occurrence of its `target`.
    pub fn insert_before(&self, path: &Path, insertions: &[(&str, &str)]) -> KilnResult<()> {
        self.edit(path, |mut content| {
            for (target, code) in insertions {
                let idx = find(path, &content, target)?;
                content.insert_str(idx, code);
            }
            Ok(content)
        })
    }

    /// Insert each `code` right after the first occurrence of its `target`.
    pub fn insert_after(&self, path: &Path, insertions: &[(&str, &str)]) -> KilnResult<()> {
        self.edit(path, |mut content| {
            for (target, code) in insertions {
                let idx = find(path, &content, target)? + target.len();
                content.insert_str(idx, code);
            }
            Ok(content)
        })
    }

    /// Replace every occurrence of each `target`.
    pub fn replace(&self, path: &Path, replacements: &[(&str, &str)]) -> KilnResult<()> {
        self.edit(path, |mut content| {
            for (target, replacement) in replacements {
                find(path, &content, target)?;
                content = content.replace(*target, replacement);
            }
            Ok(content)
        })
    }

    /// Replace every match of each pattern. `$1`-style references in the
    /// replacement expand to capture groups.
    pub fn replace_regexp(&self, path: &Path, replacements: &[(&str, &str)]) -> KilnResult<()> {
        self.edit(path, |mut content| {
            for (pattern, replacement) in replacements {
                let re = Regex::new(pattern).map_err(|e| ScaffoldError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })?;
                let out = re.replace_all(&content, *replacement).into_owned();
                if out == content {
                    return Err(ScaffoldError::TargetNotFound {
                        path: path.to_path_buf(),
                        target: pattern.to_string(),
                    }
                    .into());
                }
                content = out;
            }
            Ok(content)
        })
    }

    /// Prefix every line of `code_block` (e.g. comment it out).
    pub fn add_prefix(&self, path: &Path, code_block: &str, prefix: &str) -> KilnResult<()> {
        self.edit(path, |content| {
            let idx = find(path, &content, code_block)?;
            let modified = code_block
                .split('\n')
                .map(|line| format!("{prefix}{line}"))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(splice(&content, idx, code_block.len(), &modified))
        })
    }

    /// Strip `prefix` from every line of `code_block` (e.g. uncomment it).
    /// `code_block` is looked up as it currently appears in the file.
    pub fn remove_prefix(&self, path: &Path, prefix: &str, code_block: &str) -> KilnResult<()> {
        self.edit(path, |content| {
            let idx = find(path, &content, code_block)?;
            let modified = code_block
                .split('\n')
                .map(|line| line.strip_prefix(prefix).unwrap_or(line))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(splice(&content, idx, code_block.len(), &modified))
        })
    }

    fn edit(
        &self,
        path: &Path,
        apply: impl FnOnce(String) -> KilnResult<String>,
    ) -> KilnResult<()> {
        let mode = self
            .filesystem
            .stat(path)?
            .and_then(|stat| stat.mode)
            .unwrap_or(FileMode::DEFAULT_FILE);
        let content = self.filesystem.read_to_string(path)?;
        let updated = apply(content)?;

        debug!(path = %path.display(), %mode, "rewriting file in place");
        self.filesystem.write_file(path, &updated, mode)
    }
}

fn find(path: &Path, content: &str, target: &str) -> KilnResult<usize> {
    content.find(target).ok_or_else(|| {
        ScaffoldError::TargetNotFound {
            path: path.to_path_buf(),
            target: target.to_string(),
        }
        .into()
    })
}

fn splice(content: &str, idx: usize, len: usize, with: &str) -> String {
    let mut out = String::with_capacity(content.len() + with.len());
    out.push_str(&content[..idx]);
    out.push_str(with);
    out.push_str(&content[idx + len..]);
    out
}
