//! Content post-processors, registered per extension on the orchestrator.

use std::path::Path;

use kiln_core::{application::ports::PostProcessor, domain::BuilderError};

/// Strips trailing whitespace from every line and ends non-empty content
/// with exactly one newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimTrailingWhitespace;

impl PostProcessor for TrimTrailingWhitespace {
    fn process(&self, _path: &Path, contents: String) -> Result<String, BuilderError> {
        let mut out = contents
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed_len = out.trim_end_matches('\n').len();
        out.truncate(trimmed_len);
        if !out.is_empty() {
            out.push('\n');
        }
        Ok(out)
    }
}

/// Prepends the project boilerplate (license header) unless the content
/// already starts with it.
#[derive(Debug, Clone)]
pub struct PrependBoilerplate {
    header: String,
}

impl PrependBoilerplate {
    pub fn new(header: impl Into<String>) -> Self {
        let mut header = header.into();
        if !header.is_empty() && !header.ends_with('\n') {
            header.push('\n');
        }
        Self { header }
    }
}

impl PostProcessor for PrependBoilerplate {
    fn process(&self, _path: &Path, contents: String) -> Result<String, BuilderError> {
        if self.header.is_empty() || contents.starts_with(&self.header) {
            return Ok(contents);
        }
        Ok(format!("{}\n{contents}", self.header))
    }
}
