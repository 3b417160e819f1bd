//! Scaffold markers: durable comment-line anchors inside generated files.
//!
//! A marker is written into a file once (usually by a template) and found
//! again by later runs, which insert code fragments right above it:
//!
//! ```text
//! import (
//!     "fmt"
//!     // +kubebuilder:scaffold:imports
//! )
//! ```
//!
//! The comment token depends on the file type. The extension → token table
//! is a [`MarkerSyntax`] value handed around explicitly; there is no global
//! table.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use crate::domain::error::DomainError;

/// Prefix used when none is configured.
pub const DEFAULT_MARKER_PREFIX: &str = "kubebuilder:scaffold";

/// A raw, possibly multi-line, text snippet inserted at a marker.
pub type CodeFragment = String;

/// Fragments for a single marker, in insertion order.
pub type CodeFragments = Vec<CodeFragment>;

/// Marker → fragments. Ordered so iteration is deterministic.
pub type CodeFragmentsMap = BTreeMap<Marker, CodeFragments>;

// ── MarkerSyntax ──────────────────────────────────────────────────────────────

/// Comment tokens per file extension plus the marker prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSyntax {
    prefix: String,
    tokens: HashMap<String, String>,
}

impl MarkerSyntax {
    /// Syntax with no registered extensions.
    pub fn empty(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            tokens: HashMap::new(),
        }
    }

    /// Register (or replace) the comment token for an extension.
    ///
    /// Extensions are matched without the leading dot and case-insensitively.
    /// Extension-less files (`Makefile`) are registered by file name.
    pub fn with_token(mut self, extension: &str, token: impl Into<String>) -> Self {
        self.tokens.insert(
            extension.trim_start_matches('.').to_ascii_lowercase(),
            token.into(),
        );
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Look up the comment token for a path.
    pub fn token_for(&self, path: &Path) -> Option<&str> {
        let key = match path.extension() {
            Some(ext) => ext.to_string_lossy().to_ascii_lowercase(),
            None => path.file_name()?.to_string_lossy().to_ascii_lowercase(),
        };
        self.tokens.get(&key).map(String::as_str)
    }

    /// Every marker line in `content`, with its 1-based line number.
    ///
    /// Only markers using this syntax's prefix and the token registered for
    /// `path` are reported.
    pub fn scan(&self, path: &Path, content: &str) -> Result<Vec<(usize, Marker)>, DomainError> {
        let probe = Marker::try_for_path(self, path, "")?;
        let found = content
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| {
                let rest = line.trim().strip_prefix(probe.comment())?;
                let value = rest
                    .trim_start()
                    .strip_prefix('+')?
                    .strip_prefix(self.prefix.as_str())?
                    .strip_prefix(':')?;
                Some((idx + 1, Marker::new(probe.comment(), &self.prefix, value)))
            })
            .collect();
        Ok(found)
    }
}

impl Default for MarkerSyntax {
    fn default() -> Self {
        let slash = ["go", "rs", "c", "h", "cc", "cpp", "java", "js", "ts", "proto"];
        let hash = ["yaml", "yml", "toml", "sh", "py", "makefile", "dockerfile"];

        let mut syntax = Self::empty(DEFAULT_MARKER_PREFIX);
        for ext in slash {
            syntax = syntax.with_token(ext, "//");
        }
        for ext in hash {
            syntax = syntax.with_token(ext, "#");
        }
        syntax
    }
}

// ── Marker ────────────────────────────────────────────────────────────────────

/// A comment-line anchor: `<token> +<prefix>:<value>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Marker {
    comment: String,
    prefix: String,
    value: String,
}

impl Marker {
    /// Build a marker from explicit parts.
    pub fn new(
        comment: impl Into<String>,
        prefix: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            comment: comment.into(),
            prefix: prefix.into(),
            value: value.into(),
        }
    }

    /// Build the marker for a file, picking the comment token from its
    /// extension.
    ///
    /// # Panics
    /// Panics if the extension has no registered token. Marker placement is
    /// decided when a builder is written, so this is an authoring bug, not a
    /// runtime condition. Use [`Marker::try_for_path`] to handle it.
    pub fn for_path(syntax: &MarkerSyntax, path: impl AsRef<Path>, value: &str) -> Self {
        match Self::try_for_path(syntax, path, value) {
            Ok(marker) => marker,
            Err(e) => panic!("{e}"),
        }
    }

    /// Fallible form of [`Marker::for_path`].
    pub fn try_for_path(
        syntax: &MarkerSyntax,
        path: impl AsRef<Path>,
        value: &str,
    ) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let token = syntax
            .token_for(path)
            .ok_or_else(|| DomainError::UnsupportedMarkerExtension {
                path: path.display().to_string(),
                extension: path
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            })?;
        Ok(Self::new(token, syntax.prefix(), value))
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether `line` is this marker, ignoring indentation, trailing
    /// whitespace and spacing between the comment token and the `+`.
    pub fn equals_line(&self, line: &str) -> bool {
        let Some(rest) = line.trim().strip_prefix(self.comment.as_str()) else {
            return false;
        };
        let Some(body) = rest.trim_start().strip_prefix('+') else {
            return false;
        };
        body.strip_prefix(self.prefix.as_str())
            .and_then(|b| b.strip_prefix(':'))
            .is_some_and(|value| value == self.value)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} +{}:{}", self.comment, self.prefix, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_files_use_slashes() {
        let m = Marker::for_path(&MarkerSyntax::default(), "cmd/main.go", "imports");
        assert_eq!(m.to_string(), "// +kubebuilder:scaffold:imports");
    }

    #[test]
    fn yaml_files_use_hash() {
        let m = Marker::for_path(&MarkerSyntax::default(), "config/rbac/role.yml", "rules");
        assert_eq!(m.to_string(), "# +kubebuilder:scaffold:rules");
    }

    #[test]
    fn makefile_resolved_by_name() {
        let m = Marker::for_path(&MarkerSyntax::default(), "Makefile", "targets");
        assert_eq!(m.comment(), "#");
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = Marker::try_for_path(&MarkerSyntax::default(), "README.md", "x").unwrap_err();
        assert!(matches!(
            err,
            DomainError::UnsupportedMarkerExtension { ref extension, .. } if extension == "md"
        ));
    }

    #[test]
    #[should_panic(expected = "no comment token")]
    fn for_path_panics_on_unknown_extension() {
        Marker::for_path(&MarkerSyntax::default(), "notes.txt", "x");
    }

    #[test]
    fn custom_prefix_and_token() {
        let syntax = MarkerSyntax::empty("kiln").with_token(".lua", "--");
        let m = Marker::for_path(&syntax, "init.lua", "hooks");
        assert_eq!(m.to_string(), "-- +kiln:hooks");
    }

    #[test]
    fn equals_line_ignores_indentation() {
        let m = Marker::for_path(&MarkerSyntax::default(), "main.go", "-");
        assert!(m.equals_line("// +kubebuilder:scaffold:-"));
        assert!(m.equals_line("\t\t// +kubebuilder:scaffold:-   "));
        assert!(m.equals_line("//+kubebuilder:scaffold:-"));
    }

    #[test]
    fn equals_line_rejects_other_values() {
        let m = Marker::for_path(&MarkerSyntax::default(), "main.go", "imports");
        assert!(!m.equals_line("// +kubebuilder:scaffold:imports2"));
        assert!(!m.equals_line("// +kubebuilder:scaffold:import"));
        assert!(!m.equals_line("# +kubebuilder:scaffold:imports"));
        assert!(!m.equals_line("x := 1 // +kubebuilder:scaffold:imports"));
    }

    #[test]
    fn scan_lists_markers_with_line_numbers() {
        let content = "package main\n\nimport (\n\t// +kubebuilder:scaffold:imports\n)\n// +other:x\n//+kubebuilder:scaffold:builder\n";
        let found = MarkerSyntax::default()
            .scan(Path::new("main.go"), content)
            .unwrap();

        let summary: Vec<_> = found.iter().map(|(n, m)| (*n, m.value())).collect();
        assert_eq!(summary, vec![(4, "imports"), (7, "builder")]);
        assert!(found[0].1.equals_line("// +kubebuilder:scaffold:imports"));
    }

    #[test]
    fn scan_rejects_unknown_extensions() {
        assert!(MarkerSyntax::default()
            .scan(Path::new("notes.txt"), "# +kubebuilder:scaffold:x")
            .is_err());
    }
}
