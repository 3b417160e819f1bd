//! Preview adapter: reads go to a real filesystem, writes are recorded.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use kiln_core::{
    application::ports::{FileStat, Filesystem},
    domain::FileMode,
    error::{KilnError, KilnResult},
};
use tracing::debug;

/// A write that would have happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    pub path: PathBuf,
    pub contents: String,
    pub mode: FileMode,
    /// Whether the path existed on the underlying filesystem.
    pub replaces_existing: bool,
}

/// Wraps another [`Filesystem`] and never writes to it.
///
/// Later reads observe earlier planned writes, so multi-step edits preview
/// the same way they would apply.
pub struct DryRunFilesystem<F> {
    inner: F,
    planned: Mutex<Planned>,
}

#[derive(Default)]
struct Planned {
    files: BTreeMap<PathBuf, PlannedWrite>,
    directories: BTreeSet<PathBuf>,
}

impl<F: Filesystem> DryRunFilesystem<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            planned: Mutex::new(Planned::default()),
        }
    }

    /// Recorded writes in path order. Repeated writes to a path keep the last.
    pub fn planned_writes(&self) -> Vec<PlannedWrite> {
        self.planned
            .lock()
            .map(|p| p.files.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Directories that would have been created.
    pub fn planned_directories(&self) -> Vec<PathBuf> {
        self.planned
            .lock()
            .map(|p| p.directories.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> KilnResult<std::sync::MutexGuard<'_, Planned>> {
        self.planned
            .lock()
            .map_err(|_| KilnError::internal("dry-run filesystem lock poisoned"))
    }
}

impl<F: Filesystem> Filesystem for DryRunFilesystem<F> {
    fn stat(&self, path: &Path) -> KilnResult<Option<FileStat>> {
        {
            let planned = self.lock()?;
            if let Some(write) = planned.files.get(path) {
                return Ok(Some(FileStat {
                    is_dir: false,
                    len: write.contents.len() as u64,
                    mode: Some(write.mode),
                }));
            }
            if planned.directories.contains(path) {
                return Ok(Some(FileStat {
                    is_dir: true,
                    len: 0,
                    mode: None,
                }));
            }
        }
        self.inner.stat(path)
    }

    fn read_to_string(&self, path: &Path) -> KilnResult<String> {
        if let Some(write) = self.lock()?.files.get(path) {
            return Ok(write.contents.clone());
        }
        self.inner.read_to_string(path)
    }

    fn write_file(&self, path: &Path, contents: &str, mode: FileMode) -> KilnResult<()> {
        let replaces_existing = self.inner.exists(path)?;
        debug!(path = %path.display(), replaces_existing, "dry run: recording write");
        self.lock()?.files.insert(
            path.to_path_buf(),
            PlannedWrite {
                path: path.to_path_buf(),
                contents: contents.to_string(),
                mode,
                replaces_existing,
            },
        );
        Ok(())
    }

    fn create_dir_all(&self, path: &Path, _mode: FileMode) -> KilnResult<()> {
        if !self.inner.exists(path)? {
            self.lock()?.directories.insert(path.to_path_buf());
        }
        Ok(())
    }
}
