//! In-memory filesystem adapter for testing and previews.

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use kiln_core::{
    application::{ScaffoldError, ports::{FileStat, Filesystem}},
    domain::FileMode,
    error::{KilnError, KilnResult},
};

/// In-memory filesystem. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, MemoryFile>,
    directories: HashMap<PathBuf, FileMode>,
    writes: usize,
}

#[derive(Debug, Clone)]
struct MemoryFile {
    contents: String,
    mode: FileMode,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file (and its parent directories) without counting it as a
    /// write.
    pub fn with_file(self, path: impl AsRef<Path>, contents: &str) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                inner.add_directories(parent, FileMode::DEFAULT_DIRECTORY);
            }
            inner.files.insert(
                path.to_path_buf(),
                MemoryFile {
                    contents: contents.to_string(),
                    mode: FileMode::DEFAULT_FILE,
                },
            );
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).map(|f| f.contents.clone())
    }

    /// Mode a file was last written with.
    pub fn file_mode(&self, path: impl AsRef<Path>) -> Option<FileMode> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).map(|f| f.mode)
    }

    /// Mode a directory was created with.
    pub fn directory_mode(&self, path: impl AsRef<Path>) -> Option<FileMode> {
        let inner = self.inner.read().ok()?;
        inner.directories.get(path.as_ref()).copied()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of `write_file` calls so far.
    pub fn write_count(&self) -> usize {
        self.inner.read().map(|inner| inner.writes).unwrap_or(0)
    }

    fn read(&self) -> KilnResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> KilnResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

impl MemoryFilesystemInner {
    fn add_directories(&mut self, path: &Path, mode: FileMode) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.entry(current.clone()).or_insert(mode);
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn stat(&self, path: &Path) -> KilnResult<Option<FileStat>> {
        let inner = self.read()?;
        if let Some(file) = inner.files.get(path) {
            return Ok(Some(FileStat {
                is_dir: false,
                len: file.contents.len() as u64,
                mode: Some(file.mode),
            }));
        }
        Ok(inner.directories.get(path).map(|mode| FileStat {
            is_dir: true,
            len: 0,
            mode: Some(*mode),
        }))
    }

    fn read_to_string(&self, path: &Path) -> KilnResult<String> {
        let inner = self.read()?;
        inner
            .files
            .get(path)
            .map(|f| f.contents.clone())
            .ok_or_else(|| {
                ScaffoldError::OpenFile {
                    path: path.to_path_buf(),
                    reason: "no such file".into(),
                }
                .into()
            })
    }

    fn write_file(&self, path: &Path, contents: &str, mode: FileMode) -> KilnResult<()> {
        let mut inner = self.write()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains_key(parent) {
                return Err(ScaffoldError::CreateFile {
                    path: path.to_path_buf(),
                    reason: "parent directory does not exist".into(),
                }
                .into());
            }
        }
        if inner.directories.contains_key(path) {
            return Err(ScaffoldError::CreateFile {
                path: path.to_path_buf(),
                reason: "is a directory".into(),
            }
            .into());
        }

        inner.files.insert(
            path.to_path_buf(),
            MemoryFile {
                contents: contents.to_string(),
                mode,
            },
        );
        inner.writes += 1;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path, mode: FileMode) -> KilnResult<()> {
        let mut inner = self.write()?;
        if inner.files.contains_key(path) {
            return Err(ScaffoldError::CreateDirectory {
                path: path.to_path_buf(),
                reason: "a file exists at this path".into(),
            }
            .into());
        }
        inner.add_directories(path, mode);
        Ok(())
    }
}

fn poisoned() -> KilnError {
    KilnError::internal("memory filesystem lock poisoned")
}
