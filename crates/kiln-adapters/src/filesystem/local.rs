//! Local filesystem adapter using std::fs.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use kiln_core::{
    application::{ScaffoldError, ports::{FileStat, Filesystem}},
    domain::FileMode,
    error::KilnResult,
};

/// Production filesystem implementation using `std::fs`.
///
/// Relative paths resolve against the process working directory, or against
/// `root` when the adapter is [rooted](LocalFilesystem::rooted).
#[derive(Debug, Clone, Default)]
pub struct LocalFilesystem {
    root: Option<PathBuf>,
}

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Resolve every path against `root`.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => path.to_path_buf(),
        }
    }
}

impl Filesystem for LocalFilesystem {
    fn stat(&self, path: &Path) -> KilnResult<Option<FileStat>> {
        match fs::metadata(self.resolve(path)) {
            Ok(meta) => Ok(Some(FileStat {
                is_dir: meta.is_dir(),
                len: meta.len(),
                mode: mode_of(&meta),
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ScaffoldError::ExistsFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    fn read_to_string(&self, path: &Path) -> KilnResult<String> {
        let mut file = File::open(self.resolve(path)).map_err(|e| ScaffoldError::OpenFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| ScaffoldError::ReadFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(content)
    }

    fn write_file(&self, path: &Path, contents: &str, mode: FileMode) -> KilnResult<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode.bits());
        }
        #[cfg(not(unix))]
        let _ = mode;

        let mut file = options
            .open(self.resolve(path))
            .map_err(|e| map_io_error(path, e, Step::Create))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| map_io_error(path, e, Step::Write))?;
        file.sync_all()
            .map_err(|e| map_io_error(path, e, Step::Close))
    }

    fn create_dir_all(&self, path: &Path, mode: FileMode) -> KilnResult<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode.bits());
        }
        #[cfg(not(unix))]
        let _ = mode;

        builder
            .create(self.resolve(path))
            .map_err(|e| map_io_error(path, e, Step::CreateDirectory))
    }
}

#[cfg(unix)]
fn mode_of(meta: &fs::Metadata) -> Option<FileMode> {
    use std::os::unix::fs::PermissionsExt;
    Some(FileMode::new(meta.permissions().mode()))
}

#[cfg(not(unix))]
fn mode_of(_meta: &fs::Metadata) -> Option<FileMode> {
    None
}

#[derive(Clone, Copy)]
enum Step {
    Create,
    Write,
    Close,
    CreateDirectory,
}

fn map_io_error(path: &Path, e: io::Error, step: Step) -> kiln_core::error::KilnError {
    let path = path.to_path_buf();
    let reason = e.to_string();
    match step {
        Step::Create => ScaffoldError::CreateFile { path, reason },
        Step::Write => ScaffoldError::WriteFile { path, reason },
        Step::Close => ScaffoldError::CloseFile { path, reason },
        Step::CreateDirectory => ScaffoldError::CreateDirectory { path, reason },
    }
    .into()
}
