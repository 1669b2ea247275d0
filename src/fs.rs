use crate::errors::InstallerError;
use crate::helpers;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Filesystem abstraction boundary for the installer.
///
/// Keeping this trait narrow makes it easy to write deterministic tests and
/// allows alternative backends (e.g. an in-memory fs) to stand in for the
/// real disk.
pub trait FileSystem: Send + Sync {
    /// Returns true when path exists and is a directory.
    fn directory_exists(&self, path: &Path) -> bool;

    /// Returns true when path exists and is a regular file.
    fn file_exists(&self, path: &Path) -> bool;

    /// Creates a directory and all missing parent directories.
    fn create_dir_all(&self, path: &Path) -> crate::Result<()>;

    /// Copies file contents from `source` to `dest`.
    ///
    /// When `overwrite` is false and `dest` already exists, the copy fails
    /// with an `AlreadyExists` I/O error; when true, the destination is
    /// replaced unconditionally.
    fn copy_file(&self, source: &Path, dest: &Path, overwrite: bool) -> crate::Result<()>;

    /// Lists the immediate child files of a directory.
    /// Ordering is platform-dependent; callers must not rely on it.
    fn list_files(&self, path: &Path) -> crate::Result<Vec<PathBuf>>;

    /// Lists the immediate child directories of a directory.
    /// Ordering is platform-dependent; callers must not rely on it.
    fn list_dirs(&self, path: &Path) -> crate::Result<Vec<PathBuf>>;

    /// Returns the last path component, independent of separator style.
    fn file_name(&self, path: &Path) -> String {
        helpers::file_name(path)
    }
}

/// Default filesystem implementation backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> crate::Result<()> {
        fs::create_dir_all(path).map_err(|err| InstallerError::io(path, err))
    }

    fn copy_file(&self, source: &Path, dest: &Path, overwrite: bool) -> crate::Result<()> {
        if !overwrite && dest.exists() {
            return Err(InstallerError::io(
                dest,
                io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists"),
            ));
        }
        fs::copy(source, dest)
            .map(|_| ())
            .map_err(|err| InstallerError::io(source, err))
    }

    fn list_files(&self, path: &Path) -> crate::Result<Vec<PathBuf>> {
        list_children(path, |file_type| file_type.is_file())
    }

    fn list_dirs(&self, path: &Path) -> crate::Result<Vec<PathBuf>> {
        list_children(path, |file_type| file_type.is_dir())
    }
}

fn list_children(
    path: &Path,
    keep: impl Fn(fs::FileType) -> bool,
) -> crate::Result<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(path).map_err(|err| InstallerError::io(path, err))? {
        let entry = entry.map_err(|err| InstallerError::io(path, err))?;
        let file_type = entry
            .file_type()
            .map_err(|err| InstallerError::io(entry.path(), err))?;
        if keep(file_type) {
            children.push(entry.path());
        }
    }
    Ok(children)
}

/// In-memory filesystem used as a deterministic test double.
///
/// Paths are stored with forward-slash separators so lookups behave the same
/// regardless of how callers spell them. The trait takes shared references,
/// so the backing state lives behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    dirs: BTreeSet<String>,
    files: BTreeMap<String, Vec<u8>>,
    copy_faults: HashSet<String>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a directory, creating missing ancestors.
    pub fn add_dir(&self, path: &Path) {
        self.state.lock().unwrap().insert_dir_all(&key(path));
    }

    /// Seeds a file with the given content, creating ancestor directories.
    pub fn add_file(&self, path: &Path, content: &[u8]) {
        let mut state = self.state.lock().unwrap();
        let file_key = key(path);
        if let Some(parent) = parent_of(&file_key) {
            state.insert_dir_all(&parent);
        }
        state.files.insert(file_key, content.to_vec());
    }

    /// Makes every copy reading from `source` fail with a synthetic I/O error.
    pub fn fail_copies_from(&self, source: &Path) {
        self.state.lock().unwrap().copy_faults.insert(key(source));
    }

    /// Returns the content of a stored file, if present.
    pub fn file_content(&self, path: &Path) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(&key(path)).cloned()
    }

    /// Sorted view of every stored directory path.
    pub fn dirs(&self) -> Vec<String> {
        self.state.lock().unwrap().dirs.iter().cloned().collect()
    }

    /// Sorted view of every stored file path.
    pub fn files(&self) -> Vec<String> {
        self.state.lock().unwrap().files.keys().cloned().collect()
    }
}

impl MemoryState {
    fn insert_dir_all(&mut self, dir_key: &str) {
        let mut current = dir_key.to_string();
        while !current.is_empty() {
            self.dirs.insert(current.clone());
            match parent_of(&current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn directory_exists(&self, path: &Path) -> bool {
        self.state.lock().unwrap().dirs.contains(&key(path))
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.state.lock().unwrap().files.contains_key(&key(path))
    }

    fn create_dir_all(&self, path: &Path) -> crate::Result<()> {
        self.state.lock().unwrap().insert_dir_all(&key(path));
        Ok(())
    }

    fn copy_file(&self, source: &Path, dest: &Path, overwrite: bool) -> crate::Result<()> {
        let mut state = self.state.lock().unwrap();
        let source_key = key(source);
        if state.copy_faults.contains(&source_key) {
            return Err(InstallerError::io(
                source,
                io::Error::new(io::ErrorKind::PermissionDenied, "injected copy fault"),
            ));
        }
        let content = state.files.get(&source_key).cloned().ok_or_else(|| {
            InstallerError::io(
                source,
                io::Error::new(io::ErrorKind::NotFound, "no such file"),
            )
        })?;
        let dest_key = key(dest);
        if !overwrite && state.files.contains_key(&dest_key) {
            return Err(InstallerError::io(
                dest,
                io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists"),
            ));
        }
        state.files.insert(dest_key, content);
        Ok(())
    }

    fn list_files(&self, path: &Path) -> crate::Result<Vec<PathBuf>> {
        let dir_key = key(path);
        let state = self.state.lock().unwrap();
        Ok(state
            .files
            .keys()
            .filter(|file| parent_of(file).as_deref() == Some(dir_key.as_str()))
            .map(PathBuf::from)
            .collect())
    }

    fn list_dirs(&self, path: &Path) -> crate::Result<Vec<PathBuf>> {
        let dir_key = key(path);
        let state = self.state.lock().unwrap();
        Ok(state
            .dirs
            .iter()
            .filter(|dir| parent_of(dir).as_deref() == Some(dir_key.as_str()))
            .map(PathBuf::from)
            .collect())
    }
}

fn key(path: &Path) -> String {
    let normalized = helpers::normalize_separators(path);
    normalized
        .to_string_lossy()
        .trim_end_matches('/')
        .to_string()
}

fn parent_of(child_key: &str) -> Option<String> {
    child_key
        .rsplit_once('/')
        .map(|(parent, _)| parent.to_string())
        .filter(|parent| !parent.is_empty())
}
