use std::{io, path::PathBuf};

/// Shared error type used across the installer crate.
#[derive(thiserror::Error, Debug)]
pub enum InstallerError {
    /// The source package directory does not exist.
    #[error("source directory not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// The target directory already exists; installs never overwrite.
    #[error("target already exists: {}", .0.display())]
    TargetExists(PathBuf),

    /// File system I/O failure.
    #[error("I/O error while accessing {}", .0.display())]
    Io(PathBuf, #[source] io::Error),
}

impl InstallerError {
    pub fn source_missing(path: impl Into<PathBuf>) -> Self {
        Self::SourceMissing(path.into())
    }

    pub fn target_exists(path: impl Into<PathBuf>) -> Self {
        Self::TargetExists(path.into())
    }

    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Io(path.into(), error)
    }
}

/// Shared result alias for the installer crate.
pub type Result<T> = std::result::Result<T, InstallerError>;
