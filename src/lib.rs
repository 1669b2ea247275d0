//! Editor asset-package installer.
//! A guarded recursive copy behind a narrow filesystem seam: validate that
//! the source package exists and the target does not, then mirror the tree
//! while skipping editor metadata sidecar files.

pub mod errors;
pub mod fs;
pub mod helpers;
pub mod installer;

pub use errors::{InstallerError, Result};
pub use fs::{FileSystem, MemoryFileSystem, RealFileSystem};
pub use helpers::{is_metadata_file, sanitize_user_path, METADATA_SUFFIX};
pub use installer::PackageInstaller;

/// Re-export a small stable API surface for host integrations.
pub mod prelude {
    pub use crate::{
        errors::{InstallerError, Result},
        fs::{FileSystem, MemoryFileSystem, RealFileSystem},
        helpers::*,
        installer::PackageInstaller,
    };
}
