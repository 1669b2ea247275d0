use std::path::Path;

use tracing::{error, info, warn};

use crate::errors::InstallerError;
use crate::fs::FileSystem;
use crate::helpers::{is_metadata_file, join_normalized, sanitize_user_path};

/// One-shot, non-destructive installer for bundled asset packages.
///
/// The injected [`FileSystem`] is the only effectful collaborator; the
/// installer holds no state between calls.
pub struct PackageInstaller<F: FileSystem> {
    fs: F,
}

impl<F: FileSystem> PackageInstaller<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Installs the package tree at `source` into `target`.
    ///
    /// Host-facing contract: the outcome is reduced to a boolean plus one
    /// diagnostic event (info on success, warn on skip, error on failure).
    /// Callers that need typed failures use [`try_install`](Self::try_install).
    pub fn install(&self, source: &Path, target: &Path) -> bool {
        match self.try_install(source, target) {
            Ok(()) => {
                info!("installed assets to {}", sanitize_user_path(target));
                true
            }
            Err(InstallerError::TargetExists(path)) => {
                warn!(
                    "target already exists, skipping install: {}",
                    sanitize_user_path(&path)
                );
                false
            }
            Err(InstallerError::SourceMissing(path)) => {
                error!("source directory not found: {}", sanitize_user_path(&path));
                false
            }
            Err(err) => {
                error!("failed to install assets: {err}");
                false
            }
        }
    }

    /// Validates the source and target, then copies the tree.
    ///
    /// A fault mid-copy aborts with no rollback; files written before the
    /// fault stay on disk.
    pub fn try_install(&self, source: &Path, target: &Path) -> crate::Result<()> {
        if !self.fs.directory_exists(source) {
            return Err(InstallerError::source_missing(source));
        }
        if self.fs.directory_exists(target) {
            return Err(InstallerError::target_exists(target));
        }
        self.copy_directory_recursive(source, target)
    }

    fn copy_directory_recursive(&self, source_dir: &Path, target_dir: &Path) -> crate::Result<()> {
        self.fs.create_dir_all(target_dir)?;

        for file in self.fs.list_files(source_dir)? {
            if is_metadata_file(&file) {
                continue;
            }
            let dest = join_normalized(target_dir, &self.fs.file_name(&file));
            self.fs.copy_file(&file, &dest, true)?;
        }

        for directory in self.fs.list_dirs(source_dir)? {
            let dest = join_normalized(target_dir, &self.fs.file_name(&directory));
            self.copy_directory_recursive(&directory, &dest)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{MemoryFileSystem, RealFileSystem};
    use std::path::{Path, PathBuf};

    fn seeded_package() -> MemoryFileSystem {
        let fs = MemoryFileSystem::new();
        fs.add_file(Path::new("/pkg/file.txt"), b"payload");
        fs.add_file(Path::new("/pkg/file.txt.meta"), b"guid");
        fs.add_file(Path::new("/pkg/sub/inner.txt"), b"nested");
        fs
    }

    #[test]
    fn missing_source_fails_without_touching_anything() {
        let fs = MemoryFileSystem::new();
        let installer = PackageInstaller::new(fs);
        assert!(!installer.install(Path::new("/no/such/dir"), Path::new("/install")));
        assert!(installer.fs.dirs().is_empty());
        assert!(installer.fs.files().is_empty());
    }

    #[test]
    fn existing_target_skips_without_touching_anything() {
        let fs = seeded_package();
        fs.add_file(Path::new("/install/keep.txt"), b"old");
        let dirs_before = fs.dirs();
        let files_before = fs.files();

        let installer = PackageInstaller::new(fs);
        assert!(!installer.install(Path::new("/pkg"), Path::new("/install")));
        assert_eq!(installer.fs.dirs(), dirs_before);
        assert_eq!(installer.fs.files(), files_before);
        assert_eq!(
            installer.fs.file_content(Path::new("/install/keep.txt")),
            Some(b"old".to_vec())
        );
    }

    #[test]
    fn installs_tree_and_skips_metadata_files() {
        let installer = PackageInstaller::new(seeded_package());
        assert!(installer.install(Path::new("/pkg"), Path::new("/install")));

        assert_eq!(
            installer.fs.file_content(Path::new("/install/file.txt")),
            Some(b"payload".to_vec())
        );
        assert_eq!(
            installer.fs.file_content(Path::new("/install/sub/inner.txt")),
            Some(b"nested".to_vec())
        );
        assert!(!installer.fs.file_exists(Path::new("/install/file.txt.meta")));
        assert!(installer.fs.directory_exists(Path::new("/install/sub")));
    }

    #[test]
    fn preserves_structure_at_every_depth() {
        let fs = MemoryFileSystem::new();
        fs.add_file(Path::new("/pkg/a/b/c/deep.txt"), b"deep");
        fs.add_dir(Path::new("/pkg/a/empty"));

        let installer = PackageInstaller::new(fs);
        assert!(installer.install(Path::new("/pkg"), Path::new("/install")));
        assert_eq!(
            installer.fs.file_content(Path::new("/install/a/b/c/deep.txt")),
            Some(b"deep".to_vec())
        );
        assert!(installer.fs.directory_exists(Path::new("/install/a/empty")));
    }

    #[test]
    fn second_install_is_skipped_and_leaves_first_intact() {
        let installer = PackageInstaller::new(seeded_package());
        assert!(installer.install(Path::new("/pkg"), Path::new("/install")));
        let dirs_after_first = installer.fs.dirs();
        let files_after_first = installer.fs.files();

        assert!(!installer.install(Path::new("/pkg"), Path::new("/install")));
        assert_eq!(installer.fs.dirs(), dirs_after_first);
        assert_eq!(installer.fs.files(), files_after_first);
    }

    #[test]
    fn mid_tree_fault_fails_and_keeps_earlier_files() {
        let fs = seeded_package();
        fs.fail_copies_from(Path::new("/pkg/sub/inner.txt"));

        let installer = PackageInstaller::new(fs);
        assert!(!installer.install(Path::new("/pkg"), Path::new("/install")));

        // Top-level files are copied before the recursion reaches the fault.
        assert_eq!(
            installer.fs.file_content(Path::new("/install/file.txt")),
            Some(b"payload".to_vec())
        );
        assert!(!installer.fs.file_exists(Path::new("/install/sub/inner.txt")));
        assert!(installer.fs.directory_exists(Path::new("/install")));
    }

    #[test]
    fn try_install_reports_typed_failures() {
        let installer = PackageInstaller::new(seeded_package());
        assert!(matches!(
            installer.try_install(Path::new("/missing"), Path::new("/install")),
            Err(InstallerError::SourceMissing(_))
        ));
        assert!(matches!(
            installer.try_install(Path::new("/pkg"), Path::new("/pkg/sub")),
            Err(InstallerError::TargetExists(_))
        ));
    }

    #[test]
    fn real_fs_end_to_end_install() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("pkg");
        std::fs::create_dir_all(source.join("sub")).unwrap();
        std::fs::write(source.join("file.txt"), b"payload").unwrap();
        std::fs::write(source.join("file.txt.meta"), b"guid").unwrap();
        std::fs::write(source.join("sub/inner.txt"), b"nested").unwrap();

        let target = tmp.path().join("install");
        let installer = PackageInstaller::new(RealFileSystem);
        assert!(installer.install(&source, &target));

        assert_eq!(std::fs::read(target.join("file.txt")).unwrap(), b"payload");
        assert_eq!(
            std::fs::read(target.join("sub/inner.txt")).unwrap(),
            b"nested"
        );
        assert!(!target.join("file.txt.meta").exists());

        // Reinstalling over the fresh tree is a skip, and the tree survives.
        assert!(!installer.install(&source, &target));
        assert_eq!(std::fs::read(target.join("file.txt")).unwrap(), b"payload");
    }

    #[test]
    fn real_fs_missing_source_leaves_target_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("install");
        let installer = PackageInstaller::new(RealFileSystem);
        assert!(!installer.install(&PathBuf::from("/no/such/dir"), &target));
        assert!(!target.exists());
    }
}
