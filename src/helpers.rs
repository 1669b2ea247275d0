//! Shared path helpers for installer behavior.

use std::path::{Path, PathBuf};

/// Suffix used by editor-generated metadata sidecar files.
pub const METADATA_SUFFIX: &str = ".meta";

/// Returns true when the path names an editor metadata sidecar file.
pub fn is_metadata_file(path: &Path) -> bool {
    file_name(path).ends_with(METADATA_SUFFIX)
}

/// Returns a user-safe, trimmed path string that can be used in logs and messages.
pub fn sanitize_user_path(path: &Path) -> String {
    path.display().to_string().trim().to_string()
}

/// Returns the last path component, regardless of separator style.
pub fn file_name(path: &Path) -> String {
    let raw = path.to_string_lossy();
    raw.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Normalizes a path to forward-slash separators.
pub fn normalize_separators(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().replace('\\', "/"))
}

/// Joins `name` onto `dir` with a forward-slash separator.
///
/// Installed trees always use forward slashes so their layout matches the
/// packaging format on every platform.
pub fn join_normalized(dir: &Path, name: &str) -> PathBuf {
    let base = dir.to_string_lossy().replace('\\', "/");
    let base = base.trim_end_matches('/');
    PathBuf::from(format!("{base}/{name}"))
}
