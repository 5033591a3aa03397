//! Local staging directory: creation, listing, walking, and scoped removal

use cloudhop_common::{MigrateError, Result, StagedEntry};
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Create `path` and any missing parents. Succeeds if it already exists.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| MigrateError::io(path, e))
}

/// Immediate (non-recursive) entries of `path`, sorted by name
pub fn list_entries(path: &Path) -> Result<Vec<StagedEntry>> {
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(path).map_err(|e| MigrateError::io(path, e))? {
        let entry = entry.map_err(|e| MigrateError::io(path, e))?;
        let metadata = entry.metadata().map_err(|e| MigrateError::io(entry.path(), e))?;
        entries.push(StagedEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            size: metadata.len(),
            is_dir: metadata.is_dir(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Destination key for a file at `relative` below the staging root.
///
/// The prefix is prepended verbatim; path components are joined with `/`
/// whatever the host separator is. Components that are not valid UTF-8 are
/// rejected so distinct files never share a key.
pub fn object_key(prefix: &str, relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().ok_or_else(|| {
                MigrateError::Walk(format!(
                    "file name {:?} is not valid UTF-8 and cannot be used as an object key",
                    relative
                ))
            })?;
            parts.push(part);
        }
    }

    Ok(format!("{}{}", prefix, parts.join("/")))
}

/// Lazily walk every file under `root`, yielding
/// `(absolute path, path relative to root)`.
///
/// Symlinks are not descended into. A symlink that resolves to a regular
/// file is yielded like a file; links to directories are skipped. Order
/// follows the filesystem and is not sorted.
pub fn walk_files(root: &Path) -> impl Iterator<Item = Result<(PathBuf, PathBuf)>> + '_ {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => return Some(Err(MigrateError::Walk(e.to_string()))),
            };

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                match std::fs::metadata(entry.path()) {
                    Ok(target) if target.is_file() => {}
                    Ok(_) => return None,
                    Err(e) => return Some(Err(MigrateError::io(entry.path(), e))),
                }
            } else if !file_type.is_file() {
                return None;
            }

            let relative = match entry.path().strip_prefix(root) {
                Ok(relative) => relative.to_path_buf(),
                Err(e) => return Some(Err(MigrateError::Walk(e.to_string()))),
            };
            Some(Ok((entry.into_path(), relative)))
        })
}

/// Scoped ownership of the staging directory for one migration.
///
/// When cleanup is enabled the directory tree is removed on drop, on every
/// exit path. Removal failures are logged and swallowed.
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
    cleanup: bool,
}

impl StagingDir {
    pub fn acquire(path: impl Into<PathBuf>, cleanup: bool) -> Self {
        Self {
            path: path.into(),
            cleanup,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cleanup_enabled(&self) -> bool {
        self.cleanup
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if !self.cleanup || !self.path.exists() {
            return;
        }

        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "🧹 Cleaned up temporary directory"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove staging directory"
            ),
        }
    }
}
