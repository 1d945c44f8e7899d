//! Rename-based enable/disable, for one file or a whole batch.
//!
//! Batches run sequentially in the order given. A failing file is recorded
//! and skipped; it never stops the rest of the batch.

use crate::context::AppContext;
use crate::error::{AppError, Result};
use crate::marker::{disabled_path, enabled_path, toggled_path};
use std::fs;
use std::path::{Path, PathBuf};

/// Per-item results of a batch operation.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Original paths that were renamed.
    pub succeeded: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, AppError)>,
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, path: &Path, result: Result<PathBuf>) {
        match result {
            Ok(_) => self.succeeded.push(path.to_path_buf()),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "rename failed");
                self.failures.push((path.to_path_buf(), err));
            }
        }
    }
}

/// `rename` that refuses to replace an existing target.
pub fn rename_no_clobber(from: &Path, to: &Path) -> Result<()> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(AppError::TargetExists {
            path: to.to_path_buf(),
        });
    }
    fs::rename(from, to).map_err(|source| AppError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// Flips one file: strips `.disabled` if present, appends it otherwise.
/// Returns the new path.
pub fn toggle_one(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(AppError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let target = toggled_path(path).ok_or_else(|| AppError::NotAFile {
        path: path.to_path_buf(),
    })?;
    rename_no_clobber(path, &target)?;
    tracing::debug!(from = %path.display(), to = %target.display(), "toggled");
    Ok(target)
}

fn disable_one(path: &Path) -> Result<PathBuf> {
    let target = disabled_path(path).ok_or_else(|| AppError::NotAFile {
        path: path.to_path_buf(),
    })?;
    rename_no_clobber(path, &target)?;
    Ok(target)
}

fn enable_one(path: &Path) -> Result<PathBuf> {
    let target = enabled_path(path).ok_or_else(|| AppError::NotAFile {
        path: path.to_path_buf(),
    })?;
    rename_no_clobber(path, &target)?;
    Ok(target)
}

/// Disables each of `paths`, dropping the successes from the managed set.
pub fn disable_paths(ctx: &AppContext, paths: &[PathBuf]) -> BatchReport {
    let mut report = BatchReport::default();
    for path in paths {
        let result = disable_one(path);
        if result.is_ok() {
            ctx.files().remove(path);
        }
        report.record(path, result);
    }
    tracing::info!(
        disabled = report.success_count(),
        failed = report.failures.len(),
        "disable batch finished"
    );
    report
}

/// Disables everything currently tracked. Files that show up while the batch
/// runs are not part of it.
pub fn disable_all(ctx: &AppContext) -> BatchReport {
    let snapshot = ctx.tracked_paths();
    disable_paths(ctx, &snapshot)
}

/// Re-enables every `*.disabled` file in the managed directory, then rescans.
///
/// Fails only if the directory cannot be listed at all. A rescan failure
/// afterwards is reported against the directory itself.
pub fn enable_all(ctx: &AppContext) -> Result<BatchReport> {
    let dir = ctx.directory();
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), %err, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        // a bare `.disabled` has no name to go back to
        if enabled_path(&path).is_some() && path.is_file() {
            candidates.push(path);
        }
    }

    let mut report = BatchReport::default();
    for path in &candidates {
        report.record(path, enable_one(path));
    }

    if let Err(err) = ctx.rescan() {
        report.failures.push((dir.to_path_buf(), err));
    }
    tracing::info!(
        enabled = report.success_count(),
        failed = report.failures.len(),
        "enable batch finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_toggle_one_round_trip() {
        let temp = TempDir::new().unwrap();
        let original = temp.path().join("pack.zip");
        fs::write(&original, "data").unwrap();

        let disabled = toggle_one(&original).unwrap();
        assert_eq!(disabled, temp.path().join("pack.zip.disabled"));
        assert!(!original.exists());

        let restored = toggle_one(&disabled).unwrap();
        assert_eq!(restored, original);
        assert_eq!(fs::read_to_string(&restored).unwrap(), "data");
    }

    #[test]
    fn test_toggle_one_refuses_to_clobber() {
        let temp = TempDir::new().unwrap();
        let original = temp.path().join("a.txt");
        fs::write(&original, "new").unwrap();
        fs::write(temp.path().join("a.txt.disabled"), "old").unwrap();

        let err = toggle_one(&original).unwrap_err();
        assert!(matches!(err, AppError::TargetExists { .. }));
        assert_eq!(fs::read_to_string(&original).unwrap(), "new");
        assert_eq!(
            fs::read_to_string(temp.path().join("a.txt.disabled")).unwrap(),
            "old"
        );
    }

    #[test]
    fn test_toggle_one_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = toggle_one(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, AppError::NotAFile { .. }));
    }

    #[test]
    fn test_toggle_one_rejects_directory() {
        let temp = TempDir::new().unwrap();
        let err = toggle_one(temp.path()).unwrap_err();
        assert!(matches!(err, AppError::NotAFile { .. }));
    }

    #[test]
    fn test_toggle_one_rejects_bare_marker() {
        let temp = TempDir::new().unwrap();
        let bare = temp.path().join(".disabled");
        fs::write(&bare, "").unwrap();
        let err = toggle_one(&bare).unwrap_err();
        assert!(matches!(err, AppError::NotAFile { .. }));
        assert!(bare.exists());
    }

    #[test]
    fn test_rename_error_on_vanished_source() {
        let temp = TempDir::new().unwrap();
        let err = rename_no_clobber(&temp.path().join("x"), &temp.path().join("y")).unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    }
}
