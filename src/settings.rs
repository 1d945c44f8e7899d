//! The settings workflow: the only way the exclusion config changes.
//!
//! Every mutation is applied in memory first and then written to disk. If the
//! write fails the in-memory value is kept and the save error is returned.

use crate::config::{ExclusionConfig, normalize_extension};
use crate::error::{AppError, Result};
use parking_lot::{RwLock, RwLockReadGuard};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionAdded {
    Added,
    AlreadyPresent,
}

#[derive(Debug)]
pub struct Settings {
    path: PathBuf,
    config: RwLock<ExclusionConfig>,
}

impl Settings {
    pub fn new(path: PathBuf, config: ExclusionConfig) -> Self {
        Self {
            path,
            config: RwLock::new(config),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A consistent view of the config; writers wait until it is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, ExclusionConfig> {
        self.config.read()
    }

    pub fn snapshot(&self) -> ExclusionConfig {
        self.config.read().clone()
    }

    /// Adds `raw` as an excluded extension. An existing entry keeps its flag.
    pub fn add_extension(&self, raw: &str) -> Result<ExtensionAdded> {
        let ext = normalize_extension(raw)?;
        let outcome = self.mutate(|config| {
            if config.excluded_extensions.contains_key(&ext) {
                return false;
            }
            config.excluded_extensions.insert(ext.clone(), true);
            true
        })?;
        Ok(if outcome {
            ExtensionAdded::Added
        } else {
            ExtensionAdded::AlreadyPresent
        })
    }

    pub fn set_extension_excluded(&self, raw: &str, excluded: bool) -> Result<()> {
        let ext = normalize_extension(raw)?;
        self.mutate(|config| {
            let previous = config.excluded_extensions.insert(ext.clone(), excluded);
            previous != Some(excluded)
        })?;
        Ok(())
    }

    /// Returns whether the extension was listed.
    pub fn remove_extension(&self, raw: &str) -> Result<bool> {
        let ext = normalize_extension(raw)?;
        self.mutate(|config| config.excluded_extensions.remove(&ext).is_some())
    }

    pub fn exclude_file(&self, path: &Path) -> Result<bool> {
        let path = path.to_path_buf();
        self.mutate(|config| config.excluded_files.insert(path))
    }

    pub fn include_file(&self, path: &Path) -> Result<bool> {
        self.mutate(|config| config.excluded_files.remove(path))
    }

    /// Applies several extension flags in one write, as a settings dialog
    /// does when it is confirmed.
    pub fn apply_extension_flags<'a, I>(&self, flags: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let normalized = flags
            .into_iter()
            .map(|(raw, excluded)| Ok((normalize_extension(raw)?, excluded)))
            .collect::<Result<Vec<_>>>()?;
        self.mutate(|config| {
            let mut changed = false;
            for (ext, excluded) in normalized {
                changed |= config.excluded_extensions.insert(ext, excluded) != Some(excluded);
            }
            changed
        })?;
        Ok(())
    }

    /// Runs `change`; persists only when it reports a modification.
    fn mutate<F>(&self, change: F) -> Result<bool>
    where
        F: FnOnce(&mut ExclusionConfig) -> bool,
    {
        let to_save = {
            let mut config = self.config.write();
            if !change(&mut config) {
                return Ok(false);
            }
            config.clone()
        };
        tracing::debug!(path = %self.path.display(), "saving settings");
        to_save.save(&self.path).inspect_err(|err: &AppError| {
            tracing::warn!(%err, "settings kept in memory only");
        })?;
        Ok(true)
    }
}
