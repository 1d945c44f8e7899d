//! One explicit owner for everything a session shares between threads.

use crate::error::Result;
use crate::file_set::{FileSetChange, ManagedFileSet};
use crate::filter::Eligibility;
use crate::settings::Settings;
use parking_lot::{Mutex, MutexGuard};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

/// The managed directory, the program's own name, the settings and the
/// managed set.
///
/// Lock order is always the file set first, then the settings.
#[derive(Debug)]
pub struct AppContext {
    directory: PathBuf,
    program_name: OsString,
    settings: Settings,
    files: Mutex<ManagedFileSet>,
}

impl AppContext {
    pub fn new(directory: PathBuf, program_name: OsString, settings: Settings) -> Self {
        Self {
            directory,
            program_name,
            settings,
            files: Mutex::new(ManagedFileSet::new()),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn program_name(&self) -> &OsStr {
        &self.program_name
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn files(&self) -> MutexGuard<'_, ManagedFileSet> {
        self.files.lock()
    }

    pub fn tracked_paths(&self) -> Vec<PathBuf> {
        self.files.lock().snapshot()
    }

    pub fn subscribe(&self) -> Receiver<FileSetChange> {
        self.files.lock().subscribe()
    }

    /// Filter check against the current settings, read as one snapshot.
    pub fn should_include(&self, path: &Path) -> bool {
        let config = self.settings.read();
        Eligibility::new(&self.program_name, &config).should_include(path)
    }

    /// Rebuilds the managed set from the directory's immediate entries.
    ///
    /// Holds the set lock for the whole scan so watch events queue up behind
    /// it instead of interleaving. Returns the new size.
    pub fn rescan(&self) -> Result<usize> {
        let mut files = self.files.lock();
        let entries = fs::read_dir(&self.directory)?;

        let config = self.settings.read();
        let filter = Eligibility::new(&self.program_name, &config);
        let mut found = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(dir = %self.directory.display(), %err, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file() && filter.should_include(&path) {
                found.push(path);
            }
        }
        drop(config);

        let len = found.len();
        files.replace_all(found);
        tracing::debug!(dir = %self.directory.display(), len, "rescanned");
        Ok(len)
    }
}
