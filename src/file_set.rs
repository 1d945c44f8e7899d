//! Ordered, duplicate-free list of the files currently eligible for toggling.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, channel};

/// A mutation of the managed set, as seen by a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSetChange {
    Added { path: PathBuf, index: usize },
    Removed { path: PathBuf, index: usize },
    /// The whole list was rebuilt; re-read it.
    Reset { len: usize },
}

#[derive(Debug, Default)]
pub struct ManagedFileSet {
    paths: Vec<PathBuf>,
    subscribers: Vec<Sender<FileSetChange>>,
}

impl ManagedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the path was already tracked.
    pub fn add(&mut self, path: PathBuf) -> bool {
        if self.contains(&path) {
            return false;
        }
        tracing::debug!(path = %path.display(), "tracking");
        let index = self.paths.len();
        self.paths.push(path.clone());
        self.notify(FileSetChange::Added { path, index });
        true
    }

    /// Returns `false` if the path was not tracked.
    pub fn remove(&mut self, path: &Path) -> bool {
        let Some(index) = self.position(path) else {
            return false;
        };
        let path = self.paths.remove(index);
        tracing::debug!(path = %path.display(), "untracking");
        self.notify(FileSetChange::Removed { path, index });
        true
    }

    /// Swaps in a freshly scanned list.
    pub fn replace_all(&mut self, paths: Vec<PathBuf>) {
        let mut deduped: Vec<PathBuf> = Vec::with_capacity(paths.len());
        for path in paths {
            if !deduped.contains(&path) {
                deduped.push(path);
            }
        }
        self.paths = deduped;
        let len = self.paths.len();
        self.notify(FileSetChange::Reset { len });
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.position(path).is_some()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.paths.clone()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Every later mutation is delivered to the returned receiver.
    pub fn subscribe(&mut self) -> Receiver<FileSetChange> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn position(&self, path: &Path) -> Option<usize> {
        self.paths.iter().position(|p| p == path)
    }

    fn notify(&mut self, change: FileSetChange) {
        // dropped receivers unsubscribe themselves
        self.subscribers
            .retain(|subscriber| subscriber.send(change.clone()).is_ok());
    }
}
