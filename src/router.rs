//! Turns watch notifications into managed-set updates.
//!
//! The router is driven from a single thread and handles one event at a time
//! in delivery order. Only create notifications are debounced: some watch
//! backends report one user-visible write as several creates.

use crate::context::AppContext;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEDUP_WINDOW: Duration = Duration::from_millis(500);

/// Keep the dedup map small; stale entries are dropped once it grows past this.
const DEDUP_PRUNE_THRESHOLD: usize = 256;

/// A filesystem notification in the router's terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    Created(PathBuf),
    Deleted(PathBuf),
    Moved { from: PathBuf, to: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Added,
    AlreadyTracked,
    /// Same path seen within the dedup window.
    Duplicate,
    /// Gone again, or not a regular file.
    Missing,
    Excluded,
}

/// Last time each path's create notification was acted on.
#[derive(Debug)]
pub struct PendingEventDedup {
    window: Duration,
    last_seen: HashMap<PathBuf, Instant>,
}

impl PendingEventDedup {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: HashMap::new(),
        }
    }

    /// Records `path` at `now` unless it was recorded less than a window ago.
    pub fn admit(&mut self, path: &Path, now: Instant) -> bool {
        if let Some(seen) = self.last_seen.get(path)
            && now.saturating_duration_since(*seen) < self.window
        {
            return false;
        }
        if self.last_seen.len() >= DEDUP_PRUNE_THRESHOLD {
            let window = self.window;
            self.last_seen
                .retain(|_, seen| now.saturating_duration_since(*seen) < window);
        }
        self.last_seen.insert(path.to_path_buf(), now);
        true
    }

    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}

impl Default for PendingEventDedup {
    fn default() -> Self {
        Self::new(DEDUP_WINDOW)
    }
}

#[derive(Debug)]
pub struct EventRouter {
    ctx: Arc<AppContext>,
    dedup: PendingEventDedup,
}

impl EventRouter {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self::with_dedup(ctx, PendingEventDedup::default())
    }

    pub fn with_dedup(ctx: Arc<AppContext>, dedup: PendingEventDedup) -> Self {
        Self { ctx, dedup }
    }

    pub fn handle(&mut self, event: FsEvent) {
        match event {
            FsEvent::Created(path) => {
                self.handle_created(&path);
            }
            FsEvent::Deleted(path) => {
                self.handle_deleted(&path);
            }
            FsEvent::Moved { from, to } => {
                self.handle_moved(&from, &to);
            }
        }
    }

    pub fn handle_created(&mut self, path: &Path) -> CreateOutcome {
        if !self.dedup.admit(path, Instant::now()) {
            tracing::debug!(path = %path.display(), "duplicate create dropped");
            return CreateOutcome::Duplicate;
        }
        if !path.is_file() {
            return CreateOutcome::Missing;
        }

        let mut files = self.ctx.files();
        if !self.ctx.should_include(path) {
            return CreateOutcome::Excluded;
        }
        if files.add(path.to_path_buf()) {
            CreateOutcome::Added
        } else {
            CreateOutcome::AlreadyTracked
        }
    }

    /// Returns whether the path was tracked.
    pub fn handle_deleted(&mut self, path: &Path) -> bool {
        self.ctx.files().remove(path)
    }

    pub fn handle_moved(&mut self, from: &Path, to: &Path) -> CreateOutcome {
        self.handle_deleted(from);
        self.handle_created(to)
    }
}
