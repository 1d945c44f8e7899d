//! Directory monitoring on top of `notify`.
//!
//! The watcher callback only forwards raw events over a channel. A single
//! worker thread owns the [`EventRouter`] and applies events one at a time,
//! in the order they arrive.

use crate::context::AppContext;
use crate::error::Result;
use crate::router::{EventRouter, FsEvent};
use notify::event::{ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{RecvTimeoutError, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How often an idle worker checks whether it should exit.
const WORKER_POLL: Duration = Duration::from_millis(100);

pub struct Monitor {
    watcher: Option<RecommendedWatcher>,
    worker: Option<JoinHandle<()>>,
    stopping: Arc<AtomicBool>,
    directory: PathBuf,
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("directory", &self.directory)
            .field("running", &self.is_running())
            .finish()
    }
}

impl Monitor {
    /// Starts watching the context's directory (non-recursive).
    ///
    /// Call after the initial rescan so the scan and the first events do not
    /// race each other.
    pub fn start(ctx: Arc<AppContext>) -> Result<Self> {
        let directory = ctx.directory().to_path_buf();
        let (tx, rx) = channel::<notify::Result<Event>>();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        let stopping = Arc::new(AtomicBool::new(false));
        let worker_stopping = Arc::clone(&stopping);
        let mut router = EventRouter::new(ctx);
        let worker = thread::Builder::new()
            .name("alldisable-events".to_string())
            .spawn(move || {
                loop {
                    match rx.recv_timeout(WORKER_POLL) {
                        Ok(_) if worker_stopping.load(Ordering::Acquire) => {}
                        Ok(Ok(event)) => {
                            for fs_event in translate(event) {
                                tracing::debug!(?fs_event, "routing");
                                router.handle(fs_event);
                            }
                        }
                        Ok(Err(err)) => tracing::warn!(%err, "watch error"),
                        Err(RecvTimeoutError::Timeout) => {
                            if worker_stopping.load(Ordering::Acquire) {
                                break;
                            }
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        tracing::info!(dir = %directory.display(), "monitoring started");
        Ok(Self {
            watcher: Some(watcher),
            worker: Some(worker),
            stopping,
            directory,
        })
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Stops delivery and waits for the worker to drain.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stopping.store(true, Ordering::Release);
        // no deliveries are routed once the flag is set; the worker exits on
        // its next idle tick or when the watcher's sender goes away
        drop(self.watcher.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("event worker panicked");
            }
            tracing::info!(dir = %self.directory.display(), "monitoring stopped");
        }
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Maps a raw `notify` event onto router events. Access and content
/// modifications carry no membership change and map to nothing.
pub fn translate(event: Event) -> Vec<FsEvent> {
    match event.kind {
        EventKind::Create(_) => event.paths.into_iter().map(FsEvent::Created).collect(),
        EventKind::Remove(RemoveKind::Folder) => Vec::new(),
        EventKind::Remove(_) => event.paths.into_iter().map(FsEvent::Deleted).collect(),
        EventKind::Modify(ModifyKind::Name(mode)) => translate_rename(mode, event.paths),
        _ => Vec::new(),
    }
}

fn translate_rename(mode: RenameMode, paths: Vec<PathBuf>) -> Vec<FsEvent> {
    match mode {
        RenameMode::Both if paths.len() == 2 => {
            let mut paths = paths.into_iter();
            match (paths.next(), paths.next()) {
                (Some(from), Some(to)) => vec![FsEvent::Moved { from, to }],
                _ => Vec::new(),
            }
        }
        RenameMode::From => paths.into_iter().map(FsEvent::Deleted).collect(),
        RenameMode::To => paths.into_iter().map(FsEvent::Created).collect(),
        // only one side is known; whether it still exists tells which
        _ => paths
            .into_iter()
            .map(|path| {
                if path.exists() {
                    FsEvent::Created(path)
                } else {
                    FsEvent::Deleted(path)
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange};

    #[test]
    fn test_translate_create_and_remove() {
        let created = Event::new(EventKind::Create(CreateKind::File)).add_path("/d/a".into());
        assert_eq!(translate(created), vec![FsEvent::Created("/d/a".into())]);

        let removed = Event::new(EventKind::Remove(RemoveKind::File)).add_path("/d/a".into());
        assert_eq!(translate(removed), vec![FsEvent::Deleted("/d/a".into())]);

        let folder = Event::new(EventKind::Remove(RemoveKind::Folder)).add_path("/d/sub".into());
        assert!(translate(folder).is_empty());
    }

    #[test]
    fn test_translate_rename_both_is_a_move() {
        let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path("/d/a.txt".into())
            .add_path("/d/a.txt.disabled".into());
        assert_eq!(
            translate(event),
            vec![FsEvent::Moved {
                from: "/d/a.txt".into(),
                to: "/d/a.txt.disabled".into()
            }]
        );
    }

    #[test]
    fn test_translate_split_rename() {
        let from = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::From)))
            .add_path("/d/a".into());
        let to =
            Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::To))).add_path("/d/b".into());
        assert_eq!(translate(from), vec![FsEvent::Deleted("/d/a".into())]);
        assert_eq!(translate(to), vec![FsEvent::Created("/d/b".into())]);
    }

    #[test]
    fn test_translate_ambiguous_rename_checks_existence() {
        let temp = tempfile::TempDir::new().unwrap();
        let present = temp.path().join("here");
        std::fs::write(&present, "").unwrap();
        let absent = temp.path().join("gone");

        let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Any)))
            .add_path(present.clone())
            .add_path(absent.clone());
        assert_eq!(
            translate(event),
            vec![FsEvent::Created(present), FsEvent::Deleted(absent)]
        );
    }

    #[test]
    fn test_translate_ignores_access_and_data() {
        let access = Event::new(EventKind::Access(AccessKind::Read)).add_path("/d/a".into());
        let data = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path("/d/a".into());
        assert!(translate(access).is_empty());
        assert!(translate(data).is_empty());
    }
}
