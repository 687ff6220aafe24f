//! File watching for live reload.
//!
//! A [`WatchSession`] subscribes to the directory containing the open
//! document and runs [`watch_loop`] on its own thread. The loop ends after the
//! first write or create of the exact document path, or when the session is
//! stopped. A fresh session is started after the next successful render.
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Input to the watch loop: filesystem notifications and the stop request.
#[derive(Debug)]
pub enum LoopInput {
    Fs(notify::Result<Event>),
    Cancel,
}

/// How a watch loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The watched file was written or recreated.
    Changed,
    /// The session was stopped.
    Cancelled,
    /// Every sender went away.
    Disconnected,
}

/// Block on `rx` until `target` is written or created, or the loop is cancelled.
///
/// Events for other paths, events of other kinds and watcher errors are
/// skipped and the loop keeps waiting.
pub fn watch_loop(rx: &Receiver<LoopInput>, target: &Path) -> WatchOutcome {
    loop {
        match rx.recv() {
            Ok(LoopInput::Fs(Ok(event))) => {
                if is_write_or_create(&event.kind) && event.paths.iter().any(|p| p == target) {
                    tracing::debug!(kind = ?event.kind, path = %target.display(), "watched file changed");
                    return WatchOutcome::Changed;
                }
                tracing::trace!(kind = ?event.kind, paths = ?event.paths, "ignoring fs event");
            }
            Ok(LoopInput::Fs(Err(err))) => {
                tracing::warn!(error = %err, "file watcher error");
            }
            Ok(LoopInput::Cancel) => return WatchOutcome::Cancelled,
            Err(_) => return WatchOutcome::Disconnected,
        }
    }
}

/// Whether an event kind represents new file contents.
pub const fn is_write_or_create(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Modify(
                ModifyKind::Any
                    | ModifyKind::Data(_)
                    | ModifyKind::Name(RenameMode::To | RenameMode::Both)
            )
    )
}

/// One directory subscription plus the thread waiting on it.
pub struct WatchSession {
    watcher: RecommendedWatcher,
    dir: PathBuf,
    target: PathBuf,
    tx: Sender<LoopInput>,
    handle: Option<JoinHandle<WatchOutcome>>,
}

impl WatchSession {
    /// Watch the directory containing `target`; `on_change` runs once when
    /// the file is written or recreated.
    ///
    /// `target` should be canonical, since notification paths are.
    ///
    /// # Errors
    /// Returns an error if the watcher cannot be created or the directory
    /// cannot be watched.
    pub fn start(
        target: impl Into<PathBuf>,
        on_change: impl FnOnce() + Send + 'static,
    ) -> notify::Result<Self> {
        let target = target.into();
        let dir = watch_root_for(&target);

        let (tx, rx) = mpsc::channel();
        let fs_tx = tx.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = fs_tx.send(LoopInput::Fs(res));
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(dir = %dir.display(), "watching directory");

        let loop_target = target.clone();
        let handle = std::thread::Builder::new()
            .name("mdpager-watch".into())
            .spawn(move || {
                let outcome = watch_loop(&rx, &loop_target);
                if outcome == WatchOutcome::Changed {
                    on_change();
                }
                outcome
            })
            .map_err(notify::Error::io)?;

        Ok(Self {
            watcher,
            dir,
            target,
            tx,
            handle: Some(handle),
        })
    }

    /// The document path this session reports changes for.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// True once the loop has ended, normally after reporting a change.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Remove the subscription and wait for the loop to end.
    pub fn stop(mut self) -> WatchOutcome {
        self.shutdown()
    }

    fn shutdown(&mut self) -> WatchOutcome {
        let Some(handle) = self.handle.take() else {
            return WatchOutcome::Cancelled;
        };
        if let Err(err) = self.watcher.unwatch(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), error = %err, "couldn't remove directory from watcher");
        }
        let _ = self.tx.send(LoopInput::Cancel);
        let outcome = handle.join().unwrap_or(WatchOutcome::Disconnected);
        tracing::debug!(dir = %self.dir.display(), ?outcome, "watch stopped");
        outcome
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchSession")
            .field("dir", &self.dir)
            .field("target", &self.target)
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}

fn watch_root_for(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
