//! One-shot timer for transient status messages.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// How long a transient status message stays up.
pub const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(3);

/// A cancellable one-shot alarm running on its own thread.
///
/// Dropping the timer cancels it.
#[derive(Debug)]
pub struct StatusTimer {
    cancel: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl StatusTimer {
    /// Run `on_expire` after `duration` unless stopped first.
    pub fn start(duration: Duration, on_expire: impl FnOnce() + Send + 'static) -> Self {
        let (cancel, cancel_rx) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name("mdpager-status-timer".into())
            .spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = cancel_rx.recv_timeout(duration) {
                    on_expire();
                }
            });
        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!(error = %err, "couldn't start status timer");
                None
            }
        };
        Self { cancel, handle }
    }

    /// Cancel the timer. A timer that already fired is unaffected.
    pub fn stop(mut self) {
        self.cancel_and_join();
    }

    fn cancel_and_join(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.cancel.send(());
        let _ = handle.join();
    }
}

impl Drop for StatusTimer {
    fn drop(&mut self) {
        self.cancel_and_join();
    }
}
