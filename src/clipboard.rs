//! Copying text out of the pager.
//!
//! Text goes to the terminal through an OSC 52 escape sequence, which works
//! over SSH, and to the system clipboard through `arboard`.

use std::io::Write;
use std::sync::mpsc::{self, SendError, Sender};
use std::thread::JoinHandle;

use anyhow::{Context, Result, anyhow, bail};
use base64::Engine;

/// OSC 52 "set clipboard" sequence for `text`.
pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

/// Emit the OSC 52 sequence for `text` on `out`.
///
/// # Errors
/// Returns an error if writing to `out` fails.
pub fn write_osc52(out: &mut impl Write, text: &str) -> std::io::Result<()> {
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}

type CopyDone = Box<dyn FnOnce(Result<()>) + Send>;

/// The system clipboard, owned by a dedicated thread.
///
/// On X11 and Wayland copied text is only served while a clipboard handle
/// is alive, so one handle lives as long as this value.
pub struct SystemClipboard {
    requests: Option<Sender<(String, CopyDone)>>,
    handle: Option<JoinHandle<()>>,
}

impl SystemClipboard {
    /// Start the clipboard thread and open the clipboard on it.
    pub fn start() -> Self {
        let (requests, rx) = mpsc::channel::<(String, CopyDone)>();
        let handle = std::thread::Builder::new()
            .name("mdpager-clipboard".into())
            .spawn(move || {
                let mut clipboard = match arboard::Clipboard::new() {
                    Ok(clipboard) => Some(clipboard),
                    Err(err) => {
                        tracing::debug!(error = %err, "system clipboard unavailable");
                        None
                    }
                };
                for (text, done) in rx {
                    done(set_text(clipboard.as_mut(), text));
                }
            });
        match handle {
            Ok(handle) => Self {
                requests: Some(requests),
                handle: Some(handle),
            },
            Err(err) => {
                tracing::warn!(error = %err, "couldn't start clipboard thread");
                Self {
                    requests: None,
                    handle: None,
                }
            }
        }
    }

    /// Queue `text` for the system clipboard; `done` runs on the clipboard
    /// thread with the outcome.
    pub fn copy(&self, text: String, done: impl FnOnce(Result<()>) + Send + 'static) {
        let Some(requests) = &self.requests else {
            done(Err(anyhow!("System clipboard unavailable")));
            return;
        };
        if let Err(SendError((_, done))) = requests.send((text, Box::new(done))) {
            done(Err(anyhow!("System clipboard unavailable")));
        }
    }
}

impl Drop for SystemClipboard {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("running", &self.requests.is_some())
            .finish_non_exhaustive()
    }
}

fn set_text(clipboard: Option<&mut arboard::Clipboard>, text: String) -> Result<()> {
    let Some(clipboard) = clipboard else {
        bail!("System clipboard unavailable");
    };
    clipboard
        .set_text(text)
        .context("Failed to set clipboard text")
}

/// Combine the two copy mechanisms: the copy worked if either one did.
///
/// # Errors
/// Returns an error only when both mechanisms failed.
pub fn copy_outcome(osc: std::io::Result<()>, system: Result<()>) -> Result<()> {
    if let Err(err) = &osc {
        tracing::debug!(error = %err, "OSC 52 copy failed");
    }
    if let Err(err) = &system {
        tracing::debug!(error = %err, "system clipboard copy failed");
    }

    match (osc, system) {
        (Err(osc_err), Err(system_err)) => {
            bail!("Couldn't copy contents: {osc_err}; {system_err:#}")
        }
        _ => Ok(()),
    }
}
