use std::io::stdout;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

use crate::app::Message;
use crate::app::update::Effect;
use crate::clipboard::{SystemClipboard, copy_outcome, write_osc52};
use crate::document::Document;
use crate::render::{MarkdownRenderer, RenderError, RenderRequest, render_content};
use crate::timer::StatusTimer;
use crate::watcher::WatchSession;

/// Carries out [`Effect`]s and owns the background handles they create.
///
/// Completions are posted back on `tx` as ordinary messages. At most one
/// watch session and one status timer exist at a time.
pub(super) struct EffectRunner {
    tx: Sender<Message>,
    renderer: Arc<dyn MarkdownRenderer>,
    watch: Option<WatchSession>,
    timer: Option<StatusTimer>,
    clipboard: SystemClipboard,
    status_timeout: Duration,
    mouse_enabled: bool,
}

impl EffectRunner {
    pub(super) fn new(
        tx: Sender<Message>,
        renderer: Arc<dyn MarkdownRenderer>,
        status_timeout: Duration,
        mouse_enabled: bool,
    ) -> Self {
        Self {
            tx,
            renderer,
            watch: None,
            timer: None,
            clipboard: SystemClipboard::start(),
            status_timeout,
            mouse_enabled,
        }
    }

    /// Carry out `effect`. Returns true when the screen was handed away and
    /// must be redrawn from scratch.
    pub(super) fn run(&mut self, effect: Effect) -> bool {
        match effect {
            Effect::LoadDocument(path) => self.load_document(path),
            Effect::Render(request) => self.render(request),
            Effect::Watch(path) => self.watch(path),
            Effect::Unwatch => self.unwatch(),
            Effect::StartStatusTimer(generation) => self.start_status_timer(generation),
            Effect::StopStatusTimer => self.stop_status_timer(),
            Effect::OpenEditor { path, line } => {
                // Blocks on purpose: the editor owns the terminal until it exits.
                let result = self.open_editor(&path, line);
                self.send(Message::EditorFinished(result.map_err(|err| format!("{err:#}"))));
                return true;
            }
            Effect::Copy(text) => self.copy(text),
        }
        false
    }

    fn send(&self, msg: Message) {
        let _ = self.tx.send(msg);
    }

    fn load_document(&self, path: PathBuf) {
        let tx = self.tx.clone();
        spawn_worker("mdpager-load", move || {
            let msg = match Document::load(&path) {
                Ok(document) => Message::DocumentLoaded(document),
                Err(err) => Message::LoadFailed(format!("{err:#}")),
            };
            let _ = tx.send(msg);
        });
    }

    fn render(&self, request: RenderRequest) {
        let tx = self.tx.clone();
        let renderer = Arc::clone(&self.renderer);
        spawn_worker("mdpager-render", move || {
            let _ = tx.send(render_message(&request, renderer.as_ref()));
        });
    }

    /// Keep a live session for the same document; replace anything else.
    fn watch(&mut self, path: PathBuf) {
        if self
            .watch
            .as_ref()
            .is_some_and(|session| session.target() == path.as_path() && !session.is_finished())
        {
            return;
        }
        self.unwatch();

        let tx = self.tx.clone();
        match WatchSession::start(&path, move || {
            let _ = tx.send(Message::FileChanged);
        }) {
            Ok(session) => {
                tracing::info!(file = %path.display(), "watching document");
                self.watch = Some(session);
            }
            Err(err) => {
                tracing::error!(file = %path.display(), error = %err, "couldn't watch document");
            }
        }
    }

    fn copy(&self, text: String) {
        let osc = write_osc52(&mut stdout(), &text);
        let tx = self.tx.clone();
        self.clipboard.copy(text, move |system| {
            let result = copy_outcome(osc, system).map_err(|err| format!("{err:#}"));
            let _ = tx.send(Message::CopyFinished(result));
        });
    }

    fn unwatch(&mut self) {
        if let Some(session) = self.watch.take() {
            session.stop();
        }
    }

    fn start_status_timer(&mut self, generation: u64) {
        self.stop_status_timer();
        let tx = self.tx.clone();
        self.timer = Some(StatusTimer::start(self.status_timeout, move || {
            let _ = tx.send(Message::StatusMessageTimeout(generation));
        }));
    }

    fn stop_status_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
    }

    /// Hand the terminal to the editor and take it back afterwards.
    fn open_editor(&self, path: &Path, line: usize) -> Result<()> {
        if self.mouse_enabled {
            execute!(stdout(), DisableMouseCapture)?;
        }
        disable_raw_mode()?;
        execute!(stdout(), LeaveAlternateScreen)?;

        let result = crate::editor::open(path, line);

        execute!(stdout(), EnterAlternateScreen)?;
        enable_raw_mode()?;
        if self.mouse_enabled {
            execute!(stdout(), EnableMouseCapture)?;
        }
        result
    }

    #[cfg(test)]
    pub(super) fn is_watching(&self, path: &Path) -> bool {
        self.watch
            .as_ref()
            .is_some_and(|session| session.target() == path && !session.is_finished())
    }

    #[cfg(test)]
    pub(super) const fn has_timer(&self) -> bool {
        self.timer.is_some()
    }
}

/// Run one render, turning errors and panics into a failure message.
pub(super) fn render_message(request: &RenderRequest, renderer: &dyn MarkdownRenderer) -> Message {
    let seq = request.seq;
    match catch_unwind(AssertUnwindSafe(|| render_content(request, renderer))) {
        Ok(Ok(content)) => Message::ContentRendered { seq, content },
        Ok(Err(err)) => Message::RenderFailed {
            seq,
            error: err.to_string(),
        },
        Err(_) => Message::RenderFailed {
            seq,
            error: RenderError::Panicked.to_string(),
        },
    }
}

fn spawn_worker(name: &str, work: impl FnOnce() + Send + 'static) {
    if let Err(err) = std::thread::Builder::new()
        .name(name.to_string())
        .spawn(work)
    {
        tracing::error!(worker = name, error = %err, "couldn't spawn worker thread");
    }
}
