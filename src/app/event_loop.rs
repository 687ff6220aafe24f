use std::io::stdout;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::effects::EffectRunner;
use crate::app::{App, Message, Model, input, update};
use crate::document::Document;
use crate::render::TermRenderer;
use crate::timer::STATUS_MESSAGE_TIMEOUT;

/// How long to wait for terminal input before checking background messages.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read, the terminal cannot
    /// be initialized, or terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        let document = Document::load(&self.file_path)?;

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; mdpager requires an interactive terminal")?;
        if self.mouse_enabled {
            execute!(stdout(), EnableMouseCapture)?;
        }
        let size = terminal.size()?;

        let (tx, rx) = mpsc::channel();
        let mut runner = EffectRunner::new(
            tx,
            Arc::new(TermRenderer),
            STATUS_MESSAGE_TIMEOUT,
            self.mouse_enabled,
        );

        let mut model = Model::new((size.width, size.height), self.style, self.presentation);
        model = update(model, Message::DocumentLoaded(document));
        model = update(model, Message::Resize(size.width, size.height));

        let result = self.event_loop(&mut terminal, &mut model, &mut runner, &rx);

        // Stop background work before handing the terminal back.
        drop(runner);
        if self.mouse_enabled {
            let _ = execute!(stdout(), DisableMouseCapture);
        }
        ratatui::restore();

        result
    }

    fn event_loop(
        &self,
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        runner: &mut EffectRunner,
        rx: &Receiver<Message>,
    ) -> Result<()> {
        let mut needs_render = true;

        loop {
            if Self::run_effects(model, runner) {
                terminal.clear()?;
                needs_render = true;
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }

            if event::poll(POLL_INTERVAL)? {
                if let Some(msg) = input::handle_event(&event::read()?, self.mouse_enabled) {
                    tracing::trace!(?msg, "input");
                    *model = update(std::mem::take(model), msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::ZERO)? {
                    if let Some(msg) = input::handle_event(&event::read()?, self.mouse_enabled) {
                        *model = update(std::mem::take(model), msg);
                        needs_render = true;
                    }
                }
            }

            while let Ok(msg) = rx.try_recv() {
                *model = update(std::mem::take(model), msg);
                needs_render = true;
            }
        }
        Ok(())
    }

    /// Drain queued effects. Returns true if the screen must be redrawn
    /// from scratch.
    fn run_effects(model: &mut Model, runner: &mut EffectRunner) -> bool {
        let mut full_redraw = false;
        for effect in model.take_effects() {
            full_redraw |= runner.run(effect);
        }
        full_redraw
    }
}
