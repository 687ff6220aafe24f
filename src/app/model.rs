use crate::document::{Document, SlideDeck};
use crate::render::{RenderRequest, StyleConfig};
use crate::ui::overlays::help_height;
use crate::ui::viewport::Viewport;

use super::update::Effect;

/// Rows taken by the status bar.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// What the status bar is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Document note and slide indicator.
    #[default]
    Browse,
    /// A short-lived status message.
    TransientMessage,
}

/// The complete pager state.
///
/// All state lives here and is only changed by [`update`](super::update).
/// Work that has to happen outside the update function is queued as
/// [`Effect`]s and drained by the event loop.
#[derive(Debug, Default)]
pub struct Model {
    /// The open document, if any
    pub document: Option<Document>,
    /// Viewport holding the rendered content
    pub viewport: Viewport,
    /// Rendering configuration, fixed at startup
    pub style: StyleConfig,
    /// Whether numbered headers split the document into slides
    pub presentation: bool,
    pub mode: DisplayMode,
    /// Text shown while in [`DisplayMode::TransientMessage`]
    pub status_message: String,
    /// Whether the help view is shown under the status bar
    pub help_visible: bool,
    /// Slides of the current body, built lazily
    pub slides: Option<SlideDeck>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Zero the offset when the next render lands
    pub(super) reset_scroll: bool,
    /// Full terminal size
    pub(super) terminal_size: (u16, u16),
    /// Sequence number of the newest render request
    pub(super) render_seq: u64,
    /// Generation of the newest status message
    pub(super) status_generation: u64,
    effects: Vec<Effect>,
}

impl Model {
    /// Create an empty model for a terminal of `terminal_size`.
    pub fn new(terminal_size: (u16, u16), style: StyleConfig, presentation: bool) -> Self {
        let mut model = Self {
            style,
            presentation,
            ..Self::default()
        };
        model.set_size(terminal_size.0, terminal_size.1);
        model
    }

    /// Take the effects queued by the last updates.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub(super) fn push_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Lay the viewport out for a terminal of `width` x `height`.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        let mut viewport_height = height.saturating_sub(STATUS_BAR_HEIGHT);
        if self.help_visible {
            viewport_height = viewport_height.saturating_sub(help_height());
        }
        self.viewport.resize(width, viewport_height);
    }

    /// Show or hide the help view, keeping the viewport pinned to the end if
    /// it was there.
    pub fn toggle_help(&mut self) {
        let was_at_bottom = self.viewport.at_bottom();
        self.help_visible = !self.help_visible;
        let (width, height) = self.terminal_size;
        self.set_size(width, height);
        if was_at_bottom {
            self.viewport.go_to_bottom();
        }
    }

    /// Switch to a transient message and restart the expiry timer.
    pub fn show_status_message(&mut self, message: impl Into<String>) {
        self.mode = DisplayMode::TransientMessage;
        self.status_message = message.into();
        self.status_generation += 1;
        self.push_effect(Effect::StartStatusTimer(self.status_generation));
    }

    /// Status bar note: the transient message, or the document note with
    /// the slide indicator.
    pub fn status_note(&self) -> String {
        if self.mode == DisplayMode::TransientMessage {
            return self.status_message.clone();
        }
        let mut note = self
            .document
            .as_ref()
            .map(|doc| doc.note().to_string())
            .unwrap_or_default();
        if let Some(deck) = &self.slides {
            note.push_str(&deck.indicator());
        }
        note
    }

    /// Build the slide deck if it is missing and the body allows one.
    pub(super) fn ensure_slides(&mut self) {
        if self.slides.is_some() {
            return;
        }
        if let Some(doc) = self.document.as_ref().filter(|doc| !doc.body().is_empty()) {
            self.slides = SlideDeck::from_body(doc.body(), self.presentation);
        }
    }

    /// Text currently on display: the active slide, or the whole body.
    pub fn current_text(&self) -> Option<&str> {
        if let Some(deck) = &self.slides {
            return Some(deck.current());
        }
        self.document.as_ref().map(Document::body)
    }

    /// Queue a render of `text` and return its sequence number.
    pub(super) fn request_render(&mut self, text: String) -> Option<u64> {
        let note = self.document.as_ref()?.note().to_string();
        self.render_seq += 1;
        self.push_effect(Effect::Render(RenderRequest {
            seq: self.render_seq,
            text,
            note,
            width: self.viewport.width(),
            style: self.style,
        }));
        Some(self.render_seq)
    }

    /// Queue a render of whatever is current.
    pub(super) fn render_current(&mut self) -> Option<u64> {
        let text = self.current_text()?.to_string();
        self.request_render(text)
    }

    /// Whether a render completion is the newest one requested.
    pub const fn is_latest_render(&self, seq: u64) -> bool {
        seq == self.render_seq
    }

    /// Line to open the editor at, from the scroll position.
    pub fn editor_line(&self) -> usize {
        if self.viewport.at_top() {
            return 0;
        }
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let line = (self.viewport.total_lines() as f64 * self.viewport.scroll_percent())
            .round_ties_even() as usize;
        line
    }

    /// Close the document: stop background work and clear all view state.
    pub fn unload(&mut self) {
        tracing::debug!("unload");
        if self.help_visible {
            self.toggle_help();
        }
        self.push_effect(Effect::StopStatusTimer);
        self.mode = DisplayMode::Browse;
        self.viewport.clear();
        self.push_effect(Effect::Unwatch);
        self.slides = None;
        self.reset_scroll = false;
        self.document = None;
    }
}
