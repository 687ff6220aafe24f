use std::path::PathBuf;

use ratatui::text::Text;

use crate::app::Model;
use crate::app::model::DisplayMode;
use crate::document::Document;
use crate::render::RenderRequest;

/// All possible events and actions in the pager.
///
/// These represent user input, window events, and completions of background
/// work.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Navigation
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    /// Scroll up one page
    PageUp,
    /// Scroll down one page
    PageDown,
    /// Scroll up half page
    HalfPageUp,
    /// Scroll down half page
    HalfPageDown,
    /// Go to beginning of document
    GoToTop,
    /// Go to end of document
    GoToBottom,

    // Slides
    NextSlide,
    PreviousSlide,

    // Actions
    /// Toggle help view
    ToggleHelp,
    /// Copy the raw document body
    CopyContents,
    /// Open the document in an external editor
    OpenEditor,
    /// Read the document from disk again
    Reload,
    /// Dismiss a transient message, or leave the pager
    Back,

    // Background completions
    /// A document finished loading
    DocumentLoaded(Document),
    /// Loading the document failed
    LoadFailed(String),
    /// A render request finished
    ContentRendered { seq: u64, content: Text<'static> },
    /// A render request failed
    RenderFailed { seq: u64, error: String },
    /// The watched file was written or recreated
    FileChanged,
    /// The external editor exited
    EditorFinished(Result<(), String>),
    /// A copy finished
    CopyFinished(Result<(), String>),
    /// A status message timer expired
    StatusMessageTimeout(u64),

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

/// Work requested by [`update`] and carried out by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Read a document from disk off the event path
    LoadDocument(PathBuf),
    /// Render off the event path
    Render(RenderRequest),
    /// Watch a document for changes, keeping a live session for the same path
    Watch(PathBuf),
    /// Stop watching
    Unwatch,
    /// Restart the status message timer for a message generation
    StartStatusTimer(u64),
    StopStatusTimer,
    /// Hand the terminal to the user's editor
    OpenEditor { path: PathBuf, line: usize },
    /// Copy text to the clipboard
    Copy(String),
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// Side effects are queued on the model as [`Effect`]s, never performed.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Navigation
        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => model.viewport.scroll_down(n),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),
        Message::HalfPageUp => model.viewport.half_page_up(),
        Message::HalfPageDown => model.viewport.half_page_down(),
        Message::GoToTop => model.viewport.go_to_top(),
        Message::GoToBottom => model.viewport.go_to_bottom(),

        // Slides
        Message::NextSlide => navigate_slide(&mut model, true),
        Message::PreviousSlide => navigate_slide(&mut model, false),

        // Actions
        Message::ToggleHelp => model.toggle_help(),
        Message::CopyContents => {
            if let Some(doc) = &model.document {
                let body = doc.body().to_string();
                model.push_effect(Effect::Copy(body));
            }
        }
        Message::OpenEditor => {
            if let Some(doc) = &model.document {
                let path = doc.local_path().to_path_buf();
                let line = model.editor_line();
                tracing::info!(
                    file = %path.display(),
                    line = format_args!("{line}/{}", model.viewport.total_lines()),
                    "opening editor"
                );
                model.push_effect(Effect::OpenEditor { path, line });
            }
        }
        Message::Reload | Message::FileChanged => reload(&mut model),
        Message::Back => {
            if model.mode == DisplayMode::TransientMessage {
                model.mode = DisplayMode::Browse;
            } else {
                model.unload();
                model.should_quit = true;
            }
        }

        // Background completions
        Message::DocumentLoaded(document) => {
            tracing::debug!(note = document.note(), bytes = document.body().len(), "document loaded");
            let body = document.body().to_string();
            model.document = Some(document);
            model.slides = None;
            model.viewport.go_to_top();
            model.request_render(body);
        }
        Message::LoadFailed(error) => {
            tracing::warn!(%error, "couldn't reload document");
            model.show_status_message(format!("Couldn't reload: {error}"));
        }
        Message::ContentRendered { seq, content } => {
            if !model.is_latest_render(seq) {
                tracing::debug!(seq, latest = model.render_seq, "discarding stale render");
                return model;
            }
            tracing::info!(seq, lines = content.lines.len(), mode = ?model.mode, "content rendered");
            model.viewport.set_content(content);
            if model.reset_scroll {
                model.viewport.go_to_top();
                model.reset_scroll = false;
            }
            if let Some(doc) = &model.document {
                let path = doc.local_path().to_path_buf();
                model.push_effect(Effect::Watch(path));
            }
        }
        Message::RenderFailed { seq, error } => {
            tracing::error!(seq, %error, "error rendering document");
        }
        Message::EditorFinished(result) => {
            if let Err(error) = result {
                tracing::error!(%error, "editor failed");
            }
            reload(&mut model);
        }
        Message::CopyFinished(result) => match result {
            Ok(()) => model.show_status_message("Copied contents"),
            Err(error) => tracing::warn!(%error, "copy failed"),
        },
        Message::StatusMessageTimeout(generation) => {
            if generation == model.status_generation
                && model.mode == DisplayMode::TransientMessage
            {
                model.mode = DisplayMode::Browse;
            }
        }

        // Window
        Message::Resize(width, height) => {
            model.set_size(width, height);
            model.ensure_slides();
            model.render_current();
        }

        // Application
        Message::Quit => {
            model.unload();
            model.should_quit = true;
        }
    }

    model
}

fn navigate_slide(model: &mut Model, forward: bool) {
    model.ensure_slides();
    let Some(deck) = model.slides.as_mut() else {
        tracing::debug!("no slides found for navigation");
        return;
    };
    let moved = if forward { deck.next() } else { deck.previous() };
    if !moved {
        tracing::debug!(forward, "already at the edge of the deck");
        return;
    }
    tracing::debug!(
        slide = deck.current_index() + 1,
        total = deck.len(),
        "navigating slides"
    );
    let text = deck.current().to_string();
    model.reset_scroll = true;
    model.request_render(text);
}

fn reload(model: &mut Model) {
    model.slides = None;
    if let Some(doc) = &model.document {
        let path = doc.local_path().to_path_buf();
        model.push_effect(Effect::LoadDocument(path));
    }
}
