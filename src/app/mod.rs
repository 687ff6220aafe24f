//! Pager state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete pager state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions, queueing [`Effect`]s
//! - [`App::run`]: Main event loop running effects and drawing frames

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use input::{handle_event, handle_key, handle_mouse};
pub use model::{DisplayMode, Model, STATUS_BAR_HEIGHT};
pub use update::{Effect, Message, update};

use std::path::PathBuf;

use crate::render::StyleConfig;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: PathBuf,
    style: StyleConfig,
    presentation: bool,
    mouse_enabled: bool,
}

impl App {
    /// Create a new application for the given file.
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            style: StyleConfig::default(),
            presentation: false,
            mouse_enabled: false,
        }
    }

    /// Set the rendering configuration.
    #[must_use]
    pub const fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }

    /// Enable or disable slide navigation on numbered headers.
    #[must_use]
    pub const fn with_presentation(mut self, enabled: bool) -> Self {
        self.presentation = enabled;
        self
    }

    /// Enable or disable mouse wheel scrolling.
    #[must_use]
    pub const fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }
}
