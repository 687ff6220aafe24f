// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. render::RenderRequest)
    clippy::module_name_repetitions
)]

//! # mdpager
//!
//! A terminal pager for markdown and source files.
//!
//! mdpager shows a single document with:
//! - Markdown rendering and syntax-highlighted code
//! - Presentation mode, paging through numbered `# N` headers as slides
//! - Live reload when the file changes on disk
//! - Editor hand-off and clipboard copy
//!
//! ## Architecture
//!
//! mdpager uses The Elm Architecture (TEA) pattern:
//! - **Model**: Pager state
//! - **Message**: Input events and background completions
//! - **Update**: Pure state transitions that queue effects
//! - **View**: Render to terminal
//!
//! Rendering, loading, file watching and the status message timer run off
//! the event path and report back as messages.
//!
//! ## Modules
//!
//! - [`app`]: Pager state, update function and event loop
//! - [`document`]: Loading documents and splitting slides
//! - [`render`]: Render pipeline and markdown engine
//! - [`highlight`]: Syntax highlighting
//! - [`ui`]: Terminal UI components
//! - [`watcher`]: File watching
//! - [`timer`]: Transient status message timer
//! - [`editor`]: External editor launch
//! - [`clipboard`]: OSC 52 and system clipboard copy
//! - [`config`]: Command-line and config file flags

pub mod app;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod editor;
pub mod highlight;
pub mod render;
pub mod timer;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{Document, SlideDeck};
    pub use crate::render::{RenderRequest, StyleConfig};
    pub use crate::ui::viewport::Viewport;
}
