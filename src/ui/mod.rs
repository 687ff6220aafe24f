//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Rendered content, scroll position and visible range
//! - [`style`]: Theming and colors
//! - [`status`]: The status bar
//! - [`overlays`]: The help view

pub mod overlays;
pub mod status;
pub mod style;
pub mod viewport;

mod render;

pub use render::{layout, render};

#[cfg(test)]
mod tests;
