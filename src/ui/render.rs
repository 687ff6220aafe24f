use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::app::{DisplayMode, Model, STATUS_BAR_HEIGHT};

use super::overlays::{help_height, render_help_view};
use super::status::{StatusBar, render_status_bar};

/// Split the frame into document, status bar and (optional) help areas.
pub fn layout(area: Rect, help_visible: bool) -> (Rect, Rect, Option<Rect>) {
    let help_rows = if help_visible {
        help_height().min(area.height.saturating_sub(STATUS_BAR_HEIGHT))
    } else {
        0
    };
    let doc_height = area
        .height
        .saturating_sub(STATUS_BAR_HEIGHT)
        .saturating_sub(help_rows);
    let doc_area = Rect {
        height: doc_height,
        ..area
    };
    let status_area = Rect {
        y: area.y + doc_height,
        height: STATUS_BAR_HEIGHT.min(area.height),
        ..area
    };
    let help_area = help_visible.then(|| Rect {
        y: status_area.y + status_area.height,
        height: help_rows,
        ..area
    });
    (doc_area, status_area, help_area)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let (doc_area, status_area, help_area) = layout(frame.area(), model.help_visible);
    let palette = model.style.palette;

    let content = Paragraph::new(model.viewport.visible_lines().to_vec());
    frame.render_widget(Clear, doc_area);
    frame.render_widget(content, doc_area);

    let note = model.status_note();
    let status = StatusBar {
        note: &note,
        message: model.mode == DisplayMode::TransientMessage,
        scroll_percent: model.viewport.scroll_percent(),
    };
    render_status_bar(&status, &palette, frame, status_area);

    if let Some(help_area) = help_area {
        render_help_view(&palette, frame, help_area);
    }
}
