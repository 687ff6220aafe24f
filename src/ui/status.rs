use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::render::truncate_line;

use super::style::Palette;

pub const LOGO: &str = " mdpager ";
pub const HELP_NOTE: &str = " ? Help ";

/// Everything the status bar shows.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBar<'a> {
    /// Document note plus slide indicator, or the transient message.
    pub note: &'a str,
    /// Whether a transient message is showing.
    pub message: bool,
    /// Scroll position in `[0, 1]`.
    pub scroll_percent: f64,
}

impl StatusBar<'_> {
    /// Compose the bar for a terminal `width` columns wide.
    pub fn line(&self, width: u16, palette: &Palette) -> Line<'static> {
        let (note_style, scroll_style, help_style) = if self.message {
            (palette.message, palette.message_scroll, palette.message_help)
        } else {
            (palette.status_note, palette.status_scroll, palette.status_help)
        };

        let logo = Span::styled(LOGO, palette.status_logo);
        let percent = Span::styled(
            format!(" {:>3.0}% ", self.scroll_percent.clamp(0.0, 1.0) * 100.0),
            scroll_style,
        );
        let help = Span::styled(HELP_NOTE, help_style);

        let width = usize::from(width);
        let fixed = logo.width() + percent.width() + help.width();
        let note = truncate_line(
            Line::from(Span::styled(format!(" {} ", self.note), note_style)),
            width.saturating_sub(fixed),
        );
        let padding = width.saturating_sub(fixed + note.width());

        let mut spans = vec![logo];
        spans.extend(note.spans);
        spans.push(Span::styled(" ".repeat(padding), note_style));
        spans.push(percent);
        spans.push(help);
        Line::from(spans)
    }
}

pub fn render_status_bar(status: &StatusBar<'_>, palette: &Palette, frame: &mut Frame, area: Rect) {
    let bar = Paragraph::new(status.line(area.width, palette));
    frame.render_widget(bar, area);
}
