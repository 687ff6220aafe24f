use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use super::style::Palette;

const HELP_INDENT: &str = "  ";

const LEFT_COLUMN: &[&str] = &[
    "k/↑      up                  ",
    "j/↓      down                ",
    "b/pgup   page up             ",
    "f/pgdn   page down           ",
    "u        ½ page up           ",
    "d        ½ page down         ",
];

const RIGHT_COLUMN: &[&str] = &[
    "g/home  go to top",
    "G/end   go to bottom",
    "n/→     next slide",
    "p/←     previous slide",
    "c       copy contents",
    "e       edit this document",
    "r       reload this document",
    "esc     back",
    "q       quit",
];

/// Rows the help view occupies below the status bar.
pub fn help_height() -> u16 {
    u16::try_from(help_rows().len()).unwrap_or(u16::MAX)
}

/// The two-column key reference, starting with a blank spacer row.
fn help_rows() -> Vec<String> {
    let mut rows = vec![String::new()];
    for (i, right) in RIGHT_COLUMN.iter().enumerate() {
        let left = LEFT_COLUMN
            .get(i)
            .copied()
            .unwrap_or("                             ");
        rows.push(format!("{HELP_INDENT}{left}{right}"));
    }
    rows
}

/// Help rows padded to `width` so the background covers the whole area.
pub fn help_lines(width: u16, palette: &Palette) -> Vec<Line<'static>> {
    help_rows()
        .into_iter()
        .map(|row| {
            let fill = usize::from(width).saturating_sub(row.width());
            Line::from(Span::styled(
                format!("{row}{}", " ".repeat(fill)),
                palette.help_view,
            ))
        })
        .collect()
}

pub fn render_help_view(palette: &Palette, frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(help_lines(area.width, palette)).style(palette.help_view);
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_height_counts_spacer_row() {
        assert_eq!(usize::from(help_height()), RIGHT_COLUMN.len() + 1);
    }

    #[test]
    fn test_help_rows_pair_columns() {
        let rows = help_rows();
        assert!(rows[0].is_empty());
        assert!(rows[1].starts_with("  k/↑"));
        assert!(rows[1].ends_with("g/home  go to top"));
        assert!(rows.last().is_some_and(|row| row.trim() == "q       quit"));
    }

    #[test]
    fn test_help_lines_are_padded_to_width() {
        for line in help_lines(80, &Palette::default()) {
            assert_eq!(line.width(), 80);
        }
    }
}
