//! Syntax highlighting for code blocks.
//!
//! Uses syntect for highlighting with Sublime Text syntax definitions.

use std::sync::OnceLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::ui::style::Background;

/// Highlight `code` as `language`, one [`Line`] per source line.
///
/// Unknown languages fall back to `plain` styling.
pub fn highlight_code(
    language: Option<&str>,
    code: &str,
    background: Background,
    plain: Style,
) -> Vec<Line<'static>> {
    let syntax_set = syntax_set();
    let syntax = language
        .filter(|lang| !lang.is_empty())
        .and_then(|lang| {
            syntax_set
                .find_syntax_by_token(lang)
                .or_else(|| syntax_set.find_syntax_by_name(lang))
                .or_else(|| syntax_set.find_syntax_by_extension(lang))
        });

    let Some(syntax) = syntax else {
        return code
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), plain)))
            .collect();
    };

    let mut highlighter = HighlightLines::new(syntax, theme(background));
    let mut lines = Vec::new();
    for line in LinesWithEndings::from(code) {
        let Ok(ranges) = highlighter.highlight_line(line, syntax_set) else {
            lines.push(Line::from(Span::styled(
                line.trim_end_matches(['\n', '\r']).to_string(),
                plain,
            )));
            continue;
        };
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .map(|(style, text)| (style, text.trim_end_matches(['\n', '\r'])))
            .filter(|(_, text)| !text.is_empty())
            .map(|(style, text)| {
                let (r, g, b) = adjust_fg_for_background(
                    (style.foreground.r, style.foreground.g, style.foreground.b),
                    background,
                );
                Span::styled(text.to_string(), Style::default().fg(Color::Rgb(r, g, b)))
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

fn theme(background: Background) -> &'static Theme {
    static DARK: OnceLock<Theme> = OnceLock::new();
    static LIGHT: OnceLock<Theme> = OnceLock::new();
    let (cell, preferred) = match background {
        Background::Dark => (
            &DARK,
            [
                "Monokai Extended",
                "Dracula",
                "Solarized (dark)",
                "base16-ocean.dark",
            ]
            .as_slice(),
        ),
        Background::Light => (
            &LIGHT,
            ["InspiredGitHub", "Solarized (light)", "base16-ocean.light"].as_slice(),
        ),
    };
    cell.get_or_init(|| {
        let themes = &theme_set().themes;
        preferred
            .iter()
            .find_map(|name| themes.get(*name))
            .or_else(|| themes.values().next())
            .cloned()
            .unwrap_or_default()
    })
}

/// Darken bright foregrounds on light terminals so they stay readable.
fn adjust_fg_for_background(color: (u8, u8, u8), background: Background) -> (u8, u8, u8) {
    match background {
        Background::Dark => color,
        Background::Light => {
            let (r, g, b) = color;
            let luma = 0.0722f32.mul_add(
                f32::from(b),
                0.2126f32.mul_add(f32::from(r), 0.7152 * f32::from(g)),
            );
            if luma < 155.0 {
                return color;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let darken = |c: u8| (f32::from(c) * 0.42).round() as u8;
            (darken(r), darken(g), darken(b))
        }
    }
}
