//! Theming and color definitions.
//!
//! A [`Palette`] is built once from the terminal [`Background`] and passed
//! explicitly to everything that styles output.

use ratatui::style::{Color, Modifier, Style};

/// Terminal background brightness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Background {
    #[default]
    Dark,
    Light,
}

impl Background {
    /// Guess the background from the `COLORFGBG` convention (`fg;bg`).
    pub fn from_colorfgbg(colorfgbg: Option<&str>) -> Self {
        let Some(value) = colorfgbg else {
            return Self::Dark;
        };
        let bg_str = value.rsplit(';').next().unwrap_or(value);
        let Ok(bg) = bg_str.parse::<u8>() else {
            return Self::Dark;
        };

        // 7 and 9-15 are the light colors; 8 is bright black.
        if matches!(bg, 7 | 9..=15) { Self::Light } else { Self::Dark }
    }

    /// Detect from the environment.
    pub fn detect() -> Self {
        Self::from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
    }
}

const fn adaptive(background: Background, light: Color, dark: Color) -> Color {
    match background {
        Background::Light => light,
        Background::Dark => dark,
    }
}

const fn rgb(hex: u32) -> Color {
    #[allow(clippy::cast_possible_truncation)]
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

const MINT_GREEN: Color = rgb(0x89_F0CB);
const DARK_GREEN: Color = rgb(0x1C_8760);
const GREEN: Color = rgb(0x04_B575);

/// Every style used by the pager chrome and the markdown renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Background,
    pub line_number: Style,
    pub status_note: Style,
    pub status_scroll: Style,
    pub status_help: Style,
    pub status_logo: Style,
    pub message: Style,
    pub message_scroll: Style,
    pub message_help: Style,
    pub help_view: Style,
    pub heading: Style,
    pub heading_primary: Style,
    pub emphasis: Style,
    pub strong: Style,
    pub strikethrough: Style,
    pub inline_code: Style,
    pub code_block: Style,
    pub link: Style,
    pub link_url: Style,
    pub block_quote: Style,
    pub list_marker: Style,
    pub rule: Style,
    pub table_border: Style,
}

impl Palette {
    pub const fn new(background: Background) -> Self {
        let note_fg = adaptive(background, rgb(0x65_6565), rgb(0x7D_7D7D));
        let bar_bg = adaptive(background, rgb(0xE6_E6E6), rgb(0x24_2424));
        Self {
            background,
            line_number: Style::new().fg(note_fg),
            status_note: Style::new().fg(note_fg).bg(bar_bg),
            status_scroll: Style::new()
                .fg(adaptive(background, rgb(0x94_9494), rgb(0x5A_5A5A)))
                .bg(bar_bg),
            status_help: Style::new()
                .fg(note_fg)
                .bg(adaptive(background, rgb(0xDC_DCDC), rgb(0x32_3232))),
            status_logo: Style::new()
                .fg(rgb(0xEC_FD65))
                .bg(rgb(0x6B_50FF))
                .add_modifier(Modifier::BOLD),
            message: Style::new().fg(MINT_GREEN).bg(DARK_GREEN),
            message_scroll: Style::new().fg(MINT_GREEN).bg(DARK_GREEN),
            message_help: Style::new().fg(rgb(0xB6_FFE4)).bg(GREEN),
            help_view: Style::new()
                .fg(note_fg)
                .bg(adaptive(background, rgb(0xF2_F2F2), rgb(0x1B_1B1B))),
            heading: Style::new()
                .fg(adaptive(background, Color::Indexed(24), Color::Indexed(39)))
                .add_modifier(Modifier::BOLD),
            heading_primary: Style::new()
                .fg(Color::Indexed(228))
                .bg(Color::Indexed(63))
                .add_modifier(Modifier::BOLD),
            emphasis: Style::new().add_modifier(Modifier::ITALIC),
            strong: Style::new().add_modifier(Modifier::BOLD),
            strikethrough: Style::new().add_modifier(Modifier::CROSSED_OUT),
            inline_code: Style::new()
                .fg(Color::Indexed(203))
                .bg(adaptive(background, Color::Indexed(254), Color::Indexed(236))),
            code_block: Style::new().fg(adaptive(background, Color::Indexed(242), Color::Indexed(244))),
            link: Style::new()
                .fg(Color::Indexed(30))
                .add_modifier(Modifier::UNDERLINED),
            link_url: Style::new().fg(Color::Indexed(35)),
            block_quote: Style::new().fg(Color::Indexed(245)),
            list_marker: Style::new().fg(adaptive(background, Color::Indexed(240), Color::Indexed(248))),
            rule: Style::new().fg(Color::Indexed(240)),
            table_border: Style::new().fg(Color::Indexed(240)),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Background::Dark)
    }
}
