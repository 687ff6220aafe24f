//! Render pipeline: raw document or slide text to styled, numbered lines.
//!
//! [`render_content`] is a pure function of a [`RenderRequest`]; the app runs
//! it off the event path and feeds the result back as a message.

pub mod markdown;

use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use thiserror::Error;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::document::{file_extension, is_markdown_file, wrap_code_block};
use crate::ui::style::Palette;

pub use markdown::TermRenderer;

/// Width of the right-aligned line number column.
pub const LINE_NUMBER_WIDTH: usize = 4;

/// Default maximum word-wrap width for markdown.
pub const DEFAULT_MAX_WIDTH: u16 = 120;

const ELLIPSIS: &str = "…";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("error rendering markdown: {0}")]
    Engine(String),
    #[error("renderer panicked")]
    Panicked,
}

/// Immutable styling configuration, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleConfig {
    /// When false, text is passed through untouched.
    pub enabled: bool,
    pub max_width: u16,
    pub preserve_newlines: bool,
    pub show_line_numbers: bool,
    pub palette: Palette,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_width: DEFAULT_MAX_WIDTH,
            preserve_newlines: false,
            show_line_numbers: false,
            palette: Palette::default(),
        }
    }
}

/// Options handed to a [`MarkdownRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererOptions {
    /// Word-wrap width in columns; zero means unconstrained.
    pub word_wrap: usize,
    pub preserve_newlines: bool,
    /// The input is a source file wrapped in a fenced block.
    pub code: bool,
    pub palette: Palette,
}

/// A markdown rendering engine.
pub trait MarkdownRenderer: Send + Sync {
    /// Render markdown into styled lines.
    ///
    /// # Errors
    /// Returns an error if the engine cannot produce output.
    fn render(&self, text: &str, options: &RendererOptions) -> Result<Vec<Line<'static>>, RenderError>;
}

/// One unit of render work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Monotonic sequence number used to discard stale completions.
    pub seq: u64,
    /// Full document body or a single slide.
    pub text: String,
    /// Document note; its extension decides markdown versus code.
    pub note: String,
    /// Viewport width in columns.
    pub width: u16,
    pub style: StyleConfig,
}

/// Render a request into display-ready text.
///
/// # Errors
/// Returns an error if the renderer fails.
pub fn render_content(
    request: &RenderRequest,
    renderer: &dyn MarkdownRenderer,
) -> Result<Text<'static>, RenderError> {
    let style = &request.style;
    if !style.enabled {
        return Ok(passthrough(&request.text));
    }

    let is_code = !is_markdown_file(&request.note);
    let width = if is_code {
        0
    } else {
        usize::from(style.max_width.min(request.width))
    };
    let options = RendererOptions {
        word_wrap: width,
        preserve_newlines: style.preserve_newlines,
        code: is_code,
        palette: style.palette,
    };

    let mut lines = if is_code {
        let language = file_extension(&request.note).unwrap_or_default();
        let wrapped = wrap_code_block(&request.text, language);
        let mut lines = renderer.render(&wrapped, &options)?;
        trim_blank_edges(&mut lines);
        lines
    } else {
        renderer.render(&request.text, &options)?
    };

    if is_code || style.show_line_numbers {
        let max_cols = usize::from(request.width).saturating_sub(LINE_NUMBER_WIDTH);
        lines = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| number_line(i + 1, line, max_cols, style.palette.line_number))
            .collect();
    }

    Ok(Text::from(lines))
}

/// Wrap a body as unstyled text, one line per `\n`-separated line.
fn passthrough(text: &str) -> Text<'static> {
    Text::from(
        text.split('\n')
            .map(|line| Line::raw(line.to_string()))
            .collect::<Vec<_>>(),
    )
}

fn is_blank(line: &Line<'_>) -> bool {
    line.spans.iter().all(|span| span.content.trim().is_empty())
}

fn trim_blank_edges(lines: &mut Vec<Line<'static>>) {
    while lines.last().is_some_and(is_blank) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|line| is_blank(line)).count();
    lines.drain(..leading);
}

fn number_line(number: usize, line: Line<'static>, max_cols: usize, style: Style) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{number:>LINE_NUMBER_WIDTH$}"),
        style,
    )];
    spans.extend(truncate_line(line, max_cols).spans);
    Line::from(spans)
}

/// Cut a line to `max_cols` columns, ending it with an ellipsis when cut.
pub fn truncate_line(line: Line<'static>, max_cols: usize) -> Line<'static> {
    if line.width() <= max_cols {
        return line;
    }
    let budget = max_cols.saturating_sub(ELLIPSIS.width());
    let mut used = 0;
    let mut spans = Vec::new();
    let mut last_style = Style::default();
    for span in line.spans {
        last_style = span.style;
        let span_width = span.width();
        if used + span_width <= budget {
            used += span_width;
            spans.push(span);
            continue;
        }
        let mut cut = String::new();
        for ch in span.content.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if used + ch_width > budget {
                break;
            }
            used += ch_width;
            cut.push(ch);
        }
        if !cut.is_empty() {
            spans.push(Span::styled(cut, span.style));
        }
        break;
    }
    if max_cols > 0 {
        spans.push(Span::styled(ELLIPSIS, last_style));
    }
    Line::from(spans)
}

/// Plain text of rendered output, mostly for tests and logging.
pub fn plain_text(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes its input one line per line and records the options it saw.
    struct EchoRenderer {
        seen: std::sync::Mutex<Option<(String, RendererOptions)>>,
    }

    impl EchoRenderer {
        fn new() -> Self {
            Self {
                seen: std::sync::Mutex::new(None),
            }
        }

        fn seen(&self) -> (String, RendererOptions) {
            self.seen.lock().unwrap().clone().unwrap()
        }
    }

    impl MarkdownRenderer for EchoRenderer {
        fn render(&self, text: &str, options: &RendererOptions) -> Result<Vec<Line<'static>>, RenderError> {
            *self.seen.lock().unwrap() = Some((text.to_string(), *options));
            Ok(text.split('\n').map(|l| Line::raw(l.to_string())).collect())
        }
    }

    struct FailingRenderer;

    impl MarkdownRenderer for FailingRenderer {
        fn render(&self, _text: &str, _options: &RendererOptions) -> Result<Vec<Line<'static>>, RenderError> {
            Err(RenderError::Engine("bad style".to_string()))
        }
    }

    fn request(text: &str, note: &str, width: u16) -> RenderRequest {
        RenderRequest {
            seq: 1,
            text: text.to_string(),
            note: note.to_string(),
            width,
            style: StyleConfig::default(),
        }
    }

    #[test]
    fn test_disabled_rendering_passes_text_through() {
        let mut req = request("# Title\n\nbody\n", "doc.md", 80);
        req.style.enabled = false;
        req.style.show_line_numbers = true;
        let out = render_content(&req, &FailingRenderer).unwrap();
        assert_eq!(plain_text(&out), "# Title\n\nbody\n");
    }

    #[test]
    fn test_disabled_rendering_passes_code_through() {
        let mut req = request("fn main() {}", "main.rs", 80);
        req.style.enabled = false;
        let out = render_content(&req, &FailingRenderer).unwrap();
        assert_eq!(plain_text(&out), "fn main() {}");
    }

    #[test]
    fn test_markdown_width_is_bounded_by_max_width() {
        let renderer = EchoRenderer::new();
        let mut req = request("text", "doc.md", 200);
        req.style.max_width = 100;
        render_content(&req, &renderer).unwrap();
        assert_eq!(renderer.seen().1.word_wrap, 100);

        let req = request("text", "doc.md", 60);
        render_content(&req, &renderer).unwrap();
        assert_eq!(renderer.seen().1.word_wrap, 60);
    }

    #[test]
    fn test_code_is_fenced_unwrapped_and_numbered() {
        let renderer = EchoRenderer::new();
        let req = request("fn main() {}", "main.rs", 80);
        let out = render_content(&req, &renderer).unwrap();

        let (seen_text, seen_options) = renderer.seen();
        assert_eq!(seen_text, "```rs\nfn main() {}\n```");
        assert_eq!(seen_options.word_wrap, 0);
        assert!(seen_options.code);

        let text = plain_text(&out);
        assert_eq!(text.lines().next(), Some("   1```rs"));
    }

    #[test]
    fn test_dotfile_is_fenced_with_its_name() {
        let renderer = EchoRenderer::new();
        render_content(&request("export A=1", ".bashrc", 80), &renderer).unwrap();
        let (seen_text, seen_options) = renderer.seen();
        assert_eq!(seen_text, "```bashrc\nexport A=1\n```");
        assert!(seen_options.code);
    }

    #[test]
    fn test_code_output_trims_blank_edges() {
        let out = render_content(&request("x = 1\n\n\n", "a.py", 80), &TermRenderer).unwrap();
        assert_eq!(out.lines.len(), 1);
        assert!(plain_text(&out).starts_with("   1"));
    }

    #[test]
    fn test_markdown_is_not_numbered_by_default() {
        let out = render_content(&request("a\nb", "doc.md", 80), &EchoRenderer::new()).unwrap();
        assert_eq!(plain_text(&out), "a\nb");
    }

    #[test]
    fn test_markdown_line_numbers_when_configured() {
        let mut req = request("a\nb", "doc.md", 80);
        req.style.show_line_numbers = true;
        let out = render_content(&req, &EchoRenderer::new()).unwrap();
        assert_eq!(plain_text(&out), "   1a\n   2b");
    }

    #[test]
    fn test_numbered_lines_are_truncated_with_ellipsis() {
        let mut req = request("abcdefghijkl", "doc.md", 10);
        req.style.show_line_numbers = true;
        let out = render_content(&req, &EchoRenderer::new()).unwrap();
        assert_eq!(plain_text(&out), "   1abcde…");
        assert_eq!(out.lines[0].width(), 10);
    }

    #[test]
    fn test_renderer_error_propagates() {
        let result = render_content(&request("x", "doc.md", 80), &FailingRenderer);
        assert!(matches!(result, Err(RenderError::Engine(_))));
    }

    #[test]
    fn test_truncate_line_keeps_short_lines() {
        let line = Line::raw("short");
        assert_eq!(truncate_line(line.clone(), 10), line);
    }

    #[test]
    fn test_truncate_line_across_spans() {
        let line = Line::from(vec![Span::raw("abc"), Span::raw("defgh")]);
        let cut = truncate_line(line, 6);
        let text: String = cut.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "abcde…");
    }

    #[test]
    fn test_term_renderer_end_to_end() {
        let out = render_content(&request("# 1 Intro\n\nHello", "talk.md", 80), &TermRenderer).unwrap();
        let text = plain_text(&out);
        assert!(text.contains("1 Intro"));
        assert!(text.contains("Hello"));
    }
}
