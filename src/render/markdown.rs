//! Markdown to styled terminal lines, built on comrak.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue};
use comrak::{Arena, Options, parse_document};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{MarkdownRenderer, RenderError, RendererOptions};
use crate::highlight::highlight_code;

const DOCUMENT_MARGIN: &str = "  ";
const CODE_MARGIN: &str = "  ";
const RULE_WIDTH: usize = 40;

/// The built-in terminal renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TermRenderer;

impl MarkdownRenderer for TermRenderer {
    fn render(&self, text: &str, options: &RendererOptions) -> Result<Vec<Line<'static>>, RenderError> {
        let arena = Arena::new();
        let mut comrak_options = Options::default();
        comrak_options.extension.strikethrough = true;
        comrak_options.extension.table = true;
        comrak_options.extension.autolink = true;
        comrak_options.extension.tasklist = true;
        comrak_options.extension.footnotes = true;
        comrak_options.extension.front_matter_delimiter = Some("---".to_string());
        let root = parse_document(&arena, text, &comrak_options);

        let margin = if options.code { " " } else { DOCUMENT_MARGIN };
        let mut indent = Indent::new(vec![Span::raw(margin)]);
        let mut writer = BlockWriter {
            options,
            lines: Vec::new(),
        };
        writer.children(root, &mut indent, false);
        Ok(writer.lines)
    }
}

/// Line prefix for the current block nesting.
///
/// `first` is the pending prefix for the next emitted line (a list marker),
/// consumed as soon as a line is written.
#[derive(Debug, Clone)]
struct Indent {
    first: Option<Vec<Span<'static>>>,
    rest: Vec<Span<'static>>,
}

impl Indent {
    const fn new(rest: Vec<Span<'static>>) -> Self {
        Self { first: None, rest }
    }

    fn take(&mut self) -> Vec<Span<'static>> {
        self.first.take().unwrap_or_else(|| self.rest.clone())
    }

    fn width(&self) -> usize {
        self.rest.iter().map(Span::width).sum()
    }

    fn nested(&mut self, first: Span<'static>, rest: Span<'static>) -> Self {
        let mut head = self.take();
        head.push(first);
        let mut tail = self.rest.clone();
        tail.push(rest);
        Self {
            first: Some(head),
            rest: tail,
        }
    }
}

struct BlockWriter<'o> {
    options: &'o RendererOptions,
    lines: Vec<Line<'static>>,
}

impl BlockWriter<'_> {
    fn wrap_width(&self, indent: &Indent) -> usize {
        if self.options.word_wrap == 0 {
            0
        } else {
            self.options.word_wrap.saturating_sub(indent.width()).max(1)
        }
    }

    fn push(&mut self, indent: &mut Indent, content: Vec<Span<'static>>) {
        let mut spans = indent.take();
        spans.extend(content);
        self.lines.push(Line::from(spans));
    }

    /// Separate blocks by one blank line, except directly after a list marker.
    fn gap(&mut self, indent: &Indent, tight: bool) {
        if tight || indent.first.is_some() {
            return;
        }
        let last_blank = self
            .lines
            .last()
            .is_none_or(|line| line.spans.iter().all(|s| s.content.trim().is_empty()));
        if !last_blank {
            let prefix: Vec<Span<'static>> = indent
                .rest
                .iter()
                .map(|s| Span::styled(s.content.trim_end().to_string(), s.style))
                .collect();
            self.lines.push(Line::from(prefix));
        }
    }

    fn children<'a>(&mut self, node: &'a AstNode<'a>, indent: &mut Indent, tight: bool) {
        for child in node.children() {
            self.block(child, indent, tight);
        }
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>, indent: &mut Indent, tight: bool) {
        let palette = self.options.palette;
        match &node.data.borrow().value {
            NodeValue::Document => self.children(node, indent, tight),
            NodeValue::FrontMatter(_) => {}

            NodeValue::Heading(heading) => {
                self.gap(indent, false);
                let text: Vec<Span<'static>> = collect_inlines(node, Style::default(), self.options)
                    .into_iter()
                    .flatten()
                    .collect();
                if heading.level == 1 {
                    let style = palette.heading_primary;
                    let width = match self.wrap_width(indent) {
                        0 => 0,
                        w => w.saturating_sub(2).max(1),
                    };
                    for line in wrap_spans(&text, width) {
                        let mut spans = vec![Span::styled(" ", style)];
                        spans.extend(line.into_iter().map(|span| {
                            let merged = style.patch(span.style);
                            span.style(merged)
                        }));
                        spans.push(Span::styled(" ", style));
                        self.push(indent, spans);
                    }
                } else {
                    let style = palette.heading;
                    let mut spans = vec![Span::raw(format!(
                        "{} ",
                        "#".repeat(usize::from(heading.level))
                    ))];
                    spans.extend(text);
                    let styled: Vec<Span<'static>> = spans
                        .into_iter()
                        .map(|span| {
                            let merged = style.patch(span.style);
                            span.style(merged)
                        })
                        .collect();
                    for line in wrap_spans(&styled, self.wrap_width(indent)) {
                        self.push(indent, line);
                    }
                }
            }

            NodeValue::Paragraph => {
                self.gap(indent, tight);
                let width = self.wrap_width(indent);
                for segment in collect_inlines(node, Style::default(), self.options) {
                    for line in wrap_spans(&segment, width) {
                        self.push(indent, line);
                    }
                }
            }

            NodeValue::CodeBlock(code_block) => {
                self.gap(indent, tight);
                let language = code_block.info.split_whitespace().next();
                let highlighted = highlight_code(
                    language,
                    &code_block.literal,
                    palette.background,
                    palette.code_block,
                );
                let margin = if self.options.code { "" } else { CODE_MARGIN };
                for line in highlighted {
                    let mut spans = vec![Span::raw(margin)];
                    spans.extend(line.spans);
                    self.push(indent, spans);
                }
            }

            NodeValue::HtmlBlock(html) => {
                self.gap(indent, tight);
                for line in html.literal.lines() {
                    self.push(indent, vec![Span::raw(line.to_string())]);
                }
            }

            NodeValue::ThematicBreak => {
                self.gap(indent, false);
                let width = match self.wrap_width(indent) {
                    0 => RULE_WIDTH,
                    w => w.min(RULE_WIDTH),
                };
                self.push(indent, vec![Span::styled("─".repeat(width), palette.rule)]);
            }

            NodeValue::BlockQuote => {
                self.gap(indent, tight);
                let bar = Span::styled("│ ", palette.block_quote);
                let mut quoted = indent.nested(bar.clone(), bar);
                self.children(node, &mut quoted, false);
            }

            NodeValue::List(list) => {
                self.gap(indent, tight);
                let number_width = (list.start + node.children().count())
                    .saturating_sub(1)
                    .to_string()
                    .len();
                let delimiter = match list.delimiter {
                    ListDelimType::Paren => ')',
                    ListDelimType::Period => '.',
                };
                for (index, item) in node.children().enumerate() {
                    if index > 0 && !list.tight {
                        self.gap(indent, false);
                    }
                    let marker = match &item.data.borrow().value {
                        NodeValue::TaskItem(symbol) => {
                            if symbol.is_some() { "✓ ".to_string() } else { "☐ ".to_string() }
                        }
                        _ => match list.list_type {
                            ListType::Bullet => "• ".to_string(),
                            ListType::Ordered => format!(
                                "{:>width$}{delimiter} ",
                                list.start + index,
                                width = number_width
                            ),
                        },
                    };
                    let pad = " ".repeat(marker.width());
                    let mut item_indent = indent
                        .nested(Span::styled(marker, palette.list_marker), Span::raw(pad));
                    self.children(item, &mut item_indent, list.tight);
                }
            }

            NodeValue::Table(_) => {
                self.gap(indent, tight);
                self.table(node, indent);
            }

            _ => self.children(node, indent, tight),
        }
    }

    fn table<'a>(&mut self, node: &'a AstNode<'a>, indent: &mut Indent) {
        let palette = self.options.palette;
        let mut rows: Vec<(bool, Vec<Vec<Span<'static>>>)> = Vec::new();
        for row in node.children() {
            let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
            let base = if header { palette.strong } else { Style::default() };
            let cells: Vec<Vec<Span<'static>>> = row
                .children()
                .map(|cell| {
                    collect_inlines(cell, base, self.options)
                        .into_iter()
                        .flatten()
                        .collect::<Vec<_>>()
                })
                .collect();
            rows.push((header, cells));
        }

        let columns = rows.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for (_, cells) in &rows {
            for (i, cell) in cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.iter().map(Span::width).sum());
            }
        }

        for (header, cells) in rows {
            let mut spans = Vec::new();
            for (i, width) in widths.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled(" │ ", palette.table_border));
                }
                let cell = cells.get(i).cloned().unwrap_or_default();
                let used: usize = cell.iter().map(Span::width).sum();
                spans.extend(cell);
                spans.push(Span::raw(" ".repeat(width.saturating_sub(used))));
            }
            self.push(indent, spans);
            if header {
                let rule = widths
                    .iter()
                    .map(|w| "─".repeat(*w))
                    .collect::<Vec<_>>()
                    .join("─┼─");
                self.push(indent, vec![Span::styled(rule, palette.table_border)]);
            }
        }
    }
}

/// Collect inline content into segments separated by hard line breaks.
fn collect_inlines<'a>(
    node: &'a AstNode<'a>,
    base: Style,
    options: &RendererOptions,
) -> Vec<Vec<Span<'static>>> {
    let mut segments = vec![Vec::new()];
    for child in node.children() {
        inline(child, base, options, &mut segments);
    }
    segments
}

fn inline<'a>(
    node: &'a AstNode<'a>,
    style: Style,
    options: &RendererOptions,
    segments: &mut Vec<Vec<Span<'static>>>,
) {
    let palette = options.palette;
    let push = |segments: &mut Vec<Vec<Span<'static>>>, text: String, style: Style| {
        if let Some(segment) = segments.last_mut() {
            segment.push(Span::styled(text, style));
        }
    };
    match &node.data.borrow().value {
        NodeValue::Text(text) => push(segments, text.to_string(), style),
        NodeValue::Code(code) => push(segments, code.literal.clone(), style.patch(palette.inline_code)),
        NodeValue::HtmlInline(html) => push(segments, html.clone(), style),
        NodeValue::SoftBreak => {
            if options.preserve_newlines {
                segments.push(Vec::new());
            } else {
                push(segments, " ".to_string(), style);
            }
        }
        NodeValue::LineBreak => segments.push(Vec::new()),
        NodeValue::Emph => children_inline(node, style.patch(palette.emphasis), options, segments),
        NodeValue::Strong => children_inline(node, style.patch(palette.strong), options, segments),
        NodeValue::Strikethrough => {
            children_inline(node, style.patch(palette.strikethrough), options, segments);
        }
        NodeValue::Link(link) => {
            let before: usize = segments.iter().map(Vec::len).sum();
            children_inline(node, style.patch(palette.link), options, segments);
            let text: String = segments
                .iter()
                .flatten()
                .skip(before)
                .map(|s| s.content.as_ref())
                .collect();
            if !link.url.is_empty() && text != link.url && !link.url.starts_with("mailto:") {
                push(segments, " ".to_string(), style);
                push(segments, link.url.clone(), style.patch(palette.link_url));
            }
        }
        NodeValue::Image(link) => {
            push(segments, "Image: ".to_string(), style.patch(palette.link));
            children_inline(node, style.patch(palette.link), options, segments);
            push(segments, format!(" → {}", link.url), style.patch(palette.link_url));
        }
        _ => children_inline(node, style, options, segments),
    }
}

fn children_inline<'a>(
    node: &'a AstNode<'a>,
    style: Style,
    options: &RendererOptions,
    segments: &mut Vec<Vec<Span<'static>>>,
) {
    for child in node.children() {
        inline(child, style, options, segments);
    }
}

/// Split text into alternating whitespace and non-whitespace runs.
fn tokens(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (idx, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            out.push(&text[start..idx]);
            start = idx;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

fn trim_trailing_space(line: &mut Vec<Span<'static>>) {
    while line.last().is_some_and(|s| s.content.trim().is_empty()) {
        line.pop();
    }
    if let Some(last) = line.last_mut() {
        let trimmed = last.content.trim_end().to_string();
        last.content = trimmed.into();
    }
}

/// Greedy word wrap. A width of zero disables wrapping.
pub(super) fn wrap_spans(spans: &[Span<'static>], width: usize) -> Vec<Vec<Span<'static>>> {
    if width == 0 {
        return vec![spans.to_vec()];
    }

    let mut lines: Vec<Vec<Span<'static>>> = vec![Vec::new()];
    let mut used = 0usize;
    for span in spans {
        for token in tokens(&span.content) {
            let token_width = token.width();
            if token.chars().all(char::is_whitespace) {
                if used == 0 {
                    continue;
                }
                if used + token_width > width {
                    lines.push(Vec::new());
                    used = 0;
                    continue;
                }
                if let Some(line) = lines.last_mut() {
                    line.push(Span::styled(token.to_string(), span.style));
                }
                used += token_width;
                continue;
            }

            if used > 0 && used + token_width > width {
                lines.push(Vec::new());
                used = 0;
            }

            if token_width <= width {
                if let Some(line) = lines.last_mut() {
                    line.push(Span::styled(token.to_string(), span.style));
                }
                used += token_width;
                continue;
            }

            // A single word wider than the line is split at the boundary.
            let mut chunk = String::new();
            for ch in token.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if used + ch_width > width && used > 0 {
                    if let Some(line) = lines.last_mut() {
                        line.push(Span::styled(std::mem::take(&mut chunk), span.style));
                    }
                    lines.push(Vec::new());
                    used = 0;
                }
                chunk.push(ch);
                used += ch_width;
            }
            if !chunk.is_empty() {
                if let Some(line) = lines.last_mut() {
                    line.push(Span::styled(chunk, span.style));
                }
            }
        }
    }

    for line in &mut lines {
        trim_trailing_space(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::style::Palette;

    fn options(word_wrap: usize) -> RendererOptions {
        RendererOptions {
            word_wrap,
            preserve_newlines: false,
            code: false,
            palette: Palette::default(),
        }
    }

    fn plain(lines: &[Line<'static>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn render(md: &str, opts: &RendererOptions) -> Vec<String> {
        plain(&TermRenderer.render(md, opts).unwrap())
    }

    #[test]
    fn test_heading_and_paragraph_are_separated() {
        let out = render("## Title\n\nHello world", &options(80));
        assert_eq!(out, vec!["  ## Title", "", "  Hello world"]);
    }

    #[test]
    fn test_primary_heading_is_padded() {
        let out = render("# Intro", &options(80));
        assert_eq!(out, vec!["   Intro "]);
    }

    #[test]
    fn test_paragraph_wraps_to_width() {
        let out = render("one two three four five", &options(12));
        assert_eq!(out, vec!["  one two", "  three four", "  five"]);
    }

    #[test]
    fn test_zero_width_does_not_wrap() {
        let long = "word ".repeat(50);
        let out = render(long.trim(), &options(0));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_soft_breaks_join_unless_preserved() {
        let md = "first\nsecond";
        assert_eq!(render(md, &options(80)), vec!["  first second"]);

        let mut opts = options(80);
        opts.preserve_newlines = true;
        assert_eq!(render(md, &opts), vec!["  first", "  second"]);
    }

    #[test]
    fn test_bullet_list_markers() {
        let out = render("- a\n- b", &options(80));
        assert_eq!(out, vec!["  • a", "  • b"]);
    }

    #[test]
    fn test_ordered_list_markers_align() {
        let md = (1..=10).map(|i| format!("{i}. x")).collect::<Vec<_>>().join("\n");
        let out = render(&md, &options(80));
        assert_eq!(out[0], "   1. x");
        assert_eq!(out[9], "  10. x");
    }

    #[test]
    fn test_nested_list_indents() {
        let out = render("- a\n  - b", &options(80));
        assert_eq!(out, vec!["  • a", "    • b"]);
    }

    #[test]
    fn test_task_items() {
        let out = render("- [x] done\n- [ ] todo", &options(80));
        assert_eq!(out, vec!["  ✓ done", "  ☐ todo"]);
    }

    #[test]
    fn test_block_quote_prefix() {
        let out = render("> quoted", &options(80));
        assert_eq!(out, vec!["  │ quoted"]);
    }

    #[test]
    fn test_code_block_is_indented_and_not_wrapped() {
        let md = "```\nlet a_very_long_identifier = 1;\n```";
        let out = render(md, &options(10));
        assert_eq!(out, vec!["    let a_very_long_identifier = 1;"]);
    }

    #[test]
    fn test_link_shows_url() {
        let out = render("[docs](https://example.com)", &options(80));
        assert_eq!(out, vec!["  docs https://example.com"]);
    }

    #[test]
    fn test_autolink_does_not_repeat_url() {
        let out = render("<https://example.com>", &options(80));
        assert_eq!(out, vec!["  https://example.com"]);
    }

    #[test]
    fn test_table_columns_are_aligned() {
        let md = "| a | bb |\n|---|----|\n| ccc | d |";
        let out = render(md, &options(80));
        assert_eq!(out[0], "  a   │ bb");
        assert_eq!(out[1], "  ────┼───");
        assert_eq!(out[2], "  ccc │ d ");
    }

    #[test]
    fn test_front_matter_is_hidden() {
        let out = render("---\ntitle: x\n---\n\nbody", &options(80));
        assert_eq!(out, vec!["  body"]);
    }

    #[test]
    fn test_code_document_uses_narrow_margin() {
        let mut opts = options(0);
        opts.code = true;
        let out = render("```\nx = 1\n```", &opts);
        assert_eq!(out, vec![" x = 1"]);
    }

    #[test]
    fn test_wrap_splits_overlong_words() {
        let spans = vec![Span::raw("abcdefghij")];
        let lines = wrap_spans(&spans, 4);
        let text: Vec<String> = lines
            .iter()
            .map(|l| l.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(text, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_tokens_alternate_runs() {
        assert_eq!(tokens("a  bc d"), vec!["a", "  ", "bc", " ", "d"]);
    }
}
