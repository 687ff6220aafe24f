use super::*;
use crate::app::{DisplayMode, Model, STATUS_BAR_HEIGHT};
use crate::document::Document;
use crate::render::StyleConfig;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::text::{Line, Text};

fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).unwrap()
}

fn create_test_model(lines: usize) -> Model {
    let mut model = Model::new((80, 24), StyleConfig::default(), false);
    model.document = Some(Document::new("notes.md", "/tmp/notes.md", "body"));
    model.viewport.set_content(Text::from(
        (0..lines)
            .map(|i| Line::raw(format!("content line {i}")))
            .collect::<Vec<_>>(),
    ));
    model
}

fn row_text(terminal: &Terminal<TestBackend>, row: u16) -> String {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.width)
        .map(|x| buffer[(x, row)].symbol().to_string())
        .collect()
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| row_text(terminal, y))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_layout_without_help() {
    let (doc, status, help) = layout(Rect::new(0, 0, 80, 24), false);
    assert_eq!(doc.height, 23);
    assert_eq!(status.y, 23);
    assert!(help.is_none());
}

#[test]
fn test_layout_with_help_matches_viewport_height() {
    let area = Rect::new(0, 0, 80, 24);
    let (doc, status, help) = layout(area, true);
    let help = help.unwrap();

    let mut model = create_test_model(5);
    model.toggle_help();

    assert_eq!(doc.height, model.viewport.height());
    assert_eq!(status.y, doc.height);
    assert_eq!(help.y, status.y + STATUS_BAR_HEIGHT);
    assert_eq!(help.y + help.height, area.height);
}

#[test]
fn test_render_shows_visible_content_and_status() {
    let mut model = create_test_model(100);
    model.viewport.scroll_down(10);
    let mut terminal = create_test_terminal(80, 24);
    terminal.draw(|frame| render(&model, frame)).unwrap();

    assert!(row_text(&terminal, 0).starts_with("content line 10"));
    assert!(row_text(&terminal, 22).starts_with("content line 32"));
    let status = row_text(&terminal, 23);
    assert!(status.starts_with(" mdpager  notes.md "));
    assert!(status.contains("? Help"));
}

#[test]
fn test_render_transient_message_replaces_note() {
    let mut model = create_test_model(3);
    model.mode = DisplayMode::TransientMessage;
    model.status_message = "Copied contents".to_string();
    let mut terminal = create_test_terminal(80, 10);
    terminal.draw(|frame| render(&model, frame)).unwrap();

    let status = row_text(&terminal, 9);
    assert!(status.contains("Copied contents"));
    assert!(!status.contains("notes.md"));
}

#[test]
fn test_render_help_view_below_status() {
    let mut model = create_test_model(3);
    model.toggle_help();
    let mut terminal = create_test_terminal(80, 24);
    terminal.draw(|frame| render(&model, frame)).unwrap();

    let screen = screen_text(&terminal);
    assert!(screen.contains("g/home  go to top"));
    assert!(screen.contains("n/→     next slide"));
    let status_row = 24 - 1 - overlays::help_height();
    assert!(row_text(&terminal, status_row).contains("notes.md"));
}

#[test]
fn test_render_slide_indicator() {
    let mut model = Model::new((80, 24), StyleConfig::default(), true);
    model.document = Some(Document::new("talk.md", "/tmp/talk.md", "# 1 A\n# 2 B"));
    model.slides = crate::document::SlideDeck::from_body("# 1 A\n# 2 B", true);
    let mut terminal = create_test_terminal(80, 24);
    terminal.draw(|frame| render(&model, frame)).unwrap();

    assert!(row_text(&terminal, 23).contains("talk.md [Slide 1/2]"));
}

#[test]
fn test_render_empty_model_does_not_panic() {
    let model = Model::new((20, 3), StyleConfig::default(), false);
    let mut terminal = create_test_terminal(20, 3);
    terminal.draw(|frame| render(&model, frame)).unwrap();
}
