use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::Message;

/// Lines scrolled per mouse wheel notch.
pub const MOUSE_WHEEL_LINES: usize = 3;

/// Translate a terminal event into a message.
pub fn handle_event(event: &Event, mouse_enabled: bool) -> Option<Message> {
    match event {
        Event::Key(key) => handle_key(*key),
        Event::Mouse(mouse) if mouse_enabled => handle_mouse(*mouse),
        Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
        _ => None,
    }
}

pub fn handle_key(key: KeyEvent) -> Option<Message> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Message::Quit),
            KeyCode::Char('d') => Some(Message::HalfPageDown),
            KeyCode::Char('u') => Some(Message::HalfPageUp),
            KeyCode::Char('f') => Some(Message::PageDown),
            KeyCode::Char('b') => Some(Message::PageUp),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Message::Back),

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => Some(Message::ScrollDown(1)),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::ScrollUp(1)),
        KeyCode::Char('f' | ' ') | KeyCode::PageDown => Some(Message::PageDown),
        KeyCode::Char('b') | KeyCode::PageUp => Some(Message::PageUp),
        KeyCode::Char('d') => Some(Message::HalfPageDown),
        KeyCode::Char('u') => Some(Message::HalfPageUp),
        KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
        KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),

        // Slides
        KeyCode::Char('n') | KeyCode::Right => Some(Message::NextSlide),
        KeyCode::Char('p') | KeyCode::Left => Some(Message::PreviousSlide),

        // Actions
        KeyCode::Char('e') => Some(Message::OpenEditor),
        KeyCode::Char('c') => Some(Message::CopyContents),
        KeyCode::Char('r') => Some(Message::Reload),
        KeyCode::Char('?') => Some(Message::ToggleHelp),

        _ => None,
    }
}

pub fn handle_mouse(mouse: MouseEvent) -> Option<Message> {
    match mouse.kind {
        MouseEventKind::ScrollUp => Some(Message::ScrollUp(MOUSE_WHEEL_LINES)),
        MouseEventKind::ScrollDown => Some(Message::ScrollDown(MOUSE_WHEEL_LINES)),
        _ => None,
    }
}
