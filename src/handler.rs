use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::App;
use crate::tui::AppEvent;

const MOUSE_SCROLL_LINES: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => app.conversation.insert_str(&text),
        // Next draw picks up the new size
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.should_quit = true,
            // Clear the whole line
            KeyCode::Char('u') => app.conversation.update_input(String::new()),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => app.submit(),

        // Input editing
        KeyCode::Backspace => app.conversation.backspace(),
        KeyCode::Delete => app.conversation.delete(),
        KeyCode::Left => app.conversation.move_left(),
        KeyCode::Right => app.conversation.move_right(),
        KeyCode::Home => app.conversation.move_home(),
        KeyCode::End => app.conversation.move_end(),
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::ALT) => {}
        KeyCode::Char(c) => app.conversation.insert_char(c),

        // Transcript scrolling
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(MOUSE_SCROLL_LINES),
        MouseEventKind::ScrollUp => app.scroll_up(MOUSE_SCROLL_LINES),
        _ => {}
    }
}
