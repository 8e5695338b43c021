//! Keyboard input dispatch — overlay first, then global keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // Overlays consume input first.
    if app.overlay == Overlay::Help {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter
        ) {
            app.overlay = Overlay::None;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char('?') => app.overlay = Overlay::Help,
        KeyCode::Char('p') | KeyCode::Enter => app.play(),
        KeyCode::Char('s') => app.pause(),
        KeyCode::Char(' ') => app.toggle(),
        _ => {}
    }
}
