//! Key mapping from terminal events to UI actions.

use crate::types::UiAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to UI actions.
///
/// | Key | Action |
/// |-----|--------|
/// | `g`, Enter | generate with animation |
/// | `p` | generate without animation |
/// | `r` | reload current puzzle |
/// | `x`, Esc | cancel |
pub fn handle_key_event(key: KeyEvent) -> Option<UiAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('g') | KeyCode::Char('G') | KeyCode::Enter => Some(UiAction::GenerateAnimated),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(UiAction::GeneratePlain),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(UiAction::LoadCurrent),
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Esc => Some(UiAction::Cancel),
        _ => None,
    }
}

/// Check if key should quit the program.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
