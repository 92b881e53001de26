//! Key mapping from terminal events to intents.

use crate::types::Intent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a key to an intent.
///
/// Shift is not reported on its own by terminals, so hold sits on `C`.
pub fn intent_for_code(code: KeyCode) -> Option<Intent> {
    match code {
        // Movement
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some(Intent::MoveLeft)
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l') | KeyCode::Char('L') => {
            Some(Intent::MoveRight)
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') | KeyCode::Char('J') => {
            Some(Intent::SoftDrop)
        }

        // Rotation
        KeyCode::Up
        | KeyCode::Char('e')
        | KeyCode::Char('E')
        | KeyCode::Char('x')
        | KeyCode::Char('X')
        | KeyCode::Char('k')
        | KeyCode::Char('K') => Some(Intent::RotateCw),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Char('z') | KeyCode::Char('Z') => {
            Some(Intent::RotateCcw)
        }

        // Actions
        KeyCode::Char(' ') => Some(Intent::HardDrop),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Intent::Hold),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Intent::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
///
/// `Q` rotates, so quitting is `Esc` or Ctrl-C.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_movement_keys() {
        assert_eq!(intent_for_code(KeyCode::Left), Some(Intent::MoveLeft));
        assert_eq!(intent_for_code(KeyCode::Char('D')), Some(Intent::MoveRight));
        assert_eq!(intent_for_code(KeyCode::Char('s')), Some(Intent::SoftDrop));
        assert_eq!(intent_for_code(KeyCode::Char('h')), Some(Intent::MoveLeft));
    }

    #[test]
    fn test_rotation_keys() {
        assert_eq!(intent_for_code(KeyCode::Up), Some(Intent::RotateCw));
        assert_eq!(intent_for_code(KeyCode::Char('e')), Some(Intent::RotateCw));
        assert_eq!(intent_for_code(KeyCode::Char('X')), Some(Intent::RotateCw));
        assert_eq!(intent_for_code(KeyCode::Char('q')), Some(Intent::RotateCcw));
        assert_eq!(intent_for_code(KeyCode::Char('Z')), Some(Intent::RotateCcw));
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(intent_for_code(KeyCode::Char(' ')), Some(Intent::HardDrop));
        assert_eq!(intent_for_code(KeyCode::Char('c')), Some(Intent::Hold));
        assert_eq!(intent_for_code(KeyCode::Char('R')), Some(Intent::Restart));
        assert_eq!(intent_for_code(KeyCode::Char('p')), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
    }
}
