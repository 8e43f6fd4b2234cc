/// Keyboard input: drains pending terminal events into discrete commands.
///
/// Only key-down (`Press`) events count. `Repeat` and `Release` are
/// dropped, so holding an arrow does not walk the player across the map.
/// Commands are kept in arrival order; each directional press is one move.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::actor::Direction;
use crate::sim::event::Command;

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Commands decoded during the most recent `drain_events()`.
    commands: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { commands: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before the world update.
    pub fn drain_events(&mut self) -> std::io::Result<&[Command]> {
        self.commands.clear();

        while poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(cmd) = decode_key(&key) {
                    self.commands.push(cmd);
                }
            }
        }

        Ok(&self.commands)
    }
}

/// Map one key event to a command. `None` for anything but a key-down.
pub fn decode_key(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'));
    if ctrl_c || KEYS_QUIT.contains(&key.code) {
        return Some(Command::Quit);
    }

    let dir = if KEYS_LEFT.contains(&key.code) {
        Direction::Left
    } else if KEYS_RIGHT.contains(&key.code) {
        Direction::Right
    } else if KEYS_UP.contains(&key.code) {
        Direction::Up
    } else if KEYS_DOWN.contains(&key.code) {
        Direction::Down
    } else {
        return Some(Command::Other);
    };
    Some(Command::Move(dir))
}
