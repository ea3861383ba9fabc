//! Keyboard mapping for the terminal client.
//!
//! This module owns the crossterm-to-[`Key`] mapping and the bookkeeping
//! needed to produce key-up events on terminals that only report presses.

use std::time::{Duration, Instant};

use battle_core::Key;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

/// High-level outcome of processing a keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Logical key went down (press or auto-repeat).
    Down(Key),
    /// Logical key was released.
    Up(Key),
    /// No meaningful command was produced.
    None,
}

/// Converts a raw key event into a higher-level command.
pub fn map_key(event: &KeyEvent) -> KeyAction {
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('C') => KeyAction::Quit,
            _ => KeyAction::None,
        };
    }

    let key = match event.code {
        KeyCode::Char(ch) => match ch.to_ascii_lowercase() {
            'q' => return KeyAction::Quit,
            'k' | 'w' => Key::Up,
            'j' | 's' => Key::Down,
            'h' | 'a' => Key::Left,
            'l' | 'd' => Key::Right,
            'z' | ' ' => Key::Confirm,
            'x' => Key::Cancel,
            _ => return KeyAction::None,
        },
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Confirm,
        KeyCode::Esc | KeyCode::Backspace => Key::Cancel,
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => Key::Cancel,
        _ => return KeyAction::None,
    };

    match event.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => KeyAction::Down(key),
        KeyEventKind::Release => KeyAction::Up(key),
    }
}

/// Tracks held keys and releases them after a quiet period.
///
/// Without terminal release reporting a held key shows up as a press
/// followed by auto-repeat presses. Each press refreshes the deadline; a key
/// that stops repeating is released once `timeout` has passed. When the
/// terminal reports releases, construct with `None` and only explicit
/// releases clear keys.
#[derive(Debug)]
pub struct HeldKeys {
    timeout: Option<Duration>,
    held: Vec<(Key, Instant)>,
}

impl HeldKeys {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            held: Vec::new(),
        }
    }

    /// Records a press. Returns `true` when the key must be released before
    /// the new key-down is sent.
    ///
    /// Without release reporting every Confirm/Cancel press is a fresh edge,
    /// as keyboard auto-repeat is indistinguishable from another press.
    pub fn press(&mut self, key: Key, now: Instant) -> bool {
        match self.held.iter_mut().find(|(held, _)| *held == key) {
            Some((_, since)) => {
                *since = now;
                self.timeout.is_some() && !key.is_directional()
            }
            None => {
                self.held.push((key, now));
                false
            }
        }
    }

    /// Returns `true` if the key was held.
    pub fn release(&mut self, key: Key) -> bool {
        let before = self.held.len();
        self.held.retain(|(held, _)| *held != key);
        self.held.len() != before
    }

    /// Removes and returns keys whose deadline has passed.
    pub fn expire(&mut self, now: Instant) -> Vec<Key> {
        let Some(timeout) = self.timeout else {
            return Vec::new();
        };
        let mut expired = Vec::new();
        self.held.retain(|&(key, since)| {
            let keep = now.saturating_duration_since(since) < timeout;
            if !keep {
                expired.push(key);
            }
            keep
        });
        expired
    }

    /// Releases everything, e.g. on shutdown.
    pub fn drain(&mut self) -> Vec<Key> {
        self.held.drain(..).map(|(key, _)| key).collect()
    }
}
