//! Logical input model.
//!
//! Replaces window-level key listeners with an explicit [`InputState`] that
//! the caller feeds with key-down/key-up events and drains once per tick.
//! Directional keys are both edges (menu navigation, including key repeat)
//! and held state (dodge movement). Confirm and Cancel are edge-triggered
//! only: repeated key-down while held produces no new edge.

use arrayvec::ArrayVec;
use bitflags::bitflags;

/// Logical key identity after the caller's key mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
}

impl Key {
    pub const fn is_directional(self) -> bool {
        matches!(self, Key::Up | Key::Down | Key::Left | Key::Right)
    }

    const fn flag(self) -> KeySet {
        match self {
            Key::Up => KeySet::UP,
            Key::Down => KeySet::DOWN,
            Key::Left => KeySet::LEFT,
            Key::Right => KeySet::RIGHT,
            Key::Confirm => KeySet::CONFIRM,
            Key::Cancel => KeySet::CANCEL,
        }
    }
}

bitflags! {
    /// Set of keys currently held down.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct KeySet: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const CONFIRM = 1 << 4;
        const CANCEL = 1 << 5;
    }
}

impl KeySet {
    pub fn holds(&self, key: Key) -> bool {
        self.contains(key.flag())
    }
}

/// Raw event delivered by the input source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyEvent {
    Down(Key),
    Up(Key),
}

/// Maximum key edges retained between two ticks; extra edges are dropped.
pub const MAX_PENDING_EDGES: usize = 16;

/// Input observed during one tick: ordered edges plus the held set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub pressed: ArrayVec<Key, MAX_PENDING_EDGES>,
    pub held: KeySet,
}

impl InputFrame {
    /// Frame holding the given keys with no new edges.
    pub fn holding(held: KeySet) -> Self {
        Self {
            pressed: ArrayVec::new(),
            held,
        }
    }

    /// Frame with a single edge and no held keys.
    pub fn press(key: Key) -> Self {
        let mut pressed = ArrayVec::new();
        pressed.push(key);
        Self {
            pressed,
            held: KeySet::empty(),
        }
    }
}

/// Accumulates key events between ticks.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: KeySet,
    pending: ArrayVec<Key, MAX_PENDING_EDGES>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Down(key) => self.key_down(key),
            KeyEvent::Up(key) => self.key_up(key),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        let already_held = self.held.holds(key);
        self.held.insert(key.flag());
        let is_edge = key.is_directional() || !already_held;
        if is_edge && self.pending.try_push(key).is_err() {
            tracing::warn!(?key, "input edge buffer full, dropping key");
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(key.flag());
    }

    pub fn held(&self) -> KeySet {
        self.held
    }

    /// Drains pending edges into a frame; held keys carry over.
    pub fn take_frame(&mut self) -> InputFrame {
        InputFrame {
            pressed: std::mem::take(&mut self.pending),
            held: self.held,
        }
    }

    /// Releases every key and discards pending edges.
    pub fn clear(&mut self) {
        self.held = KeySet::empty();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_is_edge_triggered() {
        let mut input = InputState::new();
        input.key_down(Key::Confirm);
        input.key_down(Key::Confirm);
        let frame = input.take_frame();
        assert_eq!(frame.pressed.as_slice(), &[Key::Confirm]);
        assert!(frame.held.holds(Key::Confirm));

        input.key_up(Key::Confirm);
        input.key_down(Key::Confirm);
        assert_eq!(input.take_frame().pressed.as_slice(), &[Key::Confirm]);
    }

    #[test]
    fn directional_repeat_produces_edges() {
        let mut input = InputState::new();
        input.key_down(Key::Down);
        input.key_down(Key::Down);
        let frame = input.take_frame();
        assert_eq!(frame.pressed.as_slice(), &[Key::Down, Key::Down]);
    }

    #[test]
    fn held_keys_survive_drain() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        let _ = input.take_frame();
        let frame = input.take_frame();
        assert!(frame.pressed.is_empty());
        assert!(frame.held.holds(Key::Left));

        input.key_up(Key::Left);
        assert!(!input.take_frame().held.holds(Key::Left));
    }

    #[test]
    fn overflow_drops_extra_edges() {
        let mut input = InputState::new();
        for _ in 0..(MAX_PENDING_EDGES + 4) {
            input.key_down(Key::Right);
        }
        assert_eq!(input.take_frame().pressed.len(), MAX_PENDING_EDGES);
    }

    #[test]
    fn parses_key_names() {
        assert_eq!("confirm".parse::<Key>(), Ok(Key::Confirm));
        assert_eq!("LEFT".parse::<Key>(), Ok(Key::Left));
        assert_eq!(Key::Cancel.to_string(), "cancel");
    }
}
