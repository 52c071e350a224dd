//! Keyboard to intent mapping
//!
//! Movement and fire are level-triggered (held keys). The mega-bomb is
//! edge-triggered: one press yields one request, consumed by the next frame.

use std::collections::HashSet;

use crate::sim::TickInput;

#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<String>,
    bomb_latched: bool,
}

const UP: &[&str] = &["KeyW", "ArrowUp"];
const DOWN: &[&str] = &["KeyS", "ArrowDown"];
const LEFT: &[&str] = &["KeyA", "ArrowLeft"];
const RIGHT: &[&str] = &["KeyD", "ArrowRight"];
const FIRE: &[&str] = &["Space"];
const BOMB: &[&str] = &["KeyB", "KeyX"];

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `code` is a DOM `KeyboardEvent.code`. Returns true when the key is
    /// bound, so the caller can suppress the browser default.
    pub fn key_down(&mut self, code: &str) -> bool {
        let fresh = self.held.insert(code.to_string());
        if fresh && BOMB.contains(&code) {
            self.bomb_latched = true;
        }
        is_bound(code)
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Drop everything, e.g. when the page loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
        self.bomb_latched = false;
    }

    fn any_held(&self, codes: &[&str]) -> bool {
        codes.iter().any(|c| self.held.contains(*c))
    }

    /// Snapshot for the next frame; consumes a pending bomb press
    pub fn take_intents(&mut self) -> TickInput {
        let bomb = std::mem::take(&mut self.bomb_latched);
        TickInput {
            up: self.any_held(UP),
            down: self.any_held(DOWN),
            left: self.any_held(LEFT),
            right: self.any_held(RIGHT),
            fire: self.any_held(FIRE),
            bomb,
            idle_mode: false,
        }
    }
}

fn is_bound(code: &str) -> bool {
    [UP, DOWN, LEFT, RIGHT, FIRE, BOMB]
        .iter()
        .any(|set| set.contains(&code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_map_to_intents() {
        let mut kb = KeyboardState::new();
        assert!(kb.key_down("ArrowUp"));
        assert!(kb.key_down("KeyD"));
        assert!(kb.key_down("Space"));
        assert!(!kb.key_down("KeyQ"));

        let input = kb.take_intents();
        assert!(input.up && input.right && input.fire);
        assert!(!input.down && !input.left && !input.bomb);

        // Still held on the next frame
        assert!(kb.take_intents().up);
        kb.key_up("ArrowUp");
        assert!(!kb.take_intents().up);
    }

    #[test]
    fn test_bomb_fires_once_per_press() {
        let mut kb = KeyboardState::new();
        kb.key_down("KeyB");
        assert!(kb.take_intents().bomb);
        assert!(!kb.take_intents().bomb);

        // Key repeat while held does not re-arm
        kb.key_down("KeyB");
        assert!(!kb.take_intents().bomb);

        kb.key_up("KeyB");
        kb.key_down("KeyB");
        assert!(kb.take_intents().bomb);
    }

    #[test]
    fn test_release_all() {
        let mut kb = KeyboardState::new();
        kb.key_down("KeyW");
        kb.key_down("KeyX");
        kb.release_all();
        assert_eq!(kb.take_intents(), TickInput::default());
    }
}
