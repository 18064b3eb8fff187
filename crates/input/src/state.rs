use std::collections::HashSet;

use crate::action::{Action, KeyBindings};
use crate::keys::{Key, MouseButton};

/// Keys and mouse buttons currently held, read against a set of bindings.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    bindings: KeyBindings,
    keys: HashSet<Key>,
    buttons: HashSet<MouseButton>,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            keys: HashSet::new(),
            buttons: HashSet::new(),
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn press_key(&mut self, key: Key) {
        self.keys.insert(key);
    }

    pub fn release_key(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    pub fn press_button(&mut self, button: MouseButton) {
        self.buttons.insert(button);
    }

    pub fn release_button(&mut self, button: MouseButton) {
        self.buttons.remove(&button);
    }

    pub fn is_key_held(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_button_held(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Whether the key or button bound to `action` is held.
    pub fn is_active(&self, action: Action) -> bool {
        match self.bindings.key_for(action) {
            Some(key) => self.is_key_held(key),
            None => self.is_button_held(self.bindings.button_for_look()),
        }
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.buttons.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_key() {
        let mut input = InputState::default();
        input.press_key(Key::W);
        assert!(input.is_active(Action::MoveForward));
        input.release_key(Key::W);
        assert!(!input.is_active(Action::MoveForward));
    }

    #[test]
    fn look_follows_bound_button() {
        let mut input = InputState::default();
        input.press_button(MouseButton::Right);
        assert!(!input.is_active(Action::Look));
        input.press_button(MouseButton::Left);
        assert!(input.is_active(Action::Look));
    }

    #[test]
    fn rebinding_changes_active_actions() {
        let bindings = KeyBindings {
            forward: Key::ArrowUp,
            ..KeyBindings::default()
        };
        let mut input = InputState::new(bindings);
        input.press_key(Key::W);
        assert!(!input.is_active(Action::MoveForward));
        input.press_key(Key::ArrowUp);
        assert!(input.is_active(Action::MoveForward));
    }

    #[test]
    fn clear_releases_everything() {
        let mut input = InputState::default();
        input.press_key(Key::D);
        input.press_button(MouseButton::Left);
        input.clear();
        assert!(!input.is_active(Action::StrafeRight));
        assert!(!input.is_active(Action::Look));
    }
}
