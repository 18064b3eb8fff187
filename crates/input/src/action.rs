use serde::{Deserialize, Serialize};

use crate::keys::{Key, MouseButton};

/// A camera action that a key or button can drive.
///
/// The camera consumes actions, never raw keys, so rebinding never touches
/// movement logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Translate along the view direction.
    MoveForward,
    /// Translate against the view direction.
    MoveBackward,
    /// Translate against the strafe axis.
    StrafeLeft,
    /// Translate along the strafe axis.
    StrafeRight,
    /// Translate along world up.
    Ascend,
    /// Translate against world up.
    Descend,
    /// Use the sprint speed while held.
    Sprint,
    /// Mouse look: rotate while held.
    Look,
}

/// Key and button assignments for every [`Action`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: Key,
    pub backward: Key,
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
    pub sprint: Key,
    pub look: MouseButton,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: Key::W,
            backward: Key::S,
            left: Key::A,
            right: Key::D,
            up: Key::Space,
            down: Key::LeftControl,
            sprint: Key::LeftShift,
            look: MouseButton::Left,
        }
    }
}

impl KeyBindings {
    /// The key bound to a keyboard action, or `None` for [`Action::Look`].
    pub fn key_for(&self, action: Action) -> Option<Key> {
        match action {
            Action::MoveForward => Some(self.forward),
            Action::MoveBackward => Some(self.backward),
            Action::StrafeLeft => Some(self.left),
            Action::StrafeRight => Some(self.right),
            Action::Ascend => Some(self.up),
            Action::Descend => Some(self.down),
            Action::Sprint => Some(self.sprint),
            Action::Look => None,
        }
    }

    pub fn button_for_look(&self) -> MouseButton {
        self.look
    }
}
