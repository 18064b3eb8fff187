//! Input layer: raw key and button state mapped to camera actions.
//!
//! The windowing backend translates its own events into [`Key`] and
//! [`MouseButton`] presses and exposes cursor capabilities through
//! [`CursorControl`]. Consumers never see backend event types.
//!
//! # Invariants
//! - Input state is a snapshot of what is held, not an event queue.
//! - Cursor warping and capture only happen through `CursorControl`.

pub mod action;
pub mod cursor;
pub mod keys;
pub mod state;

pub use action::{Action, KeyBindings};
pub use cursor::{CursorControl, CursorMode, VirtualCursor};
pub use keys::{Key, MouseButton};
pub use state::InputState;
