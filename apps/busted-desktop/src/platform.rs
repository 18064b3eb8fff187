//! winit glue: key and button translation plus the cursor capability.

use std::sync::Arc;

use busted_input::{CursorControl, CursorMode, InputState, Key, MouseButton};
use glam::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::MouseButton as WinitButton;
use winit::keyboard::KeyCode;
use winit::window::{CursorGrabMode, Window};

pub fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Space => Key::Space,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::ShiftRight => Key::RightShift,
        KeyCode::ControlLeft => Key::LeftControl,
        KeyCode::ControlRight => Key::RightControl,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::Escape => Key::Escape,
        KeyCode::F1 => Key::F1,
        _ => return None,
    };
    Some(key)
}

pub fn map_button(button: WinitButton) -> Option<MouseButton> {
    match button {
        WinitButton::Left => Some(MouseButton::Left),
        WinitButton::Right => Some(MouseButton::Right),
        WinitButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Apply a key transition to `input`.
///
/// Releases always land, even when the UI consumed the event, so a key can
/// never stay held. Presses the UI consumed are dropped.
pub fn route_key(input: &mut InputState, key: Key, pressed: bool, ui_consumed: bool) {
    if !pressed {
        input.release_key(key);
    } else if !ui_consumed {
        input.press_key(key);
    }
}

/// Apply a mouse button transition to `input`, with the same rules as [`route_key`].
pub fn route_button(input: &mut InputState, button: MouseButton, pressed: bool, ui_consumed: bool) {
    if !pressed {
        input.release_button(button);
    } else if !ui_consumed {
        input.press_button(button);
    }
}

/// Cursor position as the camera sees it.
///
/// While released it follows absolute `CursorMoved` positions. While
/// captured it ignores them and accumulates raw `MouseMotion` deltas from
/// the last warp, so look keeps working where warping is unsupported
/// (Wayland) or where a locked cursor reports no positions (macOS).
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorTracker {
    position: Vec2,
    captured: bool,
}

impl CursorTracker {
    pub fn cursor_moved(&mut self, position: Vec2) {
        if !self.captured {
            self.position = position;
        }
    }

    pub fn mouse_motion(&mut self, delta: Vec2) {
        if self.captured {
            self.position += delta;
        }
    }
}

impl CursorControl for CursorTracker {
    fn cursor_position(&self) -> Vec2 {
        self.position
    }

    fn set_cursor_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.captured = mode == CursorMode::Captured;
    }
}

/// [`CursorControl`] backed by a winit window.
///
/// Warping and grabbing are best-effort: the tracked position is what the
/// camera reads, whether or not the OS cursor actually moved.
pub struct WindowCursor {
    window: Arc<Window>,
    tracker: CursorTracker,
    warp_unsupported: bool,
}

impl WindowCursor {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            tracker: CursorTracker::default(),
            warp_unsupported: false,
        }
    }

    /// Record a cursor position reported by `WindowEvent::CursorMoved`.
    pub fn track(&mut self, position: PhysicalPosition<f64>) {
        self.tracker
            .cursor_moved(Vec2::new(position.x as f32, position.y as f32));
    }

    /// Record raw motion reported by `DeviceEvent::MouseMotion`.
    pub fn mouse_motion(&mut self, delta: (f64, f64)) {
        self.tracker
            .mouse_motion(Vec2::new(delta.0 as f32, delta.1 as f32));
    }
}

impl CursorControl for WindowCursor {
    fn cursor_position(&self) -> Vec2 {
        self.tracker.cursor_position()
    }

    fn set_cursor_position(&mut self, position: Vec2) {
        let target = PhysicalPosition::new(position.x as f64, position.y as f64);
        if let Err(e) = self.window.set_cursor_position(target) {
            // Report once; this fails every frame on backends without warping.
            if !self.warp_unsupported {
                tracing::warn!("cursor warp unavailable, using raw mouse motion: {e}");
                self.warp_unsupported = true;
            }
        }
        self.tracker.set_cursor_position(position);
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        match mode {
            CursorMode::Captured => {
                let grabbed = self
                    .window
                    .set_cursor_grab(CursorGrabMode::Confined)
                    .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Locked));
                if let Err(e) = grabbed {
                    tracing::warn!("cursor grab unavailable: {e}");
                }
                self.window.set_cursor_visible(false);
            }
            CursorMode::Normal => {
                if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
                    tracing::warn!("cursor release failed: {e}");
                }
                self.window.set_cursor_visible(true);
            }
        }
        self.tracker.set_cursor_mode(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busted_camera::{Camera, RotationState};
    use busted_input::Action;
    use glam::Vec3;

    fn look_pressed() -> InputState {
        let mut input = InputState::default();
        input.press_button(MouseButton::Left);
        input
    }

    #[test]
    fn wasd_maps_to_letters() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::W));
        assert_eq!(map_key(KeyCode::KeyA), Some(Key::A));
        assert_eq!(map_key(KeyCode::KeyS), Some(Key::S));
        assert_eq!(map_key(KeyCode::KeyD), Some(Key::D));
    }

    #[test]
    fn modifiers_keep_their_side() {
        assert_eq!(map_key(KeyCode::ShiftLeft), Some(Key::LeftShift));
        assert_eq!(map_key(KeyCode::ControlRight), Some(Key::RightControl));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(map_key(KeyCode::F12), None);
        assert_eq!(map_button(WinitButton::Back), None);
    }

    #[test]
    fn buttons_map() {
        assert_eq!(map_button(WinitButton::Left), Some(MouseButton::Left));
        assert_eq!(map_button(WinitButton::Right), Some(MouseButton::Right));
    }

    #[test]
    fn release_claimed_by_ui_still_lands() {
        let mut input = look_pressed();
        route_button(&mut input, MouseButton::Left, false, true);
        assert!(!input.is_active(Action::Look));

        input.press_key(Key::W);
        route_key(&mut input, Key::W, false, true);
        assert!(!input.is_active(Action::MoveForward));
    }

    #[test]
    fn press_claimed_by_ui_is_dropped() {
        let mut input = InputState::default();
        route_button(&mut input, MouseButton::Left, true, true);
        assert!(!input.is_active(Action::Look));
        route_button(&mut input, MouseButton::Left, true, false);
        assert!(input.is_active(Action::Look));
        route_key(&mut input, Key::D, true, true);
        assert!(!input.is_active(Action::StrafeRight));
    }

    #[test]
    fn look_released_over_ui_returns_camera_to_idle() {
        // Narrow window: the re-centered cursor sits under the HUD panel.
        let mut camera = Camera::new(400, 600, Vec3::ZERO).unwrap();
        let mut cursor = CursorTracker::default();
        let mut input = look_pressed();
        camera.inputs(&input, &mut cursor, 0.0);
        assert_eq!(camera.rotation_state(), RotationState::Tracking);

        route_button(&mut input, MouseButton::Left, false, true);
        camera.inputs(&input, &mut cursor, 0.0);
        assert_eq!(camera.rotation_state(), RotationState::Idle);
        // Released again: absolute positions are followed.
        cursor.cursor_moved(Vec2::new(10.0, 20.0));
        assert_eq!(cursor.cursor_position(), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn released_tracker_follows_absolute_positions() {
        let mut cursor = CursorTracker::default();
        cursor.cursor_moved(Vec2::new(12.0, 34.0));
        cursor.mouse_motion(Vec2::new(5.0, 5.0));
        assert_eq!(cursor.cursor_position(), Vec2::new(12.0, 34.0));
    }

    #[test]
    fn captured_tracker_accumulates_raw_motion() {
        let mut cursor = CursorTracker::default();
        cursor.set_cursor_mode(CursorMode::Captured);
        cursor.set_cursor_position(Vec2::new(400.0, 300.0));
        cursor.cursor_moved(Vec2::new(700.0, 300.0));
        cursor.mouse_motion(Vec2::new(2.0, -1.0));
        cursor.mouse_motion(Vec2::new(1.0, 0.0));
        assert_eq!(cursor.cursor_position(), Vec2::new(403.0, 299.0));
    }

    #[test]
    fn one_pixel_of_motion_turns_a_fraction_of_a_degree() {
        // Where warping fails, the OS cursor stays far from center and keeps
        // reporting absolute positions there. Only raw motion may turn the camera.
        let mut camera = Camera::new(800, 600, Vec3::ZERO).unwrap();
        let mut cursor = CursorTracker::default();
        cursor.cursor_moved(Vec2::new(700.0, 300.0));
        let input = look_pressed();
        camera.inputs(&input, &mut cursor, 0.0);

        cursor.cursor_moved(Vec2::new(701.0, 300.0));
        cursor.mouse_motion(Vec2::new(1.0, 0.0));
        camera.inputs(&input, &mut cursor, 0.0);

        // 1 px of an 800 px viewport at sensitivity 100.
        assert!((camera.yaw_degrees() - (-90.0 + 0.125)).abs() < 1e-3);
    }

    #[test]
    fn locked_cursor_without_positions_still_looks() {
        let mut camera = Camera::new(800, 600, Vec3::ZERO).unwrap();
        let mut cursor = CursorTracker::default();
        let input = look_pressed();
        camera.inputs(&input, &mut cursor, 0.0);
        cursor.mouse_motion(Vec2::new(0.0, 6.0));
        camera.inputs(&input, &mut cursor, 0.0);
        assert!((camera.pitch_degrees() + 1.0).abs() < 1e-3);
    }
}
