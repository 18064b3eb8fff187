use glam::Vec2;

/// Cursor presentation requested by the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// Visible and free to leave the window.
    #[default]
    Normal,
    /// Hidden and held inside the window while mouse look is active.
    Captured,
}

/// Cursor capabilities the camera needs from a windowing backend.
///
/// Positions are in window pixels, origin at the top-left corner.
pub trait CursorControl {
    /// Last known cursor position.
    fn cursor_position(&self) -> Vec2;

    /// Warp the cursor to `position`.
    fn set_cursor_position(&mut self, position: Vec2);

    /// Switch cursor visibility and confinement.
    fn set_cursor_mode(&mut self, mode: CursorMode);
}

/// In-memory cursor for headless runs and tests.
///
/// Warps take effect immediately, mode changes are recorded so callers can
/// assert on them.
#[derive(Debug, Clone, Default)]
pub struct VirtualCursor {
    position: Vec2,
    mode: CursorMode,
    mode_changes: Vec<CursorMode>,
    warps: usize,
}

impl VirtualCursor {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Simulate the user moving the mouse to `position`.
    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Simulate the user moving the mouse by `delta`.
    pub fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    pub fn mode_changes(&self) -> &[CursorMode] {
        &self.mode_changes
    }

    /// Number of programmatic warps so far.
    pub fn warps(&self) -> usize {
        self.warps
    }
}

impl CursorControl for VirtualCursor {
    fn cursor_position(&self) -> Vec2 {
        self.position
    }

    fn set_cursor_position(&mut self, position: Vec2) {
        self.position = position;
        self.warps += 1;
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        if self.mode != mode {
            tracing::trace!(?mode, "virtual cursor mode change");
        }
        self.mode = mode;
        self.mode_changes.push(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warp_moves_cursor_and_counts() {
        let mut cursor = VirtualCursor::new(Vec2::new(10.0, 10.0));
        cursor.set_cursor_position(Vec2::new(400.0, 300.0));
        assert_eq!(cursor.cursor_position(), Vec2::new(400.0, 300.0));
        assert_eq!(cursor.warps(), 1);
    }

    #[test]
    fn user_motion_is_not_a_warp() {
        let mut cursor = VirtualCursor::default();
        cursor.move_by(Vec2::new(3.0, -4.0));
        assert_eq!(cursor.cursor_position(), Vec2::new(3.0, -4.0));
        assert_eq!(cursor.warps(), 0);
    }

    #[test]
    fn mode_changes_are_recorded() {
        let mut cursor = VirtualCursor::default();
        assert_eq!(cursor.mode(), CursorMode::Normal);
        cursor.set_cursor_mode(CursorMode::Captured);
        cursor.set_cursor_mode(CursorMode::Normal);
        assert_eq!(
            cursor.mode_changes(),
            &[CursorMode::Captured, CursorMode::Normal]
        );
    }
}
