use std::f32::consts::FRAC_PI_2;
use std::fmt;

use busted_input::{Action, CursorControl, CursorMode, InputState};
use glam::{Mat4, Quat, Vec2, Vec3};

use crate::error::CameraError;
use crate::settings::{CameraSettings, validate_projection};
use crate::uniform::UniformTarget;

/// Whether mouse look currently owns the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationState {
    /// Look button not held. The next press captures the cursor and takes
    /// the viewport center as its reference point.
    #[default]
    Idle,
    /// Look button held. The cursor is captured and re-centered every frame.
    Tracking,
}

/// Free-fly camera with position, unit forward vector and world up.
///
/// Camera motion is driven entirely by [`Camera::inputs`]; nothing else
/// mutates orientation.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    orientation: Vec3,
    up: Vec3,
    width: u32,
    height: u32,
    settings: CameraSettings,
    rotation: RotationState,
}

impl Camera {
    /// Camera at `position` looking down -Z with default settings.
    pub fn new(width: u32, height: u32, position: Vec3) -> Result<Self, CameraError> {
        Self::with_settings(width, height, position, CameraSettings::default())
    }

    pub fn with_settings(
        width: u32,
        height: u32,
        position: Vec3,
        settings: CameraSettings,
    ) -> Result<Self, CameraError> {
        check_viewport(width, height)?;
        if !position.is_finite() {
            return Err(CameraError::NonFinitePosition(position));
        }
        settings.validate()?;

        Ok(Self {
            position,
            orientation: Vec3::NEG_Z,
            up: Vec3::Y,
            width,
            height,
            settings,
            rotation: RotationState::Idle,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) -> Result<(), CameraError> {
        if !position.is_finite() {
            return Err(CameraError::NonFinitePosition(position));
        }
        self.position = position;
        Ok(())
    }

    /// Unit forward vector.
    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    /// Point the camera along `direction`.
    ///
    /// Fails if `direction` is zero, not finite, or steeper than the pitch limit.
    pub fn set_orientation(&mut self, direction: Vec3) -> Result<(), CameraError> {
        let normalized = direction.normalize_or_zero();
        if normalized == Vec3::ZERO || !self.pitch_allowed(normalized) {
            return Err(CameraError::InvalidOrientation(direction));
        }
        self.orientation = normalized;
        Ok(())
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Unit strafe axis: `normalize(orientation x up)`.
    pub fn right(&self) -> Vec3 {
        self.orientation.cross(self.up).normalize()
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), CameraError> {
        check_viewport(width, height)?;
        if (width, height) != (self.width, self.height) {
            tracing::debug!(width, height, "camera viewport changed");
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn rotation_state(&self) -> RotationState {
        self.rotation
    }

    /// Angle above (positive) or below (negative) the horizon, in degrees.
    pub fn pitch_degrees(&self) -> f32 {
        (FRAC_PI_2 - self.orientation.angle_between(self.up)).to_degrees()
    }

    /// Heading in the horizontal plane, in degrees. Looking down -Z is -90.
    pub fn yaw_degrees(&self) -> f32 {
        self.orientation.z.atan2(self.orientation.x).to_degrees()
    }

    /// Apply one frame of polled input: movement first, then mouse look.
    ///
    /// `dt` is the elapsed frame time in seconds; negative or non-finite
    /// values are treated as zero.
    pub fn inputs<C>(&mut self, input: &InputState, cursor: &mut C, dt: f32)
    where
        C: CursorControl + ?Sized,
    {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.apply_movement(input, dt);
        self.apply_look(input, cursor);
    }

    fn apply_movement(&mut self, input: &InputState, dt: f32) {
        let right = self.right();
        let mut direction = Vec3::ZERO;
        if input.is_active(Action::MoveForward) {
            direction += self.orientation;
        }
        if input.is_active(Action::MoveBackward) {
            direction -= self.orientation;
        }
        if input.is_active(Action::StrafeLeft) {
            direction -= right;
        }
        if input.is_active(Action::StrafeRight) {
            direction += right;
        }
        if input.is_active(Action::Ascend) {
            direction += self.up;
        }
        if input.is_active(Action::Descend) {
            direction -= self.up;
        }
        if direction == Vec3::ZERO {
            return;
        }

        let speed = if input.is_active(Action::Sprint) {
            self.settings.sprint_speed
        } else {
            self.settings.speed
        };
        // Diagonals are intentionally not normalized.
        self.position += direction * (speed * dt);
    }

    fn apply_look<C>(&mut self, input: &InputState, cursor: &mut C)
    where
        C: CursorControl + ?Sized,
    {
        if !input.is_active(Action::Look) {
            if self.rotation == RotationState::Tracking {
                cursor.set_cursor_mode(CursorMode::Normal);
                self.rotation = RotationState::Idle;
                tracing::debug!("mouse look released");
            }
            return;
        }

        let center = self.viewport_center();
        if self.rotation == RotationState::Idle {
            cursor.set_cursor_mode(CursorMode::Captured);
            cursor.set_cursor_position(center);
            self.rotation = RotationState::Tracking;
            tracing::debug!(?center, "mouse look captured");
        }

        let offset = cursor.cursor_position() - center;
        let pitch = self.settings.sensitivity * offset.y / self.height as f32;
        let yaw = self.settings.sensitivity * offset.x / self.width as f32;
        if offset != Vec2::ZERO {
            tracing::trace!(pitch, yaw, "mouse look delta");
        }

        self.pitch_by(-pitch.to_radians());
        self.yaw_by(-yaw.to_radians());

        cursor.set_cursor_position(center);
    }

    /// Rotate about the strafe axis; rejected when it would leave the pitch limit.
    ///
    /// The limit is checked on the target pitch, not on the rotated vector,
    /// so a large step cannot swing past the pole and land back in range.
    fn pitch_by(&mut self, radians: f32) {
        if radians == 0.0 {
            return;
        }
        let current = FRAC_PI_2 - self.orientation.angle_between(self.up);
        if (current + radians).abs() > self.settings.max_pitch_degrees.to_radians() {
            tracing::trace!("pitch step rejected at limit");
            return;
        }
        self.orientation =
            (Quat::from_axis_angle(self.right(), radians) * self.orientation).normalize();
    }

    fn yaw_by(&mut self, radians: f32) {
        if radians == 0.0 {
            return;
        }
        self.orientation = (Quat::from_axis_angle(self.up, radians) * self.orientation).normalize();
    }

    fn pitch_allowed(&self, direction: Vec3) -> bool {
        let pitch = FRAC_PI_2 - direction.angle_between(self.up);
        pitch.abs() <= self.settings.max_pitch_degrees.to_radians()
    }

    fn viewport_center(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.orientation, self.up)
    }

    pub fn projection_matrix(
        &self,
        fov_degrees: f32,
        near: f32,
        far: f32,
    ) -> Result<Mat4, CameraError> {
        validate_projection(fov_degrees, near, far)?;
        Ok(Mat4::perspective_rh(
            fov_degrees.to_radians(),
            self.aspect(),
            near,
            far,
        ))
    }

    /// Combined `projection * view` matrix.
    pub fn matrix(&self, fov_degrees: f32, near: f32, far: f32) -> Result<Mat4, CameraError> {
        Ok(self.projection_matrix(fov_degrees, near, far)? * self.view_matrix())
    }

    /// Combined matrix using the field of view and clip planes from settings.
    pub fn default_matrix(&self) -> Result<Mat4, CameraError> {
        let s = &self.settings;
        self.matrix(s.fov_degrees, s.near, s.far)
    }

    /// Compute the combined matrix and store it in `target` under `name`.
    pub fn upload<T>(
        &self,
        fov_degrees: f32,
        near: f32,
        far: f32,
        target: &mut T,
        name: &str,
    ) -> Result<(), CameraError>
    where
        T: UniformTarget + ?Sized,
    {
        let matrix = self.matrix(fov_degrees, near, far)?;
        target.set_mat4(name, matrix)?;
        Ok(())
    }

    /// Read-only snapshot for overlays and logs.
    pub fn summary(&self) -> CameraSummary {
        CameraSummary {
            position: self.position,
            orientation: self.orientation,
            pitch_degrees: self.pitch_degrees(),
            yaw_degrees: self.yaw_degrees(),
            viewport: self.viewport(),
            rotation: self.rotation,
        }
    }
}

fn check_viewport(width: u32, height: u32) -> Result<(), CameraError> {
    if width == 0 || height == 0 {
        return Err(CameraError::ZeroViewport { width, height });
    }
    Ok(())
}

/// Camera state at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSummary {
    pub position: Vec3,
    pub orientation: Vec3,
    pub pitch_degrees: f32,
    pub yaw_degrees: f32,
    pub viewport: (u32, u32),
    pub rotation: RotationState,
}

impl fmt::Display for CameraSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position;
        let o = self.orientation;
        writeln!(f, "position:    ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z)?;
        writeln!(f, "orientation: ({:.3}, {:.3}, {:.3})", o.x, o.y, o.z)?;
        writeln!(
            f,
            "pitch/yaw:   {:.2} / {:.2} deg",
            self.pitch_degrees, self.yaw_degrees
        )?;
        writeln!(f, "viewport:    {}x{}", self.viewport.0, self.viewport.1)?;
        write!(f, "look:        {:?}", self.rotation)
    }
}
