use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// Tunable camera parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Movement speed while the sprint action is held.
    pub sprint_speed: f32,
    /// Degrees of rotation for a cursor offset of one full viewport.
    pub sensitivity: f32,
    /// Largest pitch, in degrees, the camera may reach above or below the horizon.
    pub max_pitch_degrees: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            speed: 6.0,
            sprint_speed: 24.0,
            sensitivity: 100.0,
            max_pitch_degrees: 85.0,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraSettings {
    pub fn validate(&self) -> Result<(), CameraError> {
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(CameraError::InvalidSettings(format!(
                "speed must be finite and non-negative, got {}",
                self.speed
            )));
        }
        if !(self.sprint_speed.is_finite() && self.sprint_speed >= 0.0) {
            return Err(CameraError::InvalidSettings(format!(
                "sprint_speed must be finite and non-negative, got {}",
                self.sprint_speed
            )));
        }
        if !(self.sensitivity.is_finite() && self.sensitivity > 0.0) {
            return Err(CameraError::InvalidSettings(format!(
                "sensitivity must be finite and positive, got {}",
                self.sensitivity
            )));
        }
        if !(self.max_pitch_degrees > 0.0 && self.max_pitch_degrees < 90.0) {
            return Err(CameraError::InvalidSettings(format!(
                "max_pitch_degrees must be inside (0, 90), got {}",
                self.max_pitch_degrees
            )));
        }
        validate_projection(self.fov_degrees, self.near, self.far)
    }
}

/// Reject parameters that would produce a singular or flipped projection.
pub(crate) fn validate_projection(fov_degrees: f32, near: f32, far: f32) -> Result<(), CameraError> {
    if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
        return Err(CameraError::InvalidFieldOfView(fov_degrees));
    }
    if !(near > 0.0 && near < far && far.is_finite()) {
        return Err(CameraError::InvalidClipPlanes { near, far });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CameraSettings::default().validate().is_ok());
    }

    #[test]
    fn rejects_pitch_limit_at_ninety() {
        let s = CameraSettings {
            max_pitch_degrees: 90.0,
            ..CameraSettings::default()
        };
        assert!(matches!(s.validate(), Err(CameraError::InvalidSettings(_))));
    }

    #[test]
    fn rejects_negative_speed() {
        let s = CameraSettings {
            speed: -1.0,
            ..CameraSettings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_nan_sensitivity() {
        let s = CameraSettings {
            sensitivity: f32::NAN,
            ..CameraSettings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn projection_bounds() {
        assert_eq!(
            validate_projection(0.0, 0.1, 100.0),
            Err(CameraError::InvalidFieldOfView(0.0))
        );
        assert_eq!(
            validate_projection(180.0, 0.1, 100.0),
            Err(CameraError::InvalidFieldOfView(180.0))
        );
        assert_eq!(
            validate_projection(45.0, 0.0, 100.0),
            Err(CameraError::InvalidClipPlanes {
                near: 0.0,
                far: 100.0
            })
        );
        assert_eq!(
            validate_projection(45.0, 10.0, 1.0),
            Err(CameraError::InvalidClipPlanes {
                near: 10.0,
                far: 1.0
            })
        );
        assert!(validate_projection(45.0, 0.1, 100.0).is_ok());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let s: CameraSettings = serde_json::from_str(r#"{ "speed": 2.5 }"#).unwrap();
        assert_eq!(s.speed, 2.5);
        assert_eq!(s.sensitivity, 100.0);
        assert_eq!(s.fov_degrees, 45.0);
    }
}
