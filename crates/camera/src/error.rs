use glam::Vec3;

use crate::uniform::UniformError;

/// Errors from camera construction and matrix computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("viewport must be non-zero, got {width}x{height}")]
    ZeroViewport { width: u32, height: u32 },
    #[error("field of view must be inside (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f32),
    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },
    #[error("camera position must be finite, got {0}")]
    NonFinitePosition(Vec3),
    #[error("orientation {0} is zero or outside the allowed pitch range")]
    InvalidOrientation(Vec3),
    #[error("invalid camera settings: {0}")]
    InvalidSettings(String),
    #[error(transparent)]
    Uniform(#[from] UniformError),
}
