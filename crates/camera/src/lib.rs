//! Free-fly camera for the quad demo.
//!
//! The render loop calls [`Camera::inputs`] then [`Camera::upload`] once per
//! frame, in that order. Inputs moves and turns the camera from polled input;
//! upload writes `projection * view` into a named shader uniform.
//!
//! # Invariants
//! - `orientation` and `up` are unit length after every mutation.
//! - Pitch stays inside `±max_pitch_degrees`, which is below 90 degrees.
//! - The viewport is never zero in either dimension.
//! - The camera has no windowing dependency: cursor access goes through
//!   [`busted_input::CursorControl`].

mod camera;
mod error;
mod settings;
mod uniform;

pub use camera::{Camera, CameraSummary, RotationState};
pub use error::CameraError;
pub use settings::CameraSettings;
pub use uniform::{UniformError, UniformTarget};
