//! wgpu render backend for the quad demo.
//!
//! Uploads one validated [`busted_common::Geometry`] and draws it with a
//! vertex-color shader. The camera matrix arrives through the
//! [`busted_camera::UniformTarget`] implementation under [`CAMERA_UNIFORM`].
//!
//! # Invariants
//! - Renderer never mutates camera state.
//! - Geometry is validated before any GPU buffer is created.

mod gpu;
mod shaders;
mod uniforms;

pub use gpu::{RenderError, WgpuRenderer};
pub use uniforms::{CAMERA_UNIFORM, CameraUniforms};
