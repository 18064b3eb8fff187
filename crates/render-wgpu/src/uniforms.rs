use busted_camera::{UniformError, UniformTarget};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Name of the combined view-projection uniform in [`crate::shaders::QUAD_SHADER`].
pub const CAMERA_UNIFORM: &str = "cam_matrix";

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct CameraBlock {
    pub cam_matrix: [[f32; 4]; 4],
}

/// CPU-side copy of the shader's uniform block.
///
/// Writes land here first and are copied to the GPU buffer when a frame
/// is rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraUniforms {
    cam_matrix: Mat4,
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            cam_matrix: Mat4::IDENTITY,
        }
    }
}

impl CameraUniforms {
    pub fn cam_matrix(&self) -> Mat4 {
        self.cam_matrix
    }

    pub(crate) fn block(&self) -> CameraBlock {
        CameraBlock {
            cam_matrix: self.cam_matrix.to_cols_array_2d(),
        }
    }
}

impl UniformTarget for CameraUniforms {
    fn set_mat4(&mut self, name: &str, value: Mat4) -> Result<(), UniformError> {
        match name {
            CAMERA_UNIFORM => {
                self.cam_matrix = value;
                Ok(())
            }
            other => Err(UniformError::UnknownUniform(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busted_camera::Camera;
    use glam::Vec3;

    #[test]
    fn starts_as_identity() {
        assert_eq!(CameraUniforms::default().cam_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn accepts_camera_uniform() {
        let mut uniforms = CameraUniforms::default();
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        uniforms.set_mat4(CAMERA_UNIFORM, m).unwrap();
        assert_eq!(uniforms.cam_matrix(), m);
        assert_eq!(uniforms.block().cam_matrix, m.to_cols_array_2d());
    }

    #[test]
    fn rejects_other_names() {
        let mut uniforms = CameraUniforms::default();
        assert_eq!(
            uniforms.set_mat4("camMatrix", Mat4::ZERO),
            Err(UniformError::UnknownUniform("camMatrix".into()))
        );
        assert_eq!(uniforms.cam_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn camera_upload_reaches_block() {
        let cam = Camera::new(800, 600, Vec3::new(0.0, 0.0, 26.0)).unwrap();
        let mut uniforms = CameraUniforms::default();
        cam.upload(45.0, 0.1, 100.0, &mut uniforms, CAMERA_UNIFORM)
            .unwrap();
        assert_eq!(uniforms.cam_matrix(), cam.matrix(45.0, 0.1, 100.0).unwrap());
    }

    #[test]
    fn block_is_one_matrix() {
        assert_eq!(std::mem::size_of::<CameraBlock>(), 64);
    }
}
