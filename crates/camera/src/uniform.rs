use glam::Mat4;

/// Errors reported by a uniform destination.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniformError {
    #[error("unknown uniform `{0}`")]
    UnknownUniform(String),
}

/// A shader program (or stand-in) that accepts named matrix uniforms.
pub trait UniformTarget {
    /// Store `value` in the uniform called `name`.
    fn set_mat4(&mut self, name: &str, value: Mat4) -> Result<(), UniformError>;
}
