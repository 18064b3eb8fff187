/// WGSL shader for the demo geometry.
///
/// Vertex colors are modulated by a checker pattern over the texture
/// coordinates, one tile per UV unit.
pub const QUAD_SHADER: &str = r#"
struct Camera {
    cam_matrix: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.cam_matrix * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let cell = vec2<i32>(floor(in.uv));
    let odd = ((cell.x + cell.y) & 1) == 1;
    let shade = select(1.0, 0.7, odd);
    return vec4<f32>(in.color * shade, 1.0);
}
"#;
