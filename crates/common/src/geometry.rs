use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Interleaved vertex layout: position, color, texture coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            color,
            uv,
        }
    }
}

/// Errors from geometry validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("geometry has no vertices")]
    NoVertices,
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Indexed triangle list ready to be uploaded by a render backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// The demo quad: 10 units wide, 20 units tall, centered on the origin in the z = 0 plane.
    pub fn quad() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            Vertex::new([ 5.0,  10.0, 0.0], [1.0, 0.0, 0.0], [5.0, 5.0]), // top right
            Vertex::new([ 5.0, -10.0, 0.0], [0.0, 1.0, 0.0], [5.0, 0.0]), // bottom right
            Vertex::new([-5.0, -10.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]), // bottom left
            Vertex::new([-5.0,  10.0, 0.0], [1.0, 1.0, 0.0], [0.0, 5.0]), // top left
        ];
        let indices = vec![0, 1, 3, 1, 2, 3];
        Self { vertices, indices }
    }

    /// Largest grid side accepted by [`Geometry::grid`].
    pub const MAX_GRID_CELLS: u32 = 1024;

    /// A `columns` x `rows` grid of square cells in the z = 0 plane, centered on the origin.
    ///
    /// Each cell spans one unit of texture space, so a checker pattern in the
    /// shader lands exactly on the cell boundaries. Each side is clamped to
    /// `1..=Self::MAX_GRID_CELLS`.
    pub fn grid(columns: u32, rows: u32, cell_size: f32) -> Self {
        let columns = columns.clamp(1, Self::MAX_GRID_CELLS);
        let rows = rows.clamp(1, Self::MAX_GRID_CELLS);
        let half_w = columns as f32 * cell_size * 0.5;
        let half_h = rows as f32 * cell_size * 0.5;
        let stride = columns + 1;

        let mut vertices = Vec::with_capacity(stride as usize * (rows as usize + 1));
        for j in 0..=rows {
            for i in 0..=columns {
                let x = -half_w + i as f32 * cell_size;
                let y = -half_h + j as f32 * cell_size;
                let color = [i as f32 / columns as f32, j as f32 / rows as f32, 0.5];
                vertices.push(Vertex::new([x, y, 0.0], color, [i as f32, j as f32]));
            }
        }

        let mut indices = Vec::with_capacity(columns as usize * rows as usize * 6);
        for j in 0..rows {
            for i in 0..columns {
                let bottom_left = j * stride + i;
                let bottom_right = bottom_left + 1;
                let top_left = bottom_left + stride;
                let top_right = top_left + 1;
                // Same winding as the quad.
                indices.extend_from_slice(&[
                    top_right,
                    bottom_right,
                    top_left,
                    bottom_right,
                    bottom_left,
                    top_left,
                ]);
            }
        }

        Self { vertices, indices }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Check that the index list forms whole triangles over existing vertices.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.vertices.is_empty() {
            return Err(GeometryError::NoVertices);
        }
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::PartialTriangle(self.indices.len()));
        }
        let vertex_count = self.vertices.len();
        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, i)| **i as usize >= vertex_count)
        {
            return Err(GeometryError::IndexOutOfRange {
                position,
                index,
                vertex_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_valid() {
        let quad = Geometry::quad();
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.index_count(), 6);
        assert!(quad.validate().is_ok());
    }

    #[test]
    fn quad_spans_ten_by_twenty() {
        let quad = Geometry::quad();
        let xs: Vec<f32> = quad.vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = quad.vertices.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 5.0);
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -5.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 10.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), -10.0);
    }

    #[test]
    fn grid_matches_quad_extents() {
        let grid = Geometry::grid(10, 20, 1.0);
        assert_eq!(grid.vertices.len(), 11 * 21);
        assert_eq!(grid.indices.len(), 10 * 20 * 6);
        assert!(grid.validate().is_ok());

        let first = grid.vertices.first().unwrap().position;
        let last = grid.vertices.last().unwrap().position;
        assert_eq!(first, [-5.0, -10.0, 0.0]);
        assert_eq!(last, [5.0, 10.0, 0.0]);
    }

    #[test]
    fn grid_clamps_zero_dimensions() {
        let grid = Geometry::grid(0, 0, 2.0);
        assert_eq!(grid.vertices.len(), 4);
        assert_eq!(grid.indices.len(), 6);
    }

    #[test]
    fn grid_clamps_oversized_dimensions() {
        let grid = Geometry::grid(u32::MAX, 1, 1.0);
        let side = Geometry::MAX_GRID_CELLS as usize;
        assert_eq!(grid.vertices.len(), (side + 1) * 2);
        assert_eq!(grid.indices.len(), side * 6);
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty() {
        let g = Geometry {
            vertices: vec![],
            indices: vec![],
        };
        assert_eq!(g.validate(), Err(GeometryError::NoVertices));
    }

    #[test]
    fn validate_rejects_partial_triangle() {
        let mut g = Geometry::quad();
        g.indices.pop();
        assert_eq!(g.validate(), Err(GeometryError::PartialTriangle(5)));
    }

    #[test]
    fn validate_rejects_out_of_range_index() {
        let mut g = Geometry::quad();
        g.indices[4] = 9;
        assert_eq!(
            g.validate(),
            Err(GeometryError::IndexOutOfRange {
                position: 4,
                index: 9,
                vertex_count: 4,
            })
        );
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 8 * 4);
    }
}
