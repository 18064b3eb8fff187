//! Shared types for the quad demo.
//!
//! Geometry is described as plain data and handed to the render backend,
//! which owns every GPU-side copy of it.
//!
//! # Invariants
//! - A validated `Geometry` only references vertices it contains.
//! - Index data always describes whole triangles.

mod geometry;

pub use geometry::{Geometry, GeometryError, Vertex};
