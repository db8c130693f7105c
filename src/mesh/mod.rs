//! Terraced mesh construction.
//!
//! [`MeanderingSlicer`] turns displaced triangles into roof and wall
//! polygons; [`MeshBuffers`] collects them as interleaved vertices and a
//! triangle index list.

mod buffers;
mod slicer;

pub use buffers::{MeshBuffers, MeshError, QuadKind, TerrainVertex, FLOATS_PER_VERTEX};
pub use slicer::{
    band_heights, classify, edge_t, Classification, DisplacedTriangle, MeanderingSlicer,
    DEFAULT_WALL_DEPTH,
};
