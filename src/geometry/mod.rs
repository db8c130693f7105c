//! Base geometry for the terrain meshes.
//!
//! Provides the cube faces and cube-to-sphere mapping used by the spherical
//! base mesh, plus the triangle type and midpoint subdivision shared by both
//! base shapes.

mod cube_sphere;
mod face;
mod triangle;

pub use cube_sphere::{direction_to_lon_lat_uv, face_uv_to_cube, spherify_point};
pub use face::CubeFaceId;
pub use triangle::{leaf_count, side_midpoints, split_triangle, RawTriangle, Subdivision};
