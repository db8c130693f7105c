//! Terraced terrain mesh generator.
//!
//! Builds stepped, ziggurat-style terrain meshes over a flat polygon or a
//! sphere. A base shape is subdivided into raw triangles, each vertex is
//! displaced by fractal noise, and every triangle is cut into horizontal
//! bands with the meandering-triangles algorithm. The result is an
//! interleaved vertex buffer plus a triangle index list.

pub mod geometry;
pub mod mesh;
pub mod noise;
pub mod pipeline;
pub mod terrain;

pub use mesh::{MeanderingSlicer, MeshBuffers, TerrainVertex};
pub use noise::{NoiseKind, OctaveConfig};
pub use pipeline::{generate_terrain, generate_terrain_with, ConfigError, TerrainConfig, TerrainMesh};
pub use terrain::{TerrainShape, Theme, ThemePreset};
