//! Pipeline module tying configuration, base meshes, noise and slicing
//! into one terrain generation run.

mod config;
mod terrace;

pub use config::{ConfigError, TerrainConfig, MAX_DEPTH};
pub use terrace::{generate_terrain, generate_terrain_with, TerracePipeline, TerrainMesh};
