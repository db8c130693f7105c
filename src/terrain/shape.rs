//! Terrain base shapes.

use serde::{Deserialize, Serialize};

/// The base a terrain is grown on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainShape {
    /// A regular polygon fan in the XY plane, displaced along +Z.
    #[default]
    Flat,
    /// A subdivided cube pushed out radially onto a sphere.
    Sphere,
}

impl TerrainShape {
    pub fn name(self) -> &'static str {
        match self {
            TerrainShape::Flat => "flat",
            TerrainShape::Sphere => "sphere",
        }
    }
}

impl std::fmt::Display for TerrainShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
