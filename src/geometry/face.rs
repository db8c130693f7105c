//! Cube faces used to seed the spherical base mesh.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One of the six faces of the coarse cube that the sphere is grown from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CubeFaceId {
    /// +X face (right)
    PosX = 0,
    /// -X face (left)
    NegX = 1,
    /// +Y face (top)
    PosY = 2,
    /// -Y face (bottom)
    NegY = 3,
    /// +Z face (front)
    PosZ = 4,
    /// -Z face (back)
    NegZ = 5,
}

impl CubeFaceId {
    /// Returns all six cube faces in base-mesh order.
    pub const fn all() -> [CubeFaceId; 6] {
        [
            CubeFaceId::PosX,
            CubeFaceId::NegX,
            CubeFaceId::PosY,
            CubeFaceId::NegY,
            CubeFaceId::PosZ,
            CubeFaceId::NegZ,
        ]
    }

    /// Outward unit normal of the face.
    pub fn normal(self) -> Vec3 {
        match self {
            CubeFaceId::PosX => Vec3::X,
            CubeFaceId::NegX => Vec3::NEG_X,
            CubeFaceId::PosY => Vec3::Y,
            CubeFaceId::NegY => Vec3::NEG_Y,
            CubeFaceId::PosZ => Vec3::Z,
            CubeFaceId::NegZ => Vec3::NEG_Z,
        }
    }
}
