//! Terrain shapes, altitude metrics, colour themes and height projection.
//!
//! A terrain is described by two orthogonal pieces: a [`BaseMeshSource`]
//! producing raw triangles and an [`AltitudeMetric`] saying how those
//! triangles are displaced and measured.

mod altitude;
mod base_mesh;
mod projector;
mod shape;
mod theme;

pub use altitude::{AltitudeMetric, FlatMetric, SphereMetric, SphereProjection};
pub use base_mesh::{BaseMeshSource, CubeSphereBase, PolygonFan};
pub use projector::{HeightPolicy, HeightProjector, RadialGradient, RadialMask};
pub use shape::TerrainShape;
pub use theme::{Theme, ThemeBand, ThemeError, ThemePreset, ISLAND_FLOOR};
