//! Coarse base shapes and their lazy subdivision into leaf triangles.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::geometry::{face_uv_to_cube, leaf_count, CubeFaceId, RawTriangle, Subdivision};
use crate::pipeline::{ConfigError, MAX_DEPTH};

/// A shape that can be cut into raw, undisplaced triangles.
pub trait BaseMeshSource: Send + Sync {
    /// Coarse triangles at depth 1, in emission order.
    fn base_triangles(&self) -> Vec<RawTriangle>;

    fn max_depth(&self) -> u32;

    /// Leaf triangles at `max_depth`.
    fn generate(&self) -> Subdivision {
        Subdivision::new(self.base_triangles(), self.max_depth())
    }

    fn leaf_count(&self) -> usize {
        leaf_count(self.base_triangles().len(), self.max_depth())
    }
}

/// A regular polygon in the XY plane split into a fan of `segs_c` triangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonFan {
    segs_c: u32,
    radius: f32,
    center: Vec3,
    max_depth: u32,
}

impl PolygonFan {
    /// Fan around the origin.
    pub fn new(segs_c: u32, radius: f32, max_depth: u32) -> Result<Self, ConfigError> {
        Self::with_center(segs_c, radius, Vec3::ZERO, max_depth)
    }

    pub fn with_center(
        segs_c: u32,
        radius: f32,
        center: Vec3,
        max_depth: u32,
    ) -> Result<Self, ConfigError> {
        if segs_c < 3 {
            return Err(ConfigError::TooFewSegments(segs_c));
        }
        if !(1..=MAX_DEPTH).contains(&max_depth) {
            return Err(ConfigError::InvalidDepth(max_depth));
        }
        if !radius.is_finite() {
            return Err(ConfigError::NonFinite("radius", radius));
        }
        if radius <= 0.0 {
            return Err(ConfigError::NonPositive("radius", radius));
        }
        Ok(Self {
            segs_c,
            radius,
            center,
            max_depth,
        })
    }

    pub fn segs_c(&self) -> u32 {
        self.segs_c
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    fn corner(&self, i: u32) -> Vec3 {
        let angle = TAU / self.segs_c as f32 * i as f32;
        self.center + Vec3::new(angle.cos(), angle.sin(), 0.0) * self.radius
    }
}

impl BaseMeshSource for PolygonFan {
    fn base_triangles(&self) -> Vec<RawTriangle> {
        (1..=self.segs_c)
            .map(|i| {
                let next = if i == self.segs_c { 1 } else { i + 1 };
                [self.corner(i), self.corner(next), self.center]
            })
            .collect()
    }

    fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

/// The twelve triangles of a cube with half-extent `terrain_scale`, wound
/// counter-clockwise seen from outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeSphereBase {
    terrain_scale: f32,
    max_depth: u32,
}

impl CubeSphereBase {
    pub fn new(terrain_scale: f32, max_depth: u32) -> Result<Self, ConfigError> {
        if !(1..=MAX_DEPTH).contains(&max_depth) {
            return Err(ConfigError::InvalidDepth(max_depth));
        }
        if !terrain_scale.is_finite() {
            return Err(ConfigError::NonFinite("terrain_scale", terrain_scale));
        }
        if terrain_scale <= 0.0 {
            return Err(ConfigError::NonPositive("terrain_scale", terrain_scale));
        }
        Ok(Self {
            terrain_scale,
            max_depth,
        })
    }

    pub fn terrain_scale(&self) -> f32 {
        self.terrain_scale
    }
}

fn outward(face: CubeFaceId, tri: RawTriangle) -> RawTriangle {
    let [a, b, c] = tri;
    if (b - a).cross(c - a).dot(face.normal()) < 0.0 {
        [a, c, b]
    } else {
        tri
    }
}

impl BaseMeshSource for CubeSphereBase {
    fn base_triangles(&self) -> Vec<RawTriangle> {
        let mut tris = Vec::with_capacity(12);
        for face in CubeFaceId::all() {
            let corner = |u: f32, v: f32| face_uv_to_cube(face, u, v) * self.terrain_scale;
            let (c00, c10, c11, c01) = (
                corner(0.0, 0.0),
                corner(1.0, 0.0),
                corner(1.0, 1.0),
                corner(0.0, 1.0),
            );
            tris.push(outward(face, [c00, c10, c11]));
            tris.push(outward(face, [c00, c11, c01]));
        }
        tris
    }

    fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_rejects_bad_parameters() {
        assert!(matches!(PolygonFan::new(2, 1.0, 3), Err(ConfigError::TooFewSegments(2))));
        assert!(matches!(PolygonFan::new(5, 1.0, 0), Err(ConfigError::InvalidDepth(0))));
        assert!(matches!(PolygonFan::new(5, 0.0, 1), Err(ConfigError::NonPositive("radius", _))));
        assert!(matches!(CubeSphereBase::new(1.0, 0), Err(ConfigError::InvalidDepth(0))));
        assert!(matches!(PolygonFan::new(5, 1.0, 40), Err(ConfigError::InvalidDepth(40))));
        assert!(matches!(
            CubeSphereBase::new(1.0, MAX_DEPTH + 1),
            Err(ConfigError::InvalidDepth(_))
        ));
        assert!(matches!(
            CubeSphereBase::new(f32::NAN, 2),
            Err(ConfigError::NonFinite("terrain_scale", _))
        ));
    }

    #[test]
    fn test_fan_edges_close_the_polygon() {
        let fan = PolygonFan::new(5, 3.0, 1).unwrap();
        let tris = fan.base_triangles();
        assert_eq!(tris.len(), 5);
        for (i, tri) in tris.iter().enumerate() {
            let next = &tris[(i + 1) % tris.len()];
            assert!((tri[1] - next[0]).length() < 1e-5, "edge {} does not meet edge {}", i, i + 1);
            assert_eq!(tri[2], Vec3::ZERO);
            assert!((tri[0].length() - 3.0).abs() < 1e-5);
            // Counter-clockwise seen from +Z.
            assert!((tri[1] - tri[0]).cross(tri[2] - tri[0]).z > 0.0);
        }
    }

    #[test]
    fn test_depth_one_yields_base_unchanged() {
        let fan = PolygonFan::new(3, 1.0, 1).unwrap();
        let leaves: Vec<_> = fan.generate().collect();
        assert_eq!(leaves, fan.base_triangles());

        let cube = CubeSphereBase::new(1.0, 1).unwrap();
        assert_eq!(cube.generate().count(), 12);
    }

    #[test]
    fn test_each_level_multiplies_leaves_by_four() {
        for depth in 1..5 {
            let a = PolygonFan::new(6, 1.0, depth).unwrap();
            let b = PolygonFan::new(6, 1.0, depth + 1).unwrap();
            assert_eq!(b.generate().count(), 4 * a.generate().count());
            assert_eq!(a.leaf_count(), a.generate().count());

            let c = CubeSphereBase::new(1.0, depth).unwrap();
            let d = CubeSphereBase::new(1.0, depth + 1).unwrap();
            assert_eq!(d.generate().count(), 4 * c.generate().count());
        }
    }

    #[test]
    fn test_cube_triangles_face_outward() {
        let cube = CubeSphereBase::new(2.0, 1).unwrap();
        for tri in cube.base_triangles() {
            let n = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(n.dot(centroid) > 0.0, "inward triangle {:?}", tri);
            for v in tri {
                assert!((v.abs().max_element() - 2.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_subdivision_preserves_winding() {
        let fan = PolygonFan::new(4, 1.0, 3).unwrap();
        for tri in fan.generate() {
            assert!((tri[1] - tri[0]).cross(tri[2] - tri[0]).z > 0.0);
        }
    }
}
