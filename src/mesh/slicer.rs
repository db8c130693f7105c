//! Meandering-triangles terracing.
//!
//! Each displaced triangle is cut at every band between its lowest and
//! highest vertex. Per band the part above the band becomes a flat roof and
//! the cut line is extruded down into a wall, so stacked bands form steps.

use glam::Vec3;

use super::buffers::{MeshBuffers, QuadKind, TerrainVertex};
use crate::terrain::{AltitudeMetric, Theme};

/// Default drop of a wall below its roof.
pub const DEFAULT_WALL_DEPTH: f32 = 0.05;

/// Band heights are discretised to tenths and walked in half-tenth steps.
const BAND_SCALE: f32 = 10.0;
const BAND_STEP: f32 = 0.5;

/// Which vertices of a triangle lie strictly above a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    NoneAbove,
    /// The index of the only vertex above.
    OneAbove(usize),
    /// The indices of the two vertices above, ascending.
    TwoAbove([usize; 2]),
    AllAbove,
}

impl Classification {
    /// Vertex order that keeps the winding and puts the odd vertex out last.
    ///
    /// For one above that is the vertex above; for two above, the vertex below.
    pub fn rotation(self) -> [usize; 3] {
        let pivot = match self {
            Classification::OneAbove(i) => i,
            Classification::TwoAbove([a, b]) => 3 - a - b,
            Classification::NoneAbove | Classification::AllAbove => 2,
        };
        [(pivot + 1) % 3, (pivot + 2) % 3, pivot]
    }
}

/// Classifies `altitudes` against the band at `h`.
pub fn classify(altitudes: [f32; 3], h: f32) -> Classification {
    let above = altitudes.map(|a| a > h);
    match above {
        [false, false, false] => Classification::NoneAbove,
        [true, true, true] => Classification::AllAbove,
        [true, false, false] => Classification::OneAbove(0),
        [false, true, false] => Classification::OneAbove(1),
        [false, false, true] => Classification::OneAbove(2),
        [true, true, false] => Classification::TwoAbove([0, 1]),
        [true, false, true] => Classification::TwoAbove([0, 2]),
        [false, true, true] => Classification::TwoAbove([1, 2]),
    }
}

/// Interpolation parameter where the band at `h` crosses the edge from an
/// altitude `from` to `to`; zero when the edge is level.
pub fn edge_t(from: f32, to: f32, h: f32) -> f32 {
    let denom = from - to;
    if denom == 0.0 {
        0.0
    } else {
        (from - h) / denom
    }
}

/// Band heights between the lowest and highest of `altitudes`, ascending.
pub fn band_heights(altitudes: [f32; 3]) -> impl Iterator<Item = f32> {
    let lo = altitudes.iter().copied().fold(f32::INFINITY, f32::min);
    let hi = altitudes.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let h_min = (lo * BAND_SCALE).floor();
    let h_max = (hi * BAND_SCALE).floor();
    let steps = if h_max >= h_min {
        ((h_max - h_min) / BAND_STEP) as u32
    } else {
        0
    };
    (0..=steps).map(move |k| (h_min + BAND_STEP * k as f32) / BAND_SCALE)
}

/// A displaced triangle with its vertex altitudes measured once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacedTriangle {
    pub vertices: [Vec3; 3],
    pub altitudes: [f32; 3],
}

impl DisplacedTriangle {
    pub fn new<M: AltitudeMetric + ?Sized>(vertices: [Vec3; 3], metric: &M) -> Self {
        Self {
            vertices,
            altitudes: vertices.map(|v| metric.measure(v)),
        }
    }

    fn rotated(&self, order: [usize; 3]) -> Self {
        Self {
            vertices: order.map(|i| self.vertices[i]),
            altitudes: order.map(|i| self.altitudes[i]),
        }
    }
}

/// Slices displaced triangles into roof and wall polygons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanderingSlicer {
    wall_depth: f32,
}

impl Default for MeanderingSlicer {
    fn default() -> Self {
        Self::new(DEFAULT_WALL_DEPTH)
    }
}

impl MeanderingSlicer {
    pub fn new(wall_depth: f32) -> Self {
        Self { wall_depth }
    }

    pub fn wall_depth(&self) -> f32 {
        self.wall_depth
    }

    /// Appends every band of `tri` to `buffers`.
    pub fn slice<M: AltitudeMetric + ?Sized>(
        &self,
        tri: &DisplacedTriangle,
        metric: &M,
        theme: &Theme,
        buffers: &mut MeshBuffers,
    ) {
        for h in band_heights(tri.altitudes) {
            self.slice_band(tri, h, metric, theme, buffers);
        }
    }

    /// Appends the roof and wall of `tri` for the band at `h`.
    pub fn slice_band<M: AltitudeMetric + ?Sized>(
        &self,
        tri: &DisplacedTriangle,
        h: f32,
        metric: &M,
        theme: &Theme,
        buffers: &mut MeshBuffers,
    ) {
        let class = match classify(tri.altitudes, h) {
            // A level triangle lying on the band is its own roof.
            Classification::NoneAbove if tri.altitudes.iter().all(|&a| a == h) => {
                Classification::AllAbove
            }
            Classification::NoneAbove => return,
            class => class,
        };

        let color = theme.color_for(metric.color_key(h));
        let roof = |p: Vec3| TerrainVertex::new(p, color, metric.roof_normal(p), metric.uv(p));
        let wall = |p: Vec3| TerrainVertex::new(p, color, metric.wall_normal(p), metric.uv(p));

        let t = tri.rotated(class.rotation());
        let [v0, v1, v2] = t.vertices;
        let [a0, a1, a2] = t.altitudes;

        let cur0 = metric.project_current(v0, a0, h);
        let cur1 = metric.project_current(v1, a1, h);
        let cur2 = metric.project_current(v2, a2, h);

        if class == Classification::AllAbove {
            buffers.push_triangle([roof(cur0), roof(cur1), roof(cur2)]);
            return;
        }

        let below0 = metric.project_below(v0, a0, h, self.wall_depth);
        let below1 = metric.project_below(v1, a1, h, self.wall_depth);
        let below2 = metric.project_below(v2, a2, h, self.wall_depth);

        let t1 = edge_t(a0, a2, h);
        let t2 = edge_t(a1, a2, h);
        let c1 = cur0.lerp(cur2, t1);
        let c2 = cur1.lerp(cur2, t2);
        let b1 = below0.lerp(below2, t1);
        let b2 = below1.lerp(below2, t2);

        match class {
            Classification::TwoAbove(_) => {
                buffers.push_quad([roof(cur0), roof(cur1), roof(c2), roof(c1)], QuadKind::Roof);
                buffers.push_quad([wall(c1), wall(c2), wall(b2), wall(b1)], QuadKind::Wall);
            }
            Classification::OneAbove(_) => {
                buffers.push_triangle([roof(cur2), roof(c1), roof(c2)]);
                buffers.push_quad([wall(c2), wall(c1), wall(b1), wall(b2)], QuadKind::Wall);
            }
            Classification::NoneAbove | Classification::AllAbove => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{FlatMetric, HeightPolicy, SphereMetric, SphereProjection, ThemeBand};

    fn two_tone() -> Theme {
        Theme::new(
            "two-tone",
            vec![
                ThemeBand::new(0.5, [1.0, 0.0, 0.0, 1.0]),
                ThemeBand::catch_all([0.0, 0.0, 1.0, 1.0]),
            ],
            HeightPolicy::ClampToLowestBand,
        )
        .unwrap()
    }

    fn flat_tri(heights: [f32; 3]) -> DisplacedTriangle {
        let base = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.5, 1.0, 0.0)];
        let verts = [0, 1, 2].map(|i| Vec3::new(base[i].x, base[i].y, heights[i]));
        DisplacedTriangle::new(verts, &FlatMetric::new(1.0))
    }

    fn assert_indices_valid(mesh: &MeshBuffers) {
        let n = mesh.vertex_count();
        for &i in mesh.indices() {
            assert!(i < n, "index {} out of range for {} vertices", i, n);
        }
    }

    #[test]
    fn test_classify_all_cases() {
        assert_eq!(classify([0.1, 0.2, 0.3], 0.5), Classification::NoneAbove);
        assert_eq!(classify([0.6, 0.7, 0.8], 0.5), Classification::AllAbove);
        assert_eq!(classify([0.6, 0.2, 0.3], 0.5), Classification::OneAbove(0));
        assert_eq!(classify([0.1, 0.6, 0.3], 0.5), Classification::OneAbove(1));
        assert_eq!(classify([0.1, 0.2, 0.6], 0.5), Classification::OneAbove(2));
        assert_eq!(classify([0.6, 0.7, 0.3], 0.5), Classification::TwoAbove([0, 1]));
        assert_eq!(classify([0.6, 0.2, 0.7], 0.5), Classification::TwoAbove([0, 2]));
        assert_eq!(classify([0.1, 0.6, 0.7], 0.5), Classification::TwoAbove([1, 2]));
        // Exactly on the band is not above.
        assert_eq!(classify([0.5, 0.5, 0.5], 0.5), Classification::NoneAbove);
    }

    #[test]
    fn test_rotation_puts_odd_vertex_last() {
        assert_eq!(Classification::OneAbove(0).rotation(), [1, 2, 0]);
        assert_eq!(Classification::OneAbove(1).rotation(), [2, 0, 1]);
        assert_eq!(Classification::OneAbove(2).rotation(), [0, 1, 2]);
        assert_eq!(Classification::TwoAbove([0, 1]).rotation(), [0, 1, 2]);
        assert_eq!(Classification::TwoAbove([1, 2]).rotation(), [1, 2, 0]);
        assert_eq!(Classification::TwoAbove([0, 2]).rotation(), [2, 0, 1]);
    }

    #[test]
    fn test_edge_t_level_edge_is_zero() {
        assert_eq!(edge_t(0.7, 0.7, 0.5), 0.0);
        assert!((edge_t(1.0, 0.0, 0.25) - 0.75).abs() < 1e-6);
        assert_eq!(edge_t(0.5, 0.0, 0.5), 0.0);
    }

    #[test]
    fn test_band_heights_half_tenth_steps() {
        let bands: Vec<f32> = band_heights([0.12, 0.31, 0.2]).collect();
        let expected = [0.1, 0.15, 0.2, 0.25, 0.3];
        assert_eq!(bands.len(), expected.len());
        for (b, e) in bands.iter().zip(expected) {
            assert!((b - e).abs() < 1e-6, "expected {}, got {}", e, b);
        }

        assert_eq!(band_heights([0.83, 0.83, 0.83]).count(), 1);
    }

    #[test]
    fn test_level_triangle_is_single_roof() {
        let mut mesh = MeshBuffers::new();
        MeanderingSlicer::default().slice(&flat_tri([0.83; 3]), &FlatMetric::new(1.0), &two_tone(), &mut mesh);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices(), &[0, 1, 2]);
        for v in mesh.vertices() {
            assert!((v.position[2] - 0.8).abs() < 1e-6);
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.color, [0.0, 0.0, 1.0, 1.0]);
        }
    }

    #[test]
    fn test_level_triangle_on_band_boundary_is_single_roof() {
        let metric = FlatMetric::new(1.0);
        for level in [0.0, 0.3, 0.5, 1.0] {
            let tri = flat_tri([level; 3]);
            assert_eq!(band_heights(tri.altitudes).count(), 1, "level {}", level);

            let mut mesh = MeshBuffers::new();
            MeanderingSlicer::default().slice(&tri, &metric, &two_tone(), &mut mesh);
            assert_eq!(mesh.vertex_count(), 3, "level {}", level);
            assert_eq!(mesh.indices(), &[0, 1, 2]);
            for v in mesh.vertices() {
                assert!((v.position[2] - level).abs() < 1e-6, "roof off its plane at level {}", level);
                assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            }
        }

        // A non-level triangle touching a band with its top is still skipped there.
        let mut mesh = MeshBuffers::new();
        MeanderingSlicer::default().slice_band(&flat_tri([0.5, 0.5, 0.2]), 0.5, &metric, &two_tone(), &mut mesh);
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_two_above_band_emits_roof_quad_and_wall() {
        let tri = flat_tri([1.0, 1.0, 0.0]);
        let metric = FlatMetric::new(1.0);
        let mut mesh = MeshBuffers::new();
        MeanderingSlicer::default().slice_band(&tri, 0.5, &metric, &two_tone(), &mut mesh);

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.indices(), &[0, 1, 2, 2, 3, 0, 4, 5, 6, 4, 6, 7]);

        let z: Vec<f32> = mesh.vertices().iter().map(|v| v.position[2]).collect();
        for &roof_z in &z[..4] {
            assert!((roof_z - 0.5).abs() < 1e-6);
        }
        assert!((z[4] - 0.5).abs() < 1e-6 && (z[5] - 0.5).abs() < 1e-6);
        assert!((z[6] - 0.45).abs() < 1e-6 && (z[7] - 0.45).abs() < 1e-6);

        // Crossings sit half way along the edges to the low vertex.
        let c1 = mesh.vertices()[3].position();
        let c2 = mesh.vertices()[2].position();
        assert!((c1 - Vec3::new(0.25, 0.5, 0.5)).length() < 1e-6, "c1 = {:?}", c1);
        assert!((c2 - Vec3::new(0.75, 0.5, 0.5)).length() < 1e-6, "c2 = {:?}", c2);
        assert_eq!(mesh.vertices()[0].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_one_above_band_emits_roof_triangle_and_wall() {
        let tri = flat_tri([0.0, 0.0, 1.0]);
        let mut mesh = MeshBuffers::new();
        MeanderingSlicer::new(0.1).slice_band(&tri, 0.5, &FlatMetric::new(1.0), &two_tone(), &mut mesh);

        assert_eq!(mesh.vertex_count(), 7);
        assert_eq!(mesh.indices(), &[0, 1, 2, 3, 4, 5, 3, 5, 6]);
        let top = mesh.vertices()[0].position();
        assert!((top - Vec3::new(0.5, 1.0, 0.5)).length() < 1e-6);
        assert!((mesh.vertices()[5].position[2] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_winding_survives_rotation() {
        let metric = FlatMetric::new(1.0);
        for heights in [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 0.0, 1.0]] {
            let mut mesh = MeshBuffers::new();
            MeanderingSlicer::default().slice(&flat_tri(heights), &metric, &two_tone(), &mut mesh);
            assert_indices_valid(&mesh);

            for tri in mesh.indices().chunks(3) {
                let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices()[tri[k] as usize].position());
                let n = (b - a).cross(c - a);
                if n.length() < 1e-9 {
                    continue;
                }
                let is_roof = mesh.vertices()[tri[0] as usize].normal == [0.0, 0.0, 1.0];
                if is_roof {
                    assert!(n.z > 0.0, "roof facing down for heights {:?}", heights);
                }
            }
        }
    }

    #[test]
    fn test_walls_face_downhill() {
        let metric = FlatMetric::new(1.0);
        for heights in [[1.0, 1.0, 0.0], [0.0, 0.0, 1.0]] {
            let mut mesh = MeshBuffers::new();
            MeanderingSlicer::default().slice_band(&flat_tri(heights), 0.5, &metric, &two_tone(), &mut mesh);
            let wall = &mesh.indices()[mesh.indices().len() - 6..mesh.indices().len() - 3];
            let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices()[wall[k] as usize].position());
            let n = (b - a).cross(c - a);
            let down_y = if heights[2] == 0.0 { 1.0 } else { -1.0 };
            assert!(n.y * down_y > 0.0, "wall normal {:?} for heights {:?}", n, heights);
        }
    }

    #[test]
    fn test_vertex_growth_matches_polygons() {
        let metric = FlatMetric::new(1.0);
        let tri = flat_tri([0.07, 0.93, 0.41]);
        let slicer = MeanderingSlicer::default();
        let theme = two_tone();
        let mut mesh = MeshBuffers::new();

        for h in band_heights(tri.altitudes) {
            let before = mesh.vertex_count();
            slicer.slice_band(&tri, h, &metric, &theme, &mut mesh);
            let added = mesh.vertex_count() - before;
            let expected = match classify(tri.altitudes, h) {
                Classification::NoneAbove => 0,
                Classification::AllAbove => 3,
                Classification::OneAbove(_) => 7,
                Classification::TwoAbove(_) => 8,
            };
            assert_eq!(added, expected, "band {}", h);
            assert_indices_valid(&mesh);
        }
    }

    #[test]
    fn test_boundary_vertices_do_not_produce_nan() {
        let metric = FlatMetric::new(1.0);
        let mut mesh = MeshBuffers::new();
        MeanderingSlicer::default().slice(&flat_tri([0.5, 0.5, 0.0]), &metric, &two_tone(), &mut mesh);
        MeanderingSlicer::default().slice(&flat_tri([0.5, 0.0, 0.5]), &metric, &two_tone(), &mut mesh);
        assert!(mesh.vertex_floats().iter().all(|f| f.is_finite()));
        assert_indices_valid(&mesh);
    }

    #[test]
    fn test_slicing_is_deterministic() {
        let metric = FlatMetric::new(1.0);
        let tri = flat_tri([0.12, 0.87, 0.44]);
        let mut a = MeshBuffers::new();
        let mut b = MeshBuffers::new();
        MeanderingSlicer::default().slice(&tri, &metric, &two_tone(), &mut a);
        MeanderingSlicer::default().slice(&tri, &metric, &two_tone(), &mut b);
        assert_eq!(a.vertex_bytes(), b.vertex_bytes());
        assert_eq!(a.index_bytes(), b.index_bytes());
    }

    #[test]
    fn test_sphere_bands_are_concentric() {
        let metric = SphereMetric::new(SphereProjection::Normalize, 1.0);
        let verts = [
            Vec3::new(1.0, 0.0, 0.0) * 1.62,
            Vec3::new(0.0, 1.0, 0.0) * 1.62,
            Vec3::new(0.0, 0.0, 1.0) * 1.38,
        ];
        let tri = DisplacedTriangle::new(verts, &metric);
        let mut mesh = MeshBuffers::new();
        MeanderingSlicer::default().slice_band(&tri, 1.5, &metric, &two_tone(), &mut mesh);

        assert_eq!(mesh.vertex_count(), 8);
        // Roof corners projected from the vertices lie on the band's shell.
        for v in &mesh.vertices()[..2] {
            assert!((v.position().length() - 1.5).abs() < 1e-5);
        }
        // Colour is keyed on altitude above the unit sphere.
        assert_eq!(mesh.vertices()[0].color, [1.0, 0.0, 0.0, 1.0]);
    }
}
