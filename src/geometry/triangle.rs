//! Raw base-mesh triangles and their recursive midpoint subdivision.

use glam::Vec3;

/// An ordered triple of base-mesh vertices. The order carries the winding.
pub type RawTriangle = [Vec3; 3];

/// Midpoints of the three sides; side `i` runs from vertex `i` to `i + 1 (mod 3)`.
pub fn side_midpoints(tri: &RawTriangle) -> [Vec3; 3] {
    [
        (tri[0] + tri[1]) * 0.5,
        (tri[1] + tri[2]) * 0.5,
        (tri[2] + tri[0]) * 0.5,
    ]
}

/// Splits a triangle into its three corner triangles followed by the
/// central midpoint triangle. All four keep the parent's winding.
pub fn split_triangle(tri: &RawTriangle) -> [RawTriangle; 4] {
    let m = side_midpoints(tri);
    [
        [tri[0], m[0], m[2]],
        [tri[1], m[1], m[0]],
        [tri[2], m[2], m[1]],
        m,
    ]
}

/// Number of leaf triangles produced from `base_count` coarse triangles.
pub fn leaf_count(base_count: usize, max_depth: u32) -> usize {
    base_count * 4usize.pow(max_depth.saturating_sub(1))
}

/// Lazy depth-first subdivision of a set of coarse triangles.
///
/// Coarse triangles sit at depth 1; a triangle at `max_depth` is yielded as a
/// leaf, anything shallower is split into four children. The iterator is
/// finite and cannot be restarted; build a new one to walk the mesh again.
#[derive(Debug, Clone)]
pub struct Subdivision {
    stack: Vec<(RawTriangle, u32)>,
    max_depth: u32,
}

impl Subdivision {
    /// Creates a subdivision walk over `base` down to `max_depth`.
    pub fn new<I>(base: I, max_depth: u32) -> Self
    where
        I: IntoIterator<Item = RawTriangle>,
    {
        let mut stack: Vec<(RawTriangle, u32)> = base.into_iter().map(|tri| (tri, 1)).collect();
        // Popped from the back, so reverse to yield in base order.
        stack.reverse();
        Self { stack, max_depth }
    }

    /// Depth at which triangles are emitted.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    fn remaining(&self) -> usize {
        self.stack
            .iter()
            .map(|&(_, depth)| 4usize.pow(self.max_depth.saturating_sub(depth)))
            .sum()
    }
}

impl Iterator for Subdivision {
    type Item = RawTriangle;

    fn next(&mut self) -> Option<RawTriangle> {
        while let Some((tri, depth)) = self.stack.pop() {
            if depth >= self.max_depth {
                return Some(tri);
            }
            for child in split_triangle(&tri).into_iter().rev() {
                self.stack.push((child, depth + 1));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Subdivision {}
