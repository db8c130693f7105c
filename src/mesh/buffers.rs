//! Interleaved vertex and triangle-index buffers.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use thiserror::Error;

/// Floats per interleaved vertex: position, colour, normal, uv.
pub const FLOATS_PER_VERTEX: usize = 12;

/// One interleaved vertex, laid out for direct GPU upload.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl TerrainVertex {
    pub fn new(position: Vec3, color: [f32; 4], normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            color,
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: u32 },
}

/// Index layout of a four-vertex polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadKind {
    /// Triangles (0, 1, 2) and (2, 3, 0).
    Roof,
    /// Triangles (0, 1, 2) and (0, 2, 3).
    Wall,
}

impl QuadKind {
    fn pattern(self) -> [u32; 6] {
        match self {
            QuadKind::Roof => [0, 1, 2, 2, 3, 0],
            QuadKind::Wall => [0, 1, 2, 0, 2, 3],
        }
    }
}

/// Append-only mesh under construction.
///
/// The vertex count is the base every new polygon's indices are offset from,
/// so every index stays below it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    vertices: Vec<TerrainVertex>,
    indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Appends a vertex and returns its index.
    pub fn append_vertex(&mut self, position: Vec3, color: [f32; 4], normal: Vec3, uv: Vec2) -> u32 {
        let index = self.vertex_count();
        self.vertices.push(TerrainVertex::new(position, color, normal, uv));
        index
    }

    /// Appends absolute triangle indices; nothing is written if any is out of range.
    pub fn append_indices(&mut self, indices: &[u32]) -> Result<(), MeshError> {
        let vertex_count = self.vertex_count();
        if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
            return Err(MeshError::IndexOutOfRange { index, vertex_count });
        }
        self.indices.extend_from_slice(indices);
        Ok(())
    }

    /// Appends a triangle as three new vertices.
    pub fn push_triangle(&mut self, vertices: [TerrainVertex; 3]) {
        let base = self.vertex_count();
        self.vertices.extend_from_slice(&vertices);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Appends a quad as four new vertices split into two triangles.
    pub fn push_quad(&mut self, vertices: [TerrainVertex; 4], kind: QuadKind) {
        let base = self.vertex_count();
        self.vertices.extend_from_slice(&vertices);
        self.indices.extend(kind.pattern().iter().map(|i| base + i));
    }

    /// Moves every vertex and triangle of `other` onto the end of this mesh,
    /// rebasing its indices.
    pub fn append(&mut self, other: MeshBuffers) {
        let base = self.vertex_count();
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    /// Vertex data as a flat float array, twelve floats per vertex.
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Lowest and highest vertex altitude as measured by `measure`.
    pub fn altitude_range<F: Fn(Vec3) -> f32>(&self, measure: F) -> Option<(f32, f32)> {
        self.vertices.iter().map(|v| measure(v.position())).fold(None, |acc, a| match acc {
            None => Some((a, a)),
            Some((lo, hi)) => Some((lo.min(a), hi.max(a))),
        })
    }
}
