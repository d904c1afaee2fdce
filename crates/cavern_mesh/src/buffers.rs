//! # Mesh Buffers
//!
//! The flat output of one triangulation: positions, index triples, normals
//! and UVs. Every buffer is `Pod`, so it can be handed to a GPU upload as
//! bytes.
//!
//! ## Invariants
//!
//! - `normals.len() == vertices.len() == uvs.len()`
//! - every triangle index is `< vertices.len()`

use cavern_core::{CaveError, CaveResult, Vec2, Vec3};

/// Output buffers of one triangulated tile.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Index triples into `vertices`.
    pub triangles: Vec<[u32; 3]>,
    /// One normal per vertex.
    pub normals: Vec<Vec3>,
    /// One texture coordinate per vertex.
    pub uvs: Vec<Vec2>,
}

impl MeshBuffers {
    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if no triangle was emitted.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Checks the buffer invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::MalformedMesh`] on a length mismatch or an index
    /// past the end of the vertex buffer.
    pub fn validate(&self) -> CaveResult<()> {
        let n = self.vertices.len();
        if self.normals.len() != n || self.uvs.len() != n {
            return Err(CaveError::MalformedMesh(format!(
                "{n} vertices but {} normals and {} uvs",
                self.normals.len(),
                self.uvs.len()
            )));
        }
        for (t, tri) in self.triangles.iter().enumerate() {
            if let Some(&bad) = tri.iter().find(|&&i| i as usize >= n) {
                return Err(CaveError::MalformedMesh(format!(
                    "triangle {t} references vertex {bad}, only {n} exist"
                )));
            }
        }
        Ok(())
    }

    /// Flattened index buffer (three indices per triangle).
    #[must_use]
    pub fn index_buffer(&self) -> &[u32] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Vertex positions as raw bytes.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Returns a copy moved by `offset`.
    ///
    /// Normals are stored as offset points, not directions, so they move
    /// with the vertices.
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            vertices: self.vertices.iter().map(|&v| v + offset).collect(),
            triangles: self.triangles.clone(),
            normals: self.normals.iter().map(|&n| n + offset).collect(),
            uvs: self.uvs.clone(),
        }
    }
}
