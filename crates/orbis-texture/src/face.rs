//! Triangle iteration over indexed and non-indexed meshes.

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::mesh::Mesh;

/// One corner of a face: the vertex's index, position and UV.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexRef {
    /// Index into the mesh's vertex attributes.
    pub index: u32,
    /// 3D position.
    pub position: Vec3,
    /// Texture coordinate.
    pub uv: Vec2,
}

/// Walks the triangular faces of a [`Mesh`] in buffer order.
///
/// Indexed meshes are grouped by consecutive index triples, non-indexed
/// meshes by consecutive vertex triples. The order is stable, so identical
/// inputs always paint identically. A trailing partial triple is ignored and
/// faces that reference a missing vertex are skipped.
#[derive(Clone, Copy)]
pub struct FaceWalker<'a> {
    mesh: &'a Mesh,
}

impl<'a> FaceWalker<'a> {
    /// Create a walker over `mesh`.
    pub fn new(mesh: &'a Mesh) -> Self {
        Self { mesh }
    }

    /// Iterate over all valid faces.
    pub fn faces(&self) -> Faces<'a> {
        Faces {
            mesh: self.mesh,
            next: 0,
            count: self.mesh.face_count(),
        }
    }

    /// Call `visit` once per valid face.
    pub fn for_each_face(&self, mut visit: impl FnMut(&[VertexRef; 3])) {
        for face in self.faces() {
            visit(&face);
        }
    }
}

/// Call `visit` once per valid face of `mesh`.
pub fn for_each_face(mesh: &Mesh, visit: impl FnMut(&[VertexRef; 3])) {
    FaceWalker::new(mesh).for_each_face(visit);
}

/// Iterator returned by [`FaceWalker::faces`].
pub struct Faces<'a> {
    mesh: &'a Mesh,
    next: usize,
    count: usize,
}

impl Faces<'_> {
    fn corner_indices(&self, face: usize) -> [u32; 3] {
        match &self.mesh.indices {
            Some(indices) => [indices[face * 3], indices[face * 3 + 1], indices[face * 3 + 2]],
            None => {
                let base = (face * 3) as u32;
                [base, base + 1, base + 2]
            }
        }
    }
}

impl Iterator for Faces<'_> {
    type Item = [VertexRef; 3];

    fn next(&mut self) -> Option<Self::Item> {
        let vertex_count = self.mesh.vertex_count();
        while self.next < self.count {
            let face = self.next;
            self.next += 1;

            let corners = self.corner_indices(face);
            if corners.iter().any(|&i| i as usize >= vertex_count) {
                debug!(face, ?corners, vertex_count, "skipping face with missing vertex");
                continue;
            }

            return Some(corners.map(|index| VertexRef {
                index,
                position: self.mesh.positions[index as usize],
                uv: self.mesh.uvs[index as usize],
            }));
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.count - self.next))
    }
}
