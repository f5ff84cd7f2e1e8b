//! Triangle meshes with per-vertex positions and UVs, plus a geodesic sphere
//! generator for planets.

use std::collections::HashMap;

use glam::{Vec2, Vec3};

/// An immutable triangle surface.
///
/// Faces are consecutive index triples when `indices` is present, otherwise
/// consecutive vertex triples. Owned by the host; synthesis only reads it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex texture coordinates, nominally in `[0, 1]²` with v up.
    pub uvs: Vec<Vec2>,
    /// Optional triangle index buffer.
    pub indices: Option<Vec<u32>>,
}

impl Mesh {
    /// Build a mesh from its attributes.
    pub fn new(positions: Vec<Vec3>, uvs: Vec<Vec2>, indices: Option<Vec<u32>>) -> Self {
        Self {
            positions,
            uvs,
            indices,
        }
    }

    /// Number of vertices that carry both a position and a UV.
    pub fn vertex_count(&self) -> usize {
        self.positions.len().min(self.uvs.len())
    }

    /// Number of complete triangles. A trailing partial triple is not counted.
    pub fn face_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    /// Returns `true` if faces are described by an index buffer.
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// An icosahedron subdivided `subdivisions` times, projected onto a
    /// sphere of `radius`, with shared (indexed) vertices.
    ///
    /// Subdivision 0 is the plain icosahedron: 12 vertices, 20 triangles.
    /// Each level multiplies the triangle count by four.
    pub fn icosphere(radius: f32, subdivisions: u32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

        let mut positions: Vec<Vec3> = vec![
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ];
        for p in &mut positions {
            *p = p.normalize();
        }

        let mut indices: Vec<u32> = vec![
            0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7,
            6, 7, 1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10,
            8, 6, 7, 9, 8, 1,
        ];

        for _ in 0..subdivisions {
            subdivide(&mut positions, &mut indices);
        }

        let uvs = positions.iter().map(|&p| spherical_uv(p)).collect();
        for p in &mut positions {
            *p *= radius;
        }

        Self {
            positions,
            uvs,
            indices: Some(indices),
        }
    }

    /// A geodesic sphere ready for UV painting: the [`icosphere`](Self::icosphere)
    /// expanded to one vertex per face corner, with UVs corrected per face so
    /// that triangles crossing the longitude seam or touching a pole do not
    /// stretch across the whole texture.
    ///
    /// Corrected U values may fall slightly outside `[0, 1]`; the painter's
    /// seam duplication covers the wrapped part.
    pub fn geodesic_sphere(radius: f32, subdivisions: u32) -> Self {
        let mut mesh = Self::icosphere(radius, subdivisions).to_non_indexed();
        for face in mesh.uvs.chunks_exact_mut(3) {
            wrap_seam(face);
        }
        for (face, corners) in mesh
            .uvs
            .chunks_exact_mut(3)
            .zip(mesh.positions.chunks_exact(3))
        {
            fix_pole(face, corners, radius);
        }
        mesh
    }

    /// Expand an indexed mesh so every face owns its three vertices.
    ///
    /// Non-indexed meshes are returned unchanged. Faces with out-of-range
    /// indices and a trailing partial triple are dropped.
    pub fn to_non_indexed(&self) -> Self {
        let Some(indices) = &self.indices else {
            return self.clone();
        };
        let count = self.vertex_count();
        let mut positions = Vec::with_capacity(indices.len());
        let mut uvs = Vec::with_capacity(indices.len());
        for tri in indices.chunks_exact(3) {
            if tri.iter().any(|&i| i as usize >= count) {
                continue;
            }
            for &i in tri {
                positions.push(self.positions[i as usize]);
                uvs.push(self.uvs[i as usize]);
            }
        }
        Self {
            positions,
            uvs,
            indices: None,
        }
    }
}

/// Equirectangular UV for a point on the sphere, north pole at `v = 1`.
fn spherical_uv(p: Vec3) -> Vec2 {
    let n = p.normalize_or_zero();
    let u = 0.5 + n.z.atan2(n.x) / std::f32::consts::TAU;
    let v = 0.5 + n.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI;
    Vec2::new(u, v)
}

/// Subdivide each triangle into 4 by splitting edges at midpoints.
fn subdivide(positions: &mut Vec<Vec3>, indices: &mut Vec<u32>) {
    let mut midpoint_cache: HashMap<(u32, u32), u32> = HashMap::new();
    let mut new_indices = Vec::with_capacity(indices.len() * 4);

    let get_midpoint =
        |a: u32, b: u32, pos: &mut Vec<Vec3>, cache: &mut HashMap<(u32, u32), u32>| -> u32 {
            let key = if a < b { (a, b) } else { (b, a) };
            if let Some(&idx) = cache.get(&key) {
                return idx;
            }
            let mid = (pos[a as usize] + pos[b as usize]).normalize();
            let idx = pos.len() as u32;
            pos.push(mid);
            cache.insert(key, idx);
            idx
        };

    for tri in indices.chunks(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let ab = get_midpoint(a, b, positions, &mut midpoint_cache);
        let bc = get_midpoint(b, c, positions, &mut midpoint_cache);
        let ca = get_midpoint(c, a, positions, &mut midpoint_cache);

        new_indices.extend_from_slice(&[a, ab, ca]);
        new_indices.extend_from_slice(&[b, bc, ab]);
        new_indices.extend_from_slice(&[c, ca, bc]);
        new_indices.extend_from_slice(&[ab, bc, ca]);
    }

    *indices = new_indices;
}

/// A face spanning both ends of the U range wraps the seam: push its low
/// corners past 1.0 so the triangle stays narrow.
fn wrap_seam(face: &mut [Vec2]) {
    let (min_u, max_u) = face
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), uv| {
            (lo.min(uv.x), hi.max(uv.x))
        });
    if max_u - min_u > 0.5 {
        for uv in face.iter_mut().filter(|uv| uv.x < 0.5) {
            uv.x += 1.0;
        }
    }
}

/// A pole vertex has no meaningful longitude; give it the mean U of the
/// face's other corners.
fn fix_pole(face: &mut [Vec2], corners: &[Vec3], radius: f32) {
    let pole_eps = 1e-4 * radius.abs().max(f32::EPSILON);
    for i in 0..face.len() {
        let p = corners[i];
        if p.x.abs() < pole_eps && p.z.abs() < pole_eps {
            let others: f32 = (0..face.len()).filter(|&j| j != i).map(|j| face[j].x).sum();
            face[i].x = others / (face.len() - 1) as f32;
        }
    }
}
