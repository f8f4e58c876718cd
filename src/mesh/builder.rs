use serde::Serialize;

use super::validation::check_buffers;
use crate::error::Result;
use crate::geometry::{Point2, Point3};

/// A triangle for STL output
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Three vertices: [[x, y, z], [x, y, z], [x, y, z]]
    pub vertices: [Point3; 3],
    /// Normal vector [nx, ny, nz]
    pub normal: Point3,
}

impl Triangle {
    /// Create a new triangle and calculate its normal
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        let normal = calculate_normal(v0, v1, v2);
        Self {
            vertices: [v0, v1, v2],
            normal,
        }
    }
}

/// Calculate the normal vector for a triangle using the cross product
pub fn calculate_normal(v0: Point3, v1: Point3, v2: Point3) -> Point3 {
    normalize(face_cross(v0, v1, v2))
}

/// Unnormalized cross product of the triangle's two edges from `v0`
fn face_cross(v0: Point3, v1: Point3, v2: Point3) -> Point3 {
    let u = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let v = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

fn normalize(n: Point3) -> Point3 {
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 1e-10 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 0.0, 1.0] // Default to up for degenerate triangles
    }
}

/// Axis-aligned bounding box of a vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds3 {
    pub min: Point3,
    pub max: Point3,
}

impl Bounds3 {
    /// Create bounds from a set of points
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let first = *points.first()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        bounds.expand(&points[1..]);
        Some(bounds)
    }

    /// Expand bounds to include another set of points
    pub fn expand(&mut self, points: &[Point3]) {
        for p in points {
            for axis in 0..3 {
                self.min[axis] = self.min[axis].min(p[axis]);
                self.max[axis] = self.max[axis].max(p[axis]);
            }
        }
    }

    pub fn center(&self) -> Point3 {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    pub fn size(&self) -> Point3 {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// An indexed mesh split into submeshes that share one vertex buffer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Point3>,
    /// One triangle index list per submesh, three indices per triangle
    pub submeshes: Vec<Vec<usize>>,
    /// Empty when the mesh carries no texture coordinates
    pub uvs: Vec<Point2>,
    pub normals: Vec<Point3>,
    pub bounds: Option<Bounds3>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.len() / 3).sum()
    }

    /// Every submesh's indices in order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.submeshes.iter().flatten().copied()
    }

    /// Per-vertex normals from the sum of the face normals touching each vertex
    ///
    /// Faces never share vertices across a crease here, so this is flat shading.
    pub fn recalculate_normals(&mut self) {
        let mut sums = vec![[0.0f32; 3]; self.vertices.len()];

        for tri in self.submeshes.iter().flat_map(|s| s.chunks_exact(3)) {
            let face = calculate_normal(
                self.vertices[tri[0]],
                self.vertices[tri[1]],
                self.vertices[tri[2]],
            );
            for &i in tri {
                for axis in 0..3 {
                    sums[i][axis] += face[axis];
                }
            }
        }

        self.normals = sums.into_iter().map(normalize).collect();
    }

    pub fn recalculate_bounds(&mut self) {
        self.bounds = Bounds3::from_points(&self.vertices);
    }

    /// Flatten into standalone triangles, e.g. for STL output
    pub fn triangles(&self) -> Vec<Triangle> {
        self.submeshes
            .iter()
            .flat_map(|s| s.chunks_exact(3))
            .map(|t| Triangle::new(self.vertices[t[0]], self.vertices[t[1]], self.vertices[t[2]]))
            .collect()
    }
}

/// Accumulator for assembling a multi-submesh [`Mesh`]
#[derive(Debug, Default)]
pub struct MeshBuilder {
    mesh: Mesh,
}

impl MeshBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            mesh: Mesh {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    /// Append vertices (and their UVs, if any) and return the index of the first one
    pub fn add_vertices(&mut self, vertices: &[Point3], uvs: &[Point2]) -> usize {
        let base = self.mesh.vertices.len();
        self.mesh.vertices.extend_from_slice(vertices);
        self.mesh.uvs.extend_from_slice(uvs);
        base
    }

    /// Add a submesh whose indices are relative to `offset`
    pub fn add_submesh(&mut self, indices: &[usize], offset: usize) {
        self.mesh.submeshes.push(shift_triangles(indices, offset));
    }

    /// Consume the builder, checking the buffers and recomputing normals and bounds
    pub fn finish(mut self) -> Result<Mesh> {
        check_buffers(&self.mesh)?;
        self.mesh.recalculate_normals();
        self.mesh.recalculate_bounds();
        Ok(self.mesh)
    }
}

/// Add `offset` to every index
pub fn shift_triangles(tris: &[usize], offset: usize) -> Vec<usize> {
    tris.iter().map(|&i| i + offset).collect()
}
