//! Mesh validation utilities
//!
//! Checks the buffer invariants every generated mesh must hold:
//! - Every triangle index points inside the vertex buffer
//! - UVs, when present, match the vertex count
//! - Coordinates are finite
//! - Triangles have non-zero area

use super::Mesh;
use crate::error::{MeshError, Result};
use crate::geometry::Point3;

/// Result of mesh validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Total number of triangles validated
    pub total: usize,
    /// Number of indices pointing past the end of the vertex buffer
    pub out_of_bounds: usize,
    /// Whether the UV buffer is non-empty and a different length than the vertex buffer
    pub uv_mismatch: bool,
    /// Number of submeshes whose index count is not a multiple of 3
    pub ragged_submeshes: usize,
    /// Number of degenerate triangles (zero or near-zero area)
    pub degenerate: usize,
    /// Number of vertices with invalid coordinates (NaN/Inf)
    pub invalid_coords: usize,
    /// Warning messages for issues found
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Check if the buffers can be consumed safely
    pub fn is_valid(&self) -> bool {
        self.out_of_bounds == 0
            && !self.uv_mismatch
            && self.ragged_submeshes == 0
            && self.invalid_coords == 0
    }

    /// Check if the mesh has any issues at all
    pub fn has_issues(&self) -> bool {
        !self.is_valid() || self.degenerate > 0
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        if !self.has_issues() {
            format!("Mesh valid: {} triangles, no issues", self.total)
        } else {
            format!(
                "Mesh issues: {} total, {} out-of-bounds indices, {} degenerate, {} invalid coords",
                self.total, self.out_of_bounds, self.degenerate, self.invalid_coords
            )
        }
    }
}

/// Minimum area threshold for non-degenerate triangles
const MIN_TRIANGLE_AREA: f32 = 1e-10;

/// Validate a mesh and return a detailed report
pub fn validate_mesh(mesh: &Mesh) -> ValidationResult {
    let vertex_count = mesh.vertices.len();
    let mut result = ValidationResult {
        total: mesh.triangle_count(),
        ..Default::default()
    };

    if !mesh.uvs.is_empty() && mesh.uvs.len() != vertex_count {
        result.uv_mismatch = true;
        result.warnings.push(format!(
            "{} uvs for {} vertices",
            mesh.uvs.len(),
            vertex_count
        ));
    }

    result.invalid_coords = mesh
        .vertices
        .iter()
        .filter(|v| v.iter().any(|c| !c.is_finite()))
        .count();
    if result.invalid_coords > 0 {
        result.warnings.push(format!(
            "{} vertices have NaN/Inf coordinates",
            result.invalid_coords
        ));
    }

    for (submesh, indices) in mesh.submeshes.iter().enumerate() {
        if indices.len() % 3 != 0 {
            result.ragged_submeshes += 1;
            result.warnings.push(format!(
                "Submesh {} has {} indices, not a multiple of 3",
                submesh,
                indices.len()
            ));
        }

        for tri in indices.chunks_exact(3) {
            let bad = tri.iter().filter(|&&i| i >= vertex_count).count();
            if bad > 0 {
                result.out_of_bounds += bad;
                continue;
            }
            let corners = [
                mesh.vertices[tri[0]],
                mesh.vertices[tri[1]],
                mesh.vertices[tri[2]],
            ];
            if triangle_area(&corners) < MIN_TRIANGLE_AREA {
                result.degenerate += 1;
            }
        }
    }

    if result.out_of_bounds > 0 {
        result.warnings.push(format!(
            "{} indices exceed the vertex count {}",
            result.out_of_bounds, vertex_count
        ));
    }
    if result.degenerate > 0 {
        result.warnings.push(format!(
            "{} degenerate triangles detected",
            result.degenerate
        ));
    }

    result
}

/// Fail when a mesh's buffers cannot be consumed safely
pub fn check_buffers(mesh: &Mesh) -> Result<()> {
    let report = validate_mesh(mesh);
    if report.is_valid() {
        Ok(())
    } else {
        Err(MeshError::InvalidMesh(format!(
            "{}: {}",
            mesh.name,
            report.warnings.join("; ")
        )))
    }
}

/// Calculate the area of a triangle from its vertices
fn triangle_area(vertices: &[Point3; 3]) -> f32 {
    let v0 = vertices[0];
    let v1 = vertices[1];
    let v2 = vertices[2];

    let edge_a = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let edge_b = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

    let cx = edge_a[1] * edge_b[2] - edge_a[2] * edge_b[1];
    let cy = edge_a[2] * edge_b[0] - edge_a[0] * edge_b[2];
    let cz = edge_a[0] * edge_b[1] - edge_a[1] * edge_b[0];

    0.5 * (cx * cx + cy * cy + cz * cz).sqrt()
}
