//! Polygon to mesh pipeline
//!
//! classify → canonicalize winding → reject self-intersections → triangulate
//! → extrude. Validation always runs before triangulation; ear clipping a
//! crossing polygon gives meaningless output.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::DrawSettings;
use crate::error::{MeshError, Result};
use crate::geometry::{Point2, PolygonType, classify, has_self_intersection};
use crate::mesh::{Mesh, area, extrude, triangulate_with};

/// Output of a successful [`mesh_with_points`] call
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedMesh {
    /// Front face, plus sides as a second submesh when enabled
    pub graphics: Mesh,
    /// Side walls only
    pub collision: Mesh,
    /// Classification of the points in the order they were given
    pub polygon_type: PolygonType,
}

/// Triangulate and extrude a drawn polygon into graphics and collision meshes
///
/// `points` is never modified. Input with a negative signed area is reversed
/// internally so the meshes always come out with outward-facing triangles.
/// The reported [`PolygonType`] is the turn-sum classification of the
/// caller's order and can disagree with the area sign on concave loops. A
/// polygon that
/// touches or crosses itself is rejected with
/// [`MeshError::SelfIntersection`], which still carries its classification.
pub fn mesh_with_points(points: &[Point2], settings: &DrawSettings) -> Result<GeneratedMesh> {
    let mut points = points.to_vec();

    let polygon_type = classify(&points)?;
    if area(&points) < 0.0 {
        points.reverse();
    }

    if has_self_intersection(&points) {
        warn!(
            points = points.len(),
            ?polygon_type,
            "Mesh generation failed on self-intersect test"
        );
        return Err(MeshError::SelfIntersection { polygon_type });
    }

    let front = triangulate_with(&points, settings.triangulation)?;
    let extrusion = extrude(&points, &front, settings)?;

    debug!(
        ?polygon_type,
        triangles = extrusion.graphics.triangle_count(),
        "generated meshes"
    );

    Ok(GeneratedMesh {
        graphics: extrusion.graphics,
        collision: extrusion.collision,
        polygon_type,
    })
}
