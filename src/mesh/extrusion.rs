use tracing::debug;

use super::builder::{Mesh, MeshBuilder};
use crate::config::DrawSettings;
use crate::error::Result;
use crate::geometry::uv::{centroid, perpendicular};
use crate::geometry::{Point2, Point3, UvTransform};

/// Winding of the side quads, 1 for counter-clockwise input
const WINDING_ORDER: usize = 1;

/// Graphics and collision meshes built from one polygon
#[derive(Debug, Clone)]
pub struct Extrusion {
    /// Submesh 0 is the front face, submesh 1 the sides when enabled
    pub graphics: Mesh,
    /// Closed side walls only, no UVs
    pub collision: Mesh,
}

/// Lift 2D points to 3D at a fixed depth
pub fn vertices_with_points(points: &[Point2], z: f32) -> Vec<Point3> {
    points.iter().map(|&(x, y)| [x, y, z]).collect()
}

/// Planar UVs for the front face, rotated about the polygon's centroid
pub fn front_uvs(points: &[Point2], transform: &UvTransform) -> Vec<Point2> {
    let (cx, cy) = centroid(points);
    let pivot = (cx - transform.offset.0, cy - transform.offset.1);

    points.iter().map(|&p| transform.apply(p, pivot)).collect()
}

/// One open quad per edge: (p, top), (p, bottom), (next, top), (next, bottom)
pub fn side_vertices(points: &[Point2], z_origin: f32, half_depth: f32) -> Vec<Point3> {
    let n = points.len();
    let mut vertices = Vec::with_capacity(n * 4);

    for i in 0..n {
        let (x, y) = points[i];
        let (nx, ny) = points[(i + 1) % n];

        vertices.push([x, y, z_origin + half_depth]);
        vertices.push([x, y, z_origin - half_depth]);
        vertices.push([nx, ny, z_origin + half_depth]);
        vertices.push([nx, ny, z_origin - half_depth]);
    }

    vertices
}

/// Side quads plus a trailing copy of the first edge's pair to close the strip
pub fn collision_vertices(points: &[Point2], z_origin: f32, half_depth: f32) -> Vec<Point3> {
    let mut vertices = side_vertices(points, z_origin, half_depth);
    if let Some(&(x, y)) = points.first() {
        vertices.push([x, y, z_origin + half_depth]);
        vertices.push([x, y, z_origin - half_depth]);
    }
    vertices
}

/// Two triangles per side quad
///
/// The winding is picked by the parity of each block's position in the
/// buffer. Blocks are six indices long, so every block lands on the first
/// winding, which faces outwards for a counter-clockwise polygon.
pub fn side_indices(edge_count: usize) -> Vec<usize> {
    let mut indices = vec![0; edge_count * 6];

    let mut v = 0;
    for (block, tri) in indices.chunks_exact_mut(6).enumerate() {
        let i = block * 6;
        if i % 2 != WINDING_ORDER {
            tri.copy_from_slice(&[v, v + 1, v + 2, v + 1, v + 3, v + 2]);
        } else {
            tri.copy_from_slice(&[v + 2, v + 1, v, v + 2, v + 3, v + 1]);
        }
        v += 4;
    }

    indices
}

/// UVs for the side quads
///
/// Each quad is unrolled flat: the bottom corners keep their XY position and
/// the top corners are pushed out along the edge normal by `side_length`.
/// The rotation pivot depends on every quad, so all raw UVs are produced
/// first and transformed in a second pass.
pub fn side_uvs(vertices: &[Point3], settings: &DrawSettings) -> Vec<Point2> {
    let len = vertices.len();
    if len == 0 {
        return Vec::new();
    }

    let depth = settings.side_length;
    let mut uvs = vec![(0.0, 0.0); len];
    let mut sum = (0.0f32, 0.0f32);

    for (quad, out) in vertices.chunks_exact(4).zip(uvs.chunks_exact_mut(4)) {
        let (nx, ny) = perpendicular(quad[0][0], quad[0][1], quad[2][0], quad[3][1]);

        out[1] = (quad[1][0], quad[1][1]);
        out[0] = (out[1].0 - nx * depth, out[1].1 - ny * depth);
        out[3] = (quad[3][0], quad[3][1]);
        out[2] = (out[3].0 - nx * depth, out[3].1 - ny * depth);

        sum.0 += out[0].0 + out[2].0;
        sum.1 += out[0].1 + out[2].1;
    }

    let pivot = (sum.0 / len as f32, sum.1 / len as f32);
    let transform = settings.uv_transform();

    uvs.into_iter().map(|uv| transform.apply(uv, pivot)).collect()
}

/// Build the graphics and collision meshes for a counter-clockwise polygon
///
/// `front_indices` is the triangulation of `points`.
pub fn extrude(
    points: &[Point2],
    front_indices: &[usize],
    settings: &DrawSettings,
) -> Result<Extrusion> {
    let half_side = settings.side_length / 2.0;
    let half_col = settings.col_depth / 2.0;
    let z_origin = settings.z_origin();
    let collision_origin = settings.collision_origin();

    let front_vertices = vertices_with_points(points, z_origin - half_side);
    let front_uv = front_uvs(points, &settings.uv_transform());

    let sides = side_vertices(points, z_origin, half_side);
    let side_tris = side_indices(points.len());

    let mut graphics = MeshBuilder::new("Graphics");
    let front = graphics.add_vertices(&front_vertices, &front_uv);
    graphics.add_submesh(front_indices, front);
    if settings.generate_side {
        let side_uv = side_uvs(&sides, settings);
        let offset = graphics.add_vertices(&sides, &side_uv);
        graphics.add_submesh(&side_tris, offset);
    }

    let mut collision = MeshBuilder::new("Collisions");
    let base = collision.add_vertices(
        &collision_vertices(points, collision_origin, half_col),
        &[],
    );
    collision.add_submesh(&side_tris, base);

    let graphics = graphics.finish()?;
    let collision = collision.finish()?;

    debug!(
        graphics_vertices = graphics.vertex_count(),
        collision_vertices = collision.vertex_count(),
        submeshes = graphics.submeshes.len(),
        "extruded polygon"
    );

    Ok(Extrusion {
        graphics,
        collision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Anchor;
    use crate::mesh::triangulation::triangulate;

    fn unit_square() -> Vec<Point2> {
        vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
    }

    fn close(a: Point2, b: Point2) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5
    }

    fn extrude_square(settings: &DrawSettings) -> Extrusion {
        let square = unit_square();
        let front = triangulate(&square).unwrap();
        extrude(&square, &front, settings).unwrap()
    }

    #[test]
    fn test_unit_square_counts() {
        let out = extrude_square(&DrawSettings::default());

        assert_eq!(out.graphics.vertex_count(), 4 + 16);
        assert_eq!(out.graphics.uvs.len(), 20);
        assert_eq!(out.graphics.submeshes.len(), 2);
        assert_eq!(out.graphics.submeshes[0].len(), 6);
        assert_eq!(out.graphics.submeshes[1].len(), 24);
        assert_eq!(out.collision.vertex_count(), 18);
        assert_eq!(out.collision.submeshes.len(), 1);
        assert!(out.collision.uvs.is_empty());
    }

    #[test]
    fn test_side_indices_shifted_past_front() {
        let out = extrude_square(&DrawSettings::default());
        assert!(out.graphics.submeshes[1].iter().all(|&i| i >= 4));
        assert_eq!(out.graphics.submeshes[1][..3], [4, 5, 6]);
        assert_eq!(out.collision.submeshes[0][..3], [0, 1, 2]);
    }

    #[test]
    fn test_indices_in_bounds() {
        let out = extrude_square(&DrawSettings::default());
        for mesh in [&out.graphics, &out.collision] {
            assert!(mesh.indices().all(|i| i < mesh.vertex_count()));
        }
    }

    #[test]
    fn test_without_sides() {
        let settings = DrawSettings {
            generate_side: false,
            ..Default::default()
        };
        let out = extrude_square(&settings);

        assert_eq!(out.graphics.vertex_count(), 4);
        assert_eq!(out.graphics.uvs.len(), 4);
        assert_eq!(out.graphics.submeshes.len(), 1);
        assert_eq!(out.collision.vertex_count(), 18);
    }

    #[test]
    fn test_front_depth_and_anchor() {
        let settings = DrawSettings {
            side_length: 2.0,
            col_depth: 4.0,
            anchor: Anchor::Front,
            col_anchor: Anchor::Back,
            z_position: 1.0,
            ..Default::default()
        };
        let out = extrude_square(&settings);

        // Graphics slab centred at 2.0, spanning 1.0..3.0; front face at 1.0
        assert!(out.graphics.vertices[..4].iter().all(|v| v[2] == 1.0));
        let bounds = out.graphics.bounds.unwrap();
        assert_eq!(bounds.min[2], 1.0);
        assert_eq!(bounds.max[2], 3.0);

        // Collision slab centred at -1.0, spanning -3.0..1.0
        let col = out.collision.bounds.unwrap();
        assert_eq!(col.min[2], -3.0);
        assert_eq!(col.max[2], 1.0);
    }

    #[test]
    fn test_collision_closing_pair() {
        let square = unit_square();
        let verts = collision_vertices(&square, 0.0, 0.5);
        assert_eq!(verts.len(), 18);
        assert_eq!(verts[16], [0.0, 0.0, 0.5]);
        assert_eq!(verts[17], [0.0, 0.0, -0.5]);
    }

    #[test]
    fn test_side_indices_pattern() {
        let indices = side_indices(2);
        assert_eq!(indices, vec![0, 1, 2, 1, 3, 2, 4, 5, 6, 5, 7, 6]);
    }

    #[test]
    fn test_normals_face_outwards() {
        let out = extrude_square(&DrawSettings::default());
        let g = &out.graphics;

        // Front face points towards -Z
        for n in &g.normals[..4] {
            assert!((n[2] + 1.0).abs() < 1e-5);
        }

        // Each side normal points away from the square's centre
        for (v, n) in g.vertices[4..].iter().zip(&g.normals[4..]) {
            let to_vertex = (v[0] - 0.5, v[1] - 0.5);
            assert!(to_vertex.0 * n[0] + to_vertex.1 * n[1] > 0.0);
            assert!(n[2].abs() < 1e-5);
        }
    }

    #[test]
    fn test_front_uvs_identity() {
        let square = unit_square();
        let uvs = front_uvs(&square, &UvTransform::default());
        for (uv, p) in uvs.iter().zip(&square) {
            assert!(close(*uv, *p));
        }
    }

    #[test]
    fn test_front_uvs_rotate_about_centroid() {
        let square = unit_square();
        let transform = UvTransform {
            rotation: 180.0,
            ..Default::default()
        };
        let uvs = front_uvs(&square, &transform);
        assert!(close(uvs[0], (1.0, 1.0)));
        assert!(close(uvs[2], (0.0, 0.0)));
    }

    #[test]
    fn test_side_uvs_unrolled() {
        let square = unit_square();
        let settings = DrawSettings {
            side_length: 2.0,
            ..Default::default()
        };
        let verts = side_vertices(&square, 0.0, 1.0);
        let uvs = side_uvs(&verts, &settings);

        // First edge runs along +X, its normal is +Y
        assert_eq!(uvs.len(), 16);
        assert!(close(uvs[1], (0.0, 0.0)));
        assert!(close(uvs[0], (0.0, -2.0)));
        assert!(close(uvs[3], (1.0, 0.0)));
        assert!(close(uvs[2], (1.0, -2.0)));
    }

    #[test]
    fn test_side_uv_pivot_uses_all_quads() {
        let square = unit_square();
        let verts = side_vertices(&square, 0.0, 0.5);

        let plain = side_uvs(&verts, &DrawSettings::default());
        let turned = side_uvs(
            &verts,
            &DrawSettings {
                uv_rotation: 180.0,
                ..Default::default()
            },
        );

        // A half turn maps each uv to 2 * pivot - uv
        let pivot = (
            (plain[0].0 + turned[0].0) / 2.0,
            (plain[0].1 + turned[0].1) / 2.0,
        );
        for (a, b) in plain.iter().zip(&turned) {
            assert!(close(((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0), pivot));
        }

        // Pivot is the sum of the top corners over the full vertex count
        let mut sum = (0.0, 0.0);
        for quad in plain.chunks_exact(4) {
            sum.0 += quad[0].0 + quad[2].0;
            sum.1 += quad[0].1 + quad[2].1;
        }
        assert!(close(pivot, (sum.0 / 16.0, sum.1 / 16.0)));
    }
}
