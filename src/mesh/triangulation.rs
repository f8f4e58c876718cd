use earcutr::earcut;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::geometry::Point2;

/// Turns smaller than this are treated as collinear and never clipped
const EPSILON: f32 = 1e-10;

/// Which algorithm fills the front face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TriangulationMethod {
    /// Built-in ear clipping
    #[default]
    EarClip,
    /// The `earcutr` port of mapbox earcut
    Earcut,
}

/// Signed area of a closed polygon (shoelace formula)
///
/// Positive for counter-clockwise loops.
pub fn area(points: &[Point2]) -> f32 {
    let n = points.len();
    let mut sum = 0.0f32;
    let mut p = n.wrapping_sub(1);
    for q in 0..n {
        let (px, py) = points[p];
        let (qx, qy) = points[q];
        sum += px * qy - qx * py;
        p = q;
    }
    sum * 0.5
}

/// Unsigned area, 0 for anything smaller than a triangle
pub fn get_area(points: &[Point2]) -> f32 {
    if points.len() > 2 {
        area(points).abs()
    } else {
        0.0
    }
}

/// Triangulate a simple polygon with the chosen method
///
/// Triangles are wound clockwise in the XY plane, so their normals face -Z.
pub fn triangulate_with(points: &[Point2], method: TriangulationMethod) -> Result<Vec<usize>> {
    match method {
        TriangulationMethod::EarClip => triangulate(points),
        TriangulationMethod::Earcut => triangulate_earcut(points),
    }
}

/// Ear-clipping triangulation of a simple polygon
///
/// Returns `n - 2` triangles as a flat index list. Every pass over the
/// remaining loop is capped at twice its length; if no ear turns up in that
/// many attempts the polygon cannot be reduced and an error is returned
/// instead of a partial index list.
pub fn triangulate(points: &[Point2]) -> Result<Vec<usize>> {
    let n = points.len();
    if n < 3 {
        return Err(MeshError::TooFewPoints { count: n });
    }

    let mut indices = Vec::with_capacity((n - 2) * 3);

    let mut remaining: Vec<usize> = if area(points) > 0.0 {
        (0..n).collect()
    } else {
        (0..n).rev().collect()
    };

    let mut nv = n;
    let mut attempts = 2 * nv;
    let mut v = nv - 1;

    while nv > 2 {
        if attempts == 0 {
            return Err(MeshError::TriangulationFailed {
                remaining: nv,
                total: n,
            });
        }
        attempts -= 1;

        let u = if v < nv { v } else { 0 };
        v = if u + 1 < nv { u + 1 } else { 0 };
        let w = if v + 1 < nv { v + 1 } else { 0 };

        if is_ear(points, &remaining[..nv], u, v, w) {
            indices.extend([remaining[u], remaining[v], remaining[w]]);
            remaining.remove(v);
            nv -= 1;
            attempts = 2 * nv;
        }
    }

    indices.reverse();

    debug!(points = n, triangles = indices.len() / 3, "ear clipping finished");

    Ok(indices)
}

/// Whether (u, v, w) is a counter-clockwise ear with no other vertex on or inside it
fn is_ear(points: &[Point2], remaining: &[usize], u: usize, v: usize, w: usize) -> bool {
    let a = points[remaining[u]];
    let b = points[remaining[v]];
    let c = points[remaining[w]];

    if EPSILON > (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0) {
        return false;
    }

    remaining
        .iter()
        .enumerate()
        .filter(|&(slot, _)| slot != u && slot != v && slot != w)
        .all(|(_, &idx)| !inside_triangle(a, b, c, points[idx]))
}

/// Inclusive point-in-triangle test for a counter-clockwise triangle
fn inside_triangle(a: Point2, b: Point2, c: Point2, p: Point2) -> bool {
    let cross = |from: Point2, to: Point2| {
        (to.0 - from.0) * (p.1 - from.1) - (to.1 - from.1) * (p.0 - from.0)
    };
    cross(a, b) >= 0.0 && cross(b, c) >= 0.0 && cross(c, a) >= 0.0
}

fn triangulate_earcut(points: &[Point2]) -> Result<Vec<usize>> {
    let n = points.len();
    if n < 3 {
        return Err(MeshError::TooFewPoints { count: n });
    }

    let flat: Vec<f64> = points
        .iter()
        .flat_map(|&(x, y)| [x as f64, y as f64])
        .collect();

    let raw = earcut(&flat, &[], 2).map_err(|e| {
        debug!(points = n, error = ?e, "earcut rejected polygon");
        MeshError::TriangulationFailed {
            remaining: n,
            total: n,
        }
    })?;
    if raw.len() != (n - 2) * 3 {
        return Err(MeshError::TriangulationFailed {
            remaining: n - raw.len() / 3,
            total: n,
        });
    }

    let mut indices = Vec::with_capacity(raw.len());
    for tri in raw.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        if area(&[points[a], points[b], points[c]]) > 0.0 {
            indices.extend([c, b, a]);
        } else {
            indices.extend([a, b, c]);
        }
    }

    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> Vec<Point2> {
        vec![
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ]
    }

    fn star() -> Vec<Point2> {
        (0..10)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::PI / 5.0;
                let r = if i % 2 == 0 { 5.0 } else { 2.0 };
                (r * angle.cos(), r * angle.sin())
            })
            .collect()
    }

    fn triangle_areas(points: &[Point2], indices: &[usize]) -> Vec<f32> {
        indices
            .chunks(3)
            .map(|t| area(&[points[t[0]], points[t[1]], points[t[2]]]))
            .collect()
    }

    fn assert_complete(points: &[Point2], indices: &[usize]) {
        let n = points.len();
        assert_eq!(indices.len(), (n - 2) * 3);
        assert!(indices.iter().all(|&i| i < n));
        for i in 0..n {
            assert!(indices.contains(&i), "vertex {} not used", i);
        }

        let areas = triangle_areas(points, indices);
        assert!(areas.iter().all(|&a| a < 0.0), "triangles must be clockwise");
        let total: f32 = areas.iter().map(|a| a.abs()).sum();
        assert!((total - get_area(points)).abs() < 1e-3);
    }

    #[test]
    fn test_area_unit_square() {
        let square = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        assert!((area(&square) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_area_flips_on_reversal() {
        for poly in [l_shape(), star()] {
            let mut reversed = poly.clone();
            reversed.reverse();
            assert!((area(&poly) + area(&reversed)).abs() < 1e-4);
            assert!(area(&poly).abs() > 0.0);
        }
    }

    #[test]
    fn test_get_area_degenerate() {
        assert_eq!(get_area(&[]), 0.0);
        assert_eq!(get_area(&[(0.0, 0.0), (1.0, 1.0)]), 0.0);
        let cw = vec![(0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)];
        assert!((get_area(&cw) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_triangulate_square() {
        let square = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let indices = triangulate(&square).unwrap();
        assert_eq!(indices.len(), 6);
        assert_complete(&square, &indices);
    }

    #[test]
    fn test_triangulate_l_shape_stays_inside() {
        let l = l_shape();
        let indices = triangulate(&l).unwrap();
        assert_eq!(indices.len() / 3, 4);
        assert_complete(&l, &indices);

        // The missing quadrant (1..2, 1..2) must not be covered
        for t in indices.chunks(3) {
            let cx = (l[t[0]].0 + l[t[1]].0 + l[t[2]].0) / 3.0;
            let cy = (l[t[0]].1 + l[t[1]].1 + l[t[2]].1) / 3.0;
            assert!(!(cx > 1.0 && cy > 1.0));
        }
    }

    #[test]
    fn test_triangulate_star() {
        let s = star();
        let indices = triangulate(&s).unwrap();
        assert_complete(&s, &indices);
    }

    #[test]
    fn test_triangulate_clockwise_input() {
        let mut l = l_shape();
        l.reverse();
        let indices = triangulate(&l).unwrap();
        assert_complete(&l, &indices);
    }

    #[test]
    fn test_triangulate_with_collinear_vertex() {
        let points = vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
        let indices = triangulate(&points).unwrap();
        assert_complete(&points, &indices);
    }

    #[test]
    fn test_triangulate_too_few_points() {
        assert_eq!(
            triangulate(&[(0.0, 0.0), (1.0, 0.0)]),
            Err(MeshError::TooFewPoints { count: 2 })
        );
    }

    #[test]
    fn test_fully_collinear_fails_loudly() {
        let line = vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)];
        assert!(matches!(
            triangulate(&line),
            Err(MeshError::TriangulationFailed { total: 4, .. })
        ));
    }

    #[test]
    fn test_earcut_matches_convention() {
        for poly in [l_shape(), star()] {
            let indices = triangulate_with(&poly, TriangulationMethod::Earcut).unwrap();
            assert_complete(&poly, &indices);
        }
    }

    #[test]
    fn test_earcut_failure_reports_whole_polygon() {
        let line = vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)];
        assert_eq!(
            triangulate_with(&line, TriangulationMethod::Earcut),
            Err(MeshError::TriangulationFailed {
                remaining: 4,
                total: 4
            })
        );
    }
}
