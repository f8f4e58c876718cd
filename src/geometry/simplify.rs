use geo::{LineString, Simplify};

use super::Point2;

/// Douglas-Peucker simplification of a closed drawn stroke
///
/// The loop is closed before simplifying so the seam between the last and
/// first point is treated like any other edge, then reopened. Returns the
/// input unchanged when `epsilon` is not positive or simplification would
/// leave fewer than 3 points.
pub fn simplify_polygon(points: &[Point2], epsilon: f32) -> Vec<Point2> {
    if epsilon <= 0.0 || points.len() < 4 {
        return points.to_vec();
    }

    let mut ring: LineString<f64> = points
        .iter()
        .map(|&(x, y)| geo::coord! { x: x as f64, y: y as f64 })
        .collect();
    ring.close();

    let simplified = ring.simplify(&(epsilon as f64));
    let mut out: Vec<Point2> = simplified
        .0
        .into_iter()
        .map(|c| (c.x as f32, c.y as f32))
        .collect();

    if out.len() > 1 && out.first() == out.last() {
        out.pop();
    }

    if out.len() < 3 {
        return points.to_vec();
    }

    out
}
