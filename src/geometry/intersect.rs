use super::Point2;

/// Returns true if the polygon touches or crosses itself
///
/// Two checks are made. Any two vertices sharing the exact same coordinates
/// count as an intersection. For polygons with more than three vertices,
/// every edge is then tested against each edge that shares no vertex with
/// it, using each edge's perpendicular as a separating axis: the pair
/// crosses when each edge has its endpoints on opposite sides of the other
/// edge's line.
pub fn has_self_intersection(points: &[Point2]) -> bool {
    has_coincident_vertices(points) || has_crossing_edges(points)
}

fn has_coincident_vertices(points: &[Point2]) -> bool {
    points
        .iter()
        .enumerate()
        .any(|(i, a)| points[i + 1..].iter().any(|b| a == b))
}

fn has_crossing_edges(points: &[Point2]) -> bool {
    let n = points.len();
    if n <= 3 {
        return false;
    }

    for i in 0..n {
        let j = (i + 1) % n;
        let a = points[i];
        let b = points[j];

        // Edges starting at j+1 up to the one ending at i-1 share no vertex with (i, j)
        for step in 2..n - 1 {
            let k = (i + step) % n;
            let l = (k + 1) % n;
            if segments_cross(a, b, points[k], points[l]) {
                return true;
            }
        }
    }

    false
}

/// Two-sided half-plane test between segment (a, b) and segment (c, d)
///
/// Collinear segments have every endpoint on both lines, so they count as
/// crossing only when their spans overlap.
fn segments_cross(a: Point2, b: Point2, c: Point2, d: Point2) -> bool {
    let ab_normal = perpendicular(a, b);
    let (sc, sd) = (side_of(ab_normal, a, c), side_of(ab_normal, a, d));
    let cd_normal = perpendicular(c, d);
    let (sa, sb) = (side_of(cd_normal, c, a), side_of(cd_normal, c, b));

    if sc == 0.0 && sd == 0.0 && sa == 0.0 && sb == 0.0 {
        return spans_overlap(a, b, c, d);
    }

    (sc >= 0.0) != (sd >= 0.0) && (sa >= 0.0) != (sb >= 0.0)
}

/// Overlap of two collinear segments, projected onto the longer one
fn spans_overlap(a: Point2, b: Point2, c: Point2, d: Point2) -> bool {
    let (origin, dir) = if length_sq(a, b) >= length_sq(c, d) {
        (a, (b.0 - a.0, b.1 - a.1))
    } else {
        (c, (d.0 - c.0, d.1 - c.1))
    };
    let project = |p: Point2| (p.0 - origin.0) * dir.0 + (p.1 - origin.1) * dir.1;

    let (a, b) = (project(a), project(b));
    let (c, d) = (project(c), project(d));
    a.max(b) >= c.min(d) && c.max(d) >= a.min(b)
}

fn length_sq(from: Point2, to: Point2) -> f32 {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    dx * dx + dy * dy
}

fn perpendicular(from: Point2, to: Point2) -> Point2 {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    (dy, -dx)
}

/// Signed distance-like value of `p` against the line through `origin` with `normal`
fn side_of(normal: Point2, origin: Point2, p: Point2) -> f32 {
    let (dx, dy) = (p.0 - origin.0, p.1 - origin.1);
    dx * normal.0 + dy * normal.1
}
