use super::Point2;

/// Offset, rotation and scale applied to every generated UV
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvTransform {
    pub offset: Point2,
    /// Degrees
    pub rotation: f32,
    pub scale: Point2,
}

impl Default for UvTransform {
    fn default() -> Self {
        Self {
            offset: (0.0, 0.0),
            rotation: 0.0,
            scale: (1.0, 1.0),
        }
    }
}

impl UvTransform {
    /// Shift by -offset, rotate about `pivot`, then scale
    pub fn apply(&self, uv: Point2, pivot: Point2) -> Point2 {
        let shifted = (uv.0 - self.offset.0, uv.1 - self.offset.1);
        let (x, y) = rotate_around_point(shifted, pivot, self.rotation);
        (x * self.scale.0, y * self.scale.1)
    }
}

/// Rotate `p` about `origin` by `degrees`
///
/// Uses `(x·cos + y·sin, -x·sin + y·cos)`, so positive angles turn the
/// point clockwise.
pub fn rotate_around_point(p: Point2, origin: Point2, degrees: f32) -> Point2 {
    let (s, c) = degrees.to_radians().sin_cos();
    let px = p.0 - origin.0;
    let py = p.1 - origin.1;

    let x = px * c + py * s;
    let y = -px * s + py * c;

    (x + origin.0, y + origin.1)
}

/// Mean of all points, (0, 0) for an empty slice
pub fn centroid(points: &[Point2]) -> Point2 {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
    let n = points.len() as f32;
    (sx / n, sy / n)
}

/// Unit normal of the segment (x, y) -> (x2, y2), zero for a zero-length segment
pub fn perpendicular(x: f32, y: f32, x2: f32, y2: f32) -> Point2 {
    let (nx, ny) = (-(y2 - y), x2 - x);
    let len = (nx * nx + ny * ny).sqrt();
    if len > 1e-10 {
        (nx / len, ny / len)
    } else {
        (0.0, 0.0)
    }
}
