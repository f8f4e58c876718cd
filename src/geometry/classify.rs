use serde::Serialize;

use super::Point2;
use crate::error::{MeshError, Result};

/// Winding and convexity of a closed point loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PolygonType {
    ConvexClockwise,
    ConvexCounterClockwise,
    ConcaveClockwise,
    ConcaveCounterClockwise,
}

impl PolygonType {
    pub fn is_clockwise(self) -> bool {
        matches!(self, Self::ConvexClockwise | Self::ConcaveClockwise)
    }

    pub fn is_concave(self) -> bool {
        matches!(self, Self::ConcaveClockwise | Self::ConcaveCounterClockwise)
    }
}

const TURNS_RIGHT: u8 = 1;
const TURNS_LEFT: u8 = 2;

/// Classify the winding direction and convexity of a polygon
///
/// Sums the z component of the cross product of every pair of consecutive
/// edges. A positive sum means counter-clockwise. Turns in both directions
/// mean concave; a loop with no turns at all (every point collinear) is
/// reported as concave too.
pub fn classify(points: &[Point2]) -> Result<PolygonType> {
    let n = points.len();
    if n < 3 {
        return Err(MeshError::TooFewPoints { count: n });
    }

    let mut wind = 0.0f64;
    let mut flag = 0u8;

    for i in 0..n {
        let (xi, yi) = points[i];
        let (xj, yj) = points[(i + 1) % n];
        let (xk, yk) = points[(i + 2) % n];

        let z = (xj as f64 - xi as f64) * (yk as f64 - yj as f64)
            - (yj as f64 - yi as f64) * (xk as f64 - xj as f64);
        wind += z;

        if z < 0.0 {
            flag |= TURNS_RIGHT;
        } else if z > 0.0 {
            flag |= TURNS_LEFT;
        }
    }

    let concave = flag == (TURNS_RIGHT | TURNS_LEFT) || flag == 0;
    let counter_clockwise = wind > 0.0;

    Ok(match (concave, counter_clockwise) {
        (true, true) => PolygonType::ConcaveCounterClockwise,
        (true, false) => PolygonType::ConcaveClockwise,
        (false, true) => PolygonType::ConvexCounterClockwise,
        (false, false) => PolygonType::ConvexClockwise,
    })
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

    #[test]
    fn test_unit_square_is_convex_ccw() {
        let square = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        assert_eq!(
            classify(&square).unwrap(),
            PolygonType::ConvexCounterClockwise
        );
    }

    #[test]
    fn test_reversed_square_is_convex_cw() {
        let square = vec![(0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)];
        assert_eq!(classify(&square).unwrap(), PolygonType::ConvexClockwise);
    }

    #[test]
    fn test_l_shape_is_concave() {
        let kind = classify(&l_shape()).unwrap();
        assert_eq!(kind, PolygonType::ConcaveCounterClockwise);
        assert!(kind.is_concave());
    }

    #[test]
    fn test_reversal_flips_winding_only() {
        for poly in [
            l_shape(),
            vec![(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)],
            vec![(0.0, 0.0), (3.0, -1.0), (5.0, 2.0), (1.0, 4.0), (-1.0, 2.0)],
        ] {
            let forward = classify(&poly).unwrap();
            let mut reversed = poly.clone();
            reversed.reverse();
            let backward = classify(&reversed).unwrap();

            assert_ne!(forward.is_clockwise(), backward.is_clockwise());
            assert_eq!(forward.is_concave(), backward.is_concave());
        }
    }

    #[test]
    fn test_collinear_points_report_concave() {
        let line = vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)];
        assert!(classify(&line).unwrap().is_concave());
    }

    #[test]
    fn test_too_few_points() {
        let pair = vec![(0.0, 0.0), (1.0, 0.0)];
        assert_eq!(
            classify(&pair),
            Err(MeshError::TooFewPoints { count: 2 })
        );
    }
}
