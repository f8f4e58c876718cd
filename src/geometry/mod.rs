pub mod classify;
pub mod intersect;
pub mod simplify;
pub mod uv;

pub use classify::{PolygonType, classify};
pub use intersect::has_self_intersection;
pub use simplify::simplify_polygon;
pub use uv::{UvTransform, rotate_around_point};

/// A point in the local 2D drawing plane
pub type Point2 = (f32, f32);

/// A vertex position
pub type Point3 = [f32; 3];
