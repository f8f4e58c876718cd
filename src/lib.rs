//! polyextrude - Turn hand-drawn 2D polygons into extruded 3D meshes

pub mod config;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod input;
pub mod mesh;

pub use config::{Anchor, DrawSettings};
pub use draw::{GeneratedMesh, mesh_with_points};
pub use error::MeshError;
pub use geometry::{Point2, Point3, PolygonType};
