pub mod builder;
pub mod extrusion;
pub mod obj;
pub mod stl;
pub mod triangulation;
pub mod validation;

pub use builder::{Bounds3, Mesh, MeshBuilder, Triangle};
pub use extrusion::{Extrusion, extrude};
pub use obj::write_obj;
pub use stl::{write_mesh_stl, write_stl};
pub use triangulation::{TriangulationMethod, area, get_area, triangulate, triangulate_with};
pub use validation::{ValidationResult, validate_mesh};
