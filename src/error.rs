use thiserror::Error;

use crate::geometry::PolygonType;

/// Errors produced while turning a drawn polygon into meshes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// Classification and triangulation need at least a triangle
    #[error("polygon needs at least 3 points, got {count}")]
    TooFewPoints { count: usize },

    /// Two edges cross or two vertices coincide
    #[error("polygon intersects itself ({polygon_type:?})")]
    SelfIntersection { polygon_type: PolygonType },

    /// Ear clipping ran out of ears before reducing the polygon to a triangle
    #[error("triangulation stalled with {remaining} of {total} vertices left")]
    TriangulationFailed { remaining: usize, total: usize },

    /// An assembled mesh broke one of its buffer invariants
    #[error("assembled mesh is invalid: {0}")]
    InvalidMesh(String),
}

impl MeshError {
    /// Classification of the rejected polygon, when it got that far
    pub fn polygon_type(&self) -> Option<PolygonType> {
        match self {
            Self::SelfIntersection { polygon_type } => Some(*polygon_type),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MeshError>;
