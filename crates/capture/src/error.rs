use std::path::PathBuf;

use scene::entity::EntityId;
use thiserror::Error;

use crate::id::GeometryId;

/// Recoverable failures raised while capturing or editing geometry.
///
/// Surface misses and too-short drawings are outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    #[error("no vertex of geometry {geometry} matches the picked marker position")]
    VertexNotFound { geometry: GeometryId },

    #[error("geometry {0} is not registered")]
    UnknownGeometry(GeometryId),

    #[error("geometry {0} is already registered")]
    DuplicateGeometry(GeometryId),

    #[error("region {0} does not exist")]
    UnknownRegion(usize),

    #[error("entity {0} has no vertex positions")]
    MissingPositions(EntityId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse capture config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid capture config: {0}")]
    Invalid(String),
}
