use digworld_common::CoordError;

/// Errors surfaced by the voxel kernel.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error(transparent)]
    Coord(#[from] CoordError),
    #[error("terrain config is invalid: {0}")]
    InvalidTerrain(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KernelError>;
