//! Shared addressing for the digworld crates.
//!
//! # Invariants
//! - `VoxelCoord::from_parts(c.chunk(), c.local()) == c` for every coordinate.
//! - Local offsets are always inside `0..CHUNK_DIM` on every axis.

pub mod coords;

pub use coords::{
    CHUNK_AREA, CHUNK_DIM, CHUNK_MASK, CHUNK_SHIFT, CHUNK_VOLUME, ChunkCoord, CoordError,
    LocalOffset, VOXEL_EXTENT, VOXEL_SIZE, VoxelCoord,
};

pub fn crate_info() -> &'static str {
    "digworld-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
