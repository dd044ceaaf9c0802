//! Voxel kernel: chunked occupancy, face-culling mesher, dirty-tracked rebuilds.
//!
//! # Invariants
//! - A clean chunk's mesh renders exactly its occupancy bits.
//! - `set`/`remove` only mark a chunk dirty; meshing happens in the rebuild sweep.
//! - A chunk exists iff a voxel was ever inserted into it.
//! - Buffers reach the GPU only through [`GpuResources`], and old buffers are
//!   released before a rebuilt mesh is uploaded.

pub mod chunk;
pub mod error;
pub mod gpu;
pub mod mesh;
pub mod terrain;
pub mod world;

pub use chunk::Chunk;
pub use error::{KernelError, Result};
pub use gpu::{BufferHandle, BufferKind, GpuResources, GpuStats, MemoryGpu};
pub use mesh::{ChunkMesh, Face, IndexFormat, MeshBuffer, MeshGeometry};
pub use terrain::{TerrainConfig, TerrainStats, generate};
pub use world::{RebuildStats, VoxelWorld};

pub fn crate_info() -> &'static str {
    "digworld-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use digworld_common::VoxelCoord;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }

    #[test]
    fn generated_world_meshes_end_to_end() {
        let mut world = VoxelWorld::new();
        let config = TerrainConfig {
            extent_x: 32,
            extent_z: 32,
            ..TerrainConfig::default()
        };
        generate(&mut world, &config);

        let mut gpu = MemoryGpu::new();
        let stats = world.rebuild_dirty_chunks(&mut gpu);
        assert_eq!(stats.chunks_rebuilt, world.chunk_count());
        assert_eq!(world.dirty_chunk_count(), 0);

        // Digging one voxel only rebuilds its own chunk.
        world.remove_voxel(VoxelCoord::new(8, 0, 8));
        let stats = world.rebuild_dirty_chunks(&mut gpu);
        assert_eq!(stats.chunks_rebuilt, 1);
    }
}
