use digworld_common::ChunkCoord;
use digworld_kernel::{Chunk, VoxelWorld};
use serde::Serialize;

/// World inspector for developer tooling.
///
/// Read-only queries against the voxel world for the overlay, the CLI and
/// debugging.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world and its cached meshes.
    pub fn summary(world: &VoxelWorld) -> WorldSummary {
        let mut summary = WorldSummary::default();
        world.for_each_chunk(|_, chunk| {
            summary.chunks += 1;
            summary.voxels += chunk.voxel_count();
            if chunk.is_dirty() {
                summary.dirty_chunks += 1;
            }
            if chunk.is_vacant() {
                summary.vacant_chunks += 1;
            }
            let mesh = chunk.mesh();
            if mesh.is_drawable() {
                summary.drawable_chunks += 1;
                summary.indices += mesh.index_count as u64;
            }
        });
        summary
    }

    /// Details about a single chunk.
    pub fn inspect_chunk(world: &VoxelWorld, coord: ChunkCoord) -> Option<ChunkInfo> {
        world.chunk(coord).map(|chunk| ChunkInfo::new(coord, chunk))
    }

    /// All chunk coordinates, sorted.
    pub fn list_chunks(world: &VoxelWorld) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = world.chunks().map(|(c, _)| c).collect();
        coords.sort();
        coords
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorldSummary {
    pub chunks: usize,
    pub voxels: usize,
    pub dirty_chunks: usize,
    /// Chunks that exist but currently hold no voxels.
    pub vacant_chunks: usize,
    pub drawable_chunks: usize,
    pub indices: u64,
}

impl WorldSummary {
    pub fn triangles(&self) -> u64 {
        self.indices / 3
    }
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: chunks={} voxels={} dirty={} drawable={} triangles={}",
            self.chunks,
            self.voxels,
            self.dirty_chunks,
            self.drawable_chunks,
            self.triangles()
        )
    }
}

/// Detailed info about a single chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkInfo {
    pub coord: ChunkCoord,
    pub origin: [f32; 3],
    pub voxels: usize,
    pub dirty: bool,
    pub rebuilds: u64,
    pub index_count: u32,
    pub drawable: bool,
}

impl ChunkInfo {
    fn new(coord: ChunkCoord, chunk: &Chunk) -> Self {
        Self {
            coord,
            origin: coord.origin().to_array(),
            voxels: chunk.voxel_count(),
            dirty: chunk.is_dirty(),
            rebuilds: chunk.rebuild_count(),
            index_count: chunk.mesh().index_count,
            drawable: chunk.mesh().is_drawable(),
        }
    }
}

impl std::fmt::Display for ChunkInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {} origin=({:.0}, {:.0}, {:.0}) voxels={} dirty={} rebuilds={} indices={}",
            self.coord,
            self.origin[0],
            self.origin[1],
            self.origin[2],
            self.voxels,
            self.dirty,
            self.rebuilds,
            self.index_count,
        )
    }
}
