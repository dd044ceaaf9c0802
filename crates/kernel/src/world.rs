use std::collections::HashMap;

use digworld_common::{ChunkCoord, VoxelCoord};
use serde::Serialize;

use crate::chunk::Chunk;
use crate::gpu::GpuResources;

/// Sparse voxel world: chunk coordinate to chunk.
///
/// A chunk exists once any voxel was inserted into it and stays even after
/// all of its voxels are removed. Iteration order over chunks is unspecified.
#[derive(Debug, Default)]
pub struct VoxelWorld {
    chunks: HashMap<ChunkCoord, Chunk>,
}

/// Outcome of one [`VoxelWorld::rebuild_dirty_chunks`] sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RebuildStats {
    pub chunks_visited: usize,
    pub chunks_rebuilt: usize,
    pub indices_uploaded: u64,
}

impl VoxelWorld {
    /// An empty world with no chunks.
    pub fn new() -> Self {
        Self::default()
    }

    /// The chunk owning `coord`, inserting an empty one if absent.
    pub fn get_or_create_chunk(&mut self, coord: VoxelCoord) -> &mut Chunk {
        self.chunks.entry(coord.chunk()).or_default()
    }

    /// Mark the voxel at `coord` occupied.
    pub fn add_voxel(&mut self, coord: VoxelCoord) {
        let local = coord.local();
        self.get_or_create_chunk(coord).set(local);
    }

    /// Clear the voxel at `coord`. Never creates a chunk.
    pub fn remove_voxel(&mut self, coord: VoxelCoord) {
        if let Some(chunk) = self.chunks.get_mut(&coord.chunk()) {
            chunk.remove(coord.local());
        }
    }

    pub fn is_occupied(&self, coord: VoxelCoord) -> bool {
        self.chunks
            .get(&coord.chunk())
            .is_some_and(|c| !c.is_empty(coord.local()))
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Visit every chunk. Order is unspecified.
    pub fn for_each_chunk(&self, mut visitor: impl FnMut(ChunkCoord, &Chunk)) {
        for (coord, chunk) in &self.chunks {
            visitor(*coord, chunk);
        }
    }

    /// Iterate over every chunk. Order is unspecified.
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkCoord, &Chunk)> {
        self.chunks.iter().map(|(c, chunk)| (*c, chunk))
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn voxel_count(&self) -> usize {
        self.chunks.values().map(Chunk::voxel_count).sum()
    }

    pub fn dirty_chunk_count(&self) -> usize {
        self.chunks.values().filter(|c| c.is_dirty()).count()
    }

    /// Rebuild every dirty chunk's mesh. Clean chunks are skipped without meshing.
    pub fn rebuild_dirty_chunks(&mut self, gpu: &mut dyn GpuResources) -> RebuildStats {
        let _span = tracing::info_span!("rebuild_dirty_chunks").entered();

        let mut stats = RebuildStats {
            chunks_visited: self.chunks.len(),
            ..Default::default()
        };
        for (coord, chunk) in &mut self.chunks {
            if chunk.rebuild_if_dirty(gpu) {
                stats.chunks_rebuilt += 1;
                if chunk.mesh().is_drawable() {
                    stats.indices_uploaded += chunk.mesh().index_count as u64;
                }
                tracing::debug!(
                    %coord,
                    indices = chunk.mesh().index_count,
                    "rebuilt chunk mesh"
                );
            }
        }

        tracing::trace!(
            visited = stats.chunks_visited,
            rebuilt = stats.chunks_rebuilt,
            "rebuild sweep complete"
        );
        stats
    }

    /// Hand every mesh back to `gpu`. Chunks become dirty again.
    pub fn release_all(&mut self, gpu: &mut dyn GpuResources) {
        for chunk in self.chunks.values_mut() {
            chunk.release_mesh(gpu);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::MemoryGpu;

    #[test]
    fn world_starts_empty() {
        let w = VoxelWorld::new();
        assert_eq!(w.chunk_count(), 0);
        assert_eq!(w.voxel_count(), 0);
    }

    #[test]
    fn add_voxel_creates_one_chunk() {
        let mut w = VoxelWorld::new();
        w.add_voxel(VoxelCoord::new(3, 4, 5));
        assert_eq!(w.chunk_count(), 1);
        assert!(w.is_occupied(VoxelCoord::new(3, 4, 5)));
        assert!(w.chunk(ChunkCoord::new(0, 0, 0)).is_some());

        // Same chunk, no new entry.
        w.add_voxel(VoxelCoord::new(15, 15, 15));
        assert_eq!(w.chunk_count(), 1);

        w.add_voxel(VoxelCoord::new(16, 0, 0));
        assert_eq!(w.chunk_count(), 2);
    }

    #[test]
    fn remove_voxel_never_creates_chunk() {
        let mut w = VoxelWorld::new();
        w.remove_voxel(VoxelCoord::new(100, 100, 100));
        assert_eq!(w.chunk_count(), 0);
    }

    #[test]
    fn emptied_chunk_is_kept() {
        let mut w = VoxelWorld::new();
        let c = VoxelCoord::new(-5, 2, 9);
        w.add_voxel(c);
        w.remove_voxel(c);
        assert!(!w.is_occupied(c));
        assert_eq!(w.chunk_count(), 1);
        assert!(w.chunk(c.chunk()).unwrap().is_dirty());
    }

    #[test]
    fn negative_coordinates_land_in_negative_chunks() {
        let mut w = VoxelWorld::new();
        w.add_voxel(VoxelCoord::new(-1, -1, -1));
        let chunk = w.chunk(ChunkCoord::new(-1, -1, -1)).unwrap();
        assert_eq!(chunk.voxel_count(), 1);
        assert!(!w.is_occupied(VoxelCoord::new(15, 15, 15)));
    }

    #[test]
    fn for_each_chunk_visits_all() {
        let mut w = VoxelWorld::new();
        for i in 0..5 {
            w.add_voxel(VoxelCoord::new(i * 16, 0, 0));
        }
        let mut seen = Vec::new();
        w.for_each_chunk(|coord, _| seen.push(coord));
        seen.sort();
        let expected: Vec<ChunkCoord> = (0..5).map(|i| ChunkCoord::new(i, 0, 0)).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn rebuild_only_touches_dirty_chunks() {
        let mut gpu = MemoryGpu::new();
        let mut w = VoxelWorld::new();
        w.add_voxel(VoxelCoord::new(1, 1, 1));
        w.add_voxel(VoxelCoord::new(20, 1, 1));

        let first = w.rebuild_dirty_chunks(&mut gpu);
        assert_eq!(first.chunks_visited, 2);
        assert_eq!(first.chunks_rebuilt, 2);
        assert_eq!(first.indices_uploaded, 72);
        assert_eq!(w.dirty_chunk_count(), 0);

        let idle = w.rebuild_dirty_chunks(&mut gpu);
        assert_eq!(idle.chunks_rebuilt, 0);

        w.add_voxel(VoxelCoord::new(21, 1, 1));
        assert_eq!(w.dirty_chunk_count(), 1);
        let second = w.rebuild_dirty_chunks(&mut gpu);
        assert_eq!(second.chunks_rebuilt, 1);

        let untouched = w.chunk(ChunkCoord::new(0, 0, 0)).unwrap();
        assert_eq!(untouched.rebuild_count(), 1);
    }

    #[test]
    fn failed_uploads_are_not_counted() {
        let mut gpu = MemoryGpu::with_budget(0);
        let mut w = VoxelWorld::new();
        w.add_voxel(VoxelCoord::new(1, 1, 1));

        let stats = w.rebuild_dirty_chunks(&mut gpu);
        assert_eq!(stats.chunks_rebuilt, 1);
        assert_eq!(stats.indices_uploaded, 0);
        assert_eq!(gpu.stats().created, 0);
    }

    #[test]
    fn faces_across_chunk_boundary_are_kept() {
        let mut w = VoxelWorld::new();
        w.add_voxel(VoxelCoord::new(15, 0, 0));
        w.add_voxel(VoxelCoord::new(16, 0, 0));
        let mut gpu = MemoryGpu::new();
        w.rebuild_dirty_chunks(&mut gpu);

        let total: u32 = w.chunks().map(|(_, c)| c.mesh().index_count).sum();
        assert_eq!(total, 2 * 36);
    }

    #[test]
    fn release_all_frees_every_buffer() {
        let mut gpu = MemoryGpu::new();
        let mut w = VoxelWorld::new();
        for x in 0..40 {
            w.add_voxel(VoxelCoord::new(x, 0, 0));
        }
        w.rebuild_dirty_chunks(&mut gpu);
        assert!(gpu.live_buffers() > 0);

        w.release_all(&mut gpu);
        assert_eq!(gpu.live_buffers(), 0);
        assert_eq!(w.dirty_chunk_count(), w.chunk_count());
    }
}
