use digworld_common::ChunkCoord;
use digworld_kernel::{ChunkMesh, VoxelWorld};
use glam::{Mat4, Vec3};

/// One chunk ready for an indexed draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkDraw {
    pub coord: ChunkCoord,
    /// World-space translation applied to the chunk's geometry.
    pub origin: Vec3,
    pub mesh: ChunkMesh,
}

impl ChunkDraw {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.origin)
    }
}

/// The per-frame list of chunk draws, sorted by chunk coordinate.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub draws: Vec<ChunkDraw>,
    /// Chunks present in the world but not drawable this frame.
    pub skipped: usize,
}

impl DrawList {
    /// Gather `(origin, mesh)` pairs for every drawable chunk.
    ///
    /// Call after the rebuild sweep. Chunks with zero indices or any
    /// invalid buffer handle are counted in `skipped` instead.
    pub fn collect(world: &VoxelWorld) -> Self {
        let mut list = Self::default();
        world.for_each_chunk(|coord, chunk| {
            let mesh = *chunk.mesh();
            if mesh.is_drawable() {
                list.draws.push(ChunkDraw {
                    coord,
                    origin: coord.origin(),
                    mesh,
                });
            } else {
                list.skipped += 1;
            }
        });
        list.draws.sort_by_key(|d| d.coord);
        tracing::trace!(
            draws = list.draws.len(),
            skipped = list.skipped,
            "draw list collected"
        );
        list
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Sum of index counts across all draws.
    pub fn index_total(&self) -> u64 {
        self.draws.iter().map(|d| d.mesh.index_count as u64).sum()
    }

    pub fn triangle_total(&self) -> u64 {
        self.index_total() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digworld_common::VoxelCoord;
    use digworld_kernel::MemoryGpu;

    #[test]
    fn empty_world_has_no_draws() {
        let list = DrawList::collect(&VoxelWorld::new());
        assert!(list.is_empty());
        assert_eq!(list.skipped, 0);
    }

    #[test]
    fn dirty_chunks_are_skipped_until_rebuilt() {
        let mut world = VoxelWorld::new();
        world.add_voxel(VoxelCoord::new(1, 1, 1));
        let list = DrawList::collect(&world);
        assert!(list.is_empty());
        assert_eq!(list.skipped, 1);

        let mut gpu = MemoryGpu::new();
        world.rebuild_dirty_chunks(&mut gpu);
        let list = DrawList::collect(&world);
        assert_eq!(list.len(), 1);
        assert_eq!(list.index_total(), 36);
        assert_eq!(list.triangle_total(), 12);
    }

    #[test]
    fn emptied_chunk_is_skipped() {
        let mut gpu = MemoryGpu::new();
        let mut world = VoxelWorld::new();
        let c = VoxelCoord::new(2, 2, 2);
        world.add_voxel(c);
        world.rebuild_dirty_chunks(&mut gpu);
        world.remove_voxel(c);
        world.rebuild_dirty_chunks(&mut gpu);

        let list = DrawList::collect(&world);
        assert!(list.is_empty());
        assert_eq!(list.skipped, 1);
    }

    #[test]
    fn failed_uploads_are_skipped() {
        let mut gpu = MemoryGpu::with_budget(0);
        let mut world = VoxelWorld::new();
        world.add_voxel(VoxelCoord::new(0, 0, 0));
        world.rebuild_dirty_chunks(&mut gpu);
        assert!(DrawList::collect(&world).is_empty());
    }

    #[test]
    fn draws_carry_chunk_origin() {
        let mut gpu = MemoryGpu::new();
        let mut world = VoxelWorld::new();
        world.add_voxel(VoxelCoord::new(-3, 0, 0));
        world.add_voxel(VoxelCoord::new(40, 17, 5));
        world.rebuild_dirty_chunks(&mut gpu);

        let list = DrawList::collect(&world);
        let origins: Vec<Vec3> = list.draws.iter().map(|d| d.origin).collect();
        assert_eq!(
            origins,
            vec![Vec3::new(-16.0, 0.0, 0.0), Vec3::new(32.0, 16.0, 0.0)]
        );
        let m = list.draws[1].model_matrix();
        assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(32.0, 16.0, 0.0));
    }
}
