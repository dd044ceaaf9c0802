use bitvec::prelude::*;
use digworld_common::{CHUNK_VOLUME, CoordError, LocalOffset};

use crate::gpu::GpuResources;
use crate::mesh::{ChunkMesh, Face, MeshGeometry};

/// A 16³ block of voxel occupancy with a cached mesh.
///
/// Mutation only flips bits and raises the dirty flag. The mesh is replaced
/// wholesale by [`Chunk::rebuild_if_dirty`], so a clean chunk always renders
/// exactly its occupancy.
#[derive(Debug, Clone)]
pub struct Chunk {
    voxels: BitVec<u64, Lsb0>,
    dirty: bool,
    mesh: ChunkMesh,
    rebuild_count: u64,
}

impl Default for Chunk {
    fn default() -> Self {
        Self {
            voxels: bitvec![u64, Lsb0; 0; CHUNK_VOLUME],
            dirty: true,
            mesh: ChunkMesh::default(),
            rebuild_count: 0,
        }
    }
}

impl Chunk {
    /// An empty, dirty chunk.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self, local: LocalOffset) -> bool {
        !self.voxels[local.index()]
    }

    pub fn set(&mut self, local: LocalOffset) {
        self.voxels.set(local.index(), true);
        self.dirty = true;
    }

    pub fn remove(&mut self, local: LocalOffset) {
        self.voxels.set(local.index(), false);
        self.dirty = true;
    }

    /// [`Chunk::is_empty`] over raw axes. Out-of-range input asserts in debug builds.
    pub fn is_empty_at(&self, x: i32, y: i32, z: i32) -> Result<bool, CoordError> {
        Ok(self.is_empty(checked_local(x, y, z)?))
    }

    /// [`Chunk::set`] over raw axes. Out-of-range input asserts in debug builds.
    pub fn set_at(&mut self, x: i32, y: i32, z: i32) -> Result<(), CoordError> {
        self.set(checked_local(x, y, z)?);
        Ok(())
    }

    /// [`Chunk::remove`] over raw axes. Out-of-range input asserts in debug builds.
    pub fn remove_at(&mut self, x: i32, y: i32, z: i32) -> Result<(), CoordError> {
        self.remove(checked_local(x, y, z)?);
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force a rebuild on the next sweep.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Number of times the mesh has been regenerated.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    /// Number of occupied voxels.
    pub fn voxel_count(&self) -> usize {
        self.voxels.count_ones()
    }

    pub fn is_vacant(&self) -> bool {
        self.voxels.not_any()
    }

    /// Occupied positions in flat-index order (z, then y, then x).
    pub fn occupied(&self) -> impl Iterator<Item = LocalOffset> + '_ {
        self.voxels
            .iter_ones()
            .filter_map(|i| LocalOffset::from_index(i).ok())
    }

    /// Face-culled geometry for the current occupancy.
    ///
    /// A face is emitted when its neighbour is empty or lies outside this
    /// chunk. Neighbouring chunks are not consulted.
    pub fn build_geometry(&self) -> MeshGeometry {
        let mut geometry = MeshGeometry::new();
        for local in self.occupied() {
            for face in Face::ALL {
                let (dx, dy, dz) = face.neighbor();
                let exposed = match local.step(dx, dy, dz) {
                    Some(n) => self.is_empty(n),
                    None => true,
                };
                if exposed {
                    geometry.push_face(face, local);
                }
            }
        }
        geometry
    }

    /// Regenerate and upload the mesh if anything changed since the last call.
    ///
    /// Returns `true` when a rebuild happened. The previous buffers are
    /// released before the new ones are created.
    pub fn rebuild_if_dirty(&mut self, gpu: &mut dyn GpuResources) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        self.mesh.release(gpu);

        let geometry = self.build_geometry();
        self.mesh = ChunkMesh::upload(&geometry, gpu);
        self.rebuild_count += 1;

        if !geometry.is_empty() && !self.mesh.is_drawable() {
            tracing::warn!(
                faces = geometry.face_count(),
                "chunk mesh upload failed, chunk will be skipped"
            );
        }
        true
    }

    /// Return the mesh buffers to `gpu`. The chunk is dirty afterwards.
    pub fn release_mesh(&mut self, gpu: &mut dyn GpuResources) {
        self.mesh.release(gpu);
        self.dirty = true;
    }
}

fn checked_local(x: i32, y: i32, z: i32) -> Result<LocalOffset, CoordError> {
    let local = LocalOffset::new(x, y, z);
    debug_assert!(local.is_ok(), "voxel ({x}, {y}, {z}) outside chunk");
    local
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::MemoryGpu;
    use crate::mesh::MeshBuffer;

    fn at(x: i32, y: i32, z: i32) -> LocalOffset {
        LocalOffset::new(x, y, z).unwrap()
    }

    #[test]
    fn new_chunk_is_empty_and_dirty() {
        let chunk = Chunk::new();
        assert!(chunk.is_dirty());
        assert!(chunk.is_vacant());
        assert_eq!(chunk.voxel_count(), 0);
        assert!(chunk.is_empty(at(5, 5, 5)));
    }

    #[test]
    fn set_and_remove_toggle_single_bit() {
        let mut chunk = Chunk::new();
        chunk.set(at(1, 2, 3));
        assert!(!chunk.is_empty(at(1, 2, 3)));
        assert!(chunk.is_empty(at(2, 2, 3)));
        assert!(chunk.is_empty(at(1, 3, 3)));
        assert_eq!(chunk.voxel_count(), 1);

        chunk.remove(at(1, 2, 3));
        assert!(chunk.is_empty(at(1, 2, 3)));
        assert!(chunk.is_vacant());
    }

    #[test]
    fn mutation_marks_dirty_until_rebuild() {
        let mut gpu = MemoryGpu::new();
        let mut chunk = Chunk::new();
        chunk.rebuild_if_dirty(&mut gpu);
        assert!(!chunk.is_dirty());

        chunk.set(at(0, 0, 0));
        assert!(chunk.is_dirty());
        chunk.rebuild_if_dirty(&mut gpu);
        assert!(!chunk.is_dirty());

        chunk.remove(at(0, 0, 0));
        assert!(chunk.is_dirty());
    }

    #[test]
    fn mutation_does_not_touch_mesh() {
        let mut gpu = MemoryGpu::new();
        let mut chunk = Chunk::new();
        chunk.set(at(4, 4, 4));
        chunk.rebuild_if_dirty(&mut gpu);
        let before = *chunk.mesh();

        chunk.set(at(5, 4, 4));
        assert_eq!(*chunk.mesh(), before);
        assert_eq!(gpu.stats().released, 0);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut gpu = MemoryGpu::new();
        let mut chunk = Chunk::new();
        chunk.set(at(3, 3, 3));

        assert!(chunk.rebuild_if_dirty(&mut gpu));
        let mesh = *chunk.mesh();
        let created = gpu.stats().created;

        assert!(!chunk.rebuild_if_dirty(&mut gpu));
        assert_eq!(chunk.rebuild_count(), 1);
        assert_eq!(*chunk.mesh(), mesh);
        assert_eq!(gpu.stats().created, created);
    }

    #[test]
    fn interior_voxel_emits_six_faces() {
        let mut gpu = MemoryGpu::new();
        let mut chunk = Chunk::new();
        chunk.set(at(5, 5, 5));
        chunk.rebuild_if_dirty(&mut gpu);

        let geometry = chunk.build_geometry();
        assert_eq!(geometry.face_count(), 6);
        assert_eq!(geometry.vertex_count(), 24);
        assert_eq!(geometry.indices.len(), 36);
        assert_eq!(chunk.mesh().index_count, 36);
        assert!(chunk.mesh().is_drawable());
    }

    #[test]
    fn shared_face_is_culled() {
        let mut single = Chunk::new();
        single.set(at(1, 0, 0));
        let single_vertices = single.build_geometry().vertex_count();

        let mut pair = Chunk::new();
        pair.set(at(1, 0, 0));
        pair.set(at(2, 0, 0));
        let geometry = pair.build_geometry();

        assert!(geometry.vertex_count() < 2 * single_vertices);
        assert_eq!(geometry.face_count(), 10);
    }

    #[test]
    fn boundary_faces_are_always_emitted() {
        let mut chunk = Chunk::new();
        chunk.set(at(0, 0, 0));
        chunk.set(at(15, 15, 15));
        assert_eq!(chunk.build_geometry().face_count(), 12);
    }

    #[test]
    fn full_chunk_emits_only_shell() {
        let mut chunk = Chunk::new();
        for z in 0..16 {
            for y in 0..16 {
                for x in 0..16 {
                    chunk.set(at(x, y, z));
                }
            }
        }
        assert_eq!(chunk.build_geometry().face_count(), 6 * 16 * 16);
    }

    #[test]
    fn enclosed_voxel_contributes_nothing() {
        let mut chunk = Chunk::new();
        let center = at(8, 8, 8);
        chunk.set(center);
        for face in Face::ALL {
            let (dx, dy, dz) = face.neighbor();
            chunk.set(center.step(dx, dy, dz).unwrap());
        }
        // Seven voxels: the six arms each show five faces, the centre none.
        assert_eq!(chunk.build_geometry().face_count(), 30);
    }

    #[test]
    fn face_order_follows_voxel_then_face() {
        let mut chunk = Chunk::new();
        chunk.set(at(2, 2, 2));
        let geometry = chunk.build_geometry();
        let normals: Vec<[f32; 3]> = geometry.normals.iter().step_by(4).copied().collect();
        let expected: Vec<[f32; 3]> = Face::ALL.iter().map(|f| f.normal()).collect();
        assert_eq!(normals, expected);
    }

    #[test]
    fn geometry_is_offset_by_local_position() {
        let mut chunk = Chunk::new();
        chunk.set(at(3, 0, 0));
        let geometry = chunk.build_geometry();
        for p in &geometry.positions {
            assert!(p[0] == 2.5 || p[0] == 3.5);
        }
    }

    #[test]
    fn rebuild_releases_previous_buffers() {
        let mut gpu = MemoryGpu::new();
        let mut chunk = Chunk::new();
        chunk.set(at(1, 1, 1));
        chunk.rebuild_if_dirty(&mut gpu);
        let old = chunk.mesh().vertex_buffer(MeshBuffer::Position);

        chunk.set(at(2, 1, 1));
        chunk.rebuild_if_dirty(&mut gpu);
        assert!(gpu.bytes(old).is_none());
        assert_eq!(gpu.live_buffers(), 3);
        assert_eq!(gpu.stats().released, 3);
    }

    #[test]
    fn rebuild_frees_old_buffers_before_uploading() {
        // One single-voxel mesh: two 24-vertex streams plus 36 indices.
        let mut gpu = MemoryGpu::with_budget(2 * 24 * 12 + 36 * 4);
        let mut chunk = Chunk::new();
        chunk.set(at(4, 4, 4));
        chunk.rebuild_if_dirty(&mut gpu);
        assert!(chunk.mesh().is_drawable());

        chunk.remove(at(4, 4, 4));
        chunk.set(at(4, 4, 4));
        assert!(chunk.rebuild_if_dirty(&mut gpu));
        assert!(chunk.mesh().is_drawable());
        assert_eq!(gpu.stats().failed, 0);
        assert_eq!(gpu.live_buffers(), 3);
    }

    #[test]
    fn emptied_chunk_leaves_invalid_mesh() {
        let mut gpu = MemoryGpu::new();
        let mut chunk = Chunk::new();
        chunk.set(at(1, 1, 1));
        chunk.rebuild_if_dirty(&mut gpu);
        chunk.remove(at(1, 1, 1));
        chunk.rebuild_if_dirty(&mut gpu);

        assert!(!chunk.mesh().is_drawable());
        assert!(!chunk.mesh().index_buffer.is_valid());
        assert_eq!(chunk.mesh().index_count, 0);
        assert_eq!(gpu.live_buffers(), 0);
    }

    #[test]
    fn rebuild_under_exhausted_gpu_is_not_drawable() {
        let mut gpu = MemoryGpu::with_budget(0);
        let mut chunk = Chunk::new();
        chunk.set(at(1, 1, 1));
        assert!(chunk.rebuild_if_dirty(&mut gpu));
        assert!(!chunk.mesh().is_drawable());
        assert!(!chunk.is_dirty());
    }

    #[test]
    fn raw_access_in_range() {
        let mut chunk = Chunk::new();
        chunk.set_at(15, 0, 15).unwrap();
        assert_eq!(chunk.is_empty_at(15, 0, 15), Ok(false));
        chunk.remove_at(15, 0, 15).unwrap();
        assert_eq!(chunk.is_empty_at(15, 0, 15), Ok(true));
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn raw_access_out_of_range_is_rejected() {
        let mut chunk = Chunk::new();
        assert!(chunk.set_at(16, 0, 0).is_err());
        assert!(chunk.remove_at(0, 0, -1).is_err());
        assert!(chunk.is_vacant());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "outside chunk")]
    fn raw_access_out_of_range_asserts() {
        let mut chunk = Chunk::new();
        let _ = chunk.set_at(0, 16, 0);
    }

    #[test]
    fn release_mesh_returns_buffers() {
        let mut gpu = MemoryGpu::new();
        let mut chunk = Chunk::new();
        chunk.set(at(1, 1, 1));
        chunk.rebuild_if_dirty(&mut gpu);
        chunk.release_mesh(&mut gpu);
        assert_eq!(gpu.live_buffers(), 0);
        assert!(chunk.is_dirty());
    }
}
