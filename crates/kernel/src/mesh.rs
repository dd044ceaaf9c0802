use digworld_common::{LocalOffset, VOXEL_EXTENT};

use crate::gpu::{BufferHandle, GpuResources};

/// One of the six axis-aligned cube faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    NegZ,
    PosZ,
    NegX,
    PosX,
    NegY,
    PosY,
}

const E: f32 = VOXEL_EXTENT;

// Cube corners: f/b is +Z/−Z, t/b is +Y/−Y, l/r is −X/+X.
const FTL: [f32; 3] = [-E, E, E];
const FTR: [f32; 3] = [E, E, E];
const FBR: [f32; 3] = [E, -E, E];
const FBL: [f32; 3] = [-E, -E, E];
const BTL: [f32; 3] = [-E, E, -E];
const BTR: [f32; 3] = [E, E, -E];
const BBR: [f32; 3] = [E, -E, -E];
const BBL: [f32; 3] = [-E, -E, -E];

impl Face {
    /// Faces in the order the mesher tests them for every voxel.
    pub const ALL: [Face; 6] = [
        Face::NegZ,
        Face::PosZ,
        Face::NegX,
        Face::PosX,
        Face::NegY,
        Face::PosY,
    ];

    /// Step to the voxel this face looks at.
    pub const fn neighbor(self) -> (i32, i32, i32) {
        match self {
            Face::NegZ => (0, 0, -1),
            Face::PosZ => (0, 0, 1),
            Face::NegX => (-1, 0, 0),
            Face::PosX => (1, 0, 0),
            Face::NegY => (0, -1, 0),
            Face::PosY => (0, 1, 0),
        }
    }

    pub const fn normal(self) -> [f32; 3] {
        let (x, y, z) = self.neighbor();
        [x as f32, y as f32, z as f32]
    }

    /// Quad corners relative to the voxel centre.
    ///
    /// Paired with [`QUAD_INDICES`] the winding is counter-clockwise seen
    /// from outside the cube.
    pub const fn corners(self) -> [[f32; 3]; 4] {
        match self {
            Face::PosZ => [FTL, FTR, FBR, FBL],
            Face::NegZ => [BTR, BTL, BBL, BBR],
            Face::PosX => [FTR, BTR, BBR, FBR],
            Face::NegX => [BTL, FTL, FBL, BBL],
            Face::NegY => [FBL, FBR, BBR, BBL],
            Face::PosY => [FTL, BTL, BTR, FTR],
        }
    }
}

/// Two-triangle fan over a quad, relative to its first vertex.
pub const QUAD_INDICES: [u32; 6] = [2, 1, 0, 0, 3, 2];

/// Byte stride of one position or normal element.
pub const VEC3_STRIDE: u32 = std::mem::size_of::<[f32; 3]>() as u32;

/// CPU-side chunk geometry, rebuilt from scratch on every dirty pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append the quad for `face` of the voxel at `local`.
    pub fn push_face(&mut self, face: Face, local: LocalOffset) {
        let base = self.positions.len() as u32;
        let offset = local.position();
        let normal = face.normal();
        for corner in face.corners() {
            self.positions.push([
                corner[0] + offset.x,
                corner[1] + offset.y,
                corner[2] + offset.z,
            ]);
            self.normals.push(normal);
        }
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }
}

/// Vertex streams of a [`ChunkMesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshBuffer {
    Position = 0,
    Normal = 1,
}

impl MeshBuffer {
    pub const COUNT: usize = 2;
}

/// Index element type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexFormat {
    #[default]
    Uint32,
}

/// GPU-side chunk mesh: buffer handles plus the layout needed to bind them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkMesh {
    pub vertex_buffers: [BufferHandle; MeshBuffer::COUNT],
    pub strides: [u32; MeshBuffer::COUNT],
    pub offsets: [u32; MeshBuffer::COUNT],
    pub index_buffer: BufferHandle,
    pub index_format: IndexFormat,
    pub index_count: u32,
}

impl ChunkMesh {
    pub fn vertex_buffer(&self, stream: MeshBuffer) -> BufferHandle {
        self.vertex_buffers[stream as usize]
    }

    /// True when every buffer is live and there is something to draw.
    pub fn is_drawable(&self) -> bool {
        self.index_count > 0
            && self.index_buffer.is_valid()
            && self.vertex_buffers.iter().all(|b| b.is_valid())
    }

    /// Upload `geometry`. Empty geometry creates no buffers.
    ///
    /// Buffers that did get created are kept even if a sibling failed, so
    /// the caller can still release them; such a mesh is not drawable.
    pub fn upload(geometry: &MeshGeometry, gpu: &mut dyn GpuResources) -> Self {
        if geometry.is_empty() {
            return Self::default();
        }

        let mut mesh = Self::default();
        mesh.vertex_buffers[MeshBuffer::Position as usize] =
            gpu.create_vertex_buffer(bytemuck::cast_slice(&geometry.positions));
        mesh.vertex_buffers[MeshBuffer::Normal as usize] =
            gpu.create_vertex_buffer(bytemuck::cast_slice(&geometry.normals));
        mesh.strides = [VEC3_STRIDE; MeshBuffer::COUNT];
        mesh.offsets = [0; MeshBuffer::COUNT];
        mesh.index_buffer = gpu.create_index_buffer(bytemuck::cast_slice(&geometry.indices));
        mesh.index_format = IndexFormat::Uint32;
        mesh.index_count = geometry.indices.len() as u32;
        mesh
    }

    /// Hand every buffer back to `gpu` and reset to the empty mesh.
    pub fn release(&mut self, gpu: &mut dyn GpuResources) {
        for handle in self.vertex_buffers {
            gpu.release(handle);
        }
        gpu.release(self.index_buffer);
        *self = Self::default();
    }
}
