use std::collections::HashMap;

/// Opaque handle to a buffer owned by a [`GpuResources`] implementation.
///
/// [`BufferHandle::INVALID`] stands for "no buffer". Creation failures
/// return it instead of panicking, and releasing it is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u64);

impl BufferHandle {
    pub const INVALID: Self = Self(u64::MAX);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for BufferHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// The rendering collaborator the voxel core uploads meshes through.
///
/// Implementations own the actual buffers. The core only keeps handles and
/// hands them back through [`GpuResources::release`] before replacing a mesh.
pub trait GpuResources {
    /// Create a vertex buffer holding `data`. Returns `INVALID` on failure.
    fn create_vertex_buffer(&mut self, data: &[u8]) -> BufferHandle;

    /// Create an index buffer holding `data`. Returns `INVALID` on failure.
    fn create_index_buffer(&mut self, data: &[u8]) -> BufferHandle;

    /// Release a buffer. Must be a no-op for `INVALID` or unknown handles.
    fn release(&mut self, handle: BufferHandle);
}

/// Kind of buffer stored by [`MemoryGpu`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index,
}

#[derive(Debug, Clone)]
struct StoredBuffer {
    kind: BufferKind,
    bytes: Vec<u8>,
}

/// Allocation counters kept by [`MemoryGpu`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GpuStats {
    pub created: u64,
    pub released: u64,
    pub failed: u64,
    pub live_buffers: usize,
    pub live_bytes: usize,
}

/// In-memory buffer store.
///
/// Keeps a copy of every uploaded payload, which makes meshes inspectable
/// without a device. An optional byte budget models resource exhaustion:
/// creations that would exceed it return [`BufferHandle::INVALID`].
#[derive(Debug, Default)]
pub struct MemoryGpu {
    buffers: HashMap<BufferHandle, StoredBuffer>,
    next_id: u64,
    budget: Option<usize>,
    stats: GpuStats,
}

impl MemoryGpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses allocations once `bytes` are live.
    pub fn with_budget(bytes: usize) -> Self {
        Self {
            budget: Some(bytes),
            ..Default::default()
        }
    }

    pub fn stats(&self) -> GpuStats {
        self.stats
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Bytes stored behind `handle`, if it is live.
    pub fn bytes(&self, handle: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&handle).map(|b| b.bytes.as_slice())
    }

    pub fn kind(&self, handle: BufferHandle) -> Option<BufferKind> {
        self.buffers.get(&handle).map(|b| b.kind)
    }

    /// Decode a live vertex buffer of packed `[f32; 3]` elements.
    pub fn read_vec3s(&self, handle: BufferHandle) -> Option<Vec<[f32; 3]>> {
        let bytes = self.bytes(handle)?;
        Some(bytemuck::pod_collect_to_vec(bytes))
    }

    /// Decode a live `u32` index buffer.
    pub fn read_indices(&self, handle: BufferHandle) -> Option<Vec<u32>> {
        let bytes = self.bytes(handle)?;
        Some(bytemuck::pod_collect_to_vec(bytes))
    }

    fn create(&mut self, kind: BufferKind, data: &[u8]) -> BufferHandle {
        let over_budget = self
            .budget
            .is_some_and(|limit| self.stats.live_bytes + data.len() > limit);
        if data.is_empty() || over_budget {
            self.stats.failed += 1;
            tracing::debug!(?kind, size = data.len(), "buffer creation refused");
            return BufferHandle::INVALID;
        }

        let handle = BufferHandle(self.next_id);
        self.next_id += 1;
        self.buffers.insert(
            handle,
            StoredBuffer {
                kind,
                bytes: data.to_vec(),
            },
        );
        self.stats.created += 1;
        self.stats.live_buffers = self.buffers.len();
        self.stats.live_bytes += data.len();
        handle
    }
}

impl GpuResources for MemoryGpu {
    fn create_vertex_buffer(&mut self, data: &[u8]) -> BufferHandle {
        self.create(BufferKind::Vertex, data)
    }

    fn create_index_buffer(&mut self, data: &[u8]) -> BufferHandle {
        self.create(BufferKind::Index, data)
    }

    fn release(&mut self, handle: BufferHandle) {
        if let Some(buffer) = self.buffers.remove(&handle) {
            self.stats.released += 1;
            self.stats.live_buffers = self.buffers.len();
            self.stats.live_bytes -= buffer.bytes.len();
        }
    }
}
