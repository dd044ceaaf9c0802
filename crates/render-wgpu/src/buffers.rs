use std::collections::HashMap;

use digworld_kernel::{BufferHandle, GpuResources};
use wgpu::util::DeviceExt;

/// Table of live wgpu buffers addressed by [`BufferHandle`].
#[derive(Debug)]
pub struct WgpuBuffers {
    buffers: HashMap<BufferHandle, wgpu::Buffer>,
    next_id: u64,
    max_buffer_size: u64,
}

impl WgpuBuffers {
    pub fn new(limits: &wgpu::Limits) -> Self {
        Self {
            buffers: HashMap::new(),
            next_id: 0,
            max_buffer_size: limits.max_buffer_size,
        }
    }

    pub fn get(&self, handle: BufferHandle) -> Option<&wgpu::Buffer> {
        self.buffers.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Total bytes held by live buffers.
    pub fn live_bytes(&self) -> u64 {
        self.buffers.values().map(|b| b.size()).sum()
    }

    /// Pair the table with a device so it can serve as a [`GpuResources`].
    pub fn with_device<'a>(&'a mut self, device: &'a wgpu::Device) -> DeviceBuffers<'a> {
        DeviceBuffers {
            device,
            table: self,
        }
    }

    /// Reserve the next handle, or `None` when `size` cannot be allocated.
    fn admit(&mut self, size: usize) -> Option<BufferHandle> {
        if size == 0 || size as u64 > self.max_buffer_size {
            return None;
        }
        let handle = BufferHandle(self.next_id);
        self.next_id += 1;
        Some(handle)
    }
}

/// [`WgpuBuffers`] bound to a device for one rebuild sweep.
pub struct DeviceBuffers<'a> {
    device: &'a wgpu::Device,
    table: &'a mut WgpuBuffers,
}

impl DeviceBuffers<'_> {
    fn create(&mut self, label: &str, data: &[u8], usage: wgpu::BufferUsages) -> BufferHandle {
        let Some(handle) = self.table.admit(data.len()) else {
            tracing::warn!(label, size = data.len(), "refusing buffer allocation");
            return BufferHandle::INVALID;
        };
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data,
                usage,
            });
        self.table.buffers.insert(handle, buffer);
        handle
    }
}

impl GpuResources for DeviceBuffers<'_> {
    fn create_vertex_buffer(&mut self, data: &[u8]) -> BufferHandle {
        self.create("chunk_vertex_buffer", data, wgpu::BufferUsages::VERTEX)
    }

    fn create_index_buffer(&mut self, data: &[u8]) -> BufferHandle {
        self.create("chunk_index_buffer", data, wgpu::BufferUsages::INDEX)
    }

    fn release(&mut self, handle: BufferHandle) {
        if let Some(buffer) = self.table.buffers.remove(&handle) {
            buffer.destroy();
        }
    }
}
