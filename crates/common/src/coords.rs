use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Voxels per chunk edge.
pub const CHUNK_DIM: i32 = 16;
/// Bits of each axis that address a voxel inside its chunk.
pub const CHUNK_SHIFT: u32 = 4;
/// Mask selecting the in-chunk part of a global axis value.
pub const CHUNK_MASK: i32 = CHUNK_DIM - 1;
/// Voxels in one chunk layer (`CHUNK_DIM²`).
pub const CHUNK_AREA: usize = (CHUNK_DIM * CHUNK_DIM) as usize;
/// Voxels in one chunk (`CHUNK_DIM³`).
pub const CHUNK_VOLUME: usize = CHUNK_AREA * CHUNK_DIM as usize;
/// World-space edge length of one voxel.
pub const VOXEL_SIZE: f32 = 1.0;
/// Half of the rendered cube edge.
pub const VOXEL_EXTENT: f32 = 0.5;

/// Errors raised when an in-chunk position is addressed outside the chunk.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordError {
    #[error("local offset ({x}, {y}, {z}) is outside the 0..16 chunk range")]
    OutOfChunk { x: i32, y: i32, z: i32 },
    #[error("flat voxel index {0} is outside the chunk volume")]
    IndexOutOfRange(usize),
}

/// A global voxel position.
///
/// Every axis splits into a chunk part (`value & !0xF`) and an in-chunk
/// offset (`value & 0xF`). The split is plain two's-complement masking, so
/// negative coordinates round toward negative infinity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The chunk owning this voxel.
    pub const fn chunk(self) -> ChunkCoord {
        ChunkCoord {
            x: self.x >> CHUNK_SHIFT,
            y: self.y >> CHUNK_SHIFT,
            z: self.z >> CHUNK_SHIFT,
        }
    }

    /// Position of this voxel inside its chunk.
    pub const fn local(self) -> LocalOffset {
        LocalOffset {
            x: (self.x & CHUNK_MASK) as u8,
            y: (self.y & CHUNK_MASK) as u8,
            z: (self.z & CHUNK_MASK) as u8,
        }
    }

    /// Recompose a global coordinate from its chunk and in-chunk parts.
    pub const fn from_parts(chunk: ChunkCoord, local: LocalOffset) -> Self {
        let base = chunk.base();
        Self {
            x: base.x | local.x as i32,
            y: base.y | local.y as i32,
            z: base.z | local.z as i32,
        }
    }

    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Voxel containing a world-space point. Voxel centres sit on integer positions.
    pub fn containing(point: Vec3) -> Self {
        let v = (point / VOXEL_SIZE).round();
        Self::new(v.x as i32, v.y as i32, v.z as i32)
    }
}

impl From<(i32, i32, i32)> for VoxelCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<IVec3> for VoxelCoord {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<VoxelCoord> for IVec3 {
    fn from(c: VoxelCoord) -> Self {
        IVec3::new(c.x, c.y, c.z)
    }
}

impl std::fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Chunk indices on all three axes. Used as the chunk map key.
///
/// Stored as full `i32` indices so every representable voxel coordinate maps
/// to a distinct key.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Global coordinate of the chunk's first voxel (all offset bits zero).
    pub const fn base(self) -> VoxelCoord {
        VoxelCoord {
            x: self.x << CHUNK_SHIFT,
            y: self.y << CHUNK_SHIFT,
            z: self.z << CHUNK_SHIFT,
        }
    }

    /// World-space translation applied to this chunk's geometry.
    pub fn origin(self) -> Vec3 {
        let base = self.base();
        Vec3::new(base.x as f32, base.y as f32, base.z as f32) * VOXEL_SIZE
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// A validated in-chunk position, each axis in `0..CHUNK_DIM`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalOffset {
    x: u8,
    y: u8,
    z: u8,
}

impl LocalOffset {
    pub fn new(x: i32, y: i32, z: i32) -> Result<Self, CoordError> {
        let in_range = |v: i32| (0..CHUNK_DIM).contains(&v);
        if in_range(x) && in_range(y) && in_range(z) {
            Ok(Self {
                x: x as u8,
                y: y as u8,
                z: z as u8,
            })
        } else {
            Err(CoordError::OutOfChunk { x, y, z })
        }
    }

    pub fn x(self) -> i32 {
        self.x as i32
    }

    pub fn y(self) -> i32 {
        self.y as i32
    }

    pub fn z(self) -> i32 {
        self.z as i32
    }

    /// Flat bit index: `z * 256 + y * 16 + x`.
    pub fn index(self) -> usize {
        self.z as usize * CHUNK_AREA + self.y as usize * CHUNK_DIM as usize + self.x as usize
    }

    pub fn from_index(index: usize) -> Result<Self, CoordError> {
        if index >= CHUNK_VOLUME {
            return Err(CoordError::IndexOutOfRange(index));
        }
        let dim = CHUNK_DIM as usize;
        Ok(Self {
            x: (index % dim) as u8,
            y: (index / dim % dim) as u8,
            z: (index / CHUNK_AREA) as u8,
        })
    }

    /// Neighbouring offset, or `None` when the step leaves the chunk.
    pub fn step(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Self::new(self.x() + dx, self.y() + dy, self.z() + dz).ok()
    }

    /// Position of the voxel centre relative to the chunk origin.
    pub fn position(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32) * VOXEL_SIZE
    }
}
