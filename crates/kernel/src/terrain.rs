use std::path::Path;

use digworld_common::VoxelCoord;
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};
use crate::world::VoxelWorld;

/// Largest extent or height that still maps onto an `i32` voxel axis.
const MAX_AXIS: u32 = i32::MAX as u32;

/// Parameters of the sine-ridge heightmap.
///
/// Column height is `floor(|sin(x * frequency)| * amplitude)`. Voxels fill
/// `0..height` on the vertical axis for every column in the extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Columns along world X.
    pub extent_x: u32,
    /// Columns along world Z.
    pub extent_z: u32,
    pub frequency: f32,
    pub amplitude: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            extent_x: 128,
            extent_z: 128,
            frequency: 0.2,
            amplitude: 16.0,
        }
    }
}

impl TerrainConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.frequency.is_finite() {
            return Err(KernelError::InvalidTerrain(format!(
                "frequency must be finite, got {}",
                self.frequency
            )));
        }
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(KernelError::InvalidTerrain(format!(
                "amplitude must be a non-negative number, got {}",
                self.amplitude
            )));
        }
        // Heights are voxel Y coordinates and must fit in i32.
        if self.amplitude >= MAX_AXIS as f32 {
            return Err(KernelError::InvalidTerrain(format!(
                "amplitude must be below {MAX_AXIS}, got {}",
                self.amplitude
            )));
        }
        if self.extent_x > MAX_AXIS || self.extent_z > MAX_AXIS {
            return Err(KernelError::InvalidTerrain(format!(
                "extent must be at most {MAX_AXIS}, got {}x{}",
                self.extent_x, self.extent_z
            )));
        }
        Ok(())
    }

    /// Column height at world X.
    pub fn height_at(&self, x: u32) -> u32 {
        ((x as f32 * self.frequency).sin().abs() * self.amplitude) as u32
    }
}

/// Summary of one generation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TerrainStats {
    pub columns: u64,
    pub voxels: u64,
    pub max_height: u32,
}

/// Fill `world` with the heightmap described by `config`.
///
/// Column `(x, z)` receives voxels `(x, h, z)` for `h` in `0..height_at(x)`.
pub fn generate(world: &mut VoxelWorld, config: &TerrainConfig) -> TerrainStats {
    let _span = tracing::info_span!("generate_terrain").entered();

    let mut stats = TerrainStats::default();
    for z in 0..config.extent_z {
        for x in 0..config.extent_x {
            let height = config.height_at(x);
            for h in 0..height {
                world.add_voxel(VoxelCoord::new(x as i32, h as i32, z as i32));
            }
            stats.columns += 1;
            stats.voxels += height as u64;
            stats.max_height = stats.max_height.max(height);
        }
    }

    tracing::info!(
        columns = stats.columns,
        voxels = stats.voxels,
        chunks = world.chunk_count(),
        "terrain generated"
    );
    stats
}
