//! wgpu render backend for the voxel world.
//!
//! Serves as the kernel's GPU collaborator (chunk vertex/index buffers) and
//! draws each chunk mesh translated by its origin. Camera uses a fly-camera
//! model with WASD/EQ movement and right-mouse look.
//!
//! # Invariants
//! - Renderer never changes voxel occupancy; it only rebuilds dirty meshes.
//! - Camera motion is NOT part of the voxel world.
//! - Meshes whose buffers are missing are skipped, never drawn.

mod buffers;
mod camera;
mod gpu;
mod shaders;

pub use buffers::{DeviceBuffers, WgpuBuffers};
pub use camera::{FlyCamera, MoveInput};
pub use gpu::{CLEAR_COLOR, FrameStats, WgpuRenderer};
