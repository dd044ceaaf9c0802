//! Rendering adapter: renderer-agnostic frame interface.
//!
//! # Invariants
//! - Renderers never mutate the voxel world.
//! - Only drawable meshes reach a draw call; chunks with no geometry or a
//!   failed upload are skipped.
//! - Each chunk is drawn translated by its origin (`chunk base * voxel size`).

mod draw;
mod renderer;

pub use draw::{ChunkDraw, DrawList};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "digworld-render v0.1.0"
}
