use std::fmt::Write as _;

use digworld_kernel::VoxelWorld;
use glam::Vec3;

use crate::draw::DrawList;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Horizontal look angle in degrees.
    pub yaw_degrees: f32,
    /// Vertical look angle in degrees.
    pub pitch_degrees: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(-2.0, 6.0, -2.0),
            yaw_degrees: 45.0,
            pitch_degrees: 0.0,
            fov_degrees: 45.0,
            near: 0.1,
            far: 10_000.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the world's cached chunk meshes and a view, then
/// produces output. It never mutates the world.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given world and view.
    fn render(&self, world: &VoxelWorld, view: &RenderView) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable listing of the draw calls a frame would issue.
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Maximum number of per-chunk lines to print.
    pub max_chunks: usize,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self { max_chunks: 16 }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &VoxelWorld, view: &RenderView) -> String {
        let list = DrawList::collect(world);
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Voxel World (chunks={}, voxels={}) ===",
            world.chunk_count(),
            world.voxel_count()
        );
        let _ = writeln!(
            out,
            "Draws: {} (skipped {}), triangles: {}",
            list.len(),
            list.skipped,
            list.triangle_total()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) yaw={:.1} pitch={:.1} fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.yaw_degrees, view.pitch_degrees, view.fov_degrees
        );

        for draw in list.draws.iter().take(self.max_chunks) {
            let o = draw.origin;
            let _ = writeln!(
                out,
                "  chunk {} origin=({:.0}, {:.0}, {:.0}) indices={}",
                draw.coord, o.x, o.y, o.z, draw.mesh.index_count
            );
        }
        if list.len() > self.max_chunks {
            let _ = writeln!(out, "  ... {} more", list.len() - self.max_chunks);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digworld_common::VoxelCoord;
    use digworld_kernel::MemoryGpu;

    #[test]
    fn debug_renderer_empty_world() {
        let world = VoxelWorld::new();
        let renderer = DebugTextRenderer::new();
        let output = renderer.render(&world, &RenderView::default());

        assert!(output.contains("chunks=0"));
        assert!(output.contains("Draws: 0"));
    }

    #[test]
    fn debug_renderer_lists_chunks() {
        let mut world = VoxelWorld::new();
        world.add_voxel(VoxelCoord::new(1, 1, 1));
        world.add_voxel(VoxelCoord::new(17, 1, 1));
        world.rebuild_dirty_chunks(&mut MemoryGpu::new());

        let output = DebugTextRenderer::new().render(&world, &RenderView::default());
        assert!(output.contains("Draws: 2"));
        assert!(output.contains("triangles: 24"));
        assert!(output.contains("chunk [1, 0, 0] origin=(16, 0, 0)"));
    }

    #[test]
    fn debug_renderer_truncates() {
        let mut world = VoxelWorld::new();
        for i in 0..5 {
            world.add_voxel(VoxelCoord::new(i * 16, 0, 0));
        }
        world.rebuild_dirty_chunks(&mut MemoryGpu::new());

        let renderer = DebugTextRenderer { max_chunks: 2 };
        let output = renderer.render(&world, &RenderView::default());
        assert!(output.contains("... 3 more"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 45.0);
        assert_eq!(view.eye, Vec3::new(-2.0, 6.0, -2.0));
        assert_eq!(view.yaw_degrees, 45.0);
        assert_eq!(view.far, 10_000.0);
    }
}
