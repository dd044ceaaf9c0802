use std::collections::HashSet;
use std::time::Instant;

use digworld_common::VoxelCoord;
use digworld_kernel::{TerrainConfig, TerrainStats, VoxelWorld, generate};
use digworld_render_wgpu::{FlyCamera, FrameStats, MoveInput};
use digworld_tools::{FrameTimer, WorldInspector};
use egui::Context as EguiContext;
use glam::Vec2;
use winit::keyboard::KeyCode;

/// Ray-march step used when picking voxels.
const PICK_STEP: f32 = 0.05;

/// Result of casting the camera ray into the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick {
    /// First occupied voxel along the ray.
    pub hit: VoxelCoord,
    /// Empty voxel the ray crossed just before `hit`.
    pub before: VoxelCoord,
}

/// Frame-driver state: the world, the camera and input.
pub struct AppState {
    pub world: VoxelWorld,
    pub camera: FlyCamera,
    pub terrain: TerrainStats,
    pub keys_held: HashSet<KeyCode>,
    pub mouse_captured: bool,
    mouse_delta: Vec2,
    pub last_frame: Instant,
    pub frame_timer: FrameTimer,
    pub last_stats: FrameStats,
    pub show_overlay: bool,
    /// Pick distance in world units.
    pub reach: f32,
}

impl AppState {
    pub fn new(terrain: &TerrainConfig) -> Self {
        let mut world = VoxelWorld::new();
        let stats = generate(&mut world, terrain);
        let mut state = Self::with_world(world);
        state.terrain = stats;
        state
    }

    pub fn with_world(world: VoxelWorld) -> Self {
        Self {
            world,
            camera: FlyCamera::default(),
            terrain: TerrainStats::default(),
            keys_held: HashSet::new(),
            mouse_captured: false,
            mouse_delta: Vec2::ZERO,
            last_frame: Instant::now(),
            frame_timer: FrameTimer::default(),
            last_stats: FrameStats::default(),
            show_overlay: true,
            reach: 16.0,
        }
    }

    /// Accumulate raw mouse motion until the next update.
    pub fn add_mouse_delta(&mut self, dx: f32, dy: f32) {
        if self.mouse_captured {
            self.mouse_delta += Vec2::new(dx, dy);
        }
    }

    /// Start or stop right-mouse look. A press over the UI does not capture.
    pub fn set_mouse_look(&mut self, pressed: bool, ui_wants_pointer: bool) -> bool {
        self.mouse_captured = pressed && !ui_wants_pointer;
        if !self.mouse_captured {
            self.mouse_delta = Vec2::ZERO;
        }
        self.mouse_captured
    }

    /// Forget every held key and stop mouse look.
    pub fn release_all_input(&mut self) {
        self.keys_held.clear();
        self.set_mouse_look(false, false);
    }

    pub fn move_input(&self) -> MoveInput {
        let axis = |pos: KeyCode, neg: KeyCode| {
            let mut v = 0.0;
            if self.keys_held.contains(&pos) {
                v += 1.0;
            }
            if self.keys_held.contains(&neg) {
                v -= 1.0;
            }
            v
        };
        MoveInput {
            forward: axis(KeyCode::KeyW, KeyCode::KeyS),
            strafe: axis(KeyCode::KeyD, KeyCode::KeyA),
            vertical: axis(KeyCode::KeyE, KeyCode::KeyQ),
            boost: self.keys_held.contains(&KeyCode::ShiftLeft)
                || self.keys_held.contains(&KeyCode::ShiftRight),
        }
    }

    pub fn update(&mut self, dt: f32) {
        let input = self.move_input();
        self.camera.apply_movement(input, dt);

        let delta = std::mem::take(&mut self.mouse_delta);
        if self.mouse_captured && delta != Vec2::ZERO {
            self.camera.rotate(delta.x, delta.y, dt);
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }

        if !pressed {
            return;
        }

        match key {
            KeyCode::F1 => {
                self.show_overlay = !self.show_overlay;
            }
            KeyCode::KeyX => {
                self.dig();
            }
            KeyCode::KeyC => {
                self.place();
            }
            _ => {}
        }
    }

    /// Cast the camera ray up to `reach` units.
    pub fn pick(&self) -> Option<Pick> {
        let dir = self.camera.forward();
        let origin = self.camera.position;
        let mut previous = VoxelCoord::containing(origin);
        if self.world.is_occupied(previous) {
            return None;
        }

        let steps = (self.reach / PICK_STEP) as u32;
        for i in 1..=steps {
            let voxel = VoxelCoord::containing(origin + dir * (i as f32 * PICK_STEP));
            if voxel == previous {
                continue;
            }
            if self.world.is_occupied(voxel) {
                return Some(Pick {
                    hit: voxel,
                    before: previous,
                });
            }
            previous = voxel;
        }
        None
    }

    /// Remove the voxel under the crosshair.
    pub fn dig(&mut self) -> Option<VoxelCoord> {
        let pick = self.pick()?;
        self.world.remove_voxel(pick.hit);
        tracing::info!(voxel = %pick.hit, "dug voxel");
        Some(pick.hit)
    }

    /// Fill the empty voxel in front of the one under the crosshair.
    pub fn place(&mut self) -> Option<VoxelCoord> {
        let pick = self.pick()?;
        self.world.add_voxel(pick.before);
        tracing::info!(voxel = %pick.before, "placed voxel");
        Some(pick.before)
    }

    pub fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_overlay {
            return;
        }

        let summary = WorldInspector::summary(&self.world);
        let target = self.pick();

        egui::Window::new("DigWorld")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.label(format!(
                    "{:.1} fps ({:.2} ms)",
                    self.frame_timer.fps(),
                    self.frame_timer.average().as_secs_f64() * 1000.0
                ));
                ui.label(format!(
                    "Draws: {}  Triangles: {}  Skipped: {}",
                    self.last_stats.draw_calls, self.last_stats.triangles, self.last_stats.skipped
                ));
                ui.separator();

                ui.heading("World");
                ui.label(format!(
                    "Chunks: {}  Dirty: {}",
                    summary.chunks, summary.dirty_chunks
                ));
                ui.label(format!("Voxels: {}", summary.voxels));
                ui.label(format!(
                    "Terrain: {} columns, max height {}",
                    self.terrain.columns, self.terrain.max_height
                ));
                ui.separator();

                ui.heading("Camera");
                let view = self.camera.view();
                ui.label(format!(
                    "Position: ({:.1}, {:.1}, {:.1})",
                    view.eye.x, view.eye.y, view.eye.z
                ));
                ui.label(format!(
                    "Yaw: {:.1}  Pitch: {:.1}",
                    view.yaw_degrees, view.pitch_degrees
                ));
                ui.add(egui::Slider::new(&mut self.camera.speed, 1.0..=50.0).text("speed"));
                ui.separator();

                ui.heading("Edit");
                match target {
                    Some(pick) => ui.label(format!("Target: {}", pick.hit)),
                    None => ui.label("Target: none"),
                };
                ui.horizontal(|ui| {
                    if ui.button("Dig (X)").clicked() {
                        self.dig();
                    }
                    if ui.button("Place (C)").clicked() {
                        self.place();
                    }
                });

                ui.separator();
                ui.small("F1: Toggle Overlay | RMB: Look | WASD: Move | E/Q: Up/Down");
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn pillar_world() -> VoxelWorld {
        let mut world = VoxelWorld::new();
        for y in 0..4 {
            world.add_voxel(VoxelCoord::new(5, y, 5));
        }
        world
    }

    fn looking_down_at_pillar() -> AppState {
        let mut state = AppState::with_world(pillar_world());
        state.camera.position = Vec3::new(5.0, 10.0, 5.0);
        state.camera.pitch = -89.9_f32.to_radians();
        state
    }

    #[test]
    fn pick_finds_top_of_pillar() {
        let state = looking_down_at_pillar();
        let pick = state.pick().unwrap();
        assert_eq!(pick.hit, VoxelCoord::new(5, 3, 5));
        assert_eq!(pick.before, VoxelCoord::new(5, 4, 5));
    }

    #[test]
    fn pick_out_of_reach() {
        let mut state = looking_down_at_pillar();
        state.reach = 2.0;
        assert!(state.pick().is_none());
    }

    #[test]
    fn dig_then_place() {
        let mut state = looking_down_at_pillar();
        assert_eq!(state.dig(), Some(VoxelCoord::new(5, 3, 5)));
        assert!(!state.world.is_occupied(VoxelCoord::new(5, 3, 5)));
        assert_eq!(state.world.dirty_chunk_count(), 1);

        assert_eq!(state.place(), Some(VoxelCoord::new(5, 3, 5)));
        assert!(state.world.is_occupied(VoxelCoord::new(5, 3, 5)));
    }

    #[test]
    fn move_input_from_keys() {
        let mut state = AppState::with_world(VoxelWorld::new());
        state.handle_key(KeyCode::KeyW, true);
        state.handle_key(KeyCode::KeyA, true);
        state.handle_key(KeyCode::KeyQ, true);
        state.handle_key(KeyCode::ShiftLeft, true);
        let input = state.move_input();
        assert_eq!(input.forward, 1.0);
        assert_eq!(input.strafe, -1.0);
        assert_eq!(input.vertical, -1.0);
        assert!(input.boost);

        state.handle_key(KeyCode::KeyW, false);
        assert_eq!(state.move_input().forward, 0.0);
    }

    #[test]
    fn mouse_delta_only_applies_while_captured() {
        let mut state = AppState::with_world(VoxelWorld::new());
        let yaw = state.camera.yaw;
        state.add_mouse_delta(10.0, 0.0);
        state.update(0.016);
        assert_eq!(state.camera.yaw, yaw);

        state.mouse_captured = true;
        state.add_mouse_delta(10.0, 0.0);
        state.update(0.016);
        assert!(state.camera.yaw < yaw);
    }

    #[test]
    fn release_over_ui_ends_mouse_look() {
        let mut state = AppState::with_world(VoxelWorld::new());
        assert!(state.set_mouse_look(true, false));
        state.add_mouse_delta(5.0, 5.0);

        assert!(!state.set_mouse_look(false, true));
        let (yaw, pitch) = (state.camera.yaw, state.camera.pitch);
        state.add_mouse_delta(10.0, 10.0);
        state.update(0.016);
        assert_eq!(state.camera.yaw, yaw);
        assert_eq!(state.camera.pitch, pitch);
    }

    #[test]
    fn press_over_ui_does_not_capture() {
        let mut state = AppState::with_world(VoxelWorld::new());
        assert!(!state.set_mouse_look(true, true));
        assert!(!state.mouse_captured);
    }

    #[test]
    fn focus_loss_drops_held_input() {
        let mut state = AppState::with_world(VoxelWorld::new());
        state.handle_key(KeyCode::KeyW, true);
        state.set_mouse_look(true, false);
        state.release_all_input();

        assert!(state.keys_held.is_empty());
        assert!(!state.mouse_captured);
        let position = state.camera.position;
        state.update(0.016);
        assert_eq!(state.camera.position, position);
    }

    #[test]
    fn f1_toggles_overlay() {
        let mut state = AppState::with_world(VoxelWorld::new());
        assert!(state.show_overlay);
        state.handle_key(KeyCode::F1, true);
        assert!(!state.show_overlay);
    }
}
