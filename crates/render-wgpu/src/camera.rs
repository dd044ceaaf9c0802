use digworld_render::RenderView;
use glam::{Mat4, Vec3};

/// Highest pitch the camera may reach, in degrees.
const PITCH_LIMIT_DEGREES: f32 = 89.9;
/// Yaw wraps back by a full turn once it passes this, in degrees.
const YAW_WRAP_DEGREES: f32 = 360.0;

/// Movement requested for one frame. Axis values are -1, 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    /// +1 along the look direction (W), -1 against it (S).
    pub forward: f32,
    /// +1 to the right (D), -1 to the left (A).
    pub strafe: f32,
    /// +1 up (E), -1 down (Q), on world Y.
    pub vertical: f32,
    /// Multiply speed by the camera's boost factor (Shift).
    pub boost: bool,
}

/// Fly camera with position, yaw, pitch, and projection parameters.
///
/// Yaw 0 looks along +Z and grows toward +X. Positive pitch looks up.
/// Camera motion is frame-driver state; the voxel world never sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    /// Radians.
    pub yaw: f32,
    /// Radians, clamped to ±89.9°.
    pub pitch: f32,
    /// Vertical field of view, radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Units per second.
    pub speed: f32,
    /// Speed multiplier while boosting.
    pub boost: f32,
    /// Degrees of rotation per unit of mouse delta per second.
    pub sensitivity: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::from_view(&RenderView::default(), 1280.0 / 800.0)
    }
}

impl FlyCamera {
    pub fn from_view(view: &RenderView, aspect: f32) -> Self {
        Self {
            position: view.eye,
            yaw: view.yaw_degrees.to_radians(),
            pitch: view
                .pitch_degrees
                .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES)
                .to_radians(),
            fov: view.fov_degrees.to_radians(),
            aspect,
            near: view.near,
            far: view.far,
            speed: 5.0,
            boost: 4.0,
            sensitivity: 25.0,
        }
    }

    /// Snapshot of the camera as a renderer-agnostic view.
    pub fn view(&self) -> RenderView {
        RenderView {
            eye: self.position,
            yaw_degrees: self.yaw.to_degrees(),
            pitch_degrees: self.pitch.to_degrees(),
            fov_degrees: self.fov.to_degrees(),
            near: self.near,
            far: self.far,
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Point `distance` units along the look direction.
    pub fn target(&self, distance: f32) -> Vec3 {
        self.position + self.forward() * distance
    }

    /// Apply one frame of movement.
    ///
    /// The horizontal direction is normalised before scaling, so diagonal
    /// movement is not faster. Vertical movement is added on world Y.
    pub fn apply_movement(&mut self, input: MoveInput, dt: f32) {
        let mut step = self.speed * dt;
        if input.boost {
            step *= self.boost;
        }
        let dir = self.forward() * input.forward + self.right() * input.strafe;
        let mut translation = dir.normalize_or_zero() * step;
        translation.y += input.vertical * step;
        self.position += translation;
    }

    /// Rotate by a mouse delta over a frame of length `dt`.
    pub fn rotate(&mut self, dx: f32, dy: f32, dt: f32) {
        let scale = self.sensitivity * dt;
        let mut yaw = self.yaw.to_degrees() - dx * scale;
        let pitch = (self.pitch.to_degrees() - dy * scale)
            .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
        if yaw > YAW_WRAP_DEGREES {
            yaw -= YAW_WRAP_DEGREES;
        }
        if yaw < -YAW_WRAP_DEGREES {
            yaw += YAW_WRAP_DEGREES;
        }
        self.yaw = yaw.to_radians();
        self.pitch = pitch.to_radians();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
