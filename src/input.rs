use std::collections::HashSet;

use glam::{Vec2, Vec3};

pub const LOOK_SENSITIVITY: f32 = 0.002;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Jump,
    Crouch,
}

/// Intents for a single simulation tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionInput {
    /// Camera-relative move axis: x strafes right, y goes forward.
    pub move_axis: Vec2,
    /// Camera yaw in radians.
    pub camera_yaw: f32,
    pub jump_pressed: bool,
    pub crouch_pressed: bool,
}

impl MotionInput {
    /// Flattened, normalized world-space move direction (zero when idle).
    pub fn world_move_direction(&self) -> Vec3 {
        let (sin, cos) = self.camera_yaw.sin_cos();
        let forward = Vec3::new(sin, 0.0, -cos);
        let right = Vec3::new(cos, 0.0, sin);
        let mut direction = right * self.move_axis.x + forward * self.move_axis.y;
        direction.y = 0.0;
        direction.normalize_or_zero()
    }
}

/// Single input service built at startup and handed to every consumer.
/// Turns held buttons into once-per-tick edge triggers.
#[derive(Debug, Default)]
pub struct InputRouter {
    held: HashSet<Action>,
    held_last_tick: HashSet<Action>,
    move_axis: Vec2,
    camera_yaw: f32,
    look_delta: (f32, f32),
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn set_move_axis(&mut self, axis: Vec2) {
        self.move_axis = axis.clamp_length_max(1.0);
    }

    pub fn handle_mouse_move(&mut self, dx: f32, dy: f32) {
        self.look_delta.0 += dx;
        self.look_delta.1 += dy;
    }

    pub fn consume_look_delta(&mut self) -> (f32, f32) {
        let delta = self.look_delta;
        self.look_delta = (0.0, 0.0);
        delta
    }

    pub fn camera_yaw(&self) -> f32 {
        self.camera_yaw
    }

    pub fn set_camera_yaw(&mut self, yaw: f32) {
        self.camera_yaw = yaw;
    }

    /// Consume this tick's intents. Call exactly once per simulation tick.
    pub fn sample(&mut self) -> MotionInput {
        let (dx, _) = self.consume_look_delta();
        self.camera_yaw += dx * LOOK_SENSITIVITY;

        let pressed = |action: Action| {
            self.held.contains(&action) && !self.held_last_tick.contains(&action)
        };
        let input = MotionInput {
            move_axis: self.move_axis,
            camera_yaw: self.camera_yaw,
            jump_pressed: pressed(Action::Jump),
            crouch_pressed: pressed(Action::Crouch),
        };
        self.held_last_tick = self.held.clone();
        input
    }
}
