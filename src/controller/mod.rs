//! Kinematic first-person character motion.
//!
//! One [`MotionController::update`] per fixed tick, in this order:
//!
//! 1. Kill-plane check
//! 2. Ground detection (downward capsule sweep)
//! 3. Landing and fall damage on the airborne -> grounded edge
//! 4. Crouch toggle, guarded by a standing-height overlap test
//! 5. Facing, then ground or air velocity integration
//! 6. Displacement through the world, sliding along obstructions

mod ground;
mod landing;
mod movement;
mod stance;

use glam::Vec3;

use crate::audio::CueSink;
use crate::config::{MotionConfig, EYE_HEIGHT_RATIO};
use crate::error::SetupError;
use crate::health::Damageable;
use crate::input::MotionInput;
use crate::query::{CapsulePose, ColliderId, DisplacementApplicator, PhysicsQuery};

pub use landing::fall_damage;
pub use movement::{reorient_on_slope, rotate_towards};

/// Per-avatar motion state. Only the controller writes it.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionState {
    pub velocity: Vec3,
    pub is_grounded: bool,
    /// Up while airborne, otherwise the last ground contact normal.
    pub ground_normal: Vec3,
    pub is_crouching: bool,
    pub target_capsule_height: f32,
    pub last_jump_time: f32,
    /// Steepest downward velocity met at a blocking contact while airborne.
    /// Cleared when landing consumes it.
    pub last_impact_velocity: Vec3,
    pub footstep_distance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionEvent {
    StanceChanged { crouching: bool },
    Jumped,
    Landed { fall_speed: f32 },
    FallDamage { fall_speed: f32, damage: f32 },
    Footstep,
    Killed,
}

pub struct MotionController {
    config: MotionConfig,
    state: MotionState,
    position: Vec3,
    facing: Vec3,
    capsule_height: f32,
    own_collider: Option<ColliderId>,
    time: f32,
    has_jumped_this_tick: bool,
    events: Vec<MotionEvent>,
}

impl MotionController {
    /// Spawn an avatar with its feet at `position`, forced into the standing stance.
    ///
    /// `own_collider` is the avatar's own volume in the world, if it has one;
    /// queries never treat it as an obstruction.
    pub fn new(
        config: MotionConfig,
        position: Vec3,
        own_collider: Option<ColliderId>,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        let stand_height = config.geometry.stand_height;
        let mut controller = Self {
            config,
            state: MotionState {
                velocity: Vec3::ZERO,
                is_grounded: false,
                ground_normal: Vec3::Y,
                is_crouching: false,
                target_capsule_height: stand_height,
                last_jump_time: f32::NEG_INFINITY,
                last_impact_velocity: Vec3::ZERO,
                footstep_distance: 0.0,
            },
            position,
            facing: Vec3::NEG_Z,
            capsule_height: stand_height,
            own_collider,
            time: 0.0,
            has_jumped_this_tick: false,
            events: Vec::new(),
        };
        controller.apply_stance(false, true);
        log::info!("Spawned avatar at {:?}", position);
        Ok(controller)
    }

    /// Advance one fixed simulation step of `dt` seconds.
    pub fn update<W, H, A>(
        &mut self,
        input: &MotionInput,
        world: &mut W,
        health: &mut H,
        audio: &mut A,
        dt: f32,
    ) where
        W: PhysicsQuery + DisplacementApplicator + ?Sized,
        H: Damageable + ?Sized,
        A: CueSink + ?Sized,
    {
        self.time += dt;
        self.has_jumped_this_tick = false;

        if health.is_dead() {
            return;
        }
        if self.position.y < self.config.tuning.kill_height {
            log::info!(
                "Avatar fell below kill height {} at {:?}",
                self.config.tuning.kill_height,
                self.position
            );
            health.kill();
            self.events.push(MotionEvent::Killed);
            return;
        }

        let was_grounded = self.state.is_grounded;
        self.detect_ground(world);
        if self.state.is_grounded && !was_grounded {
            self.on_landed(health, audio);
        }

        if input.crouch_pressed {
            let crouch = !self.state.is_crouching;
            self.set_stance(world, crouch, false);
        }
        self.update_capsule_height(dt);

        self.integrate(input, world, audio, dt);
        self.apply_displacement(world, dt);
    }

    /// Put the avatar somewhere else, e.g. on respawn. Motion is reset.
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.state.velocity = Vec3::ZERO;
        self.state.is_grounded = false;
        self.state.ground_normal = Vec3::Y;
        self.state.last_impact_velocity = Vec3::ZERO;
        self.state.footstep_distance = 0.0;
    }

    pub fn drain_events(&mut self) -> Vec<MotionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.state.is_grounded
    }

    pub fn is_crouching(&self) -> bool {
        self.state.is_crouching
    }

    pub fn ground_normal(&self) -> Vec3 {
        self.state.ground_normal
    }

    /// Unit horizontal direction the avatar faces.
    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    pub fn has_jumped_this_tick(&self) -> bool {
        self.has_jumped_this_tick
    }

    pub fn capsule_height(&self) -> f32 {
        self.capsule_height
    }

    pub fn eye_height(&self) -> f32 {
        self.capsule_height * EYE_HEIGHT_RATIO
    }

    /// Current collision capsule; the feet sit at [`Self::position`].
    pub fn capsule(&self) -> CapsulePose {
        self.capsule_with_height(self.capsule_height)
    }

    fn capsule_with_height(&self, height: f32) -> CapsulePose {
        let radius = self.config.geometry.radius;
        CapsulePose {
            bottom: self.position + Vec3::Y * radius,
            top: self.position + Vec3::Y * (height - radius),
            radius,
        }
    }
}
