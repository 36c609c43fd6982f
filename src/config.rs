use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::query::LayerMask;

// Capsule dimensions
pub const CAPSULE_RADIUS: f32 = 0.35;
pub const CAPSULE_STAND_HEIGHT: f32 = 2.0;
pub const CAPSULE_CROUCH_HEIGHT: f32 = 0.9;
pub const SKIN_WIDTH: f32 = 0.08;
pub const SLOPE_LIMIT_DEGREES: f32 = 45.0;
pub const CROUCH_TRANSITION_SPEED: f32 = 10.0;

// Movement
pub const GRAVITY: f32 = 20.0;
pub const GROUND_CHECK_DISTANCE: f32 = 0.05;
pub const MOVE_SPEED: f32 = 10.0;
pub const GROUND_SHARPNESS: f32 = 15.0;
pub const CROUCH_SPEED_RATIO: f32 = 0.5;
pub const AIR_MOVE_SPEED: f32 = 5.0;
pub const AIR_ACCELERATION: f32 = 25.0;
pub const JUMP_FORCE: f32 = 9.0;
pub const ROTATION_SPEED_DEGREES: f32 = 200.0;
pub const KILL_HEIGHT: f32 = -50.0;

// Audio cadence
pub const FOOTSTEPS_PER_METER: f32 = 1.0;

// Fall damage
pub const MIN_FALL_DAMAGE_SPEED: f32 = 10.0;
pub const MAX_FALL_DAMAGE_SPEED: f32 = 40.0;
pub const MIN_FALL_DAMAGE: f32 = 10.0;
pub const MAX_FALL_DAMAGE: f32 = 75.0;

/// Seconds after a jump during which grounding is not re-evaluated.
pub const JUMP_GROUNDING_GRACE: f32 = 0.2;
/// Ground check length past the skin width while airborne. Shorter than the
/// grounded check so a falling capsule is not grounded early, yet it still
/// finds a floor that a move stopped `skin_width` short of, even after a
/// slanted approach.
pub const AIRBORNE_GROUND_CHECK_MARGIN: f32 = 0.02;
/// Facing turns this many times faster than `rotation_speed_degrees`.
pub const FACING_TURN_MULTIPLIER: f32 = 3.0;
/// Eye height as a fraction of the current capsule height.
pub const EYE_HEIGHT_RATIO: f32 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsuleGeometry {
    pub radius: f32,
    pub stand_height: f32,
    pub crouch_height: f32,
    pub skin_width: f32,
    pub slope_limit_degrees: f32,
    pub crouch_transition_speed: f32,
}

impl Default for CapsuleGeometry {
    fn default() -> Self {
        Self {
            radius: CAPSULE_RADIUS,
            stand_height: CAPSULE_STAND_HEIGHT,
            crouch_height: CAPSULE_CROUCH_HEIGHT,
            skin_width: SKIN_WIDTH,
            slope_limit_degrees: SLOPE_LIMIT_DEGREES,
            crouch_transition_speed: CROUCH_TRANSITION_SPEED,
        }
    }
}

impl CapsuleGeometry {
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.radius <= 0.0 {
            return Err(SetupError::InvalidGeometry(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if self.crouch_height <= 2.0 * self.radius || self.crouch_height > self.stand_height {
            return Err(SetupError::InvalidGeometry(format!(
                "crouch height {} must lie in ({}, {}]",
                self.crouch_height,
                2.0 * self.radius,
                self.stand_height
            )));
        }
        if self.skin_width < 0.0 {
            return Err(SetupError::InvalidGeometry(format!(
                "skin width must not be negative, got {}",
                self.skin_width
            )));
        }
        if self.slope_limit_degrees <= 0.0 || self.slope_limit_degrees > 90.0 {
            return Err(SetupError::InvalidGeometry(format!(
                "slope limit must lie in (0, 90] degrees, got {}",
                self.slope_limit_degrees
            )));
        }
        if self.crouch_transition_speed < 0.0 {
            return Err(SetupError::InvalidGeometry(
                "crouch transition speed must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    pub ground_speed: f32,
    pub ground_sharpness: f32,
    pub crouch_speed_ratio: f32,
    pub air_speed: f32,
    pub air_acceleration: f32,
    pub gravity: f32,
    pub jump_force: f32,
    pub rotation_speed_degrees: f32,
    /// Extra ground check length past the skin width while already grounded.
    pub ground_check_distance: f32,
    pub kill_height: f32,
    pub footsteps_per_meter: f32,
    pub fall_damage: bool,
    pub min_fall_damage_speed: f32,
    pub max_fall_damage_speed: f32,
    pub min_fall_damage: f32,
    pub max_fall_damage: f32,
    pub ground_layers: LayerMask,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            ground_speed: MOVE_SPEED,
            ground_sharpness: GROUND_SHARPNESS,
            crouch_speed_ratio: CROUCH_SPEED_RATIO,
            air_speed: AIR_MOVE_SPEED,
            air_acceleration: AIR_ACCELERATION,
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            rotation_speed_degrees: ROTATION_SPEED_DEGREES,
            ground_check_distance: GROUND_CHECK_DISTANCE,
            kill_height: KILL_HEIGHT,
            footsteps_per_meter: FOOTSTEPS_PER_METER,
            fall_damage: true,
            min_fall_damage_speed: MIN_FALL_DAMAGE_SPEED,
            max_fall_damage_speed: MAX_FALL_DAMAGE_SPEED,
            min_fall_damage: MIN_FALL_DAMAGE,
            max_fall_damage: MAX_FALL_DAMAGE,
            ground_layers: LayerMask::ALL,
        }
    }
}

impl MotionTuning {
    pub fn validate(&self) -> Result<(), SetupError> {
        let non_negative = [
            ("ground_speed", self.ground_speed),
            ("ground_sharpness", self.ground_sharpness),
            ("air_speed", self.air_speed),
            ("air_acceleration", self.air_acceleration),
            ("gravity", self.gravity),
            ("jump_force", self.jump_force),
            ("rotation_speed_degrees", self.rotation_speed_degrees),
            ("ground_check_distance", self.ground_check_distance),
        ];
        for (name, value) in non_negative {
            if value < 0.0 || !value.is_finite() {
                return Err(SetupError::InvalidTuning(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.crouch_speed_ratio) {
            return Err(SetupError::InvalidTuning(format!(
                "crouch_speed_ratio must lie in [0, 1], got {}",
                self.crouch_speed_ratio
            )));
        }
        if self.footsteps_per_meter <= 0.0 {
            return Err(SetupError::InvalidTuning(format!(
                "footsteps_per_meter must be positive, got {}",
                self.footsteps_per_meter
            )));
        }
        if self.max_fall_damage_speed <= self.min_fall_damage_speed {
            return Err(SetupError::InvalidTuning(format!(
                "max_fall_damage_speed ({}) must exceed min_fall_damage_speed ({})",
                self.max_fall_damage_speed, self.min_fall_damage_speed
            )));
        }
        Ok(())
    }

    /// Distance travelled between two footstep cues.
    pub fn footstep_interval(&self) -> f32 {
        1.0 / self.footsteps_per_meter
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub geometry: CapsuleGeometry,
    pub tuning: MotionTuning,
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), SetupError> {
        self.geometry.validate()?;
        self.tuning.validate()
    }

    /// Parse a (possibly partial) JSON document; missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, SetupError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded motion config from {}", path.as_ref().display());
        Ok(config)
    }
}
