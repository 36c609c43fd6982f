use glam::{Quat, Vec3};

use super::{MotionController, MotionEvent};
use crate::audio::{CueSink, MotionCue};
use crate::config::FACING_TURN_MULTIPLIER;
use crate::input::MotionInput;
use crate::query::{project_on_plane, DisplacementApplicator, PhysicsQuery};

/// Tangent to the ground plane with the same heading as `direction`.
pub fn reorient_on_slope(direction: Vec3, slope_normal: Vec3) -> Vec3 {
    let right = direction.cross(Vec3::Y);
    slope_normal.cross(right).normalize_or_zero()
}

/// Rotate unit vector `current` toward unit vector `target` by at most `max_angle` radians.
pub fn rotate_towards(current: Vec3, target: Vec3, max_angle: f32) -> Vec3 {
    let angle = current.angle_between(target);
    if angle <= max_angle || angle <= f32::EPSILON {
        return target;
    }
    let axis = current.cross(target);
    let axis = if axis.length_squared() > f32::EPSILON {
        axis.normalize()
    } else {
        // Facing exactly away: turn about up.
        Vec3::Y
    };
    (Quat::from_axis_angle(axis, max_angle) * current).normalize()
}

impl MotionController {
    pub(super) fn integrate<W, A>(
        &mut self,
        input: &MotionInput,
        world: &mut W,
        audio: &mut A,
        dt: f32,
    ) where
        W: PhysicsQuery + DisplacementApplicator + ?Sized,
        A: CueSink + ?Sized,
    {
        let move_direction = input.world_move_direction();
        self.turn_toward(move_direction, dt);

        if self.state.is_grounded {
            self.integrate_ground(move_direction, input.jump_pressed, world, audio, dt);
        } else {
            self.integrate_air(move_direction, dt);
        }
    }

    fn turn_toward(&mut self, move_direction: Vec3, dt: f32) {
        let look = Vec3::new(move_direction.x, 0.0, move_direction.z).normalize_or_zero();
        if look == Vec3::ZERO {
            return;
        }
        let turn_rate = self.config.tuning.rotation_speed_degrees.to_radians();
        let max_angle = turn_rate * dt * FACING_TURN_MULTIPLIER;
        self.facing = rotate_towards(self.facing, look, max_angle);
    }

    fn integrate_ground<W, A>(
        &mut self,
        move_direction: Vec3,
        jump_pressed: bool,
        world: &mut W,
        audio: &mut A,
        dt: f32,
    ) where
        W: PhysicsQuery + DisplacementApplicator + ?Sized,
        A: CueSink + ?Sized,
    {
        let tuning = self.config.tuning;

        let mut target = move_direction * tuning.ground_speed;
        if self.state.is_crouching {
            target *= tuning.crouch_speed_ratio;
        }
        let speed = target.length();
        let along_ground = reorient_on_slope(target.normalize_or_zero(), self.state.ground_normal);
        let target = along_ground * speed;

        // First-order approach, not frame-rate independent.
        let t = (tuning.ground_sharpness * dt).min(1.0);
        self.state.velocity = self.state.velocity.lerp(target, t);

        // Jumping implies standing up; no jump from under a low ceiling.
        if jump_pressed && self.set_stance(&*world, false, false) {
            self.state.velocity.y = 0.0;
            self.state.velocity += Vec3::Y * tuning.jump_force;
            audio.play(MotionCue::Jump);
            self.events.push(MotionEvent::Jumped);
            log::debug!("Jumped from {:?}", self.position);

            self.state.last_jump_time = self.time;
            self.has_jumped_this_tick = true;
            self.state.is_grounded = false;
            self.state.ground_normal = Vec3::Y;
        }

        // Keep the remainder so cadence does not depend on tick length.
        // At most one footstep per tick.
        let interval = tuning.footstep_interval();
        if self.state.footstep_distance >= interval {
            self.state.footstep_distance %= interval;
            audio.play(MotionCue::Footstep);
            self.events.push(MotionEvent::Footstep);
        }
        self.state.footstep_distance += self.state.velocity.length() * dt;
    }

    fn integrate_air(&mut self, move_direction: Vec3, dt: f32) {
        let tuning = self.config.tuning;
        let mut velocity = self.state.velocity + move_direction * (tuning.air_acceleration * dt);

        let vertical = velocity.y;
        let horizontal = Vec3::new(velocity.x, 0.0, velocity.z).clamp_length_max(tuning.air_speed);
        velocity = horizontal + Vec3::Y * vertical;

        velocity.y -= tuning.gravity * dt;
        self.state.velocity = velocity;
    }

    pub(super) fn apply_displacement<W>(&mut self, world: &mut W, dt: f32)
    where
        W: DisplacementApplicator + ?Sized,
    {
        let capsule = self.capsule();
        let delta = self.state.velocity * dt;
        let outcome = world.move_capsule(
            &capsule,
            delta,
            self.config.geometry.skin_width,
            self.own_collider,
        );
        self.position += outcome.applied;

        if let Some(contact) = outcome.contact {
            // Several contacts can happen before the ground check picks up
            // the floor; landing wants the hardest one.
            let velocity = self.state.velocity;
            if !self.state.is_grounded && velocity.y < self.state.last_impact_velocity.y {
                self.state.last_impact_velocity = velocity;
            }
            self.state.velocity = project_on_plane(self.state.velocity, contact.normal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn flat_ground_leaves_direction_unchanged() {
        for direction in [Vec3::X, Vec3::NEG_Z, Vec3::new(0.6, 0.0, -0.8)] {
            let reoriented = reorient_on_slope(direction, Vec3::Y);
            assert!((reoriented - direction).length() < EPS, "{direction:?} -> {reoriented:?}");
        }
    }

    #[test]
    fn slope_reorientation_stays_tangent_and_keeps_heading() {
        let normal = Vec3::new(-0.5, 1.0, 0.0).normalize();
        let reoriented = reorient_on_slope(Vec3::X, normal);
        assert!(reoriented.dot(normal).abs() < EPS);
        assert!((reoriented.length() - 1.0).abs() < EPS);
        // Walking uphill along +x climbs.
        assert!(reoriented.x > 0.0 && reoriented.y > 0.0);
        assert!(reoriented.z.abs() < EPS);
    }

    #[test]
    fn zero_direction_reorients_to_zero() {
        assert_eq!(reorient_on_slope(Vec3::ZERO, Vec3::Y), Vec3::ZERO);
    }

    #[test]
    fn rotate_towards_is_rate_limited() {
        let step = 30f32.to_radians();
        let turned = rotate_towards(Vec3::NEG_Z, Vec3::X, step);
        assert!((turned.angle_between(Vec3::NEG_Z) - step).abs() < 1e-4);
        assert!(turned.y.abs() < EPS);

        let arrived = rotate_towards(Vec3::NEG_Z, Vec3::X, std::f32::consts::PI);
        assert_eq!(arrived, Vec3::X);
    }

    #[test]
    fn rotate_towards_turns_around_when_opposite() {
        let turned = rotate_towards(Vec3::NEG_Z, Vec3::Z, 0.1);
        assert!((turned.angle_between(Vec3::NEG_Z) - 0.1).abs() < 1e-4);
        assert!(turned.y.abs() < EPS);
    }
}
