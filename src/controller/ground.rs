use glam::Vec3;

use super::MotionController;
use crate::config::{AIRBORNE_GROUND_CHECK_MARGIN, JUMP_GROUNDING_GRACE};
use crate::query::{DisplacementApplicator, PhysicsQuery};

impl MotionController {
    pub(super) fn detect_ground<W>(&mut self, world: &mut W)
    where
        W: PhysicsQuery + DisplacementApplicator + ?Sized,
    {
        // Right after a jump we would snap straight back to the floor.
        if self.time < self.state.last_jump_time + JUMP_GROUNDING_GRACE {
            return;
        }

        let skin_width = self.config.geometry.skin_width;
        let check_distance = if self.state.is_grounded {
            skin_width + self.config.tuning.ground_check_distance
        } else {
            skin_width + AIRBORNE_GROUND_CHECK_MARGIN
        };

        let capsule = self.capsule();
        let hit = world.sweep_capsule(
            &capsule,
            Vec3::NEG_Y,
            check_distance,
            self.config.tuning.ground_layers,
            self.own_collider,
        );
        let Some(hit) = hit else {
            self.state.is_grounded = false;
            self.state.ground_normal = Vec3::Y;
            return;
        };

        self.state.ground_normal = hit.normal;
        // Too steep: touching, but falling.
        self.state.is_grounded = self.is_walkable(hit.normal);

        if self.state.is_grounded && hit.distance > skin_width {
            let snap = Vec3::NEG_Y * (hit.distance - skin_width);
            let outcome = world.move_capsule(&capsule, snap, skin_width, self.own_collider);
            self.position += outcome.applied;
        }
    }

    pub(super) fn is_walkable(&self, normal: Vec3) -> bool {
        let slope_limit = self.config.geometry.slope_limit_degrees;
        normal.dot(Vec3::Y) > 0.0 && normal.angle_between(Vec3::Y).to_degrees() <= slope_limit
    }
}
