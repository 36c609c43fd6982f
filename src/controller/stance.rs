use super::{MotionController, MotionEvent};
use crate::query::{LayerMask, PhysicsQuery};

impl MotionController {
    /// Request crouching or standing. Crouching always succeeds; standing is
    /// refused (returning false, state untouched) when the standing capsule
    /// would overlap anything other than the avatar itself. `force` skips
    /// that check and snaps the capsule to the new height at once.
    pub fn set_stance<Q>(&mut self, world: &Q, crouch: bool, force: bool) -> bool
    where
        Q: PhysicsQuery + ?Sized,
    {
        if !crouch && !force {
            let standing = self.capsule_with_height(self.config.geometry.stand_height);
            let obstructed = world
                .overlap_capsule(&standing, LayerMask::ALL)
                .into_iter()
                .any(|collider| Some(collider) != self.own_collider);
            if obstructed {
                log::debug!("Cannot stand up at {:?}: obstructed", self.position);
                return false;
            }
        }
        self.apply_stance(crouch, force);
        true
    }

    pub(super) fn apply_stance(&mut self, crouch: bool, force: bool) {
        let geometry = &self.config.geometry;
        self.state.target_capsule_height = if crouch {
            geometry.crouch_height
        } else {
            geometry.stand_height
        };

        let changed = self.state.is_crouching != crouch;
        self.state.is_crouching = crouch;
        if force {
            self.capsule_height = self.state.target_capsule_height;
        }
        if changed || force {
            log::debug!("Stance changed, crouching: {}", crouch);
            self.events.push(MotionEvent::StanceChanged { crouching: crouch });
        }
    }

    /// Ease the capsule toward the stance height.
    pub(super) fn update_capsule_height(&mut self, dt: f32) {
        let t = (self.config.geometry.crouch_transition_speed * dt).clamp(0.0, 1.0);
        self.capsule_height += (self.state.target_capsule_height - self.capsule_height) * t;
    }
}
