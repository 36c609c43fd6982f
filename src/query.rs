//! Seams between the motion controller and whatever owns world geometry.

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u32);

/// Bit set of collision layers. A collider is visible to a query when its
/// membership shares at least one bit with the query mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub const fn layer(index: u32) -> Self {
        LayerMask(1 << index)
    }

    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn with(self, other: LayerMask) -> Self {
        LayerMask(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

/// A capsule described by its two hemisphere centers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsulePose {
    pub bottom: Vec3,
    pub top: Vec3,
    pub radius: f32,
}

impl CapsulePose {
    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            bottom: self.bottom + delta,
            top: self.top + delta,
            radius: self.radius,
        }
    }
}

/// First blocking contact of a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Surface normal of the obstacle, pointing away from it.
    pub normal: Vec3,
    /// Distance travelled along the sweep direction before contact.
    pub distance: f32,
    pub collider: ColliderId,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOutcome {
    /// Displacement that was actually applied.
    pub applied: Vec3,
    /// First obstruction met along the way, if any.
    pub contact: Option<Hit>,
}

impl MoveOutcome {
    pub fn unobstructed(delta: Vec3) -> Self {
        Self {
            applied: delta,
            contact: None,
        }
    }
}

pub trait PhysicsQuery {
    /// Sweep `capsule` along the unit `direction` for at most `max_distance`.
    /// Colliders already overlapping the capsule and separating from it are
    /// ignored, as is `ignore`.
    fn sweep_capsule(
        &self,
        capsule: &CapsulePose,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
        ignore: Option<ColliderId>,
    ) -> Option<Hit>;

    /// Every collider on `layers` intersecting `capsule`.
    fn overlap_capsule(&self, capsule: &CapsulePose, layers: LayerMask) -> Vec<ColliderId>;
}

pub trait DisplacementApplicator {
    /// Move `capsule` by `delta`, keeping `skin_width` clearance from anything
    /// in the way.
    fn move_capsule(
        &mut self,
        capsule: &CapsulePose,
        delta: Vec3,
        skin_width: f32,
        ignore: Option<ColliderId>,
    ) -> MoveOutcome;
}

/// Remove the component of `vector` along the unit `normal`.
pub fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    vector - normal * vector.dot(normal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_masks_intersect_on_shared_bits() {
        let terrain = LayerMask::layer(0);
        let avatars = LayerMask::layer(3);
        assert!(LayerMask::ALL.intersects(avatars));
        assert!(!terrain.intersects(avatars));
        assert!(terrain.with(avatars).intersects(avatars));
        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
    }

    #[test]
    fn projection_removes_into_surface_component() {
        let velocity = Vec3::new(3.0, -4.0, 1.0);
        let projected = project_on_plane(velocity, Vec3::Y);
        assert_eq!(projected, Vec3::new(3.0, 0.0, 1.0));
    }
}
