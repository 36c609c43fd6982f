use glam::{Quat, Vec3};
use parry3d::math::{Pose3, Rot3, Vector};
use parry3d::query;
use parry3d::shape::{Capsule, SharedShape};

use crate::query::{
    project_on_plane, CapsulePose, ColliderId, DisplacementApplicator, Hit, LayerMask,
    MoveOutcome, PhysicsQuery,
};

/// Collide-and-slide iterations per move.
const MAX_SLIDE_ITERATIONS: usize = 4;
/// Remaining displacement below this is dropped.
const MIN_MOVE_DISTANCE: f32 = 1e-5;
/// Gap at which a sweep counts as touching.
const CONTACT_TOLERANCE: f32 = 1e-4;
/// Advancement steps per collider before a sweep settles for where it is.
const MAX_ADVANCE_STEPS: usize = 32;

struct WorldCollider {
    id: ColliderId,
    pose: Pose3,
    shape: SharedShape,
    layers: LayerMask,
}

/// Static world geometry answering capsule sweeps and overlaps.
#[derive(Default)]
pub struct CollisionWorld {
    colliders: Vec<WorldCollider>,
    next_id: u32,
}

// parry links its own glam, so values cross over component-wise.
fn capsule_shape(capsule: &CapsulePose) -> Capsule {
    let (a, b) = (capsule.bottom, capsule.top);
    Capsule::new(
        Vector::new(a.x, a.y, a.z),
        Vector::new(b.x, b.y, b.z),
        capsule.radius,
    )
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    fn insert(&mut self, pose: Pose3, shape: SharedShape, layers: LayerMask) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.colliders.push(WorldCollider {
            id,
            pose,
            shape,
            layers,
        });
        id
    }

    /// Axis-aligned box.
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, layers: LayerMask) -> ColliderId {
        self.add_rotated_box(center, half_extents, Quat::IDENTITY, layers)
    }

    /// Box rotated about its center, e.g. a ramp.
    pub fn add_rotated_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        layers: LayerMask,
    ) -> ColliderId {
        let pose = Pose3::from_parts(
            Vector::new(center.x, center.y, center.z),
            Rot3::from_xyzw(rotation.x, rotation.y, rotation.z, rotation.w),
        );
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.insert(pose, shape, layers)
    }

    /// Capsule volume, used for avatars. Keep it in sync with [`Self::set_capsule`].
    pub fn add_capsule(&mut self, capsule: &CapsulePose, layers: LayerMask) -> ColliderId {
        let shape = SharedShape::new(capsule_shape(capsule));
        self.insert(Pose3::IDENTITY, shape, layers)
    }

    /// Replace the geometry of a capsule collider. Returns false for unknown ids.
    pub fn set_capsule(&mut self, id: ColliderId, capsule: &CapsulePose) -> bool {
        match self.colliders.iter_mut().find(|c| c.id == id) {
            Some(collider) => {
                collider.pose = Pose3::IDENTITY;
                collider.shape = SharedShape::new(capsule_shape(capsule));
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: ColliderId) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|c| c.id != id);
        self.colliders.len() != before
    }

    fn visible(
        &self,
        layers: LayerMask,
        ignore: Option<ColliderId>,
    ) -> impl Iterator<Item = &WorldCollider> {
        self.colliders
            .iter()
            .filter(move |c| c.layers.intersects(layers) && Some(c.id) != ignore)
    }
}

/// Conservative advancement against a single collider.
///
/// Along a straight sweep the gap between two convex shapes is convex in the
/// distance travelled, so `gap / closing speed` never overshoots the contact.
/// Flat faces are reached in one step.
fn sweep_against(
    collider: &WorldCollider,
    capsule: &CapsulePose,
    direction: Vec3,
    max_distance: f32,
) -> Option<Hit> {
    let mut travelled = 0.0;
    let mut normal = Vec3::ZERO;
    for _ in 0..MAX_ADVANCE_STEPS {
        let shape = capsule_shape(&capsule.translated(direction * travelled));
        let result = query::contact(
            &Pose3::IDENTITY,
            &shape,
            &collider.pose,
            &*collider.shape,
            max_distance - travelled,
        );
        let contact = match result {
            Ok(Some(contact)) => contact,
            Ok(None) => return None,
            Err(_) => {
                log::warn!("Unsupported shape pair in capsule sweep ({:?})", collider.id);
                return None;
            }
        };

        // normal1 points from the capsule toward the obstacle, in world space.
        let toward = Vec3::new(contact.normal1.x, contact.normal1.y, contact.normal1.z);
        let closing = direction.dot(toward);
        if closing <= f32::EPSILON {
            // Separating or sliding past: the gap never shrinks.
            return None;
        }
        normal = -toward.normalize_or_zero();
        if contact.dist <= CONTACT_TOLERANCE {
            break;
        }
        travelled += contact.dist / closing;
        if travelled > max_distance {
            return None;
        }
    }
    Some(Hit {
        normal,
        distance: travelled,
        collider: collider.id,
    })
}

impl PhysicsQuery for CollisionWorld {
    fn sweep_capsule(
        &self,
        capsule: &CapsulePose,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
        ignore: Option<ColliderId>,
    ) -> Option<Hit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }

        self.visible(layers, ignore)
            .filter_map(|collider| sweep_against(collider, capsule, direction, max_distance))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn overlap_capsule(&self, capsule: &CapsulePose, layers: LayerMask) -> Vec<ColliderId> {
        let shape = capsule_shape(capsule);
        self.visible(layers, None)
            .filter(|collider| {
                query::intersection_test(&Pose3::IDENTITY, &shape, &collider.pose, &*collider.shape)
                    .unwrap_or(false)
            })
            .map(|collider| collider.id)
            .collect()
    }
}

impl DisplacementApplicator for CollisionWorld {
    /// Collide-and-slide: travel until `skin_width` short of the first
    /// obstruction, then continue along its plane with what is left.
    fn move_capsule(
        &mut self,
        capsule: &CapsulePose,
        delta: Vec3,
        skin_width: f32,
        ignore: Option<ColliderId>,
    ) -> MoveOutcome {
        let mut pose = *capsule;
        let mut remaining = delta;
        let mut applied = Vec3::ZERO;
        let mut contact = None;

        for _ in 0..MAX_SLIDE_ITERATIONS {
            let distance = remaining.length();
            if distance <= MIN_MOVE_DISTANCE {
                break;
            }
            let direction = remaining / distance;

            let sweep = self.sweep_capsule(
                &pose,
                direction,
                distance + skin_width,
                LayerMask::ALL,
                ignore,
            );
            let Some(hit) = sweep else {
                applied += remaining;
                break;
            };

            let step = direction * (hit.distance - skin_width).clamp(0.0, distance);
            applied += step;
            pose = pose.translated(step);
            contact.get_or_insert(hit);
            remaining = project_on_plane(remaining - step, hit.normal);
        }

        MoveOutcome { applied, contact }
    }
}
