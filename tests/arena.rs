//! Controller driven through real capsule sweeps against static geometry.

use glam::{Quat, Vec2, Vec3};
use motion_core::config::SKIN_WIDTH;
use motion_core::{
    CollisionWorld, CueRecorder, Damageable, Health, HealthEvent, LayerMask, MotionConfig,
    MotionController, MotionCue, MotionEvent, MotionInput,
};

const DT: f32 = 1.0 / 60.0;
const EPS: f32 = 1e-2;

fn floor_sized(half_extent: f32) -> CollisionWorld {
    let mut world = CollisionWorld::new();
    world.add_box(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(half_extent, 0.5, half_extent),
        LayerMask::layer(0),
    );
    world
}

fn floor() -> CollisionWorld {
    floor_sized(50.0)
}

fn landing_speeds(events: &[MotionEvent]) -> Vec<f32> {
    events
        .iter()
        .filter_map(|event| match event {
            MotionEvent::Landed { fall_speed } => Some(*fall_speed),
            _ => None,
        })
        .collect()
}

fn walk(x: f32, forward: f32) -> MotionInput {
    MotionInput {
        move_axis: Vec2::new(x, forward),
        ..MotionInput::default()
    }
}

fn crouch_toggle() -> MotionInput {
    MotionInput {
        crouch_pressed: true,
        ..MotionInput::default()
    }
}

struct Arena {
    world: CollisionWorld,
    avatar: MotionController,
    health: Health,
    audio: CueRecorder,
    events: Vec<MotionEvent>,
    cues: Vec<MotionCue>,
}

impl Arena {
    fn new(world: CollisionWorld, config: MotionConfig, spawn: Vec3) -> Self {
        let mut avatar = MotionController::new(config, spawn, None).unwrap();
        avatar.drain_events();
        Self {
            world,
            avatar,
            health: Health::default(),
            audio: CueRecorder::new(),
            events: Vec::new(),
            cues: Vec::new(),
        }
    }

    fn tick(&mut self, input: &MotionInput) {
        self.avatar
            .update(input, &mut self.world, &mut self.health, &mut self.audio, DT);
        self.events.extend(self.avatar.drain_events());
        self.cues.extend(self.audio.drain());
    }

    fn run(&mut self, input: &MotionInput, ticks: usize) {
        for _ in 0..ticks {
            self.tick(input);
        }
    }
}

#[test]
fn falls_and_rests_one_skin_above_the_floor() {
    let mut arena = Arena::new(floor(), MotionConfig::default(), Vec3::new(0.0, 2.0, 0.0));
    arena.run(&MotionInput::default(), 120);

    assert!(arena.avatar.is_grounded());
    let position = arena.avatar.position();
    assert!((position.y - SKIN_WIDTH).abs() < EPS, "{position:?}");
    assert!(arena.avatar.velocity().length() < 1e-3);

    let landings = landing_speeds(&arena.events);
    assert_eq!(landings.len(), 1);
    assert!(landings[0] > 7.0 && landings[0] < 10.0, "fall speed {}", landings[0]);
    assert_eq!(arena.cues, vec![MotionCue::Land]);
    assert_eq!(arena.health.current(), 100.0);
}

#[test]
fn walking_into_a_wall_slides_along_it() {
    let mut world = floor();
    world.add_box(Vec3::new(3.0, 1.0, 0.0), Vec3::new(0.5, 2.0, 10.0), LayerMask::layer(0));
    let mut arena = Arena::new(world, MotionConfig::default(), Vec3::new(0.0, SKIN_WIDTH, 0.0));

    // Diagonally right and forward (-z).
    for _ in 0..60 {
        arena.tick(&walk(1.0, 1.0));
        assert!(arena.avatar.position().x <= 2.5 - 0.35 + 1e-3, "{:?}", arena.avatar.position());
    }
    let position = arena.avatar.position();
    assert!(position.x > 1.5, "{position:?}");
    assert!(position.z < -3.0, "{position:?}");
    assert!(arena.avatar.is_grounded());
}

#[test]
fn low_ceiling_keeps_the_avatar_crouched() {
    let mut world = floor();
    world.add_box(Vec3::new(0.0, 1.75, 0.0), Vec3::new(3.0, 0.25, 3.0), LayerMask::layer(0));
    let mut arena = Arena::new(world, MotionConfig::default(), Vec3::new(-5.0, SKIN_WIDTH, 0.0));

    arena.tick(&crouch_toggle());
    assert!(arena.avatar.is_crouching());
    arena.run(&MotionInput::default(), 60);
    assert!(arena.avatar.capsule_height() < 1.0);

    // Crouch-walk under the ceiling and stop.
    arena.run(&walk(1.0, 0.0), 60);
    arena.run(&MotionInput::default(), 60);
    assert!(arena.avatar.position().x.abs() < 2.0, "{:?}", arena.avatar.position());
    arena.events.clear();

    arena.tick(&crouch_toggle());
    assert!(arena.avatar.is_crouching());
    arena.tick(&MotionInput {
        jump_pressed: true,
        ..MotionInput::default()
    });
    assert!(!arena.avatar.has_jumped_this_tick());
    assert!(arena.avatar.is_grounded());
    assert!(!arena
        .events
        .iter()
        .any(|event| matches!(event, MotionEvent::StanceChanged { .. } | MotionEvent::Jumped)));

    arena.avatar.teleport(Vec3::new(-6.0, SKIN_WIDTH, 0.0));
    arena.tick(&crouch_toggle());
    assert!(!arena.avatar.is_crouching());
    assert!(arena
        .events
        .contains(&MotionEvent::StanceChanged { crouching: false }));
}

#[test]
fn walkable_ramp_grounds_with_its_normal() {
    let tilt = 20f32.to_radians();
    let mut world = CollisionWorld::new();
    world.add_rotated_box(
        Vec3::ZERO,
        Vec3::new(20.0, 0.5, 20.0),
        Quat::from_rotation_z(tilt),
        LayerMask::layer(0),
    );
    let mut arena = Arena::new(world, MotionConfig::default(), Vec3::new(0.0, 2.0, 0.0));
    arena.run(&MotionInput::default(), 120);

    assert!(arena.avatar.is_grounded());
    let normal = arena.avatar.ground_normal();
    assert!((normal.angle_between(Vec3::Y) - tilt).abs() < EPS, "{normal:?}");
    assert!(normal.x < 0.0);
    // No gravity while grounded, so the avatar stays put.
    assert!(arena.avatar.velocity().length() < 1e-2);
}

#[test]
fn steep_slope_never_grounds() {
    let mut world = CollisionWorld::new();
    world.add_rotated_box(
        Vec3::ZERO,
        Vec3::new(20.0, 0.5, 20.0),
        Quat::from_rotation_z(60f32.to_radians()),
        LayerMask::layer(0),
    );
    let mut arena = Arena::new(world, MotionConfig::default(), Vec3::new(0.0, 3.0, 0.0));
    for _ in 0..60 {
        arena.tick(&MotionInput::default());
        assert!(!arena.avatar.is_grounded());
    }
    // Slid down toward -x instead of resting on it.
    assert!(arena.avatar.position().x < 0.0, "{:?}", arena.avatar.position());
    assert!(arena.avatar.velocity().y < 0.0);
    assert!(!arena.events.iter().any(|event| matches!(event, MotionEvent::Landed { .. })));
}

#[test]
fn falling_off_the_world_kills_once() {
    let mut config = MotionConfig::default();
    config.tuning.kill_height = -5.0;
    let mut arena = Arena::new(CollisionWorld::new(), config, Vec3::ZERO);
    arena.run(&MotionInput::default(), 120);

    assert!(arena.health.is_dead());
    assert_eq!(
        arena.events.iter().filter(|event| **event == MotionEvent::Killed).count(),
        1
    );
    assert!(arena.health.drain_events().contains(&HealthEvent::Died));

    let resting = arena.avatar.position();
    assert!(resting.y < -5.0);
    arena.run(&walk(0.0, 1.0), 10);
    assert_eq!(arena.avatar.position(), resting);
}

#[test]
fn long_fall_hurts_on_small_and_large_floors() {
    for half_extent in [50.0, 200.0] {
        let spawn = Vec3::new(37.0, 30.0, -12.0);
        let mut arena = Arena::new(floor_sized(half_extent), MotionConfig::default(), spawn);
        arena.run(&MotionInput::default(), 240);

        assert!(arena.avatar.is_grounded());
        assert!((arena.avatar.position().y - SKIN_WIDTH).abs() < EPS);
        let landings = landing_speeds(&arena.events);
        assert_eq!(landings.len(), 1, "{landings:?}");
        assert!(landings[0] > 30.0, "fall speed {}", landings[0]);

        let health = arena.health.current();
        assert!(health > 30.0 && health < 45.0, "health {health}");
        assert!(arena.cues.contains(&MotionCue::FallDamage));
        assert!(!arena.cues.contains(&MotionCue::Land));
    }
}

#[test]
fn long_fall_onto_a_ramp_while_steering_uphill_hurts() {
    let mut world = CollisionWorld::new();
    world.add_rotated_box(
        Vec3::ZERO,
        Vec3::new(200.0, 0.5, 200.0),
        Quat::from_rotation_z(30f32.to_radians()),
        LayerMask::layer(0),
    );
    let mut arena = Arena::new(world, MotionConfig::default(), Vec3::new(0.0, 30.0, 0.0));

    // The ramp rises toward +x.
    for _ in 0..240 {
        arena.tick(&walk(1.0, 0.0));
        if !landing_speeds(&arena.events).is_empty() {
            break;
        }
    }
    let landings = landing_speeds(&arena.events);
    assert_eq!(landings.len(), 1, "never landed");
    assert!(landings[0] > 25.0, "fall speed {}", landings[0]);
    assert!(arena.avatar.is_grounded());

    let health = arena.health.current();
    assert!(health > 30.0 && health < 60.0, "health {health}");
    assert!(arena.cues.contains(&MotionCue::FallDamage));
}
