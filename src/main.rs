use glam::{Quat, Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use motion_core::{
    Action, CapsulePose, CollisionWorld, CueRecorder, Health, InputRouter, LayerMask, MotionConfig,
    MotionController, MotionEvent,
};

const TICK_RATE: f32 = 60.0;
const SIM_SECONDS: f32 = 12.0;
const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 2.0, 0.0);
const TERRAIN: LayerMask = LayerMask::layer(0);
const AVATARS: LayerMask = LayerMask::layer(1);

/// Floor, a walkable ramp, a steep slope, a low ceiling and a raised ledge.
fn build_arena() -> CollisionWorld {
    let mut world = CollisionWorld::new();
    world.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(30.0, 0.5, 30.0), TERRAIN);
    world.add_rotated_box(
        Vec3::new(12.0, 0.0, 0.0),
        Vec3::new(4.0, 0.5, 3.0),
        Quat::from_rotation_z(20f32.to_radians()),
        TERRAIN,
    );
    world.add_rotated_box(
        Vec3::new(12.0, 0.0, 10.0),
        Vec3::new(4.0, 0.5, 3.0),
        Quat::from_rotation_z(60f32.to_radians()),
        TERRAIN,
    );
    world.add_box(Vec3::new(-8.0, 1.75, 0.0), Vec3::new(3.0, 0.25, 3.0), TERRAIN);
    world.add_box(Vec3::new(0.0, 1.5, -12.0), Vec3::new(4.0, 1.5, 4.0), TERRAIN);
    log::info!("Arena built with {} colliders", world.len());
    world
}

/// Drive the router like a player would.
fn script_input(router: &mut InputRouter, time: f32, rng: &mut SmallRng) {
    let press_between = |router: &mut InputRouter, action, start: f32| {
        if time >= start && time < start + 0.1 {
            router.press(action);
        } else {
            router.release(action);
        }
    };

    match time {
        t if t < 1.0 => router.set_move_axis(Vec2::ZERO),
        t if t < 3.0 => router.set_move_axis(Vec2::new(0.0, 1.0)),
        t if t < 4.0 => router.set_move_axis(Vec2::new(0.0, -1.0)),
        t if t < 6.5 => router.set_move_axis(Vec2::new(-1.0, 0.0)),
        t if t < 7.8 => router.set_move_axis(Vec2::new(1.0, 0.0)),
        _ => {
            router.handle_mouse_move(rng.gen_range(-40.0..40.0), 0.0);
            router.set_move_axis(Vec2::new(rng.gen_range(-0.3..0.3), 1.0));
        }
    }

    // Jump at 3s, crouch at 4s, try to stand under the ceiling at 6s,
    // stand in the open at 7.85s, then jump around.
    if (4.0..4.1).contains(&time) || (6.0..6.1).contains(&time) || (7.85..7.95).contains(&time) {
        router.press(Action::Crouch);
    } else {
        router.release(Action::Crouch);
    }
    let jump_at = if time < 8.0 { 3.0 } else { 8.0 + (time - 8.0).floor() };
    press_between(router, Action::Jump, jump_at);
}

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => MotionConfig::load(&path).unwrap_or_else(|e| {
            log::error!("{}", e);
            std::process::exit(1);
        }),
        None => MotionConfig::default(),
    };

    let mut world = build_arena();
    let mut router = InputRouter::new();
    let mut health = Health::default();
    let mut audio = CueRecorder::new();
    let mut rng = SmallRng::seed_from_u64(2026);

    let geometry = config.geometry;
    let own = world.add_capsule(
        &CapsulePose {
            bottom: SPAWN_POSITION + Vec3::Y * geometry.radius,
            top: SPAWN_POSITION + Vec3::Y * (geometry.stand_height - geometry.radius),
            radius: geometry.radius,
        },
        AVATARS,
    );
    let mut avatar = match MotionController::new(config, SPAWN_POSITION, Some(own)) {
        Ok(avatar) => avatar,
        Err(e) => {
            log::error!("Failed to spawn avatar: {}", e);
            std::process::exit(1);
        }
    };

    let dt = 1.0 / TICK_RATE;
    let ticks = (SIM_SECONDS * TICK_RATE) as u32;
    let mut footsteps = 0;
    for tick in 0..ticks {
        let time = tick as f32 * dt;
        script_input(&mut router, time, &mut rng);
        let input = router.sample();

        avatar.update(&input, &mut world, &mut health, &mut audio, dt);
        world.set_capsule(own, &avatar.capsule());

        for event in avatar.drain_events() {
            match event {
                MotionEvent::Footstep => footsteps += 1,
                other => log::info!("[{:6.2}s] {:?} at {:?}", time, other, avatar.position()),
            }
        }
        for event in health.drain_events() {
            log::info!("[{:6.2}s] {:?}", time, event);
        }
        audio.drain();
    }

    log::info!(
        "Finished {} ticks: position {:?}, velocity {:?}, grounded {}, crouching {}, \
         health {:.1}, {} footsteps",
        ticks,
        avatar.position(),
        avatar.velocity(),
        avatar.is_grounded(),
        avatar.is_crouching(),
        health.current(),
        footsteps
    );
}
