use glam::Vec3;

use super::{MotionController, MotionEvent};
use crate::audio::{CueSink, MotionCue};
use crate::config::MotionTuning;
use crate::health::{DamageSource, Damageable};

/// Damage for landing at `fall_speed`, or `None` at or below the damage
/// threshold. The ratio is clamped so damage never exceeds `max_fall_damage`.
pub fn fall_damage(tuning: &MotionTuning, fall_speed: f32) -> Option<f32> {
    let ratio = (fall_speed - tuning.min_fall_damage_speed)
        / (tuning.max_fall_damage_speed - tuning.min_fall_damage_speed);
    if ratio <= 0.0 {
        return None;
    }
    let ratio = ratio.min(1.0);
    Some(tuning.min_fall_damage + (tuning.max_fall_damage - tuning.min_fall_damage) * ratio)
}

impl MotionController {
    pub(super) fn on_landed<H, A>(&mut self, health: &mut H, audio: &mut A)
    where
        H: Damageable + ?Sized,
        A: CueSink + ?Sized,
    {
        // Contact resolution may already have flattened the velocity, so
        // also consider the hardest impact since leaving the ground.
        let fall_speed = -self
            .state
            .velocity
            .y
            .min(self.state.last_impact_velocity.y);
        self.state.last_impact_velocity = Vec3::ZERO;
        self.events.push(MotionEvent::Landed { fall_speed });

        let tuning = self.config.tuning;
        if !tuning.fall_damage {
            return;
        }

        match fall_damage(&tuning, fall_speed) {
            Some(damage) => {
                log::info!("Landed at {:.2} m/s, taking {:.1} fall damage", fall_speed, damage);
                health.apply_damage(damage, DamageSource::Fall);
                audio.play(MotionCue::FallDamage);
                self.events.push(MotionEvent::FallDamage { fall_speed, damage });
            }
            None => {
                log::debug!("Landed at {:.2} m/s", fall_speed);
                audio.play(MotionCue::Land);
            }
        }
    }
}
