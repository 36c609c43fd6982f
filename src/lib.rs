//! Kinematic capsule movement for a first-person avatar: grounding, slopes,
//! crouching, jumping, air control, obstruction sliding and fall damage.

pub mod audio;
pub mod collision;
pub mod config;
pub mod controller;
pub mod error;
pub mod health;
pub mod input;
pub mod query;

pub use audio::{CueRecorder, CueSink, MotionCue};
pub use collision::CollisionWorld;
pub use config::{CapsuleGeometry, MotionConfig, MotionTuning};
pub use controller::{MotionController, MotionEvent, MotionState};
pub use error::SetupError;
pub use health::{DamageSource, Damageable, Health, HealthEvent};
pub use input::{Action, InputRouter, MotionInput};
pub use query::{
    CapsulePose, ColliderId, DisplacementApplicator, Hit, LayerMask, MoveOutcome, PhysicsQuery,
};
