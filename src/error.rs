use thiserror::Error;

/// Failures surfaced once while setting up an avatar. Ticks never fail.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid capsule geometry: {0}")]
    InvalidGeometry(String),
    #[error("invalid motion tuning: {0}")]
    InvalidTuning(String),
    #[error("failed to parse motion config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read motion config: {0}")]
    Io(#[from] std::io::Error),
}
