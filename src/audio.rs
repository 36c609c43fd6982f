#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MotionCue {
    Footstep,
    Jump,
    Land,
    FallDamage,
}

/// Fire-and-forget sound triggers.
pub trait CueSink {
    fn play(&mut self, cue: MotionCue);
}

/// Buffers cues until the host's audio backend picks them up.
#[derive(Default, Debug)]
pub struct CueRecorder {
    pending: Vec<MotionCue>,
}

impl CueRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[MotionCue] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<MotionCue> {
        std::mem::take(&mut self.pending)
    }
}

impl CueSink for CueRecorder {
    fn play(&mut self, cue: MotionCue) {
        log::debug!("Cue {:?}", cue);
        self.pending.push(cue);
    }
}
