pub const MAX_HEALTH: f32 = 100.0;
pub const CRITICAL_HEALTH_RATIO: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageSource {
    Fall,
    KillPlane,
    External,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HealthEvent {
    Damaged { amount: f32, source: DamageSource },
    Healed { amount: f32 },
    Died,
}

/// What the motion controller needs from whoever tracks hit points.
pub trait Damageable {
    fn apply_damage(&mut self, amount: f32, source: DamageSource);
    /// Unconditional death regardless of remaining health.
    fn kill(&mut self);
    fn is_dead(&self) -> bool;
}

#[derive(Clone, Debug)]
pub struct Health {
    pub max_health: f32,
    pub critical_ratio: f32,
    pub invincible: bool,
    current: f32,
    dead: bool,
    events: Vec<HealthEvent>,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(MAX_HEALTH)
    }
}

impl Health {
    pub fn new(max_health: f32) -> Self {
        Self {
            max_health,
            critical_ratio: CRITICAL_HEALTH_RATIO,
            invincible: false,
            current: max_health,
            dead: false,
            events: Vec::new(),
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn ratio(&self) -> f32 {
        self.current / self.max_health
    }

    pub fn is_critical(&self) -> bool {
        self.ratio() <= self.critical_ratio
    }

    pub fn can_pickup(&self) -> bool {
        self.current < self.max_health
    }

    pub fn heal(&mut self, amount: f32) {
        let before = self.current;
        self.current = (self.current + amount).clamp(0.0, self.max_health);
        let healed = self.current - before;
        if healed > 0.0 {
            self.events.push(HealthEvent::Healed { amount: healed });
        }
    }

    pub fn take_damage(&mut self, amount: f32, source: DamageSource) {
        if self.invincible {
            return;
        }
        let before = self.current;
        self.current = (self.current - amount).clamp(0.0, self.max_health);
        let dealt = before - self.current;
        if dealt > 0.0 {
            self.events.push(HealthEvent::Damaged {
                amount: dealt,
                source,
            });
        }
        self.handle_death();
    }

    pub fn drain_events(&mut self) -> Vec<HealthEvent> {
        std::mem::take(&mut self.events)
    }

    fn handle_death(&mut self) {
        if self.dead || self.current > 0.0 {
            return;
        }
        self.dead = true;
        log::info!("Avatar died");
        self.events.push(HealthEvent::Died);
    }
}

impl Damageable for Health {
    fn apply_damage(&mut self, amount: f32, source: DamageSource) {
        self.take_damage(amount, source);
    }

    fn kill(&mut self) {
        self.current = 0.0;
        self.events.push(HealthEvent::Damaged {
            amount: self.max_health,
            source: DamageSource::KillPlane,
        });
        self.handle_death();
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}
