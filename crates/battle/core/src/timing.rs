//! Attack timing bar.
//!
//! # Formula
//!
//! ```text
//! precision = clamp(1 - |position - width/2| / (width/2), 0, 1)
//! damage    = precision > 0 ? floor(15 * precision + 5) : 0
//! ```
//!
//! Dead centre deals 20, either extreme deals 0 (a miss). The bar makes a
//! single left-to-right pass; if it completes without a confirm it samples
//! at `width`, which is always a miss.

/// Normalized accuracy for a bar sample.
pub fn precision_at(bar_position: f32, width: f32) -> f32 {
    let half = width / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    (1.0 - (bar_position - half).abs() / half).clamp(0.0, 1.0)
}

/// Damage dealt for a given precision.
pub fn damage_for(precision: f32) -> u32 {
    if precision > 0.0 {
        (15.0 * precision + 5.0).floor() as u32
    } else {
        0
    }
}

/// Whether an attack connected. A miss is distinct from any numeric hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    Miss,
    Hit { damage: u32 },
}

/// One sampled bar press. Consumed once by the attack resolution sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackAttempt {
    pub bar_position: f32,
    pub precision: f32,
    pub damage: u32,
}

impl AttackAttempt {
    pub fn sample(bar_position: f32, width: f32) -> Self {
        let bar_position = bar_position.clamp(0.0, width);
        let precision = precision_at(bar_position, width);
        Self {
            bar_position,
            precision,
            damage: damage_for(precision),
        }
    }

    pub fn outcome(&self) -> AttackOutcome {
        if self.damage == 0 {
            AttackOutcome::Miss
        } else {
            AttackOutcome::Hit {
                damage: self.damage,
            }
        }
    }
}

/// Drives the bar across one pass and captures the player's press.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingBar {
    width: f32,
    duration_ms: u32,
    elapsed_ms: u32,
    position: f32,
    active: bool,
}

impl TimingBar {
    pub fn new(width: f32, duration_ms: u32) -> Self {
        Self {
            width,
            duration_ms: duration_ms.max(1),
            elapsed_ms: 0,
            position: 0.0,
            active: false,
        }
    }

    pub fn start(&mut self) {
        self.elapsed_ms = 0;
        self.position = 0.0;
        self.active = true;
    }

    /// Advances the pass. Returns the automatic miss once the pass completes.
    pub fn advance(&mut self, dt_ms: u32) -> Option<AttackAttempt> {
        if !self.active {
            return None;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        let progress = self.progress();
        if progress >= 1.0 {
            self.active = false;
            self.position = self.width;
            return Some(self.sample());
        }
        self.position = progress * self.width;
        None
    }

    /// Samples the current position. `None` if the bar is not running.
    pub fn confirm(&mut self) -> Option<AttackAttempt> {
        if !self.active {
            return None;
        }
        self.active = false;
        Some(self.sample())
    }

    /// Attempt for the cursor's current position, without stopping the bar.
    pub fn sample(&self) -> AttackAttempt {
        AttackAttempt::sample(self.position, self.width)
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn progress(&self) -> f32 {
        self.elapsed_ms as f32 / self.duration_ms as f32
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
