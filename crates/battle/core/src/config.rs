//! Encounter tuning constants and tunable parameters.

use crate::error::ConfigError;
use crate::geometry::Arena;

/// Tuning for one encounter.
///
/// Durations are in milliseconds of simulated time; the engine converts them
/// to ticks of [`EncounterConfig::tick_ms`]. Frame counts are in ticks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncounterConfig {
    /// Length of one simulation tick.
    pub tick_ms: u32,

    // ===== timing bar =====
    pub bar_width: f32,
    pub bar_duration_ms: u32,

    // ===== attack result sequencing =====
    /// Pause between committing a hit and showing the slash.
    pub slash_delay_ms: u32,
    /// Slash display time before damage lands on the monster.
    pub damage_delay_ms: u32,
    /// Pause after damage (or a miss) before the turn continues.
    pub conclude_delay_ms: u32,

    // ===== dodge phase =====
    pub dodge_warmup_ms: u32,
    pub dodge_frames: u32,
    pub menu_arena: Arena,
    pub dodge_arena: Arena,
    pub avatar_size: f32,
    pub avatar_speed: f32,
    /// Distance from each sprite edge to the hitbox edge.
    pub hitbox_inset: f32,
    pub hit_damage: u32,
    pub invulnerability_frames: u32,
    /// Projectiles further than this outside the arena are culled.
    pub cull_margin: f32,
    pub rising_swarm: RisingSwarmConfig,
    pub side_sweep: SideSweepConfig,

    // ===== menu actions =====
    pub heal_amount: u32,
    /// Spare succeeds unconditionally while monster hp is strictly below this.
    pub spare_hp_threshold: i32,
    /// Chance that the monster speaks when the root menu is shown.
    pub speech_chance: f32,
}

/// Projectiles rising from the arena floor with slight horizontal drift.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RisingSwarmConfig {
    pub period: u32,
    pub speed: f32,
    /// Total width of the uniform horizontal drift range, centred on zero.
    pub drift: f32,
    pub size: f32,
    /// Right-hand spawn exclusion so projectiles start fully inside.
    pub edge_padding: f32,
}

/// Projectiles sweeping in from the left wall, gated by a coin flip.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SideSweepConfig {
    pub period: u32,
    /// A spawn happens when the roll is strictly above this value.
    pub gate: f32,
    pub speed: f32,
    pub size: f32,
    pub edge_padding: f32,
}

impl EncounterConfig {
    pub const DEFAULT_TICK_MS: u32 = 16;
    pub const DEFAULT_BAR_WIDTH: f32 = 560.0;
    pub const DEFAULT_BAR_DURATION_MS: u32 = 1500;
    pub const DEFAULT_DODGE_FRAMES: u32 = 250;
    pub const DEFAULT_AVATAR_SIZE: f32 = 16.0;

    pub fn new() -> Self {
        Self {
            tick_ms: Self::DEFAULT_TICK_MS,
            bar_width: Self::DEFAULT_BAR_WIDTH,
            bar_duration_ms: Self::DEFAULT_BAR_DURATION_MS,
            slash_delay_ms: 200,
            damage_delay_ms: 500,
            conclude_delay_ms: 1000,
            dodge_warmup_ms: 500,
            dodge_frames: Self::DEFAULT_DODGE_FRAMES,
            menu_arena: Arena::new(570.0, 140.0),
            dodge_arena: Arena::new(240.0, 240.0),
            avatar_size: Self::DEFAULT_AVATAR_SIZE,
            avatar_speed: 4.0,
            hitbox_inset: 5.0,
            hit_damage: 3,
            invulnerability_frames: 60,
            cull_margin: 20.0,
            rising_swarm: RisingSwarmConfig::default(),
            side_sweep: SideSweepConfig::default(),
            heal_amount: 10,
            spare_hp_threshold: 5,
            speech_chance: 0.7,
        }
    }

    /// Converts a millisecond delay into whole ticks, never less than one.
    pub fn ticks_for(&self, ms: u32) -> u64 {
        let tick = self.tick_ms.max(1) as u64;
        (ms as u64).div_ceil(tick).max(1)
    }

    /// Checks every parameter the engine divides by or clamps against.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("tick_ms", self.tick_ms as f32),
            ("bar_width", self.bar_width),
            ("bar_duration_ms", self.bar_duration_ms as f32),
            ("dodge_frames", self.dodge_frames as f32),
            ("avatar_size", self.avatar_size),
            ("rising_swarm.period", self.rising_swarm.period as f32),
            ("side_sweep.period", self.side_sweep.period as f32),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::Zero { field });
            }
        }

        for arena in [self.menu_arena, self.dodge_arena] {
            if arena.width < self.avatar_size || arena.height < self.avatar_size {
                return Err(ConfigError::ArenaTooSmall {
                    width: arena.width,
                    height: arena.height,
                    avatar: self.avatar_size,
                });
            }
        }

        if self.hitbox_inset < 0.0 || self.hitbox_inset * 2.0 >= self.avatar_size {
            return Err(ConfigError::HitboxInset {
                inset: self.hitbox_inset,
                avatar: self.avatar_size,
            });
        }

        for (field, value) in [
            ("speech_chance", self.speech_chance),
            ("side_sweep.gate", self.side_sweep.gate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { field, value });
            }
        }

        Ok(())
    }
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for RisingSwarmConfig {
    fn default() -> Self {
        Self {
            period: 45,
            speed: 2.5,
            drift: 1.0,
            size: 6.0,
            edge_padding: 20.0,
        }
    }
}

impl Default for SideSweepConfig {
    fn default() -> Self {
        Self {
            period: 60,
            gate: 0.5,
            speed: 2.0,
            size: 8.0,
            edge_padding: 40.0,
        }
    }
}
