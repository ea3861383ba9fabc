//! Pluggable spawn rules for the dodge phase.

use crate::config::{RisingSwarmConfig, SideSweepConfig};
use crate::geometry::{Arena, Vec2};
use crate::rng::{RngOracle, compute_seed, context};

/// Inputs available to a pattern when deciding whether to spawn.
pub struct SpawnContext<'a> {
    pub frame: u32,
    pub turn: u32,
    pub seed: u64,
    pub arena: Arena,
    pub rng: &'a dyn RngOracle,
}

impl SpawnContext<'_> {
    /// Uniform roll in `[0, 1)` unique to this frame and `roll_context`.
    pub fn roll(&self, roll_context: u32) -> f32 {
        self.rng
            .unit(compute_seed(self.seed, self.turn, self.frame, roll_context))
    }
}

/// A projectile a pattern wants added to the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spawn {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
}

/// Spawn rule evaluated once per frame. Patterns are independent and may
/// fire on the same frame.
pub trait SpawnPattern: Send + Sync {
    fn name(&self) -> &'static str;

    fn spawn(&self, ctx: &SpawnContext<'_>) -> Option<Spawn>;
}

/// Rises from the floor at a random column with slight horizontal drift.
#[derive(Clone, Debug, PartialEq)]
pub struct RisingSwarm {
    config: RisingSwarmConfig,
}

impl RisingSwarm {
    pub fn new(config: RisingSwarmConfig) -> Self {
        Self { config }
    }
}

impl SpawnPattern for RisingSwarm {
    fn name(&self) -> &'static str {
        "rising_swarm"
    }

    fn spawn(&self, ctx: &SpawnContext<'_>) -> Option<Spawn> {
        let cfg = &self.config;
        if cfg.period == 0 || ctx.frame % cfg.period != 0 {
            return None;
        }
        let span = (ctx.arena.width - cfg.edge_padding).max(0.0);
        let x = ctx.roll(context::SWARM_X) * span;
        let vx = (ctx.roll(context::SWARM_DRIFT) - 0.5) * cfg.drift;
        Some(Spawn {
            position: Vec2::new(x, ctx.arena.height),
            velocity: Vec2::new(vx, -cfg.speed),
            size: Vec2::new(cfg.size, cfg.size),
        })
    }
}

/// Sweeps in from the left wall on a coin flip.
#[derive(Clone, Debug, PartialEq)]
pub struct SideSweep {
    config: SideSweepConfig,
}

impl SideSweep {
    pub fn new(config: SideSweepConfig) -> Self {
        Self { config }
    }
}

impl SpawnPattern for SideSweep {
    fn name(&self) -> &'static str {
        "side_sweep"
    }

    fn spawn(&self, ctx: &SpawnContext<'_>) -> Option<Spawn> {
        let cfg = &self.config;
        if cfg.period == 0 || ctx.frame % cfg.period != 0 {
            return None;
        }
        if ctx.roll(context::SWEEP_GATE) <= cfg.gate {
            return None;
        }
        let span = (ctx.arena.height - cfg.edge_padding).max(0.0);
        let y = ctx.roll(context::SWEEP_Y) * span;
        Some(Spawn {
            position: Vec2::new(0.0, y),
            velocity: Vec2::new(cfg.speed, 0.0),
            size: Vec2::new(cfg.size, cfg.size),
        })
    }
}
