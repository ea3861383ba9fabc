//! Projectile field simulator for the dodge phase.
//!
//! The field owns every live projectile for the lifetime of one dodge phase.
//! Each frame it evaluates the spawn patterns, advances all projectiles by
//! their velocity, and culls those that left the arena by more than the
//! cull margin. The set is cleared when a phase begins and when it ends.

mod patterns;

use std::fmt;

pub use patterns::{RisingSwarm, SideSweep, Spawn, SpawnContext, SpawnPattern};

use crate::config::EncounterConfig;
use crate::geometry::{Arena, Rect, Vec2};
use crate::rng::RngOracle;

/// Identity of a projectile within an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projectile {
    pub id: ProjectileId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
}

impl Projectile {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }
}

/// Whether the field has frames left in its budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldStatus {
    Running,
    Exhausted,
}

pub struct ProjectileField {
    arena: Arena,
    cull_margin: f32,
    frame_budget: u32,
    frame: u32,
    next_id: u32,
    patterns: Vec<Box<dyn SpawnPattern>>,
    projectiles: Vec<Projectile>,
}

impl ProjectileField {
    pub fn new(
        arena: Arena,
        cull_margin: f32,
        frame_budget: u32,
        patterns: Vec<Box<dyn SpawnPattern>>,
    ) -> Self {
        Self {
            arena,
            cull_margin,
            frame_budget,
            frame: 0,
            next_id: 0,
            patterns,
            projectiles: Vec::new(),
        }
    }

    /// Field with the two stock patterns configured by `config`.
    pub fn from_config(config: &EncounterConfig) -> Self {
        Self::new(
            config.dodge_arena,
            config.cull_margin,
            config.dodge_frames,
            vec![
                Box::new(RisingSwarm::new(config.rising_swarm.clone())),
                Box::new(SideSweep::new(config.side_sweep.clone())),
            ],
        )
    }

    pub fn set_patterns(&mut self, patterns: Vec<Box<dyn SpawnPattern>>) {
        self.patterns = patterns;
    }

    /// Clears live projectiles and rewinds the frame counter.
    pub fn reset(&mut self) {
        self.projectiles.clear();
        self.frame = 0;
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
    }

    /// Runs one frame: spawn, advance, cull.
    pub fn step(&mut self, rng: &dyn RngOracle, seed: u64, turn: u32) -> FieldStatus {
        if self.frame >= self.frame_budget {
            return FieldStatus::Exhausted;
        }

        let ctx = SpawnContext {
            frame: self.frame,
            turn,
            seed,
            arena: self.arena,
            rng,
        };
        for pattern in &self.patterns {
            if let Some(spawn) = pattern.spawn(&ctx) {
                let id = ProjectileId(self.next_id);
                self.next_id = self.next_id.wrapping_add(1);
                tracing::trace!(pattern = pattern.name(), frame = self.frame, ?id, "spawn");
                self.projectiles.push(Projectile {
                    id,
                    position: spawn.position,
                    velocity: spawn.velocity,
                    size: spawn.size,
                });
            }
        }

        for projectile in &mut self.projectiles {
            projectile.position += projectile.velocity;
        }
        let arena = self.arena;
        let margin = self.cull_margin;
        self.projectiles
            .retain(|projectile| arena.retains(&projectile.bounds(), margin));

        self.frame += 1;
        if self.frame >= self.frame_budget {
            FieldStatus::Exhausted
        } else {
            FieldStatus::Running
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }
}

impl fmt::Debug for ProjectileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectileField")
            .field("frame", &self.frame)
            .field("frame_budget", &self.frame_budget)
            .field(
                "patterns",
                &self.patterns.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("projectiles", &self.projectiles.len())
            .finish()
    }
}
