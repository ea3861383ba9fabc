//! Deterministic encounter rules for a single turn-based battle.
//!
//! `battle-core` owns the combat state machine and the two real-time
//! minigames embedded in it: the attack timing bar and the projectile dodge
//! phase. It never owns player stats and never performs I/O; the caller
//! provides both through [`Ports`]. All state mutation flows through
//! [`engine::BattleEngine`], one [`engine::BattleEngine::tick`] at a time.
pub mod avatar;
pub mod collision;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod geometry;
pub mod input;
pub mod menu;
pub mod ports;
pub mod profile;
pub mod rng;
pub mod schedule;
pub mod stats;
pub mod timing;

pub use avatar::Avatar;
pub use collision::{CollisionResolver, HitReport};
pub use config::{EncounterConfig, RisingSwarmConfig, SideSweepConfig};
pub use engine::{
    AttackResultStage, BattleEngine, BattleSession, CombatState, DamageDisplay, EncounterEvent,
    EncounterOutcome, EncounterView, Phase,
};
pub use error::{ConfigError, ProfileError, SetupError};
pub use field::{
    FieldStatus, Projectile, ProjectileField, ProjectileId, RisingSwarm, SideSweep, Spawn,
    SpawnContext, SpawnPattern,
};
pub use geometry::{Arena, Rect, Vec2};
pub use input::{InputFrame, InputState, Key, KeyEvent, KeySet};
pub use menu::{Category, MenuContext, MenuState};
pub use ports::{EncounterHost, NullDisplay, Ports, TextDisplay};
pub use profile::{ActChoice, MonsterProfile};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use schedule::{Scheduler, TimerId};
pub use stats::{PlayerStats, StatsPatch};
pub use timing::{AttackAttempt, AttackOutcome, TimingBar, damage_for, precision_at};
