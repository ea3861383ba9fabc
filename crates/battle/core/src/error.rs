//! Construction-time validation errors.
//!
//! Encounter operations themselves never fail: indices clamp, empty lists
//! degrade to no-ops, and the only terminal conditions are the designed
//! outcomes. The errors here guard the inputs an engine is built from.

/// Invalid tuning parameter in [`crate::EncounterConfig`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("arena {width}x{height} cannot contain an avatar of size {avatar}")]
    ArenaTooSmall { width: f32, height: f32, avatar: f32 },

    #[error("hitbox inset {inset} leaves no hitbox inside avatar of size {avatar}")]
    HitboxInset { inset: f32, avatar: f32 },

    #[error("{field} must be within [0, 1] (got {value})")]
    Probability { field: &'static str, value: f32 },
}

/// Invalid monster profile.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("monster name must not be empty")]
    EmptyName,

    #[error("monster max hp must be greater than zero")]
    ZeroHp,

    #[error("monster defines {count} act choices (maximum {max})")]
    TooManyActChoices { count: usize, max: usize },

    #[error("monster defines no act choices")]
    NoActChoices,
}

/// Reasons a [`crate::BattleEngine`] cannot be built.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SetupError {
    #[error("invalid encounter config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid monster profile: {0}")]
    Profile(#[from] ProfileError),
}
