//! Data-driven encounter content and loaders.
//!
//! Monster profiles and the starting player are RON files; encounter tuning
//! is TOML. All loaders deserialize straight into `battle-core` types.
//!
//! Without the `loaders` feature only the built-in defaults are available.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, MonsterLoader, PlayerLoader};

use battle_core::{MonsterProfile, PlayerStats};

/// Monster fought when no profile file is selected.
pub const DEFAULT_MONSTER: &str = "froggit";

/// Starting stats used by the stock client.
pub fn initial_player() -> PlayerStats {
    PlayerStats::new("Frisk", 20).with_items(["Butterscotch Pie"])
}

/// Built-in profile matching `data/monsters/froggit.ron`.
pub fn default_monster() -> MonsterProfile {
    MonsterProfile::froggit()
}
