//! Starting player stats loader.

use std::path::Path;

use battle_core::PlayerStats;

use crate::loaders::{LoadResult, read_file};

pub struct PlayerLoader;

impl PlayerLoader {
    pub fn load(path: &Path) -> LoadResult<PlayerStats> {
        let content = read_file(path)?;
        let mut stats: PlayerStats = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse player RON: {}", e))?;
        stats.hp = stats.hp.min(stats.max_hp);
        Ok(stats)
    }
}
