//! Content factory for building an encounter from data files.

use std::path::{Path, PathBuf};

use battle_core::{EncounterConfig, MonsterProfile, PlayerStats};

use crate::loaders::{ConfigLoader, LoadResult, MonsterLoader, PlayerLoader};

/// Content factory that loads encounter content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── player.ron
/// └── monsters/
///     └── froggit.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load encounter tuning from `config.toml`, or defaults if the file is absent.
    pub fn load_config(&self) -> LoadResult<EncounterConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config.toml, using defaults");
            return Ok(EncounterConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the starting player from `player.ron`, or the built-in defaults.
    pub fn load_player(&self) -> LoadResult<PlayerStats> {
        let path = self.data_dir.join("player.ron");
        if !path.exists() {
            return Ok(crate::initial_player());
        }
        PlayerLoader::load(&path)
    }

    /// Load a monster from `monsters/{name}.ron`.
    pub fn load_monster(&self, name: &str) -> LoadResult<MonsterProfile> {
        let path = self.monster_path(name);
        MonsterLoader::load(&path)
    }

    /// Names of every profile under `monsters/`, sorted.
    pub fn monster_names(&self) -> LoadResult<Vec<String>> {
        let dir = self.data_dir.join("monsters");
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to list {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn monster_path(&self, name: &str) -> PathBuf {
        self.data_dir.join("monsters").join(format!("{}.ron", name))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
