//! Encounter tuning loader.

use std::path::Path;

use battle_core::EncounterConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for encounter tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate an [`EncounterConfig`]. Missing keys keep their
    /// defaults.
    pub fn load(path: &Path) -> LoadResult<EncounterConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EncounterConfig> {
        let config: EncounterConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid encounter config: {}", e))?;
        Ok(config)
    }
}
