//! Client configuration read from the process environment.
use std::env;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use battle_content::DEFAULT_MONSTER;
use runtime::{RuntimeConfig, Typewriter};

/// Everything the composition root needs before content is loaded.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub seed: u64,
    pub data_dir: PathBuf,
    pub monster: String,
    pub ms_per_char: u32,
    pub event_buffer: usize,
    pub session_id: Option<String>,
    /// Synthetic key-up delay for terminals that only report presses.
    pub key_release_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            data_dir: PathBuf::from("data"),
            monster: DEFAULT_MONSTER.to_string(),
            ms_per_char: Typewriter::DEFAULT_MS_PER_CHAR,
            event_buffer: RuntimeConfig::default().event_buffer_size,
            session_id: None,
            key_release_ms: 150,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ENCOUNTER_SEED` - Seed for spawns and speech (default: clock-derived)
    /// - `ENCOUNTER_DATA_DIR` - Content directory (default: next to the binary, then `./data`)
    /// - `ENCOUNTER_MONSTER` - Monster profile name (default: `froggit`)
    /// - `TYPEWRITER_MS_PER_CHAR` - Text reveal speed (default: 30)
    /// - `ENCOUNTER_EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    /// - `GAME_SESSION_ID` - Log session name (default: auto-generated)
    /// - `CLIENT_KEY_RELEASE_MS` - Synthetic key-up delay (default: 150)
    pub fn from_env() -> Self {
        let mut config = Self {
            seed: read_env::<u64>("ENCOUNTER_SEED").unwrap_or_else(clock_seed),
            ..Self::default()
        };

        let explicit = env::var("ENCOUNTER_DATA_DIR").ok().map(PathBuf::from);
        config.data_dir = resolve_data_dir(explicit, &default_data_dirs());

        if let Ok(monster) = env::var("ENCOUNTER_MONSTER")
            && !monster.trim().is_empty()
        {
            config.monster = monster.trim().to_string();
        }

        if let Some(ms) = read_env::<u32>("TYPEWRITER_MS_PER_CHAR") {
            config.ms_per_char = ms;
        }

        if let Some(capacity) = read_env::<usize>("ENCOUNTER_EVENT_BUFFER") {
            config.event_buffer = capacity.max(1);
        }

        config.session_id = env::var("GAME_SESSION_ID").ok();

        if let Some(ms) = read_env::<u64>("CLIENT_KEY_RELEASE_MS") {
            config.key_release_ms = ms.max(1);
        }

        config
    }

    /// Runtime settings derived from this config and the loaded tuning.
    pub fn runtime_config(&self, encounter: battle_core::EncounterConfig) -> RuntimeConfig {
        RuntimeConfig {
            encounter,
            seed: self.seed,
            ms_per_char: self.ms_per_char,
            event_buffer_size: self.event_buffer,
            ..RuntimeConfig::default()
        }
    }
}

/// First existing directory wins. An explicit path is always taken as-is so
/// a typo surfaces as a load error instead of silently using other content.
fn resolve_data_dir(explicit: Option<PathBuf>, candidates: &[PathBuf]) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    candidates
        .iter()
        .find(|dir| dir.is_dir())
        .cloned()
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn default_data_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(exe) = env::current_exe()
        && let Some(parent) = exe.parent()
    {
        dirs.push(parent.join("data"));
    }
    dirs.push(Path::new(env!("CARGO_MANIFEST_DIR")).join("../battle/content/data"));
    dirs.push(PathBuf::from("data"));
    dirs
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
