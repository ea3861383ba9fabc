//! Event payloads for the runtime-owned topics.

use battle_core::{EncounterOutcome, PlayerStats};
use serde::{Deserialize, Serialize};

/// Typewriter progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEvent {
    /// The full string is now visible.
    Completed { text: String },
    /// Reveal was cut short by the player.
    Skipped { text: String },
}

/// Events concerning the caller-owned session around the encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The host merged a stat update.
    StatsChanged { stats: PlayerStats },

    /// Terminal callback fired. `stats` include any win reward.
    Finished {
        outcome: EncounterOutcome,
        stats: PlayerStats,
        turns: u32,
    },
}
