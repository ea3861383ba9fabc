//! Caller-side owner of the player stats.

use battle_core::{EncounterHost, PlayerStats, StatsPatch};
use serde::{Deserialize, Serialize};

/// Stats granted when the encounter is won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinReward {
    pub exp: u32,
    pub gold: u32,
}

impl Default for WinReward {
    fn default() -> Self {
        Self { exp: 10, gold: 20 }
    }
}

/// Authoritative player stats for one session.
///
/// Terminal callbacks are only recorded; the simulation worker reports them
/// on the event bus after the engine call returns.
#[derive(Debug, Clone)]
pub struct SessionHost {
    stats: PlayerStats,
    reward: WinReward,
    wins: u32,
    losses: u32,
    revision: u64,
}

impl SessionHost {
    pub fn new(stats: PlayerStats, reward: WinReward) -> Self {
        Self {
            stats,
            reward,
            wins: 0,
            losses: 0,
            revision: 0,
        }
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    /// Bumped on every merge; lets callers detect stat changes cheaply.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl EncounterHost for SessionHost {
    fn player_stats(&self) -> &PlayerStats {
        &self.stats
    }

    fn update_stats(&mut self, patch: StatsPatch) {
        tracing::debug!(?patch, "merging stat update");
        self.stats.merge(patch);
        self.revision += 1;
    }

    fn on_win(&mut self) {
        self.wins += 1;
        let patch = StatsPatch {
            exp: Some(self.stats.exp.saturating_add(self.reward.exp)),
            gold: Some(self.stats.gold.saturating_add(self.reward.gold)),
            ..StatsPatch::default()
        };
        self.update_stats(patch);
    }

    fn on_lose(&mut self) {
        self.losses += 1;
    }
}
