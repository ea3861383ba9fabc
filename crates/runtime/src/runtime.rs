//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to run an encounter.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use battle_core::{
    BattleEngine, EncounterConfig, MonsterProfile, PcgRng, PlayerStats, RngOracle, SpawnPattern,
};

use crate::api::{EncounterSummary, Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::host::{SessionHost, WinReward};
use crate::typewriter::Typewriter;
use crate::workers::SimulationWorker;

/// Where ticks come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ClockMode {
    /// A `tokio::time::interval` of `tick_ms`.
    #[default]
    Realtime,
    /// Only [`RuntimeHandle::advance`] moves time.
    Manual,
}

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub encounter: EncounterConfig,
    pub seed: u64,
    pub ms_per_char: u32,
    pub reward: WinReward,
    pub clock: ClockMode,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            encounter: EncounterConfig::default(),
            seed: 0,
            ms_per_char: Typewriter::DEFAULT_MS_PER_CHAR,
            reward: WinReward::default(),
            clock: ClockMode::Realtime,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that hosts one encounter.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Waits for the encounter to end.
    pub async fn run_until_finished(&self) -> Result<EncounterSummary> {
        self.handle.wait_finished().await
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        if self.handle.shutdown().await.is_err() {
            tracing::debug!("simulation worker already stopped");
        }
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    profile: Option<MonsterProfile>,
    player: Option<PlayerStats>,
    rng: Option<Box<dyn RngOracle>>,
    patterns: Option<Vec<Box<dyn SpawnPattern>>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            profile: None,
            player: None,
            rng: None,
            patterns: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: ClockMode) -> Self {
        self.config.clock = clock;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Monster to fight. Defaults to the built-in profile.
    pub fn monster(mut self, profile: MonsterProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Starting player stats. Defaults to the built-in player.
    pub fn player(mut self, stats: PlayerStats) -> Self {
        self.player = Some(stats);
        self
    }

    /// Random source for spawns and speech. Defaults to [`PcgRng`].
    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Replace the dodge phase spawn rules.
    pub fn patterns(mut self, patterns: Vec<Box<dyn SpawnPattern>>) -> Self {
        self.patterns = Some(patterns);
        self
    }

    /// Validates the encounter and spawns the simulation worker.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        let RuntimeConfig {
            encounter,
            seed,
            ms_per_char,
            reward,
            clock,
            event_buffer_size,
            command_buffer_size,
        } = self.config;

        let profile = self.profile.unwrap_or_else(battle_content::default_monster);
        let player = self.player.unwrap_or_else(battle_content::initial_player);
        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(PcgRng) as Box<dyn RngOracle>);

        let mut engine = BattleEngine::new(encounter, profile, rng, seed)?;
        if let Some(patterns) = self.patterns {
            engine = engine.with_patterns(patterns);
        }

        let event_bus = EventBus::with_capacity(event_buffer_size);
        let (command_tx, command_rx) = mpsc::channel(command_buffer_size.max(1));

        let worker = SimulationWorker::new(
            engine,
            SessionHost::new(player, reward),
            Typewriter::new(ms_per_char),
            command_rx,
            event_bus.clone(),
            clock,
        );
        let sim_worker_handle = tokio::spawn(worker.run());

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            sim_worker_handle,
        })
    }
}
