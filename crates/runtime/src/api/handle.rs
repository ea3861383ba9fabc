//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! feeding keys, stepping a manual clock, and streaming events.
use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{EncounterEvent, EncounterOutcome, EncounterView, Key, KeyEvent, PlayerStats};
use serde::{Deserialize, Serialize};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// How an encounter ended and what the player walked away with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSummary {
    pub outcome: EncounterOutcome,
    pub stats: PlayerStats,
    pub turns: u32,
}

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    pub async fn key_down(&self, key: Key) -> Result<()> {
        self.send(Command::Key(KeyEvent::Down(key))).await
    }

    pub async fn key_up(&self, key: Key) -> Result<()> {
        self.send(Command::Key(KeyEvent::Up(key))).await
    }

    /// Key down immediately followed by key up. The edge still registers.
    pub async fn press(&self, key: Key) -> Result<()> {
        self.key_down(key).await?;
        self.key_up(key).await
    }

    /// Run `ticks` ticks now and return the engine events they produced.
    ///
    /// Only valid with [`crate::ClockMode::Manual`].
    pub async fn advance(&self, ticks: u32) -> Result<Vec<EncounterEvent>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Advance {
            ticks,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Query the current encounter view (read-only snapshot)
    pub async fn snapshot(&self) -> Result<EncounterView> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Snapshot { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub async fn stats(&self) -> Result<PlayerStats> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Stats { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Waits until the encounter ends. Returns immediately if it already has.
    pub async fn wait_finished(&self) -> Result<EncounterSummary> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::AwaitOutcome { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Asks the worker to stop. Later commands fail with
    /// [`RuntimeError::CommandChannelClosed`].
    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Encounter` - Engine transitions, attacks, hits, text requests
    /// - `Topic::Text` - Typewriter completion
    /// - `Topic::Session` - Stat changes and the final outcome
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }
}
