//! Simulation worker that owns the authoritative encounter.
//!
//! Receives commands from [`crate::RuntimeHandle`], drives
//! [`BattleEngine::tick`] on a fixed-rate clock (or on demand in manual
//! mode), and publishes everything that happened to the [`EventBus`].

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

use battle_core::{
    BattleEngine, EncounterEvent, EncounterView, KeyEvent, InputState, PlayerStats, Ports,
};

use crate::api::{EncounterSummary, Result, RuntimeError};
use crate::events::{Event, EventBus, SessionEvent, TextEvent};
use crate::host::SessionHost;
use crate::runtime::ClockMode;
use crate::typewriter::Typewriter;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Raw key transition from the input source.
    Key(KeyEvent),
    /// Run `ticks` ticks immediately. Manual clock only.
    Advance {
        ticks: u32,
        reply: oneshot::Sender<Result<Vec<EncounterEvent>>>,
    },
    /// Read-only view of the encounter.
    Snapshot { reply: oneshot::Sender<EncounterView> },
    /// Current player stats.
    Stats { reply: oneshot::Sender<PlayerStats> },
    /// Resolves once the encounter has ended.
    AwaitOutcome {
        reply: oneshot::Sender<EncounterSummary>,
    },
    /// Stop the worker loop.
    Shutdown,
}

/// Background task that owns the engine and its collaborators.
pub struct SimulationWorker {
    engine: BattleEngine,
    host: SessionHost,
    typewriter: Typewriter,
    input: InputState,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    clock: ClockMode,
    waiters: Vec<oneshot::Sender<EncounterSummary>>,
    summary: Option<EncounterSummary>,
}

impl SimulationWorker {
    pub fn new(
        engine: BattleEngine,
        host: SessionHost,
        typewriter: Typewriter,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        clock: ClockMode,
    ) -> Self {
        info!(
            monster = %engine.profile().name,
            player = %host.stats().name,
            %clock,
            "SimulationWorker initialized"
        );

        Self {
            engine,
            host,
            typewriter,
            input: InputState::new(),
            command_rx,
            event_bus,
            clock,
            waiters: Vec::new(),
            summary: None,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        let tick_ms = u64::from(self.engine.config().tick_ms.max(1));
        let mut interval = tokio::time::interval(Duration::from_millis(tick_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let realtime = self.clock == ClockMode::Realtime;

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                _ = interval.tick(), if realtime && !self.engine.is_finished() => {
                    self.step();
                }
            }
        }
        debug!("SimulationWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Key(event) => {
                trace!(?event, "key");
                self.input.apply(event);
            }
            Command::Advance { ticks, reply } => {
                let result = self.advance(ticks);
                if reply.send(result).is_err() {
                    debug!("Advance reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.engine.view(self.host.stats())).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::Stats { reply } => {
                if reply.send(self.host.stats().clone()).is_err() {
                    debug!("Stats reply channel closed (caller dropped)");
                }
            }
            Command::AwaitOutcome { reply } => match &self.summary {
                Some(summary) => {
                    if reply.send(summary.clone()).is_err() {
                        debug!("AwaitOutcome reply channel closed (caller dropped)");
                    }
                }
                None => self.waiters.push(reply),
            },
            Command::Shutdown => {}
        }
    }

    fn advance(&mut self, ticks: u32) -> Result<Vec<EncounterEvent>> {
        if self.clock != ClockMode::Manual {
            return Err(RuntimeError::ClockMismatch { mode: self.clock });
        }
        let mut events = Vec::new();
        for _ in 0..ticks {
            if self.engine.is_finished() {
                break;
            }
            events.extend(self.step());
        }
        Ok(events)
    }

    /// Runs one engine tick and publishes its effects.
    fn step(&mut self) -> Vec<EncounterEvent> {
        let frame = self.input.take_frame();
        let stats_revision = self.host.revision();

        let events = {
            let mut ports = Ports::new(&mut self.host, &mut self.typewriter);
            self.engine.tick(&frame, &mut ports)
        };
        for event in &events {
            self.event_bus.publish(Event::Encounter(event.clone()));
        }

        if self.host.revision() != stats_revision {
            self.event_bus.publish(Event::Session(SessionEvent::StatsChanged {
                stats: self.host.stats().clone(),
            }));
        }

        let tick_ms = self.engine.config().tick_ms;
        if self.typewriter.advance(tick_ms) {
            self.engine.notify_text_complete();
            let text = self.typewriter.text().to_string();
            let event = if self.typewriter.was_skipped() {
                TextEvent::Skipped { text }
            } else {
                TextEvent::Completed { text }
            };
            self.event_bus.publish(Event::Text(event));
        }

        if self.summary.is_none()
            && let Some(outcome) = self.engine.outcome()
        {
            self.finish(outcome);
        }

        events
    }

    fn finish(&mut self, outcome: battle_core::EncounterOutcome) {
        let summary = EncounterSummary {
            outcome,
            stats: self.host.stats().clone(),
            turns: self.engine.session().turn_count,
        };
        info!(%outcome, turns = summary.turns, "encounter over");

        self.event_bus.publish(Event::Session(SessionEvent::Finished {
            outcome,
            stats: summary.stats.clone(),
            turns: summary.turns,
        }));
        for waiter in self.waiters.drain(..) {
            if waiter.send(summary.clone()).is_err() {
                debug!("AwaitOutcome reply channel closed (caller dropped)");
            }
        }
        self.summary = Some(summary);
    }
}
