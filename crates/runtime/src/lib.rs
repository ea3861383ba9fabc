//! Async orchestration for a single encounter.
//!
//! A background simulation worker owns the [`battle_core::BattleEngine`],
//! the player stats host, and the typewriter. Clients drive it through a
//! cloneable [`RuntimeHandle`] and observe it through the topic-based
//! [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`host`] and [`typewriter`] are the caller-side collaborators the engine talks to
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod host;
pub mod runtime;
pub mod typewriter;

mod workers;

pub use api::{EncounterSummary, Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, SessionEvent, TextEvent, Topic};
pub use host::{SessionHost, WinReward};
pub use runtime::{ClockMode, Runtime, RuntimeBuilder, RuntimeConfig};
pub use typewriter::Typewriter;
