//! Caller-owned collaborators the engine talks to.
//!
//! The engine never owns player stats or text presentation. Each tick it is
//! handed a [`Ports`] bundle borrowing the caller's implementations.

use crate::stats::{PlayerStats, StatsPatch};

/// Owner of the authoritative player stats and the terminal callbacks.
pub trait EncounterHost {
    /// Current stats snapshot. Re-read after every [`update_stats`] call.
    ///
    /// [`update_stats`]: EncounterHost::update_stats
    fn player_stats(&self) -> &PlayerStats;

    /// Merge-style stat update request.
    fn update_stats(&mut self, patch: StatsPatch);

    /// Monster defeated, spared, or fled from. Called at most once.
    fn on_win(&mut self);

    /// Player hp reached zero. Called at most once.
    fn on_lose(&mut self);
}

/// Text reveal collaborator.
///
/// Completion is reported back through
/// [`BattleEngine::notify_text_complete`](crate::BattleEngine::notify_text_complete).
pub trait TextDisplay {
    /// Starts revealing `text`, resetting any reveal in progress.
    fn request(&mut self, text: &str);

    /// Reveals the current text immediately.
    fn skip(&mut self);
}

/// Display that ignores every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDisplay;

impl TextDisplay for NullDisplay {
    fn request(&mut self, _text: &str) {}

    fn skip(&mut self) {}
}

/// Collaborators borrowed for the duration of one engine call.
pub struct Ports<'a> {
    pub host: &'a mut dyn EncounterHost,
    pub text: &'a mut dyn TextDisplay,
}

impl<'a> Ports<'a> {
    pub fn new(host: &'a mut dyn EncounterHost, text: &'a mut dyn TextDisplay) -> Self {
        Self { host, text }
    }
}
