//! Encounter session data owned by the state machine.

use crate::menu::MenuState;
use crate::timing::AttackAttempt;

/// Coarse phase tag, used for events and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Menu,
    TimingAttack,
    AttackResult,
    ActionText,
    DodgePhase,
    Victory,
    Defeat,
}

/// Why the encounter ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EncounterOutcome {
    MonsterDefeated,
    Spared,
    Fled,
    PlayerDefeated,
}

impl EncounterOutcome {
    pub const fn is_win(self) -> bool {
        !matches!(self, EncounterOutcome::PlayerDefeated)
    }
}

/// Progress through the staged attack resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackResultStage {
    /// Result committed; waiting for the slash (or, on a miss, the conclusion).
    Committed,
    /// Slash on screen; damage not yet applied.
    Slash,
    /// Damage applied to the monster; waiting to conclude.
    Applied,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatState {
    Menu,
    TimingAttack,
    AttackResult {
        attempt: AttackAttempt,
        stage: AttackResultStage,
    },
    ActionText,
    DodgePhase,
    Victory(EncounterOutcome),
    Defeat,
}

impl CombatState {
    pub const fn phase(&self) -> Phase {
        match self {
            CombatState::Menu => Phase::Menu,
            CombatState::TimingAttack => Phase::TimingAttack,
            CombatState::AttackResult { .. } => Phase::AttackResult,
            CombatState::ActionText => Phase::ActionText,
            CombatState::DodgePhase => Phase::DodgePhase,
            CombatState::Victory(_) => Phase::Victory,
            CombatState::Defeat => Phase::Defeat,
        }
    }
}

/// Mutable encounter data. Changed only by [`super::BattleEngine`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSession {
    pub state: CombatState,
    /// Completed-or-running dodge phases.
    pub turn_count: u32,
    /// May go negative; defeat is `<= 0`.
    pub monster_hp: i32,
    /// Menu cursor. Kept across phases so the last category stays selected.
    pub menu: MenuState,
    pub is_spareable: bool,
    pub flavor_text: String,
    /// Monster speech bubble, shown at the root menu.
    pub pending_dialogue: Option<String>,
}

impl BattleSession {
    pub fn new(monster_hp: i32, flavor_text: impl Into<String>) -> Self {
        Self {
            state: CombatState::Menu,
            turn_count: 0,
            monster_hp,
            menu: MenuState::default(),
            is_spareable: false,
            flavor_text: flavor_text.into(),
            pending_dialogue: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }
}
