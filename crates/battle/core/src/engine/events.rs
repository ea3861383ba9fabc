use super::session::{EncounterOutcome, Phase};
use crate::timing::AttackAttempt;

/// Observable effect of one engine call, in the order it happened.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncounterEvent {
    StateChanged {
        from: Phase,
        to: Phase,
    },
    AttackResolved {
        attempt: AttackAttempt,
    },
    MonsterDamaged {
        damage: u32,
        remaining: i32,
    },
    PlayerHit {
        damage: u32,
        hp: u32,
    },
    ItemUsed {
        item: String,
        healed: u32,
    },
    TextRequested {
        text: String,
    },
    MonsterSpoke {
        text: String,
    },
    Finished {
        outcome: EncounterOutcome,
    },
}
