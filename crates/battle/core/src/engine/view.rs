//! Read-only snapshot for presentation layers.

use std::fmt;

use super::session::{EncounterOutcome, Phase};
use crate::field::Projectile;
use crate::geometry::{Arena, Rect};
use crate::menu::MenuState;

/// Damage label shown after an attack. A miss is never rendered as `0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageDisplay {
    Miss,
    Damage(u32),
}

impl fmt::Display for DamageDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DamageDisplay::Miss => f.write_str("MISS"),
            DamageDisplay::Damage(amount) => write!(f, "{amount}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterView {
    pub phase: Phase,
    pub turn: u32,
    pub menu: MenuState,
    pub arena: Arena,

    pub monster_name: String,
    pub monster_hp: i32,
    pub monster_max_hp: i32,
    pub spareable: bool,

    pub player_name: String,
    pub player_level: u32,
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub items: Vec<String>,
    /// Act submenu labels in order.
    pub act_labels: Vec<String>,

    pub flavor_text: String,
    pub text_revealed: bool,
    pub dialogue: Option<String>,

    /// Timing bar cursor while the bar is on screen.
    pub bar_position: Option<f32>,
    pub bar_width: f32,
    pub slash_visible: bool,
    pub damage: Option<DamageDisplay>,

    /// Avatar sprite bounds during the dodge phase.
    pub avatar: Option<Rect>,
    pub avatar_dimmed: bool,
    pub projectiles: Vec<Projectile>,

    pub outcome: Option<EncounterOutcome>,
}
