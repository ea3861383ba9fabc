//! Player stats as seen by the encounter.
//!
//! The encounter never holds the authoritative copy. It reads a snapshot
//! through [`crate::EncounterHost::player_stats`] and requests changes as a
//! [`StatsPatch`], which the host merges field by field.

/// Player stats snapshot supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerStats {
    pub name: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub exp: u32,
    pub gold: u32,
    pub items: Vec<String>,
}

impl PlayerStats {
    pub fn new(name: impl Into<String>, max_hp: u32) -> Self {
        Self {
            name: name.into(),
            level: 1,
            hp: max_hp,
            max_hp,
            exp: 0,
            gold: 0,
            items: Vec::new(),
        }
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp.min(self.max_hp);
        self
    }

    /// Merges a partial update, then restores `hp <= max_hp`.
    pub fn merge(&mut self, patch: StatsPatch) {
        let StatsPatch {
            hp,
            max_hp,
            exp,
            gold,
            items,
        } = patch;

        if let Some(max_hp) = max_hp {
            self.max_hp = max_hp;
        }
        if let Some(hp) = hp {
            self.hp = hp;
        }
        if let Some(exp) = exp {
            self.exp = exp;
        }
        if let Some(gold) = gold {
            self.gold = gold;
        }
        if let Some(items) = items {
            self.items = items;
        }
        self.hp = self.hp.min(self.max_hp);
    }
}

/// Partial, merge-style update to [`PlayerStats`]. `None` leaves a field as is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsPatch {
    pub hp: Option<u32>,
    pub max_hp: Option<u32>,
    pub exp: Option<u32>,
    pub gold: Option<u32>,
    pub items: Option<Vec<String>>,
}

impl StatsPatch {
    pub fn hp(hp: u32) -> Self {
        Self {
            hp: Some(hp),
            ..Self::default()
        }
    }

    pub fn with_items(mut self, items: Vec<String>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_only_touches_present_fields() {
        let mut stats = PlayerStats::new("Frisk", 20).with_items(["Pie"]);
        stats.merge(StatsPatch {
            gold: Some(20),
            ..StatsPatch::default()
        });
        assert_eq!(stats.gold, 20);
        assert_eq!(stats.hp, 20);
        assert_eq!(stats.items, vec!["Pie".to_string()]);
    }

    #[test]
    fn merge_clamps_hp_to_max() {
        let mut stats = PlayerStats::new("Frisk", 20).with_hp(5);
        stats.merge(StatsPatch::hp(99));
        assert_eq!(stats.hp, 20);

        stats.merge(StatsPatch {
            max_hp: Some(12),
            ..StatsPatch::default()
        });
        assert_eq!(stats.hp, 12);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(StatsPatch::default().is_empty());
        assert!(!StatsPatch::hp(0).is_empty());
    }
}
