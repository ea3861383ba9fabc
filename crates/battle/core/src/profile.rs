//! Adversary definition: identity, hit points, and the lines it reacts with.

use arrayvec::ArrayVec;

use crate::error::ProfileError;

/// Upper bound on act submenu entries.
pub const MAX_ACT_CHOICES: usize = 3;

/// One entry of the act submenu.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActChoice {
    pub label: String,
    /// Dialogue revealed after choosing this act.
    pub text: String,
    /// Choosing this act lets the next spare succeed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub makes_spareable: bool,
}

impl ActChoice {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            makes_spareable: false,
        }
    }

    pub fn spareable(mut self) -> Self {
        self.makes_spareable = true;
        self
    }
}

/// Static description of the monster fought in an encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterProfile {
    pub name: String,
    pub max_hp: i32,
    pub act_choices: ArrayVec<ActChoice, MAX_ACT_CHOICES>,
    /// Root menu text when the encounter starts.
    pub intro_text: String,
    /// Root menu text after a dodge phase while not spareable.
    pub idle_text: String,
    /// Root menu text after a dodge phase while spareable.
    pub spareable_text: String,
    /// Shown when a spare is attempted too early.
    pub spare_rejected_text: String,
    /// Shown after consuming an item; `{item}` expands to the item name.
    pub item_text: String,
    pub speech: String,
    pub spareable_speech: String,
}

impl MonsterProfile {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if self.max_hp <= 0 {
            return Err(ProfileError::ZeroHp);
        }
        if self.act_choices.is_empty() {
            return Err(ProfileError::NoActChoices);
        }
        Ok(())
    }

    /// Builds the bounded act list from an arbitrary vector.
    pub fn act_list(
        choices: Vec<ActChoice>,
    ) -> Result<ArrayVec<ActChoice, MAX_ACT_CHOICES>, ProfileError> {
        let count = choices.len();
        if count > MAX_ACT_CHOICES {
            return Err(ProfileError::TooManyActChoices {
                count,
                max: MAX_ACT_CHOICES,
            });
        }
        Ok(choices.into_iter().collect())
    }

    pub fn item_text_for(&self, item: &str) -> String {
        self.item_text.replace("{item}", item)
    }

    pub fn flavor_after_turn(&self, spareable: bool) -> &str {
        if spareable {
            &self.spareable_text
        } else {
            &self.idle_text
        }
    }

    pub fn speech_for(&self, spareable: bool) -> &str {
        if spareable {
            &self.spareable_speech
        } else {
            &self.speech
        }
    }

    /// The frog the encounter ships with.
    pub fn froggit() -> Self {
        let mut act_choices = ArrayVec::new();
        act_choices.push(ActChoice::new(
            "Check",
            "* FROGGIT - ATK 4 DEF 5\n* Life is difficult for this enemy.",
        ));
        act_choices.push(
            ActChoice::new(
                "Compliment",
                "* Froggit didn't understand what you said,\n  but was flattered anyway.",
            )
            .spareable(),
        );
        act_choices.push(ActChoice::new("Threaten", "* Froggit looks scared."));

        Self {
            name: "Froggit".to_string(),
            max_hp: 30,
            act_choices,
            intro_text: "* Froggit doesn't seem to know why it's here.".to_string(),
            idle_text: "* Froggit is preparing for something.".to_string(),
            spareable_text: "* Froggit doesn't want to fight you.".to_string(),
            spare_rejected_text: "* You spared Froggit.\n* But its name isn't yellow yet."
                .to_string(),
            item_text: "* You ate the {item}.\n* Your HP was restored.".to_string(),
            speech: "Ribbit.".to_string(),
            spareable_speech: "Ribbit, ribbit.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn froggit_is_valid() {
        let profile = MonsterProfile::froggit();
        assert_eq!(profile.validate(), Ok(()));
        assert_eq!(profile.act_choices.len(), 3);
        assert!(profile.act_choices[1].makes_spareable);
    }

    #[test]
    fn item_text_expands_name() {
        let profile = MonsterProfile::froggit();
        assert_eq!(
            profile.item_text_for("Pie"),
            "* You ate the Pie.\n* Your HP was restored."
        );
    }

    #[test]
    fn act_list_rejects_overflow() {
        let choices = (0..4).map(|i| ActChoice::new(format!("a{i}"), "")).collect();
        assert_eq!(
            MonsterProfile::act_list(choices),
            Err(ProfileError::TooManyActChoices { count: 4, max: 3 })
        );
    }

    #[test]
    fn zero_hp_is_invalid() {
        let profile = MonsterProfile {
            max_hp: 0,
            ..MonsterProfile::froggit()
        };
        assert_eq!(profile.validate(), Err(ProfileError::ZeroHp));
    }
}
