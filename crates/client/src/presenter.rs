//! Turns runtime events and snapshots into transcript lines.
use battle_core::{
    AttackOutcome, Category, EncounterEvent, EncounterOutcome, EncounterView, MenuState, Phase,
};
use runtime::{Event, SessionEvent};

/// Stateful formatter for the line-based encounter transcript.
#[derive(Debug)]
pub struct Presenter {
    monster: String,
    last_menu: Option<String>,
}

impl Presenter {
    pub fn new(monster: impl Into<String>) -> Self {
        Self {
            monster: monster.into(),
            last_menu: None,
        }
    }

    pub fn on_event(&self, event: &Event) -> Vec<String> {
        match event {
            Event::Encounter(event) => self.encounter_lines(event),
            Event::Session(SessionEvent::Finished {
                outcome,
                stats,
                turns,
            }) => {
                let mut lines = vec![format!(
                    "{} LV{}  HP {}/{}  EXP {}  GOLD {}",
                    stats.name, stats.level, stats.hp, stats.max_hp, stats.exp, stats.gold
                )];
                if outcome.is_win() {
                    lines.push(format!("* Encounter over after {turns} turn(s)."));
                }
                lines
            }
            Event::Session(SessionEvent::StatsChanged { .. }) | Event::Text(_) => Vec::new(),
        }
    }

    fn encounter_lines(&self, event: &EncounterEvent) -> Vec<String> {
        let line = match event {
            EncounterEvent::StateChanged { to, .. } => match to {
                Phase::TimingAttack => "* [Z] when the cursor crosses the center.".to_string(),
                Phase::DodgePhase => "* Dodge!".to_string(),
                _ => return Vec::new(),
            },
            EncounterEvent::AttackResolved { attempt } => match attempt.outcome() {
                AttackOutcome::Miss => "MISS".to_string(),
                AttackOutcome::Hit { .. } => {
                    format!("* Precision {:.0}%", attempt.precision * 100.0)
                }
            },
            EncounterEvent::MonsterDamaged { damage, remaining } => format!(
                "* {} took {damage} damage. ({} HP left)",
                self.monster,
                (*remaining).max(0)
            ),
            EncounterEvent::PlayerHit { damage, hp } => {
                format!("* You took {damage} damage. HP {hp}")
            }
            EncounterEvent::ItemUsed { item, healed } => {
                format!("* You used the {item}. Recovered {healed} HP.")
            }
            EncounterEvent::TextRequested { text } => text.clone(),
            EncounterEvent::MonsterSpoke { text } => format!("{}: \"{text}\"", self.monster),
            EncounterEvent::Finished { outcome } => self.outcome_line(*outcome),
        };
        vec![line]
    }

    fn outcome_line(&self, outcome: EncounterOutcome) -> String {
        match outcome {
            EncounterOutcome::MonsterDefeated => "* YOU WON!".to_string(),
            EncounterOutcome::Spared => format!("* YOU WON! You spared {}.", self.monster),
            EncounterOutcome::Fled => "* You escaped...".to_string(),
            EncounterOutcome::PlayerDefeated => "* You cannot give up just yet...".to_string(),
        }
    }

    /// Menu status line, or `None` if it has not changed since the last call.
    pub fn menu_line(&mut self, view: &EncounterView) -> Option<String> {
        if view.phase != Phase::Menu {
            self.last_menu = None;
            return None;
        }
        let line = format!(
            "{} LV{} HP {}/{} | {}",
            view.player_name,
            view.player_level,
            view.player_hp,
            view.player_max_hp,
            render_menu(view)
        );
        if self.last_menu.as_deref() == Some(line.as_str()) {
            return None;
        }
        self.last_menu = Some(line.clone());
        Some(line)
    }
}

fn render_menu(view: &EncounterView) -> String {
    match view.menu {
        MenuState::Root { category } => Category::ALL
            .iter()
            .map(|c| {
                if *c == category {
                    format!("[{c}]")
                } else {
                    c.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        MenuState::Submenu { category, index } => {
            let entries = submenu_entries(view, category);
            if entries.is_empty() {
                // Disabled placeholder; nothing to select.
                return format!("{category}:   * {EMPTY_ENTRY}");
            }
            let body = entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let cursor = if i == index { '>' } else { ' ' };
                    format!("{cursor} * {entry}")
                })
                .collect::<Vec<_>>()
                .join("  ");
            format!("{category}: {body}")
        }
    }
}

const EMPTY_ENTRY: &str = "Empty";

fn submenu_entries(view: &EncounterView, category: Category) -> Vec<String> {
    match category {
        Category::Attack if view.spareable => vec![format!("{} (spare)", view.monster_name)],
        Category::Attack => vec![view.monster_name.clone()],
        Category::Act => view.act_labels.clone(),
        // Only the first item is usable.
        Category::Item => view.items.first().cloned().into_iter().collect(),
        Category::Mercy => vec!["Spare".to_string(), "Flee".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{
        AttackAttempt, BattleEngine, EncounterConfig, MonsterProfile, PcgRng, PlayerStats,
    };

    fn view() -> EncounterView {
        let engine = BattleEngine::new(
            EncounterConfig::default(),
            MonsterProfile::froggit(),
            Box::new(PcgRng),
            1,
        )
        .unwrap();
        engine.view(&PlayerStats::new("Frisk", 20).with_items(["Pie"]))
    }

    #[test]
    fn root_menu_highlights_category() {
        let mut presenter = Presenter::new("Froggit");
        let line = presenter.menu_line(&view()).unwrap();
        assert_eq!(line, "Frisk LV1 HP 20/20 | [ATTACK] ACT ITEM MERCY");
    }

    #[test]
    fn unchanged_menu_is_not_repeated() {
        let mut presenter = Presenter::new("Froggit");
        let view = view();
        assert!(presenter.menu_line(&view).is_some());
        assert!(presenter.menu_line(&view).is_none());
    }

    #[test]
    fn submenu_shows_cursor() {
        let mut presenter = Presenter::new("Froggit");
        let mut view = view();
        view.menu = MenuState::Submenu {
            category: Category::Mercy,
            index: 1,
        };
        let line = presenter.menu_line(&view).unwrap();
        assert!(line.ends_with("MERCY:   * Spare  > * Flee"), "{line}");
    }

    #[test]
    fn item_submenu_lists_only_the_usable_item() {
        let mut presenter = Presenter::new("Froggit");
        let mut view = view();
        view.items = vec!["Pie".to_string(), "Candy".to_string()];
        view.menu = MenuState::Submenu {
            category: Category::Item,
            index: 0,
        };
        let line = presenter.menu_line(&view).unwrap();
        assert!(line.ends_with("| ITEM: > * Pie"), "{line}");
    }

    #[test]
    fn empty_inventory_shows_disabled_placeholder() {
        let mut presenter = Presenter::new("Froggit");
        let mut view = view();
        view.items.clear();
        view.menu = MenuState::Submenu {
            category: Category::Item,
            index: 0,
        };
        let line = presenter.menu_line(&view).unwrap();
        assert!(line.ends_with("| ITEM:   * Empty"), "{line}");
        assert!(!line.contains('>'), "{line}");
    }

    #[test]
    fn attack_target_marks_spareable_monster() {
        let mut view = view();
        view.spareable = true;
        assert_eq!(
            submenu_entries(&view, Category::Attack),
            vec!["Froggit (spare)".to_string()]
        );
    }

    #[test]
    fn miss_is_never_shown_as_zero() {
        let presenter = Presenter::new("Froggit");
        let miss = AttackAttempt {
            bar_position: 0.0,
            precision: 0.0,
            damage: 0,
        };
        let lines = presenter.on_event(&Event::Encounter(EncounterEvent::AttackResolved {
            attempt: miss,
        }));
        assert_eq!(lines, vec!["MISS".to_string()]);
    }

    #[test]
    fn overkill_reports_zero_hp_left() {
        let presenter = Presenter::new("Froggit");
        let lines = presenter.on_event(&Event::Encounter(EncounterEvent::MonsterDamaged {
            damage: 40,
            remaining: -10,
        }));
        assert_eq!(lines, vec!["* Froggit took 40 damage. (0 HP left)".to_string()]);
    }

    #[test]
    fn speech_is_attributed_to_monster() {
        let presenter = Presenter::new("Froggit");
        let lines = presenter.on_event(&Event::Encounter(EncounterEvent::MonsterSpoke {
            text: "Ribbit.".to_string(),
        }));
        assert_eq!(lines, vec!["Froggit: \"Ribbit.\"".to_string()]);
    }

    #[test]
    fn text_events_are_silent() {
        let presenter = Presenter::new("Froggit");
        let lines = presenter.on_event(&Event::Text(runtime::TextEvent::Completed {
            text: "* hi".to_string(),
        }));
        assert!(lines.is_empty());
    }
}
