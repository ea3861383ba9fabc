use battle_core::{
    BattleEngine, Category, CombatState, DamageDisplay, EncounterConfig, EncounterEvent,
    EncounterHost, EncounterOutcome, InputFrame, Key, KeySet, MenuState, MonsterProfile, PcgRng,
    Phase, PlayerStats, Ports, RngOracle, Spawn, SpawnContext, SpawnPattern, StatsPatch,
    TextDisplay, Vec2,
};

/// Returns the same raw value for every seed.
struct FixedRng(u32);

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

/// A projectile parked on top of the centred avatar on the first frame.
struct Sitter;

impl SpawnPattern for Sitter {
    fn name(&self) -> &'static str {
        "sitter"
    }

    fn spawn(&self, ctx: &SpawnContext<'_>) -> Option<Spawn> {
        (ctx.frame == 0).then_some(Spawn {
            position: Vec2::new(115.0, 115.0),
            velocity: Vec2::ZERO,
            size: Vec2::new(6.0, 6.0),
        })
    }
}

struct RecordingHost {
    stats: PlayerStats,
    patches: Vec<StatsPatch>,
    wins: u32,
    losses: u32,
}

impl EncounterHost for RecordingHost {
    fn player_stats(&self) -> &PlayerStats {
        &self.stats
    }

    fn update_stats(&mut self, patch: StatsPatch) {
        self.patches.push(patch.clone());
        self.stats.merge(patch);
    }

    fn on_win(&mut self) {
        self.wins += 1;
    }

    fn on_lose(&mut self) {
        self.losses += 1;
    }
}

#[derive(Default)]
struct RecordingDisplay {
    requests: Vec<String>,
    skips: u32,
}

impl TextDisplay for RecordingDisplay {
    fn request(&mut self, text: &str) {
        self.requests.push(text.to_string());
    }

    fn skip(&mut self) {
        self.skips += 1;
    }
}

struct Harness {
    engine: BattleEngine,
    host: RecordingHost,
    display: RecordingDisplay,
    events: Vec<(u64, EncounterEvent)>,
    ticks: u64,
}

impl Harness {
    fn new(engine: BattleEngine, stats: PlayerStats) -> Self {
        Self {
            engine,
            host: RecordingHost {
                stats,
                patches: Vec::new(),
                wins: 0,
                losses: 0,
            },
            display: RecordingDisplay::default(),
            events: Vec::new(),
            ticks: 0,
        }
    }

    fn with_profile(profile: MonsterProfile, patterns: Vec<Box<dyn SpawnPattern>>) -> Self {
        let engine = BattleEngine::new(config(), profile, Box::new(FixedRng(0)), 1)
            .unwrap()
            .with_patterns(patterns);
        Self::new(engine, frisk())
    }

    fn froggit() -> Self {
        Self::with_profile(MonsterProfile::froggit(), Vec::new())
    }

    fn tick(&mut self, frame: InputFrame) {
        let mut ports = Ports::new(&mut self.host, &mut self.display);
        let events = self.engine.tick(&frame, &mut ports);
        self.ticks += 1;
        self.events
            .extend(events.into_iter().map(|event| (self.ticks, event)));
    }

    fn press(&mut self, keys: &[Key]) {
        let mut frame = InputFrame::default();
        for &key in keys {
            frame.pressed.push(key);
        }
        self.tick(frame);
    }

    /// Applies a key outside of any tick.
    fn key(&mut self, key: Key) {
        let mut ports = Ports::new(&mut self.host, &mut self.display);
        let events = self.engine.handle_key(key, &mut ports);
        self.events
            .extend(events.into_iter().map(|event| (self.ticks, event)));
    }

    fn idle(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick(InputFrame::default());
        }
    }

    fn run_until(&mut self, held: KeySet, limit: u32, done: impl Fn(&BattleEngine) -> bool) {
        for _ in 0..limit {
            if done(&self.engine) {
                return;
            }
            self.tick(InputFrame::holding(held));
        }
        assert!(done(&self.engine), "condition not reached in {limit} ticks");
    }

    fn phase(&self) -> Phase {
        self.engine.phase()
    }

    fn hits(&self) -> Vec<(u64, u32)> {
        self.events
            .iter()
            .filter_map(|(tick, event)| match event {
                EncounterEvent::PlayerHit { hp, .. } => Some((*tick, *hp)),
                _ => None,
            })
            .collect()
    }

    /// Opens the attack submenu and starts the bar.
    fn start_attack(&mut self) {
        self.press(&[Key::Confirm]);
        self.press(&[Key::Confirm]);
        assert_eq!(self.phase(), Phase::TimingAttack);
    }

    /// Confirms with the cursor exactly at the centre of the bar.
    fn perfect_attack(&mut self) {
        self.start_attack();
        // 10 ms already elapsed on the starting tick; 740 ms to the centre.
        self.idle(74);
        self.press(&[Key::Confirm]);
    }
}

/// Ten-millisecond ticks keep bar positions exact.
fn config() -> EncounterConfig {
    EncounterConfig {
        tick_ms: 10,
        ..EncounterConfig::default()
    }
}

fn frisk() -> PlayerStats {
    PlayerStats::new("Frisk", 20).with_items(["Butterscotch Pie"])
}

#[test]
fn perfect_hit_leaves_monster_alive_and_enters_dodge() {
    let mut h = Harness::froggit();
    h.perfect_attack();

    let attempt = h.events.iter().find_map(|(_, event)| match event {
        EncounterEvent::AttackResolved { attempt } => Some(*attempt),
        _ => None,
    });
    assert_eq!(attempt.map(|a| a.damage), Some(20));
    assert_eq!(h.engine.session().monster_hp, 30);

    h.run_until(KeySet::empty(), 400, |engine| engine.phase() != Phase::AttackResult);
    assert_eq!(h.phase(), Phase::DodgePhase);
    assert_eq!(h.engine.session().monster_hp, 10);
    assert_eq!(h.engine.session().turn_count, 1);
    assert_eq!(h.host.wins, 0);
}

#[test]
fn damage_is_staged_behind_the_slash() {
    let mut h = Harness::froggit();
    h.perfect_attack();

    h.idle(18);
    assert!(!h.engine.view(&h.host.stats).slash_visible);
    h.idle(1);
    let view = h.engine.view(&h.host.stats);
    assert!(view.slash_visible);
    assert_eq!(view.monster_hp, 30);

    h.idle(50);
    let view = h.engine.view(&h.host.stats);
    assert!(!view.slash_visible);
    assert_eq!(view.monster_hp, 10);
    assert_eq!(view.damage, Some(DamageDisplay::Damage(20)));
}

#[test]
fn lethal_hit_wins_exactly_once() {
    let profile = MonsterProfile {
        max_hp: 10,
        ..MonsterProfile::froggit()
    };
    let mut h = Harness::with_profile(profile, Vec::new());
    h.perfect_attack();
    h.run_until(KeySet::empty(), 400, BattleEngine::is_finished);

    assert_eq!(h.engine.session().monster_hp, -10);
    assert_eq!(
        h.engine.session().state,
        CombatState::Victory(EncounterOutcome::MonsterDefeated)
    );
    assert_eq!(h.host.wins, 1);

    let before = h.events.len();
    h.press(&[Key::Confirm]);
    h.idle(300);
    assert_eq!(h.events.len(), before);
    assert_eq!(h.host.wins, 1);
    assert_eq!(h.phase(), Phase::Victory);
}

#[test]
fn expired_bar_is_a_miss() {
    let mut h = Harness::froggit();
    h.start_attack();
    h.run_until(KeySet::empty(), 200, |engine| engine.phase() != Phase::TimingAttack);

    assert_eq!(h.phase(), Phase::AttackResult);
    let view = h.engine.view(&h.host.stats);
    assert_eq!(view.damage, Some(DamageDisplay::Miss));
    assert_eq!(view.bar_position, Some(560.0));

    h.run_until(KeySet::empty(), 200, |engine| engine.phase() != Phase::AttackResult);
    assert_eq!(h.phase(), Phase::DodgePhase);
    assert_eq!(h.engine.session().monster_hp, 30);
    assert!(
        !h.events
            .iter()
            .any(|(_, event)| matches!(event, EncounterEvent::MonsterDamaged { .. }))
    );
}

#[test]
fn confirmed_miss_still_plays_the_slash() {
    let mut h = Harness::froggit();
    h.key(Key::Confirm);
    h.key(Key::Confirm);
    assert_eq!(h.phase(), Phase::TimingAttack);
    // Bar has not moved yet: the cursor sits on the left edge.
    h.key(Key::Confirm);
    assert_eq!(h.phase(), Phase::AttackResult);
    assert_eq!(h.engine.view(&h.host.stats).damage, None);

    h.idle(19);
    assert!(!h.engine.view(&h.host.stats).slash_visible);
    h.idle(1);
    assert!(h.engine.view(&h.host.stats).slash_visible);

    h.idle(50);
    let view = h.engine.view(&h.host.stats);
    assert!(!view.slash_visible);
    assert_eq!(view.damage, Some(DamageDisplay::Miss));
    assert_eq!(view.monster_hp, 30);
    assert_eq!(h.phase(), Phase::AttackResult);

    h.run_until(KeySet::empty(), 200, |engine| engine.phase() != Phase::AttackResult);
    assert_eq!(h.phase(), Phase::DodgePhase);
    assert!(
        !h.events
            .iter()
            .any(|(_, event)| matches!(event, EncounterEvent::MonsterDamaged { .. }))
    );
}

#[test]
fn edges_after_a_transition_wait_for_the_next_tick() {
    let mut h = Harness::froggit();
    h.press(&[Key::Confirm, Key::Confirm, Key::Down]);
    assert_eq!(h.phase(), Phase::Menu);
    assert_eq!(
        h.engine.session().menu,
        MenuState::Submenu {
            category: Category::Attack,
            index: 0
        }
    );

    // The second Confirm starts the bar; Down is deferred again behind it.
    h.idle(1);
    assert_eq!(h.phase(), Phase::TimingAttack);

    // Down is ignored by the bar and nothing is left over.
    h.idle(1);
    assert_eq!(h.phase(), Phase::TimingAttack);
}

#[test]
fn menu_indices_stay_in_range() {
    let mut h = Harness::froggit();
    h.press(&[Key::Right, Key::Right, Key::Right, Key::Right]);
    assert_eq!(h.engine.session().menu, MenuState::root(Category::Mercy));
    h.press(&[Key::Confirm]);
    h.press(&[Key::Down, Key::Down, Key::Down]);
    assert_eq!(h.engine.session().menu.index(), Some(1));

    h.press(&[Key::Cancel]);
    h.press(&[Key::Left, Key::Left]);
    h.press(&[Key::Confirm]);
    h.press(&[Key::Down, Key::Down, Key::Down, Key::Down]);
    assert_eq!(
        h.engine.session().menu,
        MenuState::Submenu {
            category: Category::Act,
            index: 2
        }
    );
}

#[test]
fn empty_inventory_confirm_changes_nothing() {
    let engine = BattleEngine::new(
        config(),
        MonsterProfile::froggit(),
        Box::new(FixedRng(0)),
        1,
    )
    .unwrap();
    let mut h = Harness::new(engine, PlayerStats::new("Frisk", 20));
    h.press(&[Key::Right, Key::Right]);
    h.press(&[Key::Confirm]);

    let before = h.engine.session().clone();
    h.press(&[Key::Confirm]);
    assert_eq!(h.engine.session(), &before);
    assert!(h.host.patches.is_empty());
}

#[test]
fn item_heals_and_consumes_first_item() {
    let engine = BattleEngine::new(
        config(),
        MonsterProfile::froggit(),
        Box::new(FixedRng(0)),
        1,
    )
    .unwrap();
    let stats = PlayerStats::new("Frisk", 20)
        .with_hp(14)
        .with_items(["Butterscotch Pie", "Candy"]);
    let mut h = Harness::new(engine, stats);
    h.press(&[Key::Right, Key::Right]);
    h.press(&[Key::Confirm]);
    h.press(&[Key::Confirm]);

    assert_eq!(h.phase(), Phase::ActionText);
    assert_eq!(h.host.stats.hp, 20);
    assert_eq!(h.host.stats.items, vec!["Candy".to_string()]);
    assert!(h.events.iter().any(|(_, event)| {
        *event
            == EncounterEvent::ItemUsed {
                item: "Butterscotch Pie".into(),
                healed: 6,
            }
    }));
    assert_eq!(
        h.display.requests.last().map(String::as_str),
        Some("* You ate the Butterscotch Pie.\n* Your HP was restored.")
    );
}

#[test]
fn early_spare_is_rejected_then_dodge_follows() {
    let mut h = Harness::froggit();
    h.press(&[Key::Right, Key::Right, Key::Right]);
    h.press(&[Key::Confirm]);
    h.press(&[Key::Confirm]);

    assert_eq!(h.phase(), Phase::ActionText);
    assert_eq!(h.host.wins, 0);
    assert_eq!(
        h.engine.session().flavor_text,
        MonsterProfile::froggit().spare_rejected_text
    );

    h.press(&[Key::Cancel]);
    assert_eq!(h.display.skips, 1);
    assert!(h.engine.view(&h.host.stats).text_revealed);

    h.press(&[Key::Confirm]);
    assert_eq!(h.phase(), Phase::DodgePhase);
}

#[test]
fn compliment_then_spare_wins() {
    let mut h = Harness::froggit();
    h.press(&[Key::Right]);
    h.press(&[Key::Confirm]);
    h.press(&[Key::Down]);
    h.press(&[Key::Confirm]);
    assert!(h.engine.session().is_spareable);
    assert_eq!(h.phase(), Phase::ActionText);

    h.press(&[Key::Confirm]);
    h.run_until(KeySet::empty(), 600, |engine| engine.phase() == Phase::Menu);
    assert_eq!(h.engine.session().menu, MenuState::root(Category::Act));
    assert_eq!(
        h.engine.session().flavor_text,
        MonsterProfile::froggit().spareable_text
    );

    h.press(&[Key::Right, Key::Right]);
    h.press(&[Key::Confirm]);
    h.press(&[Key::Confirm]);
    assert_eq!(h.engine.outcome(), Some(EncounterOutcome::Spared));
    assert_eq!(h.host.wins, 1);
}

#[test]
fn weakened_monster_can_be_spared() {
    let profile = MonsterProfile {
        max_hp: 4,
        ..MonsterProfile::froggit()
    };
    let mut h = Harness::with_profile(profile, Vec::new());
    h.press(&[Key::Right, Key::Right, Key::Right]);
    h.press(&[Key::Confirm]);
    h.press(&[Key::Confirm]);
    assert_eq!(h.engine.outcome(), Some(EncounterOutcome::Spared));
}

#[test]
fn flee_always_wins() {
    let mut h = Harness::froggit();
    h.press(&[Key::Right, Key::Right, Key::Right]);
    h.press(&[Key::Confirm]);
    h.press(&[Key::Down]);
    h.press(&[Key::Confirm]);
    assert_eq!(h.engine.outcome(), Some(EncounterOutcome::Fled));
    assert_eq!(h.host.wins, 1);
    assert_eq!(h.host.losses, 0);
}

#[test]
fn dodge_phase_returns_to_root_after_budget() {
    let mut h = Harness::froggit();
    h.start_attack();
    h.run_until(KeySet::empty(), 400, |engine| engine.phase() == Phase::DodgePhase);
    let entered = h.ticks;

    h.run_until(KeySet::empty(), 400, |engine| engine.phase() != Phase::DodgePhase);
    assert_eq!(h.phase(), Phase::Menu);
    // The entry tick opens a 50-tick warm-up, followed by 250 field frames.
    assert_eq!(h.ticks - entered, 299);
    assert_eq!(h.engine.session().menu, MenuState::root(Category::Attack));
    assert_eq!(
        h.engine.session().flavor_text,
        MonsterProfile::froggit().idle_text
    );
    assert!(h.engine.view(&h.host.stats).projectiles.is_empty());
}

#[test]
fn avatar_stays_inside_dodge_arena() {
    let mut h = Harness::froggit();
    h.start_attack();
    h.run_until(KeySet::empty(), 400, |engine| engine.phase() == Phase::DodgePhase);

    for held in [KeySet::UP | KeySet::LEFT, KeySet::DOWN | KeySet::RIGHT] {
        for _ in 0..100 {
            h.tick(InputFrame::holding(held));
            let avatar = h.engine.view(&h.host.stats).avatar.unwrap();
            assert!((0.0..=224.0).contains(&avatar.x));
            assert!((0.0..=224.0).contains(&avatar.y));
        }
    }
}

#[test]
fn hits_are_spaced_by_invulnerability() {
    let mut h = Harness::with_profile(MonsterProfile::froggit(), vec![Box::new(Sitter)]);
    h.start_attack();
    h.run_until(KeySet::empty(), 400, |engine| engine.phase() == Phase::DodgePhase);
    h.run_until(KeySet::empty(), 400, |engine| engine.phase() != Phase::DodgePhase);

    let hits = h.hits();
    let hp: Vec<u32> = hits.iter().map(|(_, hp)| *hp).collect();
    assert_eq!(hp, vec![17, 14, 11, 8, 5]);
    for pair in hits.windows(2) {
        assert_eq!(pair[1].0 - pair[0].0, 60);
    }
    assert_eq!(h.host.losses, 0);
    assert_eq!(h.phase(), Phase::Menu);
}

#[test]
fn lethal_hit_is_defeat() {
    let profile = MonsterProfile::froggit();
    let engine = BattleEngine::new(config(), profile, Box::new(FixedRng(0)), 1)
        .unwrap()
        .with_patterns(vec![Box::new(Sitter)]);
    let mut h = Harness::new(engine, PlayerStats::new("Frisk", 20).with_hp(5));
    h.start_attack();
    h.run_until(KeySet::empty(), 800, BattleEngine::is_finished);

    assert_eq!(h.engine.outcome(), Some(EncounterOutcome::PlayerDefeated));
    assert_eq!(h.phase(), Phase::Defeat);
    assert_eq!(h.host.stats.hp, 0);
    assert_eq!(h.host.losses, 1);
    assert_eq!(h.host.wins, 0);
    assert!(h.engine.view(&h.host.stats).projectiles.is_empty());

    h.idle(200);
    assert_eq!(h.host.losses, 1);
}

#[test]
fn speech_follows_the_roll() {
    let speaks = Harness::froggit();
    assert!(speaks.engine.session().pending_dialogue.is_some());

    let engine = BattleEngine::new(
        config(),
        MonsterProfile::froggit(),
        Box::new(FixedRng(u32::MAX)),
        1,
    )
    .unwrap();
    let quiet = Harness::new(engine, frisk());
    assert!(quiet.engine.session().pending_dialogue.is_none());
}

#[test]
fn intro_text_is_requested_on_first_tick() {
    let mut h = Harness::froggit();
    h.idle(1);
    assert_eq!(
        h.display.requests,
        vec![MonsterProfile::froggit().intro_text]
    );
}

#[test]
fn same_seed_same_encounter() {
    let run = || {
        let engine = BattleEngine::new(
            EncounterConfig::default(),
            MonsterProfile::froggit(),
            Box::new(PcgRng),
            77,
        )
        .unwrap();
        let mut h = Harness::new(engine, frisk());
        h.start_attack();
        h.run_until(KeySet::empty(), 400, |engine| engine.phase() == Phase::DodgePhase);
        h.run_until(KeySet::RIGHT, 400, |engine| engine.phase() != Phase::DodgePhase);
        (h.events, h.host.stats)
    };
    assert_eq!(run(), run());
}
