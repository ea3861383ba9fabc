//! Combat state machine.
//!
//! The [`BattleEngine`] is the only writer of [`BattleSession`]. Time moves
//! exclusively through [`BattleEngine::tick`], which runs three steps in
//! order:
//!
//! 1. key edges from the [`InputFrame`], each against the state current at
//!    the start of the tick (edges after the first transition wait for the
//!    next tick),
//! 2. delayed events that fell due on this tick,
//! 3. the real-time simulation of the active phase (timing bar or dodge).
//!
//! Delayed events re-read the session when they fire and are cancelled on
//! every phase change, so a stale timer can never act on a newer state.

mod events;
mod session;
mod view;

pub use events::EncounterEvent;
pub use session::{AttackResultStage, BattleSession, CombatState, EncounterOutcome, Phase};
pub use view::{DamageDisplay, EncounterView};

use arrayvec::ArrayVec;

use crate::avatar::Avatar;
use crate::collision::CollisionResolver;
use crate::config::EncounterConfig;
use crate::error::SetupError;
use crate::field::{FieldStatus, ProjectileField, SpawnPattern};
use crate::geometry::Arena;
use crate::input::{InputFrame, Key, KeySet, MAX_PENDING_EDGES};
use crate::menu::{Category, MenuContext, MenuState, mercy};
use crate::ports::Ports;
use crate::profile::MonsterProfile;
use crate::rng::{RngOracle, compute_seed, context};
use crate::schedule::Scheduler;
use crate::stats::{PlayerStats, StatsPatch};
use crate::timing::{AttackAttempt, AttackOutcome, TimingBar};

/// What ended the timing bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttackTrigger {
    Confirmed,
    Expired,
}

/// Delayed steps of the encounter sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Timed {
    ShowSlash,
    ApplyDamage,
    Conclude,
    StartSpawning,
}

pub struct BattleEngine {
    config: EncounterConfig,
    profile: MonsterProfile,
    rng: Box<dyn RngOracle>,
    seed: u64,

    session: BattleSession,
    bar: TimingBar,
    field: ProjectileField,
    avatar: Avatar,
    collision: CollisionResolver,
    scheduler: Scheduler<Timed>,

    /// Projectile field is simulating (dodge warm-up elapsed).
    spawning: bool,
    damage_display: Option<DamageDisplay>,
    text_revealed: bool,
    started: bool,
    outcome: Option<EncounterOutcome>,
    /// Bumped on every transition; edges after one are deferred.
    revision: u64,
    deferred_edges: ArrayVec<Key, MAX_PENDING_EDGES>,
    events: Vec<EncounterEvent>,
}

impl BattleEngine {
    pub fn new(
        config: EncounterConfig,
        profile: MonsterProfile,
        rng: Box<dyn RngOracle>,
        seed: u64,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        profile.validate()?;

        let session = BattleSession::new(profile.max_hp, profile.intro_text.clone());
        let mut engine = Self {
            bar: TimingBar::new(config.bar_width, config.bar_duration_ms),
            field: ProjectileField::from_config(&config),
            avatar: Avatar::new(config.avatar_size, config.avatar_speed, config.hitbox_inset),
            collision: CollisionResolver::new(config.hit_damage, config.invulnerability_frames),
            scheduler: Scheduler::new(),
            config,
            profile,
            rng,
            seed,
            session,
            spawning: false,
            damage_display: None,
            text_revealed: false,
            started: false,
            outcome: None,
            revision: 0,
            deferred_edges: ArrayVec::new(),
            events: Vec::new(),
        };
        engine.roll_speech();
        Ok(engine)
    }

    /// Replaces the dodge phase spawn rules.
    pub fn with_patterns(mut self, patterns: Vec<Box<dyn SpawnPattern>>) -> Self {
        self.field.set_patterns(patterns);
        self
    }

    pub fn session(&self) -> &BattleSession {
        &self.session
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    pub fn profile(&self) -> &MonsterProfile {
        &self.profile
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<EncounterOutcome> {
        self.outcome
    }

    /// Ticks elapsed since the engine was built.
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// Arena in effect for the current phase.
    pub fn arena(&self) -> Arena {
        match self.session.state {
            CombatState::DodgePhase => self.config.dodge_arena,
            _ => self.config.menu_arena,
        }
    }

    /// Called by the text collaborator once the requested string is fully shown.
    pub fn notify_text_complete(&mut self) {
        self.text_revealed = true;
    }

    /// Applies a single key edge outside of a tick.
    pub fn handle_key(&mut self, key: Key, ports: &mut Ports<'_>) -> Vec<EncounterEvent> {
        self.ensure_started(ports);
        if !self.is_finished() {
            self.apply_key(key, ports);
        }
        std::mem::take(&mut self.events)
    }

    /// Advances the encounter by one tick.
    pub fn tick(&mut self, input: &InputFrame, ports: &mut Ports<'_>) -> Vec<EncounterEvent> {
        self.ensure_started(ports);
        if self.is_finished() {
            return std::mem::take(&mut self.events);
        }

        let mut edges = std::mem::take(&mut self.deferred_edges);
        for &key in &input.pressed {
            if edges.try_push(key).is_err() {
                tracing::warn!(?key, "input edge buffer full, dropping key");
            }
        }

        let revision = self.revision;
        for (i, &key) in edges.iter().enumerate() {
            if self.is_finished() {
                break;
            }
            if self.revision != revision {
                let rest = &edges[i..];
                tracing::trace!(count = rest.len(), "edges deferred to next tick");
                if self.deferred_edges.try_extend_from_slice(rest).is_err() {
                    tracing::warn!(count = rest.len(), "deferred edge buffer full, dropping keys");
                }
                break;
            }
            self.apply_key(key, ports);
        }

        self.scheduler.advance();
        while let Some(timed) = self.scheduler.pop_due() {
            self.fire(timed, ports);
        }

        self.simulate(input.held, ports);
        std::mem::take(&mut self.events)
    }

    /// Snapshot for rendering. `stats` is the host's current copy.
    pub fn view(&self, stats: &PlayerStats) -> EncounterView {
        let state = &self.session.state;
        let dodging = matches!(state, CombatState::DodgePhase);
        let bar_position = match state {
            CombatState::TimingAttack => Some(self.bar.position()),
            CombatState::AttackResult { attempt, .. } => Some(attempt.bar_position),
            _ => None,
        };
        EncounterView {
            phase: self.phase(),
            turn: self.session.turn_count,
            menu: self.session.menu,
            arena: self.arena(),
            monster_name: self.profile.name.clone(),
            monster_hp: self.session.monster_hp,
            monster_max_hp: self.profile.max_hp,
            spareable: self.session.is_spareable,
            player_name: stats.name.clone(),
            player_level: stats.level,
            player_hp: stats.hp,
            player_max_hp: stats.max_hp,
            items: stats.items.clone(),
            act_labels: self
                .profile
                .act_choices
                .iter()
                .map(|choice| choice.label.clone())
                .collect(),
            flavor_text: self.session.flavor_text.clone(),
            text_revealed: self.text_revealed,
            dialogue: self.session.pending_dialogue.clone(),
            bar_position,
            bar_width: self.bar.width(),
            slash_visible: matches!(
                state,
                CombatState::AttackResult {
                    stage: AttackResultStage::Slash,
                    ..
                }
            ),
            damage: self.damage_display,
            avatar: dodging.then(|| self.avatar.bounds()),
            avatar_dimmed: dodging && self.collision.blink_dimmed(),
            projectiles: if dodging {
                self.field.projectiles().to_vec()
            } else {
                Vec::new()
            },
            outcome: self.outcome,
        }
    }

    fn ensure_started(&mut self, ports: &mut Ports<'_>) {
        if self.started {
            return;
        }
        self.started = true;
        let text = self.session.flavor_text.clone();
        self.request_text(text, ports);
        self.announce_speech();
    }

    // ===== input =====

    fn apply_key(&mut self, key: Key, ports: &mut Ports<'_>) {
        match self.session.state {
            CombatState::Menu => self.menu_key(key, ports),
            CombatState::TimingAttack => {
                if key == Key::Confirm
                    && let Some(attempt) = self.bar.confirm()
                {
                    self.commit_attack(attempt, AttackTrigger::Confirmed);
                }
            }
            CombatState::ActionText => match key {
                Key::Confirm => self.enter_dodge(),
                Key::Cancel => {
                    ports.text.skip();
                    self.text_revealed = true;
                }
                _ => {}
            },
            CombatState::AttackResult { .. }
            | CombatState::DodgePhase
            | CombatState::Victory(_)
            | CombatState::Defeat => {}
        }
    }

    fn menu_context(&self, ports: &Ports<'_>) -> MenuContext {
        MenuContext::new(
            self.profile.act_choices.len(),
            ports.host.player_stats().items.len(),
        )
    }

    fn menu_key(&mut self, key: Key, ports: &mut Ports<'_>) {
        let ctx = self.menu_context(ports);
        let menu = self.session.menu;
        match (menu, key) {
            (MenuState::Root { .. }, Key::Left) => self.session.menu = menu.move_left(),
            (MenuState::Root { .. }, Key::Right) => self.session.menu = menu.move_right(),
            (MenuState::Root { .. }, Key::Confirm) => {
                self.session.menu = menu.open().clamped(&ctx);
                self.revision += 1;
            }
            (MenuState::Submenu { .. }, Key::Up) => self.session.menu = menu.move_up(&ctx),
            (MenuState::Submenu { .. }, Key::Down) => self.session.menu = menu.move_down(&ctx),
            (MenuState::Submenu { .. }, Key::Cancel) => {
                self.session.menu = menu.close();
                self.revision += 1;
            }
            (MenuState::Submenu { category, index }, Key::Confirm) => {
                self.select(category, index, ports)
            }
            _ => {}
        }
    }

    fn select(&mut self, category: Category, index: usize, ports: &mut Ports<'_>) {
        match category {
            Category::Attack => {
                self.bar.start();
                self.damage_display = None;
                self.set_state(CombatState::TimingAttack);
            }
            Category::Act => {
                let Some(choice) = self.profile.act_choices.get(index) else {
                    return;
                };
                let text = choice.text.clone();
                if choice.makes_spareable {
                    self.session.is_spareable = true;
                }
                self.show_action_text(text, ports);
            }
            Category::Item => self.use_item(ports),
            Category::Mercy => match index {
                mercy::SPARE => {
                    if self.session.is_spareable
                        || self.session.monster_hp < self.config.spare_hp_threshold
                    {
                        self.finish(EncounterOutcome::Spared, ports);
                    } else {
                        let text = self.profile.spare_rejected_text.clone();
                        self.show_action_text(text, ports);
                    }
                }
                mercy::FLEE => self.finish(EncounterOutcome::Fled, ports),
                _ => {}
            },
        }
    }

    fn use_item(&mut self, ports: &mut Ports<'_>) {
        let stats = ports.host.player_stats();
        let Some((item, rest)) = stats.items.split_first() else {
            tracing::trace!("item menu confirmed with empty inventory");
            return;
        };
        let item = item.clone();
        let remaining = rest.to_vec();
        let before = stats.hp;
        let healed_to = before
            .saturating_add(self.config.heal_amount)
            .min(stats.max_hp);

        ports.host.update_stats(StatsPatch {
            hp: Some(healed_to),
            items: Some(remaining),
            ..StatsPatch::default()
        });
        let after = ports.host.player_stats().hp;
        self.events.push(EncounterEvent::ItemUsed {
            item: item.clone(),
            healed: after.saturating_sub(before),
        });

        let text = self.profile.item_text_for(&item);
        self.show_action_text(text, ports);
    }

    // ===== attack resolution =====

    /// A confirmed press always plays the slash, even for zero damage. Only
    /// an expired bar goes straight to the conclusion.
    fn commit_attack(&mut self, attempt: AttackAttempt, trigger: AttackTrigger) {
        tracing::debug!(
            position = attempt.bar_position,
            precision = attempt.precision,
            damage = attempt.damage,
            ?trigger,
            "attack committed"
        );
        self.events.push(EncounterEvent::AttackResolved { attempt });
        self.set_state(CombatState::AttackResult {
            attempt,
            stage: AttackResultStage::Committed,
        });
        match trigger {
            AttackTrigger::Expired => {
                self.damage_display = Some(DamageDisplay::Miss);
                self.schedule_ms(self.config.conclude_delay_ms, Timed::Conclude);
            }
            AttackTrigger::Confirmed => {
                self.schedule_ms(self.config.slash_delay_ms, Timed::ShowSlash);
            }
        }
    }

    fn fire(&mut self, timed: Timed, ports: &mut Ports<'_>) {
        match (timed, self.session.state) {
            (
                Timed::ShowSlash,
                CombatState::AttackResult {
                    attempt,
                    stage: AttackResultStage::Committed,
                },
            ) => {
                self.session.state = CombatState::AttackResult {
                    attempt,
                    stage: AttackResultStage::Slash,
                };
                self.schedule_ms(self.config.damage_delay_ms, Timed::ApplyDamage);
            }
            (
                Timed::ApplyDamage,
                CombatState::AttackResult {
                    attempt,
                    stage: AttackResultStage::Slash,
                },
            ) => {
                self.session.state = CombatState::AttackResult {
                    attempt,
                    stage: AttackResultStage::Applied,
                };
                match attempt.outcome() {
                    AttackOutcome::Miss => self.damage_display = Some(DamageDisplay::Miss),
                    AttackOutcome::Hit { damage } => {
                        self.session.monster_hp -= damage as i32;
                        self.damage_display = Some(DamageDisplay::Damage(damage));
                        self.events.push(EncounterEvent::MonsterDamaged {
                            damage,
                            remaining: self.session.monster_hp,
                        });
                    }
                }
                self.schedule_ms(self.config.conclude_delay_ms, Timed::Conclude);
            }
            (Timed::Conclude, CombatState::AttackResult { .. }) => {
                if self.session.monster_hp <= 0 {
                    self.finish(EncounterOutcome::MonsterDefeated, ports);
                } else {
                    self.enter_dodge();
                }
            }
            (Timed::StartSpawning, CombatState::DodgePhase) => {
                self.spawning = true;
            }
            (timed, state) => {
                tracing::trace!(?timed, phase = %state.phase(), "stale timer ignored");
            }
        }
    }

    // ===== simulation =====

    fn simulate(&mut self, held: KeySet, ports: &mut Ports<'_>) {
        match self.session.state {
            CombatState::TimingAttack => {
                if let Some(attempt) = self.bar.advance(self.config.tick_ms) {
                    self.commit_attack(attempt, AttackTrigger::Expired);
                }
            }
            CombatState::DodgePhase => self.simulate_dodge(held, ports),
            _ => {}
        }
    }

    fn simulate_dodge(&mut self, held: KeySet, ports: &mut Ports<'_>) {
        self.collision.tick_invulnerability();
        let arena = self.config.dodge_arena;
        self.avatar.step(held, &arena);

        let status = if self.spawning {
            self.field
                .step(self.rng.as_ref(), self.seed, self.session.turn_count)
        } else {
            FieldStatus::Running
        };

        let before = ports.host.player_stats().hp;
        if let Some(report) =
            self.collision
                .resolve(&self.avatar.hitbox(), self.field.projectiles(), before)
        {
            ports.host.update_stats(StatsPatch::hp(report.new_hp));
            let hp = ports.host.player_stats().hp;
            tracing::debug!(projectile = ?report.projectile, hp, "player hit");
            self.events.push(EncounterEvent::PlayerHit {
                damage: before.saturating_sub(hp),
                hp,
            });
            if hp == 0 {
                self.finish(EncounterOutcome::PlayerDefeated, ports);
                return;
            }
        }

        if status == FieldStatus::Exhausted {
            self.end_dodge(ports);
        }
    }

    // ===== transitions =====

    fn enter_dodge(&mut self) {
        self.scheduler.cancel_all();
        self.field.reset();
        self.spawning = false;
        self.damage_display = None;
        self.session.turn_count += 1;
        self.session.pending_dialogue = None;
        self.avatar.center_in(&self.config.dodge_arena);
        self.collision.reset();
        self.set_state(CombatState::DodgePhase);
        self.schedule_ms(self.config.dodge_warmup_ms, Timed::StartSpawning);
    }

    fn end_dodge(&mut self, ports: &mut Ports<'_>) {
        self.scheduler.cancel_all();
        self.field.clear();
        self.spawning = false;
        self.session.menu = MenuState::root(self.session.menu.category());
        self.session.flavor_text = self
            .profile
            .flavor_after_turn(self.session.is_spareable)
            .to_string();
        self.set_state(CombatState::Menu);

        let text = self.session.flavor_text.clone();
        self.request_text(text, ports);
        self.roll_speech();
        self.announce_speech();
    }

    fn show_action_text(&mut self, text: String, ports: &mut Ports<'_>) {
        self.session.flavor_text = text.clone();
        self.session.pending_dialogue = None;
        self.set_state(CombatState::ActionText);
        self.request_text(text, ports);
    }

    fn finish(&mut self, outcome: EncounterOutcome, ports: &mut Ports<'_>) {
        if self.outcome.is_some() {
            return;
        }
        self.scheduler.cancel_all();
        self.field.clear();
        self.spawning = false;
        self.outcome = Some(outcome);

        if outcome.is_win() {
            self.set_state(CombatState::Victory(outcome));
            ports.host.on_win();
        } else {
            self.set_state(CombatState::Defeat);
            ports.host.on_lose();
        }
        tracing::info!(%outcome, turn = self.session.turn_count, "encounter finished");
        self.events.push(EncounterEvent::Finished { outcome });
    }

    fn set_state(&mut self, next: CombatState) {
        let from = self.session.phase();
        self.session.state = next;
        self.revision += 1;
        let to = next.phase();
        if from != to {
            tracing::debug!(%from, %to, "phase change");
            self.events.push(EncounterEvent::StateChanged { from, to });
        }
    }

    fn request_text(&mut self, text: String, ports: &mut Ports<'_>) {
        self.text_revealed = false;
        ports.text.request(&text);
        self.events.push(EncounterEvent::TextRequested { text });
    }

    fn roll_speech(&mut self) {
        let seed = compute_seed(self.seed, self.session.turn_count, 0, context::SPEECH);
        self.session.pending_dialogue = (self.rng.unit(seed) < self.config.speech_chance)
            .then(|| {
                self.profile
                    .speech_for(self.session.is_spareable)
                    .to_string()
            });
    }

    fn announce_speech(&mut self) {
        if let Some(text) = self.session.pending_dialogue.clone() {
            self.events.push(EncounterEvent::MonsterSpoke { text });
        }
    }

    fn schedule_ms(&mut self, ms: u32, timed: Timed) {
        let ticks = self.config.ticks_for(ms);
        self.scheduler.schedule(ticks, timed);
    }
}

impl std::fmt::Debug for BattleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleEngine")
            .field("session", &self.session)
            .field("field", &self.field)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}
