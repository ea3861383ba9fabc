//! Glue code tying content, the runtime, and the terminal together.
use std::io::{self, Stdout, Write};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use crossterm::event::{
    self as term_event, Event as TermEvent, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{self, Duration};

use battle_content::{ContentFactory, DEFAULT_MONSTER};
use battle_core::MonsterProfile;
use runtime::{Event, Runtime, RuntimeHandle, Topic};

use crate::config::ClientConfig;
use crate::input::{HeldKeys, KeyAction, map_key};
use crate::presenter::Presenter;

const FRAME_INTERVAL_MS: u64 = 16;

pub struct App {
    config: ClientConfig,
    monster: String,
    runtime: Runtime,
}

impl App {
    /// Loads content and starts the runtime. The encounter clock starts
    /// running immediately.
    pub async fn build(config: ClientConfig) -> Result<Self> {
        let factory = ContentFactory::new(&config.data_dir);
        let encounter = factory.load_config()?;
        let player = factory.load_player()?;
        let profile = load_profile(&factory, &config.monster)?;
        let monster = profile.name.clone();

        let runtime = Runtime::builder()
            .config(config.runtime_config(encounter))
            .monster(profile)
            .player(player)
            .build()
            .await
            .context("Failed to start encounter runtime")?;

        Ok(Self {
            config,
            monster,
            runtime,
        })
    }

    pub async fn run(self) -> Result<()> {
        let handle = self.runtime.handle();
        let encounter_rx = handle.subscribe(Topic::Encounter);
        let session_rx = handle.subscribe(Topic::Session);

        let terminal = Terminal::enter()?;
        let release_timeout = (!terminal.reports_release)
            .then(|| Duration::from_millis(self.config.key_release_ms));
        tracing::info!(
            reports_release = terminal.reports_release,
            "CLI client starting..."
        );

        let mut session = Session {
            handle: handle.clone(),
            presenter: Presenter::new(self.monster),
            keys: HeldKeys::new(release_timeout),
            out: io::stdout(),
            dirty: true,
        };
        let result = session.run(encounter_rx, session_rx).await;

        for key in session.keys.drain() {
            let _ = handle.key_up(key).await;
        }
        drop(terminal);

        if let Err(err) = self.runtime.shutdown().await {
            tracing::warn!("Runtime shutdown failed: {}", err);
        }
        tracing::info!("Client shutdown complete");
        result
    }
}

fn load_profile(factory: &ContentFactory, name: &str) -> Result<MonsterProfile> {
    if factory.monster_path(name).is_file() {
        return factory.load_monster(name);
    }
    if name == DEFAULT_MONSTER {
        tracing::warn!(
            data_dir = %factory.data_dir().display(),
            "monster file missing, using built-in {}",
            DEFAULT_MONSTER
        );
        return Ok(battle_content::default_monster());
    }
    bail!(
        "Unknown monster '{}' (no {})",
        name,
        factory.monster_path(name).display()
    )
}

/// Raw mode for the lifetime of the value.
struct Terminal {
    reports_release: bool,
}

impl Terminal {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;

        let reports_release = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
        if reports_release {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        Ok(Self { reports_release })
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.reports_release {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = terminal::disable_raw_mode();
    }
}

struct Session {
    handle: RuntimeHandle,
    presenter: Presenter,
    keys: HeldKeys,
    out: Stdout,
    /// A snapshot is due before the next menu line can be trusted.
    dirty: bool,
}

impl Session {
    async fn run(
        &mut self,
        mut encounter_rx: broadcast::Receiver<Event>,
        mut session_rx: broadcast::Receiver<Event>,
    ) -> Result<()> {
        loop {
            tokio::select! {
                result = encounter_rx.recv() => {
                    if self.handle_runtime_event(result)? {
                        break;
                    }
                }
                result = session_rx.recv() => {
                    // Engine events of the same tick go out first.
                    while let Ok(event) = encounter_rx.try_recv() {
                        self.handle_runtime_event(Ok(event))?;
                    }
                    if self.handle_runtime_event(result)? {
                        break;
                    }
                }
                _ = time::sleep(Duration::from_millis(FRAME_INTERVAL_MS)) => {
                    if self.handle_input_tick().await? {
                        break;
                    }
                    self.refresh_menu().await?;
                }
            }
        }
        Ok(())
    }

    /// Returns `true` when the loop should stop.
    fn handle_runtime_event(&mut self, result: Result<Event, RecvError>) -> Result<bool> {
        match result {
            Ok(event) => {
                for line in self.presenter.on_event(&event) {
                    self.print(&line)?;
                }
                self.dirty = true;
                Ok(matches!(
                    event,
                    Event::Session(runtime::SessionEvent::Finished { .. })
                ))
            }
            Err(RecvError::Closed) => {
                tracing::warn!("Event stream closed");
                Ok(true)
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Dropped {} stale events", skipped);
                Ok(false)
            }
        }
    }

    async fn handle_input_tick(&mut self) -> Result<bool> {
        while term_event::poll(Duration::from_millis(0))? {
            let TermEvent::Key(key) = term_event::read()? else {
                continue;
            };
            match map_key(&key) {
                KeyAction::Quit => {
                    self.print("* Quitting...")?;
                    return Ok(true);
                }
                KeyAction::Down(key) => {
                    if self.keys.press(key, Instant::now()) {
                        self.handle.key_up(key).await?;
                    }
                    self.handle.key_down(key).await?;
                    self.dirty = true;
                }
                KeyAction::Up(key) => {
                    if self.keys.release(key) {
                        self.handle.key_up(key).await?;
                    }
                }
                KeyAction::None => {}
            }
        }

        for key in self.keys.expire(Instant::now()) {
            self.handle.key_up(key).await?;
        }
        Ok(false)
    }

    async fn refresh_menu(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;
        let view = self.handle.snapshot().await?;
        if let Some(line) = self.presenter.menu_line(&view) {
            self.print(&line)?;
        }
        Ok(())
    }

    fn print(&mut self, line: &str) -> Result<()> {
        // Raw mode: no implicit carriage return.
        write!(self.out, "{line}\r\n")?;
        self.out.flush()?;
        Ok(())
    }
}
