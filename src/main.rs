//! The Last Invader headless driver
//!
//! Runs the simulation with a scripted player and logs what happened. Pass a
//! settings JSON path as the first argument.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use last_invader::renderer::frame;
    use last_invader::sim::{GameEvent, GameState, GameStatus, TickInput, tick};
    use last_invader::{InputScript, Settings};

    /// Pretend player: sweeps wall to wall and taps confirm on splash screens
    struct ScriptedPlayer {
        script: InputScript,
        heading_right: bool,
        tap: bool,
    }

    impl ScriptedPlayer {
        fn new(script: InputScript) -> Self {
            Self {
                script,
                heading_right: true,
                tap: false,
            }
        }

        fn input(&mut self, state: &GameState, wall_clock_ms: u64) -> TickInput {
            let mut input = TickInput {
                wall_clock_ms,
                ..Default::default()
            };

            if matches!(state.status, GameStatus::NewGame | GameStatus::StartingLevel) {
                // confirm is edge triggered
                self.tap = !self.tap;
                input.activate = self.tap;
                return input;
            }
            if state.status != GameStatus::LevelInProgress || self.script == InputScript::Idle {
                return input;
            }

            let x = state.invader.body.pos.x;
            let right_rail = state.tuning.stage.width - state.invader.body.width();
            if x <= state.invader.body.width() {
                self.heading_right = true;
            } else if x >= right_rail - state.invader.body.width() {
                self.heading_right = false;
            }
            input.move_right = self.heading_right;
            input.move_left = !self.heading_right;
            input.activate = self.script == InputScript::Boosted;
            input
        }
    }

    pub fn run() {
        let path = std::env::args().nth(1).map(PathBuf::from);
        let settings = Settings::load(path.as_deref());
        let atlas = settings.load_atlas();
        let mut state = GameState::with_tuning(settings.seed, settings.load_tuning());
        if let Some(kind) = settings.start_power_up_kind() {
            state.invader.apply_power_up(kind, &mut state.energy);
        }

        log::info!(
            "Running {} ticks of {} ms (seed {}, script {})",
            settings.ticks,
            settings.tick_ms,
            settings.seed,
            settings.script.as_str()
        );

        let mut player = ScriptedPlayer::new(settings.script);
        let mut commands = 0usize;
        let mut hits = 0u32;
        let mut levels = 0u32;
        for i in 0..settings.ticks {
            let wall_clock_ms = u64::from(i) * settings.tick_ms;
            let input = player.input(&state, wall_clock_ms);
            tick(&mut state, &input, settings.tick_ms, &atlas);
            commands += frame(&state).len();

            for event in state.drain_events() {
                match event {
                    GameEvent::ShellHit { shielded: false } => hits += 1,
                    GameEvent::LevelComplete(_) => levels += 1,
                    _ => {}
                }
                log::debug!("{event:?}");
            }
            if state.status == GameStatus::Dead {
                break;
            }
        }

        log::info!(
            "Finished at level {} ({}): score {}, best {}, {} levels cleared, {} hits taken, {} draw commands",
            state.score.level(),
            state.status.as_str(),
            state.score.score(),
            state.score.best(),
            levels,
            hits,
            commands
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("The Last Invader (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host; the library is embedded directly
}
