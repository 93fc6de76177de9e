//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]: the seeded RNG,
//! the simulation clock, score and energy, and the level's entities.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::energy::{EnergyBar, Shield};
use super::entity::{Body, Decor, Pop, Sprite, TextColor};
use super::invader::{Invader, PowerUpKind};
use super::powerup::{PowerUp, random_kind};
use super::score::{LevelSummary, ScoreBoard};
use super::shell::Shell;
use super::tank::{Shot, Tank};
use crate::assets::{AssetError, AssetProvider, visuals};
use crate::tuning::Tuning;

/// Top-level game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    /// Start screen, waiting for confirm
    #[default]
    NewGame,
    /// Between levels: perfect splash and/or level statistics
    StartingLevel,
    LevelInProgress,
    /// Invader has landed and is sinking off the stage
    LevelComplete,
    /// Terminal
    Dead,
}

impl GameStatus {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(GameStatus::NewGame),
            1 => Some(GameStatus::StartingLevel),
            2 => Some(GameStatus::LevelInProgress),
            3 => Some(GameStatus::LevelComplete),
            4 => Some(GameStatus::Dead),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::NewGame => "new_game",
            GameStatus::StartingLevel => "starting_level",
            GameStatus::LevelInProgress => "level_in_progress",
            GameStatus::LevelComplete => "level_complete",
            GameStatus::Dead => "dead",
        }
    }
}

/// Things an outside observer may want to react to (sound, analytics, ...)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    DropScored { at: IVec2 },
    ShellHit { shielded: bool },
    PowerUpSpawned(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    LevelComplete(LevelSummary),
    Died,
    /// A visual had no known dimensions
    AssetMissing(String),
}

/// Wall-clock state of the perfect-level splash
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerfectSplash {
    /// Set on the first tick the splash is shown
    pub shown_since_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Sum of every tick's delta
    pub clock_ms: u64,
    pub status: GameStatus,

    pub score: ScoreBoard,
    pub energy: EnergyBar,
    pub shield: Shield,

    pub background: Decor,
    pub land: Decor,
    pub invader: Invader,
    pub tank: Tank,
    /// Every live shell, in firing order
    pub shells: Vec<Shell>,
    pub power_ups: Vec<PowerUp>,
    pub pops: Vec<Pop>,

    /// Captured at landing: the finished level took no unshielded hit
    pub was_perfect: bool,
    pub perfect_splash: Option<PerfectSplash>,
    /// Activate state on the previous tick, for confirm edges
    pub last_activate: bool,

    /// Outbound queue for the host. Nothing inside the simulation empties it,
    /// so it keeps growing until [`GameState::drain_events`] is called; hosts
    /// should drain it once per frame.
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let stage = &tuning.stage;
        let land = Decor {
            body: Body::new(stage.land_x, stage.height - stage.land_rise, visuals::LAND),
        };
        let tank = Tank::new(stage.width / 2, stage.tank_y, 1, &tuning.tank);
        let invader = Invader::new(stage.width / 2, 0);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: ScoreBoard::new(tuning.feedback.flash_ms),
            tuning,
            clock_ms: 0,
            status: GameStatus::NewGame,
            energy: EnergyBar::default(),
            shield: Shield::default(),
            background: Decor {
                body: Body::new(0, 0, visuals::BACKGROUND),
            },
            land,
            invader,
            tank,
            shells: Vec::new(),
            power_ups: Vec::new(),
            pops: Vec::new(),
            was_perfect: false,
            perfect_splash: None,
            last_activate: false,
            events: Vec::new(),
            next_id: 1,
        };
        state.init_entities(1);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Lay out a fresh level for `level`.
    ///
    /// The tank is rebuilt (its special delay depends on the level), shells
    /// and power-ups are cleared and the invader returns to the top of the
    /// stage midline.
    /// Pops are left to finish their animation.
    pub fn init_entities(&mut self, level: u32) {
        let stage = &self.tuning.stage;

        let mut sprite = self.tank.body.sprite.clone();
        sprite.set_visual(visuals::TURRET_IDLE);
        let mut tank = Tank::new(stage.width / 2, stage.tank_y, level, &self.tuning.tank);
        tank.body.sprite = sprite;
        self.tank = tank;

        self.shells.clear();
        self.power_ups.clear();

        self.invader.reset_for_level(stage.width);
        self.invader.velocity = 0;
        self.land.body.pos = IVec2::new(stage.land_x, stage.height - stage.land_rise);
    }

    /// The only way into [`GameStatus::Dead`]
    pub fn notify_death(&mut self) {
        if self.status == GameStatus::Dead {
            return;
        }
        log::info!("Game over at level {} with {} points", self.score.level(), self.score.score());
        self.status = GameStatus::Dead;
        self.events.push(GameEvent::Died);
    }

    /// Ignores unknown codes
    pub fn set_status_code(&mut self, code: u8) {
        if let Some(status) = GameStatus::from_code(code) {
            self.status = status;
        }
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pop(&mut self, text: impl Into<String>, color: TextColor, at: IVec2) {
        self.pops.push(Pop::new(text, color, at));
    }

    /// Add a gameplay score change (also counts toward the level score)
    pub fn mod_score(&mut self, delta: i64) {
        self.score.mod_score(delta, self.clock_ms);
    }

    pub fn spawn_shell(&mut self, shot: Shot, assets: &dyn AssetProvider) -> u32 {
        let id = self.next_entity_id();
        let mut shell = Shell::new(id, shot.x, shot.y, shot.angle);
        if let Err(err) = shell.sprite.resolve(assets) {
            self.report_missing(err);
        }
        self.shells.push(shell);
        self.tank.track(id);
        id
    }

    pub fn spawn_power_up(&mut self, assets: &dyn AssetProvider) -> u32 {
        let id = self.next_entity_id();
        let kind = random_kind(&mut self.rng);
        let mut sprite = Sprite::new(kind.visual());
        if let Err(err) = sprite.resolve(assets) {
            self.report_missing(err);
        }
        let power_up = PowerUp::spawn(id, kind, sprite, self.tuning.stage.width, &mut self.rng);
        log::debug!("Power-up {} dropped at x={}", kind.as_str(), power_up.body.pos.x);
        self.power_ups.push(power_up);
        self.events.push(GameEvent::PowerUpSpawned(kind));
        id
    }

    pub fn report_missing(&mut self, err: AssetError) {
        log::warn!("{err}");
        let AssetError::NotFound(visual) = err;
        self.events.push(GameEvent::AssetMissing(visual));
    }

    /// Remove everything marked during the tick
    pub fn compact(&mut self) {
        self.tank.forget_removed(&self.shells);
        self.shells.retain(|s| !s.removed);
        self.power_ups.retain(|p| !p.removed);
        self.pops.retain(|p| !p.removed);
    }
}
