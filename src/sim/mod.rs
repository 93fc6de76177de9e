//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Integer pixel physics driven by the supplied delta
//! - Seeded RNG only
//! - Stable iteration order (firing / spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod energy;
pub mod entity;
pub mod invader;
pub mod physics;
pub mod powerup;
pub mod score;
pub mod shell;
pub mod state;
pub mod tank;
pub mod tick;

pub use collision::{Collidable, Rect};
pub use energy::{BarMode, EnergyBar, Shield};
pub use entity::{Body, Decor, EntityKind, Pop, Sprite, TextColor};
pub use invader::{DropSide, Invader, PowerUpKind};
pub use physics::{Motion, Steer};
pub use powerup::PowerUp;
pub use score::{LevelSummary, ScoreBoard};
pub use shell::Shell;
pub use state::{GameEvent, GameState, GameStatus};
pub use tank::{FireMode, Tank};
pub use tick::{TickInput, tick};
