//! The Last Invader - a reversed space-invaders arcade game
//!
//! The player steers the invader down to the ground while a tank tries to
//! shoot it. Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `renderer`: Draw-command generation
//! - `assets`: Visual identifiers and dimension lookup
//! - `settings`: Headless driver configuration
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use assets::{AssetError, AssetProvider, Atlas, Size};
pub use settings::{InputScript, Settings};
pub use tuning::Tuning;
