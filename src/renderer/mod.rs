//! Rendering module
//!
//! Turns game state into an ordered list of draw commands. Painting them is
//! left to the host.

pub mod command;
pub mod frame;

pub use command::{DrawCommand, Drawable};
pub use frame::frame;
