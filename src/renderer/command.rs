//! Draw command types handed to the host renderer

use glam::IVec2;

use crate::sim::{EntityKind, TextColor};

/// One drawing instruction; a frame is an ordered list, painted front to back
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        kind: EntityKind,
        visual: &'static str,
        pos: IVec2,
        /// Radians about `pos`; only shells are rotated
        rotation: Option<f32>,
    },
    /// Vertical gauge filled from the bottom
    Bar {
        visual: &'static str,
        pos: IVec2,
        fill: f32,
    },
    Text {
        text: String,
        pos: IVec2,
        color: TextColor,
    },
    /// Full-screen overlay image
    Splash { visual: &'static str },
}

impl DrawCommand {
    pub fn sprite(kind: EntityKind, visual: &'static str, pos: IVec2) -> Self {
        DrawCommand::Sprite {
            kind,
            visual,
            pos,
            rotation: None,
        }
    }

    pub fn text(text: impl Into<String>, pos: IVec2, color: TextColor) -> Self {
        DrawCommand::Text {
            text: text.into(),
            pos,
            color,
        }
    }

    pub fn visual(&self) -> Option<&'static str> {
        match self {
            DrawCommand::Sprite { visual, .. }
            | DrawCommand::Bar { visual, .. }
            | DrawCommand::Splash { visual } => Some(*visual),
            DrawCommand::Text { .. } => None,
        }
    }
}

/// Anything that can emit draw commands
pub trait Drawable {
    fn draw(&self, now_ms: u64, out: &mut Vec<DrawCommand>);
}
